//! GerminateSeedsHandler - Takes seeds out of the bank for germination.

use std::sync::Arc;

use crate::application::handlers::lookup::load_seed;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::SEED_QUANTITY_FIELD;
use crate::domain::foundation::{CommandMetadata, DomainError, SeedId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct GerminateSeedsCommand {
    pub seed_id: SeedId,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GerminateSeedsResult {
    /// Seeds left according to the read that validated the request.
    pub remaining: u32,
}

#[derive(Debug, Clone)]
pub enum GerminateSeedsError {
    SeedNotFound(SeedId),
    Domain(DomainError),
}

impl std::fmt::Display for GerminateSeedsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GerminateSeedsError::SeedNotFound(id) => write!(f, "Seed not found: {}", id),
            GerminateSeedsError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for GerminateSeedsError {}

impl From<DomainError> for GerminateSeedsError {
    fn from(err: DomainError) -> Self {
        GerminateSeedsError::Domain(err)
    }
}

/// Handler for germinating seeds.
///
/// The request is checked against the stored quantity, then applied as an
/// atomic decrement.
pub struct GerminateSeedsHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl GerminateSeedsHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: GerminateSeedsCommand,
        metadata: CommandMetadata,
    ) -> Result<GerminateSeedsResult, GerminateSeedsError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Seeds germinated")
    }

    async fn execute(
        &self,
        cmd: GerminateSeedsCommand,
        metadata: &CommandMetadata,
    ) -> Result<GerminateSeedsResult, GerminateSeedsError> {
        let paths = UserPaths::new(&metadata.user_id);

        let seed = load_seed(self.store.as_ref(), &paths, &cmd.seed_id)
            .await?
            .ok_or_else(|| GerminateSeedsError::SeedNotFound(cmd.seed_id.clone()))?;
        seed.check_germination(cmd.quantity)?;

        self.store
            .increment_field(
                &paths.seed(&cmd.seed_id),
                SEED_QUANTITY_FIELD,
                -i64::from(cmd.quantity),
            )
            .await?;

        let remaining = seed.quantity - cmd.quantity;
        tracing::info!(
            user_id = %metadata.user_id,
            seed_id = %cmd.seed_id,
            quantity = cmd.quantity,
            remaining,
            "Seeds germinated"
        );
        Ok(GerminateSeedsResult { remaining })
    }
}
