//! AddSeedHandler - Adds an entry to the seed bank.

use std::sync::Arc;

use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::seed_fields;
use crate::domain::foundation::{CommandMetadata, DomainError, SeedId};
use crate::domain::inventory::{Seed, SeedDetails};
use crate::ports::{DocumentStore, NewDocument, Notifier};

#[derive(Debug, Clone)]
pub struct AddSeedCommand {
    pub details: SeedDetails,
}

#[derive(Debug, Clone)]
pub struct AddSeedResult {
    pub seed: Seed,
}

#[derive(Debug, Clone)]
pub enum AddSeedError {
    Domain(DomainError),
}

impl std::fmt::Display for AddSeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddSeedError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AddSeedError {}

impl From<DomainError> for AddSeedError {
    fn from(err: DomainError) -> Self {
        AddSeedError::Domain(err)
    }
}

pub struct AddSeedHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl AddSeedHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: AddSeedCommand,
        metadata: CommandMetadata,
    ) -> Result<AddSeedResult, AddSeedError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Seeds added")
    }

    async fn execute(
        &self,
        cmd: AddSeedCommand,
        metadata: &CommandMetadata,
    ) -> Result<AddSeedResult, AddSeedError> {
        let details = cmd.details.normalized().map_err(DomainError::from)?;
        let paths = UserPaths::new(&metadata.user_id);

        let id = self
            .store
            .create(&paths.seeds(), NewDocument::new(seed_fields(&details)?))
            .await?;
        let seed = Seed::from_details(SeedId::new(id).map_err(DomainError::from)?, details);

        tracing::info!(
            user_id = %metadata.user_id,
            seed_id = %seed.id,
            quantity = seed.quantity,
            "Seeds added"
        );
        Ok(AddSeedResult { seed })
    }
}
