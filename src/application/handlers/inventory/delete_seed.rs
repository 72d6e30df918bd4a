//! DeleteSeedHandler - Removes a seed-bank entry.

use std::sync::Arc;

use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::domain::foundation::{CommandMetadata, DomainError, SeedId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct DeleteSeedCommand {
    pub seed_id: SeedId,
}

#[derive(Debug, Clone)]
pub enum DeleteSeedError {
    SeedNotFound(SeedId),
    Domain(DomainError),
}

impl std::fmt::Display for DeleteSeedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteSeedError::SeedNotFound(id) => write!(f, "Seed not found: {}", id),
            DeleteSeedError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteSeedError {}

impl From<DomainError> for DeleteSeedError {
    fn from(err: DomainError) -> Self {
        DeleteSeedError::Domain(err)
    }
}

pub struct DeleteSeedHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteSeedHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: DeleteSeedCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DeleteSeedError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Seed deleted")
    }

    async fn execute(
        &self,
        cmd: DeleteSeedCommand,
        metadata: &CommandMetadata,
    ) -> Result<(), DeleteSeedError> {
        let path = UserPaths::new(&metadata.user_id).seed(&cmd.seed_id);
        if self.store.get(&path).await?.is_none() {
            return Err(DeleteSeedError::SeedNotFound(cmd.seed_id));
        }
        self.store.delete(&path).await?;

        tracing::info!(user_id = %metadata.user_id, seed_id = %cmd.seed_id, "Seed deleted");
        Ok(())
    }
}
