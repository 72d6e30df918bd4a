//! DeleteGeneticHandler - Removes a strain record.

use std::sync::Arc;

use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::domain::foundation::{CommandMetadata, DomainError, GeneticId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct DeleteGeneticCommand {
    pub genetic_id: GeneticId,
}

#[derive(Debug, Clone)]
pub enum DeleteGeneticError {
    GeneticNotFound(GeneticId),
    Domain(DomainError),
}

impl std::fmt::Display for DeleteGeneticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteGeneticError::GeneticNotFound(id) => write!(f, "Genetic not found: {}", id),
            DeleteGeneticError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteGeneticError {}

impl From<DomainError> for DeleteGeneticError {
    fn from(err: DomainError) -> Self {
        DeleteGeneticError::Domain(err)
    }
}

pub struct DeleteGeneticHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteGeneticHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: DeleteGeneticCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DeleteGeneticError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Genetic deleted")
    }

    async fn execute(
        &self,
        cmd: DeleteGeneticCommand,
        metadata: &CommandMetadata,
    ) -> Result<(), DeleteGeneticError> {
        let path = UserPaths::new(&metadata.user_id).genetic(&cmd.genetic_id);
        if self.store.get(&path).await?.is_none() {
            return Err(DeleteGeneticError::GeneticNotFound(cmd.genetic_id));
        }
        self.store.delete(&path).await?;

        tracing::info!(user_id = %metadata.user_id, genetic_id = %cmd.genetic_id, "Genetic deleted");
        Ok(())
    }
}
