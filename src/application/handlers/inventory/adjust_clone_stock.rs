//! AdjustCloneStockHandler - Signed change to a genetic's clone stock.
//!
//! The change is an atomic increment in the store, with no read beforehand.
//! There is no lower bound: taking clones from an empty stock leaves a
//! negative value, unlike seed germination which is checked first.

use std::sync::Arc;

use crate::application::handlers::lookup::is_missing_document;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::CLONE_STOCK_FIELD;
use crate::domain::foundation::{CommandMetadata, DomainError, GeneticId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct AdjustCloneStockCommand {
    pub genetic_id: GeneticId,
    pub delta: i64,
}

#[derive(Debug, Clone)]
pub enum AdjustCloneStockError {
    GeneticNotFound(GeneticId),
    Domain(DomainError),
}

impl std::fmt::Display for AdjustCloneStockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdjustCloneStockError::GeneticNotFound(id) => write!(f, "Genetic not found: {}", id),
            AdjustCloneStockError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AdjustCloneStockError {}

impl From<DomainError> for AdjustCloneStockError {
    fn from(err: DomainError) -> Self {
        AdjustCloneStockError::Domain(err)
    }
}

pub struct AdjustCloneStockHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl AdjustCloneStockHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: AdjustCloneStockCommand,
        metadata: CommandMetadata,
    ) -> Result<(), AdjustCloneStockError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Stock updated")
    }

    async fn execute(
        &self,
        cmd: AdjustCloneStockCommand,
        metadata: &CommandMetadata,
    ) -> Result<(), AdjustCloneStockError> {
        let path = UserPaths::new(&metadata.user_id).genetic(&cmd.genetic_id);

        match self
            .store
            .increment_field(&path, CLONE_STOCK_FIELD, cmd.delta)
            .await
        {
            Ok(()) => {}
            Err(err) if is_missing_document(&err) => {
                return Err(AdjustCloneStockError::GeneticNotFound(cmd.genetic_id))
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(
            user_id = %metadata.user_id,
            genetic_id = %cmd.genetic_id,
            delta = cmd.delta,
            "Clone stock adjusted"
        );
        Ok(())
    }
}
