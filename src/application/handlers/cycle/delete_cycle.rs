//! DeleteCycleHandler - Deletes a cycle and all of its logs in one batch.

use std::sync::Arc;

use crate::application::handlers::lookup::log_paths;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError};
use crate::ports::{DocumentStore, Notifier};

/// Command to delete a cycle.
#[derive(Debug, Clone)]
pub struct DeleteCycleCommand {
    pub cycle_id: CycleId,
}

/// Result of successful cycle deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteCycleResult {
    /// Logs removed in the same batch as the cycle.
    pub logs_deleted: usize,
}

/// Error type for cycle deletion.
#[derive(Debug, Clone)]
pub enum DeleteCycleError {
    /// No cycle with this id exists for the user.
    CycleNotFound(CycleId),
    /// The batch was rejected; the cycle and its logs are unchanged.
    Domain(DomainError),
}

impl std::fmt::Display for DeleteCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            DeleteCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteCycleError {}

impl From<DomainError> for DeleteCycleError {
    fn from(err: DomainError) -> Self {
        DeleteCycleError::Domain(err)
    }
}

/// Handler for deleting cycles.
pub struct DeleteCycleHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteCycleHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: DeleteCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteCycleResult, DeleteCycleError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Cycle deleted")
    }

    async fn execute(
        &self,
        cmd: DeleteCycleCommand,
        metadata: &CommandMetadata,
    ) -> Result<DeleteCycleResult, DeleteCycleError> {
        let paths = UserPaths::new(&metadata.user_id);
        let store = self.store.as_ref();
        let cycle_path = paths.cycle(&cmd.cycle_id);

        if store.get(&cycle_path).await?.is_none() {
            return Err(DeleteCycleError::CycleNotFound(cmd.cycle_id));
        }

        let mut batch = log_paths(store, &paths, &cmd.cycle_id).await?;
        let logs_deleted = batch.len();
        batch.push(cycle_path);
        store.batch_delete(&batch).await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            logs = logs_deleted,
            "Cycle deleted"
        );
        Ok(DeleteCycleResult { logs_deleted })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::cycle::{CycleDetails, CyclePhase};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::log::{LogDetails, NewLog, NutrientReading};

    #[tokio::test]
    async fn deletes_cycle_with_its_logs() {
        let (store, notifier) = harness();
        let room = seed_room(&store, "Carpa").await;
        let cycle_id = seed_cycle(&store, CycleDetails::new("Lemon", room.clone(), CyclePhase::Flowering)).await;
        let other = seed_cycle(&store, CycleDetails::new("Mother", room, CyclePhase::Vegetative)).await;
        for week in 1..=3 {
            seed_log(
                &store,
                &cycle_id,
                NewLog::new(week, LogDetails::Watering(NutrientReading::new(Some(6.1), Some(1.4)))),
            )
            .await;
        }
        seed_log(&store, &other, NewLog::new(1, LogDetails::pruning("Apical", None))).await;
        let handler = DeleteCycleHandler::new(store.clone(), notifier);

        let result = handler
            .handle(
                DeleteCycleCommand {
                    cycle_id: cycle_id.clone(),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result, DeleteCycleResult { logs_deleted: 3 });
        assert!(store.get(&paths().cycle(&cycle_id)).await.unwrap().is_none());
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 0);
        assert_eq!(store.document_count(&paths().cycle_logs(&other)), 1);
    }

    #[tokio::test]
    async fn failed_batch_changes_nothing() {
        let (store, notifier) = harness();
        let room = seed_room(&store, "Carpa").await;
        let cycle_id = seed_cycle(&store, CycleDetails::new("Lemon", room, CyclePhase::Flowering)).await;
        seed_log(&store, &cycle_id, NewLog::new(2, LogDetails::pruning("LST", None))).await;
        store.set_write_failure(Some(ErrorCode::StoreUnavailable));
        let handler = DeleteCycleHandler::new(store.clone(), notifier.clone());

        let result = handler
            .handle(
                DeleteCycleCommand {
                    cycle_id: cycle_id.clone(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(DeleteCycleError::Domain(_))));
        assert!(store.get(&paths().cycle(&cycle_id)).await.unwrap().is_some());
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 1);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let (store, notifier) = harness();
        let handler = DeleteCycleHandler::new(store, notifier);
        let result = handler
            .handle(
                DeleteCycleCommand {
                    cycle_id: CycleId::new("ghost").unwrap(),
                },
                test_metadata(),
            )
            .await;
        assert!(matches!(result, Err(DeleteCycleError::CycleNotFound(_))));
    }
}
