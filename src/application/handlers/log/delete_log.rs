//! DeleteLogHandler - Removes a single log from a cycle.

use std::sync::Arc;

use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, LogId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct DeleteLogCommand {
    pub cycle_id: CycleId,
    pub log_id: LogId,
}

#[derive(Debug, Clone)]
pub enum DeleteLogError {
    LogNotFound(LogId),
    Domain(DomainError),
}

impl std::fmt::Display for DeleteLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteLogError::LogNotFound(id) => write!(f, "Log not found: {}", id),
            DeleteLogError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteLogError {}

impl From<DomainError> for DeleteLogError {
    fn from(err: DomainError) -> Self {
        DeleteLogError::Domain(err)
    }
}

pub struct DeleteLogHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteLogHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: DeleteLogCommand,
        metadata: CommandMetadata,
    ) -> Result<(), DeleteLogError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Log deleted")
    }

    async fn execute(
        &self,
        cmd: DeleteLogCommand,
        metadata: &CommandMetadata,
    ) -> Result<(), DeleteLogError> {
        let path = UserPaths::new(&metadata.user_id).log(&cmd.cycle_id, &cmd.log_id);

        if self.store.get(&path).await?.is_none() {
            return Err(DeleteLogError::LogNotFound(cmd.log_id));
        }
        self.store.delete(&path).await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            log_id = %cmd.log_id,
            "Log deleted"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::cycle::{CycleDetails, CyclePhase};
    use crate::domain::log::{LogDetails, NewLog};

    #[tokio::test]
    async fn deletes_only_the_requested_log() {
        let (store, notifier) = harness();
        let room = seed_room(&store, "Carpa").await;
        let cycle_id =
            seed_cycle(&store, CycleDetails::new("Lemon", room, CyclePhase::Flowering)).await;
        let doomed = seed_log(&store, &cycle_id, NewLog::new(1, LogDetails::pruning("Apical", None))).await;
        let kept = seed_log(&store, &cycle_id, NewLog::new(1, LogDetails::pruning("LST", None))).await;
        let handler = DeleteLogHandler::new(store.clone(), notifier);

        handler
            .handle(
                DeleteLogCommand {
                    cycle_id: cycle_id.clone(),
                    log_id: doomed,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let remaining = store.documents(&paths().cycle_logs(&cycle_id));
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, kept.as_str());
    }

    #[tokio::test]
    async fn fails_when_log_not_found() {
        let (store, notifier) = harness();
        let handler = DeleteLogHandler::new(store, notifier.clone());

        let result = handler
            .handle(
                DeleteLogCommand {
                    cycle_id: CycleId::new("c1").unwrap(),
                    log_id: LogId::new("ghost").unwrap(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(DeleteLogError::LogNotFound(_))));
        assert_eq!(notifier.errors().len(), 1);
    }
}
