//! AddLogHandler - Records a journal entry against a declared week of a cycle.

use std::sync::Arc;

use crate::application::handlers::lookup::load_cycle;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::log_document;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, LogId};
use crate::domain::log::{LogKind, NewLog};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct AddLogCommand {
    pub cycle_id: CycleId,
    pub log: NewLog,
}

#[derive(Debug, Clone)]
pub struct AddLogResult {
    pub log_id: LogId,
    pub week: u32,
    pub kind: LogKind,
}

#[derive(Debug, Clone)]
pub enum AddLogError {
    CycleNotFound(CycleId),
    /// The week is not part of the cycle's flowering schedule.
    WeekNotFound { cycle_id: CycleId, week: u32 },
    Domain(DomainError),
}

impl std::fmt::Display for AddLogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddLogError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            AddLogError::WeekNotFound { cycle_id, week } => {
                write!(f, "Week {} is not declared for cycle {}", week, cycle_id)
            }
            AddLogError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for AddLogError {}

impl From<DomainError> for AddLogError {
    fn from(err: DomainError) -> Self {
        AddLogError::Domain(err)
    }
}

/// Handler for adding logs. The store stamps the log's date.
pub struct AddLogHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl AddLogHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: AddLogCommand,
        metadata: CommandMetadata,
    ) -> Result<AddLogResult, AddLogError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Log saved")
    }

    async fn execute(
        &self,
        cmd: AddLogCommand,
        metadata: &CommandMetadata,
    ) -> Result<AddLogResult, AddLogError> {
        let paths = UserPaths::new(&metadata.user_id);

        let cycle = load_cycle(self.store.as_ref(), &paths, &cmd.cycle_id)
            .await?
            .ok_or_else(|| AddLogError::CycleNotFound(cmd.cycle_id.clone()))?;
        if !cycle.declares_week(cmd.log.week) {
            return Err(AddLogError::WeekNotFound {
                cycle_id: cmd.cycle_id,
                week: cmd.log.week,
            });
        }

        let details = cmd.log.details.normalized().map_err(DomainError::from)?;
        let log = NewLog::new(cmd.log.week, details);
        let id = self
            .store
            .create(&paths.cycle_logs(&cmd.cycle_id), log_document(&log)?)
            .await?;
        let log_id = LogId::new(id).map_err(DomainError::from)?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            log_id = %log_id,
            week = log.week,
            kind = %log.details.kind(),
            "Log added"
        );
        Ok(AddLogResult {
            log_id,
            week: log.week,
            kind: log.details.kind(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::cycle::{CycleDetails, CyclePhase};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::log::{FertilizerItem, Fertilizers, LogDetails, NutrientReading};
    use serde_json::json;

    async fn flowering_cycle(store: &crate::adapters::InMemoryDocumentStore) -> CycleId {
        let room = seed_room(store, "Carpa").await;
        seed_cycle(store, CycleDetails::new("Lemon", room, CyclePhase::Flowering)).await
    }

    #[tokio::test]
    async fn writes_solution_change_with_server_date() {
        let (store, notifier) = harness();
        let cycle_id = flowering_cycle(&store).await;
        let handler = AddLogHandler::new(store.clone(), notifier);

        let reading = NutrientReading::new(Some(5.8), Some(1.6)).with_fertilizers(
            Fertilizers::ItemList(vec![FertilizerItem::new("Grow", 2.0, "ml/L")]),
        );
        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id: cycle_id.clone(),
                    log: NewLog::new(
                        4,
                        LogDetails::SolutionChange {
                            reading,
                            litros: Some(40.0),
                        },
                    ),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.kind, LogKind::SolutionChange);
        let doc = store
            .get(&paths().log(&cycle_id, &result.log_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get("type"), Some(&json!("Cambio de Solución")));
        assert_eq!(doc.get("week"), Some(&json!(4)));
        assert_eq!(doc.get("litros"), Some(&json!(40.0)));
        assert!(doc.get("date").and_then(|d| d.as_str()).is_some());
    }

    #[tokio::test]
    async fn rejects_undeclared_week() {
        let (store, notifier) = harness();
        let cycle_id = flowering_cycle(&store).await;
        let handler = AddLogHandler::new(store.clone(), notifier.clone());

        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id: cycle_id.clone(),
                    log: NewLog::new(11, LogDetails::pruning("Apical", None)),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(AddLogError::WeekNotFound { week: 11, .. })));
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 0);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn vegetative_cycle_declares_no_weeks() {
        let (store, notifier) = harness();
        let room = seed_room(&store, "Carpa").await;
        let cycle_id =
            seed_cycle(&store, CycleDetails::new("Mother", room, CyclePhase::Vegetative)).await;
        let handler = AddLogHandler::new(store, notifier);

        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id,
                    log: NewLog::new(1, LogDetails::pruning("Apical", None)),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(AddLogError::WeekNotFound { .. })));
    }

    #[tokio::test]
    async fn rejects_pruning_without_type() {
        let (store, notifier) = harness();
        let cycle_id = flowering_cycle(&store).await;
        let handler = AddLogHandler::new(store.clone(), notifier);

        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id: cycle_id.clone(),
                    log: NewLog::new(2, LogDetails::pruning("  ", None)),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(AddLogError::Domain(ref e)) if e.code == ErrorCode::ValidationFailed
        ));
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 0);
    }

    #[tokio::test]
    async fn clone_cut_keeps_count() {
        let (store, notifier) = harness();
        let cycle_id = flowering_cycle(&store).await;
        let handler = AddLogHandler::new(store.clone(), notifier);

        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id: cycle_id.clone(),
                    log: NewLog::new(1, LogDetails::pruning("Clones", Some(6))),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let doc = store
            .get(&paths().log(&cycle_id, &result.log_id))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc.get("podaType"), Some(&json!("Clones")));
        assert_eq!(doc.get("clonesCount"), Some(&json!(6)));
    }

    #[tokio::test]
    async fn fails_when_cycle_not_found() {
        let (store, notifier) = harness();
        let handler = AddLogHandler::new(store, notifier);

        let result = handler
            .handle(
                AddLogCommand {
                    cycle_id: CycleId::new("ghost").unwrap(),
                    log: NewLog::new(1, LogDetails::pruning("Apical", None)),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(result, Err(AddLogError::CycleNotFound(_))));
    }
}
