//! ChangePhaseHandler - Moves a cycle through Vegetative, Flowering, Finished.

use std::sync::Arc;

use crate::application::handlers::lookup::load_cycle;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::cycle_phase_fields;
use crate::domain::cycle::{Cycle, CyclePhase, PhaseChange};
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError};
use crate::ports::{DocumentStore, Notifier};

/// Command to change a cycle's phase.
///
/// Only forward moves are accepted; going back is `InvalidStateTransition`.
/// Edits through `UpdateCycleCommand` may set any phase.
#[derive(Debug, Clone)]
pub struct ChangePhaseCommand {
    pub cycle_id: CycleId,
    pub target: CyclePhase,
    /// Start date (`YYYY-MM-DD`) of the phase being entered.
    pub start_date: Option<String>,
}

/// Result of a phase change.
#[derive(Debug, Clone)]
pub struct ChangePhaseResult {
    pub cycle: Cycle,
    pub change: PhaseChange,
}

/// Error type for phase changes.
#[derive(Debug, Clone)]
pub enum ChangePhaseError {
    CycleNotFound(CycleId),
    Domain(DomainError),
}

impl std::fmt::Display for ChangePhaseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangePhaseError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            ChangePhaseError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for ChangePhaseError {}

impl From<DomainError> for ChangePhaseError {
    fn from(err: DomainError) -> Self {
        ChangePhaseError::Domain(err)
    }
}

/// Handler for phase changes.
pub struct ChangePhaseHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl ChangePhaseHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: ChangePhaseCommand,
        metadata: CommandMetadata,
    ) -> Result<ChangePhaseResult, ChangePhaseError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Phase updated")
    }

    async fn execute(
        &self,
        cmd: ChangePhaseCommand,
        metadata: &CommandMetadata,
    ) -> Result<ChangePhaseResult, ChangePhaseError> {
        let paths = UserPaths::new(&metadata.user_id);

        let mut cycle = load_cycle(self.store.as_ref(), &paths, &cmd.cycle_id)
            .await?
            .ok_or_else(|| ChangePhaseError::CycleNotFound(cmd.cycle_id.clone()))?;

        let change = cycle.change_phase(cmd.target, cmd.start_date)?;
        self.store
            .update(&paths.cycle(&cmd.cycle_id), cycle_phase_fields(&cycle)?)
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            from = %change.from,
            to = %change.to,
            schedule_generated = change.schedule_generated,
            "Cycle phase changed"
        );
        Ok(ChangePhaseResult { cycle, change })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::InMemoryDocumentStore;
    use crate::application::handlers::test_support::*;
    use crate::application::records::decode_cycle;
    use crate::domain::cycle::CycleDetails;
    use crate::domain::foundation::ErrorCode;
    use serde_json::json;

    async fn stored_cycle(store: &InMemoryDocumentStore, id: &CycleId) -> Cycle {
        let doc = store.get(&paths().cycle(id)).await.unwrap().unwrap();
        decode_cycle(&doc).unwrap()
    }

    async fn vegetative_cycle(store: &InMemoryDocumentStore) -> CycleId {
        let room_id = seed_room(store, "Carpa").await;
        seed_cycle(
            store,
            CycleDetails::new("Lemon", room_id, CyclePhase::Vegetative)
                .with_vegetative_start_date("2024-01-10"),
        )
        .await
    }

    fn to_flowering(cycle_id: &CycleId) -> ChangePhaseCommand {
        ChangePhaseCommand {
            cycle_id: cycle_id.clone(),
            target: CyclePhase::Flowering,
            start_date: Some("2024-03-01".to_string()),
        }
    }

    #[tokio::test]
    async fn entering_flowering_generates_schedule_and_start_date() {
        let (store, notifier) = harness();
        let cycle_id = vegetative_cycle(&store).await;
        let handler = ChangePhaseHandler::new(store.clone(), notifier);

        let result = handler
            .handle(to_flowering(&cycle_id), test_metadata())
            .await
            .unwrap();

        assert!(result.change.schedule_generated);
        let doc = store.get(&paths().cycle(&cycle_id)).await.unwrap().unwrap();
        assert_eq!(doc.get("phase"), Some(&json!("Floración")));
        assert_eq!(doc.get("floweringStartDate"), Some(&json!("2024-03-01")));
        assert_eq!(doc.get("vegetativeStartDate"), Some(&json!("2024-01-10")));
        assert_eq!(doc.get("name"), Some(&json!("Lemon")));
    }

    #[tokio::test]
    async fn repeated_transition_does_not_regenerate_schedule() {
        let (store, notifier) = harness();
        let cycle_id = vegetative_cycle(&store).await;
        let handler = ChangePhaseHandler::new(store.clone(), notifier);

        handler
            .handle(to_flowering(&cycle_id), test_metadata())
            .await
            .unwrap();
        let mut cycle = stored_cycle(&store, &cycle_id).await;
        cycle.add_flowering_week("LAVADO").unwrap();
        store
            .update(
                &paths().cycle(&cycle_id),
                crate::application::records::cycle_schedule_fields(
                    cycle.flowering_weeks().unwrap(),
                )
                .unwrap(),
            )
            .await
            .unwrap();

        let second = handler
            .handle(to_flowering(&cycle_id), test_metadata())
            .await
            .unwrap();

        assert!(second.change.is_noop());
        assert!(!second.change.schedule_generated);
        assert_eq!(stored_cycle(&store, &cycle_id).await.week_numbers().len(), 11);
    }

    #[tokio::test]
    async fn finishing_keeps_schedule() {
        let (store, notifier) = harness();
        let cycle_id = vegetative_cycle(&store).await;
        let handler = ChangePhaseHandler::new(store.clone(), notifier);
        handler
            .handle(to_flowering(&cycle_id), test_metadata())
            .await
            .unwrap();

        handler
            .handle(
                ChangePhaseCommand {
                    cycle_id: cycle_id.clone(),
                    target: CyclePhase::Finished,
                    start_date: None,
                },
                test_metadata(),
            )
            .await
            .unwrap();

        let cycle = stored_cycle(&store, &cycle_id).await;
        assert_eq!(cycle.phase(), CyclePhase::Finished);
        assert_eq!(cycle.week_numbers().len(), 10);
    }

    #[tokio::test]
    async fn rejects_backwards_transition() {
        let (store, notifier) = harness();
        let cycle_id = vegetative_cycle(&store).await;
        let handler = ChangePhaseHandler::new(store.clone(), notifier.clone());
        handler
            .handle(to_flowering(&cycle_id), test_metadata())
            .await
            .unwrap();

        let result = handler
            .handle(
                ChangePhaseCommand {
                    cycle_id: cycle_id.clone(),
                    target: CyclePhase::Vegetative,
                    start_date: None,
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(ChangePhaseError::Domain(ref e)) if e.code == ErrorCode::InvalidStateTransition
        ));
        assert_eq!(stored_cycle(&store, &cycle_id).await.phase(), CyclePhase::Flowering);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn store_failure_leaves_record_unchanged() {
        let (store, notifier) = harness();
        let cycle_id = vegetative_cycle(&store).await;
        store.set_write_failure(Some(ErrorCode::StoreUnavailable));
        let handler = ChangePhaseHandler::new(store.clone(), notifier);

        let result = handler.handle(to_flowering(&cycle_id), test_metadata()).await;

        assert!(result.is_err());
        let cycle = stored_cycle(&store, &cycle_id).await;
        assert_eq!(cycle.phase(), CyclePhase::Vegetative);
        assert!(cycle.flowering_weeks().is_none());
    }
}
