//! UpdateCycleHandler - Replaces the editable fields of a cycle.

use std::sync::Arc;

use crate::application::handlers::lookup::{load_cycle, room_exists};
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::cycle_fields;
use crate::domain::cycle::{Cycle, CycleDetails, PhaseChange};
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, RoomId};
use crate::ports::{DocumentStore, Notifier};

/// Command to edit a cycle.
#[derive(Debug, Clone)]
pub struct UpdateCycleCommand {
    pub cycle_id: CycleId,
    pub details: CycleDetails,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct UpdateCycleResult {
    pub cycle: Cycle,
    pub phase_change: PhaseChange,
}

/// Error type for cycle edits.
#[derive(Debug, Clone)]
pub enum UpdateCycleError {
    CycleNotFound(CycleId),
    RoomNotFound(RoomId),
    Domain(DomainError),
}

impl std::fmt::Display for UpdateCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            UpdateCycleError::RoomNotFound(id) => write!(f, "Room not found: {}", id),
            UpdateCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for UpdateCycleError {}

impl From<DomainError> for UpdateCycleError {
    fn from(err: DomainError) -> Self {
        UpdateCycleError::Domain(err)
    }
}

/// Handler for editing cycles.
///
/// The stored schedule is written back unchanged, or generated when the edit
/// takes the cycle into flowering for the first time.
pub struct UpdateCycleHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl UpdateCycleHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: UpdateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<UpdateCycleResult, UpdateCycleError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Cycle updated")
    }

    async fn execute(
        &self,
        cmd: UpdateCycleCommand,
        metadata: &CommandMetadata,
    ) -> Result<UpdateCycleResult, UpdateCycleError> {
        let paths = UserPaths::new(&metadata.user_id);
        let store = self.store.as_ref();

        let mut cycle = load_cycle(store, &paths, &cmd.cycle_id)
            .await?
            .ok_or_else(|| UpdateCycleError::CycleNotFound(cmd.cycle_id.clone()))?;

        let target_room = cmd.details.room_id.clone();
        if &target_room != cycle.room_id() && !room_exists(store, &paths, &target_room).await? {
            return Err(UpdateCycleError::RoomNotFound(target_room));
        }

        let phase_change = cycle.apply_details(cmd.details)?;
        store
            .update(
                &paths.cycle(&cmd.cycle_id),
                cycle_fields(cycle.details(), cycle.flowering_weeks())?,
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            from = %phase_change.from,
            to = %phase_change.to,
            schedule_generated = phase_change.schedule_generated,
            "Cycle updated"
        );
        Ok(UpdateCycleResult {
            cycle,
            phase_change,
        })
    }
}
