//! MoveCycleHandler - Reassigns a cycle to another room.

use std::sync::Arc;

use crate::application::handlers::lookup::{load_cycle, room_exists};
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::cycle_room_fields;
use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, RoomId};
use crate::ports::{DocumentStore, Notifier};

#[derive(Debug, Clone)]
pub struct MoveCycleCommand {
    pub cycle_id: CycleId,
    pub target_room_id: RoomId,
}

#[derive(Debug, Clone)]
pub struct MoveCycleResult {
    pub cycle: Cycle,
    pub from_room_id: RoomId,
}

#[derive(Debug, Clone)]
pub enum MoveCycleError {
    CycleNotFound(CycleId),
    RoomNotFound(RoomId),
    Domain(DomainError),
}

impl std::fmt::Display for MoveCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveCycleError::CycleNotFound(id) => write!(f, "Cycle not found: {}", id),
            MoveCycleError::RoomNotFound(id) => write!(f, "Room not found: {}", id),
            MoveCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for MoveCycleError {}

impl From<DomainError> for MoveCycleError {
    fn from(err: DomainError) -> Self {
        MoveCycleError::Domain(err)
    }
}

/// Handler for moving cycles between rooms. Phase and schedule are untouched.
pub struct MoveCycleHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl MoveCycleHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: MoveCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<MoveCycleResult, MoveCycleError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Cycle moved")
    }

    async fn execute(
        &self,
        cmd: MoveCycleCommand,
        metadata: &CommandMetadata,
    ) -> Result<MoveCycleResult, MoveCycleError> {
        let paths = UserPaths::new(&metadata.user_id);
        let store = self.store.as_ref();

        let mut cycle = load_cycle(store, &paths, &cmd.cycle_id)
            .await?
            .ok_or_else(|| MoveCycleError::CycleNotFound(cmd.cycle_id.clone()))?;
        let from_room_id = cycle.room_id().clone();

        cycle.move_to_room(cmd.target_room_id.clone())?;
        if !room_exists(store, &paths, &cmd.target_room_id).await? {
            return Err(MoveCycleError::RoomNotFound(cmd.target_room_id));
        }

        store
            .update(
                &paths.cycle(&cmd.cycle_id),
                cycle_room_fields(&cmd.target_room_id),
            )
            .await?;

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cmd.cycle_id,
            from_room_id = %from_room_id,
            room_id = %cmd.target_room_id,
            "Cycle moved"
        );
        Ok(MoveCycleResult {
            cycle,
            from_room_id,
        })
    }
}
