//! DeleteRoomHandler - Deletes a room together with its cycles and their logs.

use std::sync::Arc;

use crate::application::handlers::lookup::{log_paths, room_exists};
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::ROOM_ID_FIELD;
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, RoomId};
use crate::ports::{DocumentStore, FieldFilter, Notifier};

/// Command to delete a room.
#[derive(Debug, Clone)]
pub struct DeleteRoomCommand {
    pub room_id: RoomId,
}

/// Result of successful room deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRoomResult {
    pub cycles_deleted: usize,
    pub logs_deleted: usize,
}

/// Error type for room deletion.
#[derive(Debug, Clone)]
pub enum DeleteRoomError {
    RoomNotFound(RoomId),
    Domain(DomainError),
}

impl std::fmt::Display for DeleteRoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeleteRoomError::RoomNotFound(id) => write!(f, "Room not found: {}", id),
            DeleteRoomError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for DeleteRoomError {}

impl From<DomainError> for DeleteRoomError {
    fn from(err: DomainError) -> Self {
        DeleteRoomError::Domain(err)
    }
}

/// Handler for deleting rooms.
///
/// Every log of every cycle in the room, the cycles and the room itself go
/// in a single batch, so a failed write leaves all of them in place.
pub struct DeleteRoomHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl DeleteRoomHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: DeleteRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<DeleteRoomResult, DeleteRoomError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Room deleted")
    }

    async fn execute(
        &self,
        cmd: DeleteRoomCommand,
        metadata: &CommandMetadata,
    ) -> Result<DeleteRoomResult, DeleteRoomError> {
        let paths = UserPaths::new(&metadata.user_id);
        let store = self.store.as_ref();

        if !room_exists(store, &paths, &cmd.room_id).await? {
            return Err(DeleteRoomError::RoomNotFound(cmd.room_id));
        }

        // 1. Cycles owned by the room
        let cycles = store
            .query(
                &paths.cycles(),
                Some(FieldFilter::eq(ROOM_ID_FIELD, cmd.room_id.as_str())),
            )
            .await?;

        // 2. Logs first, then cycles, then the room
        let mut batch = Vec::new();
        for id in cycles.ids() {
            let cycle_id = CycleId::new(id).map_err(DomainError::from)?;
            batch.extend(log_paths(store, &paths, &cycle_id).await?);
        }
        let logs_deleted = batch.len();
        batch.extend(cycles.ids().map(|id| paths.cycles().doc(id)));
        batch.push(paths.room(&cmd.room_id));

        // 3. One batch
        store.batch_delete(&batch).await?;

        tracing::info!(
            user_id = %metadata.user_id,
            room_id = %cmd.room_id,
            cycles = cycles.len(),
            logs = logs_deleted,
            "Room deleted"
        );
        Ok(DeleteRoomResult {
            cycles_deleted: cycles.len(),
            logs_deleted,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::cycle::{CycleDetails, CyclePhase};
    use crate::domain::foundation::ErrorCode;
    use crate::domain::log::{LogDetails, NewLog};

    #[tokio::test]
    async fn deletes_room_cycles_and_logs() {
        let (store, notifier) = harness();
        let room_id = seed_room(&store, "Carpa").await;
        let other_room = seed_room(&store, "Armario").await;
        let cycle_id = seed_cycle(
            &store,
            CycleDetails::new("Lemon", room_id.clone(), CyclePhase::Flowering),
        )
        .await;
        let kept_cycle = seed_cycle(
            &store,
            CycleDetails::new("Mother", other_room.clone(), CyclePhase::Vegetative),
        )
        .await;
        seed_log(&store, &cycle_id, NewLog::new(1, LogDetails::pruning("Apical", None))).await;
        seed_log(&store, &cycle_id, NewLog::new(2, LogDetails::pruning("LST", None))).await;

        let handler = DeleteRoomHandler::new(store.clone(), notifier);
        let result = handler
            .handle(
                DeleteRoomCommand {
                    room_id: room_id.clone(),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(
            result,
            DeleteRoomResult {
                cycles_deleted: 1,
                logs_deleted: 2
            }
        );
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 0);
        let remaining: Vec<String> = store
            .documents(&paths().cycles())
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(remaining, vec![kept_cycle.to_string()]);
        assert_eq!(store.document_count(&paths().rooms()), 1);
    }

    #[tokio::test]
    async fn failed_batch_leaves_everything_in_place() {
        let (store, notifier) = harness();
        let room_id = seed_room(&store, "Carpa").await;
        let cycle_id = seed_cycle(
            &store,
            CycleDetails::new("Lemon", room_id.clone(), CyclePhase::Vegetative),
        )
        .await;
        seed_log(&store, &cycle_id, NewLog::new(1, LogDetails::pruning("Apical", None))).await;

        store.set_write_failure(Some(ErrorCode::PermissionDenied));
        let handler = DeleteRoomHandler::new(store.clone(), notifier.clone());
        let result = handler
            .handle(DeleteRoomCommand { room_id }, test_metadata())
            .await;

        assert!(matches!(
            result,
            Err(DeleteRoomError::Domain(ref e)) if e.code == ErrorCode::PermissionDenied
        ));
        assert_eq!(store.document_count(&paths().rooms()), 1);
        assert_eq!(store.document_count(&paths().cycles()), 1);
        assert_eq!(store.document_count(&paths().cycle_logs(&cycle_id)), 1);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn fails_when_room_not_found() {
        let (store, notifier) = harness();
        let handler = DeleteRoomHandler::new(store, notifier);
        let result = handler
            .handle(
                DeleteRoomCommand {
                    room_id: RoomId::new("ghost").unwrap(),
                },
                test_metadata(),
            )
            .await;
        assert!(matches!(result, Err(DeleteRoomError::RoomNotFound(_))));
    }
}
