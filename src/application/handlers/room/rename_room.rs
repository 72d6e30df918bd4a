//! RenameRoomHandler - Command handler for renaming rooms.

use std::sync::Arc;

use crate::application::handlers::lookup::is_missing_document;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::room_fields;
use crate::domain::foundation::{CommandMetadata, DomainError, RoomId};
use crate::domain::room::{validate_room_name, Room};
use crate::ports::{DocumentStore, Notifier};

/// Command to rename a room.
#[derive(Debug, Clone)]
pub struct RenameRoomCommand {
    pub room_id: RoomId,
    pub name: String,
}

/// Result of successful room rename.
#[derive(Debug, Clone)]
pub struct RenameRoomResult {
    pub room: Room,
}

/// Error type for room rename.
#[derive(Debug, Clone)]
pub enum RenameRoomError {
    RoomNotFound(RoomId),
    Domain(DomainError),
}

impl std::fmt::Display for RenameRoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenameRoomError::RoomNotFound(id) => write!(f, "Room not found: {}", id),
            RenameRoomError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RenameRoomError {}

impl From<DomainError> for RenameRoomError {
    fn from(err: DomainError) -> Self {
        RenameRoomError::Domain(err)
    }
}

/// Handler for renaming rooms.
pub struct RenameRoomHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl RenameRoomHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: RenameRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<RenameRoomResult, RenameRoomError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Room renamed")
    }

    async fn execute(
        &self,
        cmd: RenameRoomCommand,
        metadata: &CommandMetadata,
    ) -> Result<RenameRoomResult, RenameRoomError> {
        let name = validate_room_name(&cmd.name).map_err(DomainError::from)?;

        let paths = UserPaths::new(&metadata.user_id);
        match self
            .store
            .update(&paths.room(&cmd.room_id), room_fields(&name)?)
            .await
        {
            Ok(()) => {}
            Err(err) if is_missing_document(&err) => {
                return Err(RenameRoomError::RoomNotFound(cmd.room_id))
            }
            Err(err) => return Err(err.into()),
        }

        tracing::info!(user_id = %metadata.user_id, room_id = %cmd.room_id, "Room renamed");
        Ok(RenameRoomResult {
            room: Room::new(cmd.room_id, name),
        })
    }
}
