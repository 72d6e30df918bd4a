//! CreateRoomHandler - Command handler for creating rooms.

use std::sync::Arc;

use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::room_fields;
use crate::domain::foundation::{CommandMetadata, DomainError, RoomId};
use crate::domain::room::{validate_room_name, Room};
use crate::ports::{DocumentStore, NewDocument, Notifier};

/// Command to create a room.
#[derive(Debug, Clone)]
pub struct CreateRoomCommand {
    pub name: String,
}

/// Result of successful room creation.
#[derive(Debug, Clone)]
pub struct CreateRoomResult {
    pub room: Room,
}

/// Error type for room creation.
#[derive(Debug, Clone)]
pub enum CreateRoomError {
    Domain(DomainError),
}

impl std::fmt::Display for CreateRoomError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateRoomError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateRoomError {}

impl From<DomainError> for CreateRoomError {
    fn from(err: DomainError) -> Self {
        CreateRoomError::Domain(err)
    }
}

/// Handler for creating rooms.
pub struct CreateRoomHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl CreateRoomHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: CreateRoomCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateRoomResult, CreateRoomError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Room created")
    }

    async fn execute(
        &self,
        cmd: CreateRoomCommand,
        metadata: &CommandMetadata,
    ) -> Result<CreateRoomResult, CreateRoomError> {
        let name = validate_room_name(&cmd.name).map_err(DomainError::from)?;

        let paths = UserPaths::new(&metadata.user_id);
        let id = self
            .store
            .create(&paths.rooms(), NewDocument::new(room_fields(&name)?))
            .await?;
        let room = Room::new(RoomId::new(id).map_err(DomainError::from)?, name);

        tracing::info!(user_id = %metadata.user_id, room_id = %room.id, "Room created");
        Ok(CreateRoomResult { room })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::*;
    use crate::domain::foundation::ErrorCode;
    use crate::ports::NotificationLevel;

    #[tokio::test]
    async fn creates_room_with_trimmed_name() {
        let (store, notifier) = harness();
        let handler = CreateRoomHandler::new(store.clone(), notifier.clone());

        let result = handler
            .handle(
                CreateRoomCommand {
                    name: "  Carpa 120 ".to_string(),
                },
                test_metadata(),
            )
            .await
            .unwrap();

        assert_eq!(result.room.name, "Carpa 120");
        let stored = store.documents(&paths().rooms());
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, result.room.id.as_str());
        assert_eq!(notifier.last().unwrap().level, NotificationLevel::Success);
    }

    #[tokio::test]
    async fn rejects_blank_name_before_writing() {
        let (store, notifier) = harness();
        let handler = CreateRoomHandler::new(store.clone(), notifier.clone());

        let result = handler
            .handle(
                CreateRoomCommand {
                    name: "   ".to_string(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(CreateRoomError::Domain(ref e)) if e.code == ErrorCode::ValidationFailed
        ));
        assert_eq!(store.document_count(&paths().rooms()), 0);
        assert_eq!(notifier.errors().len(), 1);
    }

    #[tokio::test]
    async fn reports_store_failure() {
        let (store, notifier) = harness();
        store.set_write_failure(Some(ErrorCode::StoreUnavailable));
        let handler = CreateRoomHandler::new(store.clone(), notifier.clone());

        let result = handler
            .handle(
                CreateRoomCommand {
                    name: "Carpa".to_string(),
                },
                test_metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(CreateRoomError::Domain(ref e)) if e.code == ErrorCode::StoreUnavailable
        ));
        assert_eq!(notifier.errors().len(), 1);
    }
}
