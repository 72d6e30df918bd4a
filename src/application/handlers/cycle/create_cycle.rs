//! CreateCycleHandler - Command handler for creating cultivation cycles.

use std::sync::Arc;

use crate::application::handlers::lookup::room_exists;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::cycle_fields;
use crate::domain::cycle::{Cycle, CycleDetails, NewCycle};
use crate::domain::foundation::{CommandMetadata, CycleId, DomainError, RoomId};
use crate::ports::{DocumentStore, NewDocument, Notifier};

/// Command to create a new cycle.
#[derive(Debug, Clone)]
pub struct CreateCycleCommand {
    pub details: CycleDetails,
}

/// Result of successful cycle creation.
#[derive(Debug, Clone)]
pub struct CreateCycleResult {
    pub cycle: Cycle,
}

/// Error type for cycle creation.
#[derive(Debug, Clone)]
pub enum CreateCycleError {
    /// The room the cycle was placed in does not exist.
    RoomNotFound(RoomId),
    /// Validation or store error.
    Domain(DomainError),
}

impl std::fmt::Display for CreateCycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CreateCycleError::RoomNotFound(id) => write!(f, "Room not found: {}", id),
            CreateCycleError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CreateCycleError {}

impl From<DomainError> for CreateCycleError {
    fn from(err: DomainError) -> Self {
        CreateCycleError::Domain(err)
    }
}

/// Handler for creating cycles.
///
/// A cycle created directly in flowering gets the standard ten-week
/// schedule in the same write.
pub struct CreateCycleHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl CreateCycleHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: CreateCycleCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateCycleResult, CreateCycleError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Cycle created")
    }

    async fn execute(
        &self,
        cmd: CreateCycleCommand,
        metadata: &CommandMetadata,
    ) -> Result<CreateCycleResult, CreateCycleError> {
        // 1. Validate
        let new_cycle = NewCycle::from_details(cmd.details).map_err(DomainError::from)?;

        // 2. The room must exist
        let paths = UserPaths::new(&metadata.user_id);
        let room_id = new_cycle.details().room_id.clone();
        if !room_exists(self.store.as_ref(), &paths, &room_id).await? {
            return Err(CreateCycleError::RoomNotFound(room_id));
        }

        // 3. Write
        let fields = cycle_fields(new_cycle.details(), new_cycle.flowering_weeks())?;
        let id = self
            .store
            .create(&paths.cycles(), NewDocument::new(fields))
            .await?;
        let cycle = Cycle::from_new(CycleId::new(id).map_err(DomainError::from)?, new_cycle);

        tracing::info!(
            user_id = %metadata.user_id,
            cycle_id = %cycle.id(),
            room_id = %cycle.room_id(),
            phase = %cycle.phase(),
            "Cycle created"
        );
        Ok(CreateCycleResult { cycle })
    }
}
