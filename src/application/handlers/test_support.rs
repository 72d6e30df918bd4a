//! Shared fixtures for handler tests.

use std::sync::Arc;

use serde_json::Value;

use crate::adapters::{InMemoryDocumentStore, RecordingNotifier};
use crate::application::paths::UserPaths;
use crate::application::records::{cycle_fields, log_document, room_fields};
use crate::domain::cycle::{CycleDetails, NewCycle};
use crate::domain::foundation::{CommandMetadata, CycleId, LogId, RoomId, UserId};
use crate::domain::log::NewLog;
use crate::ports::{DocumentStore, Fields, NewDocument};

pub(crate) fn test_user_id() -> UserId {
    UserId::new("grower-1").unwrap()
}

pub(crate) fn test_metadata() -> CommandMetadata {
    CommandMetadata::new(test_user_id()).with_correlation_id("test-correlation")
}

pub(crate) fn paths() -> UserPaths {
    UserPaths::new(&test_user_id())
}

pub(crate) fn harness() -> (Arc<InMemoryDocumentStore>, Arc<RecordingNotifier>) {
    (
        Arc::new(InMemoryDocumentStore::new()),
        Arc::new(RecordingNotifier::new()),
    )
}

pub(crate) fn fields(value: Value) -> Fields {
    value.as_object().cloned().unwrap_or_default()
}

pub(crate) async fn seed_room(store: &InMemoryDocumentStore, name: &str) -> RoomId {
    let id = store
        .create(&paths().rooms(), NewDocument::new(room_fields(name).unwrap()))
        .await
        .unwrap();
    RoomId::new(id).unwrap()
}

pub(crate) async fn seed_cycle(store: &InMemoryDocumentStore, details: CycleDetails) -> CycleId {
    let new_cycle = NewCycle::from_details(details).unwrap();
    let fields = cycle_fields(new_cycle.details(), new_cycle.flowering_weeks()).unwrap();
    let id = store
        .create(&paths().cycles(), NewDocument::new(fields))
        .await
        .unwrap();
    CycleId::new(id).unwrap()
}

pub(crate) async fn seed_log(store: &InMemoryDocumentStore, cycle_id: &CycleId, log: NewLog) -> LogId {
    let id = store
        .create(&paths().cycle_logs(cycle_id), log_document(&log).unwrap())
        .await
        .unwrap();
    LogId::new(id).unwrap()
}
