//! Fresh reads used by command handlers before they write.

use crate::application::paths::UserPaths;
use crate::application::records::{decode_cycle, decode_seed};
use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, RoomId, SeedId};
use crate::domain::inventory::Seed;
use crate::ports::{DocumentPath, DocumentStore};

pub(crate) async fn room_exists(
    store: &dyn DocumentStore,
    paths: &UserPaths,
    room_id: &RoomId,
) -> Result<bool, DomainError> {
    Ok(store.get(&paths.room(room_id)).await?.is_some())
}

pub(crate) async fn load_cycle(
    store: &dyn DocumentStore,
    paths: &UserPaths,
    cycle_id: &CycleId,
) -> Result<Option<Cycle>, DomainError> {
    match store.get(&paths.cycle(cycle_id)).await? {
        Some(document) => Ok(Some(decode_cycle(&document)?)),
        None => Ok(None),
    }
}

pub(crate) async fn load_seed(
    store: &dyn DocumentStore,
    paths: &UserPaths,
    seed_id: &SeedId,
) -> Result<Option<Seed>, DomainError> {
    match store.get(&paths.seed(seed_id)).await? {
        Some(document) => Ok(Some(decode_seed(&document)?)),
        None => Ok(None),
    }
}

/// Paths of every log of a cycle.
pub(crate) async fn log_paths(
    store: &dyn DocumentStore,
    paths: &UserPaths,
    cycle_id: &CycleId,
) -> Result<Vec<DocumentPath>, DomainError> {
    let logs = paths.cycle_logs(cycle_id);
    let snapshot = store.query(&logs, None).await?;
    Ok(snapshot.ids().map(|id| logs.doc(id)).collect())
}

/// True when a write failed because its target document is gone.
pub(crate) fn is_missing_document(err: &DomainError) -> bool {
    err.code == ErrorCode::DocumentNotFound
}
