//! Workspace - Realtime state of one signed-in user.
//!
//! Opening a workspace subscribes to the user's rooms, cycles, genetics and
//! seeds. A background task per subscription decodes every snapshot and
//! replaces the matching [`LiveCache`] table. At most one subscription is
//! held per [`QueryKey`]; installing a new one aborts the previous task,
//! which drops its [`Subscription`]. Dropping the workspace (sign-out)
//! releases everything.
//!
//! ```text
//! store ──snapshot──► table task ──replace──► LiveCache ──view──► overview
//!   └────snapshot──► log view task ◄──cycle weeks──┘
//!                          └──WeekBuckets──► CycleLogView
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::domain::cycle::Cycle;
use crate::domain::foundation::{CycleId, DomainError, ErrorCode, UserId};
use crate::domain::inventory::{Genetic, Seed};
use crate::domain::log::{bucket_and_sort, LogEntry, WeekBuckets};
use crate::domain::overview::{filter_by_name, room_overviews, RoomOverview};
use crate::ports::{Clock, Document, DocumentStore, QuerySnapshot, Subscription};

use super::cache::{CacheView, LiveCache, Table};
use super::paths::UserPaths;
use super::records::{decode_cycle, decode_genetic, decode_log, decode_room, decode_seed, RecordError};

/// Logical query a subscription serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Table(Table),
    /// The log list of the cycle currently open in detail.
    CycleLogs,
}

/// A spawned snapshot loop, aborted when dropped.
struct SyncTask {
    handle: JoinHandle<()>,
}

impl Drop for SyncTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

pub struct Workspace {
    user_id: UserId,
    paths: UserPaths,
    store: Arc<dyn DocumentStore>,
    clock: Arc<dyn Clock>,
    cache: LiveCache,
    tasks: Mutex<HashMap<QueryKey, SyncTask>>,
}

impl Workspace {
    /// Signs in `user_id` and starts the collection subscriptions.
    pub async fn open(
        user_id: UserId,
        store: Arc<dyn DocumentStore>,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, DomainError> {
        let workspace = Self {
            paths: UserPaths::new(&user_id),
            user_id,
            store,
            clock,
            cache: LiveCache::new(),
            tasks: Mutex::new(HashMap::new()),
        };
        for table in Table::ALL {
            workspace.sync_table(table).await?;
        }
        tracing::info!(user_id = %workspace.user_id, "Workspace opened");
        Ok(workspace)
    }

    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }

    pub fn paths(&self) -> &UserPaths {
        &self.paths
    }

    pub fn cache(&self) -> &LiveCache {
        &self.cache
    }

    pub fn view(&self) -> CacheView {
        self.cache.view()
    }

    /// Waits until the cache satisfies `predicate` and returns that view.
    pub async fn wait_until(&self, predicate: impl Fn(&CacheView) -> bool) -> CacheView {
        let mut changes = self.cache.changes();
        loop {
            {
                let view = changes.borrow_and_update();
                if predicate(&view) {
                    return view.clone();
                }
            }
            if changes.changed().await.is_err() {
                return self.cache.view();
            }
        }
    }

    /// Waits for the first snapshot of every table.
    pub async fn synced(&self) -> CacheView {
        self.wait_until(CacheView::all_synced).await
    }

    // ───────────────────────────────────────────────────────────────
    // Read models
    // ───────────────────────────────────────────────────────────────

    pub fn room_overview(&self, filter: &str) -> Vec<RoomOverview> {
        let view = self.view();
        room_overviews(view.rooms(), view.cycles(), filter, &self.clock.now())
    }

    pub fn genetics_matching(&self, filter: &str) -> Vec<Genetic> {
        let view = self.view();
        filter_by_name(view.genetics(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    pub fn seeds_matching(&self, filter: &str) -> Vec<Seed> {
        let view = self.view();
        filter_by_name(view.seeds(), filter)
            .into_iter()
            .cloned()
            .collect()
    }

    // ───────────────────────────────────────────────────────────────
    // Subscriptions
    // ───────────────────────────────────────────────────────────────

    /// Opens the log view of a cycle, replacing any log view already open.
    pub async fn open_cycle_logs(&self, cycle_id: &CycleId) -> Result<CycleLogView, DomainError> {
        let subscription = self
            .store
            .subscribe(&self.paths.cycle_logs(cycle_id), None)
            .await?;
        let (tx, rx) = watch::channel(None);
        let handle = tokio::spawn(run_log_view(
            cycle_id.clone(),
            subscription,
            self.cache.changes(),
            Arc::clone(&self.clock),
            tx,
        ));
        self.install(QueryKey::CycleLogs, handle)?;
        tracing::debug!(user_id = %self.user_id, cycle_id = %cycle_id, "Cycle log view opened");
        Ok(CycleLogView {
            cycle_id: cycle_id.clone(),
            rx,
        })
    }

    /// Releases the open log view, if any.
    pub fn close_cycle_logs(&self) {
        let removed = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&QueryKey::CycleLogs);
        if removed.is_some() {
            tracing::debug!(user_id = %self.user_id, "Cycle log view closed");
        }
    }

    pub fn active_subscriptions(&self) -> Vec<QueryKey> {
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }

    /// Signs out, releasing every subscription.
    pub fn sign_out(self) {}

    async fn sync_table(&self, table: Table) -> Result<(), DomainError> {
        let collection = match table {
            Table::Rooms => self.paths.rooms(),
            Table::Cycles => self.paths.cycles(),
            Table::Genetics => self.paths.genetics(),
            Table::Seeds => self.paths.seeds(),
        };
        let subscription = self.store.subscribe(&collection, None).await?;
        let handle = tokio::spawn(run_table_sync(table, subscription, self.cache.clone()));
        self.install(QueryKey::Table(table), handle)
    }

    fn install(&self, key: QueryKey, handle: JoinHandle<()>) -> Result<(), DomainError> {
        let previous = {
            let mut tasks = self.tasks.lock().map_err(|_| {
                DomainError::new(ErrorCode::InternalError, "Workspace task registry poisoned")
            })?;
            tasks.insert(key, SyncTask { handle })
        };
        if previous.is_some() {
            tracing::debug!(user_id = %self.user_id, ?key, "Replaced existing subscription");
        }
        Ok(())
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        tracing::info!(user_id = %self.user_id, "Workspace closed");
    }
}

/// Week buckets of one cycle, recomputed on every log snapshot and every
/// change of the cycle's week list.
#[derive(Debug)]
pub struct CycleLogView {
    cycle_id: CycleId,
    rx: watch::Receiver<Option<WeekBuckets>>,
}

impl CycleLogView {
    pub fn cycle_id(&self) -> &CycleId {
        &self.cycle_id
    }

    /// Latest buckets; `None` before the first log snapshot.
    pub fn current(&self) -> Option<WeekBuckets> {
        self.rx.borrow().clone()
    }

    /// False once the view was replaced or closed.
    pub fn is_active(&self) -> bool {
        self.rx.has_changed().is_ok()
    }

    /// Waits for the next recomputation; `None` once the view is inactive.
    pub async fn changed(&mut self) -> Option<WeekBuckets> {
        self.rx.changed().await.ok()?;
        self.rx.borrow_and_update().clone()
    }

    /// Waits until the buckets satisfy `predicate`; `None` once the view is inactive.
    pub async fn wait_until(
        &mut self,
        predicate: impl Fn(&WeekBuckets) -> bool,
    ) -> Option<WeekBuckets> {
        loop {
            {
                let current = self.rx.borrow_and_update();
                if let Some(buckets) = current.as_ref().filter(|b| predicate(b)) {
                    return Some(buckets.clone());
                }
            }
            if self.rx.changed().await.is_err() {
                return None;
            }
        }
    }
}

fn decode_all<T>(
    snapshot: &QuerySnapshot,
    kind: &'static str,
    decode: impl Fn(&Document) -> Result<T, RecordError>,
) -> Vec<T> {
    snapshot
        .documents
        .iter()
        .filter_map(|document| match decode(document) {
            Ok(entity) => Some(entity),
            Err(err) => {
                tracing::warn!(kind, id = %document.id, error = %err, "Skipping unreadable record");
                None
            }
        })
        .collect()
}

async fn run_table_sync(table: Table, mut subscription: Subscription, cache: LiveCache) {
    while let Some(snapshot) = subscription.next().await {
        match table {
            Table::Rooms => cache.replace_rooms(decode_all(&snapshot, "room", decode_room)),
            Table::Cycles => cache.replace_cycles(decode_all(&snapshot, "cycle", decode_cycle)),
            Table::Genetics => {
                cache.replace_genetics(decode_all(&snapshot, "genetic", decode_genetic))
            }
            Table::Seeds => cache.replace_seeds(decode_all(&snapshot, "seed", decode_seed)),
        }
        tracing::trace!(?table, documents = snapshot.len(), "Table replaced");
    }
    tracing::debug!(?table, "Snapshot stream ended");
}

fn week_numbers_of(view: &CacheView, cycle_id: &CycleId) -> Vec<u32> {
    view.cycle(cycle_id)
        .map(Cycle::week_numbers)
        .unwrap_or_default()
}

async fn run_log_view(
    cycle_id: CycleId,
    mut subscription: Subscription,
    mut cache_changes: watch::Receiver<CacheView>,
    clock: Arc<dyn Clock>,
    tx: watch::Sender<Option<WeekBuckets>>,
) {
    let mut logs: Vec<LogEntry> = Vec::new();
    let mut weeks = week_numbers_of(&cache_changes.borrow_and_update(), &cycle_id);
    let mut loaded = false;

    loop {
        tokio::select! {
            snapshot = subscription.next() => {
                let Some(snapshot) = snapshot else { break };
                let now = clock.now();
                logs = decode_all(&snapshot, "log", |doc| decode_log(&cycle_id, doc, now));
                loaded = true;
            }
            changed = cache_changes.changed() => {
                if changed.is_err() {
                    break;
                }
                let latest = week_numbers_of(&cache_changes.borrow_and_update(), &cycle_id);
                if latest == weeks {
                    continue;
                }
                weeks = latest;
                if !loaded {
                    continue;
                }
            }
        }

        let buckets = bucket_and_sort(logs.iter().cloned(), &weeks);
        tracing::debug!(
            cycle_id = %cycle_id,
            weeks = weeks.len(),
            logs = buckets.total_logs(),
            excluded = buckets.excluded(),
            "Log view recomputed"
        );
        if tx.send(Some(buckets)).is_err() {
            break;
        }
    }
}
