//! In-memory document store with realtime fan-out.
//!
//! Every collection keeps its documents in insertion order plus a broadcast
//! channel. Each write publishes the full new contents of the collection;
//! subscribers apply their own filter to what they receive.
//!
//! ```text
//! users/u1/salas           users/u1/ciclos/c1/logs
//! ├── docs [r1, r2]        ├── docs [l1, l2, l3]
//! └── tx ──► sub A, sub B  └── tx ──► sub C
//! ```

use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use chrono::SecondsFormat;
use futures::stream::{self, StreamExt};
use serde_json::Value;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::adapters::clock::SystemClock;
use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};
use crate::ports::{
    Clock, CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields,
    NewDocument, QuerySnapshot, Subscription,
};

/// Default buffer of each collection's snapshot channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

struct Collection {
    documents: Vec<Document>,
    tx: broadcast::Sender<QuerySnapshot>,
}

impl Collection {
    fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self {
            documents: Vec::new(),
            tx,
        }
    }

    fn snapshot(&self) -> QuerySnapshot {
        QuerySnapshot::new(self.documents.clone())
    }

    fn position(&self, id: &str) -> Option<usize> {
        position(&self.documents, id)
    }

    fn publish(&self) {
        // No receivers is fine.
        let _ = self.tx.send(self.snapshot());
    }
}

#[derive(Default)]
struct StoreState {
    collections: BTreeMap<CollectionPath, Collection>,
    last_timestamp: Option<Timestamp>,
}

/// A single write against the store.
pub(crate) enum WriteOp {
    Create {
        collection: CollectionPath,
        id: String,
        document: NewDocument,
    },
    Update {
        path: DocumentPath,
        fields: Fields,
    },
    Delete {
        paths: Vec<DocumentPath>,
    },
    Increment {
        path: DocumentPath,
        field: String,
        delta: i64,
    },
}

/// New contents of every collection a write touches, not yet visible.
pub(crate) struct StagedWrite {
    changes: BTreeMap<CollectionPath, Vec<Document>>,
    last_timestamp: Option<Timestamp>,
}

impl StagedWrite {
    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    fn working(&mut self, state: &StoreState, path: &CollectionPath) -> &mut Vec<Document> {
        self.changes.entry(path.clone()).or_insert_with(|| {
            state
                .collections
                .get(path)
                .map(|c| c.documents.clone())
                .unwrap_or_default()
        })
    }
}

impl StoreState {
    fn collection_mut(&mut self, path: &CollectionPath, capacity: usize) -> &mut Collection {
        self.collections
            .entry(path.clone())
            .or_insert_with(|| Collection::new(capacity))
    }

    /// Server write time, strictly increasing across writes.
    fn next_timestamp(&self, now: Timestamp) -> Timestamp {
        match self.last_timestamp {
            Some(last) if !now.is_after(&last) => last.plus_millis(1),
            _ => now,
        }
    }

    /// Computes the outcome of `op` without changing anything.
    fn stage(&self, op: WriteOp, now: Timestamp) -> Result<StagedWrite, DomainError> {
        let mut staged = StagedWrite {
            changes: BTreeMap::new(),
            last_timestamp: None,
        };
        match op {
            WriteOp::Create {
                collection,
                id,
                document,
            } => {
                let mut fields = document.fields;
                if let Some(field) = document.server_timestamp {
                    let stamp = self.next_timestamp(now);
                    fields.insert(field, timestamp_value(&stamp));
                    staged.last_timestamp = Some(stamp);
                }
                staged
                    .working(self, &collection)
                    .push(Document::new(id, fields));
            }
            WriteOp::Update { path, fields } => {
                let documents = staged.working(self, path.collection());
                let index = position(documents, path.id()).ok_or_else(|| not_found(&path))?;
                documents[index].fields.extend(fields);
            }
            WriteOp::Delete { paths } => {
                for path in &paths {
                    let found = self
                        .collections
                        .get(path.collection())
                        .map_or(false, |c| c.position(path.id()).is_some())
                        || staged.changes.contains_key(path.collection());
                    if !found {
                        continue;
                    }
                    let documents = staged.working(self, path.collection());
                    if let Some(index) = position(documents, path.id()) {
                        documents.remove(index);
                    }
                }
            }
            WriteOp::Increment { path, field, delta } => {
                let documents = staged.working(self, path.collection());
                let index = position(documents, path.id()).ok_or_else(|| not_found(&path))?;
                let fields = &mut documents[index].fields;
                let next = add_to_field(fields.get(&field), delta);
                fields.insert(field, next);
            }
        }
        Ok(staged)
    }

    /// Installs staged contents and publishes once per touched collection.
    fn commit(&mut self, staged: StagedWrite, capacity: usize) {
        if let Some(stamp) = staged.last_timestamp {
            self.last_timestamp = Some(stamp);
        }
        for (path, documents) in staged.changes {
            let collection = self.collection_mut(&path, capacity);
            collection.documents = documents;
            collection.publish();
        }
    }
}

fn position(documents: &[Document], id: &str) -> Option<usize> {
    documents.iter().position(|d| d.id == id)
}

/// Document store held entirely in memory.
///
/// Backs tests and the file-backed store. Writes can be made to fail with a
/// chosen error code to exercise failure paths.
pub struct InMemoryDocumentStore {
    state: RwLock<StoreState>,
    write_failure: RwLock<Option<ErrorCode>>,
    clock: Arc<dyn Clock>,
    channel_capacity: usize,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn with_capacity(channel_capacity: usize) -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            write_failure: RwLock::new(None),
            clock: Arc::new(SystemClock),
            channel_capacity: channel_capacity.max(1),
        }
    }

    /// Uses `clock` for server timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // === Test Helpers ===

    /// Makes every following write fail with `code`, or succeed again on `None`.
    pub fn set_write_failure(&self, code: Option<ErrorCode>) {
        let mut failure = self
            .write_failure
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *failure = code;
    }

    /// Current documents of a collection, in insertion order.
    pub fn documents(&self, collection: &CollectionPath) -> Vec<Document> {
        self.state
            .read()
            .map(|state| {
                state
                    .collections
                    .get(collection)
                    .map(|c| c.documents.clone())
                    .unwrap_or_default()
            })
            .unwrap_or_default()
    }

    pub fn document_count(&self, collection: &CollectionPath) -> usize {
        self.documents(collection).len()
    }

    // === Persistence ===

    /// Copies out every non-empty collection.
    pub fn export(&self) -> Result<BTreeMap<CollectionPath, Vec<Document>>, DomainError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .collections
            .iter()
            .filter(|(_, c)| !c.documents.is_empty())
            .map(|(path, c)| (path.clone(), c.documents.clone()))
            .collect())
    }

    /// Replaces the contents of the given collections and notifies subscribers.
    pub fn import(
        &self,
        collections: BTreeMap<CollectionPath, Vec<Document>>,
    ) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(poisoned)?;
        for (path, documents) in collections {
            let collection = state.collection_mut(&path, self.channel_capacity);
            collection.documents = documents;
            collection.publish();
        }
        Ok(())
    }

    // === Staged writes ===

    /// Applies `op` and notifies subscribers of every touched collection.
    fn apply(&self, op: WriteOp) -> Result<(), DomainError> {
        self.check_writable()?;
        let now = self.clock.now();
        let mut state = self.state.write().map_err(poisoned)?;
        let staged = state.stage(op, now)?;
        state.commit(staged, self.channel_capacity);
        Ok(())
    }

    /// Computes the outcome of `op` without making it visible.
    ///
    /// The caller must hold off other writers until [`Self::commit`], since
    /// the staged contents replace whole collections.
    pub(crate) fn stage(&self, op: WriteOp) -> Result<StagedWrite, DomainError> {
        self.check_writable()?;
        let now = self.clock.now();
        let state = self.state.read().map_err(poisoned)?;
        state.stage(op, now)
    }

    /// Every non-empty collection as it will be once `staged` is committed.
    pub(crate) fn export_staged(
        &self,
        staged: &StagedWrite,
    ) -> Result<BTreeMap<CollectionPath, Vec<Document>>, DomainError> {
        let mut collections = self.export()?;
        for (path, documents) in &staged.changes {
            if documents.is_empty() {
                collections.remove(path);
            } else {
                collections.insert(path.clone(), documents.clone());
            }
        }
        Ok(collections)
    }

    pub(crate) fn commit(&self, staged: StagedWrite) -> Result<(), DomainError> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.commit(staged, self.channel_capacity);
        Ok(())
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        let failure = self.write_failure.read().map_err(poisoned)?;
        match *failure {
            Some(code) => Err(DomainError::new(code, "Injected store write failure")),
            None => Ok(()),
        }
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> DomainError {
    DomainError::new(ErrorCode::InternalError, "Document store lock poisoned")
}

fn not_found(path: &DocumentPath) -> DomainError {
    DomainError::new(ErrorCode::DocumentNotFound, "Document not found")
        .with_detail("path", path.to_string())
}

fn apply_filter(snapshot: QuerySnapshot, filter: Option<&FieldFilter>) -> QuerySnapshot {
    match filter {
        Some(filter) => QuerySnapshot::new(
            snapshot
                .documents
                .into_iter()
                .filter(|d| filter.matches(&d.fields))
                .collect(),
        ),
        None => snapshot,
    }
}

fn timestamp_value(stamp: &Timestamp) -> Value {
    Value::String(
        stamp
            .as_datetime()
            .to_rfc3339_opts(SecondsFormat::Millis, true),
    )
}

fn add_to_field(current: Option<&Value>, delta: i64) -> Value {
    match current {
        Some(Value::Number(n)) => match n.as_i64() {
            Some(i) => Value::from(i.saturating_add(delta)),
            None => n
                .as_f64()
                .and_then(|f| serde_json::Number::from_f64(f + delta as f64))
                .map(Value::Number)
                .unwrap_or_else(|| Value::from(delta)),
        },
        _ => Value::from(delta),
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn subscribe(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<Subscription, DomainError> {
        let (initial, rx) = {
            let mut state = self.state.write().map_err(poisoned)?;
            let entry = state.collection_mut(collection, self.channel_capacity);
            (entry.snapshot(), entry.tx.subscribe())
        };

        let label = collection.to_string();
        tracing::debug!(collection = %label, "Subscription opened");

        let initial = apply_filter(initial, filter.as_ref());
        let updates = stream::unfold((rx, filter, label.clone()), |(mut rx, filter, label)| async move {
            loop {
                match rx.recv().await {
                    Ok(snapshot) => {
                        let snapshot = apply_filter(snapshot, filter.as_ref());
                        return Some((snapshot, (rx, filter, label)));
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        tracing::warn!(collection = %label, skipped, "Subscriber lagged; resuming at oldest buffered snapshot");
                    }
                    Err(RecvError::Closed) => return None,
                }
            }
        });

        Ok(Subscription::new(
            label,
            stream::once(async move { initial }).chain(updates).boxed(),
        ))
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<QuerySnapshot, DomainError> {
        let state = self.state.read().map_err(poisoned)?;
        let snapshot = state
            .collections
            .get(collection)
            .map(Collection::snapshot)
            .unwrap_or_default();
        Ok(apply_filter(snapshot, filter.as_ref()))
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DomainError> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.collections.get(path.collection()).and_then(|c| {
            c.position(path.id()).map(|i| c.documents[i].clone())
        }))
    }

    async fn create(
        &self,
        collection: &CollectionPath,
        document: NewDocument,
    ) -> Result<String, DomainError> {
        let id = Uuid::new_v4().simple().to_string();
        self.apply(WriteOp::Create {
            collection: collection.clone(),
            id: id.clone(),
            document,
        })?;
        tracing::debug!(collection = %collection, id = %id, "Document created");
        Ok(id)
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), DomainError> {
        self.apply(WriteOp::Update {
            path: path.clone(),
            fields,
        })
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), DomainError> {
        self.apply(WriteOp::Delete {
            paths: vec![path.clone()],
        })
    }

    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<(), DomainError> {
        self.apply(WriteOp::Delete {
            paths: paths.to_vec(),
        })?;
        tracing::debug!(count = paths.len(), "Batch delete applied");
        Ok(())
    }

    async fn increment_field(
        &self,
        path: &DocumentPath,
        field: &str,
        delta: i64,
    ) -> Result<(), DomainError> {
        self.apply(WriteOp::Increment {
            path: path.clone(),
            field: field.to_string(),
            delta,
        })
    }
}
