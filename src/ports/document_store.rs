//! DocumentStore port - Interface to the per-user document database.
//!
//! The store holds JSON-like documents in named collections and pushes a full
//! snapshot of a collection to every subscriber whenever it changes. Paths are
//! scoped per user (`users/{userId}/{collection}[/{id}/{subcollection}]`).

use std::fmt;

use async_trait::async_trait;
use futures::stream::BoxStream;
use futures::StreamExt;
use serde_json::{Map, Value};

use crate::domain::foundation::DomainError;

/// Field map of one document.
pub type Fields = Map<String, Value>;

/// Slash-separated path of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CollectionPath(String);

impl CollectionPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the document `id` in this collection.
    pub fn doc(&self, id: impl Into<String>) -> DocumentPath {
        DocumentPath {
            collection: self.clone(),
            id: id.into(),
        }
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Path of a single document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentPath {
    collection: CollectionPath,
    id: String,
}

impl DocumentPath {
    pub fn collection(&self) -> &CollectionPath {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Collection nested under this document.
    pub fn subcollection(&self, name: &str) -> CollectionPath {
        CollectionPath(format!("{}/{}/{}", self.collection.0, self.id, name))
    }
}

impl fmt::Display for DocumentPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Equality filter on a top-level field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    pub field: String,
    pub equals: Value,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, equals: impl Into<Value>) -> Self {
        Self {
            field: field.into(),
            equals: equals.into(),
        }
    }

    pub fn matches(&self, fields: &Fields) -> bool {
        fields.get(&self.field) == Some(&self.equals)
    }
}

/// A stored document with its id.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(id: impl Into<String>, fields: Fields) -> Self {
        Self {
            id: id.into(),
            fields,
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// The complete current contents of a (filtered) collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuerySnapshot {
    pub documents: Vec<Document>,
}

impl QuerySnapshot {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.documents.iter().map(|d| d.id.as_str())
    }
}

/// A document to create.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewDocument {
    pub fields: Fields,
    /// Field the store fills with its own write time.
    pub server_timestamp: Option<String>,
}

impl NewDocument {
    pub fn new(fields: Fields) -> Self {
        Self {
            fields,
            server_timestamp: None,
        }
    }

    pub fn with_server_timestamp(mut self, field: impl Into<String>) -> Self {
        self.server_timestamp = Some(field.into());
        self
    }
}

/// Live view of a collection. Dropping the handle unsubscribes.
pub struct Subscription {
    label: String,
    snapshots: BoxStream<'static, QuerySnapshot>,
}

impl Subscription {
    pub fn new(label: impl Into<String>, snapshots: BoxStream<'static, QuerySnapshot>) -> Self {
        Self {
            label: label.into(),
            snapshots,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Next snapshot, in store order. `None` once the store shuts down.
    pub async fn next(&mut self) -> Option<QuerySnapshot> {
        self.snapshots.next().await
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        tracing::debug!(subscription = %self.label, "Subscription released");
    }
}

/// Port for reading and writing documents.
///
/// Backend failures carry a code for which `ErrorCode::is_store_failure`
/// holds. Updating a missing document fails with `DocumentNotFound`.
/// Nothing is retried.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Subscribe to a collection. The first snapshot is delivered immediately,
    /// then one full snapshot per change.
    async fn subscribe(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<Subscription, DomainError>;

    /// One-shot read of a collection.
    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<QuerySnapshot, DomainError>;

    /// Read a single document.
    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DomainError>;

    /// Create a document; returns its store-assigned id.
    async fn create(
        &self,
        collection: &CollectionPath,
        document: NewDocument,
    ) -> Result<String, DomainError>;

    /// Merge `fields` into an existing document.
    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), DomainError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, path: &DocumentPath) -> Result<(), DomainError>;

    /// Delete several documents in one batch; either all go or none do.
    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<(), DomainError>;

    /// Atomically add `delta` to a numeric field without reading it first.
    async fn increment_field(
        &self,
        path: &DocumentPath,
        field: &str,
        delta: i64,
    ) -> Result<(), DomainError>;
}
