//! File-backed document store.
//!
//! Keeps the working set in an [`InMemoryDocumentStore`]. Each write is staged,
//! the resulting data set is written as JSON to `<data_dir>/store.json`, and
//! only then is the write committed and published. A write whose file update
//! fails leaves both the file and the live data untouched.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode};
use crate::ports::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields, NewDocument,
    QuerySnapshot, Subscription,
};

use super::in_memory::{StagedWrite, WriteOp};
use super::InMemoryDocumentStore;

const STORE_FILE: &str = "store.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedStore {
    collections: BTreeMap<String, Vec<PersistedDocument>>,
}

#[derive(Debug, Serialize, Deserialize)]
struct PersistedDocument {
    id: String,
    fields: Fields,
}

/// Document store persisted to a JSON file.
pub struct FileDocumentStore {
    inner: InMemoryDocumentStore,
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Opens the store in `data_dir`, loading existing data if present.
    pub async fn open(
        data_dir: impl AsRef<Path>,
        channel_capacity: usize,
    ) -> Result<Self, DomainError> {
        let data_dir = data_dir.as_ref();
        fs::create_dir_all(data_dir).await.map_err(io_error)?;

        let file_path = data_dir.join(STORE_FILE);
        let inner = InMemoryDocumentStore::with_capacity(channel_capacity);

        if fs::try_exists(&file_path).await.map_err(io_error)? {
            let raw = fs::read_to_string(&file_path).await.map_err(io_error)?;
            let persisted: PersistedStore = serde_json::from_str(&raw).map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to parse store file: {}", e),
                )
                .with_detail("path", file_path.display().to_string())
            })?;
            let count: usize = persisted.collections.values().map(Vec::len).sum();
            inner.import(from_persisted(persisted))?;
            tracing::info!(path = %file_path.display(), documents = count, "Loaded document store");
        } else {
            tracing::info!(path = %file_path.display(), "Starting empty document store");
        }

        Ok(Self {
            inner,
            file_path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// Stages `op`, persists the outcome, then makes it visible.
    async fn write(&self, op: WriteOp) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let staged = self.inner.stage(op)?;
        if staged.is_empty() {
            return Ok(());
        }
        if let Err(err) = self.persist(&staged).await {
            tracing::error!(error = %err, path = %self.file_path.display(), "Failed to persist document store");
            return Err(err);
        }
        self.inner.commit(staged)
    }

    /// Replaces the file with the data set `staged` would produce.
    async fn persist(&self, staged: &StagedWrite) -> Result<(), DomainError> {
        let persisted = to_persisted(self.inner.export_staged(staged)?);
        let json = serde_json::to_string_pretty(&persisted).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize store: {}", e),
            )
        })?;

        let tmp = self.file_path.with_extension("json.tmp");
        fs::write(&tmp, json).await.map_err(io_error)?;
        fs::rename(&tmp, &self.file_path).await.map_err(io_error)?;
        Ok(())
    }
}

fn io_error(err: std::io::Error) -> DomainError {
    DomainError::new(ErrorCode::DatabaseError, format!("Store file I/O failed: {}", err))
}

fn from_persisted(persisted: PersistedStore) -> BTreeMap<CollectionPath, Vec<Document>> {
    persisted
        .collections
        .into_iter()
        .map(|(path, docs)| {
            (
                CollectionPath::new(path),
                docs.into_iter()
                    .map(|d| Document::new(d.id, d.fields))
                    .collect(),
            )
        })
        .collect()
}

fn to_persisted(collections: BTreeMap<CollectionPath, Vec<Document>>) -> PersistedStore {
    PersistedStore {
        collections: collections
            .into_iter()
            .map(|(path, docs)| {
                (
                    path.as_str().to_string(),
                    docs.into_iter()
                        .map(|d| PersistedDocument {
                            id: d.id,
                            fields: d.fields,
                        })
                        .collect(),
                )
            })
            .collect(),
    }
}

#[async_trait]
impl DocumentStore for FileDocumentStore {
    async fn subscribe(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<Subscription, DomainError> {
        self.inner.subscribe(collection, filter).await
    }

    async fn query(
        &self,
        collection: &CollectionPath,
        filter: Option<FieldFilter>,
    ) -> Result<QuerySnapshot, DomainError> {
        self.inner.query(collection, filter).await
    }

    async fn get(&self, path: &DocumentPath) -> Result<Option<Document>, DomainError> {
        self.inner.get(path).await
    }

    async fn create(
        &self,
        collection: &CollectionPath,
        document: NewDocument,
    ) -> Result<String, DomainError> {
        let id = Uuid::new_v4().simple().to_string();
        self.write(WriteOp::Create {
            collection: collection.clone(),
            id: id.clone(),
            document,
        })
        .await?;
        Ok(id)
    }

    async fn update(&self, path: &DocumentPath, fields: Fields) -> Result<(), DomainError> {
        self.write(WriteOp::Update {
            path: path.clone(),
            fields,
        })
        .await
    }

    async fn delete(&self, path: &DocumentPath) -> Result<(), DomainError> {
        self.write(WriteOp::Delete {
            paths: vec![path.clone()],
        })
        .await
    }

    async fn batch_delete(&self, paths: &[DocumentPath]) -> Result<(), DomainError> {
        self.write(WriteOp::Delete {
            paths: paths.to_vec(),
        })
        .await
    }

    async fn increment_field(
        &self,
        path: &DocumentPath,
        field: &str,
        delta: i64,
    ) -> Result<(), DomainError> {
        self.write(WriteOp::Increment {
            path: path.clone(),
            field: field.to_string(),
            delta,
        })
        .await
    }
}
