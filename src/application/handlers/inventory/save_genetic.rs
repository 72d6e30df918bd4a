//! SaveGeneticHandler - Creates a strain record or replaces an existing one.

use std::sync::Arc;

use crate::application::handlers::lookup::is_missing_document;
use crate::application::handlers::report;
use crate::application::paths::UserPaths;
use crate::application::records::genetic_fields;
use crate::domain::foundation::{CommandMetadata, DomainError, GeneticId};
use crate::domain::inventory::{Genetic, GeneticDetails};
use crate::ports::{DocumentStore, NewDocument, Notifier};

/// Command to save a genetic. Without an id a new record is created.
#[derive(Debug, Clone)]
pub struct SaveGeneticCommand {
    pub genetic_id: Option<GeneticId>,
    pub details: GeneticDetails,
}

#[derive(Debug, Clone)]
pub struct SaveGeneticResult {
    pub genetic: Genetic,
    pub created: bool,
}

#[derive(Debug, Clone)]
pub enum SaveGeneticError {
    GeneticNotFound(GeneticId),
    Domain(DomainError),
}

impl std::fmt::Display for SaveGeneticError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SaveGeneticError::GeneticNotFound(id) => write!(f, "Genetic not found: {}", id),
            SaveGeneticError::Domain(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for SaveGeneticError {}

impl From<DomainError> for SaveGeneticError {
    fn from(err: DomainError) -> Self {
        SaveGeneticError::Domain(err)
    }
}

pub struct SaveGeneticHandler {
    store: Arc<dyn DocumentStore>,
    notifier: Arc<dyn Notifier>,
}

impl SaveGeneticHandler {
    pub fn new(store: Arc<dyn DocumentStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub async fn handle(
        &self,
        cmd: SaveGeneticCommand,
        metadata: CommandMetadata,
    ) -> Result<SaveGeneticResult, SaveGeneticError> {
        let result = self.execute(cmd, &metadata).await;
        report(self.notifier.as_ref(), &metadata, result, "Genetic saved")
    }

    async fn execute(
        &self,
        cmd: SaveGeneticCommand,
        metadata: &CommandMetadata,
    ) -> Result<SaveGeneticResult, SaveGeneticError> {
        let details = cmd.details.normalized().map_err(DomainError::from)?;
        let paths = UserPaths::new(&metadata.user_id);
        let fields = genetic_fields(&details)?;

        let (id, created) = match cmd.genetic_id {
            Some(id) => match self.store.update(&paths.genetic(&id), fields).await {
                Ok(()) => (id, false),
                Err(err) if is_missing_document(&err) => {
                    return Err(SaveGeneticError::GeneticNotFound(id))
                }
                Err(err) => return Err(err.into()),
            },
            None => {
                let id = self
                    .store
                    .create(&paths.genetics(), NewDocument::new(fields))
                    .await?;
                (GeneticId::new(id).map_err(DomainError::from)?, true)
            }
        };

        tracing::info!(
            user_id = %metadata.user_id,
            genetic_id = %id,
            created,
            "Genetic saved"
        );
        Ok(SaveGeneticResult {
            genetic: Genetic::from_details(id, details),
            created,
        })
    }
}
