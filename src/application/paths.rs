//! Per-user collection layout.

use crate::domain::foundation::{CycleId, GeneticId, LogId, RoomId, SeedId, UserId};
use crate::ports::{CollectionPath, DocumentPath};

const ROOMS: &str = "salas";
const CYCLES: &str = "ciclos";
const LOGS: &str = "logs";
const GENETICS: &str = "genetics";
const SEEDS: &str = "seeds";

/// Paths of one user's collections under `users/{userId}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPaths {
    root: String,
}

impl UserPaths {
    pub fn new(user_id: &UserId) -> Self {
        Self {
            root: format!("users/{}", user_id),
        }
    }

    fn collection(&self, name: &str) -> CollectionPath {
        CollectionPath::new(format!("{}/{}", self.root, name))
    }

    pub fn rooms(&self) -> CollectionPath {
        self.collection(ROOMS)
    }

    pub fn cycles(&self) -> CollectionPath {
        self.collection(CYCLES)
    }

    pub fn genetics(&self) -> CollectionPath {
        self.collection(GENETICS)
    }

    pub fn seeds(&self) -> CollectionPath {
        self.collection(SEEDS)
    }

    pub fn room(&self, id: &RoomId) -> DocumentPath {
        self.rooms().doc(id.as_str())
    }

    pub fn cycle(&self, id: &CycleId) -> DocumentPath {
        self.cycles().doc(id.as_str())
    }

    pub fn cycle_logs(&self, id: &CycleId) -> CollectionPath {
        self.cycle(id).subcollection(LOGS)
    }

    pub fn log(&self, cycle_id: &CycleId, log_id: &LogId) -> DocumentPath {
        self.cycle_logs(cycle_id).doc(log_id.as_str())
    }

    pub fn genetic(&self, id: &GeneticId) -> DocumentPath {
        self.genetics().doc(id.as_str())
    }

    pub fn seed(&self, id: &SeedId) -> DocumentPath {
        self.seeds().doc(id.as_str())
    }
}
