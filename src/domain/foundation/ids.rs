//! Strongly-typed identifier value objects.
//!
//! Document ids are assigned by the store when a record is created, so every
//! identifier here wraps the store's string id rather than generating its own.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! document_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates the identifier, returning error if blank.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(id))
            }

            /// Returns the inner string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

document_id!(
    /// Account that owns every record (the tenant partition).
    UserId,
    "user_id"
);

document_id!(
    /// Identifier of a growing room (sala).
    RoomId,
    "room_id"
);

document_id!(
    /// Identifier of a cultivation cycle (ciclo).
    CycleId,
    "cycle_id"
);

document_id!(
    /// Identifier of a single log entry under a cycle.
    LogId,
    "log_id"
);

document_id!(
    /// Identifier of a genetics (strain) record.
    GeneticId,
    "genetic_id"
);

document_id!(
    /// Identifier of a seed-bank entry.
    SeedId,
    "seed_id"
);
