//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, and error types that form the
//! vocabulary of the grow journal domain.

mod calendar_date;
mod command;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use calendar_date::CalendarDate;
pub use command::CommandMetadata;
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{CycleId, GeneticId, LogId, RoomId, SeedId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
