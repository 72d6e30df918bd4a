//! Domain errors.
//!
//! `ValidationError` covers malformed input caught before any write.
//! `DomainError` carries an [`ErrorCode`] across port boundaries.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Rejected input, named by field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Name of the offending field.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::EmptyField { field }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }
}

/// Machine-readable failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Rejected before writing
    ValidationFailed,
    InsufficientStock,
    InvalidMoveTarget,

    // Missing records
    RoomNotFound,
    CycleNotFound,
    LogNotFound,
    GeneticNotFound,
    SeedNotFound,
    WeekNotFound,
    DocumentNotFound,

    // Lifecycle
    InvalidStateTransition,
    ScheduleMissing,

    // Reported by the store
    StoreUnavailable,
    PermissionDenied,
    DatabaseError,
    InternalError,
}

impl ErrorCode {
    /// Returns true for failures reported by the document store rather than
    /// detected before a write.
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            ErrorCode::StoreUnavailable
                | ErrorCode::PermissionDenied
                | ErrorCode::DatabaseError
                | ErrorCode::InternalError
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorCode::InvalidMoveTarget => "INVALID_MOVE_TARGET",
            ErrorCode::RoomNotFound => "ROOM_NOT_FOUND",
            ErrorCode::CycleNotFound => "CYCLE_NOT_FOUND",
            ErrorCode::LogNotFound => "LOG_NOT_FOUND",
            ErrorCode::GeneticNotFound => "GENETIC_NOT_FOUND",
            ErrorCode::SeedNotFound => "SEED_NOT_FOUND",
            ErrorCode::WeekNotFound => "WEEK_NOT_FOUND",
            ErrorCode::DocumentNotFound => "DOCUMENT_NOT_FOUND",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::ScheduleMissing => "SCHEDULE_MISSING",
            ErrorCode::StoreUnavailable => "STORE_UNAVAILABLE",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coded failure with a user-facing message and key/value context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// `ValidationFailed` with the field recorded under `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ValidationFailed, message).with_detail("field", field.into())
    }

    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        let field = err.field().to_string();
        DomainError::validation(field, err.to_string())
    }
}
