//! Command infrastructure for handlers.
//!
//! Every command handler receives a `CommandMetadata` carrying the signed-in
//! account (which scopes all store paths) and optional tracing context.

use serde::{Deserialize, Serialize};

use super::UserId;

/// Who issued a command, plus optional tracing context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// The account executing this command; all paths are scoped to it.
    pub user_id: UserId,

    /// Ties the log lines of one user action together.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Where the command came from, e.g. `cli` or `test`.
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            correlation_id: None,
            source: None,
        }
    }

    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, or "-" when none was attached.
    pub fn correlation_id(&self) -> &str {
        self.correlation_id.as_deref().unwrap_or("-")
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::new("grower-1").unwrap()
    }

    #[test]
    fn defaults_have_no_optional_context() {
        let metadata = CommandMetadata::new(user());
        assert_eq!(metadata.correlation_id(), "-");
        assert!(metadata.source().is_none());
    }

    #[test]
    fn builders_attach_context() {
        let metadata = CommandMetadata::new(user())
            .with_correlation_id("req-42")
            .with_source("cli");
        assert_eq!(metadata.correlation_id(), "req-42");
        assert_eq!(metadata.source(), Some("cli"));
    }

    #[test]
    fn optional_fields_are_skipped_when_serialized() {
        let json = serde_json::to_value(CommandMetadata::new(user())).unwrap();
        assert_eq!(json, serde_json::json!({ "user_id": "grower-1" }));
    }
}
