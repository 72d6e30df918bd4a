//! Room - Top-level container for cycles.

use serde::Serialize;

use super::foundation::{RoomId, ValidationError};

/// A growing room (sala).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
}

impl Room {
    pub fn new(id: RoomId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Trims a room name and rejects it when nothing is left.
pub fn validate_room_name(name: &str) -> Result<String, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_names_are_trimmed() {
        assert_eq!(validate_room_name("  Carpa 1 ").unwrap(), "Carpa 1");
    }

    #[test]
    fn blank_room_name_is_rejected() {
        assert_eq!(
            validate_room_name("   "),
            Err(ValidationError::empty_field("name"))
        );
    }
}
