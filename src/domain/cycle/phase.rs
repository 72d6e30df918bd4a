//! CyclePhase enum for the lifecycle of a cultivation cycle.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Cycle-level cultivation stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CyclePhase {
    #[default]
    #[serde(rename = "Vegetativo")]
    Vegetative,
    #[serde(rename = "Floración")]
    Flowering,
    #[serde(rename = "Finalizado")]
    Finished,
}

impl CyclePhase {
    /// The stored label.
    pub fn label(&self) -> &'static str {
        match self {
            CyclePhase::Vegetative => "Vegetativo",
            CyclePhase::Flowering => "Floración",
            CyclePhase::Finished => "Finalizado",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Vegetativo" => Some(CyclePhase::Vegetative),
            "Floración" => Some(CyclePhase::Flowering),
            "Finalizado" => Some(CyclePhase::Finished),
            _ => None,
        }
    }

    /// Active cycles are shown in room overviews.
    pub fn is_active(&self) -> bool {
        !matches!(self, CyclePhase::Finished)
    }
}

impl StateMachine for CyclePhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use CyclePhase::*;
        matches!(
            (self, target),
            (Vegetative, Flowering) | (Vegetative, Finished) | (Flowering, Finished)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use CyclePhase::*;
        match self {
            Vegetative => vec![Flowering, Finished],
            Flowering => vec![Finished],
            Finished => vec![],
        }
    }
}

impl fmt::Display for CyclePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ErrorCode;

    #[test]
    fn default_is_vegetative() {
        assert_eq!(CyclePhase::default(), CyclePhase::Vegetative);
    }

    #[test]
    fn vegetative_moves_forward() {
        assert!(CyclePhase::Vegetative.can_transition_to(&CyclePhase::Flowering));
        assert!(CyclePhase::Vegetative.can_transition_to(&CyclePhase::Finished));
        assert!(CyclePhase::Flowering.can_transition_to(&CyclePhase::Finished));
    }

    #[test]
    fn phases_never_move_backwards() {
        let err = CyclePhase::Flowering
            .transition_to(CyclePhase::Vegetative)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::InvalidStateTransition);
        assert!(CyclePhase::Finished.is_terminal());
    }

    #[test]
    fn can_transition_to_is_consistent_with_valid_transitions() {
        for phase in [CyclePhase::Vegetative, CyclePhase::Flowering, CyclePhase::Finished] {
            for target in phase.valid_transitions() {
                assert!(phase.can_transition_to(&target));
            }
        }
    }

    #[test]
    fn uses_stored_spanish_labels() {
        assert_eq!(
            serde_json::to_string(&CyclePhase::Flowering).unwrap(),
            "\"Floración\""
        );
        let phase: CyclePhase = serde_json::from_str("\"Finalizado\"").unwrap();
        assert_eq!(phase, CyclePhase::Finished);
        assert_eq!(CyclePhase::from_label("Vegetativo"), Some(CyclePhase::Vegetative));
        assert_eq!(CyclePhase::from_label("vegetativo"), None);
    }
}
