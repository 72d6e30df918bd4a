//! Allowed-transition checks for lifecycle enums such as `CyclePhase`.

use super::{DomainError, ErrorCode};

/// Implementors list their legal edges; `transition_to` rejects everything
/// else with `ErrorCode::InvalidStateTransition`.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Every state reachable in one step.
    fn valid_transitions(&self) -> Vec<Self>;

    fn transition_to(&self, target: Self) -> Result<Self, DomainError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(DomainError::new(
                ErrorCode::InvalidStateTransition,
                format!("Transition {:?} -> {:?} is not allowed", self, target),
            ))
        }
    }

    /// No outgoing edges.
    fn is_terminal(&self) -> bool {
        self.valid_transitions().is_empty()
    }
}
