use crate::domain::foundation::Timestamp;

/// Source of the current instant, so progress can be computed deterministically.
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}
