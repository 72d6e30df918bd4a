//! Cycle module - Cultivation cycle aggregate and lifecycle management.
//!
//! A Cycle is one cultivation run inside a room. It moves from vegetative to
//! flowering to finished, and owns the flowering schedule its logs are filed
//! against.

mod aggregate;
mod cultivation_type;
mod phase;
mod progress;

pub use aggregate::{Cycle, CycleDetails, NewCycle, PhaseChange, VEGETATIVE_DISPLAY_CLASS};
pub use cultivation_type::CultivationType;
pub use phase::CyclePhase;
pub use progress::CycleProgress;
