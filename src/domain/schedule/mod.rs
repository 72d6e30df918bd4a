//! Schedule module - Flowering week schedule and phase taxonomy.

mod flowering;
mod week_phase;

pub use flowering::{
    generate_standard_weeks, FloweringSchedule, FloweringWeek, STANDARD_WEEK_COUNT,
};
pub use week_phase::{classify, PhaseInfo, WeekPhase};
