//! Cycle command handlers.

mod add_flowering_week;
mod change_phase;
mod create_cycle;
mod delete_cycle;
mod move_cycle;
mod update_cycle;

pub use add_flowering_week::{
    AddFloweringWeekCommand, AddFloweringWeekError, AddFloweringWeekHandler,
    AddFloweringWeekResult,
};
pub use change_phase::{ChangePhaseCommand, ChangePhaseError, ChangePhaseHandler, ChangePhaseResult};
pub use create_cycle::{CreateCycleCommand, CreateCycleError, CreateCycleHandler, CreateCycleResult};
pub use delete_cycle::{DeleteCycleCommand, DeleteCycleError, DeleteCycleHandler, DeleteCycleResult};
pub use move_cycle::{MoveCycleCommand, MoveCycleError, MoveCycleHandler, MoveCycleResult};
pub use update_cycle::{UpdateCycleCommand, UpdateCycleError, UpdateCycleHandler, UpdateCycleResult};
