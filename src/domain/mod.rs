//! Domain layer containing cultivation rules and types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared primitives (ids, timestamps, dates, errors, state machine)
//! - `progress` - Day and week counting from a phase start date
//! - `schedule` - Flowering week taxonomy and the standard schedule
//! - `cycle` - Cycle aggregate and phase lifecycle
//! - `log` - Journal entries, fertilizer formatting and weekly grouping
//! - `room` - Rooms that hold cycles
//! - `inventory` - Genetics and seed bank
//! - `overview` - Room cards and name search

pub mod cycle;
pub mod foundation;
pub mod inventory;
pub mod log;
pub mod overview;
pub mod progress;
pub mod room;
pub mod schedule;
