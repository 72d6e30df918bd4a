//! Application layer - Command handlers and live read models.
//!
//! Writes go through command handlers. Reads come from the live cache, which
//! only the workspace's snapshot subscriptions update.

pub mod cache;
pub mod handlers;
pub mod paths;
pub mod records;
pub mod workspace;

pub use cache::{CacheView, LiveCache, Table};
pub use handlers::*;
pub use paths::UserPaths;
pub use records::RecordError;
pub use workspace::{CycleLogView, QueryKey, Workspace};
