//! Log command handlers.

mod add_log;
mod delete_log;

pub use add_log::{AddLogCommand, AddLogError, AddLogHandler, AddLogResult};
pub use delete_log::{DeleteLogCommand, DeleteLogError, DeleteLogHandler};
