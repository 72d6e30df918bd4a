//! Application handlers.
//!
//! Command handlers validate input before any write, perform the write
//! through the `DocumentStore` port and report the outcome through the
//! `Notifier` port. They never touch the live cache; the change reaches it
//! through the store's snapshot.

pub mod cycle;
pub mod inventory;
pub mod log;
mod lookup;
pub mod room;

#[cfg(test)]
pub(crate) mod test_support;

use std::fmt;

use crate::domain::foundation::CommandMetadata;
use crate::ports::{Notification, Notifier};

pub use cycle::*;
pub use inventory::*;
pub use log::*;
pub use room::*;

/// Notifies the user of a command outcome and passes the outcome through.
pub(crate) fn report<T, E: fmt::Display>(
    notifier: &dyn Notifier,
    metadata: &CommandMetadata,
    result: Result<T, E>,
    success: &str,
) -> Result<T, E> {
    match &result {
        Ok(_) => notifier.notify(Notification::success(success)),
        Err(err) => {
            tracing::warn!(
                user_id = %metadata.user_id,
                correlation_id = metadata.correlation_id(),
                source = metadata.source(),
                error = %err,
                "Command failed"
            );
            notifier.notify(Notification::error(err.to_string()));
        }
    }
    result
}
