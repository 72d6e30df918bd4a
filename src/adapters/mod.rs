//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `store` - Document stores (in-memory, JSON file)
//! - `notifier` - Notification sinks (tracing, recording)
//! - `clock` - System and fixed clocks

pub mod clock;
pub mod notifier;
pub mod store;

pub use clock::{FixedClock, SystemClock};
pub use notifier::{RecordingNotifier, TracingNotifier};
pub use store::{FileDocumentStore, InMemoryDocumentStore, DEFAULT_CHANNEL_CAPACITY};
