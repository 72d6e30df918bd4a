//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `DocumentStore` - Realtime per-user document database
//! - `Notifier` - User-visible outcome messages
//! - `Clock` - Current instant for progress calculations

mod clock;
mod document_store;
mod notifier;

pub use clock::Clock;
pub use document_store::{
    CollectionPath, Document, DocumentPath, DocumentStore, FieldFilter, Fields, NewDocument,
    QuerySnapshot, Subscription,
};
pub use notifier::{Notification, NotificationLevel, Notifier};
