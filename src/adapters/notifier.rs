//! Notifier adapters.

use std::sync::{Mutex, PoisonError};

use crate::ports::{Notification, NotificationLevel, Notifier};

/// Emits notifications as log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notification: Notification) {
        match notification.level {
            NotificationLevel::Success => {
                tracing::info!(text = %notification.message, "Notification");
            }
            NotificationLevel::Error => {
                tracing::warn!(text = %notification.message, "Notification");
            }
        }
    }
}

/// Keeps every notification for later inspection.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    recorded: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<Notification> {
        self.notifications().pop()
    }

    pub fn errors(&self) -> Vec<Notification> {
        self.notifications()
            .into_iter()
            .filter(|n| n.level == NotificationLevel::Error)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.recorded
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}
