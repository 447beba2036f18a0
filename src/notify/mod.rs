//! Notification layer
//!
//! Session events are surfaced to the user as transient toast lines. The
//! `Notifier` fans notifications out over a broadcast channel; the
//! presenter task renders them on the terminal, and every notification is
//! mirrored into the log at a level matching its severity.

use chrono::{DateTime, Utc};
use tokio::sync::broadcast;
use tracing::{debug, error, info, warn};

/// Severity of a user-facing notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

/// A single user-facing notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
}

/// Handle for publishing notifications
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a new notifier with no subscribers yet
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    /// Subscribe a presenter to the notification stream
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Publish a notification
    ///
    /// Running without any presenter is fine; the notification still lands
    /// in the log.
    pub fn notify(&self, message: impl Into<String>, severity: Severity) {
        let message = message.into();
        match severity {
            Severity::Info => info!("{}", message),
            Severity::Success => info!("{}", message),
            Severity::Error => error!("{}", message),
        }

        let notification = Notification {
            message,
            severity,
            timestamp: Utc::now(),
        };
        if self.tx.send(notification).is_err() {
            debug!("No notification presenter attached");
        }
    }

    pub fn info(&self, message: impl Into<String>) {
        self.notify(message, Severity::Info);
    }

    pub fn success(&self, message: impl Into<String>) {
        self.notify(message, Severity::Success);
    }

    pub fn error(&self, message: impl Into<String>) {
        self.notify(message, Severity::Error);
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Task that prints notifications as severity-colored toast lines
pub async fn presenter_task(mut notifications: broadcast::Receiver<Notification>) {
    loop {
        match notifications.recv().await {
            Ok(notification) => {
                let (tag, color) = match notification.severity {
                    Severity::Info => ("info", "\x1b[36m"),
                    Severity::Success => ("ok", "\x1b[32m"),
                    Severity::Error => ("error", "\x1b[31m"),
                };
                // Clear the timer line first so the toast gets its own row
                println!("\r\x1b[2K{}[{}]\x1b[0m {}", color, tag, notification.message);
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!("Notification presenter lagged, skipped {}", skipped);
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notify_delivers_to_subscribers() {
        let notifier = Notifier::new();
        let mut rx = notifier.subscribe();

        notifier.success("Great job!");

        let received = rx.try_recv().unwrap();
        assert_eq!(received.message, "Great job!");
        assert_eq!(received.severity, Severity::Success);
    }

    #[test]
    fn notify_without_subscribers_does_not_panic() {
        let notifier = Notifier::new();
        notifier.error("Failed to reach the backend");
    }
}
