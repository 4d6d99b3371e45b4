//! Transient user-facing messages
//!
//! Managers report the outcome of every load, save and delete through a
//! [`Notifier`]. The receiving side decides how to show them; the CLI prints
//! them, tests collect them.

use serde::Serialize;
use tokio::sync::mpsc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

impl Notification {
    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Sending half of the notification channel, cheap to clone
#[derive(Debug, Clone)]
pub struct Notifier {
    tx: mpsc::UnboundedSender<Notification>,
}

impl Notifier {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Notification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn success(&self, message: impl Into<String>) {
        self.send(Severity::Success, message.into());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.send(Severity::Error, message.into());
    }

    fn send(&self, severity: Severity, message: String) {
        // Nobody listening is fine: notifications are transient.
        if self.tx.send(Notification { severity, message }).is_err() {
            tracing::trace!("Notification dropped, receiver closed");
        }
    }
}
