//! Reverse channel: backend → UI calls.
//!
//! Modeled as an outbound queue consumed by the UI's main loop, so UI state
//! is only ever touched from one execution context no matter which thread a
//! backend operation runs on. Delivery is best-effort: failures are logged
//! locally and never raised back to the backend.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::events::{LogLevel, UiEvent};
use crate::notify::NotificationKind;

/// Cloneable handle the backend (and command handlers) use to reach the UI.
#[derive(Clone)]
pub struct UiLink {
    tx: UnboundedSender<UiEvent>,
}

impl UiLink {
    /// Create a link plus the receiver the UI main loop drains.
    pub fn channel() -> (Self, UnboundedReceiver<UiEvent>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx }, rx)
    }

    /// Fire-and-forget send. A closed receiver drops the event with a local log.
    pub fn send(&self, event: UiEvent) {
        if let Err(e) = self.tx.send(event) {
            eprintln!("[Chame] dropped ui event '{}': receiver gone", e.0.name());
        }
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        self.send(UiEvent::Log {
            level,
            message: message.into(),
        });
    }

    pub fn progress(&self, operation: &str, progress: f64, detail: Option<&str>) {
        self.send(UiEvent::Progress {
            operation: operation.to_string(),
            progress,
            detail: detail.map(ToString::to_string),
        });
    }

    pub fn notify(&self, text: impl Into<String>, kind: NotificationKind) {
        self.send(UiEvent::Notification {
            text: text.into(),
            kind,
        });
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn events_arrive_in_order() {
        let (link, mut rx) = UiLink::channel();
        link.log(LogLevel::Info, "first");
        link.progress("backup", 0.25, Some("dumping tables"));
        link.notify("Backup complete", NotificationKind::Success);

        match rx.try_recv().unwrap() {
            UiEvent::Log { message, .. } => assert_eq!(message, "first"),
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            UiEvent::Progress {
                operation,
                progress,
                detail,
            } => {
                assert_eq!(operation, "backup");
                assert!((progress - 0.25).abs() < f64::EPSILON);
                assert_eq!(detail.as_deref(), Some("dumping tables"));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        match rx.try_recv().unwrap() {
            UiEvent::Notification { text, kind } => {
                assert_eq!(text, "Backup complete");
                assert_eq!(kind, NotificationKind::Success);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn send_after_receiver_dropped_does_not_panic() {
        let (link, rx) = UiLink::channel();
        drop(rx);
        // Logged locally, never raised back to the caller.
        link.log(LogLevel::Warn, "nobody listening");
    }
}
