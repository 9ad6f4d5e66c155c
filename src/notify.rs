//! Popup notifier model: at most one transient banner at a time.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// How long a banner stays up before it auto-hides.
pub const DISPLAY_TIMEOUT: Duration = Duration::from_millis(5000);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum NotificationKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[ts(export)]
pub struct Notification {
    pub text: String,
    pub kind: NotificationKind,
}

/// Holds the currently-visible notification, if any.
///
/// `show` replaces whatever is on screen — the old banner's timer is not
/// canceled, the banner is simply gone, so a late expiry is a no-op. The
/// clock is injected so expiry is testable.
#[derive(Default)]
pub struct NotificationHost {
    current: Option<(Notification, Instant)>,
}

impl NotificationHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Display a banner, replacing any existing one. Newest wins.
    pub fn show(&mut self, text: impl Into<String>, kind: NotificationKind, now: Instant) {
        let note = Notification {
            text: text.into(),
            kind,
        };
        self.current = Some((note, now + DISPLAY_TIMEOUT));
    }

    /// Explicit user dismissal, any time before the timer fires.
    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drop the banner if its deadline has passed. Returns the visible
    /// notification after expiry handling.
    pub fn poll(&mut self, now: Instant) -> Option<&Notification> {
        if let Some((_, deadline)) = self.current {
            if now >= deadline {
                self.current = None;
            }
        }
        self.current.as_ref().map(|(note, _)| note)
    }

    pub fn current(&self) -> Option<&Notification> {
        self.current.as_ref().map(|(note, _)| note)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn shows_and_expires_after_timeout() {
        let mut host = NotificationHost::new();
        let t0 = Instant::now();
        host.show("Saved.", NotificationKind::Success, t0);
        assert_eq!(host.current().unwrap().text, "Saved.");

        // Still visible just before the deadline.
        assert!(host.poll(t0 + DISPLAY_TIMEOUT - Duration::from_millis(1)).is_some());
        // Gone at the deadline.
        assert!(host.poll(t0 + DISPLAY_TIMEOUT).is_none());
    }

    #[test]
    fn newest_replaces_oldest() {
        let mut host = NotificationHost::new();
        let t0 = Instant::now();
        host.show("first", NotificationKind::Error, t0);
        host.show("second", NotificationKind::Success, t0 + Duration::from_secs(1));

        let current = host.current().unwrap();
        assert_eq!(current.text, "second");
        assert_eq!(current.kind, NotificationKind::Success);

        // The replacement banner gets its own full timeout, so the first
        // banner's deadline passing changes nothing.
        assert!(host.poll(t0 + DISPLAY_TIMEOUT).is_some());
        assert!(host
            .poll(t0 + Duration::from_secs(1) + DISPLAY_TIMEOUT)
            .is_none());
    }

    #[test]
    fn dismiss_clears_before_timer() {
        let mut host = NotificationHost::new();
        let t0 = Instant::now();
        host.show("oops", NotificationKind::Error, t0);
        host.dismiss();
        assert!(host.current().is_none());
        assert!(host.poll(t0 + Duration::from_millis(10)).is_none());
    }
}
