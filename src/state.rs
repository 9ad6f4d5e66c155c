use std::path::PathBuf;
use std::sync::atomic::AtomicU16;

use parking_lot::Mutex;

use crate::backend::Backend;
use crate::notify::NotificationHost;
use crate::reverse::UiLink;
use crate::settings::AppSettings;
use crate::toast::ToastBoard;

// ── Application State ──────────────────────────────────────────────

/// Application state shared across the HTTP API, the CLI, and the UI loop.
///
/// Per-page state (the ingredient selection table, the pending file-pick
/// slot) lives with the page, not here; see `selection` and `files`.
pub struct AppState {
    /// The opaque backend every command ultimately calls into.
    pub backend: Box<dyn Backend>,
    /// Fire-and-forget channel back to the UI.
    pub ui: UiLink,
    pub api_port: AtomicU16,
    pub app_config_dir: PathBuf,
    pub settings: Mutex<Option<AppSettings>>,
    pub notifications: Mutex<NotificationHost>,
    /// Toast-round slot occupancy.
    pub toast_board: Mutex<ToastBoard>,
}

impl AppState {
    pub fn new(backend: Box<dyn Backend>, ui: UiLink, app_config_dir: PathBuf) -> Self {
        let settings = crate::settings::load_settings(&app_config_dir);
        let slots = settings
            .as_ref()
            .map_or(crate::settings::DEFAULT_TOASTER_SLOTS, |s| s.toaster_slots);
        Self {
            backend,
            ui,
            api_port: AtomicU16::new(0),
            app_config_dir,
            settings: Mutex::new(settings),
            notifications: Mutex::new(NotificationHost::new()),
            toast_board: Mutex::new(ToastBoard::new(slots)),
        }
    }

    /// Mutating access to the toast board.
    pub fn with_board_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut ToastBoard) -> R,
    {
        let mut guard = self.toast_board.lock();
        f(&mut guard)
    }

    /// Mutating access to the notification host.
    pub fn with_notifications_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut NotificationHost) -> R,
    {
        let mut guard = self.notifications.lock();
        f(&mut guard)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;
    use crate::demo::MemoryBackend;
    use crate::notify::NotificationKind;
    use std::time::Instant;

    fn test_state() -> AppState {
        let (ui, _rx) = UiLink::channel();
        AppState::new(
            Box::new(MemoryBackend::new()),
            ui,
            std::env::temp_dir().join("chame_test_state"),
        )
    }

    #[test]
    fn board_accessor_mutates_shared_occupancy() {
        let state = test_state();
        let assigned = state.with_board_mut(|board| board.assign(7, "Double toast", 2, 0));
        assert!(assigned.is_ok());
        let occupied = state.with_board_mut(|board| board.occupancy());
        assert_eq!(occupied[0], Some(7));
        assert_eq!(occupied[1], Some(7));
    }

    #[test]
    fn notification_accessor_replaces_the_banner() {
        let state = test_state();
        let now = Instant::now();
        state.with_notifications_mut(|host| {
            host.show("first".to_string(), NotificationKind::Success, now);
            host.show("second".to_string(), NotificationKind::Error, now);
        });
        let current = state.with_notifications_mut(|host| host.current().cloned());
        assert_eq!(current.expect("banner should be visible").text, "second");
    }
}
