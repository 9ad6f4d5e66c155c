//! Single source of truth for reverse-channel event names shared between the
//! backend side and the UI. The UI listens for these by name, so the strings
//! are part of the wire contract.

use serde::Serialize;
use ts_rs::TS;

use crate::notify::NotificationKind;

pub const LOG_EVENT: &str = "log-event";
pub const PROGRESS_UPDATE: &str = "progress-update";
pub const NOTIFICATION: &str = "notification";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum LogLevel {
    Debug,
    Info,
    Warn,
    Error,
}

/// A backend-initiated call into the UI. Fire-and-forget: the backend never
/// learns whether delivery succeeded.
#[derive(Debug, Clone, Serialize, TS)]
#[serde(tag = "event", content = "payload")]
#[ts(export)]
pub enum UiEvent {
    #[serde(rename = "log-event")]
    Log { level: LogLevel, message: String },
    #[serde(rename = "progress-update")]
    Progress {
        operation: String,
        /// 0.0 to 1.0.
        progress: f64,
        detail: Option<String>,
    },
    #[serde(rename = "notification")]
    Notification { text: String, kind: NotificationKind },
}

impl UiEvent {
    pub fn name(&self) -> &'static str {
        match self {
            UiEvent::Log { .. } => LOG_EVENT,
            UiEvent::Progress { .. } => PROGRESS_UPDATE,
            UiEvent::Notification { .. } => NOTIFICATION,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn event_names_match_serde_tags() {
        let log = UiEvent::Log {
            level: LogLevel::Info,
            message: "hello".to_string(),
        };
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["event"], LOG_EVENT);

        let progress = UiEvent::Progress {
            operation: "backup".to_string(),
            progress: 0.5,
            detail: None,
        };
        let json = serde_json::to_value(&progress).unwrap();
        assert_eq!(json["event"], PROGRESS_UPDATE);

        let note = UiEvent::Notification {
            text: "Saved.".to_string(),
            kind: NotificationKind::Success,
        };
        let json = serde_json::to_value(&note).unwrap();
        assert_eq!(json["event"], NOTIFICATION);
    }
}
