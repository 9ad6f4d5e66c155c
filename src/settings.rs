use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::persist::{read_json, write_json, PersistError};

/// Application-level settings stored in the OS config directory.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AppSettings {
    pub version: u32,
    /// Directory the backend keeps its data files in.
    pub data_dir: PathBuf,
    /// Base URL the form submitter posts to.
    #[serde(default = "default_backend_url")]
    pub backend_url: String,
    /// Slot count for the toast-round board.
    #[serde(default = "default_toaster_slots")]
    pub toaster_slots: usize,
    /// Operator name recorded as `created_by`/`deleted_by` when the UI
    /// does not supply one. None = use the per-command defaults.
    #[serde(default)]
    pub operator: Option<String>,
}

const SETTINGS_VERSION: u32 = 1;

pub const DEFAULT_TOASTER_SLOTS: usize = 6;

fn default_backend_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_toaster_slots() -> usize {
    DEFAULT_TOASTER_SLOTS
}

impl AppSettings {
    pub fn new(data_dir: PathBuf) -> Self {
        Self {
            version: SETTINGS_VERSION,
            data_dir,
            backend_url: default_backend_url(),
            toaster_slots: default_toaster_slots(),
            operator: None,
        }
    }
}

/// Load settings from the app config directory. Returns None if no settings
/// file exists or it cannot be parsed.
pub fn load_settings(app_config_dir: &Path) -> Option<AppSettings> {
    let path = crate::paths::settings_path(app_config_dir);
    if !path.exists() {
        return None;
    }
    read_json::<AppSettings>(&path).ok()
}

/// Save settings to the app config directory.
pub fn save_settings(app_config_dir: &Path, settings: &AppSettings) -> Result<(), PersistError> {
    std::fs::create_dir_all(app_config_dir)?;
    write_json(&crate::paths::settings_path(app_config_dir), settings)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_round_trip() {
        let dir = std::env::temp_dir().join("chame_test_settings");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let settings = AppSettings::new(PathBuf::from("/some/data/dir"));
        save_settings(&dir, &settings).unwrap();

        let loaded = load_settings(&dir).expect("should load");
        assert_eq!(loaded.data_dir, PathBuf::from("/some/data/dir"));
        assert_eq!(loaded.backend_url, "http://127.0.0.1:8000");
        assert_eq!(loaded.toaster_slots, 6);
        assert_eq!(loaded.operator, None);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_fields_get_defaults() {
        let dir = std::env::temp_dir().join("chame_test_settings_defaults");
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        // Minimal file from an older install.
        let old_json = serde_json::json!({
            "version": 1,
            "data_dir": "/some/dir"
        });
        std::fs::write(
            crate::paths::settings_path(&dir),
            serde_json::to_string_pretty(&old_json).unwrap(),
        )
        .unwrap();

        let loaded = load_settings(&dir).expect("should load");
        assert_eq!(loaded.backend_url, "http://127.0.0.1:8000");
        assert_eq!(loaded.toaster_slots, 6);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_load_missing_returns_none() {
        let dir = std::env::temp_dir().join("chame_test_no_settings");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(load_settings(&dir).is_none());
    }
}
