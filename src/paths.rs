//! Centralized path definitions for all data files and directories.
//!
//! This module is the single source of truth for leaf filenames and
//! path-building functions. No other module should hard-code these strings.

use std::path::{Path, PathBuf};

// ── Application identity ─────────────────────────────────────────

pub const APP_ID: &str = "com.chame.admin";

// ── Leaf filenames ───────────────────────────────────────────────

pub const SETTINGS_FILE: &str = "settings.json";
/// Port discovery file written next to the settings so external tools
/// (and the web pages in dev mode) can find the ephemeral API port.
pub const PORT_FILE: &str = ".chame-port";

// ── Config-dir resolution ────────────────────────────────────────

/// Per-platform application config dir: `<config_dir>/com.chame.admin`.
pub fn app_config_dir() -> PathBuf {
    let base = if cfg!(target_os = "windows") {
        std::env::var("APPDATA").map_or_else(
            |_| PathBuf::from("C:\\Users\\Default\\AppData\\Roaming"),
            PathBuf::from,
        )
    } else if cfg!(target_os = "macos") {
        home_dir().join("Library/Application Support")
    } else {
        std::env::var("XDG_CONFIG_HOME").map_or_else(|_| home_dir().join(".config"), PathBuf::from)
    };
    base.join(APP_ID)
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_or_else(|_| PathBuf::from("."), PathBuf::from)
}

// ── Config-dir functions (take app_config_dir) ───────────────────

pub fn settings_path(app_config_dir: &Path) -> PathBuf {
    app_config_dir.join(SETTINGS_FILE)
}

pub fn port_file_path(app_config_dir: &Path) -> PathBuf {
    app_config_dir.join(PORT_FILE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn config_files_live_under_the_config_dir() {
        let dir = PathBuf::from("/tmp/chame-config");
        assert_eq!(settings_path(&dir), dir.join("settings.json"));
        assert_eq!(port_file_path(&dir), dir.join(".chame-port"));
    }

    #[test]
    fn app_config_dir_ends_with_the_app_id() {
        assert!(app_config_dir().ends_with(APP_ID));
    }
}
