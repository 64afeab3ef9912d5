//! Deployment constants and storage configuration.
//!
//! # Responsibility
//! - Keep every stable, versioned constant (file naming, limits, store keys)
//!   in one place.
//! - Describe where note files and their backups live.
//!
//! # Invariants
//! - File prefix/extension and defaults keys must not change between
//!   versions; restore compatibility depends on them.
//! - Every `MIN_*` constant is less than or equal to its `MAX_*` partner.

use std::path::{Path, PathBuf};

pub const APPLICATION_NAME: &str = "StickyNote";
pub const APPLICATION_IDENTIFIER: &str = "org.stickynote.core";

// ----- file system -----

/// Directory name (under the data root) holding live note files.
pub const SAVE_DIRECTORY_NAME: &str = "Notes";
/// Directory name (under the data root) holding previous generations.
pub const BACKUP_DIRECTORY_NAME: &str = "Backups";
pub const NOTE_FILE_PREFIX: &str = "note_";
pub const NOTE_FILE_EXTENSION: &str = "json";
/// Suffix appended to quarantined, unparseable note files.
pub const CORRUPT_FILE_SUFFIX: &str = "corrupt";
/// File name of the SQLite-backed defaults store under the data root.
pub const DEFAULTS_DB_FILE_NAME: &str = "defaults.sqlite3";

// ----- font -----

pub const MIN_FONT_SIZE: f32 = 8.0;
pub const MAX_FONT_SIZE: f32 = 72.0;
pub const DEFAULT_FONT_SIZE: f32 = 14.0;
/// Increment applied by batch and per-note font size steps.
pub const FONT_SIZE_STEP: f32 = 1.0;

// ----- window -----

pub const MIN_WINDOW_WIDTH: f64 = 150.0;
pub const MIN_WINDOW_HEIGHT: f64 = 100.0;
pub const DEFAULT_WINDOW_WIDTH: f64 = 250.0;
pub const DEFAULT_WINDOW_HEIGHT: f64 = 200.0;

// ----- auto-save (seconds) -----

pub const MIN_AUTO_SAVE_INTERVAL: u64 = 5;
pub const MAX_AUTO_SAVE_INTERVAL: u64 = 3600;
pub const DEFAULT_AUTO_SAVE_INTERVAL: u64 = 30;
pub const DEFAULT_AUTO_SAVE_ENABLED: bool = true;

// ----- defaults store keys -----

pub const DEFAULT_FONT_SIZE_KEY: &str = "default_font_size";
pub const DEFAULT_COLOR_THEME_KEY: &str = "default_color_theme";
pub const AUTO_SAVE_ENABLED_KEY: &str = "auto_save_enabled";
pub const AUTO_SAVE_INTERVAL_KEY: &str = "auto_save_interval";
pub const WINDOW_POSITIONS_KEY: &str = "window_positions";

// ----- notification names -----
// Also the `event=` token logged when the manager handles each one.

pub const PREFERENCES_DID_CHANGE: &str = "preferences_did_change";
pub const NOTE_WILL_CLOSE: &str = "note_will_close";
pub const NOTE_DID_BECOME_ACTIVE: &str = "note_did_become_active";

// ----- built-in theme names -----

pub const YELLOW_THEME_NAME: &str = "Yellow";
pub const PINK_THEME_NAME: &str = "Pink";
pub const BLUE_THEME_NAME: &str = "Blue";
pub const GREEN_THEME_NAME: &str = "Green";
pub const WHITE_THEME_NAME: &str = "White";
pub const DARK_THEME_NAME: &str = "Dark";

// ----- menu item tags -----

pub const MENU_TAG_NEW_NOTE: i64 = 1000;
pub const MENU_TAG_PREFERENCES: i64 = 1001;
pub const MENU_TAG_INCREASE_FONT_SIZE: i64 = 1002;
pub const MENU_TAG_DECREASE_FONT_SIZE: i64 = 1003;
pub const MENU_TAG_BOLD: i64 = 1004;
pub const MENU_TAG_ITALIC: i64 = 1005;
pub const MENU_TAG_UNDERLINE: i64 = 1006;

// ----- error codes -----

pub const ERROR_CODE_FILE_NOT_FOUND: i64 = 1000;
pub const ERROR_CODE_INVALID_FORMAT: i64 = 1001;
pub const ERROR_CODE_PERMISSION_DENIED: i64 = 1002;
pub const ERROR_CODE_DISK_FULL: i64 = 1003;
pub const ERROR_CODE_NETWORK_ERROR: i64 = 1004;
/// Any I/O failure outside the kinds above.
pub const ERROR_CODE_IO: i64 = 1099;

/// Location of the primary and backup note directories.
///
/// Directories are not created here; the persistence layer creates them
/// lazily on first write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    pub save_dir: PathBuf,
    pub backup_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(save_dir: impl Into<PathBuf>, backup_dir: impl Into<PathBuf>) -> Self {
        Self {
            save_dir: save_dir.into(),
            backup_dir: backup_dir.into(),
        }
    }

    /// Standard layout under one data root: `<root>/Notes` and `<root>/Backups`.
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self::new(
            root.join(SAVE_DIRECTORY_NAME),
            root.join(BACKUP_DIRECTORY_NAME),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_ordered() {
        assert!(MIN_FONT_SIZE <= DEFAULT_FONT_SIZE && DEFAULT_FONT_SIZE <= MAX_FONT_SIZE);
        assert!(
            MIN_AUTO_SAVE_INTERVAL <= DEFAULT_AUTO_SAVE_INTERVAL
                && DEFAULT_AUTO_SAVE_INTERVAL <= MAX_AUTO_SAVE_INTERVAL
        );
        assert!(MIN_WINDOW_WIDTH <= DEFAULT_WINDOW_WIDTH);
        assert!(MIN_WINDOW_HEIGHT <= DEFAULT_WINDOW_HEIGHT);
    }

    #[test]
    fn menu_tags_are_distinct() {
        let mut tags = vec![
            MENU_TAG_NEW_NOTE,
            MENU_TAG_PREFERENCES,
            MENU_TAG_INCREASE_FONT_SIZE,
            MENU_TAG_DECREASE_FONT_SIZE,
            MENU_TAG_BOLD,
            MENU_TAG_ITALIC,
            MENU_TAG_UNDERLINE,
        ];
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), 7);
    }

    #[test]
    fn notification_names_are_distinct_log_tokens() {
        let names = [PREFERENCES_DID_CHANGE, NOTE_WILL_CLOSE, NOTE_DID_BECOME_ACTIVE];
        for name in names {
            assert!(!name.is_empty());
            assert!(name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c == '_'));
        }
        assert_ne!(names[0], names[1]);
        assert_ne!(names[1], names[2]);
        assert_ne!(names[0], names[2]);
        assert!(!APPLICATION_NAME.contains(char::is_whitespace));
        assert!(!APPLICATION_IDENTIFIER.contains(char::is_whitespace));
    }

    #[test]
    fn storage_config_under_root_uses_fixed_names() {
        let config = StorageConfig::under("/data");
        assert_eq!(config.save_dir, PathBuf::from("/data/Notes"));
        assert_eq!(config.backup_dir, PathBuf::from("/data/Backups"));
    }
}
