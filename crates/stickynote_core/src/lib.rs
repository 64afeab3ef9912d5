//! Core of the StickyNote application.
//! This crate owns the note collection, its persistence and preferences;
//! window rendering lives in the host behind `NotePresenter`.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod prefs;
pub mod repo;
pub mod service;

pub use config::StorageConfig;
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{clamp_font_size, NoteId, NoteRecord, NoteState, WindowFrame};
pub use model::theme::{contrasting_text_color, ColorTheme, Rgba, ThemeError, ThemeRegistry};
pub use prefs::defaults_store::{
    DefaultsError, DefaultsResult, DefaultsStore, MemoryDefaultsStore, SqliteDefaultsStore,
};
pub use prefs::preferences::{
    PreferenceValues, Preferences, PreferencesChange, SharedPreferences,
};
pub use repo::note_repo::{
    note_file_name, parse_note_file_name, FileNoteRepository, NoteRepository, StorageError,
    StorageResult,
};
pub use service::note_manager::{NoteManager, RestoreReport, SaveReport};
pub use service::presenter::{
    HeadlessPresenter, HeadlessWindow, MenuAction, MenuOutcome, NoteFailure, NotePresenter,
};
pub use service::scheduler::{
    AutoSaveDriver, AutoSaveTick, AutoSaveTimer, Clock, ManualClock, SystemClock,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
