//! Presentation boundary between the note manager and the windowing host.
//!
//! # Responsibility
//! - Define the calls the manager makes to show, update and tear down note
//!   windows (`NotePresenter`).
//! - Define the menu commands the host forwards into the manager.
//!
//! # Invariants
//! - Presenters address notes only by `NoteId`; the manager keeps the
//!   authoritative record.
//! - Presenter calls must not call back into the manager synchronously.

use crate::config::{
    MENU_TAG_BOLD, MENU_TAG_DECREASE_FONT_SIZE, MENU_TAG_INCREASE_FONT_SIZE, MENU_TAG_ITALIC,
    MENU_TAG_NEW_NOTE, MENU_TAG_PREFERENCES, MENU_TAG_UNDERLINE,
};
use crate::model::note::{NoteId, NoteRecord, WindowFrame};
use crate::model::theme::ColorTheme;
use crate::repo::note_repo::StorageError;
use log::{debug, warn};
use std::collections::BTreeMap;

/// Non-fatal failure surfaced to the host for a transient warning.
#[derive(Debug)]
pub struct NoteFailure {
    /// `None` when the failure concerns a file that never became a live note.
    pub note_id: Option<NoteId>,
    pub error: StorageError,
}

impl NoteFailure {
    /// Short user-facing text, e.g. "Couldn't save note 1b2c…".
    pub fn user_message(&self) -> String {
        match self.note_id {
            Some(id) => format!("Couldn't save note {}: {}", id.simple(), self.error),
            None => format!("Couldn't read a note file: {}", self.error),
        }
    }
}

/// Calls from the manager into the windowing host.
pub trait NotePresenter: Send {
    /// Materializes a window for a newly live note, styled with `theme`.
    fn create_window(&mut self, record: &NoteRecord, theme: &ColorTheme);
    fn destroy_window(&mut self, id: NoteId);
    fn update_window_font_size(&mut self, id: NoteId, size: f32);
    fn update_window_theme(&mut self, id: NoteId, theme: &ColorTheme);
    /// Current on-screen frame, if the window exists.
    fn window_frame(&self, id: NoteId) -> Option<WindowFrame>;
    /// Displays a non-blocking warning. Default: log only.
    fn report_failure(&mut self, failure: &NoteFailure) {
        warn!(
            "event=note_failure module=presenter error_code={} message={}",
            failure.error.code(),
            failure.user_message()
        );
    }
}

/// Commands arriving from the application menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    NewNote,
    ShowPreferences,
    IncreaseFontSize,
    DecreaseFontSize,
    Bold,
    Italic,
    Underline,
    SaveAll,
}

impl MenuAction {
    /// Maps a stable menu item tag to its action.
    pub fn from_tag(tag: i64) -> Option<Self> {
        match tag {
            MENU_TAG_NEW_NOTE => Some(Self::NewNote),
            MENU_TAG_PREFERENCES => Some(Self::ShowPreferences),
            MENU_TAG_INCREASE_FONT_SIZE => Some(Self::IncreaseFontSize),
            MENU_TAG_DECREASE_FONT_SIZE => Some(Self::DecreaseFontSize),
            MENU_TAG_BOLD => Some(Self::Bold),
            MENU_TAG_ITALIC => Some(Self::Italic),
            MENU_TAG_UNDERLINE => Some(Self::Underline),
            _ => None,
        }
    }
}

/// Result of routing a menu command through the manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuOutcome {
    /// The manager performed the command.
    Handled,
    /// Presentation-only command; the host must handle it.
    Unhandled,
}

/// Window state tracked by `HeadlessPresenter`.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessWindow {
    pub frame: WindowFrame,
    pub font_size: f32,
    pub theme: String,
}

/// Presenter without a display; tracks window state in memory.
///
/// Used by the command-line host and anywhere notes are managed without UI.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    windows: BTreeMap<NoteId, HeadlessWindow>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn window(&self, id: NoteId) -> Option<&HeadlessWindow> {
        self.windows.get(&id)
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Simulates the user moving or resizing a window.
    pub fn move_window(&mut self, id: NoteId, frame: WindowFrame) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.frame = frame;
        }
    }
}

impl NotePresenter for HeadlessPresenter {
    fn create_window(&mut self, record: &NoteRecord, theme: &ColorTheme) {
        debug!("event=window_create module=presenter note_id={}", record.id);
        self.windows.insert(
            record.id,
            HeadlessWindow {
                frame: record.frame,
                font_size: record.font_size,
                theme: theme.name().to_string(),
            },
        );
    }

    fn destroy_window(&mut self, id: NoteId) {
        self.windows.remove(&id);
    }

    fn update_window_font_size(&mut self, id: NoteId, size: f32) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.font_size = size;
        }
    }

    fn update_window_theme(&mut self, id: NoteId, theme: &ColorTheme) {
        if let Some(window) = self.windows.get_mut(&id) {
            window.theme = theme.name().to_string();
        }
    }

    fn window_frame(&self, id: NoteId) -> Option<WindowFrame> {
        self.windows.get(&id).map(|window| window.frame)
    }
}
