//! Note domain model.
//!
//! # Responsibility
//! - Define the canonical record persisted for one sticky note.
//! - Own per-field clamping so every record holds in-range values.
//!
//! # Invariants
//! - `id` is stable for the note lifetime and never reused.
//! - `font_size` always lies in `[MIN_FONT_SIZE, MAX_FONT_SIZE]` once a
//!   setter or `normalized()` has run.
//! - `theme` is a registry name; unknown names resolve to the default theme
//!   at display time instead of failing.

use crate::config::{
    DEFAULT_WINDOW_HEIGHT, DEFAULT_WINDOW_WIDTH, MAX_FONT_SIZE, MIN_FONT_SIZE, MIN_WINDOW_HEIGHT,
    MIN_WINDOW_WIDTH,
};
use crate::model::theme::{ColorTheme, ThemeRegistry};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable note identifier; also the handle the presenter addresses.
pub type NoteId = Uuid;

/// Clamps a font size into the supported range.
///
/// Non-finite input collapses to the minimum.
pub fn clamp_font_size(size: f32) -> f32 {
    if size.is_nan() {
        return MIN_FONT_SIZE;
    }
    size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)
}

/// Window position and size. Advisory only; used to restore placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowFrame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl WindowFrame {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when every field is finite and the size meets the window minimum.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|value| value.is_finite())
            && self.width >= MIN_WINDOW_WIDTH
            && self.height >= MIN_WINDOW_HEIGHT
    }
}

impl Default for WindowFrame {
    fn default() -> Self {
        Self::new(0.0, 0.0, DEFAULT_WINDOW_WIDTH, DEFAULT_WINDOW_HEIGHT)
    }
}

/// Lifecycle of a live note relative to its persisted file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    /// In memory only; never written.
    Created,
    /// Matches its persisted file.
    Synced,
    /// Changed since the last successful write.
    Dirty,
}

impl NoteState {
    /// Whether a save pass must write this note.
    pub fn needs_save(self) -> bool {
        matches!(self, Self::Created | Self::Dirty)
    }
}

/// Persisted content and appearance of one note.
///
/// Serialized as-is into the note file. Transient state (dirty tracking,
/// theme preview) lives in the manager, never here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteRecord {
    pub id: NoteId,
    pub text: String,
    pub font_size: f32,
    pub theme: String,
    pub frame: WindowFrame,
    /// Font size was set explicitly for this note rather than inherited.
    #[serde(default)]
    pub font_size_customized: bool,
    /// Theme was set explicitly for this note rather than inherited.
    #[serde(default)]
    pub theme_customized: bool,
}

impl NoteRecord {
    /// Creates a record with a fresh random ID.
    pub fn new(text: impl Into<String>, font_size: f32, theme: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), text, font_size, theme)
    }

    /// Creates a record with a caller-provided ID.
    ///
    /// Appearance fields count as inherited (not customized).
    pub fn with_id(
        id: NoteId,
        text: impl Into<String>,
        font_size: f32,
        theme: impl Into<String>,
    ) -> Self {
        Self {
            id,
            text: text.into(),
            font_size: clamp_font_size(font_size),
            theme: theme.into(),
            frame: WindowFrame::default(),
            font_size_customized: false,
            theme_customized: false,
        }
    }

    /// Resolved theme; unknown names fall back to the registry default.
    pub fn color_theme(&self) -> &'static ColorTheme {
        ThemeRegistry::resolve(&self.theme)
    }

    /// Clamps font size and canonicalizes the theme name after loading.
    ///
    /// Returns `true` when any field changed.
    pub fn normalize(&mut self) -> bool {
        let clamped = clamp_font_size(self.font_size);
        let canonical = self.color_theme().name();
        let changed = clamped != self.font_size || canonical != self.theme;
        self.font_size = clamped;
        if canonical != self.theme {
            self.theme = canonical.to_string();
        }
        changed
    }
}
