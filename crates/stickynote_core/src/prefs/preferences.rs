//! Application preferences model.
//!
//! # Responsibility
//! - Hold validated note defaults and auto-save settings.
//! - Load from / save to a `DefaultsStore` and broadcast committed changes.
//!
//! # Invariants
//! - Inputs are clamped or replaced by built-in defaults, never rejected.
//! - Every committed change is persisted before observers are notified.
//! - Storage failures are logged and swallowed; in-memory values stay
//!   authoritative for the rest of the process.

use crate::config::{
    AUTO_SAVE_ENABLED_KEY, AUTO_SAVE_INTERVAL_KEY, DEFAULT_AUTO_SAVE_ENABLED,
    DEFAULT_AUTO_SAVE_INTERVAL, DEFAULT_COLOR_THEME_KEY, DEFAULT_FONT_SIZE, DEFAULT_FONT_SIZE_KEY,
    MAX_AUTO_SAVE_INTERVAL, MAX_FONT_SIZE, MIN_AUTO_SAVE_INTERVAL, MIN_FONT_SIZE,
    WINDOW_POSITIONS_KEY, YELLOW_THEME_NAME,
};
use crate::model::note::{clamp_font_size, NoteId, WindowFrame};
use crate::model::theme::{ColorTheme, ThemeRegistry};
use crate::prefs::defaults_store::DefaultsStore;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};

/// Process-wide preferences handle created at the composition root.
pub type SharedPreferences = Arc<Mutex<Preferences>>;

/// One committed preference change, as delivered to observers.
#[derive(Debug, Clone, PartialEq)]
pub enum PreferencesChange {
    DefaultFontSize(f32),
    DefaultColorTheme(String),
    AutoSaveEnabled(bool),
    AutoSaveInterval(u64),
    /// Every value was restored to its built-in default.
    Reset,
}

/// Snapshot of the user-facing preference values.
#[derive(Debug, Clone, PartialEq)]
pub struct PreferenceValues {
    pub default_font_size: f32,
    pub default_color_theme: String,
    pub auto_save_enabled: bool,
    pub auto_save_interval: u64,
}

impl Default for PreferenceValues {
    fn default() -> Self {
        Self {
            default_font_size: DEFAULT_FONT_SIZE,
            default_color_theme: builtin_default_theme_name().to_string(),
            auto_save_enabled: DEFAULT_AUTO_SAVE_ENABLED,
            auto_save_interval: DEFAULT_AUTO_SAVE_INTERVAL,
        }
    }
}

fn builtin_default_theme_name() -> &'static str {
    ThemeRegistry::theme(YELLOW_THEME_NAME)
        .unwrap_or_else(|_| ThemeRegistry::default_theme())
        .name()
}

/// Preferences bound to a defaults store.
pub struct Preferences {
    store: Box<dyn DefaultsStore>,
    values: PreferenceValues,
    window_positions: BTreeMap<NoteId, WindowFrame>,
    observers: Vec<Sender<PreferencesChange>>,
}

impl Preferences {
    /// Creates preferences and loads stored values immediately.
    ///
    /// Absent or malformed stored values fall back to built-in defaults.
    pub fn load(store: Box<dyn DefaultsStore>) -> Self {
        let mut preferences = Self {
            store,
            values: PreferenceValues::default(),
            window_positions: BTreeMap::new(),
            observers: Vec::new(),
        };
        preferences.load_defaults();
        preferences
    }

    /// Wraps these preferences for sharing between the host and the manager.
    pub fn into_shared(self) -> SharedPreferences {
        Arc::new(Mutex::new(self))
    }

    /// Re-reads every value from the store. Does not notify observers.
    pub fn load_defaults(&mut self) {
        let defaults = PreferenceValues::default();

        self.values.default_font_size = self
            .read(DEFAULT_FONT_SIZE_KEY)
            .and_then(|raw| raw.trim().parse::<f32>().ok())
            .filter(|value| value.is_finite())
            .map(clamp_font_size)
            .unwrap_or(defaults.default_font_size);

        self.values.default_color_theme = self
            .read(DEFAULT_COLOR_THEME_KEY)
            .and_then(|raw| ThemeRegistry::theme(&raw).ok())
            .map(|theme| theme.name().to_string())
            .unwrap_or(defaults.default_color_theme);

        self.values.auto_save_enabled = self
            .read(AUTO_SAVE_ENABLED_KEY)
            .and_then(|raw| parse_bool(&raw))
            .unwrap_or(defaults.auto_save_enabled);

        self.values.auto_save_interval = self
            .read(AUTO_SAVE_INTERVAL_KEY)
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map(Self::clamped_auto_save_interval)
            .unwrap_or(defaults.auto_save_interval);

        self.window_positions = self
            .read(WINDOW_POSITIONS_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(map) => Some(map),
                Err(err) => {
                    warn!(
                        "event=prefs_load module=prefs status=degraded key={} error={}",
                        WINDOW_POSITIONS_KEY, err
                    );
                    None
                }
            })
            .unwrap_or_default();

        debug!(
            "event=prefs_load module=prefs status=ok font_size={} theme={} auto_save={} interval={}",
            self.values.default_font_size,
            self.values.default_color_theme,
            self.values.auto_save_enabled,
            self.values.auto_save_interval
        );
    }

    /// Writes every value to the store.
    pub fn save_defaults(&mut self) {
        let entries = [
            (
                DEFAULT_FONT_SIZE_KEY,
                self.values.default_font_size.to_string(),
            ),
            (
                DEFAULT_COLOR_THEME_KEY,
                self.values.default_color_theme.clone(),
            ),
            (
                AUTO_SAVE_ENABLED_KEY,
                self.values.auto_save_enabled.to_string(),
            ),
            (
                AUTO_SAVE_INTERVAL_KEY,
                self.values.auto_save_interval.to_string(),
            ),
        ];
        for (key, value) in entries {
            self.write(key, &value);
        }
        self.save_window_positions();
    }

    /// Restores built-in values, persists them and notifies observers.
    ///
    /// Window positions are placement hints, not preferences; they survive.
    pub fn reset_to_defaults(&mut self) {
        self.values = PreferenceValues::default();
        self.save_defaults();
        self.notify(PreferencesChange::Reset);
    }

    /// Registers an observer; changes are delivered in commit order.
    pub fn subscribe(&mut self) -> Receiver<PreferencesChange> {
        let (tx, rx) = channel();
        self.observers.push(tx);
        rx
    }

    pub fn values(&self) -> &PreferenceValues {
        &self.values
    }

    pub fn default_font_size(&self) -> f32 {
        self.values.default_font_size
    }

    pub fn default_color_theme(&self) -> &'static ColorTheme {
        ThemeRegistry::resolve(&self.values.default_color_theme)
    }

    pub fn auto_save_enabled(&self) -> bool {
        self.values.auto_save_enabled
    }

    /// Auto-save period in seconds.
    pub fn auto_save_interval(&self) -> u64 {
        self.values.auto_save_interval
    }

    pub fn set_default_font_size(&mut self, size: f32) {
        let clamped = Self::clamped_font_size(size);
        self.write(DEFAULT_FONT_SIZE_KEY, &clamped.to_string());
        if clamped != self.values.default_font_size {
            self.values.default_font_size = clamped;
            self.notify(PreferencesChange::DefaultFontSize(clamped));
        }
    }

    /// Sets the default theme by name; unknown names select the registry default.
    pub fn set_default_color_theme(&mut self, name: &str) -> &'static ColorTheme {
        let theme = ThemeRegistry::resolve(name);
        self.write(DEFAULT_COLOR_THEME_KEY, theme.name());
        if theme.name() != self.values.default_color_theme {
            self.values.default_color_theme = theme.name().to_string();
            self.notify(PreferencesChange::DefaultColorTheme(
                theme.name().to_string(),
            ));
        }
        theme
    }

    pub fn set_auto_save_enabled(&mut self, enabled: bool) {
        self.write(AUTO_SAVE_ENABLED_KEY, &enabled.to_string());
        if enabled != self.values.auto_save_enabled {
            self.values.auto_save_enabled = enabled;
            self.notify(PreferencesChange::AutoSaveEnabled(enabled));
        }
    }

    /// Sets the auto-save period in seconds (clamped).
    pub fn set_auto_save_interval(&mut self, seconds: u64) {
        let clamped = Self::clamped_auto_save_interval(seconds);
        self.write(AUTO_SAVE_INTERVAL_KEY, &clamped.to_string());
        if clamped != self.values.auto_save_interval {
            self.values.auto_save_interval = clamped;
            self.notify(PreferencesChange::AutoSaveInterval(clamped));
        }
    }

    pub fn is_valid_font_size(size: f32) -> bool {
        (MIN_FONT_SIZE..=MAX_FONT_SIZE).contains(&size)
    }

    pub fn clamped_font_size(size: f32) -> f32 {
        clamp_font_size(size)
    }

    pub fn clamped_auto_save_interval(seconds: u64) -> u64 {
        seconds.clamp(MIN_AUTO_SAVE_INTERVAL, MAX_AUTO_SAVE_INTERVAL)
    }

    /// Last recorded placement per note.
    pub fn window_positions(&self) -> &BTreeMap<NoteId, WindowFrame> {
        &self.window_positions
    }

    pub fn window_position(&self, id: NoteId) -> Option<WindowFrame> {
        self.window_positions.get(&id).copied()
    }

    /// Records placement hints for several notes with one store write.
    pub fn set_window_positions<I>(&mut self, frames: I)
    where
        I: IntoIterator<Item = (NoteId, WindowFrame)>,
    {
        let mut changed = false;
        for (id, frame) in frames {
            if self.window_positions.insert(id, frame) != Some(frame) {
                changed = true;
            }
        }
        if changed {
            self.save_window_positions();
        }
    }

    pub fn set_window_position(&mut self, id: NoteId, frame: WindowFrame) {
        self.set_window_positions([(id, frame)]);
    }

    pub fn remove_window_position(&mut self, id: NoteId) {
        if self.window_positions.remove(&id).is_some() {
            self.save_window_positions();
        }
    }

    fn save_window_positions(&mut self) {
        match serde_json::to_string(&self.window_positions) {
            Ok(encoded) => self.write(WINDOW_POSITIONS_KEY, &encoded),
            Err(err) => warn!(
                "event=prefs_save module=prefs status=error key={} error={}",
                WINDOW_POSITIONS_KEY, err
            ),
        }
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    "event=prefs_load module=prefs status=error key={} error={}",
                    key, err
                );
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(err) = self.store.set(key, value) {
            warn!(
                "event=prefs_save module=prefs status=error key={} error={}",
                key, err
            );
        }
    }

    fn notify(&mut self, change: PreferencesChange) {
        debug!("event=prefs_changed module=prefs change={:?}", change);
        self.observers
            .retain(|observer| observer.send(change.clone()).is_ok());
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Some(true),
        "false" | "0" | "no" => Some(false),
        _ => None,
    }
}
