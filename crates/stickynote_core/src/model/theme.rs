//! Color theme catalog.
//!
//! # Responsibility
//! - Define the immutable `ColorTheme` value and the built-in registry.
//! - Derive text contrast from background luminance.
//!
//! # Invariants
//! - The registry holds at least one theme and exactly one default.
//! - Theme names are unique; equality and hashing use `name` only.
//! - Unknown names are a recoverable `ThemeError::NotFound`; callers fall
//!   back to `ThemeRegistry::default_theme()`.

use crate::config::{
    BLUE_THEME_NAME, DARK_THEME_NAME, GREEN_THEME_NAME, PINK_THEME_NAME, WHITE_THEME_NAME,
    YELLOW_THEME_NAME,
};
use once_cell::sync::Lazy;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::hash::{Hash, Hasher};

/// Relative luminance below which a background counts as dark.
pub const DARK_LUMINANCE_THRESHOLD: f64 = 0.179;

/// Text color used on dark backgrounds.
pub const LIGHT_TEXT: Rgba = Rgba::opaque(0xF5, 0xF5, 0xF5);
/// Text color used on light backgrounds.
pub const DARK_TEXT: Rgba = Rgba::opaque(0x1E, 0x1E, 0x1E);

/// 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// WCAG relative luminance in `[0, 1]`. Alpha is ignored.
    pub fn relative_luminance(self) -> f64 {
        0.2126 * linear_channel(self.r)
            + 0.7152 * linear_channel(self.g)
            + 0.0722 * linear_channel(self.b)
    }

    /// `#RRGGBBAA` form.
    pub fn to_hex(self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

fn linear_channel(value: u8) -> f64 {
    let c = f64::from(value) / 255.0;
    if c <= 0.03928 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Picks a readable text color for `background`.
///
/// Total and deterministic: dark backgrounds get `LIGHT_TEXT`, everything
/// else gets `DARK_TEXT`.
pub fn contrasting_text_color(background: Rgba) -> Rgba {
    if background.relative_luminance() < DARK_LUMINANCE_THRESHOLD {
        LIGHT_TEXT
    } else {
        DARK_TEXT
    }
}

/// Named background/text color pair.
#[derive(Debug, Clone)]
pub struct ColorTheme {
    name: String,
    display_name: String,
    background_color: Rgba,
    text_color: Rgba,
}

impl ColorTheme {
    pub fn new(
        name: impl Into<String>,
        display_name: impl Into<String>,
        background_color: Rgba,
        text_color: Rgba,
    ) -> Self {
        Self {
            name: name.into(),
            display_name: display_name.into(),
            background_color,
            text_color,
        }
    }

    /// Builds a theme whose text color is derived from the background.
    pub fn with_contrasting_text(
        name: impl Into<String>,
        display_name: impl Into<String>,
        background_color: Rgba,
    ) -> Self {
        Self::new(
            name,
            display_name,
            background_color,
            contrasting_text_color(background_color),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn background_color(&self) -> Rgba {
        self.background_color
    }

    pub fn text_color(&self) -> Rgba {
        self.text_color
    }

    pub fn is_dark(&self) -> bool {
        self.background_color.relative_luminance() < DARK_LUMINANCE_THRESHOLD
    }

    /// Short phrase for screen readers, e.g. "Yellow note, dark text on light background".
    pub fn accessibility_description(&self) -> String {
        if self.is_dark() {
            format!("{} note, light text on dark background", self.display_name)
        } else {
            format!("{} note, dark text on light background", self.display_name)
        }
    }
}

impl PartialEq for ColorTheme {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ColorTheme {}

impl Hash for ColorTheme {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ThemeError {
    NotFound(String),
}

impl Display for ThemeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(name) => write!(f, "color theme not found: `{name}`"),
        }
    }
}

impl Error for ThemeError {}

static BUILTIN_THEMES: Lazy<Vec<ColorTheme>> = Lazy::new(|| {
    vec![
        ColorTheme::with_contrasting_text(
            YELLOW_THEME_NAME,
            "Yellow",
            Rgba::opaque(0xFF, 0xF7, 0xA5),
        ),
        ColorTheme::with_contrasting_text(PINK_THEME_NAME, "Pink", Rgba::opaque(0xFF, 0xC8, 0xDD)),
        ColorTheme::with_contrasting_text(BLUE_THEME_NAME, "Blue", Rgba::opaque(0xBF, 0xE3, 0xFF)),
        ColorTheme::with_contrasting_text(
            GREEN_THEME_NAME,
            "Green",
            Rgba::opaque(0xC8, 0xF0, 0xC0),
        ),
        ColorTheme::with_contrasting_text(
            WHITE_THEME_NAME,
            "White",
            Rgba::opaque(0xFF, 0xFF, 0xFF),
        ),
        ColorTheme::with_contrasting_text(DARK_THEME_NAME, "Dark", Rgba::opaque(0x2B, 0x2B, 0x2E)),
    ]
});

/// Read-only catalog of built-in themes.
///
/// Zero-sized handle; the backing list is a process-wide immutable static.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeRegistry;

impl ThemeRegistry {
    /// All themes in stable display order.
    pub fn all_themes() -> &'static [ColorTheme] {
        BUILTIN_THEMES.as_slice()
    }

    /// Looks up a theme by name (trimmed, ASCII case-insensitive).
    pub fn theme(name: &str) -> Result<&'static ColorTheme, ThemeError> {
        let needle = name.trim();
        BUILTIN_THEMES
            .iter()
            .find(|theme| theme.name.eq_ignore_ascii_case(needle))
            .ok_or_else(|| ThemeError::NotFound(needle.to_string()))
    }

    pub fn default_theme() -> &'static ColorTheme {
        &BUILTIN_THEMES[0]
    }

    /// Like `theme`, but unknown names resolve to the default theme.
    pub fn resolve(name: &str) -> &'static ColorTheme {
        Self::theme(name).unwrap_or_else(|_| Self::default_theme())
    }

    pub fn contains(name: &str) -> bool {
        Self::theme(name).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_builtin_theme_round_trips_by_name() {
        for theme in ThemeRegistry::all_themes() {
            let found = ThemeRegistry::theme(theme.name()).expect("builtin should resolve");
            assert_eq!(found.display_name(), theme.display_name());
            assert_eq!(found.background_color(), theme.background_color());
            assert_eq!(found.text_color(), theme.text_color());
        }
    }

    #[test]
    fn default_theme_is_listed_and_is_yellow() {
        let default = ThemeRegistry::default_theme();
        assert_eq!(default.name(), YELLOW_THEME_NAME);
        assert!(ThemeRegistry::all_themes().contains(default));
    }

    #[test]
    fn theme_names_are_unique() {
        let names: HashSet<&str> = ThemeRegistry::all_themes()
            .iter()
            .map(ColorTheme::name)
            .collect();
        assert_eq!(names.len(), ThemeRegistry::all_themes().len());
    }

    #[test]
    fn equality_and_hash_use_name_only() {
        let a = ColorTheme::new("Custom", "One", Rgba::opaque(0, 0, 0), LIGHT_TEXT);
        let b = ColorTheme::new("Custom", "Two", Rgba::opaque(255, 255, 255), DARK_TEXT);
        assert_eq!(a, b);

        let mut set = HashSet::new();
        set.insert(a);
        assert!(!set.insert(b));
    }

    #[test]
    fn unknown_name_is_not_found_and_resolves_to_default() {
        let err = ThemeRegistry::theme("Plaid").expect_err("unknown theme");
        assert_eq!(err, ThemeError::NotFound("Plaid".to_string()));
        assert_eq!(ThemeRegistry::resolve("Plaid"), ThemeRegistry::default_theme());
    }

    #[test]
    fn lookup_is_trimmed_and_case_insensitive() {
        assert_eq!(ThemeRegistry::theme("  dark ").unwrap().name(), DARK_THEME_NAME);
    }

    #[test]
    fn contrast_picks_light_text_for_dark_backgrounds() {
        assert_eq!(contrasting_text_color(Rgba::opaque(0, 0, 0)), LIGHT_TEXT);
        assert_eq!(contrasting_text_color(Rgba::opaque(255, 255, 255)), DARK_TEXT);

        let dark = ThemeRegistry::theme(DARK_THEME_NAME).unwrap();
        assert!(dark.is_dark());
        assert_eq!(dark.text_color(), LIGHT_TEXT);
        assert!(dark.accessibility_description().contains("light text"));

        let yellow = ThemeRegistry::default_theme();
        assert!(!yellow.is_dark());
        assert_eq!(yellow.text_color(), DARK_TEXT);
    }

    #[test]
    fn hex_formatting_includes_alpha() {
        assert_eq!(Rgba::new(0x12, 0xAB, 0x00, 0x80).to_hex(), "#12AB0080");
    }
}
