//! User preferences and the key-value store they persist to.
//!
//! # Responsibility
//! - Provide validated note defaults and auto-save settings.
//! - Keep storage backend details behind `DefaultsStore`.

pub mod defaults_store;
pub mod preferences;
