//! Note collection orchestration.
//!
//! # Responsibility
//! - Coordinate preferences, the note repository and the presentation host.
//! - Keep presentation and storage details out of each other's way.

pub mod note_manager;
pub mod presenter;
pub mod scheduler;
