//! Domain model for notes and their appearance.
//!
//! # Responsibility
//! - Define the persisted note record and the immutable theme catalog.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Notes refer to themes by name; the registry is immutable, so a name
//!   can never dangle (unknown names fall back to the default theme).

pub mod note;
pub mod theme;
