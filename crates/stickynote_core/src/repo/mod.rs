//! Note persistence.
//!
//! # Responsibility
//! - Define the storage contract the note manager depends on.
//! - Keep file layout, backup and corruption handling inside this boundary.
//!
//! # Invariants
//! - Failures come back as typed `StorageError` values, never panics.

pub mod note_repo;
