//! Roster domain model.
//!
//! # Responsibility
//! - Define the student record, the draft shape callers submit, and the
//!   response envelope used by presentation layers.
//!
//! # Invariants
//! - Every student is identified by a stable store-assigned `StudentId`.
//! - Deletion is a soft-delete tombstone, never a physical removal.

pub mod envelope;
pub mod student;
