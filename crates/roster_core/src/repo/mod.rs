//! Repository layer: the student record store.
//!
//! # Responsibility
//! - Define the storage contract consumed by the roster services.
//! - Isolate SQLite query details from query/mutation orchestration.
//!
//! # Invariants
//! - Repository writes enforce `StudentDraft::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod student_repo;
