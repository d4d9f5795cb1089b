//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate record-store calls into roster use-cases.
//! - Keep transport and presentation layers decoupled from storage details.

pub mod student_service;
