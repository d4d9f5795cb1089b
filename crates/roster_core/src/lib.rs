//! Core query/mutation engine for the student roster.
//! This crate is the single source of truth for record visibility, matching,
//! paging and mutation rules.

pub mod db;
pub mod logging;
pub mod model;
pub mod query;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::envelope::ApiResponse;
pub use model::student::{
    FieldError, StudentDraft, StudentId, StudentRecord, StudentValidationError,
};
pub use query::filter::StudentFilter;
pub use query::page::{Page, PageRequest, QueryError, SortDirection, SortField};
pub use repo::student_repo::{RepoError, RepoResult, SqliteStudentRepository, StudentRepository};
pub use service::student_service::{
    ServiceResult, StudentService, StudentServiceConfig, StudentServiceError, UpdateOutcome,
    UpdatePolicy,
};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
