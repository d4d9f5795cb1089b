//! Student use-case service: query engine and mutation workflow.
//!
//! # Responsibility
//! - Provide list/search/find entry points in unpaged and paged forms.
//! - Run create/update/delete with existence and tombstone checks.
//!
//! # Invariants
//! - Every read path, including get-by-id, hides soft-deleted records.
//! - Unpaged reads are ordered by `id ASC`.
//! - Updates never resurrect or create records; deletes never hard-delete.
//! - Log events carry ids and counts only, never field values.

use crate::model::student::{now_epoch_ms, StudentDraft, StudentId, StudentRecord};
use crate::query::filter::StudentFilter;
use crate::query::page::{Page, PageRequest, QueryError};
use crate::query::{select, select_page};
use crate::repo::student_repo::{RepoError, StudentRepository};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ServiceResult<T> = Result<T, StudentServiceError>;

/// Service error for student use-cases.
#[derive(Debug)]
pub enum StudentServiceError {
    /// Paging or sorting input was rejected.
    InvalidQuery(QueryError),
    /// Update targeted a missing or soft-deleted record under
    /// [`UpdatePolicy::Strict`].
    NoOpUpdate(StudentId),
    /// Persistence-layer failure, including draft validation.
    Repo(RepoError),
    /// Write succeeded but the read-back disagreed.
    InconsistentState(&'static str),
}

impl Display for StudentServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidQuery(err) => write!(f, "{err}"),
            Self::NoOpUpdate(id) => write!(f, "student not found or deleted: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => {
                write!(f, "inconsistent student state: {details}")
            }
        }
    }
}

impl Error for StudentServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidQuery(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for StudentServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<QueryError> for StudentServiceError {
    fn from(value: QueryError) -> Self {
        Self::InvalidQuery(value)
    }
}

/// How an update of a missing or soft-deleted record is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpdatePolicy {
    /// Silently ignore the update and hand back the caller's draft.
    #[default]
    Lenient,
    /// Fail with [`StudentServiceError::NoOpUpdate`].
    Strict,
}

/// Service configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StudentServiceConfig {
    pub update_policy: UpdatePolicy,
}

/// Result of an update request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// Stored record after the overwrite.
    Updated(StudentRecord),
    /// Target was missing or deleted; the caller's draft, untouched.
    Ignored(StudentDraft),
}

impl UpdateOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, Self::Updated(_))
    }
}

/// Student service facade over a record store.
pub struct StudentService<R: StudentRepository> {
    repo: R,
    config: StudentServiceConfig,
}

impl<R: StudentRepository> StudentService<R> {
    /// Creates a service with the default (lenient) configuration.
    pub fn new(repo: R) -> Self {
        Self::with_config(repo, StudentServiceConfig::default())
    }

    pub fn with_config(repo: R, config: StudentServiceConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> StudentServiceConfig {
        self.config
    }

    /// Gets one active record by id. Soft-deleted records read as `None`.
    pub fn get_student(&self, id: StudentId) -> ServiceResult<Option<StudentRecord>> {
        Ok(self.repo.get_student(id, false)?)
    }

    /// Lists every active record ordered by id.
    pub fn list_active(&self) -> ServiceResult<Vec<StudentRecord>> {
        self.query(&StudentFilter::Active)
    }

    pub fn list_active_page(&self, request: &PageRequest) -> ServiceResult<Page<StudentRecord>> {
        self.query_page(&StudentFilter::Active, request)
    }

    /// Active records whose name contains `name` (case-sensitive).
    pub fn find_by_name(&self, name: &str) -> ServiceResult<Vec<StudentRecord>> {
        self.query(&StudentFilter::NameContains(name.to_string()))
    }

    pub fn find_by_name_page(
        &self,
        name: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<StudentRecord>> {
        self.query_page(&StudentFilter::NameContains(name.to_string()), request)
    }

    /// Active records whose phone contains `phone` (case-sensitive).
    pub fn find_by_phone(&self, phone: &str) -> ServiceResult<Vec<StudentRecord>> {
        self.query(&StudentFilter::PhoneContains(phone.to_string()))
    }

    pub fn find_by_phone_page(
        &self,
        phone: &str,
        request: &PageRequest,
    ) -> ServiceResult<Page<StudentRecord>> {
        self.query_page(&StudentFilter::PhoneContains(phone.to_string()), request)
    }

    /// Free-text search over name, phone and email, ignoring case.
    ///
    /// A missing or blank term behaves exactly like [`Self::list_active`].
    pub fn search(&self, term: Option<&str>) -> ServiceResult<Vec<StudentRecord>> {
        self.query(&StudentFilter::search(term))
    }

    pub fn search_page(
        &self,
        term: Option<&str>,
        request: &PageRequest,
    ) -> ServiceResult<Page<StudentRecord>> {
        self.query_page(&StudentFilter::search(term), request)
    }

    /// Creates one active record and returns it with its assigned id.
    ///
    /// # Errors
    /// - [`RepoError::Validation`] (wrapped) when the draft breaks a field rule.
    pub fn create_student(&self, draft: &StudentDraft) -> ServiceResult<StudentRecord> {
        let record = self.repo.insert_student(draft, now_epoch_ms())?;
        info!(
            "event=student_create module=service status=ok id={}",
            record.id
        );
        Ok(record)
    }

    /// Overwrites the mutable fields of an active record.
    ///
    /// `id`, `created_at`, `owner_id` and `creator_id` are kept.
    /// A missing or soft-deleted target yields [`UpdateOutcome::Ignored`]
    /// under the lenient policy and [`StudentServiceError::NoOpUpdate`] under
    /// the strict one; neither creates a record.
    pub fn update_student(
        &self,
        id: StudentId,
        draft: StudentDraft,
    ) -> ServiceResult<UpdateOutcome> {
        match self.repo.update_student(id, &draft, now_epoch_ms()) {
            Ok(()) => {}
            Err(RepoError::NotFound(_)) => {
                return match self.config.update_policy {
                    UpdatePolicy::Lenient => {
                        warn!("event=student_update module=service status=ignored id={id}");
                        Ok(UpdateOutcome::Ignored(draft))
                    }
                    UpdatePolicy::Strict => {
                        warn!("event=student_update module=service status=error id={id} error_code=no_op_update");
                        Err(StudentServiceError::NoOpUpdate(id))
                    }
                };
            }
            Err(err) => return Err(err.into()),
        }

        let updated = self
            .repo
            .get_student(id, false)?
            .ok_or(StudentServiceError::InconsistentState(
                "updated student not found in read-back",
            ))?;
        info!("event=student_update module=service status=ok id={id}");
        Ok(UpdateOutcome::Updated(updated))
    }

    /// Soft-deletes a record. Returns `false` only when the id never existed;
    /// deleting an already-deleted record returns `true` and changes nothing.
    pub fn delete_student(&self, id: StudentId) -> ServiceResult<bool> {
        match self.repo.soft_delete_student(id, now_epoch_ms()) {
            Ok(()) => {
                info!("event=student_delete module=service status=ok id={id}");
                Ok(true)
            }
            Err(RepoError::NotFound(_)) => {
                info!("event=student_delete module=service status=not_found id={id}");
                Ok(false)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn query(&self, filter: &StudentFilter) -> ServiceResult<Vec<StudentRecord>> {
        let snapshot = self.repo.list_students(false)?;
        let selected = select(snapshot, filter, &PageRequest::default());
        debug!(
            "event=student_query module=service status=ok filter={} paged=false total={}",
            filter.kind(),
            selected.len()
        );
        Ok(selected)
    }

    fn query_page(
        &self,
        filter: &StudentFilter,
        request: &PageRequest,
    ) -> ServiceResult<Page<StudentRecord>> {
        let snapshot = self.repo.list_students(false)?;
        let page = select_page(snapshot, filter, request);
        debug!(
            "event=student_query module=service status=ok filter={} paged=true page={} size={} total={}",
            filter.kind(),
            page.current_page,
            page.size,
            page.total_items
        );
        Ok(page)
    }
}
