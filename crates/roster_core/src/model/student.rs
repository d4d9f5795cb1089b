//! Student domain model.
//!
//! # Responsibility
//! - Define the canonical student record and the caller-supplied draft shape.
//! - Provide the soft-delete visibility predicate shared by every read path.
//! - Validate draft fields before they reach persistence.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another record.
//! - `is_deleted` only moves from `false` to `true`.
//! - `created_at <= updated_at`.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::{SystemTime, UNIX_EPOCH};

/// Store-assigned student identifier.
pub type StudentId = i64;

pub const NAME_MAX_CHARS: usize = 64;
pub const GENDER_MAX_CHARS: usize = 8;
pub const PHONE_MAX_CHARS: usize = 16;
pub const NATIVE_PLACE_MAX_CHARS: usize = 64;
pub const MAJOR_MAX_CHARS: usize = 128;
pub const EMAIL_MAX_CHARS: usize = 32;
pub const TAG_MAX_CHARS: usize = 512;
pub const REMARK_MAX_CHARS: usize = 512;

static PHONE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]*$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+",
        r"@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?",
        r"(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)*$",
    ))
    .expect("valid email regex")
});

/// Persisted student record.
///
/// Serialized with camelCase keys; `is_deleted` is exposed as `deleted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: StudentId,
    /// Opaque external reference (for example the owning account).
    pub owner_id: Option<i64>,
    pub name: String,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub native_place: Option<String>,
    pub major: Option<String>,
    pub email: Option<String>,
    /// Comma-separated labels by convention.
    pub tag: Option<String>,
    pub remark: Option<String>,
    /// Unix epoch milliseconds, written once on insert.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by every successful mutation.
    pub updated_at: i64,
    #[serde(rename = "deleted")]
    pub is_deleted: bool,
    pub creator_id: Option<i64>,
}

impl StudentRecord {
    /// Builds the record the store persists for a freshly created draft.
    ///
    /// `is_deleted` is always `false` here; callers cannot create tombstones.
    pub fn from_draft(id: StudentId, draft: &StudentDraft, now_ms: i64) -> Self {
        Self {
            id,
            owner_id: draft.owner_id,
            name: draft.name.clone(),
            gender: draft.gender.clone(),
            phone: draft.phone.clone(),
            age: draft.age,
            native_place: draft.native_place.clone(),
            major: draft.major.clone(),
            email: draft.email.clone(),
            tag: draft.tag.clone(),
            remark: draft.remark.clone(),
            created_at: now_ms,
            updated_at: now_ms,
            is_deleted: false,
            creator_id: draft.creator_id,
        }
    }

    /// Soft-delete visibility predicate. Every read path composes this.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Splits `tag` on commas into trimmed, non-empty labels.
    pub fn tags(&self) -> Vec<&str> {
        self.tag
            .as_deref()
            .map(|value| {
                value
                    .split(',')
                    .map(str::trim)
                    .filter(|label| !label.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Projects the record back into its caller-facing draft shape.
    pub fn to_draft(&self) -> StudentDraft {
        StudentDraft {
            owner_id: self.owner_id,
            name: self.name.clone(),
            gender: self.gender.clone(),
            phone: self.phone.clone(),
            age: self.age,
            native_place: self.native_place.clone(),
            major: self.major.clone(),
            email: self.email.clone(),
            tag: self.tag.clone(),
            remark: self.remark.clone(),
            creator_id: self.creator_id,
        }
    }
}

/// Caller-supplied student fields for create and update.
///
/// Carries no id, timestamps or deleted flag; those belong to the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDraft {
    pub owner_id: Option<i64>,
    pub name: String,
    pub gender: Option<String>,
    pub phone: Option<String>,
    pub age: Option<i32>,
    pub native_place: Option<String>,
    pub major: Option<String>,
    pub email: Option<String>,
    pub tag: Option<String>,
    pub remark: Option<String>,
    /// Only honored on create; updates never touch the stored creator.
    pub creator_id: Option<i64>,
}

impl StudentDraft {
    /// Creates a draft with only the required `name` populated.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Checks every field constraint and reports all violations at once.
    ///
    /// # Errors
    /// - Returns [`StudentValidationError`] listing each offending field in
    ///   declaration order.
    pub fn validate(&self) -> Result<(), StudentValidationError> {
        let mut errors = Vec::new();

        if self.name.trim().is_empty() {
            errors.push(FieldError::new("name", "name is required"));
        } else {
            check_max_chars(&mut errors, "name", Some(self.name.as_str()), NAME_MAX_CHARS);
        }
        check_max_chars(&mut errors, "gender", self.gender.as_deref(), GENDER_MAX_CHARS);

        if let Some(phone) = self.phone.as_deref() {
            if !PHONE_RE.is_match(phone) {
                errors.push(FieldError::new("phone", "phone must contain only digits"));
            }
        }
        check_max_chars(&mut errors, "phone", self.phone.as_deref(), PHONE_MAX_CHARS);
        check_max_chars(
            &mut errors,
            "nativePlace",
            self.native_place.as_deref(),
            NATIVE_PLACE_MAX_CHARS,
        );
        check_max_chars(&mut errors, "major", self.major.as_deref(), MAJOR_MAX_CHARS);

        if let Some(email) = self.email.as_deref() {
            // Empty means "no email" to form-based callers.
            if !email.is_empty() && !EMAIL_RE.is_match(email) {
                errors.push(FieldError::new("email", "email must be well-formed"));
            }
        }
        check_max_chars(&mut errors, "email", self.email.as_deref(), EMAIL_MAX_CHARS);
        check_max_chars(&mut errors, "tag", self.tag.as_deref(), TAG_MAX_CHARS);
        check_max_chars(&mut errors, "remark", self.remark.as_deref(), REMARK_MAX_CHARS);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(StudentValidationError { errors })
        }
    }
}

fn check_max_chars(
    errors: &mut Vec<FieldError>,
    field: &'static str,
    value: Option<&str>,
    max: usize,
) {
    if let Some(value) = value {
        if value.chars().count() > max {
            errors.push(FieldError::new(
                field,
                format!("{field} must be at most {max} characters"),
            ));
        }
    }
}

/// One violated field constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// camelCase field name as exposed on the wire.
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Structured validation failure for a student draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudentValidationError {
    pub errors: Vec<FieldError>,
}

impl StudentValidationError {
    /// Returns whether `field` is among the violations.
    pub fn has_field(&self, field: &str) -> bool {
        self.errors.iter().any(|error| error.field == field)
    }
}

impl Display for StudentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid student fields:")?;
        for error in &self.errors {
            write!(f, " {}: {};", error.field, error.message)?;
        }
        Ok(())
    }
}

impl Error for StudentValidationError {}

/// Current wall-clock time in Unix epoch milliseconds.
pub fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
