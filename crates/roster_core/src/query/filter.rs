//! Record filters for roster read paths.
//!
//! # Invariants
//! - Every filter composes the soft-delete predicate; no filter ever admits
//!   a tombstoned record.
//! - `NameContains` and `PhoneContains` are case-sensitive substring matches.
//! - `Term` is a case-insensitive substring match over name, phone and email.

use crate::model::student::StudentRecord;

/// Row filter applied before sorting and paging.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentFilter {
    /// Every active record.
    Active,
    NameContains(String),
    /// Records without a phone never match.
    PhoneContains(String),
    /// Lowercased free-text term.
    Term(String),
}

impl StudentFilter {
    /// Builds the free-text filter. A missing or blank term lists everything
    /// active; a non-blank term is matched exactly as given, untrimmed.
    pub fn search(term: Option<&str>) -> Self {
        match term {
            Some(value) if !value.trim().is_empty() => Self::Term(value.to_lowercase()),
            _ => Self::Active,
        }
    }

    /// Returns whether `record` is visible and passes this filter.
    pub fn matches(&self, record: &StudentRecord) -> bool {
        record.is_active() && self.matches_fields(record)
    }

    fn matches_fields(&self, record: &StudentRecord) -> bool {
        match self {
            Self::Active => true,
            Self::NameContains(needle) => record.name.contains(needle.as_str()),
            Self::PhoneContains(needle) => record
                .phone
                .as_deref()
                .is_some_and(|phone| phone.contains(needle.as_str())),
            Self::Term(term) => [
                Some(record.name.as_str()),
                record.phone.as_deref(),
                record.email.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|value| value.to_lowercase().contains(term.as_str())),
        }
    }

    /// Short label for log events; never includes the user-supplied value.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::NameContains(_) => "name",
            Self::PhoneContains(_) => "phone",
            Self::Term(_) => "term",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::StudentFilter;
    use crate::model::student::{StudentDraft, StudentRecord};

    fn record(name: &str, phone: Option<&str>, email: Option<&str>) -> StudentRecord {
        let mut draft = StudentDraft::new(name);
        draft.phone = phone.map(str::to_string);
        draft.email = email.map(str::to_string);
        StudentRecord::from_draft(1, &draft, 1_000)
    }

    #[test]
    fn blank_terms_fall_back_to_active() {
        assert_eq!(StudentFilter::search(None), StudentFilter::Active);
        assert_eq!(StudentFilter::search(Some("")), StudentFilter::Active);
        assert_eq!(StudentFilter::search(Some(" \t ")), StudentFilter::Active);
    }

    #[test]
    fn name_match_is_case_sensitive() {
        let li = record("Li Wei", None, None);
        assert!(StudentFilter::NameContains("Wei".to_string()).matches(&li));
        assert!(!StudentFilter::NameContains("wei".to_string()).matches(&li));
    }

    #[test]
    fn term_match_ignores_case_across_fields() {
        let li = record("Li Wei", Some("13800001111"), Some("Li@X.com"));
        assert!(StudentFilter::search(Some("wei")).matches(&li));
        assert!(StudentFilter::search(Some("0001")).matches(&li));
        assert!(StudentFilter::search(Some("x.COM")).matches(&li));
        assert!(!StudentFilter::search(Some("zhang")).matches(&li));
    }

    #[test]
    fn non_blank_term_is_not_trimmed() {
        let li = record("Li Wei", None, None);
        assert!(!StudentFilter::search(Some(" wei ")).matches(&li));
    }

    #[test]
    fn missing_phone_never_matches_phone_filter() {
        let li = record("Li Wei", None, None);
        assert!(!StudentFilter::PhoneContains(String::new()).matches(&li));
    }

    #[test]
    fn tombstoned_records_never_match() {
        let mut li = record("Li Wei", Some("138"), None);
        li.is_deleted = true;
        assert!(!StudentFilter::Active.matches(&li));
        assert!(!StudentFilter::search(Some("138")).matches(&li));
    }
}
