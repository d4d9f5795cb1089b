//! Query engine: filtered, sorted and paged views over student records.
//!
//! # Responsibility
//! - Apply visibility and field filters to a store snapshot.
//! - Sort the full filtered set before any slicing.
//!
//! # Invariants
//! - Ordering is total (ties broken by `id ASC`), so for unchanged data the
//!   pages of one request concatenate to exactly the sorted filtered set.

pub mod filter;
pub mod page;

use crate::model::student::StudentRecord;
use filter::StudentFilter;
use page::{Page, PageRequest};

/// Filters and sorts a snapshot with `request`'s ordering.
pub fn select(
    records: Vec<StudentRecord>,
    filter: &StudentFilter,
    request: &PageRequest,
) -> Vec<StudentRecord> {
    let mut selected: Vec<StudentRecord> = records
        .into_iter()
        .filter(|record| filter.matches(record))
        .collect();
    selected.sort_by(|a, b| request.compare(a, b));
    selected
}

/// Filters, sorts and slices a snapshot into one page.
pub fn select_page(
    records: Vec<StudentRecord>,
    filter: &StudentFilter,
    request: &PageRequest,
) -> Page<StudentRecord> {
    Page::from_sorted(select(records, filter, request), request)
}
