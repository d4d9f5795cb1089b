//! Paging and sorting parameters plus the page result shape.
//!
//! # Invariants
//! - `size` is always >= 1 once a [`PageRequest`] exists.
//! - `total_pages` is never 0; an empty result still has one (empty) page.

use crate::model::student::StudentRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const DEFAULT_PAGE: u32 = 0;
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// Rejected paging or sorting input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Page size must be at least one.
    InvalidPageSize(u32),
    UnknownSortField(String),
    /// Direction other than `ASC`/`DESC` (any case).
    InvalidSortDirection(String),
}

impl Display for QueryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPageSize(size) => write!(f, "page size must be at least 1, got {size}"),
            Self::UnknownSortField(field) => write!(f, "unknown sort field `{field}`"),
            Self::InvalidSortDirection(value) => {
                write!(f, "invalid sort direction `{value}`; expected ASC|DESC")
            }
        }
    }
}

impl Error for QueryError {}

/// Sort direction, parsed case-insensitively.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl FromStr for SortDirection {
    type Err = QueryError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(Self::Asc),
            "DESC" => Ok(Self::Desc),
            _ => Err(QueryError::InvalidSortDirection(value.to_string())),
        }
    }
}

/// Sortable student column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Id,
    OwnerId,
    Name,
    Gender,
    Phone,
    Age,
    NativePlace,
    Major,
    Email,
    Tag,
    Remark,
    CreatedAt,
    UpdatedAt,
    CreatorId,
}

impl FromStr for SortField {
    type Err = QueryError;

    /// Accepts snake_case, camelCase and the legacy column aliases.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let field = match value.trim() {
            "id" => Self::Id,
            "owner_id" | "ownerId" | "userId" => Self::OwnerId,
            "name" => Self::Name,
            "gender" => Self::Gender,
            "phone" => Self::Phone,
            "age" => Self::Age,
            "native_place" | "nativePlace" => Self::NativePlace,
            "major" => Self::Major,
            "email" => Self::Email,
            "tag" => Self::Tag,
            "remark" => Self::Remark,
            "created_at" | "createdAt" | "createTime" => Self::CreatedAt,
            "updated_at" | "updatedAt" | "modifyTime" => Self::UpdatedAt,
            "creator_id" | "creatorId" | "creator" => Self::CreatorId,
            other => return Err(QueryError::UnknownSortField(other.to_string())),
        };
        Ok(field)
    }
}

impl SortField {
    /// Compares two records on this column only. `None` sorts before `Some`.
    pub fn compare(self, a: &StudentRecord, b: &StudentRecord) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::OwnerId => a.owner_id.cmp(&b.owner_id),
            Self::Name => a.name.cmp(&b.name),
            Self::Gender => a.gender.cmp(&b.gender),
            Self::Phone => a.phone.cmp(&b.phone),
            Self::Age => a.age.cmp(&b.age),
            Self::NativePlace => a.native_place.cmp(&b.native_place),
            Self::Major => a.major.cmp(&b.major),
            Self::Email => a.email.cmp(&b.email),
            Self::Tag => a.tag.cmp(&b.tag),
            Self::Remark => a.remark.cmp(&b.remark),
            Self::CreatedAt => a.created_at.cmp(&b.created_at),
            Self::UpdatedAt => a.updated_at.cmp(&b.updated_at),
            Self::CreatorId => a.creator_id.cmp(&b.creator_id),
        }
    }
}

/// Validated paging and sorting request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: u32,
    size: u32,
    pub sort_field: SortField,
    pub direction: SortDirection,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            size: DEFAULT_PAGE_SIZE,
            sort_field: SortField::Id,
            direction: SortDirection::Asc,
        }
    }
}

impl PageRequest {
    /// Creates a request sorted by `id ASC`.
    ///
    /// # Errors
    /// - [`QueryError::InvalidPageSize`] when `size == 0`.
    pub fn new(page: u32, size: u32) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::InvalidPageSize(size));
        }
        Ok(Self {
            page,
            size,
            ..Self::default()
        })
    }

    /// Replaces the sort column and direction.
    pub fn sorted_by(self, sort_field: SortField, direction: SortDirection) -> Self {
        Self {
            sort_field,
            direction,
            ..self
        }
    }

    /// Builds a request from raw optional parameters, filling defaults
    /// (`page=0`, `size=10`, `sort=id`, `direction=ASC`).
    pub fn from_params(
        page: Option<u32>,
        size: Option<u32>,
        sort: Option<&str>,
        direction: Option<&str>,
    ) -> Result<Self, QueryError> {
        let sort_field = sort
            .map(str::parse::<SortField>)
            .transpose()?
            .unwrap_or_default();
        let direction = direction
            .map(str::parse::<SortDirection>)
            .transpose()?
            .unwrap_or_default();
        Ok(Self::new(
            page.unwrap_or(DEFAULT_PAGE),
            size.unwrap_or(DEFAULT_PAGE_SIZE),
        )?
        .sorted_by(sort_field, direction))
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Index of the first item on this page within the sorted set.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Full ordering: requested column and direction, then `id ASC` to break ties.
    pub fn compare(&self, a: &StudentRecord, b: &StudentRecord) -> Ordering {
        let primary = self.sort_field.compare(a, b);
        let primary = match self.direction {
            SortDirection::Asc => primary,
            SortDirection::Desc => primary.reverse(),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

/// One page of a sorted result set plus position metadata.
///
/// Serialized as `{content, currentPage, totalItems, totalPages, size, first,
/// last, empty}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub current_page: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub size: u32,
    #[serde(rename = "first")]
    pub is_first: bool,
    #[serde(rename = "last")]
    pub is_last: bool,
    #[serde(rename = "empty")]
    pub is_empty: bool,
}

impl<T> Page<T> {
    /// Slices an already sorted, already filtered set according to `request`.
    pub fn from_sorted(sorted: Vec<T>, request: &PageRequest) -> Self {
        let total_items = sorted.len() as u64;
        let total_pages = total_pages(total_items, request.size);
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content: Vec<T> = sorted
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Self {
            is_empty: content.is_empty(),
            content,
            current_page: request.page,
            total_items,
            total_pages,
            size: request.size,
            is_first: request.page == 0,
            is_last: u64::from(request.page) == total_pages - 1,
        }
    }

    /// Projects page content while keeping the metadata.
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            content: self.content.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_items: self.total_items,
            total_pages: self.total_pages,
            size: self.size,
            is_first: self.is_first,
            is_last: self.is_last,
            is_empty: self.is_empty,
        }
    }
}

fn total_pages(total_items: u64, size: u32) -> u64 {
    total_items.div_ceil(u64::from(size)).max(1)
}

#[cfg(test)]
mod tests {
    use super::{total_pages, Page, PageRequest, QueryError, SortDirection, SortField};

    #[test]
    fn total_pages_is_at_least_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 3), 9);
    }

    #[test]
    fn from_params_fills_defaults() {
        let request = PageRequest::from_params(None, None, None, None).unwrap();
        assert_eq!(request, PageRequest::default());
        assert_eq!(request.size(), 10);
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("desc".parse::<SortDirection>().unwrap(), SortDirection::Desc);
        assert_eq!("Asc".parse::<SortDirection>().unwrap(), SortDirection::Asc);
        assert!(matches!(
            "down".parse::<SortDirection>(),
            Err(QueryError::InvalidSortDirection(_))
        ));
    }

    #[test]
    fn sort_field_accepts_aliases() {
        assert_eq!("nativePlace".parse::<SortField>().unwrap(), SortField::NativePlace);
        assert_eq!("native_place".parse::<SortField>().unwrap(), SortField::NativePlace);
        assert_eq!("createTime".parse::<SortField>().unwrap(), SortField::CreatedAt);
        assert!(matches!(
            "salary".parse::<SortField>(),
            Err(QueryError::UnknownSortField(field)) if field == "salary"
        ));
    }

    #[test]
    fn zero_size_is_rejected() {
        assert_eq!(PageRequest::new(0, 0), Err(QueryError::InvalidPageSize(0)));
    }

    #[test]
    fn page_past_the_end_is_empty_and_not_last() {
        let request = PageRequest::new(5, 2).unwrap();
        let page = Page::from_sorted(vec![1, 2, 3], &request);
        assert!(page.is_empty);
        assert!(!page.is_first);
        assert!(!page.is_last);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.total_items, 3);
    }

    #[test]
    fn empty_set_yields_single_first_and_last_page() {
        let page = Page::<i32>::from_sorted(Vec::new(), &PageRequest::default());
        assert!(page.is_first);
        assert!(page.is_last);
        assert!(page.is_empty);
        assert_eq!(page.total_pages, 1);
    }

    #[test]
    fn map_keeps_metadata() {
        let request = PageRequest::new(1, 2).unwrap();
        let page = Page::from_sorted(vec![1, 2, 3], &request).map(|n| n * 10);
        assert_eq!(page.content, vec![30]);
        assert_eq!(page.current_page, 1);
        assert!(page.is_last);
    }
}
