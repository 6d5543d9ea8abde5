//! Client-side search and status filtering of a loaded collection

use crate::models::{ListResource, RecordStatus};
use crate::utils::validation::contains_ignore_case;

/// Status selector of the list toolbar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(RecordStatus),
}

impl StatusFilter {
    pub fn matches(&self, status: RecordStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => *wanted == status,
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusFilter::All => write!(f, "all"),
            StatusFilter::Only(status) => write!(f, "{}", status),
        }
    }
}

impl std::str::FromStr for StatusFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<RecordStatus>().map(StatusFilter::Only)
    }
}

/// Search term plus status selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    pub search: String,
    pub status: StatusFilter,
}

impl ListQuery {
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// Whether `record` is part of the filtered view
    pub fn matches<R: ListResource>(&self, record: &R) -> bool {
        matches_search(record, &self.search) && self.status.matches(record.status())
    }
}

/// Empty term, or name/code containing the term (case-insensitive)
pub fn matches_search<R: ListResource>(record: &R, term: &str) -> bool {
    term.is_empty()
        || contains_ignore_case(record.name(), term)
        || contains_ignore_case(record.code(), term)
}

/// Records of `records` included by `query`, in their original order
pub fn filter_records<'a, R: ListResource>(records: &'a [R], query: &ListQuery) -> Vec<&'a R> {
    records.iter().filter(|r| query.matches(*r)).collect()
}

/// Footer text under the table. Every match is shown on one page.
pub fn entries_summary(count: usize) -> String {
    if count == 0 {
        "Showing 0 - 0 of 0 entries".to_string()
    } else {
        format!("Showing 1 - {} of {} entries", count, count)
    }
}
