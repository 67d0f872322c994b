//! Filtering and ordering of records for display.
//!
//! A [`Query`] combines a free-text search with a status filter. Applying it
//! to the stored collection produces a [`View`]: newest first, with records
//! lacking a valid creation time at the end.

use std::cmp::Reverse;
use std::str::FromStr;

use crate::error::Error;
use crate::record::{Record, Status};

/// Status selector for the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    /// Pass every record through.
    #[default]
    All,
    /// Keep only records with exactly this status.
    Only(Status),
}

impl StatusFilter {
    /// Check whether a status passes this filter.
    #[must_use]
    pub fn matches(self, status: Status) -> bool {
        match self {
            Self::All => true,
            Self::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl std::fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => write!(f, "{status}"),
        }
    }
}

impl From<Status> for StatusFilter {
    fn from(status: Status) -> Self {
        Self::Only(status)
    }
}

/// Search text plus status filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    /// Free-text search, matched case-insensitively as a substring.
    pub search: String,
    /// Status selector.
    pub status: StatusFilter,
}

impl Query {
    /// Create a query.
    #[must_use]
    pub fn new(search: impl Into<String>, status: StatusFilter) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    /// True when neither control narrows the view.
    #[must_use]
    pub fn is_unfiltered(&self) -> bool {
        self.search.trim().is_empty() && self.status == StatusFilter::All
    }

    /// Check whether a single record passes both filters.
    #[must_use]
    pub fn matches(&self, record: &Record) -> bool {
        if !self.status.matches(record.status) {
            return false;
        }

        let needle = self.search.trim().to_lowercase();
        needle.is_empty() || record.haystack().contains(&needle)
    }

    /// Sort and filter a collection into a display view.
    #[must_use]
    pub fn apply(&self, mut records: Vec<Record>) -> View {
        records.sort_by_key(|r| Reverse(r.created_at_millis()));
        records.retain(|r| self.matches(r));
        View { rows: records }
    }
}

/// The filtered, sorted projection shown to the user.
///
/// An empty view is a distinct state: callers show an empty-state message
/// instead of a table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct View {
    rows: Vec<Record>,
}

impl View {
    /// The display rows.
    #[must_use]
    pub fn rows(&self) -> &[Record] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when nothing matched.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Consume the view, returning its rows.
    #[must_use]
    pub fn into_rows(self) -> Vec<Record> {
        self.rows
    }
}
