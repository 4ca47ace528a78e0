//! Search predicates for pull requests within a date window.

use chrono::NaiveDate;

use super::error::IntakeError;
use super::locator::RepositorySlug;
use super::pagination::PageSize;

/// Inclusive creation-date window; an absent bound leaves that side open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectionWindow {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl CollectionWindow {
    /// Creates a window from optional bounds.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when both bounds are present and
    /// `start` is after `end`.
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, IntakeError> {
        if let (Some(from), Some(to)) = (start, end)
            && from > to
        {
            return Err(IntakeError::Configuration {
                message: format!("start_date {from} is after end_date {to}"),
            });
        }
        Ok(Self { start, end })
    }

    /// A window with no bounds.
    #[must_use]
    pub const fn unbounded() -> Self {
        Self {
            start: None,
            end: None,
        }
    }

    /// Lower bound, inclusive.
    #[must_use]
    pub const fn start(&self) -> Option<NaiveDate> {
        self.start
    }

    /// Upper bound, inclusive.
    #[must_use]
    pub const fn end(&self) -> Option<NaiveDate> {
        self.end
    }

    /// Renders the `created:` qualifier, or `None` for an unbounded window.
    fn created_qualifier(&self) -> Option<String> {
        let bound = |date: Option<NaiveDate>| {
            date.map_or_else(|| "*".to_owned(), |value| value.format("%Y-%m-%d").to_string())
        };
        match (self.start, self.end) {
            (None, None) => None,
            (start, end) => Some(format!("created:{}..{}", bound(start), bound(end))),
        }
    }
}

/// One repository's pull request search, as sent to the search gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    repository: RepositorySlug,
    window: CollectionWindow,
    page_size: PageSize,
}

impl SearchQuery {
    /// Creates a search for pull requests created in `repository` within
    /// `window`.
    #[must_use]
    pub const fn new(repository: RepositorySlug, window: CollectionWindow, page_size: PageSize) -> Self {
        Self {
            repository,
            window,
            page_size,
        }
    }

    /// Repository being searched.
    #[must_use]
    pub const fn repository(&self) -> &RepositorySlug {
        &self.repository
    }

    /// Items requested per page.
    #[must_use]
    pub const fn page_size(&self) -> PageSize {
        self.page_size
    }

    /// Renders the GitHub search string, e.g.
    /// `repo:octo/repo is:pr created:2024-01-01..2024-01-31`.
    #[must_use]
    pub fn search_string(&self) -> String {
        let base = format!("repo:{} is:pr", self.repository);
        match self.window.created_qualifier() {
            Some(created) => format!("{base} {created}"),
            None => base,
        }
    }
}
