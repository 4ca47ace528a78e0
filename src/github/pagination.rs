//! Cursor pagination state for GitHub GraphQL connections.
//!
//! GraphQL connections report `hasNextPage` and an opaque `endCursor`. The
//! next request passes that cursor as `after`; the cursor is only meaningful
//! for the query that produced it.

use super::error::IntakeError;

/// Largest page GitHub accepts for a connection.
pub const MAX_PAGE_SIZE: u8 = 100;

/// Page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: u8 = 20;

/// Position of one fetched page within a cursor-paginated result set.
///
/// # Example
///
/// ```
/// use prtally::github::pagination::PageInfo;
///
/// let info = PageInfo::new(true, Some("Y3Vyc29yOjIw".to_owned()));
/// assert_eq!(info.next_cursor(), Some("Y3Vyc29yOjIw"));
/// assert!(PageInfo::last().is_last_page());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageInfo {
    has_next_page: bool,
    end_cursor: Option<String>,
}

impl PageInfo {
    /// Creates page info from the connection's `pageInfo` fields.
    #[must_use]
    pub const fn new(has_next_page: bool, end_cursor: Option<String>) -> Self {
        Self {
            has_next_page,
            end_cursor,
        }
    }

    /// Page info for a final page.
    #[must_use]
    pub const fn last() -> Self {
        Self::new(false, None)
    }

    /// Returns true if the source reports more pages after this one.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.has_next_page
    }

    /// Returns the raw end cursor reported for this page.
    #[must_use]
    pub fn end_cursor(&self) -> Option<&str> {
        self.end_cursor.as_deref()
    }

    /// Returns true if this is the final page.
    #[must_use]
    pub const fn is_last_page(&self) -> bool {
        !self.has_next_page
    }

    /// Returns the cursor to request the following page with, if any.
    ///
    /// A page that claims a successor but carries no cursor yields `None`.
    #[must_use]
    pub fn next_cursor(&self) -> Option<&str> {
        if self.has_next_page {
            self.end_cursor()
        } else {
            None
        }
    }
}

/// Bounded number of items requested per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize(u8);

impl PageSize {
    /// Validates a page size.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when `value` is zero or
    /// exceeds [`MAX_PAGE_SIZE`].
    pub fn new(value: u8) -> Result<Self, IntakeError> {
        if value == 0 {
            return Err(IntakeError::InvalidPagination {
                message: "page size must be at least 1".to_owned(),
            });
        }

        if value > MAX_PAGE_SIZE {
            return Err(IntakeError::InvalidPagination {
                message: format!("page size must not exceed {MAX_PAGE_SIZE}"),
            });
        }

        Ok(Self(value))
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn get(self) -> u8 {
        self.0
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}
