//! Rate limit budget reported by the GitHub API.
//!
//! The search query asks GraphQL for its `rateLimit` object on every page, and
//! the REST `/rate_limit` endpoint is consulted when a request is rejected.
//! Both are captured as [`RateLimitInfo`].

use std::time::{SystemTime, UNIX_EPOCH};

use chrono::DateTime;

/// Remaining request budget and its reset time.
///
/// # Example
///
/// ```
/// use prtally::github::rate_limit::RateLimitInfo;
///
/// let info = RateLimitInfo::new(5000, 4999, 1700000000);
/// assert!(!info.is_exhausted());
/// assert_eq!(info.remaining(), 4999);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitInfo {
    limit: u32,
    remaining: u32,
    /// Unix timestamp when the budget resets.
    reset_at: u64,
}

impl RateLimitInfo {
    /// Creates a new rate limit info instance.
    #[must_use]
    pub const fn new(limit: u32, remaining: u32, reset_at: u64) -> Self {
        Self {
            limit,
            remaining,
            reset_at,
        }
    }

    /// Builds rate limit info from the GraphQL `rateLimit` object, whose
    /// `resetAt` is an RFC 3339 timestamp.
    ///
    /// Returns `None` when `resetAt` cannot be parsed or lies before the
    /// epoch.
    #[must_use]
    pub fn from_graphql(limit: u32, remaining: u32, reset_at: &str) -> Option<Self> {
        let reset = DateTime::parse_from_rfc3339(reset_at).ok()?;
        let reset_at_unix = u64::try_from(reset.timestamp()).ok()?;
        Some(Self::new(limit, remaining, reset_at_unix))
    }

    /// Returns the maximum requests allowed in the current window.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit
    }

    /// Returns the remaining requests in the current window.
    #[must_use]
    pub const fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Returns the Unix timestamp when the rate limit resets.
    #[must_use]
    pub const fn reset_at(&self) -> u64 {
        self.reset_at
    }

    /// Returns true if the rate limit has been exhausted.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Calculates seconds until the rate limit resets.
    ///
    /// Returns 0 if the reset time has already passed or if the system time
    /// cannot be determined.
    #[must_use]
    pub fn seconds_until_reset(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|duration| duration.as_secs())
            .unwrap_or(0);

        self.reset_at.saturating_sub(now)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::RateLimitInfo;

    #[rstest]
    fn from_graphql_parses_reset_timestamp() {
        let info = RateLimitInfo::from_graphql(5000, 12, "2023-11-14T22:13:20Z")
            .expect("reset timestamp should parse");

        assert_eq!(info.reset_at(), 1_700_000_000);
        assert_eq!(info.remaining(), 12);
        assert_eq!(info.limit(), 5000);
    }

    #[rstest]
    #[case::garbage("not-a-date")]
    #[case::pre_epoch("1960-01-01T00:00:00Z")]
    fn from_graphql_rejects_unusable_reset(#[case] reset_at: &str) {
        assert_eq!(RateLimitInfo::from_graphql(5000, 0, reset_at), None);
    }

    #[rstest]
    fn seconds_until_reset_returns_zero_when_reset_has_passed() {
        let info = RateLimitInfo::new(5000, 0, 0);
        assert!(info.is_exhausted());
        assert_eq!(info.seconds_until_reset(), 0);
    }
}
