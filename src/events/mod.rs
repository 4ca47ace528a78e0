//! Flat activity events derived from pull request search results.
//!
//! Every pull request contributes a creation event, one event per counted
//! review and comment, and a merge event when merged. Records are immutable
//! once built; the constructors guarantee `count == 1` and only populate the
//! payload fields relevant to their event type.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::github::IntakeError;

/// Fixed timestamp format used by the GitHub API.
pub const WIRE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

/// Author placeholder for pull requests whose author account is gone.
pub const UNKNOWN_USER: &str = "unknown";

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Kind of activity an [`EventRecord`] represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    /// A pull request was opened.
    PrCreated,
    /// A review approved the pull request.
    ReviewApproved,
    /// A review requested changes.
    ReviewChangesRequested,
    /// A review left comments without a verdict.
    ReviewCommented,
    /// The pull request was merged.
    PrMerged,
    /// A conversation or review-thread comment.
    Comment,
}

impl EventType {
    /// Maps a GitHub review state to its event type.
    ///
    /// Only submitted verdicts count; `PENDING`, `DISMISSED`, and any other
    /// state yield `None`.
    ///
    /// # Example
    ///
    /// ```
    /// use prtally::events::EventType;
    ///
    /// assert_eq!(EventType::from_review_state("APPROVED"), Some(EventType::ReviewApproved));
    /// assert_eq!(EventType::from_review_state("PENDING"), None);
    /// ```
    #[must_use]
    pub fn from_review_state(state: &str) -> Option<Self> {
        match state {
            "APPROVED" => Some(Self::ReviewApproved),
            "CHANGES_REQUESTED" => Some(Self::ReviewChangesRequested),
            "COMMENTED" => Some(Self::ReviewCommented),
            _ => None,
        }
    }
}

/// One unit of attributed pull request activity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventRecord {
    event_type: EventType,
    user: String,
    repository: String,
    timestamp: NaiveDateTime,
    count: u64,
    additions: u64,
    deletions: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_latency_hours: Option<f64>,
}

impl EventRecord {
    fn base(event_type: EventType, user: &str, repository: &str, timestamp: NaiveDateTime) -> Self {
        Self {
            event_type,
            user: user.to_owned(),
            repository: repository.to_owned(),
            timestamp,
            count: 1,
            additions: 0,
            deletions: 0,
            merge_latency_hours: None,
        }
    }

    /// A pull request creation carrying its line counts.
    #[must_use]
    pub fn pr_created(
        user: &str,
        repository: &str,
        created_at: NaiveDateTime,
        additions: u64,
        deletions: u64,
    ) -> Self {
        Self {
            additions,
            deletions,
            ..Self::base(EventType::PrCreated, user, repository, created_at)
        }
    }

    /// A review event; `event_type` should come from
    /// [`EventType::from_review_state`].
    #[must_use]
    pub fn review(
        event_type: EventType,
        user: &str,
        repository: &str,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self::base(event_type, user, repository, timestamp)
    }

    /// A merge, attributed to the pull request author at the merge time.
    #[must_use]
    pub fn pr_merged(
        user: &str,
        repository: &str,
        created_at: NaiveDateTime,
        merged_at: NaiveDateTime,
    ) -> Self {
        Self {
            merge_latency_hours: Some(merge_latency_hours(created_at, merged_at)),
            ..Self::base(EventType::PrMerged, user, repository, merged_at)
        }
    }

    /// A comment at its own creation time.
    #[must_use]
    pub fn comment(user: &str, repository: &str, timestamp: NaiveDateTime) -> Self {
        Self::base(EventType::Comment, user, repository, timestamp)
    }

    /// Event kind.
    #[must_use]
    pub const fn event_type(&self) -> EventType {
        self.event_type
    }

    /// Login the activity is attributed to.
    #[must_use]
    pub const fn user(&self) -> &str {
        self.user.as_str()
    }

    /// Repository in `owner/name` form.
    #[must_use]
    pub const fn repository(&self) -> &str {
        self.repository.as_str()
    }

    /// When the activity happened, in UTC without an offset.
    #[must_use]
    pub const fn timestamp(&self) -> NaiveDateTime {
        self.timestamp
    }

    /// Occurrence count; always 1.
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.count
    }

    /// Lines added, non-zero only for creation events.
    #[must_use]
    pub const fn additions(&self) -> u64 {
        self.additions
    }

    /// Lines deleted, non-zero only for creation events.
    #[must_use]
    pub const fn deletions(&self) -> u64 {
        self.deletions
    }

    /// Hours from creation to merge, present only for merge events.
    #[must_use]
    pub const fn merge_latency_hours(&self) -> Option<f64> {
        self.merge_latency_hours
    }
}

/// Parses a timestamp in the fixed wire format `%Y-%m-%dT%H:%M:%SZ`.
///
/// # Errors
///
/// Returns [`IntakeError::Api`] when the value does not match the format.
pub fn parse_wire_timestamp(value: &str) -> Result<NaiveDateTime, IntakeError> {
    NaiveDateTime::parse_from_str(value, WIRE_TIMESTAMP_FORMAT).map_err(|error| {
        IntakeError::Api {
            message: format!("unexpected timestamp `{value}`: {error}"),
        }
    })
}

/// Hours elapsed between creation and merge, never negative.
#[must_use]
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "latency is reported in fractional hours; second precision is ample"
)]
pub fn merge_latency_hours(created_at: NaiveDateTime, merged_at: NaiveDateTime) -> f64 {
    let seconds = (merged_at - created_at).num_seconds();
    (seconds as f64 / SECONDS_PER_HOUR).max(0.0)
}
