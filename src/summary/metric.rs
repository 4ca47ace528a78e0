//! Metric columns of the per-repository leaderboard.

use std::cmp::Ordering;
use std::fmt;

use crate::events::EventType;

/// A leaderboard column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Pull requests opened.
    PrCreated,
    /// Approving reviews submitted.
    ReviewsApproved,
    /// Reviews requesting changes.
    ReviewsChangesRequested,
    /// Reviews left as comments.
    ReviewsCommented,
    /// Conversation and review-thread comments.
    Comments,
    /// Mean lines changed per opened pull request.
    AvgPrSize,
    /// Mean hours from creation to merge.
    AvgMergeTime,
}

impl Metric {
    /// Every metric in default column order.
    pub const ALL: [Self; 7] = [
        Self::PrCreated,
        Self::ReviewsApproved,
        Self::ReviewsChangesRequested,
        Self::ReviewsCommented,
        Self::Comments,
        Self::AvgPrSize,
        Self::AvgMergeTime,
    ];

    /// Configuration key naming this metric.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::PrCreated => "pr_created",
            Self::ReviewsApproved => "reviews_approved",
            Self::ReviewsChangesRequested => "reviews_changes_requested",
            Self::ReviewsCommented => "reviews_commented",
            Self::Comments => "comments",
            Self::AvgPrSize => "avg_pr_size",
            Self::AvgMergeTime => "avg_merge_time",
        }
    }

    /// Column header shown in reports.
    #[must_use]
    pub const fn header(self) -> &'static str {
        match self {
            Self::PrCreated => "PRs Created",
            Self::ReviewsApproved => "Reviews: Approved",
            Self::ReviewsChangesRequested => "Reviews: Changes Req.",
            Self::ReviewsCommented => "Reviews: Commented",
            Self::Comments => "Total Comments",
            Self::AvgPrSize => "Avg PR Size (loc)",
            Self::AvgMergeTime => "Avg Merge Time (h)",
        }
    }

    /// Looks up a metric by configuration key.
    ///
    /// # Example
    ///
    /// ```
    /// use prtally::summary::Metric;
    ///
    /// assert_eq!(Metric::from_key("comments"), Some(Metric::Comments));
    /// assert_eq!(Metric::from_key("merged"), None);
    /// ```
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.key() == key)
    }

    /// The event type this metric counts, if it is a plain count.
    #[must_use]
    pub const fn counted_event(self) -> Option<EventType> {
        match self {
            Self::PrCreated => Some(EventType::PrCreated),
            Self::ReviewsApproved => Some(EventType::ReviewApproved),
            Self::ReviewsChangesRequested => Some(EventType::ReviewChangesRequested),
            Self::ReviewsCommented => Some(EventType::ReviewCommented),
            Self::Comments => Some(EventType::Comment),
            Self::AvgPrSize | Self::AvgMergeTime => None,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.header())
    }
}

/// One cell of the leaderboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetricValue {
    /// Whole-number metrics: counts and average pull request size.
    Integer(u64),
    /// Average merge time, already rounded to one decimal.
    Decimal(f64),
}

impl MetricValue {
    /// Returns true for a zero value.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        match self {
            Self::Integer(value) => value == 0,
            Self::Decimal(value) => value == 0.0,
        }
    }

    /// Orders two values of the same column.
    ///
    /// Values of different kinds never share a column and compare equal.
    #[must_use]
    pub fn compare(self, other: Self) -> Ordering {
        match (self, other) {
            (Self::Integer(left), Self::Integer(right)) => left.cmp(&right),
            (Self::Decimal(left), Self::Decimal(right)) => left.total_cmp(&right),
            _ => Ordering::Equal,
        }
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => write!(formatter, "{value}"),
            Self::Decimal(value) => write!(formatter, "{value:.1}"),
        }
    }
}
