//! Aggregation of activity events into per-repository leaderboards.
//!
//! [`summarize`] filters events by user, partitions them by repository in
//! order of first appearance, and tallies each user's counts and derived
//! averages. Rows whose selected metrics are all zero are dropped and the
//! remainder is sorted descending by the configured metric. The result is
//! fully determined by the input order, so identical inputs always render
//! identical reports.

mod metric;


use std::collections::{HashMap, HashSet};

use tracing::warn;

use crate::events::{EventRecord, EventType};

pub use metric::{Metric, MetricValue};

/// Metric used for sorting when none is configured.
pub const DEFAULT_SORT_KEY: &str = "pr_created";

/// Inclusion and exclusion lists applied to event authors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    /// When set, only these users are kept.
    pub include: Option<HashSet<String>>,
    /// Users removed after the inclusion filter.
    pub exclude: Option<HashSet<String>>,
}

impl UserFilter {
    /// Returns true when `user` passes both lists.
    #[must_use]
    pub fn allows(&self, user: &str) -> bool {
        let included = self
            .include
            .as_ref()
            .is_none_or(|include| include.contains(user));
        let excluded = self
            .exclude
            .as_ref()
            .is_some_and(|exclude| exclude.contains(user));
        included && !excluded
    }
}

/// How events are turned into tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryOptions {
    /// Author filter.
    pub users: UserFilter,
    /// Metric keys to show, in order; `None` shows every metric.
    pub metrics: Option<Vec<String>>,
    /// Metric key to sort rows by, descending.
    pub sort_by: String,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            users: UserFilter::default(),
            metrics: None,
            sort_by: DEFAULT_SORT_KEY.to_owned(),
        }
    }
}

/// One user's values, aligned with [`RepositoryTable::columns`].
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedRow {
    /// User login.
    pub user: String,
    /// Metric values in column order.
    pub values: Vec<MetricValue>,
}

impl AggregatedRow {
    /// Value of `metric` within a table using `columns`.
    #[must_use]
    pub fn value(&self, columns: &[Metric], metric: Metric) -> Option<MetricValue> {
        let index = columns.iter().position(|column| *column == metric)?;
        self.values.get(index).copied()
    }
}

/// Leaderboard for a single repository.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryTable {
    /// Repository in `owner/name` form.
    pub repository: String,
    /// Columns shown, in order.
    pub columns: Vec<Metric>,
    /// Rows sorted by the configured metric.
    pub rows: Vec<AggregatedRow>,
}

/// Result of [`summarize`]: the surviving tables plus any warnings raised
/// while building them.
///
/// Warnings are kept apart from the tables so they are reported even for
/// repositories whose table ends up empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Leaderboards in order of first appearance.
    pub tables: Vec<RepositoryTable>,
    /// Problems such as an unusable metric selection, in repository order.
    pub warnings: Vec<String>,
}

impl Summary {
    /// Returns true when no repository produced a table.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

/// Running totals for one user in one repository.
#[derive(Debug, Default)]
struct UserTally {
    counts: HashMap<EventType, u64>,
    lines_changed: u64,
    merge_hours: Vec<f64>,
}

impl UserTally {
    fn add(&mut self, event: &EventRecord) {
        *self.counts.entry(event.event_type()).or_insert(0) += event.count();
        match event.event_type() {
            EventType::PrCreated => {
                self.lines_changed += event.additions() + event.deletions();
            }
            EventType::PrMerged => {
                if let Some(hours) = event.merge_latency_hours() {
                    self.merge_hours.push(hours);
                }
            }
            _ => {}
        }
    }

    fn count(&self, event_type: EventType) -> u64 {
        self.counts.get(&event_type).copied().unwrap_or(0)
    }

    fn value(&self, metric: Metric) -> MetricValue {
        match metric {
            Metric::AvgPrSize => {
                MetricValue::Integer(average_pr_size(self.lines_changed, self.count(EventType::PrCreated)))
            }
            Metric::AvgMergeTime => MetricValue::Decimal(average_hours(&self.merge_hours)),
            counted => MetricValue::Integer(
                counted
                    .counted_event()
                    .map_or(0, |event_type| self.count(event_type)),
            ),
        }
    }
}

/// Mean lines per pull request, rounded half to even; zero without pull
/// requests.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "line totals are far below 2^52 and the rounded mean is non-negative"
)]
fn average_pr_size(lines_changed: u64, pull_requests: u64) -> u64 {
    if pull_requests == 0 {
        return 0;
    }
    (lines_changed as f64 / pull_requests as f64).round_ties_even() as u64
}

/// Mean of `hours` rounded half to even at one decimal; zero when empty.
#[expect(
    clippy::float_arithmetic,
    clippy::cast_precision_loss,
    reason = "merge counts are small and the mean is reported at one decimal"
)]
fn average_hours(hours: &[f64]) -> f64 {
    if hours.is_empty() {
        return 0.0;
    }
    let mean = hours.iter().sum::<f64>() / hours.len() as f64;
    (mean * 10.0).round_ties_even() / 10.0
}

/// Resolves the configured metric keys into columns.
///
/// Unknown keys are ignored and duplicates collapse onto their first
/// position. Returns `None` when a selection was given but nothing in it is
/// recognised.
fn select_columns(metrics: Option<&[String]>) -> Option<Vec<Metric>> {
    let Some(keys) = metrics else {
        return Some(Metric::ALL.to_vec());
    };
    let mut columns: Vec<Metric> = Vec::with_capacity(keys.len());
    for metric in keys.iter().filter_map(|key| Metric::from_key(key.trim())) {
        if !columns.contains(&metric) {
            columns.push(metric);
        }
    }
    (!columns.is_empty()).then_some(columns)
}

/// Builds one leaderboard per repository.
///
/// Repositories appear in order of their first event; repositories left
/// without rows are omitted, although their warnings are still returned.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use prtally::events::EventRecord;
/// use prtally::summary::{Metric, MetricValue, SummaryOptions, summarize};
///
/// let at = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .and_then(|date| date.and_hms_opt(9, 0, 0))
///     .expect("valid timestamp");
/// let events = vec![EventRecord::pr_created("alice", "octo/repo", at, 4, 2)];
///
/// let summary = summarize(&events, &SummaryOptions::default());
/// let table = &summary.tables[0];
/// assert_eq!(table.rows[0].value(&table.columns, Metric::AvgPrSize), Some(MetricValue::Integer(6)));
/// ```
#[must_use]
pub fn summarize(events: &[EventRecord], options: &SummaryOptions) -> Summary {
    let mut repositories: Vec<(&str, Vec<&EventRecord>)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for event in events.iter().filter(|event| options.users.allows(event.user())) {
        let position = *positions.entry(event.repository()).or_insert_with(|| {
            repositories.push((event.repository(), Vec::new()));
            repositories.len() - 1
        });
        if let Some((_, bucket)) = repositories.get_mut(position) {
            bucket.push(event);
        }
    }

    let mut summary = Summary::default();
    for (repository, bucket) in repositories {
        if let Some(table) = summarize_repository(repository, &bucket, options, &mut summary.warnings)
        {
            summary.tables.push(table);
        }
    }
    summary
}

fn summarize_repository(
    repository: &str,
    events: &[&EventRecord],
    options: &SummaryOptions,
    warnings: &mut Vec<String>,
) -> Option<RepositoryTable> {
    let mut users: Vec<(&str, UserTally)> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();
    for event in events {
        let position = *positions.entry(event.user()).or_insert_with(|| {
            users.push((event.user(), UserTally::default()));
            users.len() - 1
        });
        if let Some((_, tally)) = users.get_mut(position) {
            tally.add(event);
        }
    }

    let columns = select_columns(options.metrics.as_deref()).unwrap_or_else(|| {
        let warning = format!("No valid metrics found for {repository}. Defaulting to all.");
        warn!(repository, "no valid metrics configured; showing all metrics");
        warnings.push(warning);
        Metric::ALL.to_vec()
    });

    let mut rows: Vec<AggregatedRow> = users
        .into_iter()
        .map(|(user, tally)| AggregatedRow {
            user: user.to_owned(),
            values: columns.iter().map(|metric| tally.value(*metric)).collect(),
        })
        .filter(|row| !row.values.iter().all(|value| value.is_zero()))
        .collect();

    if rows.is_empty() {
        return None;
    }

    // Unknown keys sort by PRs created; a metric not shown sorts by the first column.
    let requested = Metric::from_key(options.sort_by.trim()).unwrap_or(Metric::PrCreated);
    let sort_metric = if columns.contains(&requested) {
        Some(requested)
    } else {
        columns.first().copied()
    };
    if let Some(metric) = sort_metric {
        rows.sort_by(|left, right| {
            match (left.value(&columns, metric), right.value(&columns, metric)) {
                (Some(left_value), Some(right_value)) => right_value.compare(left_value),
                _ => std::cmp::Ordering::Equal,
            }
        });
    }

    Some(RepositoryTable {
        repository: repository.to_owned(),
        columns,
        rows,
    })
}
