//! Flattening pull request search results into event records.

use crate::events::{EventRecord, EventType, UNKNOWN_USER, parse_wire_timestamp};
use crate::github::{IntakeError, PullRequestItem};

use super::labels::SkipLabels;

/// Records flattened from one page, plus the failure that cut it short.
#[derive(Debug, Default)]
pub(crate) struct NormalizedPage {
    pub(crate) records: Vec<EventRecord>,
    pub(crate) failure: Option<IntakeError>,
}

/// Normalises the pull requests of a page in order, skipping empty nodes.
///
/// A pull request carrying a timestamp outside the wire format contributes
/// nothing and ends the page; records from the pull requests before it are
/// kept alongside the [`IntakeError::Api`] failure.
pub(crate) fn normalize_page(
    repository: &str,
    items: &[Option<PullRequestItem>],
    skip_labels: &SkipLabels,
) -> NormalizedPage {
    let mut page = NormalizedPage::default();
    for item in items.iter().flatten() {
        match normalize_pull_request(repository, item, skip_labels) {
            Ok(records) => page.records.extend(records),
            Err(failure) => {
                page.failure = Some(failure);
                break;
            }
        }
    }
    page
}

/// Produces the records for one pull request.
///
/// Order: creation, counted reviews, merge, conversation comments, then
/// review-thread comments. Reviews are dated at the pull request's creation
/// and the merge is credited to the pull request author. Reviews and comments
/// without an author are dropped.
pub(crate) fn normalize_pull_request(
    repository: &str,
    item: &PullRequestItem,
    skip_labels: &SkipLabels,
) -> Result<Vec<EventRecord>, IntakeError> {
    let created_at = parse_wire_timestamp(&item.created_at)?;
    let author = item.author.as_deref().unwrap_or(UNKNOWN_USER);
    let (additions, deletions) = if skip_labels.matches_any(&item.labels) {
        (0, 0)
    } else {
        (item.additions, item.deletions)
    };

    let mut records = vec![EventRecord::pr_created(
        author, repository, created_at, additions, deletions,
    )];

    records.extend(item.reviews.iter().filter_map(|review| {
        let reviewer = review.author.as_deref()?;
        let event_type = EventType::from_review_state(&review.state)?;
        Some(EventRecord::review(event_type, reviewer, repository, created_at))
    }));

    if let Some(merged_at) = item.merged_at.as_deref() {
        let merged = parse_wire_timestamp(merged_at)?;
        records.push(EventRecord::pr_merged(author, repository, created_at, merged));
    }

    let thread_comments = item
        .review_threads
        .iter()
        .flat_map(|thread| thread.comments.iter());
    for comment in item.comments.iter().chain(thread_comments) {
        let Some(commenter) = comment.author.as_deref() else {
            continue;
        };
        let timestamp = parse_wire_timestamp(&comment.created_at)?;
        records.push(EventRecord::comment(commenter, repository, timestamp));
    }

    Ok(records)
}
