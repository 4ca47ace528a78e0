//! Pull request search results and their GraphQL wire representation.
//!
//! Types prefixed with `Api` are internal deserialisation targets for the
//! GraphQL search response; they convert into the public domain types with
//! every optional nested field kept explicit.

use serde::Deserialize;

use super::pagination::PageInfo;
use super::rate_limit::RateLimitInfo;

/// One page of pull request search results.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    /// Result nodes in source order; `None` marks an empty node.
    pub items: Vec<Option<PullRequestItem>>,
    /// Cursor state after this page.
    pub page_info: PageInfo,
    /// Remaining query budget when the source reported it.
    pub rate_limit: Option<RateLimitInfo>,
}

/// A pull request with the nested activity needed for event collection.
///
/// Timestamps are kept in their wire form (`%Y-%m-%dT%H:%M:%SZ`) and parsed
/// during normalisation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullRequestItem {
    /// Pull request number.
    pub number: u64,
    /// Author login, absent for deleted accounts.
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
    /// Merge timestamp when merged.
    pub merged_at: Option<String>,
    /// Lines added.
    pub additions: u64,
    /// Lines deleted.
    pub deletions: u64,
    /// Label names as reported.
    pub labels: Vec<String>,
    /// Review submissions.
    pub reviews: Vec<ReviewAction>,
    /// Top-level conversation comments.
    pub comments: Vec<CommentAction>,
    /// Inline review threads.
    pub review_threads: Vec<ReviewThread>,
}

/// A submitted review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewAction {
    /// Reviewer login, if known.
    pub author: Option<String>,
    /// Review state such as `APPROVED` or `PENDING`.
    pub state: String,
}

/// A comment on a pull request or inside a review thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentAction {
    /// Commenter login, if known.
    pub author: Option<String>,
    /// Creation timestamp.
    pub created_at: String,
}

/// An inline review thread.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewThread {
    /// Comments in the thread.
    pub comments: Vec<CommentAction>,
}

/// Top-level GraphQL response envelope.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlResponse<T> {
    pub(crate) data: Option<T>,
    pub(crate) errors: Option<Vec<GraphQlError>>,
}

/// An entry of the GraphQL `errors` array.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct GraphQlError {
    pub(crate) message: String,
    #[serde(rename = "type")]
    pub(crate) kind: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiSearchData {
    pub(crate) search: ApiSearch,
    pub(crate) rate_limit: Option<ApiRateLimit>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiSearch {
    pub(crate) page_info: ApiPageInfo,
    #[serde(default)]
    pub(crate) nodes: Vec<Option<ApiPullRequestNode>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiPageInfo {
    pub(crate) has_next_page: bool,
    pub(crate) end_cursor: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiRateLimit {
    pub(crate) limit: u32,
    pub(crate) remaining: u32,
    pub(crate) reset_at: String,
}

/// Search hit; non-pull-request hits deserialise with every field absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub(crate) struct ApiPullRequestNode {
    pub(crate) number: u64,
    pub(crate) created_at: Option<String>,
    pub(crate) merged_at: Option<String>,
    pub(crate) author: Option<ApiActor>,
    pub(crate) additions: u64,
    pub(crate) deletions: u64,
    pub(crate) labels: Option<ApiConnection<ApiLabel>>,
    pub(crate) reviews: Option<ApiConnection<ApiReview>>,
    pub(crate) comments: Option<ApiConnection<ApiComment>>,
    pub(crate) review_threads: Option<ApiConnection<ApiReviewThread>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiConnection<T> {
    #[serde(default = "Vec::new")]
    pub(crate) nodes: Vec<Option<T>>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiActor {
    pub(crate) login: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiLabel {
    pub(crate) name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReview {
    pub(crate) author: Option<ApiActor>,
    pub(crate) state: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ApiComment {
    pub(crate) author: Option<ApiActor>,
    pub(crate) created_at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiReviewThread {
    pub(crate) comments: Option<ApiConnection<ApiComment>>,
}

fn login(actor: Option<ApiActor>) -> Option<String> {
    actor.and_then(|value| value.login)
}

fn flatten<T, U>(connection: Option<ApiConnection<T>>, convert: impl Fn(T) -> U) -> Vec<U> {
    connection
        .map(|value| value.nodes.into_iter().flatten().map(convert).collect())
        .unwrap_or_default()
}

impl From<ApiComment> for CommentAction {
    fn from(value: ApiComment) -> Self {
        Self {
            author: login(value.author),
            created_at: value.created_at,
        }
    }
}

impl From<ApiReview> for ReviewAction {
    fn from(value: ApiReview) -> Self {
        Self {
            author: login(value.author),
            state: value.state,
        }
    }
}

impl From<ApiReviewThread> for ReviewThread {
    fn from(value: ApiReviewThread) -> Self {
        Self {
            comments: flatten(value.comments, CommentAction::from),
        }
    }
}

impl ApiPullRequestNode {
    /// Converts the node, returning `None` for empty (non pull request) hits.
    pub(crate) fn into_item(self) -> Option<PullRequestItem> {
        let created_at = self.created_at?;
        Some(PullRequestItem {
            number: self.number,
            author: login(self.author),
            created_at,
            merged_at: self.merged_at,
            additions: self.additions,
            deletions: self.deletions,
            labels: flatten(self.labels, |label| label.name),
            reviews: flatten(self.reviews, ReviewAction::from),
            comments: flatten(self.comments, CommentAction::from),
            review_threads: flatten(self.review_threads, ReviewThread::from),
        })
    }
}

impl From<ApiSearchData> for SearchPage {
    fn from(value: ApiSearchData) -> Self {
        let ApiSearchData { search, rate_limit } = value;
        Self {
            items: search
                .nodes
                .into_iter()
                .map(|node| node.and_then(ApiPullRequestNode::into_item))
                .collect(),
            page_info: PageInfo::new(search.page_info.has_next_page, search.page_info.end_cursor),
            rate_limit: rate_limit.and_then(|budget| {
                RateLimitInfo::from_graphql(budget.limit, budget.remaining, &budget.reset_at)
            }),
        }
    }
}
