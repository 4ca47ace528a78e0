//! GraphQL pull request search backed by Octocrab.

use async_trait::async_trait;
use octocrab::Octocrab;
use serde_json::json;
use tracing::{debug, warn};
use url::Url;

use crate::github::error::IntakeError;
use crate::github::locator::{PersonalAccessToken, RepositorySlug};
use crate::github::models::{ApiSearchData, GraphQlResponse, SearchPage};
use crate::github::query::SearchQuery;
use crate::github::rate_limit::RateLimitInfo;

use super::SearchGateway;
use super::client::build_octocrab_client;
use super::error_mapping::{is_rate_limit_error, map_graphql_errors, map_repository_error};

/// Labels requested per pull request.
const LABEL_LIMIT: u8 = 20;

/// Reviews, comments, review threads, and thread comments requested per pull
/// request.
const ACTIVITY_LIMIT: u8 = 50;

const OPERATION: &str = "search pull requests";

fn search_document() -> String {
    format!(
        r"query($searchQuery: String!, $pageSize: Int!, $after: String) {{
  rateLimit {{ limit remaining resetAt }}
  search(query: $searchQuery, type: ISSUE, first: $pageSize, after: $after) {{
    pageInfo {{ hasNextPage endCursor }}
    nodes {{
      ... on PullRequest {{
        number
        createdAt
        mergedAt
        author {{ login }}
        additions
        deletions
        labels(first: {LABEL_LIMIT}) {{ nodes {{ name }} }}
        reviews(first: {ACTIVITY_LIMIT}) {{ nodes {{ author {{ login }} state }} }}
        comments(first: {ACTIVITY_LIMIT}) {{ nodes {{ author {{ login }} createdAt }} }}
        reviewThreads(first: {ACTIVITY_LIMIT}) {{
          nodes {{ comments(first: {ACTIVITY_LIMIT}) {{ nodes {{ author {{ login }} createdAt }} }} }}
        }}
      }}
    }}
  }}
}}"
    )
}

/// Octocrab-backed search gateway.
pub struct OctocrabSearchGateway {
    client: Octocrab,
}

impl OctocrabSearchGateway {
    /// Creates a new gateway from an existing Octocrab client.
    #[must_use]
    pub const fn new(client: Octocrab) -> Self {
        Self { client }
    }

    /// Builds an Octocrab client for the given token and API base.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::InvalidUrl` when the base URL is not a valid URI
    /// or `IntakeError::Api` when Octocrab fails to build a client.
    pub fn for_token(token: &PersonalAccessToken, api_base: &Url) -> Result<Self, IntakeError> {
        let octocrab = build_octocrab_client(token, api_base)?;
        Ok(Self::new(octocrab))
    }

    async fn map_search_error(
        &self,
        repository: &RepositorySlug,
        error: &octocrab::Error,
    ) -> IntakeError {
        match error {
            octocrab::Error::GitHub { source, .. } if is_rate_limit_error(source) => {
                let rate_limit = self.fetch_rate_limit_info().await;
                let base_message = format!("{OPERATION} failed: {message}", message = source.message);
                let message = match &rate_limit {
                    Some(info) => format!(
                        "{base_message} (resets at {reset}, in {wait}s)",
                        reset = info.reset_at(),
                        wait = info.seconds_until_reset()
                    ),
                    None => base_message,
                };
                IntakeError::RateLimitExceeded {
                    rate_limit,
                    message,
                }
            }
            _ => map_repository_error(repository, OPERATION, error),
        }
    }

    async fn fetch_rate_limit_info(&self) -> Option<RateLimitInfo> {
        let rate = self.client.ratelimit().get().await.ok()?.rate;
        let Ok(limit) = u32::try_from(rate.limit) else {
            return None;
        };
        let Ok(remaining) = u32::try_from(rate.remaining) else {
            return None;
        };
        Some(RateLimitInfo::new(limit, remaining, rate.reset))
    }
}

#[async_trait]
impl SearchGateway for OctocrabSearchGateway {
    async fn search_pull_requests<'a>(
        &self,
        query: &SearchQuery,
        cursor: Option<&'a str>,
    ) -> Result<SearchPage, IntakeError> {
        let repository = query.repository();
        let payload = json!({
            "query": search_document(),
            "variables": {
                "searchQuery": query.search_string(),
                "pageSize": query.page_size().get(),
                "after": cursor,
            },
        });

        let response: GraphQlResponse<ApiSearchData> =
            match self.client.post("/graphql", Some(&payload)).await {
                Ok(response) => response,
                Err(error) => return Err(self.map_search_error(repository, &error).await),
            };

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            return Err(map_graphql_errors(repository, &errors));
        }

        let data = response.data.ok_or_else(|| IntakeError::Api {
            message: format!("{OPERATION} for {repository} returned no data"),
        })?;
        let page = SearchPage::from(data);
        if let Some(budget) = page.rate_limit {
            debug!(
                repository = %repository,
                remaining = budget.remaining(),
                limit = budget.limit(),
                "search page fetched"
            );
            if budget.is_exhausted() {
                warn!(
                    repository = %repository,
                    seconds_until_reset = budget.seconds_until_reset(),
                    "search budget exhausted"
                );
            }
        }
        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use rstest::{fixture, rstest};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabSearchGateway;
    use crate::github::error::IntakeError;
    use crate::github::gateway::SearchGateway;
    use crate::github::locator::{PersonalAccessToken, RepositorySlug, parse_api_base};
    use crate::github::pagination::PageSize;
    use crate::github::query::{CollectionWindow, SearchQuery};

    #[fixture]
    fn query() -> SearchQuery {
        let slug = RepositorySlug::parse("octo/repo").expect("slug should parse");
        SearchQuery::new(slug, CollectionWindow::unbounded(), PageSize::default())
    }

    fn gateway_for(server: &MockServer) -> OctocrabSearchGateway {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let base = parse_api_base(Some(&server.uri())).expect("server URI should parse");
        OctocrabSearchGateway::for_token(&token, &base).expect("should create gateway")
    }

    async fn mount_graphql(server: &MockServer, response: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .respond_with(response)
            .mount(server)
            .await;
    }

    #[rstest]
    #[tokio::test]
    async fn search_returns_page_and_cursor(query: SearchQuery) {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_partial_json(json!({
                "variables": { "searchQuery": "repo:octo/repo is:pr", "pageSize": 20, "after": "abc" }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": {
                    "rateLimit": { "limit": 5000, "remaining": 4999, "resetAt": "2023-11-14T22:13:20Z" },
                    "search": {
                        "pageInfo": { "hasNextPage": true, "endCursor": "def" },
                        "nodes": [{
                            "number": 1,
                            "createdAt": "2024-01-01T00:00:00Z",
                            "mergedAt": null,
                            "author": { "login": "alice" },
                            "additions": 3,
                            "deletions": 1
                        }]
                    }
                }
            })))
            .mount(&server)
            .await;

        let page = gateway_for(&server)
            .search_pull_requests(&query, Some("abc"))
            .await
            .expect("search should succeed");

        assert_eq!(page.items.len(), 1);
        assert_eq!(page.page_info.next_cursor(), Some("def"));
        assert_eq!(page.rate_limit.map(|info| info.remaining()), Some(4999));
    }

    #[rstest]
    #[tokio::test]
    async fn graphql_not_found_marks_repository_unavailable(query: SearchQuery) {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "data": null,
                "errors": [{ "type": "NOT_FOUND", "message": "Could not resolve to a Repository" }]
            })),
        )
        .await;

        let error = gateway_for(&server)
            .search_pull_requests(&query, None)
            .await
            .expect_err("search should fail");

        assert!(
            matches!(error, IntakeError::RepositoryUnavailable { ref repository, .. } if repository == "octo/repo"),
            "expected RepositoryUnavailable, got {error:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn graphql_rate_limit_is_fatal(query: SearchQuery) {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "type": "RATE_LIMITED", "message": "API rate limit exceeded for user ID 1." }]
            })),
        )
        .await;

        let error = gateway_for(&server)
            .search_pull_requests(&query, None)
            .await
            .expect_err("search should fail");

        assert!(
            matches!(error, IntakeError::RateLimitExceeded { .. }),
            "expected RateLimitExceeded, got {error:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn http_rate_limit_fetches_reset_time(query: SearchQuery) {
        const EXPECTED_RESET_AT: u64 = 1_700_000_000;

        let server = MockServer::start().await;
        mount_graphql(
            &server,
            ResponseTemplate::new(403).set_body_json(json!({
                "message": "API rate limit exceeded for user",
                "documentation_url": "https://docs.github.com/graphql/overview/rate-limits-and-node-limits-for-the-graphql-api"
            })),
        )
        .await;
        Mock::given(method("GET"))
            .and(path("/rate_limit"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "resources": {
                    "core": { "limit": 5000, "used": 5000, "remaining": 0, "reset": EXPECTED_RESET_AT },
                    "search": { "limit": 30, "used": 0, "remaining": 30, "reset": EXPECTED_RESET_AT }
                },
                "rate": { "limit": 5000, "used": 5000, "remaining": 0, "reset": EXPECTED_RESET_AT }
            })))
            .mount(&server)
            .await;

        let error = gateway_for(&server)
            .search_pull_requests(&query, None)
            .await
            .expect_err("search should fail");

        match error {
            IntakeError::RateLimitExceeded {
                rate_limit,
                message,
            } => {
                let info = rate_limit.expect("expected rate_limit info to be populated");
                assert_eq!(info.reset_at(), EXPECTED_RESET_AT, "unexpected reset timestamp");
                assert!(
                    message.contains(&EXPECTED_RESET_AT.to_string()),
                    "expected message to include reset time, got `{message}`"
                );
                assert!(
                    message.ends_with("in 0s)"),
                    "expected elapsed reset to report no wait, got `{message}`"
                );
            }
            other => panic!("expected RateLimitExceeded, got {other:?}"),
        }
    }

    #[rstest]
    #[case::forbidden(403)]
    #[case::not_found(404)]
    #[tokio::test]
    async fn http_access_failures_mark_repository_unavailable(
        query: SearchQuery,
        #[case] status: u16,
    ) {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            ResponseTemplate::new(status).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/graphql"
            })),
        )
        .await;

        let error = gateway_for(&server)
            .search_pull_requests(&query, None)
            .await
            .expect_err("search should fail");

        assert!(
            matches!(error, IntakeError::RepositoryUnavailable { .. }),
            "expected RepositoryUnavailable, got {error:?}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn unauthorised_token_is_authentication_error(query: SearchQuery) {
        let server = MockServer::start().await;
        mount_graphql(
            &server,
            ResponseTemplate::new(401).set_body_json(json!({
                "message": "Bad credentials",
                "documentation_url": "https://docs.github.com/graphql"
            })),
        )
        .await;

        let error = gateway_for(&server)
            .search_pull_requests(&query, None)
            .await
            .expect_err("search should fail");

        assert!(
            matches!(error, IntakeError::Authentication { .. }),
            "expected Authentication, got {error:?}"
        );
    }
}
