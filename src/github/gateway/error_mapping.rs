//! Error mapping helpers for the Octocrab GitHub gateway implementations.

use http::StatusCode;

use crate::github::error::IntakeError;
use crate::github::locator::RepositorySlug;
use crate::github::models::GraphQlError;

/// GraphQL error type GitHub reports when the query budget is spent.
const GRAPHQL_RATE_LIMITED: &str = "RATE_LIMITED";

/// Message fragment GitHub uses for search scopes it cannot resolve.
const UNSEARCHABLE_REPOSITORY: &str = "cannot be searched";

/// Checks if a GitHub error status indicates an authentication failure.
pub(super) const fn is_auth_failure(status: StatusCode) -> bool {
    matches!(status, StatusCode::UNAUTHORIZED)
}

/// Checks if a GitHub error status means the repository cannot be read.
pub(super) const fn is_unavailable(status: StatusCode) -> bool {
    matches!(status, StatusCode::FORBIDDEN | StatusCode::NOT_FOUND)
}

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Returns true when the text carries GitHub's rate limit signature.
pub(super) fn is_rate_limit_message(message: &str) -> bool {
    message.to_lowercase().contains("rate limit")
}

/// Checks whether the GitHub error represents a rate limit error based on the
/// HTTP status and message / documentation URL content.
pub(super) fn is_rate_limit_error(source: &octocrab::GitHubError) -> bool {
    let is_rate_limit_status = matches!(
        source.status_code,
        StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let message_indicates_rate_limit = is_rate_limit_message(&source.message)
        || source
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && message_indicates_rate_limit
}

pub(super) fn map_octocrab_error(operation: &str, error: &octocrab::Error) -> IntakeError {
    if let octocrab::Error::GitHub { source, .. } = error {
        return if is_auth_failure(source.status_code) {
            IntakeError::Authentication {
                message: format!(
                    "{operation} failed: GitHub returned {status} {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        } else {
            IntakeError::Api {
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        };
    }

    if is_network_error(error) {
        return IntakeError::Network {
            message: format!("{operation} failed: {error}"),
        };
    }

    IntakeError::Api {
        message: format!("{operation} failed: {error}"),
    }
}

/// Maps a transport-level failure for a repository-scoped request.
///
/// Rate limit responses are expected to be handled by the caller first, since
/// they need an extra request to capture the reset time.
pub(super) fn map_repository_error(
    repository: &RepositorySlug,
    operation: &str,
    error: &octocrab::Error,
) -> IntakeError {
    match error {
        octocrab::Error::GitHub { source, .. } if is_unavailable(source.status_code) => {
            IntakeError::RepositoryUnavailable {
                repository: repository.to_string(),
                message: format!(
                    "{operation} failed with status {status}: {message}",
                    status = source.status_code,
                    message = source.message
                ),
            }
        }
        _ => map_octocrab_error(operation, error),
    }
}

/// Maps the `errors` array of a GraphQL response.
///
/// Any entry signalling a rate limit wins; otherwise the first entry decides
/// between an unavailable repository and a generic API failure.
pub(super) fn map_graphql_errors(repository: &RepositorySlug, errors: &[GraphQlError]) -> IntakeError {
    if let Some(limited) = errors.iter().find(|entry| {
        entry.kind.as_deref() == Some(GRAPHQL_RATE_LIMITED) || is_rate_limit_message(&entry.message)
    }) {
        return IntakeError::RateLimitExceeded {
            rate_limit: None,
            message: limited.message.clone(),
        };
    }

    let Some(first) = errors.first() else {
        return IntakeError::Api {
            message: format!("search for {repository} failed without an error message"),
        };
    };

    let unavailable = matches!(first.kind.as_deref(), Some("NOT_FOUND" | "FORBIDDEN"))
        || first.message.contains(UNSEARCHABLE_REPOSITORY);
    if unavailable {
        IntakeError::RepositoryUnavailable {
            repository: repository.to_string(),
            message: first.message.clone(),
        }
    } else {
        IntakeError::Api {
            message: format!("search for {repository} failed: {}", first.message),
        }
    }
}
