//! Error types exposed by the GitHub collection layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while resolving configuration or communicating with GitHub.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum IntakeError {
    /// The authentication token was missing.
    #[error("personal access token is required (set PRTALLY_TOKEN or GITHUB_TOKEN)")]
    MissingToken,

    /// Configuration could not be loaded or is inconsistent.
    #[error("configuration error: {message}")]
    Configuration {
        /// Details about the configuration failure.
        message: String,
    },

    /// A repository identifier was not in `owner/name` form.
    #[error("repository must be given as owner/name, got `{input}`")]
    InvalidRepository {
        /// The identifier as supplied.
        input: String,
    },

    /// The provided URL could not be parsed.
    #[error("API URL is invalid: {0}")]
    InvalidUrl(String),

    /// The authentication token was rejected by GitHub.
    #[error("GitHub rejected the token: {message}")]
    Authentication {
        /// GitHub error message returned with the 401 response.
        message: String,
    },

    /// GitHub returned an error that is neither fatal nor repository-specific.
    #[error("GitHub API error: {message}")]
    Api {
        /// Response body or GraphQL error describing the failure.
        message: String,
    },

    /// Networking failed while calling GitHub.
    #[error("network error talking to GitHub: {message}")]
    Network {
        /// Transport-level error detail.
        message: String,
    },

    /// Local I/O operation failed.
    #[error("I/O error: {message}")]
    Io {
        /// Error detail from the underlying I/O operation.
        message: String,
    },

    /// The API rate limit is exhausted; no further requests can succeed.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimitExceeded {
        /// Rate limit info if it could be retrieved.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// The repository is forbidden or does not exist.
    #[error("repository {repository} is unavailable: {message}")]
    RepositoryUnavailable {
        /// Repository in `owner/name` form.
        repository: String,
        /// Error message from GitHub.
        message: String,
    },

    /// Invalid pagination parameters.
    #[error("invalid pagination: {message}")]
    InvalidPagination {
        /// Description of the invalid parameter.
        message: String,
    },
}
