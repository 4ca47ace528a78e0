//! GitHub access for pull request activity collection.
//!
//! This module wraps Octocrab to run the GraphQL pull request search and list
//! organisation repositories. Transport and GraphQL failures are mapped into
//! [`IntakeError`] variants so the collector can tell a spent rate limit from
//! an unavailable repository without seeing Octocrab internals.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod pagination;
pub mod query;
pub mod rate_limit;

pub use error::IntakeError;
pub use gateway::{
    OctocrabOrganizationGateway, OctocrabSearchGateway, OrganizationGateway, SearchGateway,
};
pub use locator::{
    DEFAULT_API_URL, PersonalAccessToken, RepositoryName, RepositoryOwner, RepositorySlug,
    parse_api_base,
};
pub use models::{CommentAction, PullRequestItem, ReviewAction, ReviewThread, SearchPage};
pub use pagination::{PageInfo, PageSize};
pub use query::{CollectionWindow, SearchQuery};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::{MockOrganizationGateway, MockSearchGateway};
