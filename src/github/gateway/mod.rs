//! Gateways for querying pull request activity through Octocrab.
//!
//! The traits are the seam between collection logic and the network: tests
//! substitute mocks while the Octocrab implementations issue real requests.

mod client;
mod error_mapping;
mod organization;
mod search;

pub use organization::OctocrabOrganizationGateway;
pub use search::OctocrabSearchGateway;

use async_trait::async_trait;

use crate::github::error::IntakeError;
use crate::github::models::SearchPage;
use crate::github::query::SearchQuery;

/// Gateway that runs the pull request search for one repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchGateway: Send + Sync {
    /// Fetch one page of pull requests matching `query`, continuing after
    /// `cursor` when given.
    async fn search_pull_requests<'a>(
        &self,
        query: &SearchQuery,
        cursor: Option<&'a str>,
    ) -> Result<SearchPage, IntakeError>;
}

/// Gateway for organisation-level lookups.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrganizationGateway: Send + Sync {
    /// List every repository of `organization` as `owner/name`.
    async fn organization_repositories(&self, organization: &str) -> Result<Vec<String>, IntakeError>;
}
