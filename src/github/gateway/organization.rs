//! Organisation repository listing backed by Octocrab.

use async_trait::async_trait;
use octocrab::{Octocrab, Page};
use serde::Deserialize;
use url::Url;

use crate::github::error::IntakeError;
use crate::github::locator::PersonalAccessToken;

use super::OrganizationGateway;
use super::client::build_octocrab_client;
use super::error_mapping::map_octocrab_error;

const OPERATION: &str = "list organisation repositories";

#[derive(Debug, Deserialize)]
struct ApiRepository {
    full_name: String,
}

/// Octocrab-backed organisation gateway.
pub struct OctocrabOrganizationGateway {
    client: Octocrab,
}

impl OctocrabOrganizationGateway {
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
}

#[async_trait]
impl OrganizationGateway for OctocrabOrganizationGateway {
    async fn organization_repositories(&self, organization: &str) -> Result<Vec<String>, IntakeError> {
        let route = format!("/orgs/{organization}/repos");
        let params = [("type", "all"), ("per_page", "100")];

        let first_page: Page<ApiRepository> = self
            .client
            .get(&route, Some(&params))
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        let repositories = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|error| map_octocrab_error(OPERATION, &error))?;

        Ok(repositories
            .into_iter()
            .map(|repository| repository.full_name)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::OctocrabOrganizationGateway;
    use crate::github::error::IntakeError;
    use crate::github::gateway::OrganizationGateway;
    use crate::github::locator::{PersonalAccessToken, parse_api_base};

    fn gateway_for(server: &MockServer) -> OctocrabOrganizationGateway {
        let token = PersonalAccessToken::new("valid-token").expect("token should be valid");
        let base = parse_api_base(Some(&server.uri())).expect("server URI should parse");
        OctocrabOrganizationGateway::for_token(&token, &base).expect("should create gateway")
    }

    #[tokio::test]
    async fn lists_full_names() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/octo/repos"))
            .and(query_param("per_page", "100"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                { "id": 1, "name": "one", "full_name": "octo/one" },
                { "id": 2, "name": "two", "full_name": "octo/two" }
            ])))
            .mount(&server)
            .await;

        let repositories = gateway_for(&server)
            .organization_repositories("octo")
            .await
            .expect("listing should succeed");

        assert_eq!(repositories, vec!["octo/one".to_owned(), "octo/two".to_owned()]);
    }

    #[tokio::test]
    async fn missing_organisation_is_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/orgs/ghost/repos"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "message": "Not Found",
                "documentation_url": "https://docs.github.com/rest/repos/repos#list-organization-repositories"
            })))
            .mount(&server)
            .await;

        let error = gateway_for(&server)
            .organization_repositories("ghost")
            .await
            .expect_err("listing should fail");

        assert!(
            matches!(error, IntakeError::Api { .. }),
            "expected Api error, got {error:?}"
        );
    }
}
