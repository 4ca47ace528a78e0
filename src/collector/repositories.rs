//! Assembling the list of repositories to collect from.

use tracing::warn;

use crate::github::OrganizationGateway;

/// Merges configured repositories with an organisation's repositories.
///
/// Duplicates are removed and the first occurrence wins, so configured
/// repositories keep their position ahead of discovered ones.
///
/// # Example
///
/// ```
/// use prtally::collector::merge_repositories;
///
/// let configured = vec!["octo/b".to_owned(), "octo/a".to_owned()];
/// let discovered = vec!["octo/a".to_owned(), "octo/c".to_owned()];
/// assert_eq!(
///     merge_repositories(&configured, &discovered),
///     vec!["octo/b", "octo/a", "octo/c"]
/// );
/// ```
#[must_use]
pub fn merge_repositories(configured: &[String], organization: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(configured.len() + organization.len());
    for repository in configured.iter().chain(organization) {
        let trimmed = repository.trim();
        if !trimmed.is_empty() && !merged.iter().any(|seen| seen == trimmed) {
            merged.push(trimmed.to_owned());
        }
    }
    merged
}

/// Lists an organisation's repositories, treating failure as an empty list.
pub async fn organization_repositories_or_empty<G>(gateway: &G, organization: &str) -> Vec<String>
where
    G: OrganizationGateway + ?Sized,
{
    match gateway.organization_repositories(organization).await {
        Ok(repositories) => repositories,
        Err(error) => {
            warn!(
                organization,
                error = %error,
                "failed to list organisation repositories; continuing without them"
            );
            Vec::new()
        }
    }
}
