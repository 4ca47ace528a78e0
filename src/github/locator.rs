//! Identity wrappers for repositories, tokens, and API endpoints.

use std::fmt;

use url::Url;

use super::error::IntakeError;

/// Public GitHub API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A repository identified as `owner/name`.
///
/// # Example
///
/// ```
/// use prtally::github::RepositorySlug;
///
/// let slug = RepositorySlug::parse(" octo/hello-world ").expect("valid slug");
/// assert_eq!(slug.owner().as_str(), "octo");
/// assert_eq!(slug.to_string(), "octo/hello-world");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositorySlug {
    /// Parses an `owner/name` identifier, ignoring surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidRepository`] unless the input has exactly
    /// two non-empty, whitespace-free segments.
    pub fn parse(input: &str) -> Result<Self, IntakeError> {
        let invalid = || IntakeError::InvalidRepository {
            input: input.to_owned(),
        };

        let trimmed = input.trim();
        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        let is_segment = |segment: &str| {
            !segment.is_empty() && !segment.contains('/') && !segment.contains(char::is_whitespace)
        };
        if !is_segment(owner) || !is_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: RepositoryOwner(owner.to_owned()),
            name: RepositoryName(name.to_owned()),
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Validates that the token is non-empty and trims whitespace.
    ///
    /// # Errors
    ///
    /// Returns `IntakeError::MissingToken` when the supplied string is blank.
    pub fn new(token: impl AsRef<str>) -> Result<Self, IntakeError> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return Err(IntakeError::MissingToken);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

/// Parses the API base URL, defaulting to the public GitHub endpoint.
///
/// # Errors
///
/// Returns [`IntakeError::InvalidUrl`] when the URL cannot be parsed or does
/// not use `http`/`https`.
pub fn parse_api_base(input: Option<&str>) -> Result<Url, IntakeError> {
    let raw = input.map_or(DEFAULT_API_URL, str::trim);
    let parsed = Url::parse(raw).map_err(|error| IntakeError::InvalidUrl(error.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(IntakeError::InvalidUrl(format!(
            "unsupported scheme `{}`",
            parsed.scheme()
        )));
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{IntakeError, PersonalAccessToken, RepositorySlug, parse_api_base};

    #[rstest]
    #[case::missing_separator("octo")]
    #[case::empty_owner("/repo")]
    #[case::empty_name("octo/")]
    #[case::extra_segment("octo/repo/extra")]
    #[case::inner_whitespace("octo/my repo")]
    #[case::blank("   ")]
    fn slug_rejects_malformed_input(#[case] input: &str) {
        let result = RepositorySlug::parse(input);
        assert!(
            matches!(result, Err(IntakeError::InvalidRepository { .. })),
            "expected InvalidRepository for `{input}`, got {result:?}"
        );
    }

    #[rstest]
    fn slug_exposes_owner_and_name() {
        let slug = RepositorySlug::parse("rust-lang/rust").expect("slug should parse");
        assert_eq!(slug.owner().as_str(), "rust-lang");
        assert_eq!(slug.name().as_str(), "rust");
    }

    #[rstest]
    fn token_debug_output_is_redacted() {
        let token = PersonalAccessToken::new(" ghp_secret ").expect("token should be valid");
        assert_eq!(token.value(), "ghp_secret");
        assert_eq!(format!("{token:?}"), "PersonalAccessToken(***)");
    }

    #[rstest]
    fn blank_token_is_missing() {
        assert_eq!(
            PersonalAccessToken::new("  "),
            Err(IntakeError::MissingToken)
        );
    }

    #[rstest]
    #[case::default(None, "https://api.github.com/")]
    #[case::enterprise(Some("https://ghe.example.com/api"), "https://ghe.example.com/api")]
    fn api_base_parses(#[case] input: Option<&str>, #[case] expected: &str) {
        let url = parse_api_base(input).expect("API base should parse");
        assert_eq!(url.as_str(), expected);
    }

    #[rstest]
    fn api_base_rejects_non_http_scheme() {
        let result = parse_api_base(Some("ftp://example.com"));
        assert!(
            matches!(result, Err(IntakeError::InvalidUrl(_))),
            "expected InvalidUrl, got {result:?}"
        );
    }
}
