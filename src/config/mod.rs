//! Application configuration loaded from CLI, environment, and files.
//!
//! [`PrTallyConfig`] merges values from command-line arguments, environment
//! variables, and configuration files using ortho-config's layered approach.
//!
//! # Precedence
//!
//! Configuration values are loaded with the following precedence (lowest to
//! highest):
//!
//! 1. **Defaults** – Built-in application defaults
//! 2. **Configuration file** – `.prtally.toml` in current directory, home
//!    directory, or XDG config directory
//! 3. **Environment variables** – `PRTALLY_TOKEN`, `PRTALLY_ORGANIZATION`,
//!    or legacy `GITHUB_TOKEN`
//! 4. **Command-line arguments** – `--repositories`, `--organization`, ...
//!
//! # Configuration File
//!
//! ```toml
//! token = "ghp_example"
//! repositories = ["octo/api", "octo/web"]
//! organization = "octo"
//! start_date = "2024-01-01"
//! end_date = "2024-03-31"
//! skip_labels = ["release", "dependencies"]
//! skip_users = ["dependabot[bot]"]
//! metrics = ["pr_created", "reviews_approved", "avg_merge_time"]
//! sort_by = "reviews_approved"
//! output_file = "report.md"
//! print_to_terminal = true
//! ```


use std::collections::HashSet;
use std::env;

use camino::Utf8PathBuf;
use chrono::NaiveDate;
use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::collector::SkipLabels;
use crate::github::{CollectionWindow, IntakeError, PageSize, parse_api_base};
use crate::skip_registry::DEFAULT_SKIP_LIST;
use crate::summary::{DEFAULT_SORT_KEY, SummaryOptions, UserFilter};

/// Date format accepted for `start_date` and `end_date`.
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Application configuration supporting CLI, environment, and file sources.
///
/// # Example
///
/// ```no_run
/// use ortho_config::OrthoConfig;
/// use prtally::PrTallyConfig;
///
/// let config = PrTallyConfig::load().expect("failed to load configuration");
/// config.require_sources().expect("repositories or organization required");
/// let token = config.resolve_token().expect("token required");
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "PRTALLY",
    discovery(
        dotfile_name = ".prtally.toml",
        config_file_name = "prtally.toml",
        app_name = "prtally"
    )
)]
pub struct PrTallyConfig {
    /// Personal access token for GitHub API authentication.
    ///
    /// Can be provided via:
    /// - CLI: `--token <TOKEN>` or `-t <TOKEN>`
    /// - Environment: `PRTALLY_TOKEN` or `GITHUB_TOKEN` (legacy)
    /// - Config file: `token = "..."`
    #[ortho_config(cli_short = 't')]
    pub token: Option<String>,

    /// Repositories to collect, as `owner/name`.
    #[ortho_config(cli_short = 'r')]
    pub repositories: Vec<String>,

    /// Organisation whose repositories are appended to `repositories`.
    #[ortho_config(cli_short = 'o')]
    pub organization: Option<String>,

    /// Metric key used to sort rows, descending.
    #[ortho_config(cli_short = 's')]
    pub sort_by: Option<String>,

    /// First creation date included, `YYYY-MM-DD`.
    #[ortho_config()]
    pub start_date: Option<String>,

    /// Last creation date included, `YYYY-MM-DD`.
    #[ortho_config()]
    pub end_date: Option<String>,

    /// Labels whose pull requests contribute no line counts.
    ///
    /// Defaults to `release` when empty.
    #[ortho_config()]
    pub skip_labels: Vec<String>,

    /// Users left out of every table.
    #[ortho_config()]
    pub skip_users: Vec<String>,

    /// When non-empty, only these users appear in tables.
    #[ortho_config(cli_short = 'u')]
    pub users: Vec<String>,

    /// Metric keys to show, in order. Empty shows every metric.
    #[ortho_config(cli_short = 'm')]
    pub metrics: Vec<String>,

    /// File receiving the rendered report.
    #[ortho_config()]
    pub output_file: Option<String>,

    /// Prints the report to stdout even when `output_file` is set.
    ///
    /// Can be provided via:
    /// - CLI: `--print-to-terminal` / `-p`
    /// - Config file: `print_to_terminal = true`
    ///
    /// Note: `ortho_config` does not load boolean values from the
    /// environment.
    #[ortho_config(cli_short = 'p')]
    pub print_to_terminal: bool,

    /// Path of the persisted skip list.
    #[ortho_config()]
    pub skip_list: Option<String>,

    /// GitHub API base URL, for GitHub Enterprise installations.
    #[ortho_config()]
    pub api_url: Option<String>,

    /// Pull requests requested per search page.
    #[ortho_config()]
    pub page_size: Option<u8>,

    /// Writes the collected events to stderr as JSON Lines, keeping stdout for
    /// the report.
    #[ortho_config()]
    pub dump_events: bool,
}

impl PrTallyConfig {
    /// Resolves the token from configuration or the legacy `GITHUB_TOKEN`
    /// environment variable.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::MissingToken`] when no token source provides a
    /// value.
    pub fn resolve_token(&self) -> Result<String, IntakeError> {
        self.token
            .clone()
            .or_else(|| env::var("GITHUB_TOKEN").ok())
            .filter(|token| !token.trim().is_empty())
            .ok_or(IntakeError::MissingToken)
    }

    /// Ensures there is something to collect.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when neither repositories nor
    /// an organisation are configured.
    pub fn require_sources(&self) -> Result<(), IntakeError> {
        let has_repositories = self.repositories.iter().any(|repo| !repo.trim().is_empty());
        let has_organization = self
            .organization
            .as_deref()
            .is_some_and(|org| !org.trim().is_empty());
        if has_repositories || has_organization {
            return Ok(());
        }
        Err(IntakeError::Configuration {
            message: "no repositories configured (use --repositories or --organization)"
                .to_owned(),
        })
    }

    /// Organisation name, when one is configured.
    #[must_use]
    pub fn organization(&self) -> Option<&str> {
        self.organization
            .as_deref()
            .map(str::trim)
            .filter(|org| !org.is_empty())
    }

    /// Parses the configured dates into a collection window.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::Configuration`] when a date is malformed or the
    /// start falls after the end.
    pub fn date_window(&self) -> Result<CollectionWindow, IntakeError> {
        let start = parse_date("start_date", self.start_date.as_deref())?;
        let end = parse_date("end_date", self.end_date.as_deref())?;
        CollectionWindow::new(start, end)
    }

    /// Labels that zero line counts, defaulting to `release`.
    #[must_use]
    pub fn skip_labels(&self) -> SkipLabels {
        let labels = SkipLabels::new(&self.skip_labels);
        if labels.is_empty() {
            SkipLabels::default()
        } else {
            labels
        }
    }

    /// Aggregation options built from the user, metric, and sort settings.
    #[must_use]
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            users: UserFilter {
                include: user_set(&self.users),
                exclude: user_set(&self.skip_users),
            },
            metrics: (!self.metrics.is_empty()).then(|| self.metrics.clone()),
            sort_by: self
                .sort_by
                .clone()
                .unwrap_or_else(|| DEFAULT_SORT_KEY.to_owned()),
        }
    }

    /// Location of the persisted skip list.
    #[must_use]
    pub fn skip_list_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(self.skip_list.as_deref().unwrap_or(DEFAULT_SKIP_LIST))
    }

    /// Report file, when one is configured.
    #[must_use]
    pub fn output_path(&self) -> Option<Utf8PathBuf> {
        self.output_file
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
            .map(Utf8PathBuf::from)
    }

    /// Validated search page size.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidPagination`] when the configured value is
    /// out of range.
    pub fn page_size(&self) -> Result<PageSize, IntakeError> {
        self.page_size.map_or_else(|| Ok(PageSize::default()), PageSize::new)
    }

    /// GitHub API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::InvalidUrl`] when `api_url` cannot be parsed.
    pub fn api_base(&self) -> Result<Url, IntakeError> {
        parse_api_base(self.api_url.as_deref())
    }
}

fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, IntakeError> {
    let Some(raw) = value.map(str::trim).filter(|raw| !raw.is_empty()) else {
        return Ok(None);
    };
    NaiveDate::parse_from_str(raw, DATE_FORMAT)
        .map(Some)
        .map_err(|error| IntakeError::Configuration {
            message: format!("{field} '{raw}' is not a YYYY-MM-DD date: {error}"),
        })
}

fn user_set(users: &[String]) -> Option<HashSet<String>> {
    let set: HashSet<String> = users
        .iter()
        .map(|user| user.trim())
        .filter(|user| !user.is_empty())
        .map(ToOwned::to_owned)
        .collect();
    (!set.is_empty()).then_some(set)
}
