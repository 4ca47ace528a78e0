//! prtally CLI entrypoint: collect pull request activity and print
//! per-repository leaderboards.

use std::io::{self, Write};
use std::process::ExitCode;

use ortho_config::OrthoConfig;
use prtally::collector::{merge_repositories, organization_repositories_or_empty};
use prtally::{
    ActivityCollector, IntakeError, OctocrabOrganizationGateway, OctocrabSearchGateway,
    PersonalAccessToken, PrTallyConfig, ReportOutput, ReportSink, SkipRegistry, summarize,
};
use tracing_subscriber::EnvFilter;
use url::Url;

/// Filter applied when `RUST_LOG` is unset.
const DEFAULT_LOG_FILTER: &str = "info";

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Installs a stderr subscriber so the report on stdout stays clean.
fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), IntakeError> {
    let config = load_config()?;
    config.require_sources()?;

    let token = PersonalAccessToken::new(config.resolve_token()?)?;
    let api_base = config.api_base()?;
    let window = config.date_window()?;
    let page_size = config.page_size()?;

    let repositories = resolve_repositories(&config, &token, &api_base).await?;
    let mut registry = SkipRegistry::load(&config.skip_list_path())?;

    let gateway = OctocrabSearchGateway::for_token(&token, &api_base)?;
    let mut collector =
        ActivityCollector::new(&gateway, &mut registry, window, config.skip_labels())
            .with_page_size(page_size);
    let events = collector.collect(repositories).collect_all().await?;

    let mut output = ReportOutput::stdout(config.output_path(), config.print_to_terminal);
    if config.dump_events {
        output.dump_events(&events)?;
    }

    let summary = summarize(&events, &config.summary_options());
    output.publish(&summary)
}

/// Loads configuration from CLI, environment, and files.
///
/// # Errors
///
/// Returns [`IntakeError::Configuration`] when ortho-config fails to parse
/// arguments or load configuration files.
fn load_config() -> Result<PrTallyConfig, IntakeError> {
    PrTallyConfig::load().map_err(|error| IntakeError::Configuration {
        message: error.to_string(),
    })
}

/// Combines configured repositories with the organisation's, if any.
async fn resolve_repositories(
    config: &PrTallyConfig,
    token: &PersonalAccessToken,
    api_base: &Url,
) -> Result<Vec<String>, IntakeError> {
    let Some(organization) = config.organization() else {
        return Ok(merge_repositories(&config.repositories, &[]));
    };
    let gateway = OctocrabOrganizationGateway::for_token(token, api_base)?;
    let discovered = organization_repositories_or_empty(&gateway, organization).await;
    Ok(merge_repositories(&config.repositories, &discovered))
}
