//! Scenario state and run driver for the leaderboard BDD tests.

use camino::Utf8PathBuf;
use prtally::github::parse_api_base;
use prtally::report::render_report;
use prtally::{
    ActivityCollector, CollectionWindow, IntakeError, OctocrabSearchGateway, PersonalAccessToken,
    SkipLabels, SkipRegistry, SummaryOptions, summarize,
};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use tempfile::TempDir;
use wiremock::{Mock, MockServer};

use super::runtime::{SharedRuntime, ensure_runtime_and_server};

#[derive(ScenarioState, Default)]
pub(crate) struct LeaderboardState {
    pub(crate) runtime: Slot<SharedRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) skip_dir: Slot<TempDir>,
    pub(crate) skip_list: Slot<Utf8PathBuf>,
    pub(crate) report: Slot<String>,
    pub(crate) error: Slot<IntakeError>,
}

pub(crate) fn runtime_for(state: &LeaderboardState) -> SharedRuntime {
    ensure_runtime_and_server(&state.runtime, &state.server)
        .unwrap_or_else(|error| panic!("failed to start runtime: {error}"))
}

/// Mounts `mock` on the scenario's server, starting it if needed.
pub(crate) fn mount(state: &LeaderboardState, mock: Mock) {
    let runtime = runtime_for(state);
    state
        .server
        .with_ref(|server| runtime.block_on(mock.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

/// Skip list location for the scenario, created on first use.
pub(crate) fn skip_list_path(state: &LeaderboardState) -> Utf8PathBuf {
    if state.skip_list.with_ref(|_| ()).is_none() {
        let dir = TempDir::new().unwrap_or_else(|error| panic!("temp dir: {error}"));
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .unwrap_or_else(|path| panic!("temp dir is not UTF-8: {}", path.display()));
        state.skip_list.set(base.join("skipped_repositories.json"));
        state.skip_dir.set(dir);
    }
    state
        .skip_list
        .get()
        .unwrap_or_else(|| panic!("skip list path not initialised"))
}

/// Entries persisted in the scenario's skip list.
pub(crate) fn persisted_skips(state: &LeaderboardState) -> Vec<String> {
    SkipRegistry::load(&skip_list_path(state))
        .unwrap_or_else(|error| panic!("skip list should load: {error}"))
        .entries()
        .to_vec()
}

/// Collects, summarises, and renders one run over `repositories`.
pub(crate) fn run_leaderboard(
    state: &LeaderboardState,
    repositories: &[String],
) -> Result<String, IntakeError> {
    let runtime = runtime_for(state);
    let server_uri = state
        .server
        .with_ref(MockServer::uri)
        .ok_or_else(|| IntakeError::Api {
            message: "mock server URL missing".to_owned(),
        })?;
    let skip_list = skip_list_path(state);

    runtime.block_on(async {
        let token = PersonalAccessToken::new("valid-token")?;
        let api_base = parse_api_base(Some(server_uri.as_str()))?;
        let gateway = OctocrabSearchGateway::for_token(&token, &api_base)?;
        let mut registry = SkipRegistry::load(&skip_list)
            .unwrap_or_else(|error| panic!("skip list should load: {error}"));

        let events = ActivityCollector::new(
            &gateway,
            &mut registry,
            CollectionWindow::unbounded(),
            SkipLabels::default(),
        )
        .collect(repositories.iter().cloned())
        .collect_all()
        .await?;

        Ok(render_report(&summarize(&events, &SummaryOptions::default())))
    })
}
