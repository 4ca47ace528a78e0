//! Support modules for the leaderboard BDD tests.

pub(crate) mod domain;
pub(crate) mod harness;
#[path = "../support/runtime.rs"]
pub(crate) mod runtime;
pub(crate) mod state;

pub(crate) use domain::{RepositoryList, SearchCount};
pub(crate) use harness::{
    graphql_error, pull_request, released_pull_request, reviewed_pull_requests, row_cells,
    search_mock, search_page, searches_for,
};
pub(crate) use state::{
    LeaderboardState, mount, persisted_skips, run_leaderboard, runtime_for,
};
