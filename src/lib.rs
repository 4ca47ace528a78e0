//! prtally library crate: per-repository pull request activity leaderboards.
//!
//! The library searches GitHub for pull requests created within a date window,
//! flattens each one into activity events (creation, reviews, merge, and
//! comments), and aggregates those events into per-user tables that render as
//! GitHub-flavoured Markdown. Repositories that cannot be accessed are
//! remembered in a persisted skip list so later runs do not query them again.

pub mod collector;
pub mod config;
pub mod events;
pub mod github;
pub mod report;
pub mod skip_registry;
pub mod summary;

pub use collector::{ActivityCollector, CollectionRun, SkipLabels};
pub use config::PrTallyConfig;
pub use events::{EventRecord, EventType};
pub use github::{
    CollectionWindow, IntakeError, OctocrabOrganizationGateway, OctocrabSearchGateway,
    OrganizationGateway, PersonalAccessToken, SearchGateway,
};
pub use report::{ReportOutput, ReportSink};
pub use skip_registry::{SkipRegistry, SkipRegistryError};
pub use summary::{RepositoryTable, Summary, SummaryOptions, summarize};
