//! Paged collection of pull request activity across repositories.
//!
//! [`ActivityCollector`] walks repositories strictly in order. Each repository
//! is searched page by page through a [`SearchGateway`], and every page is
//! flattened into [`EventRecord`]s. Failures are classified with
//! [`FailureClass`]: an exhausted rate limit aborts the run, an unavailable
//! repository is written to the [`SkipRegistry`] and never queried again, and
//! anything else is logged before moving on.
//!
//! Collection is lazy. [`CollectionRun::next_batch`] performs at most one
//! remote fetch per call, so callers can stop early or interleave their own
//! work.

mod classify;
mod labels;
mod normalize;
mod repositories;


use std::collections::VecDeque;

use tracing::{debug, error, info, warn};

use crate::events::EventRecord;
use crate::github::{
    CollectionWindow, IntakeError, PageSize, RepositorySlug, SearchGateway, SearchQuery,
};
use crate::skip_registry::SkipRegistry;

pub use classify::FailureClass;
pub use labels::{DEFAULT_SKIP_LABEL, SkipLabels};
pub use repositories::{merge_repositories, organization_repositories_or_empty};

use normalize::{NormalizedPage, normalize_page};

/// Collects activity events through a search gateway.
pub struct ActivityCollector<'a, G: SearchGateway + ?Sized> {
    gateway: &'a G,
    registry: &'a mut SkipRegistry,
    window: CollectionWindow,
    skip_labels: SkipLabels,
    page_size: PageSize,
}

impl<'a, G: SearchGateway + ?Sized> ActivityCollector<'a, G> {
    /// Creates a collector using the default page size.
    pub fn new(
        gateway: &'a G,
        registry: &'a mut SkipRegistry,
        window: CollectionWindow,
        skip_labels: SkipLabels,
    ) -> Self {
        Self {
            gateway,
            registry,
            window,
            skip_labels,
            page_size: PageSize::default(),
        }
    }

    /// Overrides the number of pull requests requested per page.
    #[must_use]
    pub const fn with_page_size(mut self, page_size: PageSize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Starts a fresh run over `repositories`, given as `owner/name`.
    ///
    /// Nothing is fetched until the run is polled.
    pub fn collect<I, S>(&mut self, repositories: I) -> CollectionRun<'_, G>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CollectionRun {
            gateway: self.gateway,
            registry: &mut *self.registry,
            window: self.window,
            skip_labels: &self.skip_labels,
            page_size: self.page_size,
            pending: repositories.into_iter().map(Into::into).collect(),
            active: None,
        }
    }
}

/// Cursor state of the repository currently being paged.
struct ActiveRepository {
    query: SearchQuery,
    cursor: Option<String>,
    pull_requests: usize,
}

/// A lazy, single-use pass over a list of repositories.
pub struct CollectionRun<'r, G: SearchGateway + ?Sized> {
    gateway: &'r G,
    registry: &'r mut SkipRegistry,
    window: CollectionWindow,
    skip_labels: &'r SkipLabels,
    page_size: PageSize,
    pending: VecDeque<String>,
    active: Option<ActiveRepository>,
}

impl<G: SearchGateway + ?Sized> CollectionRun<'_, G> {
    /// Fetches the next page and returns its records.
    ///
    /// A batch may be empty, for example when a page holds no pull requests
    /// or its repository failed. `Ok(None)` marks the end of the run.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::RateLimitExceeded`] when the API budget is
    /// exhausted. The run is finished afterwards.
    pub async fn next_batch(&mut self) -> Result<Option<Vec<EventRecord>>, IntakeError> {
        loop {
            if let Some(active) = self.active.take() {
                return self.fetch_page(active).await.map(Some);
            }
            let Some(repository) = self.pending.pop_front() else {
                return Ok(None);
            };
            self.active = self.start_repository(&repository);
        }
    }

    /// Drains the run, concatenating every batch.
    ///
    /// # Errors
    ///
    /// Returns [`IntakeError::RateLimitExceeded`] when the API budget is
    /// exhausted; records gathered so far are discarded.
    pub async fn collect_all(mut self) -> Result<Vec<EventRecord>, IntakeError> {
        let mut records = Vec::new();
        while let Some(batch) = self.next_batch().await? {
            records.extend(batch);
        }
        Ok(records)
    }

    fn start_repository(&self, repository: &str) -> Option<ActiveRepository> {
        let slug = match RepositorySlug::parse(repository) {
            Ok(slug) => slug,
            Err(error) => {
                warn!(repository, error = %error, "ignoring repository");
                return None;
            }
        };

        let name = slug.to_string();
        if self.registry.contains(&name) {
            info!(repository = %name, "skipping repository (permanently skipped)");
            return None;
        }

        debug!(repository = %name, "collecting pull requests");
        Some(ActiveRepository {
            query: SearchQuery::new(slug, self.window, self.page_size),
            cursor: None,
            pull_requests: 0,
        })
    }

    async fn fetch_page(
        &mut self,
        mut active: ActiveRepository,
    ) -> Result<Vec<EventRecord>, IntakeError> {
        let repository = active.query.repository().to_string();
        let fetched = self
            .gateway
            .search_pull_requests(&active.query, active.cursor.as_deref())
            .await;
        let page = match fetched {
            Ok(page) => page,
            Err(failure) => {
                self.handle_failure(&repository, failure)?;
                return Ok(Vec::new());
            }
        };

        let NormalizedPage { records, failure } =
            normalize_page(&repository, &page.items, self.skip_labels);
        if let Some(failure) = failure {
            self.handle_failure(&repository, failure)?;
            return Ok(records);
        }

        active.pull_requests += page.items.iter().flatten().count();
        debug!(
            repository = %repository,
            fetched = active.pull_requests,
            "fetched pull requests"
        );

        if let Some(cursor) = page.page_info.next_cursor() {
            active.cursor = Some(cursor.to_owned());
            self.active = Some(active);
        } else {
            if page.page_info.has_next() {
                warn!(
                    repository = %repository,
                    "page reported more results without a cursor; stopping"
                );
            }
            info!(
                repository = %repository,
                pull_requests = active.pull_requests,
                "repository complete"
            );
        }

        Ok(records)
    }

    fn handle_failure(&mut self, repository: &str, failure: IntakeError) -> Result<(), IntakeError> {
        match FailureClass::of(&failure) {
            FailureClass::Fatal => {
                self.pending.clear();
                Err(failure)
            }
            FailureClass::SkipPermanently => {
                warn!(
                    repository,
                    error = %failure,
                    "repository unavailable; adding to skip list"
                );
                if let Err(persist_error) = self.registry.record(repository) {
                    error!(repository, error = %persist_error, "failed to persist skip list");
                }
                Ok(())
            }
            FailureClass::Continue => {
                warn!(repository, error = %failure, "failed to collect pull requests");
                Ok(())
            }
        }
    }
}
