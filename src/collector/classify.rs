//! Three-way classification of collection failures.

use crate::github::IntakeError;

/// How the collector reacts to a failed page fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureClass {
    /// Abort the whole run.
    Fatal,
    /// Remember the repository so it is never queried again, then continue.
    SkipPermanently,
    /// Log and move on to the next repository.
    Continue,
}

impl FailureClass {
    /// Classifies an error raised while fetching or normalising a page.
    #[must_use]
    pub const fn of(error: &IntakeError) -> Self {
        match error {
            IntakeError::RateLimitExceeded { .. } => Self::Fatal,
            IntakeError::RepositoryUnavailable { .. } => Self::SkipPermanently,
            _ => Self::Continue,
        }
    }
}
