//! Labels whose pull requests do not count towards line totals.

use std::collections::BTreeSet;

/// Label skipped when none are configured.
pub const DEFAULT_SKIP_LABEL: &str = "release";

/// Case-insensitive set of labels that zero a pull request's line counts.
///
/// # Example
///
/// ```
/// use prtally::collector::SkipLabels;
///
/// let labels = SkipLabels::new(["Release"]);
/// assert!(labels.matches_any(&["RELEASE".to_owned()]));
/// assert!(!labels.matches_any(&["release-notes".to_owned()]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipLabels(BTreeSet<String>);

impl SkipLabels {
    /// Builds the set, lower-casing each label and dropping blanks.
    #[must_use]
    pub fn new<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            labels
                .into_iter()
                .map(|label| label.as_ref().trim().to_lowercase())
                .filter(|label| !label.is_empty())
                .collect(),
        )
    }

    /// A set that matches nothing.
    #[must_use]
    pub const fn none() -> Self {
        Self(BTreeSet::new())
    }

    /// Returns true when any of `labels` is in the set.
    #[must_use]
    pub fn matches_any(&self, labels: &[String]) -> bool {
        labels
            .iter()
            .any(|label| self.0.contains(&label.to_lowercase()))
    }

    /// Returns true when the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SkipLabels {
    fn default() -> Self {
        Self::new([DEFAULT_SKIP_LABEL])
    }
}
