//! Step argument types for the leaderboard BDD tests.

use std::fmt;
use std::str::FromStr;

/// Number of search requests the mock server saw for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SearchCount(usize);

impl SearchCount {
    pub(crate) const fn value(self) -> usize {
        self.0
    }
}

impl FromStr for SearchCount {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<usize>().map(Self)
    }
}

impl fmt::Display for SearchCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Comma-separated `owner/name` list handed to a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RepositoryList(Vec<String>);

impl RepositoryList {
    pub(crate) fn names(&self) -> &[String] {
        &self.0
    }
}

impl FromStr for RepositoryList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let names: Vec<String> = s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(ToOwned::to_owned)
            .collect();
        if names.is_empty() {
            return Err("RepositoryList must name at least one repository".to_owned());
        }
        Ok(Self(names))
    }
}
