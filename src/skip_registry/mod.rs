//! Persisted list of repositories that must not be queried again.
//!
//! A repository lands here when GitHub reports it as missing or forbidden.
//! The list is stored as `{"skipped_repositories": [...]}` and rewritten in
//! full every time an entry is added, so an interrupted run keeps everything
//! recorded so far. Entries are never removed by the program.

mod error;


use std::io::ErrorKind;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use error::SkipRegistryError;

/// Default file name of the persisted skip list.
pub const DEFAULT_SKIP_LIST: &str = "skipped_repositories.json";

#[derive(Debug, Default, Serialize, Deserialize)]
struct SkipDocument {
    #[serde(default)]
    skipped_repositories: Vec<String>,
}

/// Ordered set of permanently skipped repositories.
///
/// # Example
///
/// ```
/// use prtally::skip_registry::SkipRegistry;
///
/// let mut registry = SkipRegistry::in_memory();
/// assert_eq!(registry.record("octo/gone"), Ok(true));
/// assert_eq!(registry.record("octo/gone"), Ok(false));
/// assert!(registry.contains("octo/gone"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkipRegistry {
    path: Option<Utf8PathBuf>,
    entries: Vec<String>,
}

impl SkipRegistry {
    /// A registry that is never written to disk.
    #[must_use]
    pub const fn in_memory() -> Self {
        Self {
            path: None,
            entries: Vec::new(),
        }
    }

    /// Loads the registry stored at `path`.
    ///
    /// A missing file (or missing parent directory) yields an empty registry
    /// that will be created on the first [`record`](Self::record).
    ///
    /// # Errors
    ///
    /// Returns [`SkipRegistryError`] when the path has no file name, or the
    /// file exists but cannot be read or parsed.
    pub fn load(path: &Utf8Path) -> Result<Self, SkipRegistryError> {
        let (parent, file_name) = split_path(path)?;
        let read_error = |error: std::io::Error| SkipRegistryError::Read {
            path: path.to_owned(),
            message: error.to_string(),
        };

        let dir = match Dir::open_ambient_dir(parent, ambient_authority()) {
            Ok(dir) => dir,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::empty_at(path)),
            Err(error) => return Err(read_error(error)),
        };
        let content = match dir.read_to_string(file_name) {
            Ok(content) => content,
            Err(error) if error.kind() == ErrorKind::NotFound => return Ok(Self::empty_at(path)),
            Err(error) => return Err(read_error(error)),
        };

        let document: SkipDocument =
            serde_json::from_str(&content).map_err(|error| SkipRegistryError::Parse {
                path: path.to_owned(),
                message: error.to_string(),
            })?;

        let mut entries: Vec<String> = Vec::with_capacity(document.skipped_repositories.len());
        for entry in document.skipped_repositories {
            if !entries.contains(&entry) {
                entries.push(entry);
            }
        }
        debug!(path = %path, count = entries.len(), "loaded skip list");

        Ok(Self {
            path: Some(path.to_owned()),
            entries,
        })
    }

    fn empty_at(path: &Utf8Path) -> Self {
        Self {
            path: Some(path.to_owned()),
            entries: Vec::new(),
        }
    }

    /// Returns true if `repository` is permanently skipped.
    #[must_use]
    pub fn contains(&self, repository: &str) -> bool {
        self.entries.iter().any(|entry| entry == repository)
    }

    /// Adds `repository` and flushes the list, returning whether it was new.
    ///
    /// Entries already present are left alone and nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`SkipRegistryError::Write`] when the list cannot be persisted.
    /// The entry stays recorded in memory either way.
    pub fn record(&mut self, repository: &str) -> Result<bool, SkipRegistryError> {
        if self.contains(repository) {
            return Ok(false);
        }
        self.entries.push(repository.to_owned());
        self.flush()?;
        Ok(true)
    }

    /// Recorded repositories in insertion order.
    #[must_use]
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    /// Location of the persisted list, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8Path> {
        self.path.as_deref()
    }

    fn flush(&self) -> Result<(), SkipRegistryError> {
        let Some(path) = self.path.as_deref() else {
            return Ok(());
        };
        let (parent, file_name) = split_path(path)?;
        let write_error = |message: String| SkipRegistryError::Write {
            path: path.to_owned(),
            message,
        };

        Dir::create_ambient_dir_all(parent, ambient_authority())
            .map_err(|error| write_error(error.to_string()))?;
        let dir = Dir::open_ambient_dir(parent, ambient_authority())
            .map_err(|error| write_error(error.to_string()))?;

        let document = SkipDocument {
            skipped_repositories: self.entries.clone(),
        };
        let json = serde_json::to_string_pretty(&document)
            .map_err(|error| write_error(error.to_string()))?;
        dir.write(file_name, json)
            .map_err(|error| write_error(error.to_string()))
    }
}

/// Splits a skip list path into its directory and file name.
fn split_path(path: &Utf8Path) -> Result<(&Utf8Path, &str), SkipRegistryError> {
    let file_name = path
        .file_name()
        .ok_or_else(|| SkipRegistryError::InvalidPath {
            path: path.to_owned(),
        })?;
    let parent = path
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    Ok((parent, file_name))
}
