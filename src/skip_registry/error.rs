//! Errors raised while loading or persisting the skip registry.

use camino::Utf8PathBuf;
use thiserror::Error;

use crate::github::IntakeError;

/// Failures of the persisted skip list.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SkipRegistryError {
    /// The configured path has no file name component.
    #[error("skip list path '{path}' has no file name")]
    InvalidPath {
        /// Path as configured.
        path: Utf8PathBuf,
    },

    /// The skip list exists but could not be read.
    #[error("failed to read skip list '{path}': {message}")]
    Read {
        /// Skip list location.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        message: String,
    },

    /// The skip list is not the expected JSON document.
    #[error("failed to parse skip list '{path}': {message}")]
    Parse {
        /// Skip list location.
        path: Utf8PathBuf,
        /// Deserialisation error.
        message: String,
    },

    /// The skip list could not be written back.
    #[error("failed to write skip list '{path}': {message}")]
    Write {
        /// Skip list location.
        path: Utf8PathBuf,
        /// Underlying I/O or serialisation error.
        message: String,
    },
}

impl From<SkipRegistryError> for IntakeError {
    fn from(error: SkipRegistryError) -> Self {
        Self::Io {
            message: error.to_string(),
        }
    }
}
