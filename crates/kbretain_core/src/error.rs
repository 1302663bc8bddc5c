//! Error types for retention runs.

use crate::codec::FileKind;
use std::fmt;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for retention operations.
pub type RetentionResult<T> = Result<T, RetentionError>;

/// Errors that terminate a retention run.
///
/// Per-segment failures during the action phase are not represented here;
/// they are collected as [`ActionError`]s and the run continues.
#[derive(Debug, Error)]
pub enum RetentionError {
    /// The keep count was below 1.
    #[error("invalid keep count {value}: cannot be less than 1")]
    InvalidKeep {
        /// The rejected value.
        value: usize,
    },

    /// The keep count could not be parsed as an integer.
    #[error("invalid keep count {input:?}: not a positive integer")]
    UnparsableKeep {
        /// The rejected input.
        input: String,
    },

    /// The backup root does not exist.
    #[error("backup directory does not exist: {}", .path.display())]
    RootNotFound {
        /// The configured root.
        path: PathBuf,
    },

    /// The backup root exists but is not a directory.
    #[error("backup path is not a directory: {}", .path.display())]
    NotADirectory {
        /// The configured root.
        path: PathBuf,
    },

    /// A directory could not be read while scanning.
    #[error("failed to read directory {}: {source}", .dir.display())]
    Scan {
        /// The directory that failed.
        dir: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A partition string was not exactly three digits.
    #[error("invalid partition {0:?}: expected 3 digits")]
    InvalidPartition(String),

    /// An offset string was not exactly ten digits.
    #[error("invalid offset {0:?}: expected 10 digits")]
    InvalidOffset(String),

    /// Writing to the output sink failed.
    #[error("output error: {0}")]
    Output(#[from] io::Error),
}

impl RetentionError {
    /// Returns true for errors raised before any scanning takes place.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::InvalidKeep { .. }
                | Self::UnparsableKeep { .. }
                | Self::RootNotFound { .. }
                | Self::NotADirectory { .. }
        )
    }
}

/// Classification of a failed file action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionErrorKind {
    /// The file was already gone.
    Missing,
    /// Any other I/O failure (permissions, busy, ...).
    Io,
}

impl fmt::Display for ActionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("missing"),
            Self::Io => f.write_str("I/O error"),
        }
    }
}

/// A single file of a segment could not be acted upon.
#[derive(Debug, Error)]
#[error("cannot remove {file} file {}: {source}", .path.display())]
pub struct ActionError {
    /// Path of the file.
    pub path: PathBuf,
    /// Which file of the pair failed.
    pub file: FileKind,
    /// Missing or other I/O failure.
    pub kind: ActionErrorKind,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl ActionError {
    /// Wraps an I/O error for `path`, classifying `NotFound` as missing.
    #[must_use]
    pub fn new(path: PathBuf, file: FileKind, source: io::Error) -> Self {
        let kind = if source.kind() == io::ErrorKind::NotFound {
            ActionErrorKind::Missing
        } else {
            ActionErrorKind::Io
        };
        Self {
            path,
            file,
            kind,
            source,
        }
    }
}

/// A directory could not be listed during the tree walk.
#[derive(Debug, Error)]
#[error("cannot read directory {}: {source}", .dir.display())]
pub struct WalkError {
    /// The directory that failed.
    pub dir: PathBuf,
    /// The underlying I/O error.
    #[source]
    pub source: io::Error,
}

impl From<WalkError> for RetentionError {
    fn from(err: WalkError) -> Self {
        Self::Scan {
            dir: err.dir,
            source: err.source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_is_classified_missing() {
        let err = ActionError::new(
            PathBuf::from("/tmp/x"),
            FileKind::Index,
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert_eq!(err.kind, ActionErrorKind::Missing);
        assert!(err.to_string().starts_with("cannot remove index file"));
    }

    #[test]
    fn permission_denied_is_classified_io() {
        let err = ActionError::new(
            PathBuf::from("/tmp/x"),
            FileKind::Records,
            io::Error::new(io::ErrorKind::PermissionDenied, "nope"),
        );
        assert_eq!(err.kind, ActionErrorKind::Io);
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(RetentionError::InvalidKeep { value: 0 }.is_configuration());
        assert!(RetentionError::RootNotFound {
            path: PathBuf::from("x")
        }
        .is_configuration());
        assert!(!RetentionError::InvalidOffset("1".into()).is_configuration());
    }
}
