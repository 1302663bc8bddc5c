//! Retention run configuration.

use crate::error::RetentionResult;
use crate::executor::ActionMode;
use crate::scanner::{self, ScanPolicy};
use crate::selector::Keep;
use std::path::{Path, PathBuf};

/// Configuration for one retention run.
#[derive(Debug, Clone)]
pub struct RetentionConfig {
    /// Backup root (kafka-backup `target.dir`).
    pub root: PathBuf,

    /// Segments to protect per partition.
    pub keep: Keep,

    /// Action applied to reclaimable segments.
    pub action: ActionMode,

    /// Reaction to unreadable directories.
    pub scan_policy: ScanPolicy,
}

impl RetentionConfig {
    /// Creates a configuration for `root` with default settings:
    /// keep one segment, describe only, best-effort scan.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            keep: Keep::default(),
            action: ActionMode::default(),
            scan_policy: ScanPolicy::default(),
        }
    }

    /// Sets the keep count.
    #[must_use]
    pub fn keep(mut self, keep: Keep) -> Self {
        self.keep = keep;
        self
    }

    /// Sets the action mode.
    #[must_use]
    pub fn action(mut self, action: ActionMode) -> Self {
        self.action = action;
        self
    }

    /// Sets the scan policy.
    #[must_use]
    pub fn scan_policy(mut self, policy: ScanPolicy) -> Self {
        self.scan_policy = policy;
        self
    }

    /// Returns the backup root.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Checks that the root exists and is a directory.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::RootNotFound`] or
    /// [`RetentionError::NotADirectory`].
    ///
    /// [`RetentionError::RootNotFound`]: crate::RetentionError::RootNotFound
    /// [`RetentionError::NotADirectory`]: crate::RetentionError::NotADirectory
    pub fn validate(&self) -> RetentionResult<()> {
        scanner::check_root(&self.root)
    }
}
