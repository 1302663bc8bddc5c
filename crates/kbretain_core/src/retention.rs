//! The retention pipeline: scan, select, act.
//!
//! Each (directory, partition) group is selected and acted on
//! independently; no state is shared between groups. Segment failures are
//! collected into the [`RunSummary`] and the run continues.

use crate::codec::{FileKind, Offset, Partition};
use crate::config::RetentionConfig;
use crate::error::{ActionError, ActionErrorKind, RetentionResult, WalkError};
use crate::executor::{ActionMode, Executor, FsRemover, SegmentId, SegmentRemover};
use crate::scanner;
use crate::selector;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// A reclaimable segment as reported in a [`RunSummary`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SegmentRecord {
    /// Topic name (directory base name).
    pub topic: String,
    /// Topic directory.
    pub dir: PathBuf,
    /// Partition.
    pub partition: Partition,
    /// Start offset.
    pub offset: Offset,
    /// Index file path.
    pub index_path: PathBuf,
    /// Records file path.
    pub records_path: PathBuf,
}

impl From<&SegmentId> for SegmentRecord {
    fn from(segment: &SegmentId) -> Self {
        Self {
            topic: segment.topic(),
            dir: segment.dir.clone(),
            partition: segment.partition.clone(),
            offset: segment.offset.clone(),
            index_path: segment.index_path(),
            records_path: segment.records_path(),
        }
    }
}

/// A file that could not be removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionFailure {
    /// Path of the file.
    pub path: PathBuf,
    /// Which file of the pair.
    pub file: FileKind,
    /// Missing or other I/O failure.
    pub kind: ActionErrorKind,
    /// Error message.
    pub message: String,
}

impl From<&ActionError> for ActionFailure {
    fn from(err: &ActionError) -> Self {
        Self {
            path: err.path.clone(),
            file: err.file,
            kind: err.kind,
            message: err.source.to_string(),
        }
    }
}

/// A directory skipped during the scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanFailure {
    /// The directory.
    pub dir: PathBuf,
    /// Error message.
    pub message: String,
}

impl From<&WalkError> for ScanFailure {
    fn from(err: &WalkError) -> Self {
        Self {
            dir: err.dir.clone(),
            message: err.source.to_string(),
        }
    }
}

/// What a retention run saw and did.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunSummary {
    /// Backup root.
    pub root: PathBuf,
    /// Keep count used.
    pub keep: usize,
    /// Action mode used.
    pub mode: ActionMode,
    /// Directories scanned below the root.
    pub topics_scanned: usize,
    /// (directory, partition) groups with at least one segment.
    pub groups: usize,
    /// Segments found.
    pub segments_seen: usize,
    /// Segments selected for the action.
    pub segments_reclaimable: usize,
    /// Segments protected by the keep count.
    pub segments_protected: usize,
    /// Segments whose two files were both removed.
    pub segments_deleted: usize,
    /// The reclaimable segments, in processing order.
    pub segments: Vec<SegmentRecord>,
    /// Files that could not be removed.
    pub action_failures: Vec<ActionFailure>,
    /// Directories skipped during the scan.
    pub scan_failures: Vec<ScanFailure>,
    /// Index files with no records file.
    pub orphans: Vec<PathBuf>,
}

impl RunSummary {
    /// True if any directory or file failed.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.action_failures.is_empty() || !self.scan_failures.is_empty()
    }
}

/// Runs retention against the real filesystem, writing output to `out`.
///
/// # Errors
///
/// See [`run_with_remover`].
pub fn run<W: Write>(config: &RetentionConfig, out: W) -> RetentionResult<RunSummary> {
    run_with_remover(config, out, FsRemover)
}

/// Runs retention with a custom removal primitive.
///
/// # Errors
///
/// Returns an error if:
/// - the configuration is invalid (root missing or not a directory)
/// - the scan fails (root unreadable, or any directory under
///   [`ScanPolicy::FailFast`](crate::ScanPolicy::FailFast))
/// - writing to `out` fails
pub fn run_with_remover<W: Write, R: SegmentRemover>(
    config: &RetentionConfig,
    out: W,
    remover: R,
) -> RetentionResult<RunSummary> {
    config.validate()?;

    tracing::info!(
        root = %config.root.display(),
        keep = config.keep.get(),
        mode = ?config.action,
        "starting retention run"
    );

    let report = scanner::scan(&config.root, config.scan_policy)?;
    let mut executor = Executor::with_remover(out, config.action, remover);

    let mut summary = RunSummary {
        root: config.root.clone(),
        keep: config.keep.get(),
        mode: config.action,
        topics_scanned: report.catalog.topic_count(),
        scan_failures: report.failures.iter().map(ScanFailure::from).collect(),
        orphans: report.orphans.iter().map(|o| o.path()).collect(),
        ..RunSummary::default()
    };

    for (dir, partition, offsets) in report.catalog.groups() {
        let (reclaimable, protected) = selector::split(offsets, config.keep);

        summary.groups += 1;
        summary.segments_seen += offsets.len();
        summary.segments_protected += protected.len();
        summary.segments_reclaimable += reclaimable.len();

        for offset in reclaimable {
            let segment = SegmentId::new(dir, partition.clone(), offset.clone());
            let outcome = executor.apply(&segment)?;

            if outcome.is_deleted() {
                summary.segments_deleted += 1;
            }
            summary
                .action_failures
                .extend(outcome.failures.iter().map(ActionFailure::from));
            summary.segments.push(SegmentRecord::from(&segment));
        }
    }

    executor.flush()?;

    tracing::info!(
        topics = summary.topics_scanned,
        segments = summary.segments_seen,
        reclaimable = summary.segments_reclaimable,
        deleted = summary.segments_deleted,
        failures = summary.action_failures.len() + summary.scan_failures.len(),
        "retention run complete"
    );

    Ok(summary)
}
