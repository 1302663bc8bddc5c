//! Actions on reclaimable segments.
//!
//! The executor is the only component with side effects. It writes
//! describe/list lines to an output sink and removes files through a
//! [`SegmentRemover`], so tests can observe both without touching stdout
//! or real permissions.
//!
//! A failed removal never stops the run: both files of a segment are
//! always attempted and each failure is returned to the caller.

use crate::codec::{self, FileKind, Offset, Partition};
use crate::error::{ActionError, RetentionResult};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// One segment: a (topic directory, partition, start offset) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentId {
    /// Topic directory containing both files.
    pub dir: PathBuf,
    /// Partition.
    pub partition: Partition,
    /// Start offset.
    pub offset: Offset,
}

impl SegmentId {
    /// Creates a segment identifier.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, partition: Partition, offset: Offset) -> Self {
        Self {
            dir: dir.into(),
            partition,
            offset,
        }
    }

    /// File name of one file of the pair.
    #[must_use]
    pub fn file_name(&self, kind: FileKind) -> String {
        codec::format_file_name(&self.partition, &self.offset, kind)
    }

    /// Full path of one file of the pair.
    #[must_use]
    pub fn path(&self, kind: FileKind) -> PathBuf {
        self.dir.join(self.file_name(kind))
    }

    /// Full path of the index file.
    #[must_use]
    pub fn index_path(&self) -> PathBuf {
        self.path(FileKind::Index)
    }

    /// Full path of the records file.
    #[must_use]
    pub fn records_path(&self) -> PathBuf {
        self.path(FileKind::Records)
    }

    /// Topic name: the base name of the directory.
    #[must_use]
    pub fn topic(&self) -> String {
        self.dir.file_name().map_or_else(
            || self.dir.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        )
    }
}

/// What to do with each reclaimable segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionMode {
    /// Print a one-line description.
    #[default]
    Describe,
    /// Print both file paths.
    List,
    /// Remove both files.
    Delete,
    /// Print both file paths, then remove them.
    ListAndDelete,
}

impl ActionMode {
    /// Maps the `--list` / `--delete` flags to a mode.
    #[must_use]
    pub const fn from_flags(list: bool, delete: bool) -> Self {
        match (list, delete) {
            (false, false) => Self::Describe,
            (true, false) => Self::List,
            (false, true) => Self::Delete,
            (true, true) => Self::ListAndDelete,
        }
    }

    /// Whether file paths are printed.
    #[must_use]
    pub const fn lists(self) -> bool {
        matches!(self, Self::List | Self::ListAndDelete)
    }

    /// Whether files are removed.
    #[must_use]
    pub const fn deletes(self) -> bool {
        matches!(self, Self::Delete | Self::ListAndDelete)
    }
}

/// Removes a single file.
pub trait SegmentRemover {
    /// Removes the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns the I/O error from the underlying removal.
    fn remove(&mut self, path: &Path) -> io::Result<()>;
}

/// Removes files with [`std::fs::remove_file`].
#[derive(Debug, Clone, Copy, Default)]
pub struct FsRemover;

impl SegmentRemover for FsRemover {
    fn remove(&mut self, path: &Path) -> io::Result<()> {
        fs::remove_file(path)
    }
}

/// Result of acting on one segment.
#[derive(Debug, Default)]
pub struct SegmentOutcome {
    /// Files that were removed, in removal order.
    pub removed: Vec<FileKind>,
    /// Files that could not be removed.
    pub failures: Vec<ActionError>,
}

impl SegmentOutcome {
    /// True when both files were removed.
    #[must_use]
    pub fn is_deleted(&self) -> bool {
        self.removed.len() == 2
    }
}

/// Applies an [`ActionMode`] to segments.
#[derive(Debug)]
pub struct Executor<W, R = FsRemover> {
    out: W,
    remover: R,
    mode: ActionMode,
}

impl<W: Write> Executor<W, FsRemover> {
    /// Creates an executor that removes real files.
    pub fn new(out: W, mode: ActionMode) -> Self {
        Self::with_remover(out, mode, FsRemover)
    }
}

impl<W: Write, R: SegmentRemover> Executor<W, R> {
    /// Creates an executor with a custom removal primitive.
    pub fn with_remover(out: W, mode: ActionMode, remover: R) -> Self {
        Self { out, remover, mode }
    }

    /// The configured mode.
    #[must_use]
    pub fn mode(&self) -> ActionMode {
        self.mode
    }

    /// Performs the configured action on one segment.
    ///
    /// # Errors
    ///
    /// Only a failure to write to the output sink is returned as an error;
    /// removal failures are reported in the outcome.
    pub fn apply(&mut self, segment: &SegmentId) -> RetentionResult<SegmentOutcome> {
        let mut outcome = SegmentOutcome::default();

        if !self.mode.lists() && !self.mode.deletes() {
            writeln!(
                self.out,
                "Topic {}, First offset {} - Index file: {} Records File: {}",
                segment.topic(),
                segment.offset,
                segment.file_name(FileKind::Index),
                segment.file_name(FileKind::Records),
            )?;
            return Ok(outcome);
        }

        if self.mode.lists() {
            writeln!(self.out, "{}", segment.index_path().display())?;
            writeln!(self.out, "{}", segment.records_path().display())?;
        }

        if self.mode.deletes() {
            for kind in [FileKind::Index, FileKind::Records] {
                let path = segment.path(kind);
                match self.remover.remove(&path) {
                    Ok(()) => {
                        tracing::debug!(path = %path.display(), "removed segment file");
                        outcome.removed.push(kind);
                    }
                    Err(source) => {
                        let err = ActionError::new(path, kind, source);
                        tracing::warn!(
                            topic = %segment.topic(),
                            partition = %segment.partition,
                            offset = %segment.offset,
                            error = %err,
                            "failed to remove segment file"
                        );
                        outcome.failures.push(err);
                    }
                }
            }
        }

        Ok(outcome)
    }

    /// Flushes the output sink.
    ///
    /// # Errors
    ///
    /// Returns the sink's I/O error.
    pub fn flush(&mut self) -> RetentionResult<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Consumes the executor, returning the sink and remover.
    pub fn into_parts(self) -> (W, R) {
        (self.out, self.remover)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ActionErrorKind;
    use std::fs::File;
    use tempfile::tempdir;

    fn segment(dir: &Path, offset: u64) -> SegmentId {
        SegmentId::new(
            dir,
            Partition::from_number(0).unwrap(),
            Offset::from_number(offset).unwrap(),
        )
    }

    fn output(exec: Executor<Vec<u8>, impl SegmentRemover>) -> String {
        String::from_utf8(exec.into_parts().0).unwrap()
    }

    /// Records every path it is asked to remove and fails on the first.
    #[derive(Default)]
    struct FailFirst {
        seen: Vec<PathBuf>,
    }

    impl SegmentRemover for FailFirst {
        fn remove(&mut self, path: &Path) -> io::Result<()> {
            self.seen.push(path.to_path_buf());
            if self.seen.len() == 1 {
                Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn mode_from_flags() {
        assert_eq!(ActionMode::from_flags(false, false), ActionMode::Describe);
        assert_eq!(ActionMode::from_flags(true, false), ActionMode::List);
        assert_eq!(ActionMode::from_flags(false, true), ActionMode::Delete);
        assert_eq!(ActionMode::from_flags(true, true), ActionMode::ListAndDelete);
    }

    #[test]
    fn describe_prints_topic_line() {
        let mut exec = Executor::new(Vec::new(), ActionMode::Describe);
        exec.apply(&segment(Path::new("/backup/topicA"), 10)).unwrap();

        assert_eq!(
            output(exec),
            "Topic topicA, First offset 0000000010 - Index file: \
             segment_partition_000_from_offset_0000000010_index Records File: \
             segment_partition_000_from_offset_0000000010_records\n"
        );
    }

    #[test]
    fn list_prints_index_then_records() {
        let dir = Path::new("/backup/topicA");
        let seg = segment(dir, 0);
        let mut exec = Executor::new(Vec::new(), ActionMode::List);
        exec.apply(&seg).unwrap();

        let expected = format!(
            "{}\n{}\n",
            seg.index_path().display(),
            seg.records_path().display()
        );
        assert_eq!(output(exec), expected);
    }

    #[test]
    fn delete_removes_both_files_silently() {
        let temp = tempdir().unwrap();
        let seg = segment(temp.path(), 0);
        File::create(seg.index_path()).unwrap();
        File::create(seg.records_path()).unwrap();

        let mut exec = Executor::new(Vec::new(), ActionMode::Delete);
        let outcome = exec.apply(&seg).unwrap();

        assert!(outcome.is_deleted());
        assert!(outcome.failures.is_empty());
        assert!(!seg.index_path().exists());
        assert!(!seg.records_path().exists());
        assert!(output(exec).is_empty());
    }

    #[test]
    fn missing_index_is_reported_and_records_still_removed() {
        let temp = tempdir().unwrap();
        let seg = segment(temp.path(), 0);
        File::create(seg.records_path()).unwrap();

        let mut exec = Executor::new(Vec::new(), ActionMode::Delete);
        let outcome = exec.apply(&seg).unwrap();

        assert_eq!(outcome.removed, [FileKind::Records]);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].file, FileKind::Index);
        assert_eq!(outcome.failures[0].kind, ActionErrorKind::Missing);
        assert!(!seg.records_path().exists());
    }

    #[test]
    fn second_file_attempted_after_first_fails() {
        let seg = segment(Path::new("/backup/t"), 0);
        let mut exec =
            Executor::with_remover(Vec::new(), ActionMode::ListAndDelete, FailFirst::default());
        let outcome = exec.apply(&seg).unwrap();

        assert_eq!(outcome.removed, [FileKind::Records]);
        assert_eq!(outcome.failures[0].kind, ActionErrorKind::Io);

        let (out, remover) = exec.into_parts();
        assert_eq!(remover.seen, [seg.index_path(), seg.records_path()]);
        assert_eq!(String::from_utf8(out).unwrap().lines().count(), 2);
    }

    #[test]
    fn topic_is_directory_base_name() {
        let seg = segment(Path::new("/a/b/orders"), 0);
        assert_eq!(seg.topic(), "orders");
    }
}
