//! Segment discovery.
//!
//! The scanner walks a backup root and builds a [`SegmentCatalog`]: for
//! every directory below the root, the start offsets of its segments,
//! grouped by partition and in ascending order.
//!
//! ## Invariants
//!
//! - Every readable directory below the root appears in the catalog, even
//!   when it holds no segments
//! - Offsets within a partition are ascending because file names are
//!   sorted before matching
//! - Only records files admit a segment; all other names are ignored
//! - Scanning never modifies the filesystem

use crate::codec::{self, FileKind, Offset, Partition, SegmentName};
use crate::error::{RetentionError, RetentionResult, WalkError};
use crate::walk::{DirWalk, WalkEvent};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Offsets per partition within one topic directory.
pub type PartitionOffsets = BTreeMap<Partition, Vec<Offset>>;

/// How the scanner reacts to directories it cannot read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanPolicy {
    /// Record the failure and keep scanning the other directories.
    #[default]
    BestEffort,
    /// Abort the scan on the first unreadable directory.
    FailFast,
}

/// Segments discovered under a backup root.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SegmentCatalog {
    topics: BTreeMap<PathBuf, PartitionOffsets>,
}

impl SegmentCatalog {
    /// Returns the partitions of one topic directory.
    #[must_use]
    pub fn topic(&self, dir: &Path) -> Option<&PartitionOffsets> {
        self.topics.get(dir)
    }

    /// Iterates topic directories in path order.
    pub fn topics(&self) -> impl Iterator<Item = (&Path, &PartitionOffsets)> {
        self.topics.iter().map(|(dir, parts)| (dir.as_path(), parts))
    }

    /// Iterates every (directory, partition) group with its offsets.
    pub fn groups(&self) -> impl Iterator<Item = (&Path, &Partition, &[Offset])> {
        self.topics().flat_map(|(dir, parts)| {
            parts
                .iter()
                .map(move |(partition, offsets)| (dir, partition, offsets.as_slice()))
        })
    }

    /// Number of topic directories, including empty ones.
    #[must_use]
    pub fn topic_count(&self) -> usize {
        self.topics.len()
    }

    /// Number of segments across all groups.
    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.groups().map(|(_, _, offsets)| offsets.len()).sum()
    }

    fn contains(&self, dir: &Path, partition: &Partition, offset: &Offset) -> bool {
        self.topics
            .get(dir)
            .and_then(|parts| parts.get(partition))
            .is_some_and(|offsets| offsets.binary_search(offset).is_ok())
    }
}

/// An index file with no records file beside it.
///
/// Such files are never selected for any action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrphanIndex {
    /// Directory holding the file.
    pub dir: PathBuf,
    /// Partition field of the name.
    pub partition: Partition,
    /// Offset field of the name.
    pub offset: Offset,
}

impl OrphanIndex {
    /// Full path of the orphaned index file.
    #[must_use]
    pub fn path(&self) -> PathBuf {
        self.dir
            .join(codec::format_file_name(&self.partition, &self.offset, FileKind::Index))
    }
}

/// Everything a scan produced.
#[derive(Debug, Default)]
pub struct ScanReport {
    /// Discovered segments.
    pub catalog: SegmentCatalog,
    /// Directories that could not be read (best-effort scans only).
    pub failures: Vec<WalkError>,
    /// Index files without a records file.
    pub orphans: Vec<OrphanIndex>,
}

/// Scans the tree under `root`.
///
/// # Errors
///
/// Returns an error if:
/// - `root` does not exist or is not a directory
/// - `root` itself cannot be read
/// - any directory cannot be read and `policy` is [`ScanPolicy::FailFast`]
pub fn scan(root: &Path, policy: ScanPolicy) -> RetentionResult<ScanReport> {
    check_root(root)?;

    let mut report = ScanReport::default();
    let mut index_files: Vec<(PathBuf, Partition, Offset)> = Vec::new();

    for event in DirWalk::new(root) {
        match event {
            Ok(WalkEvent::Directory(dir)) => {
                report.catalog.topics.entry(dir).or_default();
            }
            Ok(WalkEvent::File { dir, name }) => match codec::parse_file_name(&name) {
                Some(SegmentName {
                    partition,
                    offset,
                    kind: FileKind::Records,
                }) => {
                    report
                        .catalog
                        .topics
                        .entry(dir)
                        .or_default()
                        .entry(partition)
                        .or_default()
                        .push(offset);
                }
                Some(SegmentName {
                    partition,
                    offset,
                    kind: FileKind::Index,
                }) => index_files.push((dir, partition, offset)),
                None => {}
            },
            Err(err) if err.dir == root || policy == ScanPolicy::FailFast => {
                return Err(err.into());
            }
            Err(err) => {
                tracing::warn!(
                    dir = %err.dir.display(),
                    error = %err.source,
                    "skipping unreadable directory"
                );
                report.failures.push(err);
            }
        }
    }

    report.orphans = index_files
        .into_iter()
        .filter(|(dir, partition, offset)| !report.catalog.contains(dir, partition, offset))
        .map(|(dir, partition, offset)| OrphanIndex {
            dir,
            partition,
            offset,
        })
        .collect();

    for (dir, parts) in report.catalog.topics() {
        tracing::debug!(
            dir = %dir.display(),
            partitions = parts.len(),
            segments = parts.values().map(Vec::len).sum::<usize>(),
            "scanned topic directory"
        );
    }

    Ok(report)
}

pub(crate) fn check_root(root: &Path) -> RetentionResult<()> {
    match fs::metadata(root) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(RetentionError::NotADirectory {
            path: root.to_path_buf(),
        }),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Err(RetentionError::RootNotFound {
            path: root.to_path_buf(),
        }),
        Err(source) => Err(RetentionError::Scan {
            dir: root.to_path_buf(),
            source,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    fn touch_segment(dir: &Path, partition: &str, offset: &str) {
        let p = Partition::parse(partition).unwrap();
        let o = Offset::parse(offset).unwrap();
        File::create(dir.join(codec::format_file_name(&p, &o, FileKind::Index))).unwrap();
        File::create(dir.join(codec::format_file_name(&p, &o, FileKind::Records))).unwrap();
    }

    fn offsets(catalog: &SegmentCatalog, dir: &Path, partition: &str) -> Vec<String> {
        catalog.topic(dir).unwrap()[&Partition::parse(partition).unwrap()]
            .iter()
            .map(|o| o.as_str().to_string())
            .collect()
    }

    #[test]
    fn groups_by_directory_and_partition() {
        let temp = tempdir().unwrap();
        let topic = temp.path().join("topicA");
        fs::create_dir(&topic).unwrap();
        touch_segment(&topic, "001", "0000000005");
        touch_segment(&topic, "000", "0000000020");
        touch_segment(&topic, "000", "0000000000");
        touch_segment(&topic, "000", "0000000010");

        let report = scan(temp.path(), ScanPolicy::BestEffort).unwrap();

        assert_eq!(
            offsets(&report.catalog, &topic, "000"),
            ["0000000000", "0000000010", "0000000020"]
        );
        assert_eq!(offsets(&report.catalog, &topic, "001"), ["0000000005"]);
        assert_eq!(report.catalog.segment_count(), 4);
        assert!(report.orphans.is_empty());
    }

    #[test]
    fn empty_directories_are_present() {
        let temp = tempdir().unwrap();
        let topic = temp.path().join("empty");
        fs::create_dir(&topic).unwrap();
        File::create(topic.join("README")).unwrap();

        let report = scan(temp.path(), ScanPolicy::BestEffort).unwrap();
        assert_eq!(report.catalog.topic_count(), 1);
        assert!(report.catalog.topic(&topic).unwrap().is_empty());
    }

    #[test]
    fn files_in_root_are_ignored() {
        let temp = tempdir().unwrap();
        touch_segment(temp.path(), "000", "0000000000");

        let report = scan(temp.path(), ScanPolicy::BestEffort).unwrap();
        assert_eq!(report.catalog.topic_count(), 0);
    }

    #[test]
    fn orphaned_index_is_reported_not_cataloged() {
        let temp = tempdir().unwrap();
        let topic = temp.path().join("t");
        fs::create_dir(&topic).unwrap();
        let name = "segment_partition_000_from_offset_0000000000_index";
        File::create(topic.join(name)).unwrap();

        let report = scan(temp.path(), ScanPolicy::BestEffort).unwrap();
        assert_eq!(report.catalog.segment_count(), 0);
        assert_eq!(report.orphans.len(), 1);
        assert_eq!(report.orphans[0].path(), topic.join(name));
    }

    #[test]
    fn missing_root_is_configuration_error() {
        let temp = tempdir().unwrap();
        let err = scan(&temp.path().join("missing"), ScanPolicy::BestEffort).unwrap_err();
        assert!(matches!(err, RetentionError::RootNotFound { .. }));
    }

    #[test]
    fn file_root_is_rejected() {
        let temp = tempdir().unwrap();
        let file = temp.path().join("file");
        File::create(&file).unwrap();
        let err = scan(&file, ScanPolicy::BestEffort).unwrap_err();
        assert!(matches!(err, RetentionError::NotADirectory { .. }));
    }

    #[test]
    fn scan_is_read_only() {
        let temp = tempdir().unwrap();
        let topic = temp.path().join("t");
        fs::create_dir(&topic).unwrap();
        touch_segment(&topic, "000", "0000000000");

        scan(temp.path(), ScanPolicy::BestEffort).unwrap();
        assert_eq!(fs::read_dir(&topic).unwrap().count(), 2);
    }
}
