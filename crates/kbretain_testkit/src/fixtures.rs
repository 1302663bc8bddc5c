//! Backup directory fixtures.
//!
//! Provides a temporary kafka-backup `target.dir` that tests populate with
//! topic directories and segment files.

use kbretain_core::{FileKind, Offset, Partition, SegmentId};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A temporary backup root with automatic cleanup.
pub struct BackupTree {
    temp_dir: TempDir,
}

impl BackupTree {
    /// Creates an empty backup root.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Returns the backup root.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Creates (if needed) and returns a topic directory.
    ///
    /// `name` may contain `/` to create nested directories.
    pub fn topic(&self, name: &str) -> PathBuf {
        let dir = self.root().join(name);
        fs::create_dir_all(&dir).expect("Failed to create topic directory");
        dir
    }

    /// Identifies a segment without creating any files.
    pub fn segment_id(&self, topic: &str, partition: u16, offset: u64) -> SegmentId {
        SegmentId::new(
            self.root().join(topic),
            Partition::from_number(partition).expect("partition out of range"),
            Offset::from_number(offset).expect("offset out of range"),
        )
    }

    /// Writes both files of a segment.
    pub fn segment(&self, topic: &str, partition: u16, offset: u64) -> SegmentId {
        self.topic(topic);
        let id = self.segment_id(topic, partition, offset);
        write_kind(&id, FileKind::Index);
        write_kind(&id, FileKind::Records);
        id
    }

    /// Writes several segments of one partition.
    pub fn segments(&self, topic: &str, partition: u16, offsets: &[u64]) -> Vec<SegmentId> {
        offsets
            .iter()
            .map(|&offset| self.segment(topic, partition, offset))
            .collect()
    }

    /// Writes only the records file of a segment.
    pub fn records_only(&self, topic: &str, partition: u16, offset: u64) -> SegmentId {
        self.topic(topic);
        let id = self.segment_id(topic, partition, offset);
        write_kind(&id, FileKind::Records);
        id
    }

    /// Writes only the index file of a segment.
    pub fn index_only(&self, topic: &str, partition: u16, offset: u64) -> SegmentId {
        self.topic(topic);
        let id = self.segment_id(topic, partition, offset);
        write_kind(&id, FileKind::Index);
        id
    }

    /// Writes an arbitrary file into a topic directory.
    pub fn file(&self, topic: &str, name: &str) -> PathBuf {
        let path = self.topic(topic).join(name);
        fs::write(&path, b"not a segment").expect("Failed to write file");
        path
    }

    /// Returns the sorted file names in a topic directory.
    pub fn file_names(&self, topic: &str) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(self.root().join(topic))
            .expect("Failed to read topic directory")
            .map(|entry| {
                entry
                    .expect("Failed to read entry")
                    .file_name()
                    .into_string()
                    .expect("non UTF-8 file name")
            })
            .collect();
        names.sort();
        names
    }

    /// True if both files of the segment exist.
    pub fn has_segment(&self, id: &SegmentId) -> bool {
        id.index_path().exists() && id.records_path().exists()
    }

    /// True if neither file of the segment exists.
    pub fn lacks_segment(&self, id: &SegmentId) -> bool {
        !id.index_path().exists() && !id.records_path().exists()
    }
}

impl Default for BackupTree {
    fn default() -> Self {
        Self::new()
    }
}

fn write_kind(id: &SegmentId, kind: FileKind) {
    let body = format!("{} {} {}", id.partition, id.offset, kind);
    fs::write(id.path(kind), body).expect("Failed to write segment file");
}
