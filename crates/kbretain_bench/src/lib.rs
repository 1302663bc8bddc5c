//! Benchmark utilities.

use kbretain_core::{FileKind, Offset, Partition, SegmentId};
use std::fs;
use tempfile::TempDir;

/// Creates a backup root with `topics` directories, each holding
/// `partitions` partitions of `segments` segments (empty files).
pub fn generate_tree(topics: usize, partitions: u16, segments: u64) -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    for t in 0..topics {
        let dir = temp.path().join(format!("topic-{t:04}"));
        fs::create_dir(&dir).expect("Failed to create topic directory");
        for p in 0..partitions {
            let partition = Partition::from_number(p).expect("partition out of range");
            for s in 0..segments {
                let offset = Offset::from_number(s * 1000).expect("offset out of range");
                let id = SegmentId::new(&dir, partition.clone(), offset);
                fs::write(id.path(FileKind::Index), b"").expect("Failed to write index");
                fs::write(id.path(FileKind::Records), b"").expect("Failed to write records");
            }
        }
    }
    temp
}

/// Generates `count` ascending offsets.
pub fn generate_offsets(count: u64) -> Vec<Offset> {
    (0..count)
        .map(|i| Offset::from_number(i * 100).expect("offset out of range"))
        .collect()
}
