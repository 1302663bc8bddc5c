//! Cross-module integration test helpers.
//!
//! Provides a reference model of retention selection and helpers that run
//! the full scan, select, act pipeline against a [`BackupTree`].

use crate::fixtures::BackupTree;
use crate::generators::Layout;
use kbretain_core::{Keep, RetentionConfig, RunSummary, SegmentId};

/// Writes every segment of `layout` into `tree`.
pub fn build_layout(tree: &BackupTree, layout: &Layout) -> Vec<SegmentId> {
    let mut written = Vec::new();
    for (topic, partitions) in layout {
        tree.topic(topic);
        for (&partition, offsets) in partitions {
            written.extend(tree.segments(topic, partition, offsets));
        }
    }
    written
}

/// Segments the model says are reclaimable, in processing order.
pub fn expected_reclaimable(tree: &BackupTree, layout: &Layout, keep: Keep) -> Vec<SegmentId> {
    let mut expected = Vec::new();
    for (topic, partitions) in layout {
        for (&partition, offsets) in partitions {
            let cut = offsets.len().saturating_sub(keep.get());
            expected.extend(
                offsets[..cut]
                    .iter()
                    .map(|&offset| tree.segment_id(topic, partition, offset)),
            );
        }
    }
    expected
}

/// Runs retention and captures its stdout output.
pub fn run_captured(config: &RetentionConfig) -> (RunSummary, String) {
    let mut out = Vec::new();
    let summary = kbretain_core::run(config, &mut out).expect("retention run failed");
    (summary, String::from_utf8(out).expect("output is not UTF-8"))
}

/// Ids of the segments a summary reported as reclaimable.
pub fn reported_segments(summary: &RunSummary) -> Vec<SegmentId> {
    summary
        .segments
        .iter()
        .map(|r| SegmentId::new(&r.dir, r.partition.clone(), r.offset.clone()))
        .collect()
}
