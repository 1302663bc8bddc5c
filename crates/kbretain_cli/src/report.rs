//! Human-readable reporting on stderr.

use kbretain_core::RunSummary;
use std::io::{self, Write};

/// Writes one line per failed file and skipped directory.
pub fn write_failures(summary: &RunSummary, w: &mut impl Write) -> io::Result<()> {
    for failure in &summary.scan_failures {
        writeln!(
            w,
            "skipped directory {}: {}",
            failure.dir.display(),
            failure.message
        )?;
    }
    for failure in &summary.action_failures {
        writeln!(
            w,
            "failed to remove {} file {} ({}): {}",
            failure.file,
            failure.path.display(),
            failure.kind,
            failure.message
        )?;
    }
    Ok(())
}

/// Writes one line per orphaned index file.
pub fn write_orphans(summary: &RunSummary, w: &mut impl Write) -> io::Result<()> {
    for path in &summary.orphans {
        writeln!(w, "orphaned index file: {}", path.display())?;
    }
    Ok(())
}

/// Writes the run totals.
pub fn write_summary(summary: &RunSummary, w: &mut impl Write) -> io::Result<()> {
    writeln!(w, "Retention summary for {}", summary.root.display())?;
    writeln!(w, "  Topic directories: {}", summary.topics_scanned)?;
    writeln!(w, "  Partitions:        {}", summary.groups)?;
    writeln!(w, "  Segments:          {}", summary.segments_seen)?;
    writeln!(
        w,
        "  Reclaimable:       {} (keeping {} per partition)",
        summary.segments_reclaimable, summary.keep
    )?;
    writeln!(w, "  Protected:         {}", summary.segments_protected)?;
    if summary.mode.deletes() {
        writeln!(w, "  Deleted:           {}", summary.segments_deleted)?;
    }
    if summary.has_failures() {
        writeln!(
            w,
            "  Failures:          {} files, {} directories",
            summary.action_failures.len(),
            summary.scan_failures.len()
        )?;
    }
    Ok(())
}
