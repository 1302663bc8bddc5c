//! # kbretain core
//!
//! Segment discovery and retention for kafka-backup directories.
//!
//! A kafka-backup `target.dir` holds one directory per topic. Each
//! directory accumulates segment file pairs named by partition and start
//! offset, and nothing ever removes old ones. This crate finds them,
//! orders them per partition, and reclaims all but the newest K.
//!
//! ## Pipeline
//!
//! - [`scanner`] walks the tree and builds a [`SegmentCatalog`]
//! - [`selector`] splits each partition's offsets into reclaimable and
//!   protected
//! - [`executor`] describes, lists, or deletes the reclaimable segments
//! - [`retention::run`] ties them together and returns a [`RunSummary`]
//!
//! ## Example
//!
//! ```rust,no_run
//! use kbretain_core::{ActionMode, Keep, RetentionConfig};
//!
//! let config = RetentionConfig::new("/var/backup/kafka")
//!     .keep(Keep::new(2).unwrap())
//!     .action(ActionMode::List);
//! let summary = kbretain_core::run(&config, std::io::stdout()).unwrap();
//! println!("{} reclaimable", summary.segments_reclaimable);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod codec;
pub mod config;
mod error;
pub mod executor;
pub mod retention;
pub mod scanner;
pub mod selector;
pub mod walk;

pub use codec::{FileKind, Offset, Partition, SegmentName};
pub use config::RetentionConfig;
pub use error::{ActionError, ActionErrorKind, RetentionError, RetentionResult, WalkError};
pub use executor::{ActionMode, Executor, FsRemover, SegmentId, SegmentOutcome, SegmentRemover};
pub use retention::{run, run_with_remover, ActionFailure, RunSummary, ScanFailure, SegmentRecord};
pub use scanner::{scan, OrphanIndex, ScanPolicy, ScanReport, SegmentCatalog};
pub use selector::Keep;
