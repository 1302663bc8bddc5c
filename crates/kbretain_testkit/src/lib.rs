//! # kbretain testkit
//!
//! Test utilities for kbretain.
//!
//! This crate provides:
//! - [`BackupTree`], a temporary kafka-backup directory builder
//! - Property-based generators for partitions, offsets and trees
//! - Cross-module retention scenarios
//!
//! ## Usage
//!
//! ```rust,ignore
//! use kbretain_testkit::prelude::*;
//!
//! let tree = BackupTree::new();
//! tree.segments("topicA", 0, &[0, 10, 20]);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod integration;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::integration::*;
}

pub use fixtures::*;
pub use generators::*;
pub use integration::*;
