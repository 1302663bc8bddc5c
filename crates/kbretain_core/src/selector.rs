//! Retention selection.
//!
//! Given the ascending offsets of one (directory, partition) group and a
//! keep count K, the newest K segments are protected and everything before
//! them is reclaimable. The newest segment may still be open for writing,
//! which is why K is at least 1.

use crate::codec::Offset;
use crate::error::{RetentionError, RetentionResult};
use std::fmt;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// Number of most recent segments to protect per partition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Keep(NonZeroUsize);

impl Keep {
    /// Protects only the newest segment.
    pub const ONE: Keep = Keep(NonZeroUsize::MIN);

    /// Validates a keep count.
    ///
    /// # Errors
    ///
    /// Returns [`RetentionError::InvalidKeep`] if `n` is 0.
    pub fn new(n: usize) -> RetentionResult<Self> {
        NonZeroUsize::new(n)
            .map(Self)
            .ok_or(RetentionError::InvalidKeep { value: n })
    }

    /// Returns the count.
    #[must_use]
    pub const fn get(self) -> usize {
        self.0.get()
    }
}

impl Default for Keep {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Keep {
    type Err = RetentionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: usize = s.trim().parse().map_err(|_| RetentionError::UnparsableKeep {
            input: s.to_string(),
        })?;
        Self::new(n)
    }
}

/// Returns the reclaimable prefix: all offsets except the last `keep`.
#[must_use]
pub fn reclaimable(offsets: &[Offset], keep: Keep) -> &[Offset] {
    split(offsets, keep).0
}

/// Splits offsets into (reclaimable, protected).
///
/// The input order is trusted and preserved.
#[must_use]
pub fn split(offsets: &[Offset], keep: Keep) -> (&[Offset], &[Offset]) {
    offsets.split_at(offsets.len().saturating_sub(keep.get()))
}
