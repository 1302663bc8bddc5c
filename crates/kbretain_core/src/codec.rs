//! Segment file naming.
//!
//! kafka-backup writes every segment as two files in its topic directory:
//!
//! ```text
//! segment_partition_<ppp>_from_offset_<oooooooooo>_index
//! segment_partition_<ppp>_from_offset_<oooooooooo>_records
//! ```
//!
//! The partition is three zero-padded digits and the start offset is ten.
//! Because both widths are fixed, lexicographic order on the strings is
//! numeric order, and the newtypes below derive `Ord` from the string.
//!
//! Only the records file marks a segment as present. An index file whose
//! records file is missing is invisible to [`match_records`].

use crate::error::{RetentionError, RetentionResult};
use serde::Serialize;
use std::fmt;

const PREFIX: &str = "segment_partition_";
const OFFSET_INFIX: &str = "_from_offset_";

/// Number of digits in a partition field.
pub const PARTITION_WIDTH: usize = 3;
/// Number of digits in an offset field.
pub const OFFSET_WIDTH: usize = 10;

const MAX_OFFSET: u64 = 9_999_999_999;

/// A zero-padded three-digit partition identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Partition(String);

impl Partition {
    /// Parses an already padded partition string.
    pub fn parse(s: &str) -> RetentionResult<Self> {
        if is_digits(s, PARTITION_WIDTH) {
            Ok(Self(s.to_string()))
        } else {
            Err(RetentionError::InvalidPartition(s.to_string()))
        }
    }

    /// Builds a partition from its number, padding to three digits.
    pub fn from_number(n: u16) -> RetentionResult<Self> {
        if n > 999 {
            return Err(RetentionError::InvalidPartition(n.to_string()));
        }
        Ok(Self(format!("{n:03}")))
    }

    /// Returns the padded string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A zero-padded ten-digit segment start offset.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Offset(String);

impl Offset {
    /// Parses an already padded offset string.
    pub fn parse(s: &str) -> RetentionResult<Self> {
        if is_digits(s, OFFSET_WIDTH) {
            Ok(Self(s.to_string()))
        } else {
            Err(RetentionError::InvalidOffset(s.to_string()))
        }
    }

    /// Builds an offset from its number, padding to ten digits.
    pub fn from_number(n: u64) -> RetentionResult<Self> {
        if n > MAX_OFFSET {
            return Err(RetentionError::InvalidOffset(n.to_string()));
        }
        Ok(Self(format!("{n:010}")))
    }

    /// Returns the padded string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Offset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Which file of a segment pair a name refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    /// The `_index` file.
    Index,
    /// The `_records` file.
    Records,
}

impl FileKind {
    /// The trailing token used in file names.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Index => "index",
            Self::Records => "records",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

/// A parsed segment file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentName {
    /// Partition field.
    pub partition: Partition,
    /// Start offset field.
    pub offset: Offset,
    /// Trailing kind token.
    pub kind: FileKind,
}

/// Builds the file name for one file of a segment.
#[must_use]
pub fn format_file_name(partition: &Partition, offset: &Offset, kind: FileKind) -> String {
    format!(
        "{PREFIX}{}{OFFSET_INFIX}{}_{}",
        partition.as_str(),
        offset.as_str(),
        kind.token()
    )
}

/// Parses a segment file name of either kind.
///
/// The whole name must match; anything before, after, or in between the
/// fields is rejected.
#[must_use]
pub fn parse_file_name(name: &str) -> Option<SegmentName> {
    let rest = name.strip_prefix(PREFIX)?;
    let (partition, rest) = split_digits(rest, PARTITION_WIDTH)?;
    let rest = rest.strip_prefix(OFFSET_INFIX)?;
    let (offset, rest) = split_digits(rest, OFFSET_WIDTH)?;
    let kind = match rest.strip_prefix('_')? {
        "index" => FileKind::Index,
        "records" => FileKind::Records,
        _ => return None,
    };
    Some(SegmentName {
        partition: Partition(partition.to_string()),
        offset: Offset(offset.to_string()),
        kind,
    })
}

/// Recognizes a records file name and returns its partition and offset.
///
/// Index file names yield `None`: the records file is the sole marker of a
/// segment.
#[must_use]
pub fn match_records(name: &str) -> Option<(Partition, Offset)> {
    match parse_file_name(name)? {
        SegmentName {
            partition,
            offset,
            kind: FileKind::Records,
        } => Some((partition, offset)),
        _ => None,
    }
}

fn is_digits(s: &str, width: usize) -> bool {
    s.len() == width && s.bytes().all(|b| b.is_ascii_digit())
}

/// Splits `width` leading ASCII digits off `s`.
fn split_digits(s: &str, width: usize) -> Option<(&str, &str)> {
    let head = s.as_bytes().get(..width)?;
    if !head.iter().all(u8::is_ascii_digit) {
        return None;
    }
    // The first `width` bytes are ASCII, so this is a char boundary.
    Some(s.split_at(width))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn p(s: &str) -> Partition {
        Partition::parse(s).unwrap()
    }

    fn o(s: &str) -> Offset {
        Offset::parse(s).unwrap()
    }

    #[test]
    fn format_matches_backup_naming() {
        assert_eq!(
            format_file_name(&p("000"), &o("0000000010"), FileKind::Index),
            "segment_partition_000_from_offset_0000000010_index"
        );
        assert_eq!(
            format_file_name(&p("012"), &o("0000004711"), FileKind::Records),
            "segment_partition_012_from_offset_0000004711_records"
        );
    }

    #[test]
    fn match_records_extracts_fields() {
        let got = match_records("segment_partition_001_from_offset_0000000391_records");
        assert_eq!(got, Some((p("001"), o("0000000391"))));
    }

    #[test]
    fn match_records_ignores_index_files() {
        assert!(match_records("segment_partition_001_from_offset_0000000391_index").is_none());
        let parsed = parse_file_name("segment_partition_001_from_offset_0000000391_index").unwrap();
        assert_eq!(parsed.kind, FileKind::Index);
    }

    #[test]
    fn near_misses_are_rejected() {
        let bad = [
            "",
            "segment_partition_000_from_offset_0000000000_records.bak",
            "xsegment_partition_000_from_offset_0000000000_records",
            "segment_partition_00_from_offset_0000000000_records",
            "segment_partition_0000_from_offset_0000000000_records",
            "segment_partition_000_from_offset_000000000_records",
            "segment_partition_000_from_offset_00000000000_records",
            "segment_partition_000_from_offset_0000000000_record",
            "segment_partition_000_from_offset_0000000000_recordss",
            "segment_partition_000_from_offset_0000000000records",
            "segment_partition_00a_from_offset_0000000000_records",
            "segment_partition_000_from_offset_00000000x0_records",
            "segment_partition_000_from_Offset_0000000000_records",
            "segment_partition_000_from_offset_0000000000_",
            "segment_partition_٠٠٠_from_offset_0000000000_records",
        ];
        for name in bad {
            assert!(parse_file_name(name).is_none(), "accepted {name:?}");
        }
    }

    #[test]
    fn padding_constructors() {
        assert_eq!(Partition::from_number(7).unwrap().as_str(), "007");
        assert_eq!(Offset::from_number(42).unwrap().as_str(), "0000000042");
        assert!(Partition::from_number(1000).is_err());
        assert!(Offset::from_number(10_000_000_000).is_err());
        assert!(Partition::parse("7").is_err());
        assert!(Offset::parse("42").is_err());
    }

    #[test]
    fn string_order_is_numeric_order() {
        let a = Offset::from_number(9).unwrap();
        let b = Offset::from_number(10).unwrap();
        assert!(a < b);
    }

    proptest! {
        #[test]
        fn records_name_round_trips(part in 0u16..=999, off in 0u64..=MAX_OFFSET) {
            let partition = Partition::from_number(part).unwrap();
            let offset = Offset::from_number(off).unwrap();
            let name = format_file_name(&partition, &offset, FileKind::Records);
            prop_assert_eq!(match_records(&name), Some((partition, offset)));
        }

        #[test]
        fn single_char_insertion_is_rejected(
            off in 0u64..=MAX_OFFSET,
            pos in 0usize..64,
            c in prop::sample::select(vec!['0', '_', 'x', 's']),
        ) {
            let offset = Offset::from_number(off).unwrap();
            let partition = Partition::from_number(0).unwrap();
            let mut name = format_file_name(&partition, &offset, FileKind::Records);
            let pos = pos % (name.len() + 1);
            name.insert(pos, c);
            prop_assert!(match_records(&name).is_none(), "accepted {}", name);
        }

        #[test]
        fn single_char_removal_is_rejected(off in 0u64..=MAX_OFFSET, pos in 0usize..64) {
            let offset = Offset::from_number(off).unwrap();
            let partition = Partition::from_number(5).unwrap();
            let mut name = format_file_name(&partition, &offset, FileKind::Records);
            let pos = pos % name.len();
            name.remove(pos);
            prop_assert!(match_records(&name).is_none(), "accepted {}", name);
        }
    }
}
