//! Property-based test generators using proptest.
//!
//! Provides strategies for generating partitions, offsets and whole
//! backup layouts that keep the fixed-width naming invariants.

use kbretain_core::{Keep, Offset, Partition};
use proptest::prelude::*;
use std::collections::BTreeMap;

/// Largest offset representable in ten digits.
pub const MAX_OFFSET: u64 = 9_999_999_999;

/// Strategy for generating valid partitions.
pub fn partition_strategy() -> impl Strategy<Value = Partition> {
    (0u16..=999).prop_map(|n| Partition::from_number(n).expect("in range"))
}

/// Strategy for generating valid offsets.
pub fn offset_strategy() -> impl Strategy<Value = Offset> {
    (0u64..=MAX_OFFSET).prop_map(|n| Offset::from_number(n).expect("in range"))
}

/// Strategy for ascending, distinct offset values of one partition.
pub fn offset_values_strategy(max_len: usize) -> impl Strategy<Value = Vec<u64>> {
    prop::collection::btree_set(0u64..=MAX_OFFSET, 0..=max_len)
        .prop_map(|set| set.into_iter().collect())
}

/// Strategy for keep counts.
pub fn keep_strategy(max: usize) -> impl Strategy<Value = Keep> {
    (1usize..=max.max(1)).prop_map(|n| Keep::new(n).expect("non-zero"))
}

/// A generated backup layout: topic name -> partition -> offset values.
pub type Layout = BTreeMap<String, BTreeMap<u16, Vec<u64>>>;

/// Strategy for small multi-topic, multi-partition layouts.
pub fn layout_strategy() -> impl Strategy<Value = Layout> {
    let topic = prop::string::string_regex("[a-z][a-z0-9_-]{0,11}").expect("Invalid regex");
    let partitions = prop::collection::btree_map(0u16..8, offset_values_strategy(8), 0..4);
    prop::collection::btree_map(topic, partitions, 1..4)
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn partitions_are_three_digits(p in partition_strategy()) {
            prop_assert_eq!(p.as_str().len(), 3);
        }

        #[test]
        fn offsets_are_ten_digits(o in offset_strategy()) {
            prop_assert_eq!(o.as_str().len(), 10);
        }

        #[test]
        fn offset_values_ascend(values in offset_values_strategy(20)) {
            prop_assert!(values.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
