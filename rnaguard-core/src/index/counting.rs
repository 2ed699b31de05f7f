//! Counting Bloom filter for 7-mer seed occurrences.
//!
//! Same double-hashing family as the bit-set filter, but over 8-bit
//! saturating counters. The minimum counter across the hash positions is a
//! conservative upper bound on how many times an item was inserted.

use crate::constants::{MAX_BLOOM_HASHES, MAX_COUNTING_SLOTS, MIN_BLOOM_HASHES};
use crate::index::bloom::{bloom_dimensions, hash_indices};

/// Counting Bloom filter over raw k-mer bytes.
#[derive(Debug, Clone)]
pub struct CountingBloomFilter {
    counters: Vec<u8>,
    slot_count: u64,
    hash_count: u32,
    inserted: u64,
}

impl CountingBloomFilter {
    /// Builds a filter sized for `expected_items` at `false_positive_rate`,
    /// with the slot count clamped to the 200 MiB counter ceiling.
    #[must_use]
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        let (slots, _) = bloom_dimensions(expected_items, false_positive_rate);
        let slot_count = slots.min(MAX_COUNTING_SLOTS);
        // Rederive the hash count from the clamped slot count so the two
        // stay consistent when the counter ceiling bites.
        let per_item = slot_count as f64 / expected_items.max(1) as f64;
        let hash_count = ((per_item * std::f64::consts::LN_2).ceil() as u32)
            .clamp(MIN_BLOOM_HASHES, MAX_BLOOM_HASHES);
        Self {
            counters: vec![0; slot_count as usize],
            slot_count,
            hash_count,
            inserted: 0,
        }
    }

    /// Estimated backing-store size in bytes for sizing checks before
    /// allocation.
    #[must_use]
    pub fn estimate_bytes(expected_items: usize, false_positive_rate: f64) -> usize {
        let (slots, _) = bloom_dimensions(expected_items, false_positive_rate);
        slots.min(MAX_COUNTING_SLOTS) as usize
    }

    /// Increments all hash positions, saturating at 255.
    pub fn add(&mut self, item: &[u8]) {
        for idx in hash_indices(item, self.hash_count, self.slot_count) {
            let slot = &mut self.counters[idx as usize];
            *slot = slot.saturating_add(1);
        }
        self.inserted += 1;
    }

    /// Minimum counter over the hash positions: an upper bound on the true
    /// insertion count, saturated at 255.
    #[must_use]
    pub fn count(&self, item: &[u8]) -> u32 {
        hash_indices(item, self.hash_count, self.slot_count)
            .map(|idx| u32::from(self.counters[idx as usize]))
            .min()
            .unwrap_or(0)
    }

    #[must_use]
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    #[must_use]
    pub fn memory_bytes(&self) -> usize {
        self.counters.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_upper_bounds_insertions() {
        let mut filter = CountingBloomFilter::new(10_000, 0.001);
        for _ in 0..7 {
            filter.add(b"ACGTACG");
        }
        assert!(filter.count(b"ACGTACG") >= 7);
    }

    #[test]
    fn absent_items_count_zero_with_high_probability() {
        let mut filter = CountingBloomFilter::new(10_000, 0.001);
        for i in 0..1000u32 {
            filter.add(format!("S{i:06}").as_bytes());
        }
        let nonzero = (0..1000u32)
            .filter(|i| filter.count(format!("T{i:06}").as_bytes()) > 0)
            .count();
        assert!(nonzero < 20, "{nonzero} phantom counts");
    }

    #[test]
    fn counters_saturate_instead_of_wrapping() {
        let mut filter = CountingBloomFilter::new(100, 0.001);
        for _ in 0..300 {
            filter.add(b"GGGGGGG");
        }
        assert_eq!(filter.count(b"GGGGGGG"), 255);
    }

    #[test]
    fn slot_count_respects_the_counter_ceiling() {
        assert!(CountingBloomFilter::estimate_bytes(500_000_000, 0.001) <= 209_715_200);
    }
}
