//! Bit-set Bloom filter for 15-mer membership.
//!
//! No false negatives: `contains` returning `false` is definitive, `true` is
//! subject to the advertised false-positive rate and must be verified against
//! retained text before any toxicity decision.

use crate::constants::{MAX_BLOOM_BITS, MAX_BLOOM_HASHES, MIN_BLOOM_HASHES};
use crate::kmer::murmur3_32;

/// Derive the double-hashing index family for an item.
///
/// h1 is seeded with 0, h2 with h1; index i is `(h1 + i*h2) mod m`.
#[inline]
pub(crate) fn hash_indices(item: &[u8], hash_count: u32, modulus: u64) -> impl Iterator<Item = u64> {
    let h1 = u64::from(murmur3_32(item, 0));
    let h2 = u64::from(murmur3_32(item, murmur3_32(item, 0)));
    (0..u64::from(hash_count)).map(move |i| (h1.wrapping_add(i.wrapping_mul(h2))) % modulus)
}

/// Bloom sizing from an expected element count and false-positive target.
///
/// Returns `(bit_count, hash_count)`: m = ceil(-n*ln p / (ln 2)^2) clamped to the
/// bit ceiling, k = ceil((m/n)*ln 2) clamped to [3, 10].
#[must_use]
pub fn bloom_dimensions(expected_items: usize, false_positive_rate: f64) -> (u64, u32) {
    let n = expected_items.max(1) as f64;
    let ln2 = std::f64::consts::LN_2;
    let bits = (-n * false_positive_rate.ln() / (ln2 * ln2)).ceil();
    let bit_count = (bits as u64).clamp(64, MAX_BLOOM_BITS);
    let hashes = ((bit_count as f64 / n) * ln2).ceil() as u32;
    let hash_count = hashes.clamp(MIN_BLOOM_HASHES, MAX_BLOOM_HASHES);
    (bit_count, hash_count)
}

/// Bit-set Bloom filter over raw k-mer bytes.
#[derive(Debug, Clone)]
pub struct BloomFilter {
    bits: Vec<u64>,
    bit_count: u64,
    hash_count: u32,
    inserted: u64,
}

impl BloomFilter {
    /// Builds a filter sized for `expected_items` at `false_positive_rate`.
    #[must_use]
    pub fn new(expected_items: usize, false_positive_rate: f64) -> Self {
        let (bit_count, hash_count) = bloom_dimensions(expected_items, false_positive_rate);
        let words = bit_count.div_ceil(64) as usize;
        Self {
            bits: vec![0; words],
            bit_count,
            hash_count,
            inserted: 0,
        }
    }

    /// Estimated backing-store size in bytes for sizing checks before
    /// allocation.
    #[must_use]
    pub fn estimate_bytes(expected_items: usize, false_positive_rate: f64) -> usize {
        let (bit_count, _) = bloom_dimensions(expected_items, false_positive_rate);
        (bit_count.div_ceil(64) * 8) as usize
    }

    pub fn add(&mut self, item: &[u8]) {
        for idx in hash_indices(item, self.hash_count, self.bit_count) {
            self.bits[(idx >> 6) as usize] |= 1u64 << (idx & 63);
        }
        self.inserted += 1;
    }

    /// `false` is definitive; `true` carries the false-positive rate.
    #[must_use]
    pub fn contains(&self, item: &[u8]) -> bool {
        hash_indices(item, self.hash_count, self.bit_count)
            .all(|idx| self.bits[(idx >> 6) as usize] & (1u64 << (idx & 63)) != 0)
    }

    #[must_use]
    pub fn inserted(&self) -> u64 {
        self.inserted
    }

    #[must_use]
    pub fn memory_bytes(&self) -> usize {
        self.bits.len() * 8
    }

    /// Live false-positive estimate `(1 - e^(-kn/m))^k` from the current
    /// insertion count.
    #[must_use]
    pub fn false_positive_estimate(&self) -> f64 {
        let k = f64::from(self.hash_count);
        let n = self.inserted as f64;
        let m = self.bit_count as f64;
        (1.0 - (-k * n / m).exp()).powf(k)
    }
}
