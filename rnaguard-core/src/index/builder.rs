//! Chunked, yielding construction of non-target genome indices.
//!
//! The builder walks the sequence in 1 MB chunks with a 50-byte trailing
//! overlap so k-mers straddling a boundary complete; only k-mers starting in
//! the non-overlap prefix are inserted, keeping occurrence counts exact.
//! Control yields to the host between chunks so progress reporting stays
//! live on single-threaded hosts.

use crate::config::{RnaguardConfig, VerificationRetention};
use crate::constants::{
    BLOOM_FALSE_POSITIVE_RATE, CHUNK_OVERLAP, CHUNK_SIZE, LARGE_FILE_THRESHOLD,
    PATENT_EXCLUSION_LENGTH, SEED_LENGTH, VERIFICATION_SAMPLE_COUNT, VERIFICATION_SAMPLE_LENGTH,
};
use crate::index::bloom::BloomFilter;
use crate::index::counting::CountingBloomFilter;
use crate::index::exact::ExactKmerIndex;
use crate::index::{GenomeIndex, IndexBackend, IndexStats, IndexVariant, RetainedText, SampleRegion};
use crate::kmer::{fold_bytes, is_valid_kmer};
use crate::sequence::Sequence;
use crate::types::RnaguardError;

/// Builds either index variant from a non-target sequence.
///
/// # Examples
///
/// ```rust
/// use rnaguard_core::config::RnaguardConfig;
/// use rnaguard_core::index::builder::GenomeIndexer;
/// use rnaguard_core::sequence::Sequence;
///
/// let non_target = Sequence::validate(b"ACGT".repeat(50))?;
/// let index = GenomeIndexer::new(&RnaguardConfig::default())
///     .build(&non_target, &mut |_, _| {})?;
/// assert!(index.contains15(b"ACGTACGTACGTACG"));
/// # Ok::<(), rnaguard_core::types::RnaguardError>(())
/// ```
#[derive(Debug)]
pub struct GenomeIndexer {
    retention: VerificationRetention,
    memory_ceiling: usize,
    false_positive_rate: f64,
}

impl GenomeIndexer {
    #[must_use]
    pub fn new(config: &RnaguardConfig) -> Self {
        Self {
            retention: config.retention,
            memory_ceiling: config.memory_ceiling,
            false_positive_rate: BLOOM_FALSE_POSITIVE_RATE,
        }
    }

    /// The variant the size rule selects for a non-target of this length.
    #[must_use]
    pub fn variant_for(sequence_length: usize) -> IndexVariant {
        if sequence_length > LARGE_FILE_THRESHOLD {
            IndexVariant::Probabilistic
        } else {
            IndexVariant::Exact
        }
    }

    /// Pre-allocation memory estimate for a non-target of this length under
    /// the configured retention policy.
    #[must_use]
    pub fn estimate_bytes(&self, sequence_length: usize) -> usize {
        match Self::variant_for(sequence_length) {
            IndexVariant::Exact => {
                // Exact indices always retain the full copy.
                ExactKmerIndex::estimate_bytes(sequence_length) + sequence_length
            }
            IndexVariant::Probabilistic => {
                let n15 = sequence_length.saturating_sub(PATENT_EXCLUSION_LENGTH - 1);
                let n7 = sequence_length.saturating_sub(SEED_LENGTH - 1);
                let retained = match self.retention {
                    VerificationRetention::Full => sequence_length,
                    VerificationRetention::Samples => {
                        VERIFICATION_SAMPLE_COUNT * VERIFICATION_SAMPLE_LENGTH
                    }
                };
                BloomFilter::estimate_bytes(n15, self.false_positive_rate)
                    + CountingBloomFilter::estimate_bytes(n7, self.false_positive_rate)
                    + retained
            }
        }
    }

    /// Builds the index, yielding to the host after every chunk.
    ///
    /// `progress` receives a completed fraction in [0, 1] and a phase label
    /// after each chunk.
    ///
    /// # Errors
    ///
    /// [`RnaguardError::ResourceLimit`] when the memory estimate exceeds the
    /// configured ceiling. The estimate is computed before any allocation.
    pub fn build(
        &self,
        non_target: &Sequence,
        progress: &mut dyn FnMut(f64, &str),
    ) -> Result<GenomeIndex, RnaguardError> {
        let length = non_target.len();
        let estimated = self.estimate_bytes(length);
        if estimated > self.memory_ceiling {
            return Err(RnaguardError::ResourceLimit {
                estimated,
                ceiling: self.memory_ceiling,
            });
        }

        // One DNA-typed copy (U folded onto T) feeds the k-mer inserts and
        // becomes the retained verification text.
        let folded = fold_bytes(non_target.as_bytes());
        let variant = Self::variant_for(length);

        let mut backend = match variant {
            IndexVariant::Exact => IndexBackend::Exact(ExactKmerIndex::new()),
            IndexVariant::Probabilistic => IndexBackend::Probabilistic {
                kmers15: BloomFilter::new(
                    length.saturating_sub(PATENT_EXCLUSION_LENGTH - 1),
                    self.false_positive_rate,
                ),
                seeds7: CountingBloomFilter::new(
                    length.saturating_sub(SEED_LENGTH - 1),
                    self.false_positive_rate,
                ),
            },
        };

        let mut base_counts = [0u64; 4]; // A, C, G, T/U
        let mut chunk_start = 0usize;
        while chunk_start < length {
            let prefix_len = CHUNK_SIZE.min(length - chunk_start);
            let chunk_end = (chunk_start + CHUNK_SIZE + CHUNK_OVERLAP).min(length);
            let chunk = &folded[chunk_start..chunk_end];

            Self::index_chunk(&mut backend, chunk, prefix_len);

            for &b in &chunk[..prefix_len] {
                match b {
                    b'A' => base_counts[0] += 1,
                    b'C' => base_counts[1] += 1,
                    b'G' => base_counts[2] += 1,
                    b'T' => base_counts[3] += 1,
                    _ => {}
                }
            }

            chunk_start += prefix_len;
            progress(chunk_start as f64 / length as f64, "Indexing non-target");
            // Cooperative point: keeps the progress path live on a
            // single-threaded host, harmless on preemptive hosts.
            std::thread::yield_now();
        }

        // The exact variant is at most 10 MB of sequence; it always keeps
        // the full copy so its verification semantics stay deterministic.
        let retained = match variant {
            IndexVariant::Exact => RetainedText::Full(folded),
            IndexVariant::Probabilistic => self.retain(folded),
        };
        let stats = Self::collect_stats(&backend, &retained, length, &base_counts);

        Ok(GenomeIndex {
            backend,
            retained,
            stats,
        })
    }

    /// Inserts every valid k-mer starting in the chunk's non-overlap prefix.
    fn index_chunk(backend: &mut IndexBackend, chunk: &[u8], prefix_len: usize) {
        let limit15 = prefix_len.min(chunk.len().saturating_sub(PATENT_EXCLUSION_LENGTH - 1));
        let limit7 = prefix_len.min(chunk.len().saturating_sub(SEED_LENGTH - 1));

        match backend {
            IndexBackend::Exact(index) => {
                for i in 0..limit15 {
                    index.add15(&chunk[i..i + PATENT_EXCLUSION_LENGTH]);
                }
                for i in 0..limit7 {
                    index.add7(&chunk[i..i + SEED_LENGTH]);
                }
            }
            IndexBackend::Probabilistic { kmers15, seeds7 } => {
                for i in 0..limit15 {
                    let window = &chunk[i..i + PATENT_EXCLUSION_LENGTH];
                    if is_valid_kmer(window) {
                        kmers15.add(window);
                    }
                }
                for i in 0..limit7 {
                    let window = &chunk[i..i + SEED_LENGTH];
                    if is_valid_kmer(window) {
                        seeds7.add(window);
                    }
                }
            }
        }
    }

    /// Applies the retention policy to the folded non-target copy.
    fn retain(&self, folded: Vec<u8>) -> RetainedText {
        match self.retention {
            VerificationRetention::Full => RetainedText::Full(folded),
            VerificationRetention::Samples => {
                let stride = (folded.len() / VERIFICATION_SAMPLE_COUNT).max(1);
                let samples = (0..VERIFICATION_SAMPLE_COUNT)
                    .map(|i| i * stride)
                    .take_while(|&offset| offset < folded.len())
                    .map(|offset| {
                        let end = (offset + VERIFICATION_SAMPLE_LENGTH).min(folded.len());
                        SampleRegion {
                            offset,
                            bytes: folded[offset..end].to_vec(),
                        }
                    })
                    .collect();
                RetainedText::Samples(samples)
            }
        }
    }

    fn collect_stats(
        backend: &IndexBackend,
        retained: &RetainedText,
        length: usize,
        base_counts: &[u64; 4],
    ) -> IndexStats {
        let counted: u64 = base_counts.iter().sum();
        let gc_content = if counted == 0 {
            0.0
        } else {
            (base_counts[1] + base_counts[2]) as f64 / counted as f64 * 100.0
        };

        let (variant, kmers15_indexed, kmers7_indexed, structure_bytes, false_positive_estimate) =
            match backend {
                IndexBackend::Exact(index) => (
                    IndexVariant::Exact,
                    index.inserted15(),
                    index.inserted7(),
                    index.memory_bytes(),
                    0.0,
                ),
                IndexBackend::Probabilistic { kmers15, seeds7 } => (
                    IndexVariant::Probabilistic,
                    kmers15.inserted(),
                    seeds7.inserted(),
                    kmers15.memory_bytes() + seeds7.memory_bytes(),
                    kmers15.false_positive_estimate(),
                ),
            };

        IndexStats {
            variant,
            sequence_length: length,
            kmers15_indexed,
            kmers7_indexed,
            gc_content,
            memory_bytes: structure_bytes + retained.memory_bytes(),
            retention: retained.policy(),
            false_positive_estimate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RnaguardConfig;

    fn build(non_target: Vec<u8>, config: &RnaguardConfig) -> GenomeIndex {
        let seq = Sequence::validate(non_target).unwrap();
        GenomeIndexer::new(config)
            .build(&seq, &mut |_, _| {})
            .unwrap()
    }

    #[test]
    fn small_sequences_get_the_exact_variant() {
        assert_eq!(GenomeIndexer::variant_for(1_000_000), IndexVariant::Exact);
        assert_eq!(GenomeIndexer::variant_for(10_000_000), IndexVariant::Exact);
        assert_eq!(
            GenomeIndexer::variant_for(10_000_001),
            IndexVariant::Probabilistic
        );
    }

    #[test]
    fn boundary_kmers_are_not_missed() {
        // A distinctive 15-mer placed to straddle the first chunk boundary.
        let marker = b"GTCAGTCAGTCAGTC";
        let mut non_target = vec![b'A'; CHUNK_SIZE + 200];
        let at = CHUNK_SIZE - 7;
        non_target[at..at + marker.len()].copy_from_slice(marker);
        let index = build(non_target, &RnaguardConfig::default());
        assert!(index.contains15(marker));
    }

    #[test]
    fn seed_counts_are_exact_across_chunks() {
        // The poly-A body makes AAAAAAA abundant; counts must clamp at 100,
        // not inflate past it through overlap double-insertion.
        let non_target = vec![b'A'; CHUNK_SIZE + 200];
        let index = build(non_target, &RnaguardConfig::default());
        assert_eq!(index.count7(b"AAAAAAA"), 100);
        // A seed occurring exactly once stays at one.
        let mut single = vec![b'A'; 300];
        single[150..157].copy_from_slice(b"GTCAGTC");
        let index = build(single, &RnaguardConfig::default());
        assert_eq!(index.count7(b"GTCAGTC"), 1);
    }

    #[test]
    fn progress_reaches_completion() {
        let seq = Sequence::validate(vec![b'C'; 2_500_000]).unwrap();
        let mut fractions = Vec::new();
        GenomeIndexer::new(&RnaguardConfig::default())
            .build(&seq, &mut |f, _| fractions.push(f))
            .unwrap();
        assert_eq!(fractions.len(), 3); // three chunks
        assert!((fractions.last().unwrap() - 1.0).abs() < f64::EPSILON);
        assert!(fractions.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn memory_ceiling_refuses_construction() {
        let config = RnaguardConfig {
            memory_ceiling: 1024,
            ..Default::default()
        };
        let seq = Sequence::validate(vec![b'G'; 100_000]).unwrap();
        let result = GenomeIndexer::new(&config).build(&seq, &mut |_, _| {});
        assert!(matches!(
            result,
            Err(RnaguardError::ResourceLimit { .. })
        ));
    }

    #[test]
    fn exact_variant_forces_full_retention() {
        let config = RnaguardConfig {
            retention: VerificationRetention::Samples,
            ..Default::default()
        };
        let non_target = b"ACGT".repeat(5_000);
        let index = build(non_target, &config);
        assert_eq!(index.stats().retention, VerificationRetention::Full);
        assert!(index.has_full_retention());
    }

    #[test]
    fn ambiguous_bases_are_skipped_but_counted_nowhere() {
        let mut non_target = b"ACGT".repeat(50);
        non_target[100] = b'N';
        let index = build(non_target, &RnaguardConfig::default());
        // GC content ignores the N; the exact counts skip N windows.
        assert!(index.stats().gc_content > 49.0 && index.stats().gc_content < 51.0);
    }
}
