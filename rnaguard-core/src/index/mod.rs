//! Non-target genome indices.
//!
//! The exact and probabilistic variants satisfy one membership interface
//! (`contains15` / `count7`) behind a closed sum type, so the pipeline is
//! written once and stays indifferent to the variant. Both
//! variants retain verification text so positive homology probes can be
//! confirmed by exact substring search.

pub mod bloom;
pub mod builder;
pub mod counting;
pub mod exact;

use std::fmt;

use bio::pattern_matching::horspool::Horspool;
use serde::Serialize;

use crate::config::VerificationRetention;
use crate::index::bloom::BloomFilter;
use crate::index::counting::CountingBloomFilter;
use crate::index::exact::ExactKmerIndex;
use crate::kmer::fold_bytes;

/// Which index variant backs a [`GenomeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum IndexVariant {
    /// Deterministic k-mer sets; chosen for non-targets at or below 10 MB
    Exact,
    /// Bloom filters plus retained verification text; chosen above 10 MB
    Probabilistic,
}

impl fmt::Display for IndexVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact => write!(f, "exact"),
            Self::Probabilistic => write!(f, "probabilistic"),
        }
    }
}

/// Outcome of a 15-mer homology probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomologyVerdict {
    /// The index rules the 15-mer out
    Clean,
    /// Present in the index and confirmed in retained text
    Confirmed,
    /// Bloom-positive but not found in the retained text
    Unconfirmed,
}

/// One retained slice of the non-target sequence in samples mode.
#[derive(Debug, Clone)]
pub struct SampleRegion {
    /// Offset of the slice within the original non-target sequence
    pub offset: usize,
    pub bytes: Vec<u8>,
}

/// Verification text owned by an index: either the full non-target copy or
/// evenly spaced representative slices.
///
/// The text is DNA-typed (U folded onto T at construction) so substring
/// probes match regardless of the input's RNA/DNA spelling.
#[derive(Debug, Clone)]
pub enum RetainedText {
    Full(Vec<u8>),
    Samples(Vec<SampleRegion>),
}

impl RetainedText {
    #[must_use]
    pub fn policy(&self) -> VerificationRetention {
        match self {
            Self::Full(_) => VerificationRetention::Full,
            Self::Samples(_) => VerificationRetention::Samples,
        }
    }

    #[must_use]
    pub fn memory_bytes(&self) -> usize {
        match self {
            Self::Full(bytes) => bytes.len(),
            Self::Samples(samples) => samples.iter().map(|s| s.bytes.len()).sum(),
        }
    }
}

/// Construction report exposed through index introspection.
#[derive(Debug, Clone, Serialize)]
pub struct IndexStats {
    pub variant: IndexVariant,
    /// Length of the indexed non-target sequence in bases
    pub sequence_length: usize,
    /// 15-mers inserted (valid windows, duplicates included)
    pub kmers15_indexed: u64,
    /// 7-mers inserted (valid windows, duplicates included)
    pub kmers7_indexed: u64,
    /// GC percentage of the non-target sequence
    pub gc_content: f64,
    /// Bytes held by the index structures and retained text
    pub memory_bytes: usize,
    /// Verification-text retention in effect
    pub retention: VerificationRetention,
    /// Live Bloom false-positive estimate; 0 for the exact variant
    pub false_positive_estimate: f64,
}

/// The closed sum of index backends.
#[derive(Debug, Clone)]
pub(crate) enum IndexBackend {
    Exact(ExactKmerIndex),
    Probabilistic {
        kmers15: BloomFilter,
        seeds7: CountingBloomFilter,
    },
}

/// An immutable non-target genome index.
///
/// Built once per pipeline run by [`builder::GenomeIndexer`], then shared
/// read-only with the safety analyzer.
#[derive(Debug, Clone)]
pub struct GenomeIndex {
    pub(crate) backend: IndexBackend,
    pub(crate) retained: RetainedText,
    pub(crate) stats: IndexStats,
}

impl GenomeIndex {
    /// 15-mer membership.
    ///
    /// For the exact variant the answer is definitive. For the
    /// probabilistic variant a `true` is subject to the Bloom
    /// false-positive rate; use [`verify15`](Self::verify15) before any
    /// toxicity decision.
    #[must_use]
    pub fn contains15(&self, window: &[u8]) -> bool {
        match &self.backend {
            IndexBackend::Exact(index) => index.contains15(window),
            IndexBackend::Probabilistic { kmers15, .. } => kmers15.contains(&fold_bytes(window)),
        }
    }

    /// Occurrence estimate for a 7-mer seed.
    ///
    /// Exact counts clamp at 100; probabilistic counts are min-counter
    /// reads saturated at 255 and never undercount.
    #[must_use]
    pub fn count7(&self, window: &[u8]) -> u32 {
        match &self.backend {
            IndexBackend::Exact(index) => index.count7(window),
            IndexBackend::Probabilistic { seeds7, .. } => seeds7.count(&fold_bytes(window)),
        }
    }

    /// Full homology probe: membership plus confirmation against retained
    /// text.
    ///
    /// An exact-variant hit is confirmed by construction. A Bloom positive
    /// is confirmed only when the retained text contains the window; an
    /// unverified positive is reported as such and must never mark a
    /// candidate toxic.
    #[must_use]
    pub fn verify15(&self, window: &[u8]) -> HomologyVerdict {
        match &self.backend {
            IndexBackend::Exact(index) => {
                if index.contains15(window) {
                    HomologyVerdict::Confirmed
                } else {
                    HomologyVerdict::Clean
                }
            }
            IndexBackend::Probabilistic { kmers15, .. } => {
                if !kmers15.contains(&fold_bytes(window)) {
                    HomologyVerdict::Clean
                } else if self.retained_contains(window) {
                    HomologyVerdict::Confirmed
                } else {
                    HomologyVerdict::Unconfirmed
                }
            }
        }
    }

    /// Whether the retained verification text covers the whole non-target.
    #[must_use]
    pub fn has_full_retention(&self) -> bool {
        matches!(self.retained, RetainedText::Full(_))
    }

    /// Exact substring probe against the retained verification text.
    #[must_use]
    pub fn retained_contains(&self, pattern: &[u8]) -> bool {
        let pattern = fold_bytes(pattern);
        let matcher = Horspool::new(&pattern);
        match &self.retained {
            RetainedText::Full(text) => matcher.find_all(text).next().is_some(),
            RetainedText::Samples(samples) => samples
                .iter()
                .any(|s| matcher.find_all(&s.bytes).next().is_some()),
        }
    }

    /// Occurrences of a pattern in the retained verification text
    /// (overlapping matches counted).
    #[must_use]
    pub fn retained_count(&self, pattern: &[u8]) -> usize {
        let pattern = fold_bytes(pattern);
        let matcher = Horspool::new(&pattern);
        match &self.retained {
            RetainedText::Full(text) => matcher.find_all(text).count(),
            RetainedText::Samples(samples) => samples
                .iter()
                .map(|s| matcher.find_all(&s.bytes).count())
                .sum(),
        }
    }

    /// Construction report: variant, k-mer totals, GC content, memory, and
    /// verification semantics.
    #[must_use]
    pub fn stats(&self) -> &IndexStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RnaguardConfig;
    use crate::index::builder::GenomeIndexer;
    use crate::sequence::Sequence;

    fn small_index(non_target: &[u8]) -> GenomeIndex {
        let seq = Sequence::validate(non_target.to_vec()).unwrap();
        GenomeIndexer::new(&RnaguardConfig::default())
            .build(&seq, &mut |_, _| {})
            .unwrap()
    }

    #[test]
    fn exact_verdicts_are_definitive() {
        let mut non_target = b"ACGT".repeat(30);
        non_target.extend_from_slice(b"GGGGGGGGGGGGGGG");
        let index = small_index(&non_target);
        assert_eq!(index.verify15(b"GGGGGGGGGGGGGGG"), HomologyVerdict::Confirmed);
        assert_eq!(index.verify15(b"TTTTTTTTTTTTTTT"), HomologyVerdict::Clean);
    }

    #[test]
    fn retained_probes_fold_uracil() {
        let non_target = b"ACGT".repeat(30);
        let index = small_index(&non_target);
        assert!(index.retained_contains(b"ACGUACGU"));
        assert!(index.has_full_retention());
        assert!(index.retained_count(b"ACGTACGT") > 0);
    }

    #[test]
    fn stats_describe_the_exact_variant() {
        let non_target = b"ACGT".repeat(50);
        let index = small_index(&non_target);
        let stats = index.stats();
        assert_eq!(stats.variant, IndexVariant::Exact);
        assert_eq!(stats.sequence_length, 200);
        assert_eq!(stats.false_positive_estimate, 0.0);
        assert_eq!(stats.gc_content, 50.0);
        assert!(stats.kmers15_indexed > 0);
    }
}
