// =============================================================================
// =============================================================================

/// Version string for rnaguard
pub const VERSION: &str = "0.1.0";

// =============================================================================
// =============================================================================

/// Guide-strand candidate length in nucleotides
pub const SIRNA_LENGTH: usize = 21;

/// Homology exclusion length: a shared run of this many bases marks a
/// candidate toxic for the non-target organism
pub const PATENT_EXCLUSION_LENGTH: usize = 15;

/// Seed length in nucleotides
pub const SEED_LENGTH: usize = 7;

/// Seed region start within the guide strand (0-based; positions 2-8, 1-indexed)
pub const SEED_REGION_START: usize = 1;

/// Extended seed region length (positions 2-13, 1-indexed)
pub const EXTENDED_SEED_LENGTH: usize = 12;

// =============================================================================
// =============================================================================

/// Minimum accepted sequence length in bases
pub const MIN_GENOME_SIZE: usize = 100;

/// Maximum accepted sequence length in bases
pub const MAX_GENOME_SIZE: usize = 500_000_000;

/// Non-target sizes above this use the probabilistic index variant
pub const LARGE_FILE_THRESHOLD: usize = 10_000_000;

/// Indexer chunk size in bytes
pub const CHUNK_SIZE: usize = 1_000_000;

/// Trailing chunk overlap so k-mers straddling a boundary complete
pub const CHUNK_OVERLAP: usize = 50;

/// Maximum number of 21-nt windows scanned per pipeline run
pub const SCAN_LIMIT: usize = 5_000;

/// Window cadence for progress callbacks and cooperative yields
pub const PROGRESS_INTERVAL: usize = 100;

/// Prefix length inspected for the high-N-content warning
pub const N_WARNING_PREFIX: usize = 1_000_000;

/// N fraction above which validation warns (over the inspected prefix)
pub const N_WARNING_FRACTION: f64 = 0.05;

// =============================================================================
// =============================================================================

/// Default false-positive target for the bit-set Bloom filter
pub const BLOOM_FALSE_POSITIVE_RATE: f64 = 0.001;

/// Bit-set Bloom filter size ceiling (500 MiB in bits)
pub const MAX_BLOOM_BITS: u64 = 4_194_304_000;

/// Counting Bloom filter size ceiling in 8-bit counters (200 MiB)
pub const MAX_COUNTING_SLOTS: u64 = 209_715_200;

/// Minimum number of Bloom hash functions
pub const MIN_BLOOM_HASHES: u32 = 3;

/// Maximum number of Bloom hash functions
pub const MAX_BLOOM_HASHES: u32 = 10;

/// Exact 7-mer occurrence counts saturate here
pub const EXACT_COUNT_CLAMP: u8 = 100;

/// Default total memory ceiling for index construction (1 GiB)
pub const DEFAULT_MEMORY_CEILING: usize = 1_073_741_824;

/// Number of retained slices in samples-only verification mode
pub const VERIFICATION_SAMPLE_COUNT: usize = 100;

/// Length of each retained slice in samples-only verification mode
pub const VERIFICATION_SAMPLE_LENGTH: usize = 10_000;

// =============================================================================
// =============================================================================

/// Minimum overall safety score an emitted candidate must reach
pub const SAFETY_SCORE_FLOOR: f64 = 75.0;

/// Maximum fold risk an emitted candidate may carry
pub const FOLD_RISK_CEILING: u32 = 50;

/// Aggregate safety score below which a candidate is flagged Seed-Warning
pub const SEED_WARNING_SCORE: f64 = 80.0;

/// Seed risk at or above which a seed match alone flags Seed-Warning
pub const SEED_WARNING_RISK: u32 = 50;

/// Longest contiguous-match probe length (one below the exclusion length)
pub const MAX_CONTIGUOUS_PROBE: usize = 14;

/// Shortest contiguous-match probe length
pub const MIN_CONTIGUOUS_PROBE: usize = 4;

/// Longest palindrome probe length
pub const MAX_PALINDROME_PROBE: usize = 12;

/// Shortest palindrome probe length
pub const MIN_PALINDROME_PROBE: usize = 4;

/// Non-overlapping CpG count at which the CpG motif flag raises
pub const CPG_FLAG_COUNT: usize = 3;

// =============================================================================
// =============================================================================

/// Lower bound of the favored GC-content band (percent)
pub const GC_MIN: f64 = 30.0;

/// Upper bound of the favored GC-content band (percent)
pub const GC_MAX: f64 = 52.0;

/// GC percentage at which the efficacy GC rule peaks
pub const GC_OPTIMUM: f64 = 41.0;

/// Lower bound of the efficacy floor/ceiling clamp
pub const EFFICACY_MIN: f64 = 35.0;

/// Upper bound of the efficacy floor/ceiling clamp
pub const EFFICACY_MAX: f64 = 95.0;

/// Default efficacy threshold for candidate emission
pub const DEFAULT_EFFICACY_THRESHOLD: f64 = 70.0;

/// Lowest configurable efficacy threshold
pub const MIN_EFFICACY_THRESHOLD: f64 = 50.0;

/// Highest configurable efficacy threshold
pub const MAX_EFFICACY_THRESHOLD: f64 = 99.0;

/// Informational homology threshold exposed by the configuration record;
/// core algorithms treat the exclusion length as fixed
pub const DEFAULT_HOMOLOGY_THRESHOLD: usize = 15;

// =============================================================================
// =============================================================================

/// Immune-stimulatory motifs checked against the candidate (RNA spelling)
pub const IMMUNE_MOTIFS: [&str; 4] = ["UGUGU", "GUCCUUCAA", "UGGC", "GCCA"];

/// Homopolymer runs that raise the poly-run flag
pub const POLY_RUNS: [&str; 5] = ["AAAA", "UUUU", "TTTT", "GGGG", "CCCC"];
