use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

/// Safety classification assigned to every analyzed candidate.
///
/// `Toxic` is reserved for candidates with a confirmed 15-mer match in the
/// non-target genome; such candidates never reach the output list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SafetyStatus {
    /// No confirmed homology and no elevated seed activity
    Cleared,
    /// Elevated seed occupancy or a depressed aggregate score
    SeedWarning,
    /// Confirmed 15-mer homology with the non-target genome
    Toxic,
}

impl fmt::Display for SafetyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cleared => write!(f, "Cleared"),
            Self::SeedWarning => write!(f, "Seed-Warning"),
            Self::Toxic => write!(f, "Toxic"),
        }
    }
}

/// Per-stage rejection counters for one pipeline run.
///
/// Every scanned window either becomes a candidate or increments exactly one
/// of these counters (the first filter stage that failed it), so the counter
/// total plus the emitted-candidate count equals the number of windows
/// scanned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RejectionMetrics {
    /// Windows rejected by the safety firewall
    pub safety: usize,
    /// Windows rejected by the folding heuristic
    pub folding: usize,
    /// Windows rejected by the efficacy threshold
    pub efficacy: usize,
    /// Windows rejected before analysis (invalid or ambiguous bases)
    pub data_quality: usize,
}

impl RejectionMetrics {
    /// Sum of all four rejection counters.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.safety + self.folding + self.efficacy + self.data_quality
    }
}

/// Externally observable cancel signal for a pipeline run.
///
/// Clone the token to the controlling thread and call [`cancel`](Self::cancel)
/// there; the pipeline observes it at its suspension points and returns the
/// partially accumulated metrics with the `canceled` flag set.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    #[must_use]
    pub fn is_canceled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

/// Error types surfaced by validation, index construction, and the pipeline.
///
/// Per-candidate anomalies (seed hits, palindromes, motifs, unconfirmed
/// Bloom positives) are never errors; they are reported as fields on the
/// safety analysis record. Cancellation is likewise a flag on the pipeline
/// outcome, not an error.
#[derive(Error, Debug)]
pub enum RnaguardError {
    /// The input contained no sequence data after header and whitespace removal
    #[error("Empty sequence: no nucleotide data found in input")]
    EmptySequence,
    /// Sequence shorter than the accepted minimum
    #[error("Sequence too short: {length} bases (minimum {minimum})")]
    SequenceTooShort { length: usize, minimum: usize },
    /// Sequence longer than the accepted maximum
    #[error("Sequence too large: {length} bases (maximum {maximum})")]
    SequenceTooLarge { length: usize, maximum: usize },
    /// A byte outside the accepted alphabet {A, C, G, T, U, N}
    #[error("Invalid character '{}' at position {position}", *byte as char)]
    InvalidCharacter { byte: u8, position: usize },
    /// Configuration value outside its documented range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    /// Index memory estimate exceeds the configured ceiling
    #[error("Index memory estimate {estimated} bytes exceeds ceiling {ceiling} bytes")]
    ResourceLimit { estimated: usize, ceiling: usize },
    /// A pipeline invariant was violated; indicates a bug, the run is aborted
    #[error("Internal invariant violation: {0}")]
    InternalInvariant(String),
    /// File I/O failure in the loading layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Input could not be parsed as FASTA
    #[error("Parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn safety_status_display_matches_report_labels() {
        assert_eq!(SafetyStatus::Cleared.to_string(), "Cleared");
        assert_eq!(SafetyStatus::SeedWarning.to_string(), "Seed-Warning");
        assert_eq!(SafetyStatus::Toxic.to_string(), "Toxic");
    }

    #[test]
    fn rejection_metrics_total_sums_all_stages() {
        let metrics = RejectionMetrics {
            safety: 3,
            folding: 1,
            efficacy: 7,
            data_quality: 2,
        };
        assert_eq!(metrics.total(), 13);
    }

    #[test]
    fn cancel_token_is_shared_across_clones() {
        let token = CancelToken::new();
        let observer = token.clone();
        assert!(!observer.is_canceled());
        token.cancel();
        assert!(observer.is_canceled());
    }

    #[test]
    fn invalid_character_error_shows_byte_as_char() {
        let err = RnaguardError::InvalidCharacter {
            byte: b'X',
            position: 42,
        };
        assert_eq!(err.to_string(), "Invalid character 'X' at position 42");
    }
}
