//! High-level design engine.
//!
//! [`RnaguardAnalyzer`] wires the whole flow together: validate both inputs,
//! build the non-target index, scan the target, and package the results. The
//! two underlying operations, [`build_index`](RnaguardAnalyzer::build_index)
//! and [`run_pipeline`](crate::pipeline::run_pipeline), stay available for
//! callers that manage index reuse themselves.

use std::path::Path;

use crate::config::RnaguardConfig;
use crate::index::builder::GenomeIndexer;
use crate::index::GenomeIndex;
use crate::pipeline::run_pipeline;
use crate::results::{RnaguardResults, SequenceInfo};
use crate::sequence::io::{parse_fasta_bytes, read_fasta_file};
use crate::sequence::Sequence;
use crate::types::{CancelToken, RnaguardError};

/// High-level analyzer over one configuration.
///
/// # Examples
///
/// ```rust
/// use rnaguard_core::{config::RnaguardConfig, engine::RnaguardAnalyzer};
///
/// let analyzer = RnaguardAnalyzer::new(RnaguardConfig {
///     efficacy_threshold: 60.0,
///     ..Default::default()
/// });
///
/// let target = b"ATGCGTGAGTGCATCTCCATCAAGGTTGAACTG".repeat(5);
/// let non_target = b"CTCTCTCTCT".repeat(15);
/// let results = analyzer.analyze_bytes(&target, &non_target)?;
///
/// println!("{} candidates", results.candidates.len());
/// # Ok::<(), rnaguard_core::types::RnaguardError>(())
/// ```
#[derive(Debug)]
pub struct RnaguardAnalyzer {
    pub config: RnaguardConfig,
}

impl RnaguardAnalyzer {
    #[must_use]
    pub const fn new(config: RnaguardConfig) -> Self {
        Self { config }
    }

    /// Builds a non-target index under the configured retention policy and
    /// memory ceiling.
    ///
    /// # Errors
    ///
    /// [`RnaguardError::ResourceLimit`] when the memory estimate exceeds the
    /// ceiling.
    pub fn build_index(
        &self,
        non_target: &Sequence,
        progress: &mut dyn FnMut(f64, &str),
    ) -> Result<GenomeIndex, RnaguardError> {
        GenomeIndexer::new(&self.config).build(non_target, progress)
    }

    /// Full run over already-validated sequences.
    ///
    /// # Errors
    ///
    /// Any error from index construction or the pipeline.
    pub fn analyze(
        &self,
        target: &Sequence,
        non_target: &Sequence,
        progress: &mut dyn FnMut(f64, &str),
        cancel: &CancelToken,
    ) -> Result<RnaguardResults, RnaguardError> {
        let index = self.build_index(non_target, progress)?;
        let outcome = run_pipeline(target.as_bytes(), &index, &self.config, progress, cancel)?;
        Ok(RnaguardResults {
            candidates: outcome.candidates,
            metrics: outcome.metrics,
            canceled: outcome.canceled,
            target_info: SequenceInfo {
                length: target.len(),
                gc_content: target.gc_content(),
                warnings: target.warnings().to_vec(),
            },
            index_stats: index.stats().clone(),
        })
    }

    /// Full run over in-memory FASTA byte streams.
    ///
    /// # Errors
    ///
    /// Validation errors for either input, plus anything [`analyze`](Self::analyze)
    /// can return.
    pub fn analyze_bytes(
        &self,
        target_fasta: &[u8],
        non_target_fasta: &[u8],
    ) -> Result<RnaguardResults, RnaguardError> {
        let target = parse_fasta_bytes(target_fasta)?;
        let non_target = parse_fasta_bytes(non_target_fasta)?;
        self.analyze(&target, &non_target, &mut |_, _| {}, &CancelToken::new())
    }

    /// Full run over FASTA files.
    ///
    /// # Errors
    ///
    /// I/O and parse errors for either file, plus anything
    /// [`analyze`](Self::analyze) can return.
    pub fn analyze_files<P: AsRef<Path>>(
        &self,
        target_path: P,
        non_target_path: P,
        progress: &mut dyn FnMut(f64, &str),
        cancel: &CancelToken,
    ) -> Result<RnaguardResults, RnaguardError> {
        let target = read_fasta_file(target_path)?;
        let non_target = read_fasta_file(non_target_path)?;
        self.analyze(&target, &non_target, progress, cancel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexVariant;

    #[test]
    fn analyze_bytes_runs_the_whole_flow() {
        let analyzer = RnaguardAnalyzer::new(RnaguardConfig {
            efficacy_threshold: 50.0,
            ..Default::default()
        });
        let target: Vec<u8> = b">target\n"
            .iter()
            .chain(b"ATGCGTGAGTGCATCTCCATCAAGGTTGAACTGGAAGTTCAG".repeat(8).iter())
            .copied()
            .collect();
        let non_target: Vec<u8> = b">protected\n"
            .iter()
            .chain(b"CTCTCTCTCT".repeat(15).iter())
            .copied()
            .collect();

        let results = analyzer.analyze_bytes(&target, &non_target).unwrap();
        assert!(!results.canceled);
        assert_eq!(results.index_stats.variant, IndexVariant::Exact);
        assert_eq!(results.target_info.length, 42 * 8);
        let scanned = 42 * 8 - 21;
        assert_eq!(results.metrics.total() + results.candidates.len(), scanned);
    }

    #[test]
    fn validation_errors_surface_before_any_work() {
        let analyzer = RnaguardAnalyzer::new(RnaguardConfig::default());
        let result = analyzer.analyze_bytes(b">t\nACGT\n", b">n\nACGT\n");
        assert!(matches!(
            result,
            Err(RnaguardError::SequenceTooShort { .. })
        ));
    }

    #[test]
    fn analyze_files_round_trips_through_fasta() {
        use std::io::Write;
        let mut target = tempfile::NamedTempFile::new().unwrap();
        write!(
            target,
            ">t\n{}\n",
            "ATGCGTGAGTGCATCTCCATCAAGGTTGAACTGGAAGTTCAG".repeat(5)
        )
        .unwrap();
        let mut non_target = tempfile::NamedTempFile::new().unwrap();
        write!(non_target, ">n\n{}\n", "CTCTCTCTCT".repeat(15)).unwrap();

        let analyzer = RnaguardAnalyzer::new(RnaguardConfig::default());
        let results = analyzer
            .analyze_files(
                target.path(),
                non_target.path(),
                &mut |_, _| {},
                &CancelToken::new(),
            )
            .unwrap();
        assert_eq!(results.target_info.length, 210);
    }
}
