//! Streaming candidate scanner.
//!
//! Slides a 21-nt window across the target, runs each window through the
//! data-quality, safety, folding, and efficacy filters in that order, and
//! ranks the survivors by efficacy. Every rejected window increments exactly
//! one rejection counter (the first stage that failed it), so counters plus
//! emitted candidates always account for every scanned window.

use serde::Serialize;

use crate::config::RnaguardConfig;
use crate::constants::{
    FOLD_RISK_CEILING, PATENT_EXCLUSION_LENGTH, PROGRESS_INTERVAL, SAFETY_SCORE_FLOOR, SCAN_LIMIT,
    SIRNA_LENGTH,
};
use crate::efficacy::efficacy_score;
use crate::folding::fold_risk;
use crate::index::GenomeIndex;
use crate::kmer::is_valid_kmer;
use crate::safety::analyze_candidate;
use crate::sequence::gc_percent;
use crate::types::{CancelToken, RejectionMetrics, RnaguardError, SafetyStatus};

/// One emitted guide-strand candidate with its evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Candidate {
    pub sequence: String,
    /// 0-based window offset in the target sequence
    pub position: usize,
    /// GC percentage of the candidate
    pub gc_content: f64,
    /// Longest contiguous run shared with the non-target
    pub match_length: usize,
    pub efficacy: f64,
    pub fold_risk: u32,
    /// Aggregate safety score from the firewall
    pub safety_score: f64,
    pub seed: String,
    pub has_seed_match: bool,
    pub seed_match_count: u32,
    pub has_palindrome: bool,
    pub palindrome_length: usize,
    pub has_cpg: bool,
    pub has_poly_run: bool,
    pub status: SafetyStatus,
    pub risk_factors: Vec<String>,
    pub safety_notes: String,
}

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    /// Surviving candidates, ranked by descending efficacy (position breaks
    /// ties)
    pub candidates: Vec<Candidate>,
    pub metrics: RejectionMetrics,
    /// Set when the run was canceled; candidates are then empty and the
    /// metrics partial
    pub canceled: bool,
}

/// Scans the target against a pre-built non-target index.
///
/// The target is taken as raw bytes: callers that skip [`Sequence`]
/// validation still get per-window screening, with stray bytes quarantined
/// by the data-quality counter rather than failing the run.
///
/// At most `min(target_len - 21, 5000)` windows are visited. Progress is
/// reported and cancellation observed every 100 windows; a cooperative yield
/// is taken at the same cadence.
///
/// # Errors
///
/// - [`RnaguardError::InvalidConfig`] when the configuration fails validation
/// - [`RnaguardError::InternalInvariant`] when a candidate passes every
///   filter yet violates an output invariant (indicates a bug)
///
/// [`Sequence`]: crate::sequence::Sequence
pub fn run_pipeline(
    target: &[u8],
    index: &GenomeIndex,
    config: &RnaguardConfig,
    progress: &mut dyn FnMut(f64, &str),
    cancel: &CancelToken,
) -> Result<PipelineOutcome, RnaguardError> {
    config.validate()?;

    let scan_limit = target.len().saturating_sub(SIRNA_LENGTH).min(SCAN_LIMIT);
    let mut metrics = RejectionMetrics::default();
    let mut candidates = Vec::new();

    for window_start in 0..scan_limit {
        if window_start % PROGRESS_INTERVAL == 0 {
            if cancel.is_canceled() {
                return Ok(PipelineOutcome {
                    candidates: Vec::new(),
                    metrics,
                    canceled: true,
                });
            }
            if window_start > 0 {
                progress(window_start as f64 / scan_limit as f64, "Scanning target");
            }
            std::thread::yield_now();
        }

        let window = &target[window_start..window_start + SIRNA_LENGTH];

        // Stage 1: data quality. Emitted candidates must be built entirely
        // from unambiguous bases, so N disqualifies a window here just like
        // a stray byte outside the alphabet.
        if !is_valid_kmer(window) {
            metrics.data_quality += 1;
            continue;
        }

        // Stage 2: safety firewall.
        let analysis = analyze_candidate(window, index);
        if !analysis.is_safe || analysis.overall_safety_score < SAFETY_SCORE_FLOOR {
            metrics.safety += 1;
            continue;
        }

        // Stage 3: folding heuristic.
        let fold = fold_risk(window);
        if fold > FOLD_RISK_CEILING {
            metrics.folding += 1;
            continue;
        }

        // Stage 4: efficacy threshold.
        let efficacy = efficacy_score(window, config.species, fold);
        if efficacy < config.efficacy_threshold {
            metrics.efficacy += 1;
            continue;
        }

        if window.len() != SIRNA_LENGTH || analysis.match_length >= PATENT_EXCLUSION_LENGTH {
            return Err(RnaguardError::InternalInvariant(format!(
                "window at {window_start} passed all filters with length {} and match {}",
                window.len(),
                analysis.match_length
            )));
        }

        candidates.push(Candidate {
            sequence: String::from_utf8_lossy(window).into_owned(),
            position: window_start,
            gc_content: gc_percent(window),
            match_length: analysis.match_length,
            efficacy,
            fold_risk: fold,
            safety_score: analysis.overall_safety_score,
            seed: analysis.seed,
            has_seed_match: analysis.has_seed_match,
            seed_match_count: analysis.seed_match_count,
            has_palindrome: analysis.has_palindrome,
            palindrome_length: analysis.palindrome_length,
            has_cpg: analysis.has_cpg,
            has_poly_run: analysis.has_poly_run,
            status: analysis.status,
            risk_factors: analysis.risk_factors,
            safety_notes: analysis.safety_notes,
        });
    }

    progress(1.0, "Scan complete");

    candidates.sort_by(|a, b| {
        b.efficacy
            .partial_cmp(&a.efficacy)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.position.cmp(&b.position))
    });

    Ok(PipelineOutcome {
        candidates,
        metrics,
        canceled: false,
    })
}
