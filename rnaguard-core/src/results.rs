use serde::Serialize;

use crate::index::IndexStats;
use crate::pipeline::Candidate;
use crate::types::RejectionMetrics;

/// Metadata about one validated input sequence.
#[derive(Debug, Clone, Serialize)]
pub struct SequenceInfo {
    /// Length in bases
    pub length: usize,
    /// GC percentage
    pub gc_content: f64,
    /// Validation warnings (informational; computation is unaffected)
    pub warnings: Vec<String>,
}

/// Complete output of one design run.
///
/// Produced by [`RnaguardAnalyzer`](crate::engine::RnaguardAnalyzer) after
/// validating both inputs, indexing the non-target, and scanning the target.
#[derive(Debug, Clone)]
pub struct RnaguardResults {
    /// Ranked candidate list (descending efficacy, position breaks ties)
    pub candidates: Vec<Candidate>,
    /// Per-stage rejection counters
    pub metrics: RejectionMetrics,
    /// Whether the run was canceled before completion
    pub canceled: bool,
    /// Target sequence metadata
    pub target_info: SequenceInfo,
    /// Non-target index construction report
    pub index_stats: IndexStats,
}
