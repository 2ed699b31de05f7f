//! Human-readable run report.

use std::io::Write;

use crate::results::RnaguardResults;
use crate::types::RnaguardError;

pub fn write_report_format<W: Write>(
    writer: &mut W,
    results: &RnaguardResults,
) -> Result<(), RnaguardError> {
    let stats = &results.index_stats;
    writeln!(writer, "rnaguard design report")?;
    writeln!(
        writer,
        "Target: {} bp, {:.2}% GC",
        results.target_info.length, results.target_info.gc_content
    )?;
    for warning in &results.target_info.warnings {
        writeln!(writer, "  warning: {warning}")?;
    }
    writeln!(
        writer,
        "Non-target index: {} variant over {} bp ({} retention, {:.1} MB)",
        stats.variant,
        stats.sequence_length,
        stats.retention,
        stats.memory_bytes as f64 / 1_048_576.0
    )?;
    if results.canceled {
        writeln!(writer, "Run canceled before completion; partial metrics follow")?;
    }
    let metrics = &results.metrics;
    writeln!(
        writer,
        "Rejections: {} safety, {} folding, {} efficacy, {} data quality",
        metrics.safety, metrics.folding, metrics.efficacy, metrics.data_quality
    )?;
    writeln!(writer, "Candidates: {}", results.candidates.len())?;
    for (rank, candidate) in results.candidates.iter().enumerate() {
        writeln!(
            writer,
            "{:>3}. {} @{} eff {:.2} safety {:.2} [{}] {}",
            rank + 1,
            candidate.sequence,
            candidate.position,
            candidate.efficacy,
            candidate.safety_score,
            candidate.status,
            candidate.safety_notes,
        )?;
    }
    Ok(())
}
