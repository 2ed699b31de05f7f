//! Stable-field-order CSV candidate export.
//!
//! The column order is a compatibility contract with external tooling:
//! sequence, position, efficiency, safety_score, gc_content, status,
//! match_length, fold_risk, seed, has_seed_match, has_palindrome,
//! palindrome_length, has_cpg_motif, has_poly_run. Floats carry two
//! decimal places with a point separator.

use std::io::Write;

use crate::results::RnaguardResults;
use crate::types::RnaguardError;

const HEADER: &str = "sequence,position,efficiency,safety_score,gc_content,status,\
match_length,fold_risk,seed,has_seed_match,has_palindrome,palindrome_length,\
has_cpg_motif,has_poly_run";

pub fn write_csv_format<W: Write>(
    writer: &mut W,
    results: &RnaguardResults,
) -> Result<(), RnaguardError> {
    writeln!(writer, "{HEADER}")?;
    for candidate in &results.candidates {
        writeln!(
            writer,
            "{},{},{:.2},{:.2},{:.2},{},{},{},{},{},{},{},{},{}",
            candidate.sequence,
            candidate.position,
            candidate.efficacy,
            candidate.safety_score,
            candidate.gc_content,
            candidate.status,
            candidate.match_length,
            candidate.fold_risk,
            candidate.seed,
            candidate.has_seed_match,
            candidate.has_palindrome,
            candidate.palindrome_length,
            candidate.has_cpg,
            candidate.has_poly_run,
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{IndexStats, IndexVariant};
    use crate::pipeline::Candidate;
    use crate::results::SequenceInfo;
    use crate::types::{RejectionMetrics, SafetyStatus};
    use crate::config::VerificationRetention;

    fn sample_results() -> RnaguardResults {
        RnaguardResults {
            candidates: vec![Candidate {
                sequence: "ATGCGTGAGTGCATCTCCATC".to_string(),
                position: 7,
                gc_content: 52.381,
                match_length: 4,
                efficacy: 68.25,
                fold_risk: 0,
                safety_score: 98.5,
                seed: "TGCGTGA".to_string(),
                has_seed_match: false,
                seed_match_count: 0,
                has_palindrome: true,
                palindrome_length: 4,
                has_cpg: false,
                has_poly_run: false,
                status: SafetyStatus::Cleared,
                risk_factors: Vec::new(),
                safety_notes: "No risk factors detected".to_string(),
            }],
            metrics: RejectionMetrics::default(),
            canceled: false,
            target_info: SequenceInfo {
                length: 200,
                gc_content: 50.0,
                warnings: Vec::new(),
            },
            index_stats: IndexStats {
                variant: IndexVariant::Exact,
                sequence_length: 150,
                kmers15_indexed: 136,
                kmers7_indexed: 144,
                gc_content: 50.0,
                memory_bytes: 20_000,
                retention: VerificationRetention::Full,
                false_positive_estimate: 0.0,
            },
        }
    }

    #[test]
    fn header_field_order_is_stable() {
        let mut out = Vec::new();
        write_csv_format(&mut out, &sample_results()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let header = text.lines().next().unwrap();
        assert_eq!(
            header,
            "sequence,position,efficiency,safety_score,gc_content,status,match_length,\
fold_risk,seed,has_seed_match,has_palindrome,palindrome_length,has_cpg_motif,has_poly_run"
        );
    }

    #[test]
    fn floats_serialize_with_two_decimals() {
        let mut out = Vec::new();
        write_csv_format(&mut out, &sample_results()).unwrap();
        let text = String::from_utf8(out).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert_eq!(
            row,
            "ATGCGTGAGTGCATCTCCATC,7,68.25,98.50,52.38,Cleared,4,0,TGCGTGA,false,true,4,false,false"
        );
    }
}
