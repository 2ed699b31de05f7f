//! Five-layer safety firewall for guide candidates.
//!
//! Layer 1 is the hard gate: a confirmed 15-mer shared with the non-target
//! marks the candidate toxic and ends the analysis. Layers 2-5 accumulate
//! graded risk (seed occupancy, extended seed, self-complementarity, and
//! biological motifs) into one aggregate score. Every anomaly is reported on
//! the analysis record; nothing below layer 1 rejects by itself.

use rayon::prelude::*;
use serde::Serialize;

use crate::constants::{
    CPG_FLAG_COUNT, EXTENDED_SEED_LENGTH, IMMUNE_MOTIFS, MAX_CONTIGUOUS_PROBE,
    MAX_PALINDROME_PROBE, MIN_CONTIGUOUS_PROBE, MIN_PALINDROME_PROBE, PATENT_EXCLUSION_LENGTH,
    POLY_RUNS, SEED_LENGTH, SEED_REGION_START, SEED_WARNING_RISK, SEED_WARNING_SCORE, SIRNA_LENGTH,
};
use crate::index::{GenomeIndex, HomologyVerdict};
use crate::kmer::fold_bytes;
use crate::sequence::reverse_complement;
use crate::types::SafetyStatus;

/// Full safety report for one 21-nt candidate.
#[derive(Debug, Clone, Serialize)]
pub struct SafetyAnalysis {
    /// Longest contiguous run shared with the non-target (15 when toxic)
    pub match_length: usize,
    /// Distance to the exclusion length; always 15 - match_length
    pub safety_margin: usize,
    /// Seed region, positions 2-8
    pub seed: String,
    pub reverse_complement_seed: String,
    pub has_seed_match: bool,
    /// Non-target occurrences of the seed plus its reverse complement
    pub seed_match_count: u32,
    pub seed_risk: u32,
    /// Extended seed region, positions 2-13
    pub extended_seed: String,
    pub has_extended_seed_match: bool,
    /// Reported for audit only; never feeds the aggregate score
    pub extended_seed_match_count: u32,
    pub has_palindrome: bool,
    pub palindrome_length: usize,
    pub palindrome_position: Option<usize>,
    pub palindrome_risk: u32,
    pub cpg_count: usize,
    pub has_cpg: bool,
    pub has_poly_run: bool,
    pub poly_run_details: Vec<String>,
    pub immune_motifs: Vec<String>,
    pub biological_risk_score: u32,
    /// An index positive that retained-text verification could not confirm
    pub bloom_warning: bool,
    pub overall_safety_score: f64,
    pub is_safe: bool,
    pub status: SafetyStatus,
    pub risk_factors: Vec<String>,
    pub safety_notes: String,
}

/// Aggregate safety score from the layer results, clamped to [0, 100].
///
/// A confirmed homology hit short-circuits to 0 before this function is
/// reached; the deductions here cover the graded layers only.
#[must_use]
pub fn aggregate_score(
    match_length: usize,
    bloom_warning: bool,
    seed_risk: u32,
    palindrome_risk: u32,
    biological_risk: u32,
) -> f64 {
    let mut score = 100.0;
    score -= match match_length {
        l if l >= 14 => 40.0,
        l if l >= 12 => 20.0,
        l if l >= 10 => 10.0,
        _ => 0.0,
    };
    if bloom_warning {
        score -= 30.0;
    }
    score -= f64::from(seed_risk) * 0.30;
    score -= f64::from(palindrome_risk) * 0.15;
    score -= f64::from(biological_risk) * 0.10;
    score.clamp(0.0, 100.0)
}

/// Seed-occurrence risk table.
fn seed_risk_for(occurrences: u32) -> u32 {
    match occurrences {
        0 => 0,
        1..=10 => 15,
        11..=50 => 30,
        51..=100 => 50,
        _ => 80,
    }
}

/// Palindrome-length risk table.
fn palindrome_risk_for(length: usize) -> u32 {
    match length {
        l if l >= 8 => 60,
        6 | 7 => 30,
        4 | 5 => 10,
        _ => 0,
    }
}

/// Longest contiguous candidate substring found in the retained non-target
/// text, probing lengths 14 down to 4.
fn max_contiguous_match(candidate: &[u8], index: &GenomeIndex) -> usize {
    for length in (MIN_CONTIGUOUS_PROBE..=MAX_CONTIGUOUS_PROBE).rev() {
        let hit = (0..=candidate.len() - length)
            .into_par_iter()
            .any(|start| index.retained_contains(&candidate[start..start + length]));
        if hit {
            return length;
        }
    }
    0
}

/// Longest self-complementary subsequence, probing lengths 12 down to 4.
///
/// Returns `(length, start)` of the first (longest) hit.
fn longest_palindrome(candidate: &[u8]) -> Option<(usize, usize)> {
    for length in (MIN_PALINDROME_PROBE..=MAX_PALINDROME_PROBE).rev() {
        for start in 0..=candidate.len() - length {
            let window = &candidate[start..start + length];
            if fold_bytes(window) == reverse_complement(window) {
                return Some((length, start));
            }
        }
    }
    None
}

/// Non-overlapping CpG dinucleotide count.
fn cpg_count(candidate: &[u8]) -> usize {
    let mut count = 0;
    let mut i = 0;
    while i + 2 <= candidate.len() {
        if &candidate[i..i + 2] == b"CG" {
            count += 1;
            i += 2;
        } else {
            i += 1;
        }
    }
    count
}

fn contains(candidate: &[u8], motif: &[u8]) -> bool {
    candidate.windows(motif.len()).any(|w| w == motif)
}

/// RNA spelling of the candidate (every T replaced by U).
fn rna_view(candidate: &[u8]) -> Vec<u8> {
    candidate
        .iter()
        .map(|&b| if b == b'T' { b'U' } else { b })
        .collect()
}

/// Runs the five-layer firewall against the non-target index.
#[must_use]
pub fn analyze_candidate(candidate: &[u8], index: &GenomeIndex) -> SafetyAnalysis {
    debug_assert_eq!(candidate.len(), SIRNA_LENGTH);
    let seed_end = SEED_REGION_START + SEED_LENGTH;
    let seed = &candidate[SEED_REGION_START..seed_end];
    let reverse_seed = reverse_complement(seed);
    let extended = &candidate[SEED_REGION_START..SEED_REGION_START + EXTENDED_SEED_LENGTH];

    // Layer 1: 15-mer exclusion across the seven candidate windows.
    let mut bloom_warning = false;
    let mut confirmed = false;
    for start in 0..=candidate.len() - PATENT_EXCLUSION_LENGTH {
        match index.verify15(&candidate[start..start + PATENT_EXCLUSION_LENGTH]) {
            HomologyVerdict::Confirmed => {
                confirmed = true;
                break;
            }
            HomologyVerdict::Unconfirmed => bloom_warning = true,
            HomologyVerdict::Clean => {}
        }
    }

    if confirmed {
        // Hard gate: terminate analysis, score zero, never emitted.
        return SafetyAnalysis {
            match_length: PATENT_EXCLUSION_LENGTH,
            safety_margin: 0,
            seed: String::from_utf8_lossy(seed).into_owned(),
            reverse_complement_seed: String::from_utf8_lossy(&reverse_seed).into_owned(),
            has_seed_match: false,
            seed_match_count: 0,
            seed_risk: 0,
            extended_seed: String::from_utf8_lossy(extended).into_owned(),
            has_extended_seed_match: false,
            extended_seed_match_count: 0,
            has_palindrome: false,
            palindrome_length: 0,
            palindrome_position: None,
            palindrome_risk: 0,
            cpg_count: 0,
            has_cpg: false,
            has_poly_run: false,
            poly_run_details: Vec::new(),
            immune_motifs: Vec::new(),
            biological_risk_score: 0,
            bloom_warning,
            overall_safety_score: 0.0,
            is_safe: false,
            status: SafetyStatus::Toxic,
            risk_factors: vec![format!(
                "Confirmed {PATENT_EXCLUSION_LENGTH}-mer homology with the non-target genome"
            )],
            safety_notes: "Excluded: exact homology with the protected organism".to_string(),
        };
    }

    let match_length = max_contiguous_match(candidate, index);

    // Layer 2: seed occupancy in both orientations.
    let seed_match_count = index.count7(seed) + index.count7(&reverse_seed);
    let has_seed_match = seed_match_count > 0;
    let seed_risk = seed_risk_for(seed_match_count);

    // Layer 3: extended seed, exact substring only; skipped without full
    // retention.
    let reverse_extended = reverse_complement(extended);
    let (has_extended_seed_match, extended_seed_match_count) = if index.has_full_retention() {
        let count = index.retained_count(extended) + index.retained_count(&reverse_extended);
        (count > 0, count as u32)
    } else {
        (false, 0)
    };

    // Layer 4: self-complementarity.
    let palindrome = longest_palindrome(candidate);
    let palindrome_length = palindrome.map_or(0, |(length, _)| length);
    let palindrome_position = palindrome.map(|(_, start)| start);
    let palindrome_risk = palindrome_risk_for(palindrome_length);

    // Layer 5: biological motifs.
    let cpg_count = cpg_count(candidate);
    let has_cpg = cpg_count >= CPG_FLAG_COUNT;
    let poly_run_details: Vec<String> = POLY_RUNS
        .iter()
        .filter(|run| contains(candidate, run.as_bytes()))
        .map(|run| (*run).to_string())
        .collect();
    let has_poly_run = !poly_run_details.is_empty();
    let rna = rna_view(candidate);
    let immune_motifs: Vec<String> = IMMUNE_MOTIFS
        .iter()
        .filter(|motif| {
            contains(candidate, motif.as_bytes()) || contains(&rna, motif.as_bytes())
        })
        .map(|motif| (*motif).to_string())
        .collect();

    let mut biological_risk_score = 0;
    if has_cpg {
        biological_risk_score += 20;
    }
    if has_poly_run {
        biological_risk_score += 25;
    }
    if !immune_motifs.is_empty() {
        biological_risk_score += 30;
    }

    let overall_safety_score = aggregate_score(
        match_length,
        bloom_warning,
        seed_risk,
        palindrome_risk,
        biological_risk_score,
    );

    let status = if has_seed_match && seed_risk >= SEED_WARNING_RISK
        || overall_safety_score < SEED_WARNING_SCORE
    {
        SafetyStatus::SeedWarning
    } else {
        SafetyStatus::Cleared
    };

    let mut risk_factors = Vec::new();
    if match_length >= 10 {
        risk_factors.push(format!(
            "Contiguous {match_length}-base homology with the non-target genome"
        ));
    }
    if bloom_warning {
        risk_factors.push("Unverified index positive (probabilistic)".to_string());
    }
    if has_seed_match {
        risk_factors.push(format!(
            "Seed region occurs {seed_match_count} time(s) in the non-target genome"
        ));
    }
    if has_extended_seed_match {
        risk_factors.push(format!(
            "Extended seed occurs {extended_seed_match_count} time(s) in the non-target genome"
        ));
    }
    if palindrome_length > 0 {
        risk_factors.push(format!(
            "Self-complementary {palindrome_length}-base palindrome"
        ));
    }
    if has_cpg {
        risk_factors.push(format!("CpG motif content ({cpg_count} dinucleotides)"));
    }
    if has_poly_run {
        risk_factors.push(format!("Homopolymer run: {}", poly_run_details.join(", ")));
    }
    if !immune_motifs.is_empty() {
        risk_factors.push(format!(
            "Immune-stimulatory motif: {}",
            immune_motifs.join(", ")
        ));
    }
    let safety_notes = if risk_factors.is_empty() {
        "No risk factors detected".to_string()
    } else {
        risk_factors.join("; ")
    };

    SafetyAnalysis {
        match_length,
        safety_margin: PATENT_EXCLUSION_LENGTH - match_length,
        seed: String::from_utf8_lossy(seed).into_owned(),
        reverse_complement_seed: String::from_utf8_lossy(&reverse_seed).into_owned(),
        has_seed_match,
        seed_match_count,
        seed_risk,
        extended_seed: String::from_utf8_lossy(extended).into_owned(),
        has_extended_seed_match,
        extended_seed_match_count,
        has_palindrome: palindrome_length > 0,
        palindrome_length,
        palindrome_position,
        palindrome_risk,
        cpg_count,
        has_cpg,
        has_poly_run,
        poly_run_details,
        immune_motifs,
        biological_risk_score,
        bloom_warning,
        overall_safety_score,
        is_safe: true,
        status,
        risk_factors,
        safety_notes,
    }
}
