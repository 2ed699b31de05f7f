//! End-to-end scenarios over the full validate → index → scan flow.

use rnaguard_core::config::{RnaguardConfig, Species};
use rnaguard_core::efficacy::efficacy_score;
use rnaguard_core::index::builder::GenomeIndexer;
use rnaguard_core::index::{GenomeIndex, IndexVariant};
use rnaguard_core::pipeline::run_pipeline;
use rnaguard_core::safety::{aggregate_score, analyze_candidate};
use rnaguard_core::sequence::Sequence;
use rnaguard_core::types::{CancelToken, SafetyStatus};

fn build_index(non_target: Vec<u8>, config: &RnaguardConfig) -> GenomeIndex {
    let seq = Sequence::validate(non_target).unwrap();
    GenomeIndexer::new(config).build(&seq, &mut |_, _| {}).unwrap()
}

fn scan(target: &[u8], index: &GenomeIndex, config: &RnaguardConfig) -> rnaguard_core::PipelineOutcome {
    run_pipeline(target, index, config, &mut |_, _| {}, &CancelToken::new()).unwrap()
}

#[test]
fn toxic_candidates_are_rejected_by_the_safety_gate() {
    let config = RnaguardConfig::default();
    // Non-target carries a long poly-A run; every all-A target window shares
    // a 15-mer with it.
    let mut non_target = b"GATTACAGATTACAGATTACA".repeat(6).to_vec();
    non_target.extend_from_slice(&vec![b'A'; 30]);
    let index = build_index(non_target, &config);

    let target = vec![b'A'; 124];
    let outcome = scan(&target, &index, &config);

    assert!(outcome.metrics.safety >= 1);
    assert!(outcome
        .candidates
        .iter()
        .all(|c| !c.sequence.contains("AAAAAAAAAAAAAAA")));
    // Every window here is toxic, so nothing survives at all.
    assert!(outcome.candidates.is_empty());
    assert_eq!(outcome.metrics.safety, 124 - 21);
}

#[test]
fn stray_bytes_are_quarantined_as_data_quality() {
    let config = RnaguardConfig::default();
    let index = build_index(b"CTCTCTCTCT".repeat(15), &config);

    let mut target = vec![b'A'; 100];
    target.push(b'X');
    target.extend(vec![b'A'; 1000]);
    let outcome = scan(&target, &index, &config);

    // Exactly the 21 windows overlapping the X are quarantined.
    assert_eq!(outcome.metrics.data_quality, 21);
    assert!(outcome.candidates.iter().all(|c| !c.sequence.contains('X')));
    // Every other window proceeded into the filter chain.
    let scanned = target.len() - 21;
    assert_eq!(outcome.metrics.total() + outcome.candidates.len(), scanned);
    assert_eq!(
        outcome.metrics.safety + outcome.metrics.folding + outcome.metrics.efficacy
            + outcome.candidates.len(),
        scanned - 21
    );
}

#[test]
fn demo_candidate_scores_deterministically() {
    let candidate = b"ATGCGTGAGTGCATCTCCATC";
    let first = efficacy_score(candidate, Species::Generic, 0);
    assert!((35.0..=95.0).contains(&first));
    for _ in 0..5 {
        assert_eq!(
            efficacy_score(candidate, Species::Generic, 0).to_bits(),
            first.to_bits()
        );
    }
}

#[test]
fn hairpin_candidates_are_blocked_by_the_folding_filter() {
    let config = RnaguardConfig::default();
    let index = build_index(b"CTCTCTCTCT".repeat(15), &config);

    // First four bases equal the first four of the reverse complement.
    let hairpin = b"ATCGAAAAAAAAAAAAACGAT";
    let mut target = hairpin.to_vec();
    target.extend(b"GATTACAGAT".repeat(10));
    let outcome = scan(&target, &index, &config);

    assert!(outcome.metrics.folding >= 1);
    let hairpin_str = String::from_utf8_lossy(hairpin);
    assert!(outcome.candidates.iter().all(|c| c.sequence != hairpin_str));
}

#[test]
fn small_non_targets_use_the_exact_index() {
    let config = RnaguardConfig::default();
    let non_target: Vec<u8> = b"ACGT".iter().copied().cycle().take(1_000_000).collect();
    let index = build_index(non_target, &config);
    let stats = index.stats();
    assert_eq!(stats.variant, IndexVariant::Exact);
    // No Bloom filters: false positives are impossible.
    assert_eq!(stats.false_positive_estimate, 0.0);
}

#[test]
fn large_non_targets_use_the_probabilistic_index_with_verification() {
    let config = RnaguardConfig::default();
    let mut non_target: Vec<u8> = b"ACGT".iter().copied().cycle().take(10_000_004).collect();
    // Plant a marker so a known 15-mer exists for confirmation.
    let marker = b"GATTACAGATTACAG";
    non_target[5_000_000..5_000_000 + marker.len()].copy_from_slice(marker);
    let index = build_index(non_target, &config);

    assert_eq!(index.stats().variant, IndexVariant::Probabilistic);
    assert!(index.stats().false_positive_estimate > 0.0);

    // A candidate carrying the marker is confirmed toxic through exact
    // substring verification of the Bloom positive.
    let mut toxic = marker.to_vec();
    toxic.extend_from_slice(b"TTTTTT");
    let analysis = analyze_candidate(&toxic, &index);
    assert_eq!(analysis.status, SafetyStatus::Toxic);
    assert!(!analysis.is_safe);

    // A candidate absent from the non-target stays safe even if the filter
    // ever answers positive: verification gates the Toxic status.
    let clean = b"TTTTTTTTTTTTTTTTTTTTT";
    let analysis = analyze_candidate(clean, &index);
    assert!(analysis.is_safe);
    assert_ne!(analysis.status, SafetyStatus::Toxic);
}

#[test]
fn safety_score_arithmetic_matches_the_worked_example() {
    // max_contiguous_match 13, seed risk 30, palindrome risk 10, biological
    // risk 20: 100 - 20 - 9 - 1.5 - 2 = 67.5.
    let score = aggregate_score(13, false, 30, 10, 20);
    assert_eq!(score, 67.5);
    // Below the Seed-Warning line and below the emission floor.
    assert!(score < 80.0);
    assert!(score < 75.0);
}

#[test]
fn sub_threshold_safety_scores_reject_with_seed_warning_status() {
    let config = RnaguardConfig::default();
    // Non-target shares a 12-base fragment with the scanned window, which
    // costs 20 points, plus a seed hit.
    let mut non_target = b"CTCTCTCTCT".repeat(12).to_vec();
    non_target.extend_from_slice(b"GCATTAGCGTAA");
    let index = build_index(non_target, &config);

    let window = b"AGCATTAGCGTAAGGATCCAA";
    let analysis = analyze_candidate(window, &index);
    assert_eq!(analysis.match_length, 12);
    assert_eq!(analysis.status, SafetyStatus::SeedWarning);
    assert!(analysis.overall_safety_score < 75.0);

    // End to end, the window lands in the safety rejection counter.
    let mut target = window.to_vec();
    target.extend(b"GAAGGAAGGA".repeat(10));
    let outcome = scan(&target, &index, &config);
    assert!(outcome.metrics.safety >= 1);
    let window_str = String::from_utf8_lossy(window);
    assert!(outcome.candidates.iter().all(|c| c.sequence != window_str));
}
