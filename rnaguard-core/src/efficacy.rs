//! Deterministic efficacy scoring for 21-nt guide candidates.
//!
//! Twelve additive rules over base composition, position-specific identity,
//! end thermodynamics, repeats, and fold risk, starting from a base of 50
//! and clamped to [35, 95]. The final rule adds a hash-derived variance so
//! ties break deterministically without any ambient randomness.

use crate::config::Species;
use crate::constants::{EFFICACY_MAX, EFFICACY_MIN, GC_MAX, GC_MIN, GC_OPTIMUM};
use crate::sequence::gc_percent;

const BASE_SCORE: f64 = 50.0;

#[inline]
fn is_au(b: u8) -> bool {
    matches!(b, b'A' | b'T' | b'U')
}

#[inline]
fn is_gc(b: u8) -> bool {
    matches!(b, b'G' | b'C')
}

/// Normalize a dinucleotide to DNA spelling for table lookups.
#[inline]
fn fold_pair(pair: &[u8]) -> [u8; 2] {
    let f = |b: u8| if b == b'U' { b'T' } else { b };
    [f(pair[0]), f(pair[1])]
}

/// Rule 1: Gaussian-like GC-content preference peaking at 41%.
fn gc_contribution(gc: f64) -> f64 {
    if (GC_MIN..=GC_MAX).contains(&gc) {
        15.0 - 0.5 * (gc - GC_OPTIMUM).abs()
    } else if (25.0..=60.0).contains(&gc) {
        5.0
    } else if gc < 25.0 {
        -0.5 * (25.0 - gc)
    } else {
        -0.8 * (gc - 60.0)
    }
}

/// Rule 2: position-specific nucleotide preferences (1-indexed table).
fn position_contribution(candidate: &[u8]) -> f64 {
    let mut score = 0.0;
    let base = |i: usize| candidate[i];

    // Position 1
    if is_gc(base(0)) {
        score -= 2.0;
    }
    // Position 3
    score += match base(2) {
        b'A' => 3.0,
        b'T' | b'U' => 1.0,
        _ => -1.0,
    };
    // Position 7
    score += match base(6) {
        b'A' => 1.0,
        b'G' | b'C' => -1.0,
        _ => 0.0,
    };
    // Position 10
    score += match base(9) {
        b'A' => 3.0,
        b'T' | b'U' => 2.0,
        _ => -2.0,
    };
    // Position 13
    score += match base(12) {
        b'G' => -2.0,
        _ => -1.0,
    };
    // Position 19
    score += match base(18) {
        b'A' => 3.0,
        b'T' | b'U' => 2.0,
        _ => -3.0,
    };
    score
}

/// Pairing-energy proxy of a 4-nt end region.
fn end_energy(window: &[u8]) -> f64 {
    window
        .iter()
        .map(|&b| if is_au(b) { -2.0 } else { -3.0 })
        .sum()
}

/// Rule 3: thermodynamic asymmetry between the two ends.
fn asymmetry_contribution(candidate: &[u8]) -> f64 {
    let five_prime = end_energy(&candidate[..4]);
    let three_prime = end_energy(&candidate[candidate.len() - 4..]);
    let asymmetry = three_prime - five_prime;
    if asymmetry > 2.0 {
        8.0
    } else if asymmetry > 0.0 {
        4.0
    } else if asymmetry < -2.0 {
        -6.0
    } else {
        0.0
    }
}

/// Rule 4: A/U enrichment in positions 15-19.
fn three_prime_au_contribution(candidate: &[u8]) -> f64 {
    let au = candidate[14..19].iter().filter(|&&b| is_au(b)).count();
    match au {
        4.. => 6.0,
        3 => 3.0,
        2 => 0.0,
        _ => -5.0,
    }
}

/// Rules 5 and 6: the two critical single positions.
fn terminal_preference_contribution(candidate: &[u8]) -> f64 {
    let mut score = if is_au(candidate[0]) { 5.0 } else { -3.0 };
    score += match candidate[18] {
        b'A' | b'T' | b'U' => 4.0,
        b'G' => -5.0,
        _ => -3.0,
    };
    score
}

/// Rule 7: dinucleotide identity at the endpoints.
fn dinucleotide_contribution(candidate: &[u8]) -> f64 {
    let len = candidate.len();
    let pairs = [
        &candidate[0..2],
        &candidate[len - 3..len - 1],
        &candidate[len - 2..len],
    ];
    let mut score = 0.0;
    for pair in pairs {
        score += match &fold_pair(pair) {
            b"AA" | b"AT" | b"TA" | b"TT" => 2.0,
            b"GC" | b"CG" => -2.0,
            b"GG" | b"CC" => -1.0,
            _ => 0.0,
        };
    }
    score
}

/// Rule 8: tandem-repeat and homopolymer penalty, capped at 20.
fn repeat_penalty(candidate: &[u8]) -> f64 {
    let len = candidate.len();
    let mut penalty = 0.0;
    let mut i = 0;
    while i + 4 <= len {
        if candidate[i..i + 2] == candidate[i + 2..i + 4] {
            if i + 6 <= len && candidate[i + 4..i + 6] == candidate[i..i + 2] {
                penalty += 5.0;
                i += 6;
            } else {
                penalty += 2.0;
                i += 4;
            }
        } else if i + 9 <= len
            && candidate[i..i + 3] == candidate[i + 3..i + 6]
            && candidate[i + 3..i + 6] == candidate[i + 6..i + 9]
        {
            penalty += 3.0;
            i += 9;
        } else {
            i += 1;
        }
    }

    let mut run_start = 0;
    for i in 1..=len {
        if i == len || candidate[i] != candidate[run_start] {
            let run = i - run_start;
            if run >= 4 {
                penalty += 2.0 * run as f64;
            }
            run_start = i;
        }
    }

    penalty.min(20.0)
}

/// Rule 9: G-quadruplex avoidance.
fn quadruplex_contribution(candidate: &[u8]) -> f64 {
    if candidate.windows(4).any(|w| w == b"GGGG") {
        -10.0
    } else if candidate.windows(3).any(|w| w == b"GGG") {
        -3.0
    } else {
        0.0
    }
}

/// Rule 11: central GC enrichment for lepidopteran/coleopteran targets.
fn species_contribution(candidate: &[u8], species: Species) -> f64 {
    if !species.uses_central_gc_rule() {
        return 0.0;
    }
    let gc = candidate[8..14].iter().filter(|&&b| is_gc(b)).count();
    match gc {
        4.. => 4.0,
        0 | 1 => -2.0,
        _ => 0.0,
    }
}

/// Rule 12: hash-derived variance in [-2, +2] for deterministic tie
/// smoothing.
fn variance_contribution(candidate: &[u8]) -> f64 {
    let mut hash: i32 = 0;
    for &b in candidate {
        hash = hash.wrapping_mul(31).wrapping_add(i32::from(b));
    }
    ((hash.unsigned_abs() % 100) as f64 / 100.0 - 0.5) * 4.0
}

/// Deterministic efficacy score for a 21-nt candidate, clamped to [35, 95].
///
/// Pure in all of its arguments; identical inputs always produce identical
/// scores.
#[must_use]
pub fn efficacy_score(candidate: &[u8], species: Species, fold_risk: u32) -> f64 {
    debug_assert_eq!(candidate.len(), 21);

    let mut score = BASE_SCORE;
    score += gc_contribution(gc_percent(candidate));
    score += position_contribution(candidate);
    score += asymmetry_contribution(candidate);
    score += three_prime_au_contribution(candidate);
    score += terminal_preference_contribution(candidate);
    score += dinucleotide_contribution(candidate);
    score -= repeat_penalty(candidate);
    score += quadruplex_contribution(candidate);
    score -= f64::from(fold_risk) * 0.1;
    score += species_contribution(candidate, species);
    score += variance_contribution(candidate);

    score.clamp(EFFICACY_MIN, EFFICACY_MAX)
}
