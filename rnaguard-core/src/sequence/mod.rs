//! Validated nucleotide sequences and the strand operations built on them.

pub mod io;

use crate::constants::{
    MAX_GENOME_SIZE, MIN_GENOME_SIZE, N_WARNING_FRACTION, N_WARNING_PREFIX,
};
use crate::types::RnaguardError;

/// 256-entry complement LUT: A↔T, G↔C, U→A, N→N, 0 for anything else.
static COMPLEMENT_LUT: [u8; 256] = {
    let mut t = [0u8; 256];
    t[b'A' as usize] = b'T';
    t[b'T' as usize] = b'A';
    t[b'U' as usize] = b'A';
    t[b'G' as usize] = b'C';
    t[b'C' as usize] = b'G';
    t[b'N' as usize] = b'N';
    t
};

/// Reverse complement of an upper-case sequence.
///
/// `U` maps to `A` (the RNA base pairs with adenine); the output is always
/// DNA-typed. Bytes without a defined complement are preserved so the
/// operation stays total over validated sequences.
#[must_use]
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence
        .iter()
        .rev()
        .map(|&b| {
            let c = COMPLEMENT_LUT[b as usize];
            if c == 0 {
                b
            } else {
                c
            }
        })
        .collect()
}

/// GC percentage of a window, ignoring ambiguous bases in the denominator.
#[must_use]
pub fn gc_percent(window: &[u8]) -> f64 {
    let mut gc = 0usize;
    let mut counted = 0usize;
    for &b in window {
        match b {
            b'G' | b'C' => {
                gc += 1;
                counted += 1;
            }
            b'A' | b'T' | b'U' => counted += 1,
            _ => {}
        }
    }
    if counted == 0 {
        0.0
    } else {
        gc as f64 / counted as f64 * 100.0
    }
}

/// A validated, immutable nucleotide sequence.
///
/// Construction normalizes case and enforces the alphabet and size bounds;
/// after that the bytes never change. Validation warnings (currently only
/// high ambiguous-base content) ride along without affecting computation.
#[derive(Debug, Clone)]
pub struct Sequence {
    bytes: Vec<u8>,
    warnings: Vec<String>,
}

impl Sequence {
    /// Validates raw nucleotide bytes into a [`Sequence`].
    ///
    /// Input is upper-cased in place. The accepted alphabet is
    /// {A, C, G, T, U, N}.
    ///
    /// # Errors
    ///
    /// - [`RnaguardError::EmptySequence`] when no bytes remain
    /// - [`RnaguardError::SequenceTooShort`] below 100 bases
    /// - [`RnaguardError::SequenceTooLarge`] above 500,000,000 bases
    /// - [`RnaguardError::InvalidCharacter`] on the first byte outside the alphabet
    pub fn validate(mut bytes: Vec<u8>) -> Result<Self, RnaguardError> {
        if bytes.is_empty() {
            return Err(RnaguardError::EmptySequence);
        }
        if bytes.len() < MIN_GENOME_SIZE {
            return Err(RnaguardError::SequenceTooShort {
                length: bytes.len(),
                minimum: MIN_GENOME_SIZE,
            });
        }
        if bytes.len() > MAX_GENOME_SIZE {
            return Err(RnaguardError::SequenceTooLarge {
                length: bytes.len(),
                maximum: MAX_GENOME_SIZE,
            });
        }

        for (position, b) in bytes.iter_mut().enumerate() {
            let upper = b.to_ascii_uppercase();
            match upper {
                b'A' | b'C' | b'G' | b'T' | b'U' | b'N' => *b = upper,
                _ => {
                    return Err(RnaguardError::InvalidCharacter {
                        byte: *b,
                        position,
                    })
                }
            }
        }

        let mut warnings = Vec::new();
        let prefix = &bytes[..bytes.len().min(N_WARNING_PREFIX)];
        let n_count = prefix.iter().filter(|&&b| b == b'N').count();
        let n_fraction = n_count as f64 / prefix.len() as f64;
        if n_fraction > N_WARNING_FRACTION {
            warnings.push(format!(
                "High ambiguous-base content: {:.1}% N over the first {} bases",
                n_fraction * 100.0,
                prefix.len()
            ));
        }

        Ok(Self { bytes, warnings })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// A validated sequence is never empty, but the conventional pair of
    /// accessors is kept for slice-like use.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Warnings attached during validation. Informational only.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    /// GC percentage over the whole sequence.
    #[must_use]
    pub fn gc_content(&self) -> f64 {
        gc_percent(&self.bytes)
    }
}
