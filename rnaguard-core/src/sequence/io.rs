use std::fs::File;
use std::path::Path;

use bio::io::fasta;

use crate::sequence::Sequence;
use crate::types::RnaguardError;

/// Parses an in-memory FASTA byte stream into a validated [`Sequence`].
///
/// Lines beginning with `>` are headers and are discarded; every other line
/// contributes its non-whitespace characters. Multiple records concatenate.
/// Header-less input is accepted: the stream is then treated as raw sequence
/// lines.
///
/// # Errors
///
/// Any validation error from [`Sequence::validate`].
pub fn parse_fasta_bytes(input: &[u8]) -> Result<Sequence, RnaguardError> {
    let mut bases = Vec::with_capacity(input.len());
    for line in input.split(|&b| b == b'\n') {
        if line.first() == Some(&b'>') {
            continue;
        }
        bases.extend(line.iter().copied().filter(|b| !b.is_ascii_whitespace()));
    }
    Sequence::validate(bases)
}

/// Reads a FASTA file and concatenates all of its records into one
/// validated [`Sequence`].
///
/// Record headers are diagnostic only and are not retained.
///
/// # Errors
///
/// - [`RnaguardError::Io`] when the file cannot be opened
/// - [`RnaguardError::Parse`] on malformed FASTA records
/// - any validation error from [`Sequence::validate`]
pub fn read_fasta_file<P: AsRef<Path>>(path: P) -> Result<Sequence, RnaguardError> {
    let file = File::open(path)?;
    let reader = fasta::Reader::new(file);
    let mut bases = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| RnaguardError::Parse(e.to_string()))?;
        bases.extend_from_slice(record.seq());
    }
    Sequence::validate(bases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_strips_headers_and_whitespace() {
        let input = b">record one\nACGT ACGT\nacgtacgt\n\n>record two\nTTTTAAAA\n";
        let mut fasta = Vec::new();
        // Pad with additional sequence lines to clear the minimum length.
        fasta.extend_from_slice(input);
        fasta.extend_from_slice(b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT\n");
        fasta.extend_from_slice(b"ACGTACGTACGTACGTACGTACGTACGTACGTACGTACGT\n");
        let seq = parse_fasta_bytes(&fasta).unwrap();
        assert_eq!(seq.len(), 16 + 8 + 80);
        assert!(seq.as_bytes().starts_with(b"ACGTACGTACGTACGT"));
    }

    #[test]
    fn parse_accepts_headerless_input() {
        let input: Vec<u8> = b"ACGT".iter().copied().cycle().take(120).collect();
        let seq = parse_fasta_bytes(&input).unwrap();
        assert_eq!(seq.len(), 120);
    }

    #[test]
    fn parse_rejects_header_only_input() {
        assert!(matches!(
            parse_fasta_bytes(b">just a header\n"),
            Err(RnaguardError::EmptySequence)
        ));
    }

    #[test]
    fn parse_surfaces_invalid_characters() {
        let mut input: Vec<u8> = b">r\n".to_vec();
        input.extend(b"ACGT".iter().copied().cycle().take(100));
        input.push(b'Z');
        assert!(matches!(
            parse_fasta_bytes(&input),
            Err(RnaguardError::InvalidCharacter { byte: b'Z', .. })
        ));
    }

    #[test]
    fn read_fasta_file_concatenates_records() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, ">a\n{}\n>b\n{}\n", "ACGT".repeat(20), "TTAA".repeat(20)).unwrap();
        let seq = read_fasta_file(file.path()).unwrap();
        assert_eq!(seq.len(), 160);
    }

    #[test]
    fn read_fasta_file_missing_path_is_io_error() {
        assert!(matches!(
            read_fasta_file("definitely-not-here.fasta"),
            Err(RnaguardError::Io(_))
        ));
    }
}
