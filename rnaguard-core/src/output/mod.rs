//! Output formatting for design results.
//!
//! Two writers: the stable-field-order CSV consumed by external tooling and
//! a human-readable run report. Both take any [`Write`] sink.

use std::io::Write;

use crate::results::RnaguardResults;
use crate::types::RnaguardError;

mod formats {
    pub mod csv;
    pub mod report;
}

use formats::{csv::write_csv_format, report::write_report_format};

/// Output format selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Comma-separated candidates in the stable field order
    Csv,
    /// Human-readable run summary with ranked candidates
    Report,
}

/// Writes design results in the requested format.
///
/// # Errors
///
/// [`RnaguardError::Io`] when the sink fails.
pub fn write_results<W: Write>(
    writer: &mut W,
    results: &RnaguardResults,
    format: OutputFormat,
) -> Result<(), RnaguardError> {
    match format {
        OutputFormat::Csv => write_csv_format(writer, results),
        OutputFormat::Report => write_report_format(writer, results),
    }
}
