//! # rnaguard CLI - RNAi Candidate Designer
//!
//! Command-line front-end for the rnaguard design engine.
//!
//! ## Usage
//!
//! ```bash
//! # Basic design run, CSV to stdout
//! rnaguard -t pest.fasta -n pollinator.fasta
//!
//! # Stricter efficacy threshold, CSV to a file
//! rnaguard -t pest.fasta -n pollinator.fasta -e 80 -o candidates.csv
//!
//! # Coleopteran target with a human-readable report
//! rnaguard -t pest.fasta -n pollinator.fasta -s coleoptera -f report
//!
//! # Sample-based verification for very large non-targets
//! rnaguard -t pest.fasta -n big_genome.fasta --retention samples
//! ```
//!
//! ## Options
//!
//! - `-t, --target <FILE>`: Target (pest) FASTA file
//! - `-n, --non-target <FILE>`: Non-target (protected organism) FASTA file
//! - `-o, --output <FILE>`: Output file (default: stdout)
//! - `-f, --format <FORMAT>`: Output format: csv or report (default: csv)
//! - `-e, --threshold <SCORE>`: Efficacy threshold 50-99 (default: 70)
//! - `-s, --species <SPECIES>`: lepidoptera, coleoptera, or generic
//! - `--retention <POLICY>`: Verification retention: full or samples
//! - `-l, --log-level <LEVEL>`: info, debug, or error (default: info)

use std::fs::File;
use std::io::{self, BufWriter, Write};

use clap::{Arg, Command};
use log::{info, warn};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};

use rnaguard_core::config::RnaguardConfig;
use rnaguard_core::output::{write_results, OutputFormat};
use rnaguard_core::types::CancelToken;
use rnaguard_core::RnaguardAnalyzer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = Command::new("rnaguard")
        .version(env!("CARGO_PKG_VERSION"))
        .about("RNAi guide-strand candidate designer with a non-target safety firewall")
        .arg(
            Arg::new("target")
                .short('t')
                .long("target")
                .value_name("FILE")
                .required(true)
                .help("Target (pest) FASTA file"),
        )
        .arg(
            Arg::new("non-target")
                .short('n')
                .long("non-target")
                .value_name("FILE")
                .required(true)
                .help("Non-target (protected organism) FASTA file"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .help("Output format: csv or report")
                .default_value("csv"),
        )
        .arg(
            Arg::new("threshold")
                .short('e')
                .long("threshold")
                .value_name("SCORE")
                .help("Efficacy threshold (50-99)")
                .default_value("70"),
        )
        .arg(
            Arg::new("species")
                .short('s')
                .long("species")
                .value_name("SPECIES")
                .help("Target order: lepidoptera, coleoptera, or generic")
                .default_value("lepidoptera"),
        )
        .arg(
            Arg::new("retention")
                .long("retention")
                .value_name("POLICY")
                .help("Verification retention for large non-targets: full or samples")
                .default_value("full"),
        )
        .arg(
            Arg::new("log-level")
                .short('l')
                .long("log-level")
                .value_name("LEVEL")
                .help("Log level: info, debug, or error")
                .default_value("info"),
        )
        .get_matches();

    let level = match matches.get_one::<String>("log-level").unwrap().as_str() {
        "info" => LevelFilter::Info,
        "debug" => LevelFilter::Debug,
        "error" => LevelFilter::Error,
        other => return Err(format!("Log level must be info, debug, or error, got '{other}'").into()),
    };
    // Logs go to stderr; stdout stays clean for CSV output.
    let _ = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Auto,
    );

    let config = RnaguardConfig {
        efficacy_threshold: matches
            .get_one::<String>("threshold")
            .unwrap()
            .parse()
            .map_err(|_| "Invalid efficacy threshold")?,
        species: matches.get_one::<String>("species").unwrap().parse()?,
        retention: matches.get_one::<String>("retention").unwrap().parse()?,
        ..Default::default()
    };
    config.validate()?;

    let format = match matches.get_one::<String>("format").unwrap().as_str() {
        "csv" => OutputFormat::Csv,
        "report" => OutputFormat::Report,
        other => return Err(format!("Invalid output format '{other}'").into()),
    };

    let target_path = matches.get_one::<String>("target").unwrap();
    let non_target_path = matches.get_one::<String>("non-target").unwrap();

    info!("Designing candidates: target={target_path} non-target={non_target_path}");

    let analyzer = RnaguardAnalyzer::new(config);
    let mut last_phase = String::new();
    let results = analyzer.analyze_files(
        target_path,
        non_target_path,
        &mut |fraction, phase| {
            if phase != last_phase {
                info!("{phase}");
                last_phase = phase.to_string();
            }
            log::debug!("{phase}: {:.0}%", fraction * 100.0);
        },
        &CancelToken::new(),
    )?;

    for warning in &results.target_info.warnings {
        warn!("target: {warning}");
    }

    let mut writer: Box<dyn Write> = if let Some(output_file) = matches.get_one::<String>("output")
    {
        Box::new(BufWriter::new(File::create(output_file)?))
    } else {
        Box::new(BufWriter::new(io::stdout()))
    };
    write_results(&mut writer, &results, format)?;
    writer.flush()?;

    info!(
        "Design complete: {} candidates, rejections {} safety / {} folding / {} efficacy / {} data quality ({} index)",
        results.candidates.len(),
        results.metrics.safety,
        results.metrics.folding,
        results.metrics.efficacy,
        results.metrics.data_quality,
        results.index_stats.variant
    );

    Ok(())
}
