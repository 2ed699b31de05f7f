//! # rnaguard - RNAi Candidate Design Engine
//!
//! A deterministic design engine for RNA-interference guide strands. Given a
//! TARGET genome (the pest gene to silence) and a NON-TARGET genome (a
//! beneficial organism to protect), it emits a ranked list of 21-nt guide
//! candidates, each carrying a multi-criterion safety and efficacy
//! evaluation.
//!
//! ## Overview
//!
//! The engine validates both inputs, builds a memory-bounded k-mer index of
//! the non-target (exact sets for small genomes, Bloom filters plus retained
//! verification text for large ones), then slides a 21-nt window across the
//! target. Each window passes through a filter chain - data quality, a
//! five-layer safety firewall, a hairpin heuristic, and a twelve-rule
//! efficacy score - and survivors are ranked by efficacy.
//!
//! ## Quick Start
//!
//! ```rust
//! use rnaguard_core::{config::RnaguardConfig, engine::RnaguardAnalyzer};
//!
//! let analyzer = RnaguardAnalyzer::new(RnaguardConfig::default());
//! let target = b"ATGCGTGAGTGCATCTCCATCAAGGTTGAACTGGAAGTTCAG".repeat(5);
//! let non_target = b"CTCTCTCTCT".repeat(15);
//!
//! let results = analyzer.analyze_bytes(&target, &non_target)?;
//! for candidate in &results.candidates {
//!     println!("{} @{} efficacy {:.2}", candidate.sequence,
//!              candidate.position, candidate.efficacy);
//! }
//! # Ok::<(), rnaguard_core::types::RnaguardError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`config`]: run configuration (threshold, species, retention policy)
//! - [`sequence`]: validated sequences, FASTA parsing, strand operations
//! - [`index`]: exact and probabilistic non-target indices
//! - [`safety`]: the five-layer safety firewall
//! - [`efficacy`]: the twelve-rule efficacy score
//! - [`folding`]: the hairpin-initiation heuristic
//! - [`pipeline`]: the streaming candidate scanner
//! - [`engine`]: the high-level analyzer facade
//! - [`output`]: CSV and report writers
//!
//! ## Determinism
//!
//! Every score is a pure function of its arguments; there is no ambient
//! randomness. With the exact index variant, identical inputs produce
//! byte-identical outputs. The probabilistic variant may add unconfirmed
//! index warnings, but a Bloom positive never marks a candidate toxic
//! without exact verification against retained non-target text.
//!
//! ## Error Handling
//!
//! All fallible operations return [`Result<T, RnaguardError>`](types::RnaguardError).
//! Per-candidate anomalies are reported as fields on the safety analysis,
//! never raised; cancellation is a flag on the pipeline outcome.

pub mod config;
pub mod constants;
pub mod efficacy;
pub mod engine;
pub mod folding;
pub mod index;
pub mod kmer;
pub mod output;
pub mod pipeline;
pub mod results;
pub mod safety;
pub mod sequence;
pub mod types;

pub use engine::RnaguardAnalyzer;
pub use pipeline::{run_pipeline, Candidate, PipelineOutcome};
pub use types::{CancelToken, RejectionMetrics, RnaguardError, SafetyStatus};
