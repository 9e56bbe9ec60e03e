pub mod codon_usage;
pub mod detect;
pub mod fasta;
pub mod json;
pub mod report;

use codonopt_core::{AdaptivenessTable, CodingSequence, CodonTable, CodonUsageTable, Weighting};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    #[error("line {line}: {message}")]
    InvalidLine { line: usize, message: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Codon(#[from] codonopt_core::CodonError),
}

impl ParseError {
    pub(crate) fn at_line(line: usize, message: impl Into<String>) -> Self {
        ParseError::InvalidLine {
            line,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Fasta,
    CodonUsage,
    Json,
    RawSequence,
    Unknown,
}

/// Parse a reference corpus. Only FASTA carries record identifiers.
pub fn parse_corpus(content: &str) -> Result<Vec<CodingSequence>, ParseError> {
    match detect::detect_format(content) {
        FileFormat::Fasta => fasta::parse(content),
        FileFormat::RawSequence => Ok(vec![CodingSequence::new(
            "sequence_1",
            detect::strip_whitespace(content),
        )]),
        _ => Err(ParseError::InvalidFormat(
            "Unsupported or unrecognized corpus format".to_string(),
        )),
    }
}

/// Load a relative adaptiveness table from a saved table, its JSON export,
/// or a FASTA corpus (estimated on the fly with `weighting`).
pub fn load_table(content: &str, weighting: Weighting) -> Result<AdaptivenessTable, ParseError> {
    match detect::detect_format(content) {
        FileFormat::CodonUsage => codon_usage::parse(content),
        FileFormat::Json => json::table_from_json(content),
        FileFormat::Fasta => {
            let corpus = fasta::parse(content)?;
            let usage = CodonUsageTable::from_corpus(&corpus)?;
            Ok(AdaptivenessTable::from_usage(
                &usage,
                CodonTable::standard(),
                weighting,
            ))
        }
        _ => Err(ParseError::InvalidFormat(
            "Expected a codon usage table, JSON export or FASTA corpus".to_string(),
        )),
    }
}

/// Read a foreign gene: the first record of a FASTA file, or a bare
/// nucleotide string with all whitespace removed.
pub fn parse_gene(content: &str) -> Result<String, ParseError> {
    match detect::detect_format(content) {
        FileFormat::Fasta => {
            let mut records = fasta::parse(content)?;
            if records.len() > 1 {
                tracing::warn!(
                    records = records.len(),
                    "gene input has several records, using the first"
                );
            }
            Ok(records.swap_remove(0).sequence)
        }
        FileFormat::RawSequence => Ok(detect::strip_whitespace(content)),
        _ => Err(ParseError::InvalidFormat(
            "Gene input is neither FASTA nor a nucleotide string".to_string(),
        )),
    }
}
