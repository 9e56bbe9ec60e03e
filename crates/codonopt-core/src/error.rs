use std::fmt;

use thiserror::Error;

use crate::codon::AminoAcid;

/// Table names used in lookup errors.
pub const GENETIC_CODE_TABLE: &str = "genetic code table";
pub const ADAPTIVENESS_TABLE: &str = "relative adaptiveness table";

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CodonError {
    /// Empty or degenerate corpus.
    #[error("no data: {0}")]
    NoData(String),
    /// Frequencies did not sum to 1.0 within tolerance.
    #[error("normalization error: codon frequencies sum to {total}, expected 1.0")]
    Normalization { total: f64 },
    /// A codon or amino acid missing from a table the caller expected to cover it.
    #[error("lookup error in {table}: codon {codon} at position {position} {failure}")]
    Lookup {
        table: &'static str,
        codon: String,
        position: usize,
        failure: LookupFailure,
    },
    #[error("invalid codon: {0:?}")]
    InvalidCodon(String),
    #[error("invalid amino acid symbol: {0:?}")]
    InvalidAminoAcid(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupFailure {
    UnknownCodon,
    MissingAminoAcid(AminoAcid),
}

impl fmt::Display for LookupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LookupFailure::UnknownCodon => write!(f, "is not a valid codon"),
            LookupFailure::MissingAminoAcid(aa) => {
                write!(f, "encodes amino acid {aa}, which has no entries")
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, CodonError>;
