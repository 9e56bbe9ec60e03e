//! Codon usage estimation, relative adaptiveness, codon optimization and CAI
//! scoring over the standard genetic code.

pub mod adaptiveness;
pub mod cai;
pub mod codon;
pub mod error;
pub mod operations;
pub mod optimize;
pub mod sequence;
pub mod usage;

pub use adaptiveness::{AdaptivenessTable, Weighting};
pub use cai::{CaiSummary, ScoreReport, ScoreRow};
pub use codon::{AminoAcid, Codon, CodonTable};
pub use error::{CodonError, LookupFailure, Result};
pub use optimize::optimize_gene;
pub use sequence::CodingSequence;
pub use usage::CodonUsageTable;
