use tracing::debug;

use crate::adaptiveness::AdaptivenessTable;
use crate::codon::{Codon, CodonTable};
use crate::error::{CodonError, LookupFailure, Result, ADAPTIVENESS_TABLE, GENETIC_CODE_TABLE};

/// Recode `gene` with the best synonym for every complete codon.
///
/// The gene is upper-cased; a trailing partial codon is dropped, so the
/// result has length `3 * (gene.len() / 3)`.
///
/// # Errors
///
/// [`CodonError::Lookup`] naming the codon and its 1-based codon position
/// when a triplet is not a valid codon, or when its amino acid has no
/// entries in `table`.
pub fn optimize_gene(gene: &str, table: &AdaptivenessTable) -> Result<String> {
    let code = CodonTable::standard();
    let upper = gene.to_ascii_uppercase();
    let mut optimized = String::with_capacity(upper.len());
    let mut changed = 0usize;

    for (i, triplet) in upper.as_bytes().chunks_exact(3).enumerate() {
        let position = i + 1;
        let codon = Codon::from_bytes(triplet).ok_or_else(|| CodonError::Lookup {
            table: GENETIC_CODE_TABLE,
            codon: String::from_utf8_lossy(triplet).into_owned(),
            position,
            failure: LookupFailure::UnknownCodon,
        })?;
        let aa = code.translate_codon(codon);
        let (best, _) = table.best_codon(aa).ok_or_else(|| CodonError::Lookup {
            table: ADAPTIVENESS_TABLE,
            codon: codon.to_string(),
            position,
            failure: LookupFailure::MissingAminoAcid(aa),
        })?;
        if best != codon {
            changed += 1;
        }
        optimized.extend(best.as_bytes().iter().map(|&b| char::from(b)));
    }

    debug!(
        codons = upper.len() / 3,
        changed,
        dropped = upper.len() % 3,
        "optimized gene"
    );
    Ok(optimized)
}

/// Best synonym for a single codon, `None` when its amino acid is absent.
pub fn best_synonym(codon: Codon, table: &AdaptivenessTable) -> Option<Codon> {
    let aa = CodonTable::standard().translate_codon(codon);
    table.best_codon(aa).map(|(best, _)| best)
}
