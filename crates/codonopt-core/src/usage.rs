//! Codon usage estimation over a reference corpus.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::codon::Codon;
use crate::error::{CodonError, Result};
use crate::sequence::CodingSequence;

/// Allowed deviation of the frequency total from 1.0.
pub const FREQUENCY_TOLERANCE: f64 = 1e-6;

/// Raw codon frequencies observed in a corpus.
///
/// Holds one entry per codon that occurred at least once. Frequencies are
/// `count / total` and sum to 1.0 within [`FREQUENCY_TOLERANCE`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CodonUsageTable {
    counts: BTreeMap<Codon, u64>,
    frequencies: BTreeMap<Codon, f64>,
    total: u64,
    /// In-frame triplets that were not valid codons (ambiguity symbols etc).
    skipped: u64,
}

impl CodonUsageTable {
    /// Estimate usage from raw nucleotide strings.
    ///
    /// Each sequence is split into consecutive triplets from offset 0, read
    /// case-insensitively; a trailing fragment shorter than three symbols is
    /// dropped.
    ///
    /// # Errors
    ///
    /// [`CodonError::NoData`] for an empty corpus or one without a single
    /// complete codon, [`CodonError::Normalization`] if the frequencies do not
    /// sum to 1.0.
    pub fn estimate<I, S>(sequences: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut tally = Tally::default();
        for seq in sequences {
            tally.add_record(seq.as_ref().as_bytes().chunks_exact(3));
        }
        tally.finish()
    }

    /// Estimate usage from corpus records, one reading frame per record.
    pub fn from_corpus(corpus: &[CodingSequence]) -> Result<Self> {
        let mut tally = Tally::default();
        for record in corpus {
            tally.add_record(record.triplets());
        }
        tally.finish()
    }

    /// Frequency of a codon, 0.0 if never observed.
    pub fn frequency(&self, codon: Codon) -> f64 {
        self.frequencies.get(&codon).copied().unwrap_or(0.0)
    }

    pub fn count(&self, codon: Codon) -> u64 {
        self.counts.get(&codon).copied().unwrap_or(0)
    }

    /// Number of codons counted across the corpus.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Number of distinct codons observed.
    pub fn len(&self) -> usize {
        self.frequencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frequencies.is_empty()
    }

    pub fn total_frequency(&self) -> f64 {
        self.frequencies.values().sum()
    }

    /// Observed codons and their frequencies in canonical order.
    pub fn iter(&self) -> impl Iterator<Item = (Codon, f64)> + '_ {
        self.frequencies.iter().map(|(&c, &f)| (c, f))
    }
}

#[derive(Default)]
struct Tally {
    counts: BTreeMap<Codon, u64>,
    total: u64,
    skipped: u64,
    records: usize,
}

impl Tally {
    fn add_record<'a>(&mut self, triplets: impl Iterator<Item = &'a [u8]>) {
        self.records += 1;
        for triplet in triplets {
            match Codon::from_bytes(triplet) {
                Some(codon) => {
                    *self.counts.entry(codon).or_insert(0) += 1;
                    self.total += 1;
                }
                None => self.skipped += 1,
            }
        }
    }

    fn finish(self) -> Result<CodonUsageTable> {
        let Tally {
            counts,
            total,
            skipped,
            records,
        } = self;

        if records == 0 {
            return Err(CodonError::NoData("corpus contains no sequences".to_string()));
        }
        if total == 0 {
            return Err(CodonError::NoData(format!(
                "corpus of {records} sequences contains no complete codons"
            )));
        }

        let frequencies: BTreeMap<Codon, f64> = counts
            .iter()
            .map(|(&codon, &count)| (codon, count as f64 / total as f64))
            .collect();

        let sum: f64 = frequencies.values().sum();
        if (sum - 1.0).abs() > FREQUENCY_TOLERANCE {
            return Err(CodonError::Normalization { total: sum });
        }

        debug!(
            records,
            codons = total,
            distinct = counts.len(),
            skipped,
            "estimated codon usage"
        );

        Ok(CodonUsageTable {
            counts,
            frequencies,
            total,
            skipped,
        })
    }
}
