//! Per-amino-acid relative adaptiveness (synonymous codon weights).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::codon::{AminoAcid, Codon, CodonTable};
use crate::usage::CodonUsageTable;

/// How codon frequencies are rescaled within an amino acid group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Weighting {
    /// Divide by the group total, so the synonyms of each amino acid sum to 1.0.
    #[default]
    GroupSum,
    /// Divide by the group maximum, so the most used synonym has weight 1.0.
    MaxRelative,
}

/// Synonymous codon weights grouped by encoded amino acid.
///
/// Both levels iterate in canonical order (amino acids by symbol, codons
/// A < C < G < T), which makes best-synonym selection reproducible.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdaptivenessTable {
    groups: BTreeMap<AminoAcid, BTreeMap<Codon, f64>>,
}

impl AdaptivenessTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Group observed codons by amino acid and rescale each group.
    ///
    /// A group whose total (or maximum, for [`Weighting::MaxRelative`]) is
    /// exactly zero keeps its zero weights.
    pub fn from_usage(usage: &CodonUsageTable, code: &CodonTable, weighting: Weighting) -> Self {
        let mut groups: BTreeMap<AminoAcid, BTreeMap<Codon, f64>> = BTreeMap::new();
        for (codon, freq) in usage.iter() {
            groups
                .entry(code.translate_codon(codon))
                .or_default()
                .insert(codon, freq);
        }

        for codons in groups.values_mut() {
            let scale = match weighting {
                Weighting::GroupSum => codons.values().sum::<f64>(),
                Weighting::MaxRelative => codons.values().copied().fold(0.0, f64::max),
            };
            if scale > 0.0 {
                for weight in codons.values_mut() {
                    *weight /= scale;
                }
            }
        }

        debug!(amino_acids = groups.len(), ?weighting, "built adaptiveness table");
        Self { groups }
    }

    /// Set the weight of `codon` within the group of `aa`.
    pub fn insert(&mut self, aa: AminoAcid, codon: Codon, weight: f64) {
        self.groups.entry(aa).or_default().insert(codon, weight);
    }

    pub fn group(&self, aa: AminoAcid) -> Option<&BTreeMap<Codon, f64>> {
        self.groups.get(&aa)
    }

    pub fn contains(&self, aa: AminoAcid) -> bool {
        self.groups.contains_key(&aa)
    }

    /// Weight of `codon` inside the group of `aa`, if listed.
    pub fn weight(&self, aa: AminoAcid, codon: Codon) -> Option<f64> {
        self.groups.get(&aa)?.get(&codon).copied()
    }

    /// Highest-weighted synonym for `aa`.
    ///
    /// Ties go to the first codon in canonical order: a later synonym only
    /// replaces the current best when its weight is strictly greater.
    pub fn best_codon(&self, aa: AminoAcid) -> Option<(Codon, f64)> {
        let mut best: Option<(Codon, f64)> = None;
        for (&codon, &weight) in self.groups.get(&aa)? {
            match best {
                Some((_, w)) if weight <= w => {}
                _ => best = Some((codon, weight)),
            }
        }
        best
    }

    /// Sum of the weights of one group.
    pub fn group_total(&self, aa: AminoAcid) -> Option<f64> {
        self.groups.get(&aa).map(|codons| codons.values().sum())
    }

    pub fn iter(&self) -> impl Iterator<Item = (AminoAcid, &BTreeMap<Codon, f64>)> {
        self.groups.iter().map(|(&aa, codons)| (aa, codons))
    }

    /// Number of amino acid groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
