//! Codon Adaptation Index scoring.
//!
//! Each complete codon of a gene is scored with its relative adaptiveness
//! weight; the resulting series can be summarized with either the arithmetic
//! mean (what the per-codon plots report) or the geometric mean (the textbook
//! CAI). Callers choose which one to report.

use rayon::prelude::*;
use serde::Serialize;
use tracing::warn;

use crate::adaptiveness::AdaptivenessTable;
use crate::codon::{Codon, CodonTable};

/// Weight of a single triplet.
///
/// 0.0 when the triplet is not a valid codon, when its amino acid is absent
/// from the table, or when the codon is not listed in its group.
pub fn score_codon(triplet: &[u8], table: &AdaptivenessTable) -> f64 {
    let code = CodonTable::standard();
    match Codon::from_bytes(triplet) {
        Some(codon) => table
            .weight(code.translate_codon(codon), codon)
            .unwrap_or(0.0),
        None => 0.0,
    }
}

/// Score every complete codon of `gene`, aligned by position.
pub fn score_series(gene: &str, table: &AdaptivenessTable) -> Vec<f64> {
    gene.as_bytes()
        .chunks_exact(3)
        .map(|triplet| score_codon(triplet, table))
        .collect()
}

/// Score many genes against one shared table in parallel.
pub fn score_many<S>(genes: &[S], table: &AdaptivenessTable) -> Vec<Vec<f64>>
where
    S: AsRef<str> + Sync,
{
    genes
        .par_iter()
        .map(|gene| score_series(gene.as_ref(), table))
        .collect()
}

pub fn arithmetic_mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Geometric mean; 0.0 as soon as any score is 0.0.
pub fn geometric_mean(scores: &[f64]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    if scores.iter().any(|&s| s <= 0.0) {
        return Some(0.0);
    }
    let log_sum: f64 = scores.iter().map(|s| s.ln()).sum();
    Some((log_sum / scores.len() as f64).exp())
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CaiSummary {
    pub codons: usize,
    pub arithmetic: Option<f64>,
    pub geometric: Option<f64>,
}

impl CaiSummary {
    pub fn of(scores: &[f64]) -> Self {
        Self {
            codons: scores.len(),
            arithmetic: arithmetic_mean(scores),
            geometric: geometric_mean(scores),
        }
    }
}

/// One line of a score report. `position` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreRow {
    pub position: usize,
    pub original: f64,
    pub optimized: f64,
}

/// Per-codon scores of an original gene next to its optimized form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreReport {
    pub rows: Vec<ScoreRow>,
    pub original: CaiSummary,
    pub optimized: CaiSummary,
}

impl ScoreReport {
    /// Pair the two score series position by position.
    pub fn new(original: &[f64], optimized: &[f64]) -> Self {
        if original.len() != optimized.len() {
            warn!(
                original = original.len(),
                optimized = optimized.len(),
                "score series differ in length, report truncated to the shorter"
            );
        }
        let rows = original
            .iter()
            .zip(optimized)
            .enumerate()
            .map(|(i, (&o, &p))| ScoreRow {
                position: i + 1,
                original: o,
                optimized: p,
            })
            .collect();
        Self {
            rows,
            original: CaiSummary::of(original),
            optimized: CaiSummary::of(optimized),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Score `original` and `optimized` against the same table.
pub fn score_report(original: &str, optimized: &str, table: &AdaptivenessTable) -> ScoreReport {
    ScoreReport::new(
        &score_series(original, table),
        &score_series(optimized, table),
    )
}
