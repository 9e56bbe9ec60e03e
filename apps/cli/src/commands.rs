use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codonopt_core::{
    cai, operations, optimize_gene, AdaptivenessTable, CodingSequence, CodonError, CodonTable,
    CodonUsageTable, Weighting,
};
use codonopt_formats::{codon_usage, fasta, json, report};
use codonopt_lookup::{HttpTransport, LookupConfig, LookupSummary};
use tracing::{info, warn};

pub const TABLE_FILE: &str = "codon_usage.txt";
pub const TABLE_JSON_FILE: &str = "codon_usage.json";
pub const OPTIMIZED_FILE: &str = "optimized_seq.txt";
pub const OPTIMIZED_FASTA_FILE: &str = "optimized_seq.fasta";
pub const SCORES_FILE: &str = "cai_values.txt";
pub const SCORES_JSON_FILE: &str = "cai_values.json";

#[derive(Debug, Clone)]
pub struct UsageConfig {
    pub corpus: PathBuf,
    pub out_dir: PathBuf,
    pub precision: Option<usize>,
    pub weighting: Weighting,
    pub json: bool,
}

/// Where the optimizer gets its adaptiveness table from.
#[derive(Debug, Clone)]
pub enum TableSource {
    Saved(PathBuf),
    Corpus(PathBuf),
}

#[derive(Debug, Clone)]
pub struct OptimizeConfig {
    pub gene: PathBuf,
    pub table: TableSource,
    pub out_dir: PathBuf,
    pub weighting: Weighting,
    pub fasta: bool,
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct ScoreConfig {
    pub gene: PathBuf,
    pub table: PathBuf,
    pub weighting: Weighting,
}

fn read(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn write(dir: &Path, name: &str, contents: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(path)
}

fn create_out_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir)
        .with_context(|| format!("failed to create output directory {}", dir.display()))
}

fn load_table(source: &TableSource, weighting: Weighting) -> Result<AdaptivenessTable> {
    let path = match source {
        TableSource::Saved(path) | TableSource::Corpus(path) => path,
    };
    let content = read(path)?;
    let table = match source {
        TableSource::Saved(_) => codonopt_formats::load_table(&content, weighting),
        TableSource::Corpus(_) => codonopt_formats::parse_corpus(&content).and_then(|corpus| {
            let usage = CodonUsageTable::from_corpus(&corpus)?;
            Ok(AdaptivenessTable::from_usage(&usage, CodonTable::standard(), weighting))
        }),
    };
    table.with_context(|| format!("failed to load codon usage from {}", path.display()))
}

/// Estimate codon usage from a corpus and save the adaptiveness table.
pub fn run_usage(config: &UsageConfig) -> Result<AdaptivenessTable> {
    let content = read(&config.corpus)?;
    let corpus = codonopt_formats::parse_corpus(&content)
        .with_context(|| format!("failed to parse corpus {}", config.corpus.display()))?;
    let usage = CodonUsageTable::from_corpus(&corpus)?;
    info!(
        "Counted {} codons ({} distinct) across {} sequences",
        usage.total(),
        usage.len(),
        corpus.len()
    );
    let table = AdaptivenessTable::from_usage(&usage, CodonTable::standard(), config.weighting);

    create_out_dir(&config.out_dir)?;
    write(
        &config.out_dir,
        TABLE_FILE,
        &codon_usage::serialize(&table, config.precision),
    )?;
    if config.json {
        write(&config.out_dir, TABLE_JSON_FILE, &json::table_to_json(&table)?)?;
    }
    Ok(table)
}

/// Optimize a gene, then score it next to the original.
pub fn run_optimize(config: &OptimizeConfig) -> Result<String> {
    let table = load_table(&config.table, config.weighting)?;
    let gene = codonopt_formats::parse_gene(&read(&config.gene)?)
        .with_context(|| format!("failed to parse gene {}", config.gene.display()))?;
    let optimized = optimize_gene(&gene, &table)
        .with_context(|| format!("failed to optimize {}", config.gene.display()))?;

    create_out_dir(&config.out_dir)?;
    write(&config.out_dir, OPTIMIZED_FILE, &optimized)?;
    if config.fasta {
        let name = config
            .gene
            .file_stem()
            .map(|s| format!("{}_optimized", s.to_string_lossy()))
            .unwrap_or_else(|| "optimized".to_string());
        let record = CodingSequence::new(name, optimized.clone());
        write(&config.out_dir, OPTIMIZED_FASTA_FILE, &fasta::serialize(&[record]))?;
    }

    let scores = cai::score_report(&gene, &optimized, &table);
    write(&config.out_dir, SCORES_FILE, &report::serialize_scores(&scores))?;
    if config.json {
        write(&config.out_dir, SCORES_JSON_FILE, &json::report_to_json(&scores)?)?;
    }

    for line in report::summary(&scores).lines() {
        info!("{line}");
    }
    info!(
        "GC content: {:.3} -> {:.3}, GC3: {:.3} -> {:.3}",
        operations::gc_content(&gene),
        operations::gc_content(&optimized),
        operations::gc3_content(&gene),
        operations::gc3_content(&optimized)
    );
    Ok(optimized)
}

/// Score a gene as-is, next to its optimized form when one exists.
///
/// Codons the table does not cover score 0. If such a codon also keeps the
/// gene from being optimized, only the original column is filled.
pub fn run_score(config: &ScoreConfig) -> Result<String> {
    let table = load_table(&TableSource::Saved(config.table.clone()), config.weighting)?;
    let gene = codonopt_formats::parse_gene(&read(&config.gene)?)
        .with_context(|| format!("failed to parse gene {}", config.gene.display()))?;

    match optimize_gene(&gene, &table) {
        Ok(optimized) => {
            let scores = cai::score_report(&gene, &optimized, &table);
            for line in report::summary(&scores).lines() {
                info!("{line}");
            }
            Ok(report::serialize_scores(&scores))
        }
        Err(err @ CodonError::Lookup { .. }) => {
            warn!("Optimized scores unavailable: {err}");
            let original = cai::score_series(&gene, &table);
            info!("{}", report::original_summary(&original));
            Ok(report::serialize_original_scores(&original))
        }
        Err(err) => Err(err.into()),
    }
}

/// Annotate a COG/EC_number table with KEGG orthology ids over HTTP.
pub fn run_lookup(input: &Path, config: &LookupConfig) -> Result<LookupSummary> {
    let summary = codonopt_lookup::run_lookup(input, HttpTransport::new(), config)
        .with_context(|| format!("KEGG lookup failed for {}", input.display()))?;
    info!(
        "Resolved {} rows ({} from checkpoint, {} skipped) of {}",
        summary.resolved, summary.reused, summary.skipped, summary.rows
    );
    Ok(summary)
}
