use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

use codonopt_core::Weighting as LibWeighting;
use codonopt_lookup::LookupConfig;

mod commands;

use commands::{OptimizeConfig, ScoreConfig, TableSource, UsageConfig};

#[derive(Parser)]
#[command(name = "codonopt")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Codon usage estimation, codon optimization and CAI scoring", long_about = None)]
struct Cli {
    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Estimate codon usage from reference CDS and save the adaptiveness table
    Usage(UsageArgs),
    /// Optimize a gene against a codon usage table
    Optimize(OptimizeArgs),
    /// Print per-codon CAI scores of a gene
    Score(ScoreArgs),
    /// Add KEGG orthology ids to a COG/EC_number annotation table
    Lookup(LookupArgs),
}

/// How weights are normalized within an amino acid group
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum CliWeighting {
    /// Share of the group total (weights sum to 1)
    Sum,
    /// Relative to the most used synonym (best codon is 1)
    Max,
}

impl From<CliWeighting> for LibWeighting {
    fn from(w: CliWeighting) -> Self {
        match w {
            CliWeighting::Sum => LibWeighting::GroupSum,
            CliWeighting::Max => LibWeighting::MaxRelative,
        }
    }
}

#[derive(Parser)]
struct UsageArgs {
    /// Reference coding sequences (FASTA)
    #[arg(short, long, value_name = "FILE", required = true)]
    input: PathBuf,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    /// Decimals written per weight (full precision when omitted)
    #[arg(long, value_name = "N")]
    precision: Option<usize>,

    #[arg(short, long, value_enum, default_value = "sum")]
    weighting: CliWeighting,

    /// Also write a JSON export
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct OptimizeArgs {
    /// Gene to optimize (raw sequence or FASTA)
    #[arg(short, long, value_name = "FILE", required = true)]
    gene: PathBuf,

    /// Saved codon usage table
    #[arg(short, long, value_name = "FILE", conflicts_with = "reference", required_unless_present = "reference")]
    table: Option<PathBuf>,

    /// Reference coding sequences to estimate the table from
    #[arg(short, long, value_name = "FILE")]
    reference: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    out_dir: PathBuf,

    #[arg(short, long, value_enum, default_value = "sum")]
    weighting: CliWeighting,

    /// Also write the optimized gene as FASTA
    #[arg(long)]
    fasta: bool,

    /// Also write a JSON export of the scores
    #[arg(long)]
    json: bool,
}

#[derive(Parser)]
struct ScoreArgs {
    /// Gene to score
    #[arg(short, long, value_name = "FILE", required = true)]
    gene: PathBuf,

    /// Saved codon usage table, its JSON export, or reference FASTA
    #[arg(short, long, value_name = "FILE", required = true)]
    table: PathBuf,

    #[arg(short, long, value_enum, default_value = "sum")]
    weighting: CliWeighting,
}

#[derive(Parser)]
struct LookupArgs {
    /// Tab-separated table with COG and/or EC_number columns
    #[arg(short, long, value_name = "FILE", required = true)]
    input: PathBuf,

    /// Concurrent requests [default: 5]
    #[arg(long)]
    workers: Option<usize>,

    /// Attempts per query [default: 3]
    #[arg(long)]
    retries: Option<u32>,

    /// Seconds to wait between attempts [default: 60]
    #[arg(long, value_name = "SECS")]
    retry_delay: Option<u64>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

impl LookupArgs {
    fn into_config(self) -> (PathBuf, LookupConfig) {
        let mut config = LookupConfig::default();
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if let Some(retries) = self.retries {
            config.retry.retries = retries;
        }
        if let Some(secs) = self.retry_delay {
            config.retry.delay = Duration::from_secs(secs);
        }
        if let Some(secs) = self.timeout {
            config.timeout = Duration::from_secs(secs);
        }
        (self.input, config)
    }
}

impl UsageArgs {
    fn into_config(self) -> UsageConfig {
        UsageConfig {
            corpus: self.input,
            out_dir: self.out_dir,
            precision: self.precision,
            weighting: self.weighting.into(),
            json: self.json,
        }
    }
}

impl OptimizeArgs {
    fn into_config(self) -> OptimizeConfig {
        let table = match (self.table, self.reference) {
            (Some(path), _) => TableSource::Saved(path),
            (None, Some(path)) => TableSource::Corpus(path),
            // clap requires one of the two
            (None, None) => TableSource::Saved(PathBuf::from(commands::TABLE_FILE)),
        };
        OptimizeConfig {
            gene: self.gene,
            table,
            out_dir: self.out_dir,
            weighting: self.weighting.into(),
            fasta: self.fasta,
            json: self.json,
        }
    }
}

impl ScoreArgs {
    fn into_config(self) -> ScoreConfig {
        ScoreConfig {
            gene: self.gene,
            table: self.table,
            weighting: self.weighting.into(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --quiet wins over RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    match cli.command {
        Commands::Usage(args) => {
            info!("Estimating codon usage...");
            let config = args.into_config();
            let table = commands::run_usage(&config)?;
            info!("Codon usage saved ({} amino acids)", table.len());
        }
        Commands::Optimize(args) => {
            info!("Optimizing gene...");
            let config = args.into_config();
            commands::run_optimize(&config)?;
            info!("Optimization complete!");
        }
        Commands::Score(args) => {
            let config = args.into_config();
            print!("{}", commands::run_score(&config)?);
        }
        Commands::Lookup(args) => {
            info!("Querying KEGG...");
            let (input, config) = args.into_config();
            let summary = commands::run_lookup(&input, &config)?;
            if summary.is_complete() {
                info!("Lookup complete!");
            } else {
                warn!("Lookup incomplete; rerun to retry skipped rows");
            }
        }
    }

    Ok(())
}
