use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use rayon::prelude::*;
use tracing::{info, warn};

use crate::annotations::AnnotationTable;
use crate::checkpoint::Checkpoint;
use crate::query::{EntryExtractor, QueryKind};
use crate::retry::RetryPolicy;
use crate::transport::Transport;
use crate::LookupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// Concurrent requests in flight.
    pub workers: usize,
    pub retry: RetryPolicy,
    /// Per-request timeout handed to the transport.
    pub timeout: Duration,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            workers: 5,
            retry: RetryPolicy::default(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupSummary {
    pub rows: usize,
    /// Rows taken from the checkpoint without a request.
    pub reused: usize,
    pub resolved: usize,
    /// Rows whose queries failed after every retry.
    pub skipped: usize,
}

impl LookupSummary {
    pub fn is_complete(&self) -> bool {
        self.skipped == 0
    }
}

/// Turns COG/EC numbers into KEGG orthology ids.
pub struct KeggResolver<T> {
    transport: T,
    extractor: EntryExtractor,
    retry: RetryPolicy,
    timeout: Duration,
}

impl<T: Transport> KeggResolver<T> {
    pub fn new(transport: T, config: &LookupConfig) -> Result<Self, LookupError> {
        Ok(Self {
            transport,
            extractor: EntryExtractor::new()?,
            retry: config.retry,
            timeout: config.timeout,
        })
    }

    /// Ids for one query. Empty queries resolve to no ids without a request;
    /// `None` means every attempt failed.
    pub fn resolve(&self, kind: QueryKind, value: Option<&str>) -> Option<Vec<String>> {
        let Some(url) = value.and_then(|v| kind.url(v)) else {
            return Some(Vec::new());
        };
        let label = format!("{kind}={}", value.unwrap_or_default());
        self.retry
            .run(&label, || self.transport.fetch(&url, self.timeout))
            .map(|body| self.extractor.extract(&body))
    }

    /// COG ids followed by EC ids, joined with `;`.
    pub fn resolve_row(&self, cog: Option<&str>, ec: Option<&str>) -> Option<String> {
        let mut ids = self.resolve(QueryKind::Cog, cog)?;
        ids.extend(self.resolve(QueryKind::Ec, ec)?);
        Some(ids.join(";"))
    }
}

/// Output and checkpoint locations derived from the input path:
/// `<stem>_ko.tsv` and `<stem>_ko_checkpoint.sqlite` next to the input.
pub fn output_paths(input: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let dir = input.parent().unwrap_or_else(|| Path::new(""));
    (
        dir.join(format!("{stem}_ko.tsv")),
        dir.join(format!("{stem}_ko_checkpoint.sqlite")),
    )
}

/// Resolve every row not yet in `checkpoint`, recording each success.
///
/// Returns the KEGG value per row (empty for skipped rows).
pub fn annotate<T: Transport>(
    table: &AnnotationTable,
    resolver: &KeggResolver<T>,
    checkpoint: &Mutex<Checkpoint>,
    workers: usize,
) -> Result<(Vec<String>, LookupSummary), LookupError> {
    let total = table.len();
    let done = checkpoint.lock()?.resolved()?;
    let pending: Vec<usize> = (0..total).filter(|row| !done.contains_key(row)).collect();
    let reused = total - pending.len();
    if reused > 0 {
        info!("Resuming: {reused}/{total} rows already resolved");
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers.max(1))
        .build()?;
    let processed = AtomicUsize::new(reused);
    let skipped = AtomicUsize::new(0);

    pool.install(|| {
        pending.par_iter().try_for_each(|&row| -> Result<(), LookupError> {
            match resolver.resolve_row(table.cog(row), table.ec(row)) {
                Some(kegg) => checkpoint.lock()?.record(row, &kegg)?,
                None => {
                    skipped.fetch_add(1, Ordering::Relaxed);
                }
            }
            let n = processed.fetch_add(1, Ordering::Relaxed) + 1;
            info!("Processed row {n}/{total}");
            Ok(())
        })
    })?;

    let resolved = checkpoint.lock()?.resolved()?;
    let kegg = (0..total)
        .map(|row| resolved.get(&row).cloned().unwrap_or_default())
        .collect();
    let skipped = skipped.into_inner();
    Ok((
        kegg,
        LookupSummary {
            rows: total,
            reused,
            resolved: pending.len() - skipped,
            skipped,
        },
    ))
}

/// Annotate the table at `input` and write `<stem>_ko.tsv` beside it.
///
/// The checkpoint is removed once every row is resolved; after skipped rows
/// it is kept so a rerun only retries those.
pub fn run_lookup<T: Transport>(
    input: &Path,
    transport: T,
    config: &LookupConfig,
) -> Result<LookupSummary, LookupError> {
    let table = AnnotationTable::parse(&fs::read_to_string(input)?)?;
    let (output, checkpoint_path) = output_paths(input);
    let resolver = KeggResolver::new(transport, config)?;

    let checkpoint = Mutex::new(Checkpoint::open(&checkpoint_path)?);
    let (kegg, summary) = annotate(&table, &resolver, &checkpoint, config.workers)?;
    drop(checkpoint);

    fs::write(&output, table.to_tsv(&kegg))?;
    info!("Saved output to {}", output.display());

    if summary.is_complete() {
        remove_checkpoint(&checkpoint_path)?;
    } else {
        warn!(
            "{} rows skipped; checkpoint kept at {}",
            summary.skipped,
            checkpoint_path.display()
        );
    }
    Ok(summary)
}

fn remove_checkpoint(path: &Path) -> Result<(), LookupError> {
    if path.exists() {
        fs::remove_file(path)?;
        info!("Removed checkpoint {}", path.display());
    }
    Ok(())
}
