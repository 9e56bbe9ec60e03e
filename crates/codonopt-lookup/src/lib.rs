//! KEGG orthology lookup for annotated corpus entries.
//!
//! Each row of an annotation table carries a COG and/or EC number. Both are
//! queried against the KEGG search endpoint and the `K` ids found in the
//! response are joined into a `KEGG` column. Requests go through a
//! [`Transport`], with bounded retries, a fixed-size
//! worker pool, and a SQLite checkpoint of the rows already resolved.
//! [`HttpTransport`] is the blocking HTTP implementation used by the CLI.

pub mod annotations;
pub mod checkpoint;
pub mod http;
pub mod query;
pub mod retry;
pub mod runner;
pub mod transport;

use std::sync::PoisonError;

use thiserror::Error;

pub use annotations::AnnotationTable;
pub use checkpoint::Checkpoint;
pub use http::HttpTransport;
pub use query::{EntryExtractor, QueryKind};
pub use retry::RetryPolicy;
pub use runner::{run_lookup, KeggResolver, LookupConfig, LookupSummary};
pub use transport::{Transport, TransportError};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Checkpoint error: {0}")]
    Checkpoint(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid annotation table: {0}")]
    InvalidInput(String),
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),
    #[error("Worker pool error: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
    #[error("Checkpoint lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for LookupError {
    fn from(_: PoisonError<T>) -> Self {
        LookupError::Poisoned
    }
}
