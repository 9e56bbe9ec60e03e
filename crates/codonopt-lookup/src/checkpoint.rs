use std::collections::BTreeMap;
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};

/// A resolved row as stored in the checkpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointEntry {
    pub row: usize,
    pub kegg: String,
    pub resolved_at: DateTime<Utc>,
}

/// Rows already resolved by an earlier (possibly interrupted) run.
pub struct Checkpoint {
    conn: Connection,
}

impl Checkpoint {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(
            "
            CREATE TABLE IF NOT EXISTS resolved (
                row_index INTEGER PRIMARY KEY,
                kegg TEXT NOT NULL,
                resolved_at TEXT NOT NULL
            );
            ",
        )?;
        Ok(Self { conn })
    }

    /// Record a row. Re-recording the same row replaces the earlier value.
    pub fn record(&self, row: usize, kegg: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO resolved (row_index, kegg, resolved_at) VALUES (?1, ?2, ?3)",
            params![row as i64, kegg, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    pub fn get(&self, row: usize) -> Result<Option<String>, rusqlite::Error> {
        self.conn
            .query_row(
                "SELECT kegg FROM resolved WHERE row_index = ?1",
                params![row as i64],
                |r| r.get(0),
            )
            .optional()
    }

    /// KEGG value per resolved row index.
    pub fn resolved(&self) -> Result<BTreeMap<usize, String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT row_index, kegg FROM resolved")?;
        let rows = stmt.query_map([], |r| {
            let row: i64 = r.get(0)?;
            Ok((row as usize, r.get::<_, String>(1)?))
        })?;
        rows.collect()
    }

    pub fn entries(&self) -> Result<Vec<CheckpointEntry>, rusqlite::Error> {
        let mut stmt = self
            .conn
            .prepare("SELECT row_index, kegg, resolved_at FROM resolved ORDER BY row_index")?;
        let rows = stmt.query_map([], |r| {
            let row: i64 = r.get(0)?;
            let stamp: String = r.get(2)?;
            let resolved_at = DateTime::parse_from_rfc3339(&stamp)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(
                        2,
                        rusqlite::types::Type::Text,
                        Box::new(e),
                    )
                })?;
            Ok(CheckpointEntry {
                row: row as usize,
                kegg: r.get(1)?,
                resolved_at,
            })
        })?;
        rows.collect()
    }

    pub fn len(&self) -> Result<usize, rusqlite::Error> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM resolved", [], |r| r.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, rusqlite::Error> {
        Ok(self.len()? == 0)
    }
}
