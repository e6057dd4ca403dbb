//! Description store for chart points
//!
//! A key-value text store keyed by (chart point, sign). The lookup contract
//! degrades to a fixed fallback string when an entry is absent; only
//! storage-level failures are errors. The shipped implementation is a single
//! SQLite table keyed by the enum-rendered labels, never by user-derived
//! text.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use rusqlite::{Connection, OptionalExtension, params};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::domain::{ChartPoint, ZodiacSign};

/// Fallback text for absent entries
pub const FALLBACK_DESCRIPTION: &str = "Description not found.";

/// Storage-level description failures
#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("description store unavailable: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("unknown chart point {0:?}")]
    UnknownPoint(String),

    #[error("unknown zodiac sign {0:?}")]
    UnknownSign(String),
}

/// Read access to description text
pub trait DescriptionSource: Send + Sync {
    /// Stored text for a point in a sign, or `None` when absent
    fn lookup(&self, point: ChartPoint, sign: ZodiacSign) -> Result<Option<String>, DescriptionError>;
}

/// One importable description entry, as found in a seed file
#[derive(Debug, Clone, Deserialize)]
pub struct SeedEntry {
    pub point: String,
    pub sign: String,
    pub text: String,
}

/// SQLite-backed description store
///
/// The connection sits behind a mutex so the store can be shared between the
/// conversation actor and the CLI commands.
pub struct SqliteDescriptions {
    conn: Mutex<Connection>,
}

impl SqliteDescriptions {
    /// Open (and if needed initialize) a store at the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DescriptionError> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// In-memory store, used by tests and the one-shot chart command
    pub fn open_in_memory() -> Result<Self, DescriptionError> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self, DescriptionError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS descriptions (
                point TEXT NOT NULL,
                sign  TEXT NOT NULL,
                text  TEXT NOT NULL,
                PRIMARY KEY (point, sign)
            )",
            [],
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Insert or replace one entry
    pub fn upsert(&self, point: ChartPoint, sign: ZodiacSign, text: &str) -> Result<(), DescriptionError> {
        self.conn().execute(
            "INSERT OR REPLACE INTO descriptions (point, sign, text) VALUES (?1, ?2, ?3)",
            params![point.label(), sign.name(), text],
        )?;
        Ok(())
    }

    /// Import seed entries, validating labels before touching storage
    ///
    /// Returns the number of imported entries. An unknown point or sign
    /// label aborts the import with nothing written.
    pub fn import(&self, entries: &[SeedEntry]) -> Result<usize, DescriptionError> {
        let mut validated = Vec::with_capacity(entries.len());
        for entry in entries {
            let point = ChartPoint::from_label(&entry.point)
                .ok_or_else(|| DescriptionError::UnknownPoint(entry.point.clone()))?;
            let sign = ZodiacSign::from_name(&entry.sign)
                .ok_or_else(|| DescriptionError::UnknownSign(entry.sign.clone()))?;
            validated.push((point, sign, entry.text.as_str()));
        }

        for (point, sign, text) in &validated {
            self.upsert(*point, *sign, text)?;
        }

        debug!(count = validated.len(), "import: seeded descriptions");
        Ok(validated.len())
    }

    /// Number of stored entries
    pub fn len(&self) -> Result<usize, DescriptionError> {
        let count: i64 = self
            .conn()
            .query_row("SELECT COUNT(*) FROM descriptions", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, DescriptionError> {
        Ok(self.len()? == 0)
    }
}

impl DescriptionSource for SqliteDescriptions {
    fn lookup(&self, point: ChartPoint, sign: ZodiacSign) -> Result<Option<String>, DescriptionError> {
        let text = self
            .conn()
            .query_row(
                "SELECT text FROM descriptions WHERE point = ?1 AND sign = ?2",
                params![point.label(), sign.name()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(text)
    }
}
