//! The blog's storage: schema lifecycle plus article and comment operations.
//!
//! A [`Database`] holds no open connection. Every operation opens its own
//! short-lived SQLite connection and drops it before returning, so handles can
//! be cloned freely across request handlers. Concurrent writers are left to
//! SQLite's own locking; only schema initialization is serialized in-process.

mod articles;
mod comments;
pub mod schema;
pub mod seed;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::{DateTime, NaiveDateTime, Utc};
use directories::ProjectDirs;
use rusqlite::types::Type;
use rusqlite::{Connection, Row, TransactionBehavior};

use crate::error::{StoreError, StoreResult};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// What to do when the schema exists but a structural probe fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SchemaRecovery {
    /// Drop both tables, recreate them and reseed the example content.
    /// Everything previously stored is lost.
    #[default]
    Reinitialize,
    /// Leave the file untouched and report the storage as unavailable.
    Fail,
}

/// Outcome of [`Database::ensure_schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaStatus {
    Healthy,
    /// The database file did not exist and was created and seeded.
    Initialized,
    /// The schema was malformed and has been dropped, recreated and reseeded.
    Reinitialized,
}

#[derive(Clone)]
pub struct Database {
    path: PathBuf,
    recovery: SchemaRecovery,
    init_lock: Arc<Mutex<()>>,
}

impl Database {
    /// Prepares a handle for the database file at `path`.
    ///
    /// The parent directory is created if needed; the file itself is left
    /// for [`Database::ensure_schema`] to create.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        Ok(Self {
            path,
            recovery: SchemaRecovery::default(),
            init_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn open_default() -> StoreResult<Self> {
        Self::open(Self::default_path()?)
    }

    pub fn default_path() -> StoreResult<PathBuf> {
        let dirs = ProjectDirs::from("", "", "blog").ok_or(StoreError::NoDataDir)?;
        Ok(dirs.data_dir().join("blog.db"))
    }

    pub fn with_recovery(mut self, recovery: SchemaRecovery) -> Self {
        self.recovery = recovery;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn recovery(&self) -> SchemaRecovery {
        self.recovery
    }

    fn connect(&self) -> StoreResult<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        Ok(conn)
    }

    /// Makes sure both tables exist with the expected columns.
    ///
    /// A missing file is created and seeded. An existing file whose probe
    /// queries fail is handled according to the [`SchemaRecovery`] policy;
    /// under `Reinitialize` all stored articles and comments are discarded.
    /// Calls on a healthy schema change nothing.
    pub fn ensure_schema(&self) -> StoreResult<SchemaStatus> {
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());

        if !self.path.exists() {
            tracing::info!("Initializing new database at {}", self.path.display());
            self.rebuild()?;
            return Ok(SchemaStatus::Initialized);
        }

        let conn = self.connect()?;
        let probe = probe_schema(&conn);
        drop(conn);

        match probe {
            Ok(()) => Ok(SchemaStatus::Healthy),
            Err(err) if self.recovery == SchemaRecovery::Fail => {
                tracing::error!(error = %err, "Database schema is malformed; recovery disabled");
                Err(StoreError::SchemaMalformed(err))
            }
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    "Database schema is malformed; dropping all data and reinitializing {}",
                    self.path.display()
                );
                self.rebuild()?;
                Ok(SchemaStatus::Reinitialized)
            }
        }
    }

    /// Unconditionally drops, recreates and reseeds both tables.
    pub fn reinitialize(&self) -> StoreResult<()> {
        let _guard = self.init_lock.lock().unwrap_or_else(|e| e.into_inner());
        tracing::warn!("Reinitializing database at {}", self.path.display());
        self.rebuild()
    }

    // Callers must hold `init_lock`.
    fn rebuild(&self) -> StoreResult<()> {
        let mut conn = self.connect()?;
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute_batch(schema::DROP)?;
        tx.execute_batch(schema::SCHEMA)?;
        seed::insert_examples(&tx)?;
        tx.commit()?;

        tracing::info!(
            articles = seed::ARTICLES.len(),
            comments = seed::COMMENTS.len(),
            "Database schema created and seeded"
        );
        Ok(())
    }
}

fn probe_schema(conn: &Connection) -> rusqlite::Result<()> {
    for probe in schema::PROBES {
        conn.prepare(probe)?.exists([])?;
    }
    Ok(())
}

/// Reads a `created_at` column.
///
/// Accepts the RFC 3339 form the schema writes and the bare
/// `YYYY-MM-DD HH:MM:SS` form of SQLite's `CURRENT_TIMESTAMP`, both UTC.
fn timestamp(row: &Row<'_>, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            row.as_ref().column_index(column).unwrap_or_default(),
            Type::Text,
            format!("unreadable timestamp {raw:?}").into(),
        )
    })
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rfc3339_with_millis() {
        let dt = parse_timestamp("2024-03-01T12:30:45.123Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:30:45.123+00:00");
    }

    #[test]
    fn parses_sqlite_current_timestamp() {
        let dt = parse_timestamp("2024-03-01 12:30:45").unwrap();
        assert_eq!(dt.to_rfc3339(), "2024-03-01T12:30:45+00:00");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_timestamp("yesterday").is_none());
    }
}
