//! Test utilities for database setup.
//!
//! Reuses `init_db` so tests run against the same schema as production.

use std::path::PathBuf;
use tempfile::TempDir;

use crate::db::{init_db, DbPool, ProgressRepository, SqliteStore};

/// Temporary database directory with an initialized memox9.db.
///
/// The directory, and with it the database file, is removed on drop.
pub struct TestEnv {
    /// Temporary directory (kept alive for database file persistence)
    pub temp: TempDir,
    /// Connection to memox9.db with all migrations applied
    pub pool: DbPool,
}

impl TestEnv {
    pub fn new() -> rusqlite::Result<Self> {
        let temp =
            TempDir::new().map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))?;
        let pool = init_db(&temp.path().join("memox9.db"))?;
        Ok(Self { temp, pool })
    }

    /// Open a second, independent connection to the same file.
    pub fn reopen(&self) -> rusqlite::Result<DbPool> {
        init_db(&self.db_path())
    }

    /// Repository over a fresh connection to the test database
    pub fn repository(&self) -> rusqlite::Result<ProgressRepository> {
        Ok(ProgressRepository::new(Box::new(SqliteStore::new(self.reopen()?))))
    }

    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("memox9.db")
    }
}
