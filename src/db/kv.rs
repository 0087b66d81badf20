//! Key-value backends for persisted progress blobs.

use rusqlite::{params, OptionalExtension};
use std::collections::HashMap;

use super::{try_lock, DbPool, StoreResult};

/// Opaque string store the progress repository writes its JSON blobs to.
pub trait KeyValueStore: Send {
  fn get(&self, key: &str) -> StoreResult<Option<String>>;
  fn set(&mut self, key: &str, value: &str) -> StoreResult<()>;
  fn clear(&mut self) -> StoreResult<()>;
}

/// SQLite-backed store using the `kv_store` table
pub struct SqliteStore {
  pool: DbPool,
}

impl SqliteStore {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

impl KeyValueStore for SqliteStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    let conn = try_lock(&self.pool)?;
    let value = conn
      .query_row("SELECT value FROM kv_store WHERE key = ?1", params![key], |row| row.get(0))
      .optional()?;
    Ok(value)
  }

  fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
    let conn = try_lock(&self.pool)?;
    conn.execute(
      r#"
      INSERT INTO kv_store (key, value, updated_at) VALUES (?1, ?2, datetime('now'))
      ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
      "#,
      params![key, value],
    )?;
    Ok(())
  }

  fn clear(&mut self) -> StoreResult<()> {
    let conn = try_lock(&self.pool)?;
    conn.execute("DELETE FROM kv_store", [])?;
    Ok(())
  }
}

/// In-memory store, used by tests and when no database is wanted
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
  entries: HashMap<String, String>,
}

impl MemoryStore {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_entry(mut self, key: &str, value: &str) -> Self {
    self.entries.insert(key.to_string(), value.to_string());
    self
  }
}

impl KeyValueStore for MemoryStore {
  fn get(&self, key: &str) -> StoreResult<Option<String>> {
    Ok(self.entries.get(key).cloned())
  }

  fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
    self.entries.insert(key.to_string(), value.to_string());
    Ok(())
  }

  fn clear(&mut self) -> StoreResult<()> {
    self.entries.clear();
    Ok(())
  }
}
