//! Typed access to the persisted progress blobs.
//!
//! Each track is stored as one JSON document under a fixed key and written
//! back whole after every change. Reads never fail: a missing key yields the
//! default state and a document that does not parse is logged and replaced
//! by the default state.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::fact::{ATTEMPT_HISTORY_LEN, MAX_BOX};
use crate::domain::{fold_session, FactProgress, HistoryEntry, SessionTally, TableProgress, TableStats};

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

use super::{KeyValueStore, StoreResult};

/// Facts track: `{ xp, facts }`
pub const FACTS_KEY: &str = "memox9_v2_data";
/// Tables track: `{ perTable }`
pub const TABLES_KEY: &str = "memox9_tables";
/// Daily history array
pub const HISTORY_KEY: &str = "memox9_history";

/// Stored fact fields; anything missing keeps the universe default
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredFact {
  #[serde(rename = "box")]
  box_level: Option<i64>,
  last_reviewed: Option<f64>,
  history: Option<Vec<bool>>,
}

#[derive(Debug, Default, Deserialize)]
struct StoredFactProgress {
  #[serde(default)]
  xp: u64,
  #[serde(default)]
  facts: HashMap<String, StoredFact>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTableProgress {
  #[serde(default)]
  per_table: HashMap<u8, TableStats>,
}

pub struct ProgressRepository {
  store: Box<dyn KeyValueStore>,
}

impl ProgressRepository {
  pub fn new(store: Box<dyn KeyValueStore>) -> Self {
    Self { store }
  }

  /// Load the facts track, merging stored values into the 64-fact universe.
  pub fn load_facts(&self) -> FactProgress {
    let mut progress = FactProgress::default();
    let Some(stored) = self.read_json::<StoredFactProgress>(FACTS_KEY) else {
      return progress;
    };

    progress.xp = stored.xp;
    for (id, saved) in stored.facts {
      let Some(fact) = progress.get_mut(&id) else {
        tracing::debug!("Dropping stored fact {} outside the universe", id);
        continue;
      };
      if let Some(b) = saved.box_level {
        fact.box_level = b.clamp(0, MAX_BOX as i64) as u8;
      }
      if let Some(ts) = saved.last_reviewed {
        fact.last_reviewed = if ts.is_finite() && ts > 0.0 { ts as i64 } else { 0 };
      }
      if let Some(mut history) = saved.history {
        let excess = history.len().saturating_sub(ATTEMPT_HISTORY_LEN);
        history.drain(..excess);
        fact.history = history;
      }
    }
    progress
  }

  pub fn save_facts(&mut self, progress: &FactProgress) -> StoreResult<()> {
    self.write_json(FACTS_KEY, progress)
  }

  /// Load the tables track; every table 1..=9 is present in the result.
  pub fn load_tables(&self) -> TableProgress {
    let mut progress = TableProgress::default();
    let Some(stored) = self.read_json::<StoredTableProgress>(TABLES_KEY) else {
      return progress;
    };

    for (table, stats) in stored.per_table {
      if let Some(slot) = progress.per_table.get_mut(&table) {
        *slot = stats.normalized();
      }
    }
    progress
  }

  pub fn save_tables(&mut self, progress: &TableProgress) -> StoreResult<()> {
    self.write_json(TABLES_KEY, progress)
  }

  pub fn load_history(&self) -> Vec<HistoryEntry> {
    let mut history: Vec<HistoryEntry> = self.read_json(HISTORY_KEY).unwrap_or_default();
    history.sort_by_key(|e| e.date);
    history
  }

  /// Fold a finished session into today's entry and persist the history.
  pub fn record_history(&mut self, today: NaiveDate, tally: SessionTally) -> StoreResult<Vec<HistoryEntry>> {
    let mut history = self.load_history();
    fold_session(&mut history, today, tally);
    self.write_json(HISTORY_KEY, &history)?;
    Ok(history)
  }

  /// Remove every persisted blob
  pub fn clear(&mut self) -> StoreResult<()> {
    self.store.clear()
  }

  fn read_json<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
    let raw = match self.store.get(key) {
      Ok(Some(raw)) => raw,
      Ok(None) => return None,
      Err(e) => {
        tracing::warn!("Failed to read {}: {}", key, e);
        return None;
      }
    };

    match serde_json::from_str(&raw) {
      Ok(value) => Some(value),
      Err(e) => {
        tracing::warn!("Discarding malformed {} ({}), using defaults", key, e);
        None
      }
    }
  }

  fn write_json<T: Serialize>(&mut self, key: &str, value: &T) -> StoreResult<()> {
    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::PersistWrite { key: key.to_string() });

    // serializing these plain structs cannot fail
    let json = serde_json::to_string(value).unwrap_or_default();
    self.store.set(key, &json)
  }
}
