//! Mastery updates after an answer.

use chrono::{DateTime, Utc};

use crate::domain::{FactProgress, ItemRef, TableProgress};

/// Change applied to a mastery record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasteryChange {
  /// Fact moved between Leitner boxes
  Box { from: u8, to: u8 },
  /// Table counters after the update
  Table { correct: u32, total: u32 },
  /// Item not part of the universe; nothing changed
  Unknown,
}

/// Record a pass/fail against the matching fact or table.
pub fn record_result(
  facts: &mut FactProgress,
  tables: &mut TableProgress,
  item: ItemRef,
  is_correct: bool,
  now: DateTime<Utc>,
) -> MasteryChange {
  match item {
    ItemRef::Fact { a, b } => {
      let id = crate::domain::fact_id(a, b);
      match facts.get_mut(&id) {
        Some(fact) => {
          let from = fact.box_level;
          fact.record(is_correct, now);
          MasteryChange::Box { from, to: fact.box_level }
        }
        None => {
          tracing::warn!("Result for unknown fact {} ignored", id);
          MasteryChange::Unknown
        }
      }
    }
    ItemRef::Table { table, .. } => {
      if tables.record(table, is_correct) {
        let stats = tables.stats(table);
        MasteryChange::Table {
          correct: stats.correct,
          total: stats.total,
        }
      } else {
        tracing::warn!("Result for unknown table {} ignored", table);
        MasteryChange::Unknown
      }
    }
  }
}
