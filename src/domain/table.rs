use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Tables practised in the tables track
pub const TABLES: std::ops::RangeInclusive<u8> = 1..=9;
/// Multipliers drawn for each table
pub const MULTIPLIERS: std::ops::RangeInclusive<u8> = 1..=9;

/// Running correct/total counters for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableStats {
  pub correct: u32,
  pub total: u32,
}

impl TableStats {
  pub fn accuracy(&self) -> f64 {
    if self.total > 0 {
      self.correct as f64 / self.total as f64
    } else {
      0.0
    }
  }

  pub fn record(&mut self, is_correct: bool) {
    self.total = self.total.saturating_add(1);
    if is_correct {
      self.correct = self.correct.saturating_add(1).min(self.total);
    }
  }

  /// Pseudo Leitner box used by mode selection and distractor sizing:
  /// 0 when never played, otherwise `floor(accuracy × 5)`.
  pub fn derived_box(&self) -> u8 {
    if self.total == 0 {
      return 0;
    }
    (self.accuracy() * 5.0).floor() as u8
  }

  /// Restore `correct <= total` on data loaded from storage
  pub fn normalized(self) -> Self {
    Self {
      correct: self.correct.min(self.total),
      total: self.total,
    }
  }
}

/// Tables-track mastery, one entry per table 1..=9.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProgress {
  pub per_table: BTreeMap<u8, TableStats>,
}

impl Default for TableProgress {
  fn default() -> Self {
    Self {
      per_table: TABLES.map(|t| (t, TableStats::default())).collect(),
    }
  }
}

impl TableProgress {
  pub fn stats(&self, table: u8) -> TableStats {
    self.per_table.get(&table).copied().unwrap_or_default()
  }

  pub fn record(&mut self, table: u8, is_correct: bool) -> bool {
    match self.per_table.get_mut(&table) {
      Some(stats) => {
        stats.record(is_correct);
        true
      }
      None => false,
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = (u8, TableStats)> + '_ {
    self.per_table.iter().map(|(t, s)| (*t, *s))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_default_has_nine_empty_tables() {
    let progress = TableProgress::default();
    assert_eq!(progress.per_table.len(), 9);
    for (_, stats) in progress.iter() {
      assert_eq!(stats, TableStats { correct: 0, total: 0 });
    }
  }

  #[test]
  fn test_record_keeps_correct_at_most_total() {
    let mut progress = TableProgress::default();
    let outcomes = [true, false, true, true, false, false, true];
    for ok in outcomes {
      assert!(progress.record(7, ok));
      let stats = progress.stats(7);
      assert!(stats.correct <= stats.total);
    }
    assert_eq!(progress.stats(7), TableStats { correct: 4, total: 7 });
  }

  #[test]
  fn test_record_unknown_table_is_ignored() {
    let mut progress = TableProgress::default();
    assert!(!progress.record(12, true));
    assert_eq!(progress.per_table.len(), 9);
  }

  #[test]
  fn test_accuracy_and_derived_box() {
    let fresh = TableStats::default();
    assert_eq!(fresh.accuracy(), 0.0);
    assert_eq!(fresh.derived_box(), 0);

    let perfect = TableStats { correct: 4, total: 4 };
    assert_eq!(perfect.derived_box(), 5);

    let half = TableStats { correct: 5, total: 10 };
    assert_eq!(half.derived_box(), 2);
  }

  #[test]
  fn test_record_saturates_at_max() {
    let mut stats = TableStats { correct: 3, total: u32::MAX };
    stats.record(false);
    assert_eq!(stats, TableStats { correct: 3, total: u32::MAX });
    stats.record(true);
    assert_eq!(stats, TableStats { correct: 4, total: u32::MAX });
  }

  #[test]
  fn test_normalized_clamps_correct() {
    let broken = TableStats { correct: 9, total: 3 };
    assert_eq!(broken.normalized(), TableStats { correct: 3, total: 3 });
  }

  #[test]
  fn test_serialized_shape() {
    let json = serde_json::to_value(TableProgress::default()).unwrap();
    assert_eq!(json["perTable"]["3"]["total"], 0);
  }
}
