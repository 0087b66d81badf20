use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Days of history kept
pub const HISTORY_RETENTION_DAYS: i64 = 90;

/// Aggregated practice for one calendar day (tables track).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
  /// `YYYY-MM-DD`
  pub date: NaiveDate,
  pub sessions: u32,
  pub correct: u32,
  pub total: u32,
  pub best_streak: u32,
}

impl HistoryEntry {
  pub fn empty(date: NaiveDate) -> Self {
    Self {
      date,
      sessions: 0,
      correct: 0,
      total: 0,
      best_streak: 0,
    }
  }
}

/// Result of one finished session, folded into the day's entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionTally {
  pub correct: u32,
  pub total: u32,
  pub best_streak: u32,
}

/// Upsert `tally` into the entry for `today` and drop entries older than the
/// retention window. Entries stay sorted by date.
pub fn fold_session(history: &mut Vec<HistoryEntry>, today: NaiveDate, tally: SessionTally) {
  match history.iter_mut().find(|e| e.date == today) {
    Some(entry) => apply(entry, tally),
    None => {
      let mut entry = HistoryEntry::empty(today);
      apply(&mut entry, tally);
      history.push(entry);
    }
  }

  let cutoff = today - Duration::days(HISTORY_RETENTION_DAYS);
  history.retain(|e| e.date > cutoff);
  history.sort_by_key(|e| e.date);
}

fn apply(entry: &mut HistoryEntry, tally: SessionTally) {
  entry.sessions += 1;
  entry.correct += tally.correct;
  entry.total += tally.total;
  entry.best_streak = entry.best_streak.max(tally.best_streak);
}

#[cfg(test)]
mod tests {
  use super::*;

  fn day(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
  }

  #[test]
  fn test_first_session_creates_entry() {
    let mut history = Vec::new();
    fold_session(
      &mut history,
      day("2024-03-10"),
      SessionTally { correct: 7, total: 10, best_streak: 4 },
    );
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sessions, 1);
    assert_eq!(history[0].correct, 7);
    assert_eq!(history[0].total, 10);
  }

  #[test]
  fn test_same_day_sessions_merge() {
    let mut history = Vec::new();
    let today = day("2024-03-10");
    fold_session(&mut history, today, SessionTally { correct: 7, total: 10, best_streak: 4 });
    fold_session(&mut history, today, SessionTally { correct: 9, total: 10, best_streak: 9 });
    fold_session(&mut history, today, SessionTally { correct: 2, total: 5, best_streak: 1 });

    assert_eq!(history.len(), 1);
    let entry = &history[0];
    assert_eq!(entry.sessions, 3);
    assert_eq!(entry.correct, 18);
    assert_eq!(entry.total, 25);
    assert_eq!(entry.best_streak, 9);
  }

  #[test]
  fn test_old_entries_are_dropped() {
    let mut history = vec![
      HistoryEntry::empty(day("2023-11-01")),
      HistoryEntry::empty(day("2024-01-15")),
    ];
    fold_session(
      &mut history,
      day("2024-03-10"),
      SessionTally { correct: 1, total: 1, best_streak: 1 },
    );
    let dates: Vec<_> = history.iter().map(|e| e.date).collect();
    assert_eq!(dates, vec![day("2024-01-15"), day("2024-03-10")]);
  }

  #[test]
  fn test_date_serializes_as_iso_day() {
    let entry = HistoryEntry::empty(day("2024-03-10"));
    let json = serde_json::to_value(&entry).unwrap();
    assert_eq!(json["date"], "2024-03-10");
    assert_eq!(json["bestStreak"], 0);
  }
}
