use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Smallest operand in the fact universe
pub const MIN_OPERAND: u8 = 2;
/// Largest operand in the fact universe
pub const MAX_OPERAND: u8 = 9;
/// Highest Leitner box
pub const MAX_BOX: u8 = 5;
/// Number of recent attempts kept per fact
pub const ATTEMPT_HISTORY_LEN: usize = 5;
/// Box level from which a fact counts as mastered
pub const MASTERED_BOX: u8 = 4;

/// A single multiplication fact `a × b` with its Leitner state.
///
/// `last_reviewed` is stored as epoch milliseconds, `0` meaning never reviewed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Fact {
  pub a: u8,
  pub b: u8,
  pub id: String,
  #[serde(rename = "box")]
  pub box_level: u8,
  pub last_reviewed: i64,
  /// Outcomes of the most recent attempts, oldest first
  #[serde(default)]
  pub history: Vec<bool>,
}

impl Fact {
  pub fn new(a: u8, b: u8) -> Self {
    Self {
      a,
      b,
      id: fact_id(a, b),
      box_level: 0,
      last_reviewed: 0,
      history: Vec::new(),
    }
  }

  pub fn product(&self) -> i64 {
    self.a as i64 * self.b as i64
  }

  pub fn label(&self) -> String {
    format!("{} × {}", self.a, self.b)
  }

  pub fn is_mastered(&self) -> bool {
    self.box_level >= MASTERED_BOX
  }

  pub fn last_reviewed_at(&self) -> Option<DateTime<Utc>> {
    if self.last_reviewed <= 0 {
      return None;
    }
    DateTime::from_timestamp_millis(self.last_reviewed)
  }

  /// Promote on success, send back to box 0 on failure.
  pub fn record(&mut self, is_correct: bool, now: DateTime<Utc>) {
    self.last_reviewed = now.timestamp_millis();
    if is_correct {
      self.box_level = (self.box_level + 1).min(MAX_BOX);
    } else {
      self.box_level = 0;
    }
    self.history.push(is_correct);
    if self.history.len() > ATTEMPT_HISTORY_LEN {
      let excess = self.history.len() - ATTEMPT_HISTORY_LEN;
      self.history.drain(..excess);
    }
  }
}

/// Persistence key of a fact (`"6x7"`)
pub fn fact_id(a: u8, b: u8) -> String {
  format!("{}x{}", a, b)
}

/// Facts-track mastery: the 64-fact universe plus accumulated XP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactProgress {
  pub xp: u64,
  pub facts: BTreeMap<String, Fact>,
}

impl Default for FactProgress {
  fn default() -> Self {
    Self {
      xp: 0,
      facts: all_facts().into_iter().map(|f| (f.id.clone(), f)).collect(),
    }
  }
}

impl FactProgress {
  pub fn get(&self, id: &str) -> Option<&Fact> {
    self.facts.get(id)
  }

  pub fn get_mut(&mut self, id: &str) -> Option<&mut Fact> {
    self.facts.get_mut(id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &Fact> {
    self.facts.values()
  }

  pub fn len(&self) -> usize {
    self.facts.len()
  }

  pub fn is_empty(&self) -> bool {
    self.facts.is_empty()
  }

  pub fn mastered_count(&self) -> usize {
    self.facts.values().filter(|f| f.is_mastered()).count()
  }

  /// Share of facts in box 4 or higher, as a rounded percentage
  pub fn mastery_percent(&self) -> u32 {
    if self.facts.is_empty() {
      return 0;
    }
    ((self.mastered_count() as f64 / self.facts.len() as f64) * 100.0).round() as u32
  }
}

/// Every ordered pair with both operands in 2..=9.
pub fn all_facts() -> Vec<Fact> {
  let mut facts = Vec::with_capacity(64);
  for a in MIN_OPERAND..=MAX_OPERAND {
    for b in MIN_OPERAND..=MAX_OPERAND {
      facts.push(Fact::new(a, b));
    }
  }
  facts
}
