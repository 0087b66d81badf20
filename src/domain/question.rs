use serde::{Deserialize, Serialize};

use super::fact::fact_id;

/// How a question is presented to the learner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
  /// Typed, free-entry answer
  Recall,
  /// Multiple choice
  Flash,
}

impl InteractionMode {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Recall => "recall",
      Self::Flash => "flash",
    }
  }
}

/// Which mastery store a session practises
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
  /// 64 facts with Leitner boxes and XP
  #[default]
  Facts,
  /// Tables 1..=9 with accuracy counters
  Tables,
}

impl Track {
  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Facts => "facts",
      Self::Tables => "tables",
    }
  }
}

/// Session-wide presentation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
  /// Every question typed
  Recall,
  /// Every question multiple choice
  Flash,
  /// Per-question choice made by the mode policy
  #[default]
  #[serde(alias = "targeted")]
  Smart,
}

/// Policy used by `SessionMode::Smart`. The two presets are not equivalent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModePolicy {
  /// Box 0 always recall, higher boxes flash with probability `box × 0.1`
  #[default]
  BoxDriven,
  /// Boxes 0-2 flash, boxes 3+ recall
  Inverted,
}

/// Mastery record a question is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ItemRef {
  Fact { a: u8, b: u8 },
  Table { table: u8, multiplier: u8 },
}

impl ItemRef {
  pub fn operands(&self) -> (u8, u8) {
    match *self {
      Self::Fact { a, b } => (a, b),
      Self::Table { table, multiplier } => (table, multiplier),
    }
  }

  pub fn product(&self) -> i64 {
    let (a, b) = self.operands();
    a as i64 * b as i64
  }

  pub fn label(&self) -> String {
    let (a, b) = self.operands();
    format!("{} × {}", a, b)
  }

  /// Persistence key of the fact, if this is a facts-track item
  pub fn fact_id(&self) -> Option<String> {
    match *self {
      Self::Fact { a, b } => Some(fact_id(a, b)),
      Self::Table { .. } => None,
    }
  }
}

/// One scheduled question. Mode and box are fixed when the queue is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
  pub item: ItemRef,
  pub mode: InteractionMode,
  /// Box level at queue-build time (derived for tables)
  pub box_level: u8,
}
