//! Per-session options and their bounds.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::domain::{InteractionMode, ModePolicy, SessionMode, Track, TABLES};

/// Allowed questions per session
pub const QUESTION_COUNT_RANGE: (usize, usize) = (5, 40);
/// Allowed recall time limit in seconds
pub const TIME_LIMIT_RANGE: (u32, u32) = (3, 60);
/// Allowed flash time limit in seconds
pub const FLASH_DELAY_RANGE: (u32, u32) = (2, 60);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionConfig {
  pub question_count: usize,
  pub time_limit_seconds: u32,
  pub flash_delay_seconds: u32,
  pub auto_hint: bool,
  pub mode: SessionMode,
  pub mode_policy: ModePolicy,
  pub track: Track,
  pub selected_tables: BTreeSet<u8>,
}

impl Default for SessionConfig {
  fn default() -> Self {
    Self {
      question_count: 20,
      time_limit_seconds: 10,
      flash_delay_seconds: 6,
      auto_hint: true,
      mode: SessionMode::Smart,
      mode_policy: ModePolicy::BoxDriven,
      track: Track::Facts,
      selected_tables: TABLES.collect(),
    }
  }
}

/// Request-level overrides; unset fields keep the configured defaults
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionOverrides {
  pub question_count: Option<usize>,
  pub time_limit_seconds: Option<u32>,
  pub flash_delay_seconds: Option<u32>,
  pub auto_hint: Option<bool>,
  pub mode: Option<SessionMode>,
  pub mode_policy: Option<ModePolicy>,
  pub track: Option<Track>,
  pub selected_tables: Option<BTreeSet<u8>>,
}

impl SessionConfig {
  /// Clamp numeric options into range and drop tables outside 1..=9
  pub fn clamped(mut self) -> Self {
    self.question_count = self
      .question_count
      .clamp(QUESTION_COUNT_RANGE.0, QUESTION_COUNT_RANGE.1);
    self.time_limit_seconds = self
      .time_limit_seconds
      .clamp(TIME_LIMIT_RANGE.0, TIME_LIMIT_RANGE.1);
    self.flash_delay_seconds = self
      .flash_delay_seconds
      .clamp(FLASH_DELAY_RANGE.0, FLASH_DELAY_RANGE.1);
    self.selected_tables.retain(|t| TABLES.contains(t));
    self
  }

  pub fn with_overrides(&self, o: SessionOverrides) -> Self {
    Self {
      question_count: o.question_count.unwrap_or(self.question_count),
      time_limit_seconds: o.time_limit_seconds.unwrap_or(self.time_limit_seconds),
      flash_delay_seconds: o.flash_delay_seconds.unwrap_or(self.flash_delay_seconds),
      auto_hint: o.auto_hint.unwrap_or(self.auto_hint),
      mode: o.mode.unwrap_or(self.mode),
      mode_policy: o.mode_policy.unwrap_or(self.mode_policy),
      track: o.track.unwrap_or(self.track),
      selected_tables: o.selected_tables.unwrap_or_else(|| self.selected_tables.clone()),
    }
    .clamped()
  }

  /// Time allowed for a question: recall uses the time limit, flash the flash delay
  pub fn time_limit_for(&self, mode: InteractionMode) -> Duration {
    let secs = match mode {
      InteractionMode::Recall => self.time_limit_seconds,
      InteractionMode::Flash => self.flash_delay_seconds,
    };
    Duration::from_secs(secs as u64)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = SessionConfig::default();
    assert_eq!(config.question_count, 20);
    assert_eq!(config.time_limit_seconds, 10);
    assert_eq!(config.flash_delay_seconds, 6);
    assert!(config.auto_hint);
    assert_eq!(config.selected_tables.len(), 9);
  }

  #[test]
  fn test_clamping() {
    let config = SessionConfig {
      question_count: 500,
      time_limit_seconds: 0,
      flash_delay_seconds: 1000,
      selected_tables: [0, 3, 9, 10].into_iter().collect(),
      ..SessionConfig::default()
    }
    .clamped();
    assert_eq!(config.question_count, 40);
    assert_eq!(config.time_limit_seconds, 3);
    assert_eq!(config.flash_delay_seconds, 60);
    assert_eq!(config.selected_tables, [3, 9].into_iter().collect());

    let small = SessionConfig { question_count: 1, ..SessionConfig::default() }.clamped();
    assert_eq!(small.question_count, 5);
  }

  #[test]
  fn test_overrides_keep_unset_fields() {
    let base = SessionConfig::default();
    let overrides: SessionOverrides =
      serde_json::from_str(r#"{"track": "tables", "selected_tables": [2, 3], "mode": "flash"}"#).unwrap();
    let config = base.with_overrides(overrides);
    assert_eq!(config.track, Track::Tables);
    assert_eq!(config.mode, SessionMode::Flash);
    assert_eq!(config.selected_tables, [2, 3].into_iter().collect());
    assert_eq!(config.question_count, base.question_count);
    assert_eq!(config.time_limit_seconds, base.time_limit_seconds);
  }

  #[test]
  fn test_time_limit_by_mode() {
    let config = SessionConfig::default();
    assert_eq!(config.time_limit_for(InteractionMode::Recall), Duration::from_secs(10));
    assert_eq!(config.time_limit_for(InteractionMode::Flash), Duration::from_secs(6));
  }
}
