//! Session runner: presents queued questions one at a time.
//!
//! A session is a small state machine. Each presented question gets a fresh
//! `QuestionToken`; timers carry the token they were armed for, and any fire
//! whose token no longer names the live question is ignored. The runner never
//! touches mastery itself; it returns a `Verdict` for the caller to record.

pub mod config;
pub mod timer;

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;

use crate::domain::{InteractionMode, ItemRef, QueueItem, SessionTally, Track};
use crate::srs::generate_choices;

pub use config::{SessionConfig, SessionOverrides};
pub use timer::TimerSet;

/// Delay before the hint is revealed
pub const HINT_DELAY: Duration = Duration::from_secs(5);
/// Feedback shown after a correct answer
pub const CORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(600);
/// Feedback shown after a wrong answer or timeout
pub const INCORRECT_FEEDBACK_DELAY: Duration = Duration::from_millis(2000);

/// Identifies one presentation of one question
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct QuestionToken(u64);

impl QuestionToken {
  pub fn value(&self) -> u64 {
    self.0
  }
}

/// Monotonic token generator, shared by every session of a trainer
#[derive(Debug, Default)]
pub struct TokenSource {
  last: u64,
}

impl TokenSource {
  pub fn next(&mut self) -> QuestionToken {
    self.last += 1;
    QuestionToken(self.last)
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
  /// Question time limit ran out
  Timeout,
  /// Reveal the hint
  Hint,
  /// Feedback delay elapsed, move on
  Advance,
}

/// A timer the runner wants armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerRequest {
  pub kind: TimerKind,
  pub token: QuestionToken,
  pub delay: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
  /// Waiting for an answer to the live question
  Asking,
  /// Answer recorded, showing feedback
  Feedback,
  /// Queue exhausted
  Complete,
}

/// Operation not valid in the current session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
  NoActiveSession,
  NotAwaitingAnswer,
  NotReadyToAdvance,
}

impl std::fmt::Display for SessionError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NoActiveSession => write!(f, "No session in progress"),
      Self::NotAwaitingAnswer => write!(f, "The current question is not waiting for an answer"),
      Self::NotReadyToAdvance => write!(f, "Nothing to advance to yet"),
    }
  }
}

impl std::error::Error for SessionError {}

/// Outcome of one question, to be recorded against mastery
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
  pub item: ItemRef,
  pub mode: InteractionMode,
  pub correct: bool,
  pub correct_value: i64,
  pub timed_out: bool,
  pub time_taken_secs: f64,
  pub time_limit_secs: f64,
  /// Streak before this answer was counted
  pub streak_before: u32,
  /// Streak after this answer was counted
  pub streak: u32,
}

/// Running counters for the session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionStats {
  pub streak: u32,
  pub best_streak: u32,
  pub correct: u32,
  pub total: u32,
  pub xp_gained: u64,
  pub missed: Vec<ItemRef>,
}

impl SessionStats {
  fn record(&mut self, item: ItemRef, correct: bool) {
    self.total += 1;
    if correct {
      self.correct += 1;
      self.streak += 1;
    } else {
      self.streak = 0;
      if !self.missed.contains(&item) {
        self.missed.push(item);
      }
    }
    self.best_streak = self.best_streak.max(self.streak);
  }
}

/// What the presentation layer needs to show the live question
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuestionView {
  pub token: QuestionToken,
  /// 1-based position in the queue
  pub position: usize,
  pub total: usize,
  pub a: u8,
  pub b: u8,
  pub mode: InteractionMode,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub choices: Option<Vec<i64>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hint: Option<String>,
  pub time_limit_seconds: u64,
  pub phase: Phase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
  pub track: Track,
  pub correct: u32,
  pub total: u32,
  pub best_streak: u32,
  pub xp_gained: u64,
  pub weak_items: Vec<String>,
  pub complete: bool,
}

/// Result of moving past the feedback phase
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Progress {
  Next { question: QuestionView },
  Complete { summary: SessionSummary },
}

#[derive(Debug)]
pub struct Session {
  config: SessionConfig,
  queue: Vec<QueueItem>,
  index: usize,
  phase: Phase,
  token: QuestionToken,
  presented_at: DateTime<Utc>,
  hint_visible: bool,
  choices: Vec<i64>,
  stats: SessionStats,
  timers: Vec<TimerRequest>,
}

impl Session {
  /// Start on the first queued question. Returns None for an empty queue.
  pub fn start(
    config: SessionConfig,
    queue: Vec<QueueItem>,
    tokens: &mut TokenSource,
    now: DateTime<Utc>,
  ) -> Option<Self> {
    if queue.is_empty() {
      return None;
    }
    let mut session = Self {
      config,
      queue,
      index: 0,
      phase: Phase::Asking,
      token: tokens.next(),
      presented_at: now,
      hint_visible: false,
      choices: Vec::new(),
      stats: SessionStats::default(),
      timers: Vec::new(),
    };
    session.present(now);
    Some(session)
  }

  pub fn config(&self) -> &SessionConfig {
    &self.config
  }

  pub fn phase(&self) -> Phase {
    self.phase
  }

  pub fn token(&self) -> QuestionToken {
    self.token
  }

  pub fn stats(&self) -> &SessionStats {
    &self.stats
  }

  pub fn queue(&self) -> &[QueueItem] {
    &self.queue
  }

  /// Timers that should currently be armed
  pub fn timer_plan(&self) -> &[TimerRequest] {
    &self.timers
  }

  pub fn current_item(&self) -> Option<&QueueItem> {
    match self.phase {
      Phase::Complete => None,
      _ => self.queue.get(self.index),
    }
  }

  pub fn current(&self) -> Option<QuestionView> {
    let item = self.current_item()?;
    let (a, b) = item.item.operands();
    Some(QuestionView {
      token: self.token,
      position: self.index + 1,
      total: self.queue.len(),
      a,
      b,
      mode: item.mode,
      choices: (item.mode == InteractionMode::Flash).then(|| self.choices.clone()),
      hint: self
        .hint_visible
        .then(|| format!("{} × {} = {}", a, b, item.item.product())),
      time_limit_seconds: self.config.time_limit_for(item.mode).as_secs(),
      phase: self.phase,
    })
  }

  /// Judge an answer to the live question.
  pub fn answer(&mut self, value: i64, now: DateTime<Utc>) -> Result<Verdict, SessionError> {
    if self.phase != Phase::Asking {
      return Err(SessionError::NotAwaitingAnswer);
    }
    let item = self.live_item()?;
    let taken = (now - self.presented_at).num_milliseconds().max(0) as f64 / 1000.0;
    Ok(self.settle(item, value == item.item.product(), false, taken))
  }

  /// Time limit elapsed for `token`. Stale or already-answered tokens are a no-op.
  pub fn expire(&mut self, token: QuestionToken) -> Option<Verdict> {
    if token != self.token || self.phase != Phase::Asking {
      return None;
    }
    let item = self.live_item().ok()?;
    let limit = self.config.time_limit_for(item.mode).as_secs_f64();
    Some(self.settle(item, false, true, limit))
  }

  /// Reveal the hint for `token` if it is still live and hints are enabled.
  pub fn reveal_hint(&mut self, token: QuestionToken) -> bool {
    if token != self.token || self.phase != Phase::Asking || !self.config.auto_hint {
      return false;
    }
    self.hint_visible = true;
    true
  }

  /// Leave the feedback phase: next question, or completion.
  pub fn advance(&mut self, tokens: &mut TokenSource, now: DateTime<Utc>) -> Result<Progress, SessionError> {
    if self.phase != Phase::Feedback {
      return Err(SessionError::NotReadyToAdvance);
    }
    self.index += 1;
    if self.index >= self.queue.len() {
      self.phase = Phase::Complete;
      self.timers.clear();
      return Ok(Progress::Complete { summary: self.summary() });
    }

    self.token = tokens.next();
    self.phase = Phase::Asking;
    self.present(now);
    match self.current() {
      Some(question) => Ok(Progress::Next { question }),
      None => Err(SessionError::NotReadyToAdvance),
    }
  }

  pub fn credit_xp(&mut self, xp: u64) {
    self.stats.xp_gained += xp;
  }

  pub fn summary(&self) -> SessionSummary {
    SessionSummary {
      track: self.config.track,
      correct: self.stats.correct,
      total: self.stats.total,
      best_streak: self.stats.best_streak,
      xp_gained: self.stats.xp_gained,
      weak_items: self.stats.missed.iter().map(|i| i.label()).collect(),
      complete: self.phase == Phase::Complete,
    }
  }

  pub fn tally(&self) -> SessionTally {
    SessionTally {
      correct: self.stats.correct,
      total: self.stats.total,
      best_streak: self.stats.best_streak,
    }
  }

  fn live_item(&self) -> Result<QueueItem, SessionError> {
    self
      .queue
      .get(self.index)
      .copied()
      .ok_or(SessionError::NotAwaitingAnswer)
  }

  fn present(&mut self, now: DateTime<Utc>) {
    self.presented_at = now;
    self.hint_visible = false;
    self.choices.clear();

    let Some(item) = self.queue.get(self.index).copied() else {
      return;
    };
    if item.mode == InteractionMode::Flash {
      let (a, b) = item.item.operands();
      self.choices = generate_choices(a, b, item.box_level, &mut rand::rng());
    }

    self.timers = vec![TimerRequest {
      kind: TimerKind::Timeout,
      token: self.token,
      delay: self.config.time_limit_for(item.mode),
    }];
    if self.config.auto_hint {
      self.timers.push(TimerRequest {
        kind: TimerKind::Hint,
        token: self.token,
        delay: HINT_DELAY,
      });
    }
  }

  fn settle(&mut self, item: QueueItem, correct: bool, timed_out: bool, taken: f64) -> Verdict {
    let streak_before = self.stats.streak;
    self.stats.record(item.item, correct);
    self.phase = Phase::Feedback;
    self.timers = vec![TimerRequest {
      kind: TimerKind::Advance,
      token: self.token,
      delay: if correct {
        CORRECT_FEEDBACK_DELAY
      } else {
        INCORRECT_FEEDBACK_DELAY
      },
    }];

    Verdict {
      item: item.item,
      mode: item.mode,
      correct,
      correct_value: item.item.product(),
      timed_out,
      time_taken_secs: taken,
      time_limit_secs: self.config.time_limit_for(item.mode).as_secs_f64(),
      streak_before,
      streak: self.stats.streak,
    }
  }
}
