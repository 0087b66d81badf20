//! Application context: mastery state, the active session and persistence.
//!
//! `Trainer` is the one owner of mastery. Every recorded answer updates the
//! in-memory state first and then overwrites the persisted blob for its
//! track, so the next scheduling decision always reads the latest state.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::db::{LogOnError, ProgressRepository};
use crate::domain::{FactProgress, HistoryEntry, InteractionMode, ItemRef, TableProgress, Track};
use crate::session::{
  Phase, Progress, QuestionToken, QuestionView, Session, SessionConfig, SessionError, SessionOverrides,
  SessionSummary, TimerKind, TimerRequest, TokenSource, Verdict,
};
use crate::srs::{self, MasteryChange};

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

/// Why a session could not start. Nothing is mutated in either case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartError {
  /// Scheduler produced no questions
  NothingToPractice,
  /// Tables track with no valid table selected
  NoTablesSelected,
}

impl std::fmt::Display for StartError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::NothingToPractice => write!(f, "Nothing to practice right now"),
      Self::NoTablesSelected => write!(f, "Select at least one table"),
    }
  }
}

impl std::error::Error for StartError {}

/// Result of an answer attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnswerOutcome {
  /// Empty or non-numeric input; nothing recorded
  NeedsInput,
  Judged(AnswerResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnswerResult {
  pub correct: bool,
  pub correct_value: i64,
  pub timed_out: bool,
  pub streak: u32,
  pub xp_awarded: u64,
  /// New level, when this answer crossed a level threshold
  #[serde(skip_serializing_if = "Option::is_none")]
  pub level_up: Option<u32>,
  /// Box after the update (facts track)
  #[serde(skip_serializing_if = "Option::is_none")]
  pub box_level: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FactView {
  pub id: String,
  pub a: u8,
  pub b: u8,
  pub box_level: u8,
  pub last_reviewed: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableView {
  pub table: u8,
  pub correct: u32,
  pub total: u32,
  pub accuracy: f64,
}

/// Everything the dashboard renders
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MasterySnapshot {
  pub xp: u64,
  pub level: u32,
  pub level_progress: f64,
  pub mastery_percent: u32,
  pub current_streak: u32,
  pub facts: Vec<FactView>,
  pub tables: Vec<TableView>,
}

pub struct Trainer {
  repo: ProgressRepository,
  facts: FactProgress,
  tables: TableProgress,
  history: Vec<HistoryEntry>,
  defaults: SessionConfig,
  session: Option<Session>,
  tokens: TokenSource,
}

impl Trainer {
  /// Load persisted progress (or defaults) and get ready for a session.
  pub fn init(repo: ProgressRepository, defaults: SessionConfig) -> Self {
    let facts = repo.load_facts();
    let tables = repo.load_tables();
    let history = repo.load_history();
    tracing::info!(
      "Loaded progress: {} XP, {}% mastered, {} history days",
      facts.xp,
      facts.mastery_percent(),
      history.len()
    );
    Self {
      repo,
      facts,
      tables,
      history,
      defaults: defaults.clamped(),
      session: None,
      tokens: TokenSource::default(),
    }
  }

  /// Persist everything and drop the active session.
  pub fn teardown(&mut self) {
    self.session = None;
    self.persist(Track::Facts);
    self.persist(Track::Tables);
  }

  pub fn defaults(&self) -> &SessionConfig {
    &self.defaults
  }

  pub fn facts(&self) -> &FactProgress {
    &self.facts
  }

  pub fn tables(&self) -> &TableProgress {
    &self.tables
  }

  pub fn history(&self) -> &[HistoryEntry] {
    &self.history
  }

  pub fn session(&self) -> Option<&Session> {
    self.session.as_ref()
  }

  /// Build a queue and present its first question.
  pub fn start_session(
    &mut self,
    overrides: SessionOverrides,
    now: DateTime<Utc>,
  ) -> Result<QuestionView, StartError> {
    let config = self.defaults.with_overrides(overrides);
    let mut rng = rand::rng();

    if config.track == Track::Tables && srs::eligible_pool_size(&config.selected_tables) == 0 {
      return Err(StartError::NoTablesSelected);
    }

    let queue = crate::profile_scope!("build_queue", {
      match config.track {
        Track::Facts => srs::build_fact_queue(
          &self.facts,
          config.question_count,
          config.mode,
          config.mode_policy,
          now,
          &mut rng,
        ),
        Track::Tables => srs::build_table_queue(
          &self.tables,
          &config.selected_tables,
          config.question_count,
          config.mode,
          config.mode_policy,
          &mut rng,
        ),
      }
    });

    tracing::debug!("Built {} queue with {} questions", config.track.as_str(), queue.len());

    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::QueueBuilt {
      track: config.track.as_str().into(),
      length: queue.len(),
    });

    let track = config.track;
    let session = Session::start(config, queue, &mut self.tokens, now).ok_or(StartError::NothingToPractice)?;
    let question = session.current().ok_or(StartError::NothingToPractice)?;
    self.session = Some(session);
    tracing::info!("Started {} session", track.as_str());
    Ok(question)
  }

  pub fn current_question(&self) -> Result<QuestionView, SessionError> {
    let session = self.session.as_ref().ok_or(SessionError::NoActiveSession)?;
    session.current().ok_or(SessionError::NotAwaitingAnswer)
  }

  /// Typed answer. Empty or non-numeric input is reported, not recorded.
  pub fn submit_answer(&mut self, input: &str, now: DateTime<Utc>) -> Result<AnswerOutcome, SessionError> {
    let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
    let Ok(value) = input.trim().parse::<i64>() else {
      // Still reject answers outside the asking phase
      return match session.current() {
        Some(q) if q.phase == Phase::Asking => Ok(AnswerOutcome::NeedsInput),
        _ => Err(SessionError::NotAwaitingAnswer),
      };
    };
    let verdict = session.answer(value, now)?;
    Ok(AnswerOutcome::Judged(self.settle(verdict, now)))
  }

  /// Multiple-choice answer. Only a flash question's offered choices are accepted.
  pub fn select_choice(&mut self, value: i64, now: DateTime<Utc>) -> Result<AnswerResult, SessionError> {
    let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
    let offered = session.current().is_some_and(|q| {
      q.phase == Phase::Asking
        && q.mode == InteractionMode::Flash
        && q.choices.is_some_and(|c| c.contains(&value))
    });
    if !offered {
      return Err(SessionError::NotAwaitingAnswer);
    }
    let verdict = session.answer(value, now)?;
    Ok(self.settle(verdict, now))
  }

  /// Time limit elapsed for `token`; no-op unless that question is still live.
  pub fn on_timeout(&mut self, token: QuestionToken, now: DateTime<Utc>) -> Option<AnswerResult> {
    let verdict = self.session.as_mut()?.expire(token)?;
    tracing::debug!("Question {} timed out", verdict.item.label());
    Some(self.settle(verdict, now))
  }

  /// Move past the feedback phase immediately.
  pub fn advance(&mut self, now: DateTime<Utc>) -> Result<Progress, SessionError> {
    let session = self.session.as_mut().ok_or(SessionError::NoActiveSession)?;
    let progress = session.advance(&mut self.tokens, now)?;

    if let Progress::Complete { summary } = &progress {
      tracing::info!(
        "Session complete: {}/{} correct, best streak {}",
        summary.correct,
        summary.total,
        summary.best_streak
      );

      #[cfg(feature = "profiling")]
      crate::profile_log!(EventType::SessionComplete {
        track: summary.track.as_str().into(),
        correct: summary.correct,
        total: summary.total,
      });

      if summary.track == Track::Tables {
        let tally = session.tally();
        if let Some(history) = self
          .repo
          .record_history(now.date_naive(), tally)
          .log_warn("Failed to save history")
        {
          self.history = history;
        }
      }
    }
    Ok(progress)
  }

  /// Dispatch a fired timer. Stale tokens are ignored.
  pub fn fire(&mut self, request: TimerRequest, now: DateTime<Utc>) {
    match request.kind {
      TimerKind::Timeout => {
        self.on_timeout(request.token, now);
      }
      TimerKind::Hint => {
        if let Some(session) = self.session.as_mut() {
          session.reveal_hint(request.token);
        }
      }
      TimerKind::Advance => {
        let live = self
          .session
          .as_ref()
          .is_some_and(|s| s.token() == request.token);
        if live {
          self.advance(now).log_warn("Timer advance failed");
        }
      }
    }
  }

  /// Timers the active session wants armed; empty when idle
  pub fn timer_plan(&self) -> Vec<TimerRequest> {
    self
      .session
      .as_ref()
      .map(|s| s.timer_plan().to_vec())
      .unwrap_or_default()
  }

  /// Abandon the active session. Answers already given stay recorded.
  pub fn stop(&mut self) -> bool {
    self.session.take().is_some()
  }

  pub fn summary(&self) -> Result<SessionSummary, SessionError> {
    self
      .session
      .as_ref()
      .map(Session::summary)
      .ok_or(SessionError::NoActiveSession)
  }

  pub fn mastery_snapshot(&self) -> MasterySnapshot {
    MasterySnapshot {
      xp: self.facts.xp,
      level: srs::calculate_level(self.facts.xp),
      level_progress: srs::level_progress(self.facts.xp),
      mastery_percent: self.facts.mastery_percent(),
      current_streak: self.session.as_ref().map_or(0, |s| s.stats().streak),
      facts: self
        .facts
        .iter()
        .map(|f| FactView {
          id: f.id.clone(),
          a: f.a,
          b: f.b,
          box_level: f.box_level,
          last_reviewed: f.last_reviewed_at(),
        })
        .collect(),
      tables: self
        .tables
        .iter()
        .map(|(table, stats)| TableView {
          table,
          correct: stats.correct,
          total: stats.total,
          accuracy: stats.accuracy(),
        })
        .collect(),
    }
  }

  /// Wipe persisted data and return to first-run state.
  pub fn reset(&mut self) {
    self.repo.clear().log_warn("Failed to clear stored progress");
    self.session = None;
    self.facts = FactProgress::default();
    self.tables = TableProgress::default();
    self.history.clear();
    tracing::info!("Progress reset");
  }

  /// Record a verdict against mastery, award XP and persist.
  fn settle(&mut self, verdict: Verdict, now: DateTime<Utc>) -> AnswerResult {
    let change = srs::record_result(&mut self.facts, &mut self.tables, verdict.item, verdict.correct, now);

    #[cfg(feature = "profiling")]
    crate::profile_log!(EventType::AnswerRecorded {
      item: verdict.item.label(),
      mode: verdict.mode.as_str().into(),
      is_correct: verdict.correct,
      timed_out: verdict.timed_out,
    });

    let mut xp_awarded = 0;
    let mut level_up = None;
    if verdict.correct && matches!(verdict.item, ItemRef::Fact { .. }) {
      let before = srs::calculate_level(self.facts.xp);
      xp_awarded = srs::xp_award(verdict.streak_before, verdict.time_limit_secs, verdict.time_taken_secs);
      self.facts.xp = self.facts.xp.saturating_add(xp_awarded);
      if let Some(session) = self.session.as_mut() {
        session.credit_xp(xp_awarded);
      }
      let after = srs::calculate_level(self.facts.xp);
      if after > before {
        tracing::info!("Level {} reached", after);
        level_up = Some(after);
      }
    }

    let track = match verdict.item {
      ItemRef::Fact { .. } => Track::Facts,
      ItemRef::Table { .. } => Track::Tables,
    };
    self.persist(track);

    let box_level = match change {
      MasteryChange::Box { to, .. } => Some(to),
      _ => None,
    };

    AnswerResult {
      correct: verdict.correct,
      correct_value: verdict.correct_value,
      timed_out: verdict.timed_out,
      streak: verdict.streak,
      xp_awarded,
      level_up,
      box_level,
    }
  }

  fn persist(&mut self, track: Track) {
    let result = match track {
      Track::Facts => self.repo.save_facts(&self.facts),
      Track::Tables => self.repo.save_tables(&self.tables),
    };
    result.log_warn("Failed to persist progress");
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::db::{MemoryStore, FACTS_KEY, TABLES_KEY};
  use crate::domain::{ModePolicy, SessionMode, TableStats};
  use crate::testing::TestEnv;
  use std::collections::BTreeSet;

  fn trainer() -> Trainer {
    Trainer::init(
      ProgressRepository::new(Box::new(MemoryStore::new())),
      SessionConfig::default(),
    )
  }

  fn recall_only() -> SessionOverrides {
    SessionOverrides {
      mode: Some(SessionMode::Recall),
      ..SessionOverrides::default()
    }
  }

  fn answer_current(trainer: &mut Trainer, correctly: bool) -> AnswerResult {
    let q = trainer.current_question().unwrap();
    let product = q.a as i64 * q.b as i64;
    let value = if correctly { product } else { product + 1 };
    match trainer.submit_answer(&value.to_string(), Utc::now()).unwrap() {
      AnswerOutcome::Judged(result) => result,
      AnswerOutcome::NeedsInput => panic!("numeric answer rejected"),
    }
  }

  #[test]
  fn test_start_facts_session() {
    let mut trainer = trainer();
    let question = trainer.start_session(recall_only(), Utc::now()).unwrap();
    assert_eq!(question.total, 20);
    assert_eq!(question.position, 1);
    assert_eq!(question.mode, InteractionMode::Recall);
  }

  #[test]
  fn test_no_tables_selected() {
    let mut trainer = trainer();
    let overrides = SessionOverrides {
      track: Some(Track::Tables),
      selected_tables: Some(BTreeSet::new()),
      ..SessionOverrides::default()
    };
    assert_eq!(
      trainer.start_session(overrides, Utc::now()),
      Err(StartError::NoTablesSelected)
    );
    assert!(trainer.session().is_none());
    assert_eq!(trainer.tables(), &TableProgress::default());
  }

  #[test]
  fn test_empty_input_needs_answer() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    for input in ["", "   ", "abc", "4 2"] {
      assert_eq!(trainer.submit_answer(input, Utc::now()), Ok(AnswerOutcome::NeedsInput));
    }
    let session = trainer.session().unwrap();
    assert_eq!(session.stats().total, 0);
    assert_eq!(session.phase(), Phase::Asking);
  }

  #[test]
  fn test_answer_without_session() {
    let mut trainer = trainer();
    assert_eq!(
      trainer.submit_answer("12", Utc::now()),
      Err(SessionError::NoActiveSession)
    );
    assert_eq!(trainer.summary(), Err(SessionError::NoActiveSession));
  }

  #[test]
  fn test_correct_answer_promotes_and_awards_xp() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let result = answer_current(&mut trainer, true);
    assert!(result.correct);
    assert_eq!(result.box_level, Some(1));
    assert!(result.xp_awarded >= 10);
    assert_eq!(trainer.facts().xp, result.xp_awarded);
    assert_eq!(trainer.summary().unwrap().xp_gained, result.xp_awarded);
  }

  #[test]
  fn test_wrong_answer_resets_box_and_streak() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    answer_current(&mut trainer, true);
    trainer.advance(Utc::now()).unwrap();
    let result = answer_current(&mut trainer, false);
    assert!(!result.correct);
    assert_eq!(result.box_level, Some(0));
    assert_eq!(result.streak, 0);
    assert_eq!(result.xp_awarded, 0);
  }

  #[test]
  fn test_choice_only_for_offered_flash_values() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let q = trainer.current_question().unwrap();
    let product = q.a as i64 * q.b as i64;
    assert_eq!(
      trainer.select_choice(product, Utc::now()),
      Err(SessionError::NotAwaitingAnswer)
    );
    trainer.stop();

    let flash = SessionOverrides {
      mode: Some(SessionMode::Flash),
      ..SessionOverrides::default()
    };
    trainer.start_session(flash, Utc::now()).unwrap();
    let q = trainer.current_question().unwrap();
    let choices = q.choices.unwrap();
    let outside = (0..).find(|v| !choices.contains(v)).unwrap();
    assert_eq!(
      trainer.select_choice(outside, Utc::now()),
      Err(SessionError::NotAwaitingAnswer)
    );
    assert_eq!(trainer.session().unwrap().stats().total, 0);

    let result = trainer.select_choice(q.a as i64 * q.b as i64, Utc::now()).unwrap();
    assert!(result.correct);
  }

  #[test]
  fn test_timeout_after_answer_not_double_counted() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let token = trainer.current_question().unwrap().token;
    answer_current(&mut trainer, true);

    assert!(trainer.on_timeout(token, Utc::now()).is_none());
    trainer.fire(
      TimerRequest {
        kind: TimerKind::Timeout,
        token,
        delay: std::time::Duration::ZERO,
      },
      Utc::now(),
    );
    let summary = trainer.summary().unwrap();
    assert_eq!(summary.total, 1);
    assert_eq!(summary.correct, 1);
  }

  #[test]
  fn test_timeout_records_failure() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let q = trainer.current_question().unwrap();
    let result = trainer.on_timeout(q.token, Utc::now()).unwrap();
    assert!(result.timed_out);
    assert!(!result.correct);
    assert_eq!(result.correct_value, q.a as i64 * q.b as i64);
  }

  #[test]
  fn test_advance_timer_ignores_stale_token() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let first = trainer.current_question().unwrap().token;
    answer_current(&mut trainer, true);
    trainer.advance(Utc::now()).unwrap();
    let second = trainer.current_question().unwrap();

    trainer.fire(
      TimerRequest {
        kind: TimerKind::Advance,
        token: first,
        delay: std::time::Duration::ZERO,
      },
      Utc::now(),
    );
    let still = trainer.current_question().unwrap();
    assert_eq!(still.token, second.token);
    assert_eq!(still.phase, Phase::Asking);
  }

  #[test]
  fn test_advance_timer_moves_to_next_question() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let token = trainer.current_question().unwrap().token;
    answer_current(&mut trainer, true);

    let advance = TimerRequest {
      kind: TimerKind::Advance,
      token,
      delay: std::time::Duration::ZERO,
    };
    trainer.fire(advance, Utc::now());
    let next = trainer.current_question().unwrap();
    assert_eq!(next.position, 2);
    assert_eq!(next.phase, Phase::Asking);

    // a repeated delivery is stale and changes nothing
    trainer.fire(advance, Utc::now());
    assert_eq!(trainer.current_question().unwrap().position, 2);
  }

  #[test]
  fn test_same_fact_five_times_reaches_box_five() {
    let mut trainer = trainer();
    let smart = SessionOverrides {
      mode: Some(SessionMode::Smart),
      mode_policy: Some(ModePolicy::BoxDriven),
      ..SessionOverrides::default()
    };
    let mut boxes = Vec::new();
    let mut modes = Vec::new();
    // Each session asks new facts first; keep answering until 6x7 was hit five times
    'outer: for _ in 0..200 {
      trainer.start_session(smart.clone(), Utc::now()).unwrap();
      loop {
        let q = trainer.current_question().unwrap();
        let result = answer_current(&mut trainer, true);
        if (q.a, q.b) == (6, 7) {
          modes.push(q.mode);
          boxes.push(result.box_level.unwrap());
          if boxes.len() == 5 {
            break 'outer;
          }
        }
        if let Progress::Complete { .. } = trainer.advance(Utc::now()).unwrap() {
          break;
        }
      }
    }
    // box 0 is always typed
    assert_eq!(modes[0], InteractionMode::Recall);
    assert_eq!(boxes, vec![1, 2, 3, 4, 5]);
    assert_eq!(trainer.facts().get("6x7").unwrap().box_level, 5);
  }

  #[test]
  fn test_tables_session_completes_and_records_history() {
    let mut trainer = trainer();
    let overrides = SessionOverrides {
      track: Some(Track::Tables),
      selected_tables: Some([2, 3].into_iter().collect()),
      question_count: Some(10),
      mode: Some(SessionMode::Recall),
      mode_policy: Some(ModePolicy::BoxDriven),
      ..SessionOverrides::default()
    };
    let first = trainer.start_session(overrides, Utc::now()).unwrap();
    assert_eq!(first.total, 10);

    let mut answered = 0;
    loop {
      let q = trainer.current_question().unwrap();
      assert!(q.a == 2 || q.a == 3);
      answer_current(&mut trainer, answered % 2 == 0);
      answered += 1;
      if let Progress::Complete { summary } = trainer.advance(Utc::now()).unwrap() {
        assert_eq!(summary.total, 10);
        assert_eq!(summary.correct, 5);
        break;
      }
    }

    let two = trainer.tables().stats(2);
    let three = trainer.tables().stats(3);
    assert_eq!(two.total + three.total, 10);
    assert_eq!(two.correct + three.correct, 5);
    assert_eq!(trainer.tables().stats(4), TableStats::default());

    assert_eq!(trainer.history().len(), 1);
    assert_eq!(trainer.history()[0].sessions, 1);
    assert_eq!(trainer.history()[0].total, 10);

    // no XP on the tables track
    assert_eq!(trainer.facts().xp, 0);
  }

  #[test]
  fn test_malformed_tables_blob_starts_fresh() {
    let repo = ProgressRepository::new(Box::new(MemoryStore::new().with_entry(TABLES_KEY, "{not json")));
    let trainer = Trainer::init(repo, SessionConfig::default());
    let fresh = trainer.mastery_snapshot();
    assert_eq!(fresh.tables.len(), 9);
    assert!(fresh.tables.iter().all(|t| t.correct == 0 && t.total == 0));
  }

  #[test]
  fn test_extreme_stored_counters_do_not_panic() {
    let store = MemoryStore::new()
      .with_entry(FACTS_KEY, &format!(r#"{{"xp":{},"facts":{{}}}}"#, u64::MAX))
      .with_entry(
        TABLES_KEY,
        &format!(r#"{{"perTable":{{"2":{{"correct":0,"total":{}}}}}}}"#, u32::MAX),
      );
    let mut trainer = Trainer::init(ProgressRepository::new(Box::new(store)), SessionConfig::default());
    let snapshot = trainer.mastery_snapshot();
    assert!(snapshot.level > 1);
    assert!((0.0..=1.0).contains(&snapshot.level_progress));

    // correct fact answer at max XP
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let result = answer_current(&mut trainer, true);
    assert!(result.correct);
    assert_eq!(trainer.facts().xp, u64::MAX);
    trainer.stop();

    // wrong table answer at max total
    let overrides = SessionOverrides {
      track: Some(Track::Tables),
      selected_tables: Some([2].into_iter().collect()),
      mode: Some(SessionMode::Recall),
      ..SessionOverrides::default()
    };
    trainer.start_session(overrides, Utc::now()).unwrap();
    answer_current(&mut trainer, false);
    assert_eq!(trainer.tables().stats(2), TableStats { correct: 0, total: u32::MAX });
  }

  #[test]
  fn test_progress_persists_across_init() {
    let env = TestEnv::new().unwrap();
    let mut trainer = Trainer::init(env.repository().unwrap(), SessionConfig::default());
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    let q = trainer.current_question().unwrap();
    answer_current(&mut trainer, true);
    let xp = trainer.facts().xp;
    assert!(xp > 0);
    trainer.teardown();
    assert!(trainer.session().is_none());
    drop(trainer);

    let reloaded = Trainer::init(env.repository().unwrap(), SessionConfig::default());
    assert_eq!(reloaded.facts().xp, xp);
    let id = crate::domain::fact_id(q.a, q.b);
    assert_eq!(reloaded.facts().get(&id).unwrap().box_level, 1);
  }

  #[test]
  fn test_stop_and_reset() {
    let mut trainer = trainer();
    trainer.start_session(recall_only(), Utc::now()).unwrap();
    answer_current(&mut trainer, true);
    assert!(trainer.stop());
    assert!(!trainer.stop());
    assert!(trainer.facts().xp > 0);

    trainer.reset();
    assert_eq!(trainer.facts(), &FactProgress::default());
    assert!(trainer.timer_plan().is_empty());
  }

  #[test]
  fn test_snapshot_levels() {
    let mut trainer = trainer();
    trainer.facts.xp = 125;
    let snapshot = trainer.mastery_snapshot();
    assert_eq!(snapshot.level, 2);
    assert!((snapshot.level_progress - 0.5).abs() < 1e-9);
    assert_eq!(snapshot.facts.len(), 64);
  }
}
