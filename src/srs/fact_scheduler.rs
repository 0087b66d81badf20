//! Session queue for the facts track.
//!
//! Every fact gets a priority weight from its Leitner box plus a bonus that
//! grows with the days since it was last reviewed. The heaviest `2 × count`
//! facts form a pool which is shuffled and cut to `count`, so weak facts
//! dominate without making the order predictable.

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::domain::{Fact, FactProgress, ItemRef, ModePolicy, QueueItem, SessionMode};

use super::mode::mode_for_session;

/// Weight bonus per day since last review
const RECENCY_WEIGHT_PER_DAY: f64 = 10.0;

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Represents a fact with its calculated priority
#[derive(Debug, Clone)]
pub struct FactWeight<'a> {
  pub fact: &'a Fact,
  pub weight: f64,
}

/// Fixed weight by box: new/failed facts are critical
fn box_weight(box_level: u8) -> f64 {
  match box_level {
    0 => 100.0,
    1 => 50.0,
    2 => 25.0,
    b => 10.0 / b as f64,
  }
}

/// Priority of a fact at `now`. Never-reviewed facts count from the epoch,
/// which puts them ahead of everything reviewed since.
pub fn calculate_fact_weight(fact: &Fact, now: DateTime<Utc>) -> f64 {
  let days_since = (now.timestamp_millis() - fact.last_reviewed) as f64 / MS_PER_DAY;
  box_weight(fact.box_level) + days_since.max(0.0) * RECENCY_WEIGHT_PER_DAY
}

/// All facts sorted by descending weight
pub fn rank_facts(progress: &FactProgress, now: DateTime<Utc>) -> Vec<FactWeight<'_>> {
  let mut weighted: Vec<FactWeight<'_>> = progress
    .iter()
    .map(|fact| FactWeight {
      fact,
      weight: calculate_fact_weight(fact, now),
    })
    .collect();
  weighted.sort_by(|x, y| y.weight.total_cmp(&x.weight));
  weighted
}

/// Build the ordered queue for one facts session.
///
/// Length is `min(question_count, number of facts)`.
pub fn build_fact_queue<R: Rng + ?Sized>(
  progress: &FactProgress,
  question_count: usize,
  session_mode: SessionMode,
  policy: ModePolicy,
  now: DateTime<Utc>,
  rng: &mut R,
) -> Vec<QueueItem> {
  let ranked = rank_facts(progress, now);
  let pool_size = ranked.len().min(question_count.saturating_mul(2));

  let mut pool: Vec<&Fact> = ranked.into_iter().take(pool_size).map(|w| w.fact).collect();
  pool.shuffle(rng);
  pool.truncate(question_count);

  pool
    .into_iter()
    .map(|fact| QueueItem {
      item: ItemRef::Fact { a: fact.a, b: fact.b },
      mode: mode_for_session(session_mode, policy, fact.box_level, rng),
      box_level: fact.box_level,
    })
    .collect()
}
