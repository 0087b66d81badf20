//! Multiple-choice options for flash questions.
//!
//! Wrong answers come first from plausible arithmetic slips around the
//! product (±10, ±operand, ±1), then from random backfill. Generation is
//! bounded, so a short set is possible but an endless loop is not.

use rand::seq::SliceRandom;
use rand::Rng;

/// Maximum candidate draws before giving up on reaching the target size
const MAX_ATTEMPTS: usize = 50;

/// Backfill range for random distractors
const BACKFILL_MIN: i64 = 4;
const BACKFILL_MAX: i64 = 83;

/// Choices are strictly below this
const CHOICE_CEILING: i64 = 100;

/// Total number of choices (correct one included) for a box level
pub fn choice_count(box_level: u8) -> usize {
  match box_level {
    0 => 3,
    1 => 4,
    _ => 6,
  }
}

/// Generate the shuffled choice set for `a × b`.
pub fn generate_choices<R: Rng + ?Sized>(a: u8, b: u8, box_level: u8, rng: &mut R) -> Vec<i64> {
  let correct = a as i64 * b as i64;
  let target = choice_count(box_level);

  let mut slips = vec![
    correct + 10,
    correct - 10,
    correct + a as i64,
    correct - a as i64,
    correct + b as i64,
    correct - b as i64,
    correct + 1,
    correct - 1,
  ];
  slips.shuffle(rng);

  let mut choices = vec![correct];
  let mut attempts = 0;

  while choices.len() < target && attempts < MAX_ATTEMPTS {
    attempts += 1;
    let candidate = match slips.pop() {
      Some(value) => value,
      None => rng.random_range(BACKFILL_MIN..=BACKFILL_MAX),
    };

    if candidate <= 0 || candidate >= CHOICE_CEILING || choices.contains(&candidate) {
      continue;
    }
    choices.push(candidate);
  }

  if choices.len() < target {
    tracing::debug!(
      "Distractor generation for {}x{} capped at {} of {} choices",
      a,
      b,
      choices.len(),
      target
    );
  }

  choices.shuffle(rng);
  choices
}
