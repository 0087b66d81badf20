//! Weighted table selection for the tables track.
//!
//! Each draw picks a table by roulette wheel, weighted toward low accuracy,
//! then a uniform multiplier. A draw that repeats one of the last few
//! (table, multiplier) pairs is retried a bounded number of times.

use rand::Rng;
use std::collections::BTreeSet;

use crate::domain::{ItemRef, ModePolicy, QueueItem, SessionMode, TableProgress, MULTIPLIERS, TABLES};

use super::mode::mode_for_session;

/// Floor added to every table so mastered tables still come up
const BASE_TABLE_WEIGHT: f64 = 0.2;

/// Number of previous draws checked for an identical pair
const REPEAT_WINDOW: usize = 4;

/// Draw attempts per question before accepting a repeat
const MAX_DRAW_ATTEMPTS: usize = 6;

/// Represents a table with its calculated selection weight
#[derive(Debug, Clone)]
pub struct TableWeight {
  pub table: u8,
  pub weight: f64,
}

/// Weight of a table: `(1 - accuracy) + 0.2`, unplayed tables at full weight
pub fn calculate_table_weight(accuracy: f64) -> f64 {
  (1.0 - accuracy) + BASE_TABLE_WEIGHT
}

/// Weights for the selected tables that exist in the progress map
pub fn calculate_all_weights(progress: &TableProgress, selected: &BTreeSet<u8>) -> Vec<TableWeight> {
  selected
    .iter()
    .filter(|t| TABLES.contains(*t))
    .map(|&table| TableWeight {
      table,
      weight: calculate_table_weight(progress.stats(table).accuracy()),
    })
    .collect()
}

/// Select a table using weighted random selection
/// Higher weight = more likely to be selected
pub fn weighted_random_select<R: Rng + ?Sized>(weights: &[TableWeight], rng: &mut R) -> Option<u8> {
  if weights.is_empty() {
    return None;
  }

  if weights.len() == 1 {
    return Some(weights[0].table);
  }

  let total_weight: f64 = weights.iter().map(|w| w.weight).sum();

  if total_weight <= 0.0 {
    // Fallback to uniform if weights are invalid
    let idx = rng.random_range(0..weights.len());
    return Some(weights[idx].table);
  }

  let mut target = rng.random_range(0.0..total_weight);
  for w in weights {
    target -= w.weight;
    if target <= 0.0 {
      return Some(w.table);
    }
  }

  // Float slack: fall back to the last table
  weights.last().map(|w| w.table)
}

/// Number of distinct questions the selection can produce
pub fn eligible_pool_size(selected: &BTreeSet<u8>) -> usize {
  selected.iter().filter(|t| TABLES.contains(*t)).count() * MULTIPLIERS.count()
}

/// Build the ordered queue for one tables session.
///
/// Length is `min(question_count, 9 × selected tables)`; empty when no valid
/// table is selected.
pub fn build_table_queue<R: Rng + ?Sized>(
  progress: &TableProgress,
  selected: &BTreeSet<u8>,
  question_count: usize,
  session_mode: SessionMode,
  policy: ModePolicy,
  rng: &mut R,
) -> Vec<QueueItem> {
  let weights = calculate_all_weights(progress, selected);
  let length = question_count.min(eligible_pool_size(selected));
  let mut queue: Vec<QueueItem> = Vec::with_capacity(length);

  while queue.len() < length {
    let mut drawn = None;
    for _ in 0..MAX_DRAW_ATTEMPTS {
      let Some(table) = weighted_random_select(&weights, rng) else {
        return queue;
      };
      let multiplier = rng.random_range(MULTIPLIERS);
      let candidate = ItemRef::Table { table, multiplier };
      drawn = Some(candidate);
      if !recently_drawn(&queue, candidate) {
        break;
      }
    }

    let Some(item) = drawn else {
      break;
    };
    let (table, _) = item.operands();
    let box_level = progress.stats(table).derived_box();
    queue.push(QueueItem {
      item,
      mode: mode_for_session(session_mode, policy, box_level, rng),
      box_level,
    });
  }

  queue
}

fn recently_drawn(queue: &[QueueItem], candidate: ItemRef) -> bool {
  let start = queue.len().saturating_sub(REPEAT_WINDOW);
  queue[start..].iter().any(|q| q.item == candidate)
}
