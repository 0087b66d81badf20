//! Recall vs. flash selection per question.

use rand::Rng;

use crate::domain::{InteractionMode, ModePolicy, SessionMode};

/// Flash probability added per box level under `ModePolicy::BoxDriven`
const FLASH_CHANCE_PER_BOX: f64 = 0.1;

/// Boxes below this are flashed under `ModePolicy::Inverted`
const INVERTED_RECALL_FROM_BOX: u8 = 3;

/// Pick a mode for one item according to the policy.
pub fn decide_mode<R: Rng + ?Sized>(policy: ModePolicy, box_level: u8, rng: &mut R) -> InteractionMode {
  match policy {
    ModePolicy::BoxDriven => {
      if box_level == 0 {
        return InteractionMode::Recall;
      }
      let p = (box_level as f64 * FLASH_CHANCE_PER_BOX).min(1.0);
      if rng.random_bool(p) {
        InteractionMode::Flash
      } else {
        InteractionMode::Recall
      }
    }
    ModePolicy::Inverted => {
      if box_level < INVERTED_RECALL_FROM_BOX {
        InteractionMode::Flash
      } else {
        InteractionMode::Recall
      }
    }
  }
}

/// Apply the session-wide mode, deferring to the policy in smart mode.
pub fn mode_for_session<R: Rng + ?Sized>(
  session_mode: SessionMode,
  policy: ModePolicy,
  box_level: u8,
  rng: &mut R,
) -> InteractionMode {
  match session_mode {
    SessionMode::Recall => InteractionMode::Recall,
    SessionMode::Flash => InteractionMode::Flash,
    SessionMode::Smart => decide_mode(policy, box_level, rng),
  }
}
