//! XP and level curve for the facts track.

/// Curve constant: level L starts at `XP_PER_LEVEL_UNIT × (L - 1)²`
pub const XP_PER_LEVEL_UNIT: u64 = 50;

/// Base XP for any correct answer
pub const BASE_XP: u64 = 10;
/// Streak length counted toward the bonus
pub const STREAK_BONUS_CAP: u32 = 10;
/// XP per counted streak step
pub const STREAK_BONUS_RATE: u64 = 1;
/// XP per second left on the clock
pub const SPEED_FACTOR: f64 = 2.0;

/// Level reached with `xp`: `floor(1 + sqrt(xp / 50))`
pub fn calculate_level(xp: u64) -> u32 {
  let level = (1.0 + (xp as f64 / XP_PER_LEVEL_UNIT as f64).sqrt()).floor() as u32;
  // float rounding at exact thresholds
  if level > 1 && xp < xp_for_level(level) {
    level - 1
  } else if xp >= xp_for_level(level.saturating_add(1)) {
    level.saturating_add(1)
  } else {
    level
  }
}

/// Minimum XP of `level`
pub fn xp_for_level(level: u32) -> u64 {
  let n = level.saturating_sub(1) as u64;
  XP_PER_LEVEL_UNIT.saturating_mul(n).saturating_mul(n)
}

/// Fraction of the way from the current level to the next, within [0, 1]
pub fn level_progress(xp: u64) -> f64 {
  let level = calculate_level(xp);
  let base = xp_for_level(level) as f64;
  let next = xp_for_level(level + 1) as f64;
  if next <= base {
    return 1.0;
  }
  let raw = (xp as f64 - base) / (next - base);
  raw.clamp(0.0, 1.0)
}

/// XP awarded for a correct answer.
///
/// `streak` is the streak before this answer is counted.
pub fn xp_award(streak: u32, time_limit_secs: f64, time_taken_secs: f64) -> u64 {
  let streak_bonus = streak.min(STREAK_BONUS_CAP) as u64 * STREAK_BONUS_RATE;
  let speed_bonus = ((time_limit_secs - time_taken_secs) * SPEED_FACTOR).round().max(0.0) as u64;
  BASE_XP + streak_bonus + speed_bonus
}
