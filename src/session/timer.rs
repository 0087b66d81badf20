//! Cancellable timers backing a session's timer plan.
//!
//! A `TimerSet` is the single owner of every pending timer task. Arming a new
//! plan aborts whatever was armed before, so at most one plan is live.

use tokio::task::JoinHandle;

use super::TimerRequest;

#[derive(Debug, Default)]
pub struct TimerSet {
  armed: Vec<TimerRequest>,
  handles: Vec<JoinHandle<()>>,
}

impl TimerSet {
  pub fn new() -> Self {
    Self::default()
  }

  /// True when exactly `plan` is what is currently armed
  pub fn is_armed_for(&self, plan: &[TimerRequest]) -> bool {
    self.armed == plan
  }

  pub fn armed(&self) -> &[TimerRequest] {
    &self.armed
  }

  /// Abort everything pending and arm `plan`, one task per request.
  pub fn replace<F>(&mut self, plan: &[TimerRequest], mut spawn: F)
  where
    F: FnMut(TimerRequest) -> JoinHandle<()>,
  {
    self.cancel_all();
    self.handles = plan.iter().map(|req| spawn(*req)).collect();
    self.armed = plan.to_vec();
  }

  pub fn cancel_all(&mut self) {
    for handle in self.handles.drain(..) {
      handle.abort();
    }
    self.armed.clear();
  }
}

impl Drop for TimerSet {
  fn drop(&mut self) {
    self.cancel_all();
  }
}
