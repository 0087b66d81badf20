//! Application state shared by handlers and timer tasks.
//!
//! Everything that mutates practice state goes through one
//! `tokio::sync::Mutex`, so handler calls and timer fires are serialized.
//! After every transition the caller runs `sync_timers`, which re-arms the
//! `TimerSet` whenever the session's timer plan changed.

use chrono::Utc;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::session::{TimerRequest, TimerSet};
use crate::trainer::Trainer;

pub struct AppInner {
    pub trainer: Trainer,
    pub timers: TimerSet,
}

/// Application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Mutex<AppInner>>,
}

impl AppState {
    pub fn new(trainer: Trainer) -> Self {
        Self {
            inner: Arc::new(Mutex::new(AppInner {
                trainer,
                timers: TimerSet::new(),
            })),
        }
    }

    pub async fn lock(&self) -> MutexGuard<'_, AppInner> {
        self.inner.lock().await
    }

    /// Arm the timers the trainer currently wants, if they are not armed already.
    pub fn sync_timers(&self, inner: &mut AppInner) {
        let plan = inner.trainer.timer_plan();
        if inner.timers.is_armed_for(&plan) {
            return;
        }
        let state = self.clone();
        inner.timers.replace(&plan, |request| {
            let state = state.clone();
            tokio::spawn(async move {
                tokio::time::sleep(request.delay).await;
                state.fire(request).await;
            })
        });
    }

    /// Deliver a fired timer to the trainer, then re-arm for the new state.
    pub async fn fire(&self, request: TimerRequest) {
        let mut inner = self.lock().await;
        tracing::trace!("Timer {:?} fired for question {}", request.kind, request.token.value());
        inner.trainer.fire(request, Utc::now());
        self.sync_timers(&mut inner);
    }

    /// Cancel timers and persist everything.
    pub async fn shutdown(&self) {
        let mut inner = self.lock().await;
        inner.timers.cancel_all();
        inner.trainer.teardown();
    }
}
