//! Session endpoints.
//!
//! Every handler that changes the session re-syncs the timer set before
//! releasing the lock, so armed timers always match the live question.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::Deserialize;

use super::{ApiError, ApiResult};
use crate::session::{Progress, QuestionView, SessionOverrides, SessionSummary};
use crate::state::AppState;
use crate::trainer::{AnswerOutcome, AnswerResult};

#[cfg(feature = "profiling")]
use crate::profiling::EventType;

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
  pub value: String,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceRequest {
  pub value: i64,
}

/// POST /api/session/start
pub async fn start(
  State(state): State<AppState>,
  Json(overrides): Json<SessionOverrides>,
) -> ApiResult<QuestionView> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/session/start".into(),
    method: "POST".into(),
  });

  let mut inner = state.lock().await;
  let question = inner.trainer.start_session(overrides, Utc::now())?;
  state.sync_timers(&mut inner);
  Ok(Json(question))
}

/// GET /api/session/current
pub async fn current(State(state): State<AppState>) -> ApiResult<QuestionView> {
  let inner = state.lock().await;
  inner
    .trainer
    .current_question()
    .map(Json)
    .map_err(|e| ApiError::new(StatusCode::NOT_FOUND, e.to_string()))
}

/// POST /api/session/answer
pub async fn submit_answer(
  State(state): State<AppState>,
  Json(request): Json<AnswerRequest>,
) -> ApiResult<AnswerOutcome> {
  #[cfg(feature = "profiling")]
  crate::profile_log!(EventType::HandlerStart {
    route: "/api/session/answer".into(),
    method: "POST".into(),
  });

  let mut inner = state.lock().await;
  let outcome = inner.trainer.submit_answer(&request.value, Utc::now())?;
  state.sync_timers(&mut inner);
  Ok(Json(outcome))
}

/// POST /api/session/choice
pub async fn select_choice(
  State(state): State<AppState>,
  Json(request): Json<ChoiceRequest>,
) -> ApiResult<AnswerResult> {
  let mut inner = state.lock().await;
  let result = inner.trainer.select_choice(request.value, Utc::now())?;
  state.sync_timers(&mut inner);
  Ok(Json(result))
}

/// POST /api/session/next
pub async fn advance(State(state): State<AppState>) -> ApiResult<Progress> {
  let mut inner = state.lock().await;
  let progress = inner.trainer.advance(Utc::now())?;
  state.sync_timers(&mut inner);
  Ok(Json(progress))
}

/// POST /api/session/stop
pub async fn stop(State(state): State<AppState>) -> StatusCode {
  let mut inner = state.lock().await;
  let stopped = inner.trainer.stop();
  state.sync_timers(&mut inner);
  if stopped {
    tracing::info!("Session stopped");
    StatusCode::NO_CONTENT
  } else {
    StatusCode::CONFLICT
  }
}

/// GET /api/session/summary
pub async fn summary(State(state): State<AppState>) -> ApiResult<SessionSummary> {
  let inner = state.lock().await;
  Ok(Json(inner.trainer.summary()?))
}
