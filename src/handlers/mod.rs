//! JSON API over the trainer.

pub mod progress;
pub mod session;

use axum::{
  http::StatusCode,
  response::{IntoResponse, Response},
  routing::{get, post},
  Json, Router,
};

use crate::session::SessionError;
use crate::state::AppState;
use crate::trainer::StartError;

pub use progress::{history, progress, reset};
pub use session::{advance, current, select_choice, start, stop, submit_answer, summary};

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/progress", get(progress))
    .route("/api/history", get(history))
    .route("/api/reset", post(reset))
    .route("/api/session/start", post(start))
    .route("/api/session/current", get(current))
    .route("/api/session/answer", post(submit_answer))
    .route("/api/session/choice", post(select_choice))
    .route("/api/session/next", post(advance))
    .route("/api/session/stop", post(stop))
    .route("/api/session/summary", get(summary))
    .with_state(state)
}

/// Error body shared by every endpoint: `{"error": "..."}`
pub struct ApiError {
  status: StatusCode,
  message: String,
}

impl ApiError {
  pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
    Self {
      status,
      message: message.into(),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    (self.status, Json(serde_json::json!({ "error": self.message }))).into_response()
  }
}

impl From<SessionError> for ApiError {
  fn from(e: SessionError) -> Self {
    Self::new(StatusCode::CONFLICT, e.to_string())
  }
}

impl From<StartError> for ApiError {
  fn from(e: StartError) -> Self {
    Self::new(StatusCode::UNPROCESSABLE_ENTITY, e.to_string())
  }
}

pub type ApiResult<T> = std::result::Result<Json<T>, ApiError>;
