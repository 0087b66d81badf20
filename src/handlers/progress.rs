use axum::{extract::State, http::StatusCode, Json};

use super::ApiResult;
use crate::domain::HistoryEntry;
use crate::state::AppState;
use crate::trainer::MasterySnapshot;

/// GET /api/progress
pub async fn progress(State(state): State<AppState>) -> ApiResult<MasterySnapshot> {
  let inner = state.lock().await;
  Ok(Json(inner.trainer.mastery_snapshot()))
}

/// GET /api/history
pub async fn history(State(state): State<AppState>) -> ApiResult<Vec<HistoryEntry>> {
  let inner = state.lock().await;
  Ok(Json(inner.trainer.history().to_vec()))
}

/// POST /api/reset - wipe all persisted progress
pub async fn reset(State(state): State<AppState>) -> StatusCode {
  let mut inner = state.lock().await;
  inner.trainer.reset();
  state.sync_timers(&mut inner);
  StatusCode::NO_CONTENT
}

#[cfg(test)]
mod tests {
  use axum::http::StatusCode;
  use serde_json::{json, Value};

  use crate::handlers::test_support::server;

  #[tokio::test]
  async fn test_fresh_progress() {
    let (server, _) = server();
    let response = server.get("/api/progress").await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["xp"], 0);
    assert_eq!(body["level"], 1);
    assert_eq!(body["mastery_percent"], 0);
    assert_eq!(body["facts"].as_array().unwrap().len(), 64);
    assert_eq!(body["tables"].as_array().unwrap().len(), 9);
  }

  #[tokio::test]
  async fn test_history_starts_empty() {
    let (server, _) = server();
    let body: Value = server.get("/api/history").await.json();
    assert_eq!(body, json!([]));
  }

  #[tokio::test]
  async fn test_reset_clears_xp_and_session() {
    let (server, _) = server();
    let question: Value = server
      .post("/api/session/start")
      .json(&json!({ "question_count": 5, "mode": "recall" }))
      .await
      .json();
    let product = question["a"].as_i64().unwrap() * question["b"].as_i64().unwrap();
    server
      .post("/api/session/answer")
      .json(&json!({ "value": product.to_string() }))
      .await
      .assert_status_ok();

    let before: Value = server.get("/api/progress").await.json();
    assert!(before["xp"].as_u64().unwrap() > 0);

    server.post("/api/reset").await.assert_status(StatusCode::NO_CONTENT);

    let after: Value = server.get("/api/progress").await.json();
    assert_eq!(after["xp"], 0);
    server
      .get("/api/session/current")
      .await
      .assert_status(StatusCode::NOT_FOUND);
  }
}
