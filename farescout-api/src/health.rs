use axum::{extract::State, routing::get, Json, Router};
use serde_json::{json, Value};

use crate::{error::AppError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
}

/// Liveness
async fn index() -> Json<Value> {
    Json(json!({ "message": "Hello World!" }))
}

/// Readiness: the document store must answer a ping
async fn health(State(state): State<AppState>) -> Result<Json<Value>, AppError> {
    state.within_deadline(state.health.ping()).await?;
    Ok(Json(json!({ "status": "ok" })))
}
