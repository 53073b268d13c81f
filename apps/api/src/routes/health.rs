use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::db::ping;
use crate::state::AppState;

/// GET /
/// Liveness greeting; echoes the debug flag.
pub async fn root_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "message": "Public Speaking Coach is running",
        "debug": state.config.debug
    }))
}

/// GET /health
/// Returns service status, version, and whether the database answers.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "db_connected": ping(&state.db).await
    }))
}
