use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /health
/// Returns service status plus the active provider and task counts.
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "leaderai-api",
        "provider": state.tasks.provider_kind(),
        "tasks": {
            "total": state.tasks.task_count(),
            "pending": state.tasks.pending_count(),
        }
    }))
}
