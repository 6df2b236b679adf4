pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::suggestions::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Goal suggestions
        .route(
            "/api/v1/goals/suggestions",
            post(handlers::handle_submit_suggestion),
        )
        .route(
            "/api/v1/goals/suggestions/:task_id",
            get(handlers::handle_poll_suggestion),
        )
        // Team analysis
        .route(
            "/api/v1/projects/:project_id/skill-gap",
            post(handlers::handle_skill_gap),
        )
        .with_state(state)
}
