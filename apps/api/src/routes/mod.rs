pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/analyze", post(handlers::handle_analyze))
        .route(
            "/api/results/:analysis_id",
            get(handlers::handle_get_result),
        )
        .with_state(state)
}
