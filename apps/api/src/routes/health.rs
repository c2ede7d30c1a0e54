use axum::Json;
use serde_json::{json, Value};

/// GET /health
/// Liveness probe: name and version of the running service.
pub async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "service": "resume-insight-api"
    }))
}
