use axum::response::Json;
use serde_json::{json, Value};

/// Unauthenticated liveness probe.
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
