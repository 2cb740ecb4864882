//! Liveness endpoint.

use axum::Json;
use serde_json::{Value, json};

/// GET /api/v1/healthz
pub async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
