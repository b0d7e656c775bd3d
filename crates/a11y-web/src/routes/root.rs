use axum::Json;
use serde_json::{json, Value};

/// Liveness message.
pub async fn index() -> Json<Value> {
    Json(json!({ "message": "Accessibility Analyzer API is running!" }))
}
