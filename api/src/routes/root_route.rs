use axum::Json;
use serde_json::{Value, json};

/// GET /
///
/// Liveness message.
pub async fn root_route() -> Json<Value> {
    Json(json!({ "message": "Docu Mentor reporting for duty!" }))
}
