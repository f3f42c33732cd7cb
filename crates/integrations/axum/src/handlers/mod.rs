pub(crate) mod courses;
pub(crate) mod other;
pub(crate) mod payments;
pub(crate) mod users;

use axum::Json;
use serde_json::{Value, json};

/// `{"success": true, "message": ...}`
pub(crate) fn message(text: &str) -> Json<Value> {
    Json(json!({ "success": true, "message": text }))
}
