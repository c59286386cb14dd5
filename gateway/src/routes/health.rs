use axum::http::StatusCode;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};

/// GET /ping - liveness probe, no auth.
pub async fn ping() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "message": "pong" })))
}

pub fn router() -> Router {
    Router::new().route("/ping", get(ping))
}
