use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub const GREETING: &str =
    "Restaurant discovery service is up. Try GET /discovery?lat=<lat>&lon=<lon>.";

pub fn router() -> Router {
    Router::new().route("/", get(get_greeting))
}

/// Static greeting, doubles as a liveness probe.
async fn get_greeting() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "message": GREETING })))
}
