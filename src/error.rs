use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

pub const INVALID_REQUEST_MESSAGE: &str = "Oops! Missing request parameters or Improper data type(s) and/or out of bound value(s) encountered in request parameters.";
pub const STORE_UNAVAILABLE_MESSAGE: &str = "Something went wrong looking up restaurants, please try again later.";

/// Errors a discovery request can surface to a client. Internal detail never
/// leaks through either message.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    InvalidRequest,
    StoreUnavailable,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InvalidRequest => (StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE),
            ApiError::StoreUnavailable => {
                (StatusCode::INTERNAL_SERVER_ERROR, STORE_UNAVAILABLE_MESSAGE)
            }
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}
