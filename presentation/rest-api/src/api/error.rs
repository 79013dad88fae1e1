use poem::error::MethodNotAllowedError;
use poem::http::StatusCode;
use poem::{IntoResponse, Response};
use poem_openapi::{Object, payload::Json};
use serde::Serialize;

/// Body of every error response.
#[derive(Object, Serialize, Debug)]
pub struct ErrorResponse {
    /// Human-readable failure description
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

pub trait IntoErrorResponse {
    fn into_error_response(self) -> (StatusCode, Json<ErrorResponse>);
}

fn json_error(status: StatusCode, error: impl Into<String>) -> Response {
    poem::web::Json(ErrorResponse::new(error))
        .with_status(status)
        .into_response()
}

pub async fn method_not_allowed(_: MethodNotAllowedError) -> Response {
    json_error(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed")
}

/// Renders errors raised outside the handlers (routing, body limits) as JSON.
pub async fn any_error(err: poem::Error) -> Response {
    let status = err.status();
    let message = match status {
        StatusCode::NOT_FOUND => "Not Found".to_string(),
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large".to_string(),
        _ if status.is_server_error() => "Processing failed".to_string(),
        _ => err.to_string(),
    };
    json_error(status, message)
}
