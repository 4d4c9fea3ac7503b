//! HTTP response rendering for handler output and errors.

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use serde_json::json;

use httpbench_core::error::{BenchError, ClientCode};

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// 200 with an already encoded JSON body.
pub fn json_ok(body: Bytes) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, CONTENT_TYPE_JSON)],
        body,
    )
        .into_response()
}

/// Error rendered as `{"error": CODE, "message": text}`.
pub struct ErrorResponse(pub BenchError);

impl From<BenchError> for ErrorResponse {
    fn from(e: BenchError) -> Self {
        Self(e)
    }
}

impl ErrorResponse {
    pub fn status(&self) -> StatusCode {
        match self.0.client_code() {
            ClientCode::BadRequest => StatusCode::BAD_REQUEST,
            ClientCode::NotFound => StatusCode::NOT_FOUND,
            ClientCode::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            ClientCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = Json(json!({
            "error": self.0.client_code().as_str(),
            "message": self.0.to_string(),
        }));
        (status, body).into_response()
    }
}
