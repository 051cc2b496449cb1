//! API error responses.
//!
//! Every failure leaving the HTTP surface is a JSON body with a stable
//! error code and a human-readable message. Upstream/provider causes are
//! logged server-side and never leaked verbatim to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApiErrorCode {
    BadRequest,
    MissingAudio,
    UpstreamFailed,
    ProviderFailed,
    Internal,
}

impl ApiErrorCode {
    fn status(self) -> StatusCode {
        match self {
            Self::BadRequest | Self::MissingAudio => StatusCode::BAD_REQUEST,
            Self::UpstreamFailed | Self::ProviderFailed => StatusCode::BAD_GATEWAY,
            Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[derive(Debug)]
pub struct ApiError {
    code: ApiErrorCode,
    message: String,
}

impl ApiError {
    pub fn new(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiErrorCode::BadRequest, message)
    }
}

/// Logs an upstream query failure and maps it to a generic client error.
pub fn upstream_error(label: &str, err: impl std::fmt::Display) -> ApiError {
    error!(error = %err, "{label} failed");
    ApiError::new(
        ApiErrorCode::UpstreamFailed,
        format!("{label} failed; please try again"),
    )
}

/// Logs a completion/transcription provider failure.
pub fn provider_error(label: &str, err: impl std::fmt::Display) -> ApiError {
    error!(error = %err, "{label} failed");
    ApiError::new(
        ApiErrorCode::ProviderFailed,
        format!("{label} failed; please try again"),
    )
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "error": self.code,
            "message": self.message,
        }));
        (self.code.status(), body).into_response()
    }
}
