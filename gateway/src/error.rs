//! Error types for the gateway.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::auth::AuthError;

/// Everything a `/predict` call can fail with.
///
/// Caller errors map to 4xx, downstream failures to 5xx. The body is always
/// `{"error": "<message>"}`, which is what Immich logs on failure.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("request body exceeds {0} bytes")]
    PayloadTooLarge(usize),

    #[error("unsupported CLIP task type")]
    UnsupportedClipTask,

    #[error("text task requires text")]
    MissingText,

    #[error("image task requires image")]
    MissingImage,

    #[error("failed to read image: {0}")]
    ImageRead(String),

    #[error("failed to forward request: {0}")]
    Downstream(String),

    #[error("proxy request failed: {0}")]
    Proxy(String),
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::InvalidRequest(_)
            | Error::UnsupportedClipTask
            | Error::MissingText
            | Error::MissingImage => StatusCode::BAD_REQUEST,
            Error::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Error::ImageRead(_) | Error::Downstream(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Error::Proxy(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(status = %status.as_u16(), "{}", self);
        }

        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caller_errors_are_bad_request() {
        assert_eq!(Error::MissingText.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::MissingImage.status(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::UnsupportedClipTask.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            Error::InvalidRequest("bad entries".to_string()).status(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_downstream_errors_keep_raw_body() {
        let error = Error::Downstream(r#"{"detail":"model not loaded"}"#.to_string());
        assert_eq!(error.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            error.to_string(),
            r#"failed to forward request: {"detail":"model not loaded"}"#
        );
    }

    #[test]
    fn test_auth_error_is_unauthorized() {
        let error = Error::from(AuthError::InvalidToken);
        assert_eq!(error.status(), StatusCode::UNAUTHORIZED);
    }
}
