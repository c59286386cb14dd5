//! Shared-token authentication for `/predict`.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::Response;

use crate::error::Error;
use crate::AppState;

/// Header Immich uses to present the shared secret.
pub const AUTH_HEADER: &str = "x-auth-token";

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("missing x-auth-token header")]
    MissingHeader,
    #[error("invalid auth token")]
    InvalidToken,
}

/// Check the `x-auth-token` header against the configured secret.
pub fn check_token(headers: &HeaderMap, expected: &str) -> Result<(), AuthError> {
    let token = headers.get(AUTH_HEADER).ok_or(AuthError::MissingHeader)?;

    if token.as_bytes() != expected.as_bytes() {
        return Err(AuthError::InvalidToken);
    }

    Ok(())
}

/// Middleware rejecting requests without the shared token. Runs before the
/// body is read, so a rejected request never reaches a downstream service.
pub async fn require_token(
    State(state): State<Arc<AppState>>,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    if let Err(e) = check_token(request.headers(), &state.config.mt_photos_api_key) {
        tracing::warn!(path = %request.uri().path(), "Rejected request: {}", e);
        return Err(e.into());
    }

    Ok(next.run(request).await)
}
