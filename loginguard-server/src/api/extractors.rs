//! Custom Axum extractors for request authentication.
//!
//! Provides `AdminAuth`, which checks the `LoginGuard-Admin-Authorization`
//! header against the argon2 hash of the admin secret (used by the settings
//! endpoints).

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use loginguard_sdk::config::ADMIN_AUTH_HEADER;

use crate::state::AppState;

/// Proof that the request carried the admin secret.
///
/// # Header format
///
/// ```text
/// LoginGuard-Admin-Authorization: {plaintext_admin_secret}
/// ```
pub struct AdminAuth;

/// Errors returned by the [`AdminAuth`] extractor.
#[derive(Debug, thiserror::Error)]
pub enum AdminAuthError {
    #[error("missing LoginGuard-Admin-Authorization header")]
    MissingHeader,
    #[error("invalid LoginGuard-Admin-Authorization header")]
    InvalidHeader,
    #[error("admin secret mismatch")]
    Mismatch,
}

impl IntoResponse for AdminAuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AdminAuthError::MissingHeader => (
                StatusCode::UNAUTHORIZED,
                "missing LoginGuard-Admin-Authorization header",
            ),
            AdminAuthError::InvalidHeader => (
                StatusCode::BAD_REQUEST,
                "invalid LoginGuard-Admin-Authorization header",
            ),
            AdminAuthError::Mismatch => (StatusCode::UNAUTHORIZED, "invalid admin secret"),
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for AdminAuth {
    type Rejection = AdminAuthError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let presented = parts
            .headers
            .get(ADMIN_AUTH_HEADER)
            .ok_or(AdminAuthError::MissingHeader)?
            .to_str()
            .map_err(|_| AdminAuthError::InvalidHeader)?;

        let admin = state.admin.read().await;
        if !admin.matches(presented) {
            drop(admin);
            tracing::warn!("Rejected admin request with a wrong secret");
            return Err(AdminAuthError::Mismatch);
        }
        drop(admin);
        Ok(AdminAuth)
    }
}
