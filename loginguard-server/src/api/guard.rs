//! Guard API handlers, called by the host application while it renders and
//! processes its login and lost-password forms.
//!
//! # Endpoints
//!
//! - `GET  /sites/{site_id}/widget`        widget parameters, `204` when disabled
//! - `POST /sites/{site_id}/login`         gate a login form
//! - `POST /sites/{site_id}/lost-password` gate a lost-password form

use axum::{
    Form, Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use loginguard_core::{AuthError, LoginAttempt, Principal, StoreError};
use loginguard_sdk::config::SiteId;
use loginguard_sdk::objects::{LoginDecision, LoginForm, LostPasswordForm, LostPasswordResponse};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sites/{site_id}/widget", get(widget))
        .route("/sites/{site_id}/login", post(login))
        .route("/sites/{site_id}/lost-password", post(lost_password))
}

/// Errors that can occur in Guard API handlers.
#[derive(Debug)]
pub(crate) enum GuardApiError {
    Store(StoreError),
}

impl From<StoreError> for GuardApiError {
    fn from(e: StoreError) -> Self {
        GuardApiError::Store(e)
    }
}

impl IntoResponse for GuardApiError {
    fn into_response(self) -> Response {
        match self {
            GuardApiError::Store(e) => {
                tracing::error!(error = %e, "Guard API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
        }
    }
}

/// `GET /sites/{site_id}/widget`: parameters for rendering the widget.
pub async fn widget(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
) -> Result<Response, GuardApiError> {
    let cfg = state.resolver.effective(site_id).await?;
    if !cfg.is_enabled() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }
    Ok(Json(state.widget.build(&cfg)).into_response())
}

/// `POST /sites/{site_id}/login`: gate a login form.
///
/// The decision covers verification only. A form flagged with
/// `prior_error` is left to the host and always comes back `allowed`.
pub async fn login(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
    Form(form): Form<LoginForm>,
) -> Response {
    let prior = if form.prior_error {
        Principal::Rejected(AuthError::new("prior_error", "Rejected by an earlier stage."))
    } else {
        Principal::Anonymous
    };
    let attempt = LoginAttempt {
        username: form.username,
        password: form.password,
        submitted_token: form.token,
    };

    match state.registry.authenticate(site_id, prior, &attempt).await {
        Principal::Rejected(error) if !form.prior_error => (
            StatusCode::FORBIDDEN,
            Json(LoginDecision::Rejected {
                code: error.code,
                message: error.message,
            }),
        )
            .into_response(),
        _ => Json(LoginDecision::Allowed).into_response(),
    }
}

/// `POST /sites/{site_id}/lost-password`: gate a lost-password form.
pub async fn lost_password(
    State(state): State<AppState>,
    Path(site_id): Path<SiteId>,
    Form(form): Form<LostPasswordForm>,
) -> Response {
    let errors = state
        .registry
        .lost_password(site_id, form.token.as_deref())
        .await;
    let status = if errors.is_empty() {
        StatusCode::OK
    } else {
        tracing::info!(site_id, user_login = %form.user_login, "Lost-password request refused");
        StatusCode::FORBIDDEN
    };
    (
        status,
        Json(LostPasswordResponse {
            errors: errors.into_vec(),
        }),
    )
        .into_response()
}
