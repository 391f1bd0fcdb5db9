//! Admin API handlers.
//!
//! These endpoints back the settings pages and require the
//! `LoginGuard-Admin-Authorization` header with the plaintext admin secret.
//!
//! # Endpoints
//!
//! - `GET  /network/settings`          network settings page
//! - `POST /network/settings`          replace network settings
//! - `GET  /sites/{site_id}/settings`  site settings page
//! - `POST /sites/{site_id}/settings`  replace site settings

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use loginguard_core::{SettingsError, SettingsPage};
use loginguard_sdk::config::SiteId;
use loginguard_sdk::objects::SettingsPageView;
use serde::Serialize;
use std::collections::BTreeMap;

use crate::api::extractors::AdminAuth;
use crate::state::AppState;

/// Build the Admin API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/network/settings",
            get(show_network_settings).post(update_network_settings),
        )
        .route(
            "/sites/{site_id}/settings",
            get(show_site_settings).post(update_site_settings),
        )
}

/// Errors that can occur in Admin API handlers.
#[derive(Debug)]
pub(crate) struct AdminApiError(SettingsError);

impl From<SettingsError> for AdminApiError {
    fn from(e: SettingsError) -> Self {
        Self(e)
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl IntoResponse for AdminApiError {
    fn into_response(self) -> Response {
        match self.0 {
            SettingsError::Store(e) => {
                tracing::error!(error = %e, "Admin API store error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error").into_response()
            }
            invalid @ SettingsError::InvalidValue { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(ErrorBody {
                    error: invalid.to_string(),
                }),
            )
                .into_response(),
        }
    }
}

/// `GET /network/settings`
pub async fn show_network_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
) -> Result<Json<SettingsPageView>, AdminApiError> {
    let view = SettingsPage::network().view(state.store.as_ref()).await?;
    Ok(Json(view))
}

/// `POST /network/settings`: body is a JSON object of field name to value.
pub async fn update_network_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Json(submitted): Json<BTreeMap<String, String>>,
) -> Result<Json<SettingsPageView>, AdminApiError> {
    let page = SettingsPage::network();
    page.update(state.store.as_ref(), &submitted).await?;
    Ok(Json(page.view(state.store.as_ref()).await?))
}

/// `GET /sites/{site_id}/settings`
pub async fn show_site_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(site_id): Path<SiteId>,
) -> Result<Json<SettingsPageView>, AdminApiError> {
    let page = SettingsPage::site(site_id, state.multi_tenant());
    Ok(Json(page.view(state.store.as_ref()).await?))
}

/// `POST /sites/{site_id}/settings`: body is a JSON object of field name to value.
pub async fn update_site_settings(
    State(state): State<AppState>,
    _auth: AdminAuth,
    Path(site_id): Path<SiteId>,
    Json(submitted): Json<BTreeMap<String, String>>,
) -> Result<Json<SettingsPageView>, AdminApiError> {
    let page = SettingsPage::site(site_id, state.multi_tenant());
    page.update(state.store.as_ref(), &submitted).await?;
    Ok(Json(page.view(state.store.as_ref()).await?))
}
