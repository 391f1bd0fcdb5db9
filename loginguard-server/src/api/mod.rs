//! HTTP API, mounted under `/api/v1`.

pub mod admin;
pub mod extractors;
pub mod guard;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(guard::router())
        .nest("/admin", admin::router())
}
