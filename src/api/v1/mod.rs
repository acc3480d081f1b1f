//! Public v1 API

pub mod categorize;

use axum::routing::{get, post};
use axum::Router;

use super::state::AppState;

pub fn create_v1_router() -> Router<AppState> {
    Router::new()
        .route("/categorize", post(categorize::categorize))
        .route("/categorize/bulk", post(categorize::categorize_bulk))
        .route("/categories", get(categorize::categories))
        .route("/info", get(categorize::info))
}
