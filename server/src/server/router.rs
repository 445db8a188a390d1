use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use super::api;
use crate::app::SharedState;

/// Create the axum router with all routes.
pub fn create_router(state: SharedState) -> Router {
    Router::new()
        .route("/status", get(api::status::status_handler))
        .route("/clips", get(api::clips::get_clips))
        .layer(CorsLayer::permissive())
        .with_state(state)
}
