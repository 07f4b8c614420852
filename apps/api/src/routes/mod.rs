pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::export::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/preview", post(handlers::handle_preview))
        .route("/api/v1/export/check", post(handlers::handle_check))
        .route(
            "/api/v1/sessions/:session_id/export",
            post(handlers::handle_export),
        )
        .route(
            "/api/v1/sessions/:session_id/export/progress",
            get(handlers::handle_export_progress),
        )
        .route("/api/v1/copy/html", post(handlers::handle_copy_html))
        .with_state(state)
}
