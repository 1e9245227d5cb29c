//! HTTP front end for the platen merge engine.
//!
//! Exposes synchronous render and export endpoints over the merge
//! pipeline. All PDF-producing routes sit behind API-key auth and a
//! concurrency semaphore; `/health` is open and reports external-tool
//! availability.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use middleware::auth_middleware;
use state::AppState;
use tower_http::trace::TraceLayer;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.server.max_request_size_mb * 1024 * 1024;

    // PDF-producing routes (with auth)
    let api_routes = Router::new()
        .route("/render-vector", post(api::render_vector))
        .route("/batch-render-vector", post(api::batch_render_vector))
        .route("/export-multipage", post(api::export_multipage))
        .route("/export-labels", post(api::export_labels))
        .route("/compose-pdfs", post(api::compose_pdfs))
        // Legacy aliases kept for older clients
        .route("/render", post(api::render_vector))
        .route("/batch-render", post(api::batch_render_vector))
        .layer(axum_middleware::from_fn(auth_middleware));

    Router::new()
        // Health check (no auth)
        .route("/health", get(api::health_check))
        .merge(api_routes)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
