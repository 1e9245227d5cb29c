use crate::state::AppState;
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// Liveness plus external-tool availability. A missing Ghostscript is
/// reported here rather than failing requests; CMYK exports degrade
/// to RGB output while it is absent.
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    let ghostscript = state.ghostscript.probe().await;
    let icc_profile = state
        .ghostscript
        .icc_profile
        .as_deref()
        .map(|p| p.exists())
        .unwrap_or(false);

    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "ghostscript": ghostscript,
        "icc_profile": icc_profile,
    }))
}
