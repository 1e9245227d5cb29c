use crate::api::{pdf_response, X_COLOR_MODE, X_RENDER_TIME_MS};
use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use platen::{MergeJob, MergeOptions, Record, Scene};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct RenderRequest {
    pub scene: Scene,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub options: RenderOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderOptions {
    pub title: Option<String>,
    #[serde(default)]
    pub cmyk: bool,
}

/// One merge job per scene. Without records the scene renders once
/// with every binding unresolved against an empty record.
fn job_for(scene: Scene, records: Vec<Record>, options: &RenderOptions, state: &AppState) -> MergeJob {
    let records = if records.is_empty() { vec![Record::new()] } else { records };
    MergeJob {
        scene,
        records,
        layout: None,
        options: MergeOptions {
            title: options.title.clone(),
            cmyk: options.cmyk,
            ghostscript: state.ghostscript.clone(),
            ..MergeOptions::default()
        },
    }
}

/// Synchronous vector render endpoint. Returns PDF bytes immediately.
pub async fn render_vector(
    State(state): State<AppState>,
    Json(req): Json<RenderRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(
        "Render request for scene '{}' ({} records)",
        req.scene.name,
        req.records.len()
    );

    let _permit = state
        .sync_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let job = job_for(req.scene, req.records, &req.options, &state);
    let output = platen::run_merge(job, &state.fonts, &state.assets, None).await?;

    tracing::info!(
        "Render completed: {} pages, {} bytes in {}ms",
        output.pages,
        output.pdf.len(),
        output.elapsed.as_millis()
    );

    let mut headers = vec![(X_RENDER_TIME_MS, output.elapsed.as_millis().to_string())];
    if let Some(mode) = output.color_mode {
        headers.push((X_COLOR_MODE, mode.as_str().to_string()));
    }
    Ok(pdf_response(output.pdf, headers))
}

#[derive(Debug, Deserialize)]
pub struct BatchRenderRequest {
    /// Raw scene values so one malformed scene fails only its own slot.
    pub scenes: Vec<serde_json::Value>,
    #[serde(default)]
    pub options: RenderOptions,
}

#[derive(Debug, Serialize)]
pub struct BatchRenderResponse {
    pub total: usize,
    pub successful: usize,
    pub results: Vec<BatchItem>,
}

#[derive(Debug, Serialize)]
pub struct BatchItem {
    pub index: usize,
    pub success: bool,
    /// Base64-encoded PDF bytes, present on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pdf: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Batch vector render. Items are independent: a failed scene yields
/// an error entry in its slot and never aborts the rest of the batch.
pub async fn batch_render_vector(
    State(state): State<AppState>,
    Json(req): Json<BatchRenderRequest>,
) -> Result<Json<BatchRenderResponse>> {
    let _permit = state
        .sync_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let total = req.scenes.len();
    let mut results = Vec::with_capacity(total);
    let mut successful = 0;

    for (index, value) in req.scenes.into_iter().enumerate() {
        match render_one(&state, value, &req.options).await {
            Ok(pdf) => {
                successful += 1;
                results.push(BatchItem {
                    index,
                    success: true,
                    pdf: Some(BASE64.encode(pdf)),
                    error: None,
                });
            }
            Err(e) => {
                tracing::warn!("Batch item {} failed: {}", index, e);
                results.push(BatchItem {
                    index,
                    success: false,
                    pdf: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    tracing::info!("Batch render completed: {}/{} succeeded", successful, total);
    Ok(Json(BatchRenderResponse { total, successful, results }))
}

async fn render_one(
    state: &AppState,
    value: serde_json::Value,
    options: &RenderOptions,
) -> Result<Vec<u8>> {
    let scene: Scene = serde_json::from_value(value)
        .map_err(|e| ServiceError::InvalidRequest(format!("malformed scene: {}", e)))?;
    let job = job_for(scene, Vec::new(), options, state);
    let output = platen::run_merge(job, &state.fonts, &state.assets, None).await?;
    Ok(output.pdf)
}
