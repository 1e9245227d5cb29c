use crate::api::{
    pdf_response, X_COLOR_MODE, X_CROP_MARKS, X_LABEL_COUNT, X_PAGE_COUNT, X_RENDER_TIME_MS,
};
use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::http::HeaderName;
use axum::{extract::State, response::IntoResponse, Json};
use platen::{MergeJob, MergeOptions, MergeOutput, Record, Scene, SheetSpec};
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportOptions {
    pub title: Option<String>,
    #[serde(default)]
    pub cmyk: bool,
    #[serde(default)]
    pub crop_marks: bool,
    /// Bleed in millimetres; overrides the scene's own bleed
    pub bleed: Option<f32>,
}

impl ExportOptions {
    fn merge_options(&self, state: &AppState) -> MergeOptions {
        MergeOptions {
            title: self.title.clone(),
            cmyk: self.cmyk,
            crop_marks: self.crop_marks,
            bleed_mm: self.bleed,
            ghostscript: state.ghostscript.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ExportRequest {
    pub scene: Scene,
    #[serde(default)]
    pub records: Vec<Record>,
    #[serde(default)]
    pub options: ExportOptions,
}

#[derive(Debug, Deserialize)]
pub struct LabelExportRequest {
    pub scene: Scene,
    pub records: Vec<Record>,
    pub layout: SheetSpec,
    #[serde(default)]
    pub options: ExportOptions,
}

fn export_headers(output: &MergeOutput, options: &ExportOptions) -> Vec<(HeaderName, String)> {
    let mut headers = vec![
        (X_RENDER_TIME_MS, output.elapsed.as_millis().to_string()),
        (X_PAGE_COUNT, output.pages.to_string()),
        (X_CROP_MARKS, options.crop_marks.to_string()),
    ];
    if let Some(mode) = output.color_mode {
        headers.push((X_COLOR_MODE, mode.as_str().to_string()));
    }
    headers
}

/// Print-ready multipage export: one page sequence per record, with
/// bleed, crop marks and CMYK applied per the request options.
pub async fn export_multipage(
    State(state): State<AppState>,
    Json(req): Json<ExportRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(
        "Multipage export for scene '{}' ({} records)",
        req.scene.name,
        req.records.len()
    );

    let _permit = state
        .sync_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let records = if req.records.is_empty() { vec![Record::new()] } else { req.records };
    let job = MergeJob {
        scene: req.scene,
        records,
        layout: None,
        options: req.options.merge_options(&state),
    };
    let output = platen::run_merge(job, &state.fonts, &state.assets, None).await?;

    for reason in &output.fallbacks {
        tracing::warn!("Export fallback: {}", reason);
    }

    let headers = export_headers(&output, &req.options);
    Ok(pdf_response(output.pdf, headers))
}

/// Imposed label export: records tile onto sheets in record order.
pub async fn export_labels(
    State(state): State<AppState>,
    Json(req): Json<LabelExportRequest>,
) -> Result<impl IntoResponse> {
    tracing::info!(
        "Label export for scene '{}' ({} records, {}x{}mm items)",
        req.scene.name,
        req.records.len(),
        req.layout.item.width,
        req.layout.item.height
    );

    let _permit = state
        .sync_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    let job = MergeJob {
        scene: req.scene,
        records: req.records,
        layout: Some(req.layout),
        options: req.options.merge_options(&state),
    };
    let output = platen::run_merge(job, &state.fonts, &state.assets, None).await?;

    let mut headers = export_headers(&output, &req.options);
    headers.push((X_LABEL_COUNT, output.labels.to_string()));
    Ok(pdf_response(output.pdf, headers))
}
