use crate::api::{pdf_response, X_PAGE_COUNT};
use crate::error::{Result, ServiceError};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct ComposeRequest {
    /// Base64-encoded PDF documents, merged in array order
    pub pdfs: Vec<String>,
}

/// Structural merge of finished PDF documents.
pub async fn compose_pdfs(
    State(state): State<AppState>,
    Json(req): Json<ComposeRequest>,
) -> Result<impl IntoResponse> {
    let _permit = state
        .sync_semaphore
        .acquire()
        .await
        .map_err(|_| ServiceError::ServiceOverloaded)?;

    if req.pdfs.is_empty() {
        return Err(ServiceError::InvalidRequest("no documents to compose".into()));
    }

    let mut documents = Vec::with_capacity(req.pdfs.len());
    for (index, encoded) in req.pdfs.iter().enumerate() {
        let bytes = BASE64
            .decode(encoded)
            .map_err(|e| ServiceError::InvalidRequest(format!("document {}: {}", index, e)))?;
        documents.push(bytes);
    }

    let merged =
        platen::merge_pdfs(&documents).map_err(|e| ServiceError::Compose(e.to_string()))?;
    let pages = platen::page_count(&merged).map_err(|e| ServiceError::Compose(e.to_string()))?;

    tracing::info!(
        "Composed {} documents into {} pages ({} bytes)",
        documents.len(),
        pages,
        merged.len()
    );

    Ok(pdf_response(merged, vec![(X_PAGE_COUNT, pages.to_string())]))
}
