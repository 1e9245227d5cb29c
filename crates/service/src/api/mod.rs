mod compose;
mod export;
mod health;
mod render;

pub use compose::compose_pdfs;
pub use export::{export_labels, export_multipage};
pub use health::health_check;
pub use render::{batch_render_vector, render_vector};

use axum::http::{header, HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::IntoResponse;

pub const X_RENDER_TIME_MS: HeaderName = HeaderName::from_static("x-render-time-ms");
pub const X_PAGE_COUNT: HeaderName = HeaderName::from_static("x-page-count");
pub const X_LABEL_COUNT: HeaderName = HeaderName::from_static("x-label-count");
pub const X_COLOR_MODE: HeaderName = HeaderName::from_static("x-color-mode");
pub const X_CROP_MARKS: HeaderName = HeaderName::from_static("x-crop-marks");

/// PDF bytes with download headers plus per-endpoint metadata headers.
pub(crate) fn pdf_response(
    bytes: Vec<u8>,
    extra: Vec<(HeaderName, String)>,
) -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/pdf"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_static("attachment; filename=\"output.pdf\""),
    );
    for (name, value) in extra {
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(name, value);
        }
    }
    (StatusCode::OK, headers, bytes)
}
