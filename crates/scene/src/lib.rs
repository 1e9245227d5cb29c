//! The design-document model the merge pipeline consumes.
//!
//! A [`Scene`] is a named tree of [`Page`]s; each page carries an
//! ordered list of positioned [`Element`]s. Element kinds form a
//! closed sum type ([`ElementContent`]) so "which kinds may carry a
//! binding" is a property of the type, not a runtime convention.
//!
//! The colon-delimited name-tag encoding used by external design
//! tools lives entirely in [`binding`]; nothing past the parse
//! boundary ever sees it.

pub mod binding;
mod model;
mod record;

pub use model::{
    AutoFit, Element, ElementContent, FieldLabel, HorizontalAlign, Page, QrLevel, Scene,
    SequenceSpec, ShapeKind, Symbology, TextBinding, TextStyle, VerticalAlign,
};
pub use record::Record;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("scene contains no pages")]
    EmptyScene,

    #[error("element '{id}': {reason}")]
    InvalidElement { id: String, reason: String },

    #[error("page {index}: page dimensions must be positive, got {width}x{height} mm")]
    InvalidPageSize { index: usize, width: f32, height: f32 },

    #[error("failed to parse scene JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unrecognized binding tag '{0}'")]
    BindingTag(String),
}
