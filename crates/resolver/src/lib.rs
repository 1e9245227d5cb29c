//! Per-record binding resolution.
//!
//! `resolve_page` is a pure function of an immutable baseline page, a
//! record, and a record index: it never mutates the scene, so there is
//! no restore-between-records hazard, and parallel callers can share
//! one baseline freely.
//!
//! The output is the only thing the renderer consumes: elements with
//! geometry/style intact and every binding replaced by a concrete
//! string, a fitted module grid, or an explicit error mark.

mod autofit;
mod resolve;
pub mod wrap;

pub use autofit::{fit_text_to_container, FitResult};
pub use resolve::{resolve_page, resolve_sequence};

use platen_scene::{ShapeKind, TextStyle};
use platen_types::{Color, Rect};

/// The binding-free, per-record materialization of a page.
#[derive(Debug, Clone)]
pub struct ResolvedPage {
    pub width_mm: f32,
    pub height_mm: f32,
    pub bleed_mm: Option<f32>,
    /// Draw order: sorted by z, stable within equal z.
    pub elements: Vec<ResolvedElement>,
}

#[derive(Debug, Clone)]
pub struct ResolvedElement {
    /// Geometry in mm, top-left origin, unchanged from the source
    /// element.
    pub frame: Rect,
    pub rotation: Option<f32>,
    pub z: i32,
    pub style: TextStyle,
    /// Set when auto-fit could not make the content fit even at the
    /// minimum size; the renderer clips to the frame.
    pub overflow: bool,
    pub content: ResolvedContent,
}

#[derive(Debug, Clone)]
pub enum ResolvedContent {
    /// Concrete text for text-like kinds. Never empty: unresolved
    /// bindings yield a single space so zero-height boxes cannot
    /// collapse layout.
    Text(String),
    /// Barcode/QR modules already fitted into the element frame:
    /// rectangles in mm, relative to the frame's top-left corner.
    Modules(Vec<Rect>),
    /// A non-empty asset reference the calling system maps to bytes.
    Image(String),
    Shape {
        kind: ShapeKind,
        fill: Option<Color>,
        stroke: Option<Color>,
        stroke_width_mm: Option<f32>,
    },
    /// A recovered per-element failure, drawn as a visible placeholder
    /// rather than aborting the record.
    ErrorMark { message: String },
}
