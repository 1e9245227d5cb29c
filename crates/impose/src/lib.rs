//! Imposition layout calculator.
//!
//! Computes how many fixed-size items tile onto a physical sheet and
//! where each instance sits. All geometry here is millimeters with a
//! top-left origin; the renderer alone performs the PDF axis flip.

mod layout;

pub use layout::{calculate_layout, Layout, SheetSpec, SHEET_MARGIN_MM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImposeError {
    #[error("item dimensions must be positive, got {width}x{height} mm")]
    InvalidItemSize { width: f32, height: f32 },

    #[error("sheet dimensions must be positive, got {width}x{height} mm")]
    InvalidSheetSize { width: f32, height: f32 },

    #[error(
        "requested {requested} items per sheet but the {columns}x{rows} grid holds only {capacity}"
    )]
    CapacityExceeded {
        requested: usize,
        columns: usize,
        rows: usize,
        capacity: usize,
    },
}
