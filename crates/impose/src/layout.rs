use crate::ImposeError;
use platen_types::Size;
use serde::{Deserialize, Serialize};

/// Fixed outer margin on each sheet edge: the conventional 0.5 inch.
pub const SHEET_MARGIN_MM: f32 = 12.7;

/// Caller-supplied imposition parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetSpec {
    /// Physical sheet size in mm. Defaults to US Letter.
    #[serde(default = "Size::letter_mm")]
    pub sheet: Size,
    /// Size of one item (label, card) in mm.
    pub item: Size,
    /// Explicit items-per-sheet override. Must not exceed the derived
    /// grid capacity; exceeding it is an input error, never clamped.
    #[serde(default)]
    pub items_per_sheet: Option<usize>,
}

/// A computed sheet tiling: grid dimensions, centering margins, and
/// inter-item gaps, all in mm, top-left origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub item: Size,
    pub columns: usize,
    pub rows: usize,
    pub margin_left: f32,
    pub margin_top: f32,
    pub gap_x: f32,
    pub gap_y: f32,
    pub per_sheet: usize,
}

impl Layout {
    /// Top-left position of instance `i` (zero-based, row-major).
    /// `i` must be below `per_sheet`; callers index within one sheet.
    pub fn position(&self, i: usize) -> (f32, f32) {
        let col = i % self.columns;
        let row = i / self.columns;
        let x = self.margin_left + col as f32 * (self.item.width + self.gap_x);
        let y = self.margin_top + row as f32 * (self.item.height + self.gap_y);
        (x, y)
    }
}

/// Derive the tiling grid for `spec`.
///
/// The fixed outer margin is subtracted from each edge; column/row
/// counts floor to a minimum of 1. Remaining slack becomes inter-item
/// gaps so the used area stays centered in the usable region: label
/// sheets for brand-specific products still look centered when the
/// requested item size doesn't exactly match a known product.
pub fn calculate_layout(spec: &SheetSpec) -> Result<Layout, ImposeError> {
    let item = spec.item;
    let sheet = spec.sheet;

    if item.width <= 0.0 || item.height <= 0.0 {
        return Err(ImposeError::InvalidItemSize { width: item.width, height: item.height });
    }
    if sheet.width <= 0.0 || sheet.height <= 0.0 {
        return Err(ImposeError::InvalidSheetSize { width: sheet.width, height: sheet.height });
    }

    let usable_width = sheet.width - 2.0 * SHEET_MARGIN_MM;
    let usable_height = sheet.height - 2.0 * SHEET_MARGIN_MM;

    let columns = ((usable_width / item.width).floor() as usize).max(1);
    let rows = ((usable_height / item.height).floor() as usize).max(1);

    let gap_x = if columns > 1 {
        (usable_width - columns as f32 * item.width) / (columns - 1) as f32
    } else {
        0.0
    };
    let gap_y = if rows > 1 {
        (usable_height - rows as f32 * item.height) / (rows - 1) as f32
    } else {
        0.0
    };

    // With gaps absorbing all slack the grid spans the usable area
    // exactly; single-column/row grids center within it instead.
    let used_width = columns as f32 * item.width + (columns - 1) as f32 * gap_x;
    let used_height = rows as f32 * item.height + (rows - 1) as f32 * gap_y;
    let margin_left = SHEET_MARGIN_MM + (usable_width - used_width) / 2.0;
    let margin_top = SHEET_MARGIN_MM + (usable_height - used_height) / 2.0;

    let capacity = columns * rows;
    let per_sheet = match spec.items_per_sheet {
        Some(requested) if requested > capacity => {
            return Err(ImposeError::CapacityExceeded { requested, columns, rows, capacity });
        }
        Some(requested) => requested,
        None => capacity,
    };

    Ok(Layout {
        item,
        columns,
        rows,
        margin_left,
        margin_top,
        gap_x,
        gap_y,
        per_sheet,
    })
}
