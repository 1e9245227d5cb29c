use crate::{BarcodeError, ModuleGrid, Symbology};
use barcoders::sym::code128::Code128;
use barcoders::sym::code39::Code39;
use barcoders::sym::ean13::{EAN13, UPCA};
use platen_types::{Rect, Size};

/// Bar height as a fraction of the symbol width, in module units.
/// Linear codes have no intrinsic height; this is the conventional
/// minimum-height ratio that keeps short codes scannable.
const BAR_HEIGHT_RATIO: f32 = 0.3;

/// Code 128 requires a leading character-set selector; character set B
/// covers mixed-case alphanumerics and punctuation, the common case
/// for user data.
const CODE128_CHARSET_B: char = '\u{0181}';

pub fn encode(symbology: Symbology, value: &str) -> Result<ModuleGrid, BarcodeError> {
    if value.is_empty() {
        return Err(BarcodeError::EmptyValue);
    }

    let encode_err = |reason: String| BarcodeError::Encode {
        symbology,
        value: value.to_string(),
        reason,
    };

    // The encoders own symbology validation (charset, length, check
    // digits); any rejection surfaces as a loud error here.
    let modules: Vec<u8> = match symbology {
        Symbology::Code128 => Code128::new(format!("{}{}", CODE128_CHARSET_B, value))
            .map_err(|e| encode_err(e.to_string()))?
            .encode(),
        Symbology::Code39 => Code39::new(value)
            .map_err(|e| encode_err(e.to_string()))?
            .encode(),
        Symbology::Ean13 => EAN13::new(value)
            .map_err(|e| encode_err(e.to_string()))?
            .encode(),
        Symbology::UpcA => UPCA::new(value)
            .map_err(|e| encode_err(e.to_string()))?
            .encode(),
    };

    Ok(modules_to_grid(&modules))
}

/// Collapse runs of dark modules into single bars.
fn modules_to_grid(modules: &[u8]) -> ModuleGrid {
    let width = modules.len() as f32;
    let height = (width * BAR_HEIGHT_RATIO).max(1.0);

    let mut rects = Vec::new();
    let mut run_start: Option<usize> = None;
    for (i, &module) in modules.iter().enumerate() {
        match (module, run_start) {
            (1, None) => run_start = Some(i),
            (0, Some(start)) => {
                rects.push(Rect::new(start as f32, 0.0, (i - start) as f32, height));
                run_start = None;
            }
            _ => {}
        }
    }
    if let Some(start) = run_start {
        rects.push(Rect::new(
            start as f32,
            0.0,
            (modules.len() - start) as f32,
            height,
        ));
    }

    ModuleGrid { rects, bounds: Size::new(width, height) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code128_encodes_mixed_text() {
        let grid = encode(Symbology::Code128, "INV-0042").unwrap();
        assert!(!grid.rects.is_empty());
        assert!(grid.bounds.width > 0.0);
        // Bars never extend past the symbol bounds.
        for r in &grid.rects {
            assert!(r.right() <= grid.bounds.width + 1e-3);
        }
    }

    #[test]
    fn ean13_rejects_non_numeric_input() {
        let err = encode(Symbology::Ean13, "not-a-number").unwrap_err();
        assert!(matches!(err, BarcodeError::Encode { symbology: Symbology::Ean13, .. }));
    }

    #[test]
    fn ean13_encodes_twelve_digits() {
        let grid = encode(Symbology::Ean13, "123456789012").unwrap();
        // EAN-13 is always 95 modules wide.
        assert_eq!(grid.bounds.width, 95.0);
    }

    #[test]
    fn empty_value_is_rejected_before_encoding() {
        assert!(matches!(
            encode(Symbology::Code39, ""),
            Err(BarcodeError::EmptyValue)
        ));
    }

    #[test]
    fn runs_of_modules_collapse_into_bars() {
        let grid = modules_to_grid(&[1, 1, 0, 1, 0, 0, 1, 1, 1]);
        let widths: Vec<f32> = grid.rects.iter().map(|r| r.width).collect();
        assert_eq!(widths, [2.0, 1.0, 3.0]);
    }
}
