use crate::{BarcodeError, ModuleGrid, QrLevel};
use platen_types::{Rect, Size};
use qrcode::{EcLevel, QrCode};

pub fn encode(level: QrLevel, value: &str) -> Result<ModuleGrid, BarcodeError> {
    if value.is_empty() {
        return Err(BarcodeError::EmptyValue);
    }

    let ec = match level {
        QrLevel::L => EcLevel::L,
        QrLevel::M => EcLevel::M,
        QrLevel::Q => EcLevel::Q,
        QrLevel::H => EcLevel::H,
    };

    let code = QrCode::with_error_correction_level(value, ec).map_err(|e| BarcodeError::Qr {
        value: value.to_string(),
        reason: e.to_string(),
    })?;

    let width = code.width();
    let colors = code.to_colors();

    // One rect per dark module; horizontal run merging buys little for
    // QR and costs positional regularity.
    let mut rects = Vec::new();
    for (i, color) in colors.iter().enumerate() {
        if *color == qrcode::Color::Dark {
            let x = (i % width) as f32;
            let y = (i / width) as f32;
            rects.push(Rect::new(x, y, 1.0, 1.0));
        }
    }

    Ok(ModuleGrid {
        rects,
        bounds: Size::new(width as f32, width as f32),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn qr_grid_is_square_and_nonempty() {
        let grid = encode(QrLevel::M, "https://example.com/a/b?c=1").unwrap();
        assert_eq!(grid.bounds.width, grid.bounds.height);
        assert!(grid.bounds.width >= 21.0); // version 1 minimum
        assert!(!grid.rects.is_empty());
    }

    #[test]
    fn higher_ec_levels_still_encode() {
        for level in [QrLevel::L, QrLevel::M, QrLevel::Q, QrLevel::H] {
            assert!(encode(level, "PLATEN-0001").is_ok());
        }
    }

    #[test]
    fn empty_value_is_rejected() {
        assert!(matches!(encode(QrLevel::M, ""), Err(BarcodeError::EmptyValue)));
    }
}
