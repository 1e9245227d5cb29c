use platen_types::{Rect, Size};

/// An encoded symbol as filled rectangles in a local coordinate space
/// where one module is one unit, origin top-left.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleGrid {
    pub rects: Vec<Rect>,
    pub bounds: Size,
}

impl ModuleGrid {
    /// Scale the grid into `target`, preserving aspect ratio and
    /// centering the result. Centering rather than stretching keeps
    /// module and bar aspect ratios scannable.
    ///
    /// Returned rectangles are in the target's units, offsets relative
    /// to the target box's top-left corner.
    pub fn fit_into(&self, target: Size) -> Vec<Rect> {
        if self.bounds.width <= 0.0 || self.bounds.height <= 0.0 {
            return Vec::new();
        }
        let scale = (target.width / self.bounds.width)
            .min(target.height / self.bounds.height);
        let offset_x = (target.width - self.bounds.width * scale) / 2.0;
        let offset_y = (target.height - self.bounds.height * scale) / 2.0;

        self.rects
            .iter()
            .map(|r| {
                Rect::new(
                    offset_x + r.x * scale,
                    offset_y + r.y * scale,
                    r.width * scale,
                    r.height * scale,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_preserves_aspect_and_centers() {
        // A square 10x10 grid into a wide 40x20 target: scale by the
        // limiting axis (2.0), centered horizontally.
        let grid = ModuleGrid {
            rects: vec![Rect::new(0.0, 0.0, 10.0, 10.0)],
            bounds: Size::new(10.0, 10.0),
        };
        let fitted = grid.fit_into(Size::new(40.0, 20.0));
        assert_eq!(fitted.len(), 1);
        let r = fitted[0];
        assert!((r.width - 20.0).abs() < 1e-5);
        assert!((r.height - 20.0).abs() < 1e-5);
        assert!((r.x - 10.0).abs() < 1e-5);
        assert!((r.y - 0.0).abs() < 1e-5);
    }

    #[test]
    fn empty_bounds_yield_no_rects() {
        let grid = ModuleGrid { rects: vec![], bounds: Size::zero() };
        assert!(grid.fit_into(Size::new(10.0, 10.0)).is_empty());
    }
}
