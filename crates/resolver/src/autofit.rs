//! Binary-search auto-fit text sizing.
//!
//! Finds the largest font size in `[min_pt, max_pt]` at which the
//! wrapped text fits the container on both axes. The search keeps
//! probing upward after a success; committing the first fit instead
//! of the best fit silently shrinks text below what the container
//! could hold, which is exactly the failure mode this exists to avoid.

use crate::wrap::{max_line_width, wrap_text};
use platen_fonts::FontHandle;

/// Search resolution in points. Probing below this is invisible at
/// print scale.
const SIZE_TOLERANCE_PT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitResult {
    pub size_pt: f32,
    /// False when even `min_pt` overflows the container; the caller
    /// decides the overflow policy (the renderer clips).
    pub fits: bool,
}

/// Container dimensions are in points.
pub fn fit_text_to_container(
    text: &str,
    font: &FontHandle,
    line_height_factor: f32,
    min_pt: f32,
    max_pt: f32,
    container_width_pt: f32,
    container_height_pt: f32,
) -> FitResult {
    let fits = |size: f32| {
        let lines = wrap_text(text, font, size, container_width_pt);
        let widest = max_line_width(&lines, font, size);
        let height = lines.len() as f32 * size * line_height_factor;
        widest <= container_width_pt && height <= container_height_pt
    };

    let (min_pt, max_pt) = (min_pt.min(max_pt), min_pt.max(max_pt));

    if fits(max_pt) {
        return FitResult { size_pt: max_pt, fits: true };
    }
    if !fits(min_pt) {
        return FitResult { size_pt: min_pt, fits: false };
    }

    // Invariant: lo fits, hi does not.
    let mut lo = min_pt;
    let mut hi = max_pt;
    while hi - lo > SIZE_TOLERANCE_PT {
        let mid = (lo + hi) / 2.0;
        if fits(mid) {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    FitResult { size_pt: lo, fits: true }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platen_fonts::BuiltinFamily;

    fn builtin() -> FontHandle {
        FontHandle::Builtin(BuiltinFamily::SansSerif)
    }

    #[test]
    fn declared_size_is_kept_when_it_fits() {
        let result =
            fit_text_to_container("short", &builtin(), 1.2, 6.0, 12.0, 500.0, 100.0);
        assert_eq!(result.size_pt, 12.0);
        assert!(result.fits);
    }

    #[test]
    fn committed_size_always_fits_both_axes() {
        let text = "a moderately long line of label text";
        let (w, h) = (120.0, 40.0);
        let result = fit_text_to_container(text, &builtin(), 1.2, 6.0, 24.0, w, h);
        assert!(result.fits);

        let lines = wrap_text(text, &builtin(), result.size_pt, w);
        assert!(max_line_width(&lines, &builtin(), result.size_pt) <= w);
        assert!(lines.len() as f32 * result.size_pt * 1.2 <= h);
    }

    #[test]
    fn search_commits_the_largest_fit_not_the_first() {
        // A container sized so ~half the interval fits: the result
        // must sit near the true maximum, not near the minimum.
        let text = "abcdefghij"; // 10 chars, 6 units/char/pt builtin
        let result = fit_text_to_container(text, &builtin(), 1.0, 6.0, 40.0, 100.0, 1_000.0);
        assert!(result.fits);
        // Width constraint: 10 chars * 0.6 * size <= 100 => size <= 16.67
        assert!(result.size_pt > 16.0, "undersized fit: {}", result.size_pt);
        assert!(result.size_pt <= 16.67);
    }

    #[test]
    fn fitting_is_idempotent() {
        let text = "idempotence check over a couple of words";
        let first = fit_text_to_container(text, &builtin(), 1.2, 6.0, 18.0, 90.0, 50.0);
        let second = fit_text_to_container(text, &builtin(), 1.2, 6.0, 18.0, 90.0, 50.0);
        assert_eq!(first, second);

        // Re-running with the committed size as the upper bound keeps it.
        let third =
            fit_text_to_container(text, &builtin(), 1.2, 6.0, first.size_pt, 90.0, 50.0);
        assert_eq!(third.size_pt, first.size_pt);
    }

    #[test]
    fn below_minimum_reports_no_fit_at_min_size() {
        let result = fit_text_to_container(
            "far too much text for a tiny box",
            &builtin(),
            1.2,
            6.0,
            12.0,
            10.0,
            5.0,
        );
        assert_eq!(result.size_pt, 6.0);
        assert!(!result.fits);
    }
}
