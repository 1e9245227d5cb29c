//! Foundation types shared across the platen crates.

pub mod color;
pub mod geometry;
pub mod units;

pub use color::Color;
pub use geometry::{Rect, Size};
pub use units::{MM_PER_INCH, PT_PER_MM};
