//! Physical units.
//!
//! Scene geometry is expressed in millimeters with a top-left origin;
//! PDF content streams use points with a bottom-left origin. The
//! renderer owns the single conversion point between the two.

pub const MM_PER_INCH: f32 = 25.4;
pub const PT_PER_MM: f32 = 72.0 / MM_PER_INCH;
