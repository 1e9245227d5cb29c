//! Barcode and QR content generation.
//!
//! Both linear symbologies and QR codes decompose into the same
//! universal representation: a list of filled rectangles in a local
//! module coordinate space ([`ModuleGrid`]). The generator passes
//! values through to the underlying encoders without its own
//! validation. A malformed value (say, a non-numeric EAN-13) fails
//! loudly instead of being silently truncated or padded, because a
//! misencoded barcode that still looks like a barcode is worse than a
//! visible failure.

mod grid;
mod linear;
mod qr;

pub use grid::ModuleGrid;

use thiserror::Error;

/// Supported linear symbologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbology {
    Code128,
    Code39,
    Ean13,
    UpcA,
}

/// QR error-correction level, lowest to highest redundancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrLevel {
    L,
    M,
    Q,
    H,
}

#[derive(Debug, Error)]
pub enum BarcodeError {
    #[error("cannot encode empty value")]
    EmptyValue,

    #[error("{symbology:?} cannot encode '{value}': {reason}")]
    Encode {
        symbology: Symbology,
        value: String,
        reason: String,
    },

    #[error("QR encoding failed for '{value}': {reason}")]
    Qr { value: String, reason: String },
}

/// Encode `value` in the given linear symbology.
pub fn encode_linear(symbology: Symbology, value: &str) -> Result<ModuleGrid, BarcodeError> {
    linear::encode(symbology, value)
}

/// Encode `value` as a QR code at the given error-correction level.
pub fn encode_qr(level: QrLevel, value: &str) -> Result<ModuleGrid, BarcodeError> {
    qr::encode(level, value)
}
