//! Print post-processing over PDF bytes.
//!
//! Every stage takes and returns a complete PDF byte buffer, so stages
//! compose in the one order that makes print sense: bleed, crop marks,
//! color conversion, merge. The first two are pure lopdf structure
//! edits; color conversion shells out to Ghostscript and falls back to
//! its RGB input when the tool is missing, failing, or slow.

mod compose;
mod convert;
mod marks;

pub use compose::{merge_documents, merge_pdfs, overlay_content, page_count};
pub use convert::{convert_to_cmyk, ColorMode, ConversionOutcome, GhostscriptConfig};
pub use marks::{add_crop_marks, apply_bleed, CROP_MARK_LENGTH_MM, CROP_MARK_OFFSET_MM};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PressError {
    #[error("pdf error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no documents to merge")]
    NothingToMerge,

    #[error("{0}")]
    Other(String),
}
