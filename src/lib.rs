//! Variable-data print merge engine.
//!
//! A merge job pairs an immutable design scene with an ordered list of
//! flat records and produces a print-ready PDF: bindings resolved per
//! record, pages rendered (or label instances imposed onto sheets),
//! then post-processed with bleed, crop marks, and optional CMYK
//! conversion.
//!
//! The member crates split along the pipeline's data flow:
//! `platen-scene` (model + bindings), `platen-impose` (sheet layout),
//! `platen-barcode` (module grids), `platen-fonts` (discovery and
//! metrics), `platen-resolver` (record substitution and auto-fit),
//! `platen-render` (PDF drawing), `platen-press` (post-processing).
//! This crate ties them into [`run_merge`].

mod pipeline;

pub use pipeline::{run_merge, MergeJob, MergeOptions, MergeOutput, PipelineError, Progress};

pub use platen_fonts::FontStore;
pub use platen_impose::{calculate_layout, Layout, SheetSpec};
pub use platen_press::{merge_pdfs, page_count, ColorMode, GhostscriptConfig};
pub use platen_render::AssetCatalog;
pub use platen_scene::{Record, Scene};
pub use platen_types::{Rect, Size};
