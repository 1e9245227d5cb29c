//! PDF page rendering for resolved pages.
//!
//! The renderer is the only place where geometry changes coordinate
//! systems: resolved elements arrive in mm with a top-left origin and
//! leave as `printpdf` ops in pt with a bottom-left origin.
//!
//! Rendering never fails a document. Per-element problems (a missing
//! image asset, an unparsable font file) degrade to a substitute font
//! or a visible placeholder and a warning in the log.

mod renderer;

pub use renderer::DocumentBuilder;

use std::collections::HashMap;

/// Caller-supplied mapping from image reference names to raw image
/// bytes (PNG/JPEG).
#[derive(Debug, Default)]
pub struct AssetCatalog {
    entries: HashMap<String, Vec<u8>>,
}

impl AssetCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.entries.insert(reference.into(), bytes);
    }

    pub fn get(&self, reference: &str) -> Option<&[u8]> {
        self.entries.get(reference).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
