//! Font discovery, substitution, and metrics.
//!
//! A [`FontStore`] lives for the duration of one merge job. Faces are
//! discovered through fontdb (system fonts plus any registered
//! in-memory faces) and cached by `(family, weight)`; a face is
//! loaded once per job, never per element.
//!
//! When no matching face exists anywhere, resolution degrades to a
//! built-in base-14 family with approximate metrics instead of
//! failing the page: a missing font is a per-element concern, not a
//! document-fatal one.

mod metrics;
mod store;

pub use metrics::FaceMetrics;
pub use store::{BuiltinFamily, FontHandle, FontStore, LoadedFace};
