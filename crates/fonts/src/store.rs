use crate::metrics::FaceMetrics;
use fontdb::{Database, Family, Query, Weight};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Key for the font cache.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct FontKey {
    family: String,
    weight: u16,
}

impl FontKey {
    fn new(family: &str, weight: u16) -> Self {
        Self { family: family.to_lowercase(), weight }
    }
}

/// A loaded, embeddable font face. Metrics are computed once here;
/// measurement never re-parses the font file.
pub struct LoadedFace {
    pub family: String,
    pub weight: u16,
    /// Raw font file bytes, suitable for PDF embedding.
    pub data: Arc<Vec<u8>>,
    pub index: u32,
    metrics: Option<FaceMetrics>,
}

impl LoadedFace {
    fn new(family: String, weight: u16, data: Arc<Vec<u8>>, index: u32) -> Self {
        let metrics = FaceMetrics::new(data.clone(), index);
        Self { family, weight, data, index, metrics }
    }
}

impl std::fmt::Debug for LoadedFace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedFace")
            .field("family", &self.family)
            .field("weight", &self.weight)
            .field("data_len", &self.data.len())
            .finish()
    }
}

/// Base-14 substitute families used when no real face resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinFamily {
    SansSerif,
    Serif,
    Monospace,
}

/// The outcome of font resolution: a real embeddable face, or a
/// built-in substitute with approximate metrics.
#[derive(Debug, Clone)]
pub enum FontHandle {
    Face(Arc<LoadedFace>),
    Builtin(BuiltinFamily),
}

impl FontHandle {
    /// Measured width of `text` at `size_pt`, in points.
    pub fn measure(&self, text: &str, size_pt: f32) -> f32 {
        match self {
            FontHandle::Face(face) => face
                .metrics
                .as_ref()
                .map(|m| m.text_width(text, size_pt))
                .unwrap_or_else(|| approx_width(text, size_pt)),
            FontHandle::Builtin(_) => approx_width(text, size_pt),
        }
    }

    /// Distance from the top of a line box to the baseline.
    pub fn ascent(&self, size_pt: f32) -> f32 {
        match self {
            FontHandle::Face(face) => face
                .metrics
                .as_ref()
                .map(|m| m.ascent(size_pt))
                .unwrap_or(size_pt * 0.8),
            FontHandle::Builtin(_) => size_pt * 0.8,
        }
    }

    pub fn is_builtin(&self) -> bool {
        matches!(self, FontHandle::Builtin(_))
    }
}

/// Approximate width when no metrics are available: the conventional
/// 0.6 em average advance.
fn approx_width(text: &str, size_pt: f32) -> f32 {
    text.chars().count() as f32 * size_pt * 0.6
}

/// Job-scoped font resolution with a `(family, weight)` cache.
pub struct FontStore {
    db: Database,
    cache: RwLock<HashMap<FontKey, FontHandle>>,
}

impl FontStore {
    /// A store backed by the system font database.
    pub fn new() -> Self {
        let mut db = Database::new();
        db.load_system_fonts();
        log::debug!("font store initialized with {} system faces", db.len());
        Self { db, cache: RwLock::new(HashMap::new()) }
    }

    /// A store with no system fonts; faces must be registered. Used by
    /// tests and hermetic deployments.
    pub fn empty() -> Self {
        Self { db: Database::new(), cache: RwLock::new(HashMap::new()) }
    }

    /// Register an in-memory font file (TTF/OTF bytes).
    pub fn register(&mut self, data: Vec<u8>) {
        self.db.load_font_data(data);
        // Registration invalidates prior substitution decisions.
        self.cache.write().expect("font cache poisoned").clear();
    }

    /// Resolve a family/weight pair to a concrete face, substituting a
    /// best-effort family when the exact name is unavailable. Never
    /// fails: the final fallback is a built-in base-14 family.
    pub fn resolve(&self, family: &str, weight: u16) -> FontHandle {
        let key = FontKey::new(family, weight);
        if let Some(handle) = self.cache.read().expect("font cache poisoned").get(&key) {
            return handle.clone();
        }

        let handle = self.lookup(family, weight);
        self.cache
            .write()
            .expect("font cache poisoned")
            .insert(key, handle.clone());
        handle
    }

    fn lookup(&self, family: &str, weight: u16) -> FontHandle {
        let generic = generic_family(family);
        let fallback_family = match generic {
            BuiltinFamily::Serif => Family::Serif,
            BuiltinFamily::Monospace => Family::Monospace,
            BuiltinFamily::SansSerif => Family::SansSerif,
        };
        let query = Query {
            families: &[Family::Name(family), fallback_family],
            weight: Weight(weight),
            ..Query::default()
        };

        let Some(id) = self.db.query(&query) else {
            log::warn!(
                "no face found for '{}' (weight {}); substituting built-in {:?}",
                family,
                weight,
                generic
            );
            return FontHandle::Builtin(generic);
        };

        let loaded = self.db.with_face_data(id, |data, index| {
            LoadedFace::new(family.to_string(), weight, Arc::new(data.to_vec()), index)
        });

        match loaded {
            Some(face) => FontHandle::Face(Arc::new(face)),
            None => FontHandle::Builtin(generic),
        }
    }
}

impl Default for FontStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Best-effort generic classification for unavailable family names.
fn generic_family(family: &str) -> BuiltinFamily {
    let name = family.to_lowercase();
    const SERIF_HINTS: &[&str] = &["times", "georgia", "garamond", "serif", "book", "palatino"];
    const MONO_HINTS: &[&str] = &["courier", "mono", "consolas", "menlo"];

    if SERIF_HINTS.iter().any(|hint| name.contains(hint)) {
        BuiltinFamily::Serif
    } else if MONO_HINTS.iter().any(|hint| name.contains(hint)) {
        BuiltinFamily::Monospace
    } else {
        BuiltinFamily::SansSerif
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_family_substitutes_builtin() {
        let store = FontStore::empty();
        let handle = store.resolve("Definitely Not A Font", 400);
        assert!(matches!(handle, FontHandle::Builtin(BuiltinFamily::SansSerif)));
    }

    #[test]
    fn serif_like_names_substitute_serif() {
        let store = FontStore::empty();
        assert!(matches!(
            store.resolve("Times New Roman", 400),
            FontHandle::Builtin(BuiltinFamily::Serif)
        ));
        assert!(matches!(
            store.resolve("Courier New", 400),
            FontHandle::Builtin(BuiltinFamily::Monospace)
        ));
    }

    #[test]
    fn resolution_is_cached() {
        let store = FontStore::empty();
        let _ = store.resolve("Helvetica", 400);
        let _ = store.resolve("helvetica", 400); // same key, case-folded
        assert_eq!(store.cache.read().unwrap().len(), 1);
    }

    #[test]
    fn builtin_measurement_is_deterministic() {
        let handle = FontHandle::Builtin(BuiltinFamily::SansSerif);
        let a = handle.measure("Hello, world", 12.0);
        let b = handle.measure("Hello, world", 12.0);
        assert_eq!(a, b);
        assert!(a > 0.0);
    }
}
