use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use ttf_parser::Face;

/// Metrics for one loaded face, computed once at load time.
///
/// A `ttf_parser::Face` borrows the font bytes, so it cannot live in
/// the owning struct; instead the scalar metrics are extracted up
/// front and glyph advances fill a per-character cache. The file is
/// re-parsed only when a character is seen for the first time.
pub struct FaceMetrics {
    data: Arc<Vec<u8>>,
    index: u32,
    units_per_em: f32,
    ascender: f32,
    descender: f32,
    line_gap: f32,
    space_advance: f32,
    /// `None` marks a character with no glyph in this face.
    advances: RwLock<HashMap<char, Option<f32>>>,
}

impl FaceMetrics {
    pub fn new(data: Arc<Vec<u8>>, index: u32) -> Option<Self> {
        let face = Face::parse(&data, index).ok()?;
        let units_per_em = face.units_per_em() as f32;
        if units_per_em <= 0.0 {
            return None;
        }
        let ascender = face.ascender() as f32;
        let descender = face.descender() as f32;
        let line_gap = face.line_gap() as f32;
        let space_advance = advance_units(&face, ' ').unwrap_or(units_per_em * 0.5);
        drop(face);

        Some(Self {
            data,
            index,
            units_per_em,
            ascender,
            descender,
            line_gap,
            space_advance,
            advances: RwLock::new(HashMap::new()),
        })
    }

    /// Width of `text` at `size_pt` from horizontal glyph advances.
    /// Characters without a glyph fall back to the space advance.
    pub fn text_width(&self, text: &str, size_pt: f32) -> f32 {
        let mut total_units = 0.0;
        let mut unseen = Vec::new();
        {
            let cache = self.advances.read().expect("advance cache poisoned");
            for c in text.chars() {
                match cache.get(&c) {
                    Some(Some(units)) => total_units += units,
                    Some(None) => total_units += self.space_advance,
                    None => unseen.push(c),
                }
            }
        }

        if !unseen.is_empty() {
            let mut cache = self.advances.write().expect("advance cache poisoned");
            let face = Face::parse(&self.data, self.index).ok();
            for c in unseen {
                let units = face.as_ref().and_then(|f| advance_units(f, c));
                total_units += units.unwrap_or(self.space_advance);
                cache.entry(c).or_insert(units);
            }
        }

        total_units * size_pt / self.units_per_em
    }

    /// Baseline offset from the top of the em box.
    pub fn ascent(&self, size_pt: f32) -> f32 {
        self.ascender * size_pt / self.units_per_em
    }

    /// Natural line height (ascender - descender + line gap).
    pub fn natural_line_height(&self, size_pt: f32) -> f32 {
        (self.ascender - self.descender + self.line_gap) * size_pt / self.units_per_em
    }
}

fn advance_units(face: &Face, c: char) -> Option<f32> {
    let glyph = face.glyph_index(c)?;
    face.glyph_hor_advance(glyph).map(f32::from)
}
