use crate::{overlay_content, PressError};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, ObjectId};
use platen_types::PT_PER_MM;

/// Distance from the trim edge to the near end of a crop mark.
pub const CROP_MARK_OFFSET_MM: f32 = 3.0;
/// Length of each crop mark segment.
pub const CROP_MARK_LENGTH_MM: f32 = 10.0;

const CROP_MARK_WIDTH_PT: f32 = 0.5;

/// Expands every page's MediaBox outward by `bleed_mm` and records the
/// nominal page as the TrimBox. Content coordinates are untouched, so
/// elements that were designed to bleed keep hanging over the trim
/// edge into the new margin.
pub fn apply_bleed(bytes: &[u8], bleed_mm: f32) -> Result<Vec<u8>, PressError> {
    if bleed_mm <= 0.0 {
        return Ok(bytes.to_vec());
    }
    let bleed_pt = bleed_mm * PT_PER_MM;

    let mut doc = Document::load_mem(bytes)?;
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in pages {
        let media = inherited_box(&doc, page_id, b"MediaBox")?
            .ok_or_else(|| PressError::Other("page has no MediaBox".into()))?;
        let dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
        dict.set("TrimBox", box_array(media));
        dict.set(
            "MediaBox",
            box_array([
                media[0] - bleed_pt,
                media[1] - bleed_pt,
                media[2] + bleed_pt,
                media[3] + bleed_pt,
            ]),
        );
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

/// Draws two orthogonal mark segments outside each trim corner, eight
/// segments per page, as an additive overlay stream. The MediaBox is
/// grown where needed so the marks survive viewer clipping; existing
/// content streams are never modified.
pub fn add_crop_marks(bytes: &[u8]) -> Result<Vec<u8>, PressError> {
    let offset = CROP_MARK_OFFSET_MM * PT_PER_MM;
    let length = CROP_MARK_LENGTH_MM * PT_PER_MM;

    let mut doc = Document::load_mem(bytes)?;
    let pages: Vec<ObjectId> = doc.get_pages().values().copied().collect();
    for page_id in pages {
        let trim = match inherited_box(&doc, page_id, b"TrimBox")? {
            Some(b) => b,
            None => inherited_box(&doc, page_id, b"MediaBox")?
                .ok_or_else(|| PressError::Other("page has no MediaBox".into()))?,
        };
        let media = inherited_box(&doc, page_id, b"MediaBox")?.unwrap_or(trim);

        let extent = offset + length;
        let grown = [
            media[0].min(trim[0] - extent),
            media[1].min(trim[1] - extent),
            media[2].max(trim[2] + extent),
            media[3].max(trim[3] + extent),
        ];
        let dict = doc.get_object_mut(page_id)?.as_dict_mut()?;
        dict.set("MediaBox", box_array(grown));

        let stream = marks_content(trim, offset, length).encode()?;
        overlay_content(&mut doc, page_id, stream)?;
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

fn marks_content(trim: [f32; 4], offset: f32, length: f32) -> Content {
    let [x0, y0, x1, y1] = trim;
    let mut operations = vec![
        Operation::new("q", vec![]),
        Operation::new("w", vec![Object::Real(CROP_MARK_WIDTH_PT)]),
        Operation::new("G", vec![Object::Real(0.0)]),
    ];

    // Each corner gets a horizontal and a vertical segment pointing
    // away from the page; only the outward direction differs.
    let corners = [
        (x0, y0, -1.0_f32, -1.0_f32),
        (x1, y0, 1.0, -1.0),
        (x0, y1, -1.0, 1.0),
        (x1, y1, 1.0, 1.0),
    ];
    for (cx, cy, dx, dy) in corners {
        operations.push(Operation::new(
            "m",
            vec![Object::Real(cx + dx * offset), Object::Real(cy)],
        ));
        operations.push(Operation::new(
            "l",
            vec![Object::Real(cx + dx * (offset + length)), Object::Real(cy)],
        ));
        operations.push(Operation::new(
            "m",
            vec![Object::Real(cx), Object::Real(cy + dy * offset)],
        ));
        operations.push(Operation::new(
            "l",
            vec![Object::Real(cx), Object::Real(cy + dy * (offset + length))],
        ));
    }

    operations.push(Operation::new("S", vec![]));
    operations.push(Operation::new("Q", vec![]));
    Content { operations }
}

/// Reads a box entry, walking up the page tree for inherited values.
fn inherited_box(
    doc: &Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<[f32; 4]>, PressError> {
    let mut current = page_id;
    loop {
        let dict = doc.get_object(current)?.as_dict()?;
        if let Ok(obj) = dict.get(key) {
            return Ok(Some(parse_box(doc, obj)?));
        }
        match dict.get(b"Parent") {
            Ok(parent) => current = parent.as_reference()?,
            Err(_) => return Ok(None),
        }
    }
}

fn parse_box(doc: &Document, obj: &Object) -> Result<[f32; 4], PressError> {
    let obj = match obj {
        Object::Reference(id) => doc.get_object(*id)?,
        other => other,
    };
    let arr = obj.as_array()?;
    if arr.len() != 4 {
        return Err(PressError::Other(format!(
            "box array has {} entries, expected 4",
            arr.len()
        )));
    }
    let mut out = [0.0; 4];
    for (slot, entry) in out.iter_mut().zip(arr) {
        *slot = number(entry)?;
    }
    Ok(out)
}

fn number(obj: &Object) -> Result<f32, PressError> {
    match obj {
        Object::Integer(i) => Ok(*i as f32),
        Object::Real(r) => Ok(*r as f32),
        _ => Err(PressError::Other("expected a numeric box entry".into())),
    }
}

fn box_array(values: [f32; 4]) -> Object {
    Object::Array(values.into_iter().map(Object::Real).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::tests::sample_pdf_bytes;

    const PAGE_W: f32 = 283.46;
    const PAGE_H: f32 = 141.73;

    fn first_page(doc: &Document) -> ObjectId {
        *doc.get_pages().get(&1).unwrap()
    }

    #[test]
    fn bleed_expands_media_and_keeps_trim() {
        let bytes = sample_pdf_bytes(1, "Card");
        let out = apply_bleed(&bytes, 3.0).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let page = first_page(&doc);
        let media = inherited_box(&doc, page, b"MediaBox").unwrap().unwrap();
        let trim = inherited_box(&doc, page, b"TrimBox").unwrap().unwrap();

        let bleed_pt = 3.0 * PT_PER_MM;
        assert!((trim[0]).abs() < 0.01 && (trim[2] - PAGE_W).abs() < 0.01);
        assert!((media[0] + bleed_pt).abs() < 0.01);
        assert!((media[2] - (PAGE_W + bleed_pt)).abs() < 0.01);
        assert!((media[3] - (PAGE_H + bleed_pt)).abs() < 0.01);
    }

    #[test]
    fn zero_bleed_is_identity() {
        let bytes = sample_pdf_bytes(1, "Card");
        assert_eq!(apply_bleed(&bytes, 0.0).unwrap(), bytes);
    }

    #[test]
    fn crop_marks_are_eight_segments_outside_the_trim() {
        let bytes = sample_pdf_bytes(1, "Card");
        let out = add_crop_marks(&apply_bleed(&bytes, 3.0).unwrap()).unwrap();

        let doc = Document::load_mem(&out).unwrap();
        let page = first_page(&doc);

        // The overlay is a second content stream; the original is
        // untouched.
        let page_dict = doc.get_object(page).unwrap().as_dict().unwrap();
        let contents = page_dict.get(b"Contents").unwrap().as_array().unwrap();
        assert_eq!(contents.len(), 2);

        let overlay_id = contents.last().unwrap().as_reference().unwrap();
        let stream = doc.get_object(overlay_id).unwrap().as_stream().unwrap();
        let content = Content::decode(&stream.content).unwrap();

        let mut segments: Vec<[f32; 4]> = Vec::new();
        let mut pending: Option<(f32, f32)> = None;
        for op in &content.operations {
            let coords = |xs: &[Object]| (number(&xs[0]).unwrap(), number(&xs[1]).unwrap());
            match op.operator.as_str() {
                "m" => pending = Some(coords(&op.operands)),
                "l" => {
                    let (x0, y0) = pending.take().unwrap();
                    let (x1, y1) = coords(&op.operands);
                    segments.push([x0, y0, x1, y1]);
                }
                _ => {}
            }
        }
        assert_eq!(segments.len(), 8);

        for [x0, y0, x1, y1] in segments {
            let horizontal = (y0 - y1).abs() < 1e-3;
            let vertical = (x0 - x1).abs() < 1e-3;
            assert!(horizontal ^ vertical, "segments must be axis-aligned");
            // Entirely outside the trim interior.
            let outside = (x0 <= 0.0 && x1 <= 0.0)
                || (x0 >= PAGE_W && x1 >= PAGE_W)
                || (y0 <= 0.0 && y1 <= 0.0)
                || (y0 >= PAGE_H && y1 >= PAGE_H);
            assert!(outside, "segment [{x0},{y0},{x1},{y1}] enters the trim box");
        }
    }

    #[test]
    fn crop_marks_grow_the_media_box_for_visibility() {
        let bytes = sample_pdf_bytes(1, "Card");
        let out = add_crop_marks(&bytes).unwrap();
        let doc = Document::load_mem(&out).unwrap();
        let media = inherited_box(&doc, first_page(&doc), b"MediaBox")
            .unwrap()
            .unwrap();
        let extent = (CROP_MARK_OFFSET_MM + CROP_MARK_LENGTH_MM) * PT_PER_MM;
        assert!((media[0] + extent).abs() < 0.01);
        assert!((media[2] - (PAGE_W + extent)).abs() < 0.01);
    }
}
