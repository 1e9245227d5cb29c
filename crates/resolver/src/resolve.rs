use crate::autofit::fit_text_to_container;
use crate::{ResolvedContent, ResolvedElement, ResolvedPage};
use platen_fonts::FontStore;
use platen_scene::{
    Element, ElementContent, Page, QrLevel, Record, SequenceSpec, Symbology, TextBinding,
};
use platen_types::{Size, PT_PER_MM};

/// Resolve one (page, record, index) triple into draw-ready elements.
///
/// Per-element failures (a barcode that cannot encode the bound value)
/// degrade to an [`ResolvedContent::ErrorMark`] and never abort the
/// record.
pub fn resolve_page(
    page: &Page,
    record: &Record,
    record_index: usize,
    fonts: &FontStore,
) -> ResolvedPage {
    let mut elements: Vec<ResolvedElement> = page
        .elements
        .iter()
        .map(|element| resolve_element(element, record, record_index, fonts))
        .collect();

    // Draw order: z ascending; sort is stable so design order breaks
    // ties.
    elements.sort_by_key(|e| e.z);

    ResolvedPage {
        width_mm: page.width_mm,
        height_mm: page.height_mm,
        bleed_mm: page.bleed_mm,
        elements,
    }
}

fn resolve_element(
    element: &Element,
    record: &Record,
    record_index: usize,
    fonts: &FontStore,
) -> ResolvedElement {
    let mut style = element.style.clone();
    let mut overflow = false;

    let content = match &element.content {
        ElementContent::Text { binding } => {
            ResolvedContent::Text(resolve_text_binding(binding, record))
        }
        ElementContent::AddressBlock { fields } => {
            ResolvedContent::Text(resolve_address_block(fields, record))
        }
        ElementContent::Sequence { spec } => {
            ResolvedContent::Text(resolve_sequence(spec, record_index))
        }
        ElementContent::Barcode { symbology, binding } => {
            let value = resolve_text_binding(binding, record);
            resolve_barcode(*symbology, value.trim(), element)
        }
        ElementContent::QrCode { ec_level, binding } => {
            let value = resolve_text_binding(binding, record);
            resolve_qr(*ec_level, value.trim(), element)
        }
        // Asset mapping is the caller's job; the reference was
        // validated non-empty with the scene.
        ElementContent::Image { reference } => ResolvedContent::Image(reference.clone()),
        ElementContent::Shape { shape, fill, stroke, stroke_width_mm } => {
            ResolvedContent::Shape {
                kind: *shape,
                fill: fill.clone(),
                stroke: stroke.clone(),
                stroke_width_mm: *stroke_width_mm,
            }
        }
    };

    // Auto-fit applies to the text-bearing kinds only, after the
    // concrete string is known.
    if let (ResolvedContent::Text(text), Some(auto_fit)) = (&content, &element.style.auto_fit) {
        let font = fonts.resolve(&style.font_family, style.weight);
        let max_pt = auto_fit.max_pt.unwrap_or(style.font_size_pt);
        let result = fit_text_to_container(
            text,
            &font,
            style.line_height,
            auto_fit.min_pt,
            max_pt,
            element.frame.width * PT_PER_MM,
            element.frame.height * PT_PER_MM,
        );
        style.font_size_pt = result.size_pt;
        if !result.fits {
            overflow = true;
            log::warn!(
                "element '{}': text overflows frame even at minimum size {:.1}pt; clipping",
                element.id,
                result.size_pt
            );
        }
    }

    ResolvedElement {
        frame: element.frame,
        rotation: element.rotation,
        z: element.z,
        style,
        overflow,
        content,
    }
}

/// Text binding to concrete string. Unbound or missing fields yield a
/// single space, never an empty string, which would collapse the box.
fn resolve_text_binding(binding: &TextBinding, record: &Record) -> String {
    let resolved = match binding {
        TextBinding::Literal(value) => Some(value.clone()),
        TextBinding::Field(name) => record.get_str(name),
    };
    match resolved {
        Some(value) if !value.is_empty() => value,
        _ => " ".to_string(),
    }
}

/// Ordered fields, trimmed, blanks dropped, joined with line breaks.
fn resolve_address_block(fields: &[String], record: &Record) -> String {
    let lines: Vec<String> = fields
        .iter()
        .filter_map(|field| record.get_str(field))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .collect();

    if lines.is_empty() {
        " ".to_string()
    } else {
        lines.join("\n")
    }
}

/// Sequence value for `record_index`: a function of the index alone,
/// so re-runs are stable regardless of record content.
pub fn resolve_sequence(spec: &SequenceSpec, record_index: usize) -> String {
    let value = spec.start.saturating_add(record_index as u64);
    format!(
        "{}{:0>width$}{}",
        spec.prefix,
        value,
        spec.suffix,
        width = spec.padding
    )
}

fn resolve_barcode(symbology: Symbology, value: &str, element: &Element) -> ResolvedContent {
    let mapped = match symbology {
        Symbology::Code128 => platen_barcode::Symbology::Code128,
        Symbology::Code39 => platen_barcode::Symbology::Code39,
        Symbology::Ean13 => platen_barcode::Symbology::Ean13,
        Symbology::UpcA => platen_barcode::Symbology::UpcA,
    };
    match platen_barcode::encode_linear(mapped, value) {
        Ok(grid) => ResolvedContent::Modules(
            grid.fit_into(Size::new(element.frame.width, element.frame.height)),
        ),
        Err(e) => {
            log::warn!("element '{}': {}", element.id, e);
            ResolvedContent::ErrorMark { message: e.to_string() }
        }
    }
}

fn resolve_qr(level: QrLevel, value: &str, element: &Element) -> ResolvedContent {
    let mapped = match level {
        QrLevel::L => platen_barcode::QrLevel::L,
        QrLevel::M => platen_barcode::QrLevel::M,
        QrLevel::Q => platen_barcode::QrLevel::Q,
        QrLevel::H => platen_barcode::QrLevel::H,
    };
    match platen_barcode::encode_qr(mapped, value) {
        Ok(grid) => ResolvedContent::Modules(
            grid.fit_into(Size::new(element.frame.width, element.frame.height)),
        ),
        Err(e) => {
            log::warn!("element '{}': {}", element.id, e);
            ResolvedContent::ErrorMark { message: e.to_string() }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use platen_scene::{AutoFit, Scene};
    use platen_types::Rect;

    fn record(json: &str) -> Record {
        serde_json::from_str(json).unwrap()
    }

    fn page_with(content_json: &str) -> Page {
        let scene: Scene = serde_json::from_str(&format!(
            r#"{{"name":"t","pages":[{{"width_mm":100.0,"height_mm":50.0,
                "elements":[{{"frame":{{"x":5.0,"y":5.0,"width":60.0,"height":20.0}},{}}}]}}]}}"#,
            content_json
        ))
        .unwrap();
        scene.pages.into_iter().next().unwrap()
    }

    fn only_element(page: &Page, record: &Record, index: usize) -> ResolvedElement {
        let fonts = FontStore::empty();
        resolve_page(page, record, index, &fonts)
            .elements
            .into_iter()
            .next()
            .unwrap()
    }

    #[test]
    fn field_binding_resolves_record_value() {
        let page = page_with(r#""kind":"text","binding":{"field":"Name"}"#);
        let el = only_element(&page, &record(r#"{"Name":"Acme"}"#), 0);
        assert!(matches!(el.content, ResolvedContent::Text(ref t) if t == "Acme"));
    }

    #[test]
    fn missing_field_yields_single_space() {
        let page = page_with(r#""kind":"text","binding":{"field":"Nope"}"#);
        let el = only_element(&page, &record(r#"{"Name":"Acme"}"#), 0);
        assert!(matches!(el.content, ResolvedContent::Text(ref t) if t == " "));
    }

    #[test]
    fn address_block_drops_blank_middle_line() {
        let page = page_with(r#""kind":"address_block","fields":["Name","Suite","City"]"#);
        let el = only_element(
            &page,
            &record(r#"{"Name":"Acme","Suite":"","City":"Reno"}"#),
            0,
        );
        assert!(matches!(el.content, ResolvedContent::Text(ref t) if t == "Acme\nReno"));
    }

    #[test]
    fn address_block_treats_null_as_blank() {
        let page = page_with(r#""kind":"address_block","fields":["Name","Suite","City"]"#);
        let el = only_element(
            &page,
            &record(r#"{"Name":"Acme","Suite":null,"City":"Reno"}"#),
            0,
        );
        assert!(matches!(el.content, ResolvedContent::Text(ref t) if t == "Acme\nReno"));
    }

    #[test]
    fn sequence_is_a_function_of_index_only() {
        let spec = SequenceSpec {
            start: 1,
            prefix: "INV-".into(),
            suffix: String::new(),
            padding: 4,
        };
        let values: Vec<String> = (0..3).map(|i| resolve_sequence(&spec, i)).collect();
        assert_eq!(values, ["INV-0001", "INV-0002", "INV-0003"]);
    }

    #[test]
    fn sequence_padding_never_truncates() {
        let spec = SequenceSpec { start: 99_999, prefix: String::new(), suffix: String::new(), padding: 3 };
        assert_eq!(resolve_sequence(&spec, 0), "99999");
    }

    #[test]
    fn barcode_failure_becomes_error_mark_not_abort() {
        let page = page_with(
            r#""kind":"barcode","symbology":"ean13","binding":{"field":"Sku"}"#,
        );
        let el = only_element(&page, &record(r#"{"Sku":"not-numeric"}"#), 0);
        assert!(matches!(el.content, ResolvedContent::ErrorMark { ref message } if !message.is_empty()));
    }

    #[test]
    fn qr_binding_produces_fitted_modules() {
        let page = page_with(r#""kind":"qrcode","binding":{"field":"Url"}"#);
        let el = only_element(&page, &record(r#"{"Url":"https://example.com"}"#), 0);
        let ResolvedContent::Modules(rects) = el.content else {
            panic!("expected modules");
        };
        assert!(!rects.is_empty());
        // Fitted modules stay inside the 60x20 frame; the square code
        // is centered in the wide box.
        for r in &rects {
            assert!(r.x >= 0.0 && r.right() <= 60.0 + 1e-3);
            assert!(r.y >= 0.0 && r.bottom() <= 20.0 + 1e-3);
        }
    }

    #[test]
    fn elements_are_ordered_by_z() {
        let scene: Scene = serde_json::from_str(
            r#"{"name":"t","pages":[{"width_mm":100.0,"height_mm":50.0,"elements":[
                {"id":"top","z":5,"frame":{"x":0.0,"y":0.0,"width":10.0,"height":10.0},
                 "kind":"text","binding":{"literal":"a"}},
                {"id":"under","z":-1,"frame":{"x":0.0,"y":0.0,"width":10.0,"height":10.0},
                 "kind":"shape"}
            ]}]}"#,
        )
        .unwrap();
        let fonts = FontStore::empty();
        let resolved = resolve_page(&scene.pages[0], &Record::new(), 0, &fonts);
        assert!(matches!(resolved.elements[0].content, ResolvedContent::Shape { .. }));
        assert!(matches!(resolved.elements[1].content, ResolvedContent::Text(_)));
    }

    #[test]
    fn auto_fit_shrinks_oversized_text() {
        let mut page = page_with(r#""kind":"text","binding":{"field":"Name"}"#);
        page.elements[0].style.font_size_pt = 48.0;
        page.elements[0].style.auto_fit = Some(AutoFit { min_pt: 6.0, max_pt: None });
        page.elements[0].frame = Rect::new(0.0, 0.0, 30.0, 8.0);

        let el = only_element(
            &page,
            &record(r#"{"Name":"A Rather Long Company Name LLC"}"#),
            0,
        );
        assert!(el.style.font_size_pt < 48.0);
        assert!(!el.overflow);
    }
}
