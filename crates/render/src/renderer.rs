use crate::AssetCatalog;
use platen_fonts::{BuiltinFamily, FontHandle, FontStore, LoadedFace};
use platen_resolver::wrap::wrap_text;
use platen_resolver::{ResolvedContent, ResolvedElement, ResolvedPage};
use platen_scene::{HorizontalAlign, ShapeKind, TextStyle, VerticalAlign};
use platen_types::{Color, Rect, Size, PT_PER_MM};
use printpdf::font::ParsedFont;
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{
    BuiltinFont, FontId, Layer, Mm, PdfConformance, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb,
    XObjectId,
};
use std::collections::HashMap;

const ERROR_MARK_TEXT_PT: f32 = 6.0;
const DEFAULT_STROKE_PT: f32 = 1.0;

/// Accumulates rendered pages into one `printpdf` document, embedding
/// each font face and image at most once.
pub struct DocumentBuilder {
    document: PdfDocument,
    fonts: HashMap<(String, u16), FontId>,
    images: HashMap<String, (XObjectId, (u32, u32))>,
}

impl DocumentBuilder {
    pub fn new(title: &str) -> Self {
        let mut document = PdfDocument::new(title);
        document.metadata.info.conformance = PdfConformance::X3_2002_PDF_1_3;
        Self {
            document,
            fonts: HashMap::new(),
            images: HashMap::new(),
        }
    }

    /// One resolved page becomes one output page of the same size.
    pub fn add_page(&mut self, page: &ResolvedPage, fonts: &FontStore, assets: &AssetCatalog) {
        let sheet = Size::new(page.width_mm, page.height_mm);
        self.add_sheet(sheet, &[(page, (0.0, 0.0))], fonts, assets);
    }

    /// One output page of `sheet_mm` carrying several resolved pages,
    /// each at an `(x, y)` mm offset from the sheet's top-left corner.
    /// This is the imposition path: label instances share a sheet.
    pub fn add_sheet(
        &mut self,
        sheet_mm: Size,
        placements: &[(&ResolvedPage, (f32, f32))],
        fonts: &FontStore,
        assets: &AssetCatalog,
    ) {
        let mut painter = PagePainter::new(self, sheet_mm.height * PT_PER_MM);
        for (page, (offset_x, offset_y)) in placements {
            for element in &page.elements {
                painter.paint_element(element, *offset_x, *offset_y, fonts, assets);
            }
        }
        let ops = painter.into_ops();

        let page_num = self.document.pages.len() + 1;
        let layer_name = format!("Page {} Layer 1", page_num);
        let layer = Layer::new(&*layer_name);
        let layer_id = self.document.add_layer(&layer);
        let mut final_ops = vec![Op::BeginLayer { layer_id }];
        final_ops.extend(ops);

        self.document
            .pages
            .push(PdfPage::new(Mm(sheet_mm.width), Mm(sheet_mm.height), final_ops));
    }

    pub fn page_count(&self) -> usize {
        self.document.pages.len()
    }

    /// Serialize the accumulated document.
    pub fn finish(self) -> Vec<u8> {
        let mut warnings = Vec::new();
        let bytes = self.document.save(&PdfSaveOptions::default(), &mut warnings);
        for warning in &warnings {
            log::debug!("pdf writer: {:?}", warning);
        }
        bytes
    }

    /// Embed a discovered face, once per `(family, weight)`. `None`
    /// means the face data did not parse; the caller substitutes a
    /// built-in font.
    fn font_id(&mut self, face: &LoadedFace) -> Option<FontId> {
        let key = (face.family.to_lowercase(), face.weight);
        if let Some(id) = self.fonts.get(&key) {
            return Some(id.clone());
        }
        let mut warnings = Vec::new();
        let Some(parsed) = ParsedFont::from_bytes(&face.data, face.index as usize, &mut warnings)
        else {
            log::warn!(
                "face for '{}' (weight {}) did not parse; substituting built-in",
                face.family,
                face.weight
            );
            return None;
        };
        let id = self.document.add_font(&parsed);
        self.fonts.insert(key, id.clone());
        Some(id)
    }

    fn image_xobject(
        &mut self,
        reference: &str,
        assets: &AssetCatalog,
    ) -> Option<(XObjectId, (u32, u32))> {
        if let Some(cached) = self.images.get(reference) {
            return Some(cached.clone());
        }
        let Some(bytes) = assets.get(reference) else {
            log::warn!("no asset registered for image reference '{}'", reference);
            return None;
        };
        let mut warnings = Vec::new();
        let image = match printpdf::image::RawImage::decode_from_bytes(bytes, &mut warnings) {
            Ok(image) => image,
            Err(e) => {
                log::warn!("failed to decode image '{}': {}", reference, e);
                return None;
            }
        };
        let dims = (image.width as u32, image.height as u32);
        let id = XObjectId::new();
        self.document
            .resources
            .xobjects
            .map
            .insert(id.clone(), XObject::Image(image));
        self.images
            .insert(reference.to_string(), (id.clone(), dims));
        Some((id, dims))
    }
}

/// Op-building state for a single output page. Text sections are kept
/// open across consecutive text elements and font/color changes are
/// emitted only when they differ from the current graphics state.
struct PagePainter<'a> {
    builder: &'a mut DocumentBuilder,
    page_height_pt: f32,
    ops: Vec<Op>,
    text_section_open: bool,
    current_font: Option<(FontId, f32)>,
    current_fill: Option<printpdf::color::Color>,
}

impl<'a> PagePainter<'a> {
    fn new(builder: &'a mut DocumentBuilder, page_height_pt: f32) -> Self {
        Self {
            builder,
            page_height_pt,
            ops: Vec::new(),
            text_section_open: false,
            current_font: None,
            current_fill: None,
        }
    }

    fn into_ops(mut self) -> Vec<Op> {
        self.close_text_section();
        self.ops
    }

    fn close_text_section(&mut self) {
        if self.text_section_open {
            self.ops.push(Op::EndTextSection);
            self.text_section_open = false;
        }
    }

    fn open_text_section(&mut self) {
        if !self.text_section_open {
            self.ops.push(Op::StartTextSection);
            self.text_section_open = true;
        }
    }

    fn set_fill_color(&mut self, col: printpdf::color::Color) {
        if self.current_fill.as_ref() != Some(&col) {
            self.ops.push(Op::SetFillColor { col: col.clone() });
            self.current_fill = Some(col);
        }
    }

    fn to_pdf_color(c: &Color) -> printpdf::color::Color {
        printpdf::color::Color::Rgb(Rgb::new(
            c.r as f32 / 255.0,
            c.g as f32 / 255.0,
            c.b as f32 / 255.0,
            None,
        ))
    }

    fn paint_element(
        &mut self,
        element: &ResolvedElement,
        offset_x_mm: f32,
        offset_y_mm: f32,
        fonts: &FontStore,
        assets: &AssetCatalog,
    ) {
        // The single mm to pt conversion point. `frame` stays in the
        // top-left coordinate space; the y flip happens per draw op.
        let frame = Rect::new(
            (offset_x_mm + element.frame.x) * PT_PER_MM,
            (offset_y_mm + element.frame.y) * PT_PER_MM,
            element.frame.width * PT_PER_MM,
            element.frame.height * PT_PER_MM,
        );
        let rotation = element.rotation.unwrap_or(0.0);

        match &element.content {
            ResolvedContent::Text(text) => {
                if rotation != 0.0 {
                    log::warn!("text rotation is not supported; drawing upright");
                }
                self.paint_text(&element.style, element.overflow, text, frame, fonts);
            }
            ResolvedContent::Modules(rects) => {
                self.paint_modules(&element.style, rects, frame, rotation);
            }
            ResolvedContent::Image(reference) => match self.builder.image_xobject(reference, assets)
            {
                Some((id, dims)) => self.paint_image(id, dims, frame),
                None => self.paint_error_mark(frame, &format!("image '{}'", reference)),
            },
            ResolvedContent::Shape { kind, fill, stroke, stroke_width_mm } => {
                self.paint_shape(*kind, fill, stroke, *stroke_width_mm, frame, rotation);
            }
            ResolvedContent::ErrorMark { message } => self.paint_error_mark(frame, message),
        }
    }

    fn paint_text(
        &mut self,
        style: &TextStyle,
        overflow: bool,
        text: &str,
        frame: Rect,
        fonts: &FontStore,
    ) {
        let handle = fonts.resolve(&style.font_family, style.weight);
        let size = style.font_size_pt;
        let line_height = size * style.line_height;

        // Field labels render as uppercase at a reduced size, either
        // on their own line above the value or inline to its left.
        let mut text_frame = frame;
        if let Some(label) = &style.label {
            let label_size = (size * 0.6).max(4.0);
            let label_text = label.text.to_uppercase();
            if label.inline {
                let label_width = handle.measure(&label_text, label_size) + label_size * 0.4;
                self.draw_line(
                    &handle,
                    &label_text,
                    label_size,
                    style.weight,
                    frame.x,
                    frame.y + handle.ascent(size),
                    &style.color,
                );
                text_frame.x += label_width;
                text_frame.width = (text_frame.width - label_width).max(1.0);
            } else {
                let label_line = label_size * style.line_height;
                self.draw_line(
                    &handle,
                    &label_text,
                    label_size,
                    style.weight,
                    frame.x,
                    frame.y + handle.ascent(label_size),
                    &style.color,
                );
                text_frame.y += label_line;
                text_frame.height = (text_frame.height - label_line).max(1.0);
            }
        }

        let mut lines = wrap_text(text, &handle, size, text_frame.width);
        if overflow {
            // Line-granularity clip: drop lines that would escape the
            // frame, always keeping the first.
            let max_lines = ((text_frame.height / line_height).floor() as usize).max(1);
            lines.truncate(max_lines);
        }

        let block_height = lines.len() as f32 * line_height;
        let top = match style.valign {
            VerticalAlign::Top => text_frame.y,
            VerticalAlign::Middle => text_frame.y + (text_frame.height - block_height) / 2.0,
            VerticalAlign::Bottom => text_frame.y + text_frame.height - block_height,
        };

        for (i, line) in lines.iter().enumerate() {
            let line_width = handle.measure(line, size);
            let x = match style.align {
                HorizontalAlign::Left => text_frame.x,
                HorizontalAlign::Center => text_frame.x + (text_frame.width - line_width) / 2.0,
                HorizontalAlign::Right => text_frame.x + text_frame.width - line_width,
            };
            let baseline = top + i as f32 * line_height + handle.ascent(size);
            self.draw_line(&handle, line, size, style.weight, x, baseline, &style.color);
        }
    }

    /// One line of text at an absolute baseline, in top-left pt space.
    #[allow(clippy::too_many_arguments)]
    fn draw_line(
        &mut self,
        handle: &FontHandle,
        text: &str,
        size: f32,
        weight: u16,
        x: f32,
        baseline_y: f32,
        color: &Color,
    ) {
        let pdf_y = self.page_height_pt - baseline_y;
        let fill = Self::to_pdf_color(color);

        let embedded = match handle {
            FontHandle::Face(face) => self.builder.font_id(face),
            FontHandle::Builtin(_) => None,
        };

        match embedded {
            Some(font_id) => {
                self.open_text_section();
                self.set_fill_color(fill);
                if self.current_font.as_ref() != Some(&(font_id.clone(), size)) {
                    self.ops.push(Op::SetFontSize { size: Pt(size), font: font_id.clone() });
                    self.current_font = Some((font_id.clone(), size));
                }
                let matrix = TextMatrix::Translate(Pt(x), Pt(pdf_y));
                self.ops.push(Op::SetTextMatrix { matrix });
                self.ops.push(Op::WriteText {
                    items: vec![TextItem::Text(text.to_string())],
                    font: font_id,
                });
            }
            None => {
                // Built-in fonts position with a text cursor, which is
                // relative within a section, so each line gets its own.
                let font = builtin_font(handle, weight);
                self.close_text_section();
                self.ops.push(Op::StartTextSection);
                self.set_fill_color(fill);
                self.ops.push(Op::SetTextCursor {
                    pos: Point { x: Pt(x), y: Pt(pdf_y) },
                });
                self.ops.push(Op::SetFontSizeBuiltinFont { size: Pt(size), font });
                self.ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(text.to_string())],
                    font,
                });
                self.ops.push(Op::EndTextSection);
            }
        }
    }

    /// Barcode/QR modules: frame-relative mm rectangles become one
    /// filled polygon with a ring per module.
    fn paint_modules(&mut self, style: &TextStyle, modules: &[Rect], frame: Rect, rotation: f32) {
        if modules.is_empty() {
            return;
        }
        self.close_text_section();

        let center = (frame.x + frame.width / 2.0, frame.y + frame.height / 2.0);
        let rings = modules
            .iter()
            .map(|m| {
                let r = Rect::new(
                    frame.x + m.x * PT_PER_MM,
                    frame.y + m.y * PT_PER_MM,
                    m.width * PT_PER_MM,
                    m.height * PT_PER_MM,
                );
                self.rect_ring(r, rotation, center)
            })
            .collect();

        self.set_fill_color(Self::to_pdf_color(&style.color));
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings,
                mode: PaintMode::Fill,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }

    fn paint_image(&mut self, id: XObjectId, (img_w, img_h): (u32, u32), frame: Rect) {
        self.close_text_section();
        let pdf_y = self.page_height_pt - (frame.y + frame.height);
        let transform = XObjectTransform {
            translate_x: Some(Pt(frame.x)),
            translate_y: Some(Pt(pdf_y)),
            scale_x: Some(frame.width / img_w as f32),
            scale_y: Some(frame.height / img_h as f32),
            rotate: None,
            dpi: Some(72.0),
        };
        self.ops.push(Op::UseXobject { id, transform });
    }

    fn paint_shape(
        &mut self,
        kind: ShapeKind,
        fill: &Option<Color>,
        stroke: &Option<Color>,
        stroke_width_mm: Option<f32>,
        frame: Rect,
        rotation: f32,
    ) {
        self.close_text_section();
        let center = (frame.x + frame.width / 2.0, frame.y + frame.height / 2.0);

        let ring = match kind {
            ShapeKind::Rectangle => self.rect_ring(frame, rotation, center),
            ShapeKind::Ellipse => self.ellipse_ring(frame, rotation, center),
            ShapeKind::Line => {
                // A rule across the vertical middle of the frame.
                let y = frame.y + frame.height / 2.0;
                self.points_ring(
                    &[(frame.x, y), (frame.x + frame.width, y)],
                    rotation,
                    center,
                )
            }
        };

        let mode = match (kind, fill.is_some(), stroke.is_some()) {
            (ShapeKind::Line, _, _) => PaintMode::Stroke,
            (_, true, true) => PaintMode::FillStroke,
            (_, false, true) => PaintMode::Stroke,
            _ => PaintMode::Fill,
        };

        if let Some(fill) = fill {
            self.set_fill_color(Self::to_pdf_color(fill));
        }
        if matches!(mode, PaintMode::Stroke | PaintMode::FillStroke) {
            let col = stroke.clone().or_else(|| fill.clone()).unwrap_or_default();
            self.ops.push(Op::SetOutlineColor { col: Self::to_pdf_color(&col) });
            let width_pt = stroke_width_mm.map_or(DEFAULT_STROKE_PT, |mm| mm * PT_PER_MM);
            self.ops.push(Op::SetOutlineThickness { pt: Pt(width_pt) });
        }

        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![ring],
                mode,
                winding_order: WindingOrder::EvenOdd,
            },
        });
    }

    /// Visible placeholder for a recovered per-element failure: a
    /// stroked box, its diagonal, and a short message.
    fn paint_error_mark(&mut self, frame: Rect, message: &str) {
        self.close_text_section();
        let red = printpdf::color::Color::Rgb(Rgb::new(0.8, 0.1, 0.1, None));

        self.ops.push(Op::SetOutlineColor { col: red.clone() });
        self.ops.push(Op::SetOutlineThickness { pt: Pt(0.75) });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![self.rect_ring(frame, 0.0, (0.0, 0.0))],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::EvenOdd,
            },
        });
        self.ops.push(Op::DrawPolygon {
            polygon: Polygon {
                rings: vec![self.points_ring(
                    &[(frame.x, frame.y), (frame.x + frame.width, frame.y + frame.height)],
                    0.0,
                    (0.0, 0.0),
                )],
                mode: PaintMode::Stroke,
                winding_order: WindingOrder::EvenOdd,
            },
        });

        // Truncate the message to the frame width so the placeholder
        // never spills into neighbouring elements.
        let handle = FontHandle::Builtin(BuiltinFamily::SansSerif);
        let mut text: String = message.chars().take(200).collect();
        while !text.is_empty() && handle.measure(&text, ERROR_MARK_TEXT_PT) > frame.width - 2.0 {
            text.pop();
        }
        if !text.is_empty() {
            self.draw_line(
                &handle,
                &text,
                ERROR_MARK_TEXT_PT,
                400,
                frame.x + 1.0,
                frame.y + handle.ascent(ERROR_MARK_TEXT_PT) + 1.0,
                &Color::rgb(204, 26, 26),
            );
        }
    }

    fn rect_ring(&self, r: Rect, rotation: f32, center: (f32, f32)) -> PolygonRing {
        self.points_ring(
            &[
                (r.x, r.y),
                (r.x + r.width, r.y),
                (r.x + r.width, r.y + r.height),
                (r.x, r.y + r.height),
            ],
            rotation,
            center,
        )
    }

    fn ellipse_ring(&self, r: Rect, rotation: f32, center: (f32, f32)) -> PolygonRing {
        const SEGMENTS: usize = 32;
        let (cx, cy) = (r.x + r.width / 2.0, r.y + r.height / 2.0);
        let (rx, ry) = (r.width / 2.0, r.height / 2.0);
        let points: Vec<(f32, f32)> = (0..SEGMENTS)
            .map(|i| {
                let t = i as f32 / SEGMENTS as f32 * std::f32::consts::TAU;
                (cx + rx * t.cos(), cy + ry * t.sin())
            })
            .collect();
        self.points_ring(&points, rotation, center)
    }

    /// Top-left pt points to a polygon ring in PDF bottom-left space,
    /// optionally rotated (clockwise degrees) around `center`.
    fn points_ring(&self, points: &[(f32, f32)], rotation: f32, center: (f32, f32)) -> PolygonRing {
        let points = points
            .iter()
            .map(|&p| {
                let (x, y) = rotate_point(p, center, rotation);
                LinePoint {
                    p: Point { x: Pt(x), y: Pt(self.page_height_pt - y) },
                    bezier: false,
                }
            })
            .collect();
        PolygonRing { points }
    }
}

fn rotate_point((x, y): (f32, f32), (cx, cy): (f32, f32), degrees: f32) -> (f32, f32) {
    if degrees == 0.0 {
        return (x, y);
    }
    let rad = degrees.to_radians();
    let (sin, cos) = (rad.sin(), rad.cos());
    let (dx, dy) = (x - cx, y - cy);
    (cx + dx * cos - dy * sin, cy + dx * sin + dy * cos)
}

fn builtin_font(handle: &FontHandle, weight: u16) -> BuiltinFont {
    let family = match handle {
        FontHandle::Builtin(family) => *family,
        FontHandle::Face(_) => BuiltinFamily::SansSerif,
    };
    let bold = weight >= 600;
    match (family, bold) {
        (BuiltinFamily::SansSerif, false) => BuiltinFont::Helvetica,
        (BuiltinFamily::SansSerif, true) => BuiltinFont::HelveticaBold,
        (BuiltinFamily::Serif, false) => BuiltinFont::TimesRoman,
        (BuiltinFamily::Serif, true) => BuiltinFont::TimesBold,
        (BuiltinFamily::Monospace, false) => BuiltinFont::Courier,
        (BuiltinFamily::Monospace, true) => BuiltinFont::CourierBold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_element(text: &str, frame: Rect) -> ResolvedElement {
        ResolvedElement {
            frame,
            rotation: None,
            z: 0,
            style: TextStyle::default(),
            overflow: false,
            content: ResolvedContent::Text(text.to_string()),
        }
    }

    fn page(elements: Vec<ResolvedElement>) -> ResolvedPage {
        ResolvedPage {
            width_mm: 100.0,
            height_mm: 50.0,
            bleed_mm: None,
            elements,
        }
    }

    // 2x2 RGB PNG.
    const TINY_PNG: &[u8] = &[
        0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a, 0x00, 0x00, 0x00, 0x0d, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x02, 0x00, 0x00, 0x00, 0x02, 0x08, 0x02, 0x00, 0x00, 0x00, 0xfd,
        0xd4, 0x9a, 0x73, 0x00, 0x00, 0x00, 0x12, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9c, 0x63, 0xf8,
        0xcf, 0xc0, 0xc0, 0x00, 0xc2, 0x0c, 0xff, 0x81, 0x00, 0x00, 0x1f, 0xee, 0x05, 0xfb, 0x0b,
        0xd9, 0x68, 0x8b, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4e, 0x44, 0xae, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn text_page_produces_valid_pdf() {
        let fonts = FontStore::empty();
        let mut builder = DocumentBuilder::new("test");
        builder.add_page(
            &page(vec![text_element("Hello", Rect::new(10.0, 10.0, 80.0, 10.0))]),
            &fonts,
            &AssetCatalog::new(),
        );
        let bytes = builder.finish();
        assert!(bytes.starts_with(b"%PDF"));
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn sheet_with_several_placements_is_one_page() {
        let fonts = FontStore::empty();
        let item = page(vec![text_element("x", Rect::new(1.0, 1.0, 20.0, 5.0))]);
        let mut builder = DocumentBuilder::new("test");
        builder.add_sheet(
            Size::letter_mm(),
            &[(&item, (12.7, 12.7)), (&item, (120.0, 12.7))],
            &fonts,
            &AssetCatalog::new(),
        );
        assert_eq!(builder.page_count(), 1);
        let bytes = builder.finish();
        let doc = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), 1);
    }

    #[test]
    fn image_is_embedded_once_per_reference() {
        let fonts = FontStore::empty();
        let mut assets = AssetCatalog::new();
        assets.insert("logo", TINY_PNG.to_vec());

        let image = ResolvedElement {
            frame: Rect::new(5.0, 5.0, 20.0, 20.0),
            rotation: None,
            z: 0,
            style: TextStyle::default(),
            overflow: false,
            content: ResolvedContent::Image("logo".to_string()),
        };
        let p = page(vec![image.clone(), image]);
        let mut builder = DocumentBuilder::new("test");
        builder.add_page(&p, &fonts, &assets);
        builder.add_page(&p, &fonts, &assets);
        assert_eq!(builder.images.len(), 1);
        assert!(builder.finish().starts_with(b"%PDF"));
    }

    #[test]
    fn missing_image_renders_placeholder_not_panic() {
        let fonts = FontStore::empty();
        let missing = ResolvedElement {
            frame: Rect::new(5.0, 5.0, 30.0, 10.0),
            rotation: None,
            z: 0,
            style: TextStyle::default(),
            overflow: false,
            content: ResolvedContent::Image("nope".to_string()),
        };
        let mut builder = DocumentBuilder::new("test");
        builder.add_page(&page(vec![missing]), &fonts, &AssetCatalog::new());
        let bytes = builder.finish();
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn error_mark_and_modules_render() {
        let fonts = FontStore::empty();
        let mark = ResolvedElement {
            frame: Rect::new(5.0, 5.0, 40.0, 10.0),
            rotation: None,
            z: 0,
            style: TextStyle::default(),
            overflow: false,
            content: ResolvedContent::ErrorMark { message: "bad barcode value".into() },
        };
        let modules = ResolvedElement {
            frame: Rect::new(5.0, 20.0, 40.0, 20.0),
            rotation: None,
            z: 0,
            style: TextStyle::default(),
            overflow: false,
            content: ResolvedContent::Modules(vec![
                Rect::new(0.0, 0.0, 1.0, 10.0),
                Rect::new(2.0, 0.0, 1.0, 10.0),
            ]),
        };
        let mut builder = DocumentBuilder::new("test");
        builder.add_page(&page(vec![mark, modules]), &fonts, &AssetCatalog::new());
        let bytes = builder.finish();
        assert_eq!(lopdf::Document::load_mem(&bytes).unwrap().get_pages().len(), 1);
    }

    #[test]
    fn rotation_rotates_around_center() {
        let (x, y) = rotate_point((10.0, 0.0), (0.0, 0.0), 90.0);
        assert!(x.abs() < 1e-4);
        assert!((y - 10.0).abs() < 1e-4);
        assert_eq!(rotate_point((3.0, 4.0), (1.0, 1.0), 0.0), (3.0, 4.0));
    }
}
