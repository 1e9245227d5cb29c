use crate::{binding, SceneError};
use platen_types::{Color, Rect};
use serde::{de, Deserialize, Deserializer, Serialize};

/// A complete design document: the immutable baseline every record is
/// resolved against. Never mutated during a merge job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub name: String,
    pub pages: Vec<Page>,
}

impl Scene {
    pub fn from_json(input: &str) -> Result<Self, SceneError> {
        let scene: Scene = serde_json::from_str(input)?;
        scene.validate()?;
        Ok(scene)
    }

    /// Input validation. A scene that fails here aborts the job
    /// before any output is produced.
    pub fn validate(&self) -> Result<(), SceneError> {
        if self.pages.is_empty() {
            return Err(SceneError::EmptyScene);
        }
        for (index, page) in self.pages.iter().enumerate() {
            if page.width_mm <= 0.0 || page.height_mm <= 0.0 {
                return Err(SceneError::InvalidPageSize {
                    index,
                    width: page.width_mm,
                    height: page.height_mm,
                });
            }
            for element in &page.elements {
                element.validate()?;
            }
        }
        Ok(())
    }
}

/// One physical page of the design, in millimeters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub width_mm: f32,
    pub height_mm: f32,
    /// Bleed margin beyond the trim edge, applied in post-processing.
    #[serde(default)]
    pub bleed_mm: Option<f32>,
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// The atomic design unit: geometry + style + kind-specific content.
#[derive(Debug, Clone, Serialize)]
pub struct Element {
    #[serde(default)]
    pub id: String,
    /// Position and size in mm, top-left origin.
    pub frame: Rect,
    #[serde(default)]
    pub rotation: Option<f32>,
    #[serde(default)]
    pub z: i32,
    #[serde(default)]
    pub style: TextStyle,
    #[serde(flatten)]
    pub content: ElementContent,
}

/// Elements authored in external design tools carry no explicit
/// `kind`; their binding is encoded in the display name instead.
/// Deserialization falls back to the name-tag codec when `kind` is
/// absent, so both wire forms yield the same sum type.
impl<'de> Deserialize<'de> for Element {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Head {
            #[serde(default)]
            id: String,
            frame: Rect,
            #[serde(default)]
            rotation: Option<f32>,
            #[serde(default)]
            z: i32,
            #[serde(default)]
            style: TextStyle,
        }

        let value = serde_json::Value::deserialize(deserializer)?;
        let content = if value.get("kind").is_some() {
            serde_json::from_value(value.clone()).map_err(de::Error::custom)?
        } else {
            let name = value.get("id").and_then(|v| v.as_str()).unwrap_or("");
            binding::parse_name_tag(name)
                .map_err(de::Error::custom)?
                .ok_or_else(|| {
                    de::Error::custom(format!(
                        "element '{}' has no content kind and no binding name tag",
                        name
                    ))
                })?
        };
        let head: Head = serde_json::from_value(value).map_err(de::Error::custom)?;

        Ok(Element {
            id: head.id,
            frame: head.frame,
            rotation: head.rotation,
            z: head.z,
            style: head.style,
            content,
        })
    }
}

impl Element {
    pub fn validate(&self) -> Result<(), SceneError> {
        let invalid = |reason: String| SceneError::InvalidElement {
            id: self.id.clone(),
            reason,
        };
        if self.frame.width <= 0.0 || self.frame.height <= 0.0 {
            return Err(invalid(format!(
                "width and height must be positive, got {}x{}",
                self.frame.width, self.frame.height
            )));
        }
        if self.frame.x < 0.0 || self.frame.y < 0.0 {
            return Err(invalid(format!(
                "position must be non-negative, got ({}, {})",
                self.frame.x, self.frame.y
            )));
        }
        if let ElementContent::Image { reference } = &self.content {
            if reference.trim().is_empty() {
                return Err(invalid("image reference must not be empty".into()));
            }
        }
        Ok(())
    }
}

/// The closed set of element kinds. Only text-bearing variants carry a
/// `TextBinding`; machine-readable variants bind a single field; image
/// and shape variants cannot bind record content at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementContent {
    Text {
        binding: TextBinding,
    },
    /// Ordered field names joined into a multi-line block, with blank
    /// lines dropped (a record missing "Suite" must not leave a hole
    /// in the middle of an address).
    AddressBlock {
        fields: Vec<String>,
    },
    /// A deterministic function of the record index, independent of
    /// record content.
    Sequence {
        #[serde(flatten)]
        spec: SequenceSpec,
    },
    Barcode {
        symbology: Symbology,
        binding: TextBinding,
    },
    #[serde(rename = "qrcode")]
    QrCode {
        #[serde(default)]
        ec_level: QrLevel,
        binding: TextBinding,
    },
    /// The binding yields a reference name mapped to a concrete asset
    /// by the calling system; only non-emptiness is validated here.
    Image {
        reference: String,
    },
    Shape {
        #[serde(default)]
        shape: ShapeKind,
        #[serde(default)]
        fill: Option<Color>,
        #[serde(default)]
        stroke: Option<Color>,
        #[serde(default)]
        stroke_width_mm: Option<f32>,
    },
}

/// Either a literal value or a reference to a named record field.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextBinding {
    Literal(String),
    Field(String),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SequenceSpec {
    #[serde(default = "default_sequence_start")]
    pub start: u64,
    #[serde(default)]
    pub prefix: String,
    #[serde(default)]
    pub suffix: String,
    #[serde(default)]
    pub padding: usize,
}

fn default_sequence_start() -> u64 {
    1
}

impl Default for SequenceSpec {
    fn default() -> Self {
        Self { start: 1, prefix: String::new(), suffix: String::new(), padding: 0 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbology {
    Code128,
    Code39,
    Ean13,
    #[serde(rename = "upca")]
    UpcA,
}

impl std::str::FromStr for Symbology {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "code128" => Ok(Self::Code128),
            "code39" => Ok(Self::Code39),
            "ean13" => Ok(Self::Ean13),
            "upca" | "upc-a" => Ok(Self::UpcA),
            other => Err(format!("unknown symbology '{}'", other)),
        }
    }
}

/// QR error-correction level, lowest to highest redundancy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum QrLevel {
    L,
    #[default]
    M,
    Q,
    H,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    #[default]
    Rectangle,
    Ellipse,
    Line,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HorizontalAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlign {
    #[default]
    Top,
    Middle,
    Bottom,
}

/// Style record for text-bearing elements.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextStyle {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size_pt: f32,
    #[serde(default = "default_font_weight")]
    pub weight: u16,
    #[serde(default)]
    pub align: HorizontalAlign,
    #[serde(default)]
    pub valign: VerticalAlign,
    #[serde(default)]
    pub color: Color,
    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    #[serde(default)]
    pub auto_fit: Option<AutoFit>,
    #[serde(default)]
    pub label: Option<FieldLabel>,
}

fn default_font_family() -> String {
    "Helvetica".to_string()
}

fn default_font_size() -> f32 {
    12.0
}

fn default_font_weight() -> u16 {
    400
}

fn default_line_height() -> f32 {
    1.2
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size_pt: default_font_size(),
            weight: default_font_weight(),
            align: HorizontalAlign::default(),
            valign: VerticalAlign::default(),
            color: Color::default(),
            line_height: default_line_height(),
            auto_fit: None,
            label: None,
        }
    }
}

/// Shrink-to-fit search bounds for fixed-size containers.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct AutoFit {
    #[serde(default = "default_min_pt")]
    pub min_pt: f32,
    /// Upper bound; defaults to the element's declared font size.
    #[serde(default)]
    pub max_pt: Option<f32>,
}

fn default_min_pt() -> f32 {
    6.0
}

impl Default for AutoFit {
    fn default() -> Self {
        Self { min_pt: default_min_pt(), max_pt: None }
    }
}

/// A small-caps caption for unfamiliar/custom field names, rendered
/// above or inline with the value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldLabel {
    pub text: String,
    #[serde(default)]
    pub inline: bool,
}
