//! JSON persistence format.
//!
//! Elements are stored as flat records carrying only the fields of their kind.
//! Decoding is strict per element: a record missing a field its kind needs is
//! rejected rather than patched with guesses.

use crate::config::BoardSettings;
use crate::scene::{Layer, LayerId, Scene};
use crate::shapes::{
    Arrow, BoxGeometry, Circle, DEFAULT_COLOR, DEFAULT_STROKE_WIDTH, Element, ElementId,
    ElementKind, ElementStyle, Freehand, Image, Line, Note, Rectangle, Sticker, Text, Triangle,
    UserId,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Errors decoding persisted or received data.
#[derive(Debug, Error)]
pub enum CodecError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Document is not a JSON object")]
    NotAnObject,
    #[error("Unknown element type: {0}")]
    UnknownKind(String),
    #[error("{kind} element is missing `{field}`")]
    MissingField { kind: &'static str, field: &'static str },
    #[error("Invalid layer: {0}")]
    InvalidLayer(String),
}

/// One element as persisted and broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElementRecord {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default)]
    pub user_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticker_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, alias = "lineWidth", skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_true() -> bool {
    true
}

impl ElementRecord {
    fn empty(id: &ElementId, kind: ElementKind, style: &ElementStyle, owner: UserId) -> Self {
        Self {
            id: id.as_str().to_string(),
            kind: kind.as_str().to_string(),
            points: None,
            x: None,
            y: None,
            width: None,
            height: None,
            text: None,
            color: style.color.clone(),
            user_id: owner,
            sticker_type: None,
            image_url: None,
            stroke_width: Some(style.stroke_width),
            font_size: None,
        }
    }

    fn with_box(mut self, g: BoxGeometry) -> Self {
        self.x = Some(g.x);
        self.y = Some(g.y);
        self.width = Some(g.width);
        self.height = Some(g.height);
        self
    }

    fn with_position(mut self, p: Point) -> Self {
        self.x = Some(p.x);
        self.y = Some(p.y);
        self
    }

    fn position(&self, kind: &'static str) -> Result<Point, CodecError> {
        let x = self.x.ok_or(CodecError::MissingField { kind, field: "x" })?;
        let y = self.y.ok_or(CodecError::MissingField { kind, field: "y" })?;
        Ok(Point::new(x, y))
    }

    fn geometry(&self, kind: &'static str) -> Result<BoxGeometry, CodecError> {
        let p = self.position(kind)?;
        let width = self.width.ok_or(CodecError::MissingField { kind, field: "width" })?;
        let height = self.height.ok_or(CodecError::MissingField { kind, field: "height" })?;
        Ok(BoxGeometry::new(p.x, p.y, width, height))
    }

    fn path(&self, kind: &'static str) -> Result<Vec<Point>, CodecError> {
        match &self.points {
            Some(points) if !points.is_empty() => Ok(points.clone()),
            _ => Err(CodecError::MissingField { kind, field: "points" }),
        }
    }
}

impl From<&Element> for ElementRecord {
    fn from(element: &Element) -> Self {
        let record = ElementRecord::empty(element.id(), element.kind(), element.style(), element.owner());
        match element {
            Element::Freehand(f) => ElementRecord {
                points: Some(f.points.clone()),
                ..record
            },
            Element::Arrow(a) => ElementRecord {
                points: Some(a.points.clone()),
                ..record
            },
            Element::Rectangle(_) | Element::Circle(_) | Element::Triangle(_) | Element::Line(_) => {
                match element.box_geometry() {
                    Some(g) => record.with_box(g),
                    None => record,
                }
            }
            Element::Image(img) => ElementRecord {
                image_url: Some(img.url.clone()),
                ..record.with_box(img.geometry())
            },
            Element::Note(note) => ElementRecord {
                text: Some(note.text.clone()),
                ..record.with_box(note.geometry())
            },
            Element::Text(t) => ElementRecord {
                text: Some(t.text.clone()),
                font_size: Some(t.font_size),
                ..record.with_position(t.position)
            },
            Element::Sticker(s) => ElementRecord {
                sticker_type: Some(s.glyph.clone()),
                ..record.with_position(s.position)
            },
        }
    }
}

impl TryFrom<ElementRecord> for Element {
    type Error = CodecError;

    fn try_from(record: ElementRecord) -> Result<Self, Self::Error> {
        let kind = ElementKind::parse(&record.kind)
            .ok_or_else(|| CodecError::UnknownKind(record.kind.clone()))?;
        let name = kind.as_str();
        let id = ElementId::new(record.id.clone());

        let mut element = match kind {
            ElementKind::Freehand => Element::Freehand(Freehand::from_points(id, record.path(name)?)),
            ElementKind::Arrow => Element::Arrow(Arrow::from_points(id, record.path(name)?)),
            ElementKind::Rectangle => {
                let g = record.geometry(name)?;
                Element::Rectangle(Rectangle::new(id, Point::new(g.x, g.y), g.width, g.height))
            }
            ElementKind::Circle => {
                let g = record.geometry(name)?;
                Element::Circle(Circle::new(id, Point::new(g.x, g.y), g.width, g.height))
            }
            ElementKind::Triangle => {
                let g = record.geometry(name)?;
                Element::Triangle(Triangle::new(id, Point::new(g.x, g.y), g.width, g.height))
            }
            ElementKind::Line => {
                let g = record.geometry(name)?;
                Element::Line(Line::new(id, Point::new(g.x, g.y), g.width, g.height))
            }
            ElementKind::Image => {
                let url = record
                    .image_url
                    .clone()
                    .ok_or(CodecError::MissingField { kind: name, field: "imageUrl" })?;
                let mut image = Image::new(id, record.position(name)?, url);
                if let (Some(w), Some(h)) = (record.width, record.height) {
                    image = image.with_size(w, h);
                }
                Element::Image(image)
            }
            ElementKind::Note => {
                let mut note = Note::new(id, record.position(name)?, record.text.clone().unwrap_or_default());
                if let (Some(w), Some(h)) = (record.width, record.height) {
                    note.width = w;
                    note.height = h;
                }
                Element::Note(note)
            }
            ElementKind::Text => {
                let content = record
                    .text
                    .clone()
                    .ok_or(CodecError::MissingField { kind: name, field: "text" })?;
                let mut text = Text::new(id, record.position(name)?, content);
                if let Some(size) = record.font_size {
                    text = text.with_font_size(size);
                }
                Element::Text(text)
            }
            ElementKind::Sticker => {
                let glyph = record
                    .sticker_type
                    .clone()
                    .ok_or(CodecError::MissingField { kind: name, field: "stickerType" })?;
                Element::Sticker(Sticker::new(id, record.position(name)?, glyph))
            }
        };

        *element.style_mut() = ElementStyle::new(
            record.color,
            record.stroke_width.unwrap_or(DEFAULT_STROKE_WIDTH),
        );
        element.set_owner(record.user_id);
        Ok(element)
    }
}

/// One layer as persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_true")]
    pub visible: bool,
    #[serde(default)]
    pub locked: bool,
    pub elements: Vec<ElementRecord>,
}

impl From<&Layer> for LayerRecord {
    fn from(layer: &Layer) -> Self {
        Self {
            id: layer.id.as_str().to_string(),
            name: layer.name.clone(),
            visible: layer.visible,
            locked: layer.locked,
            elements: layer.elements.iter().map(ElementRecord::from).collect(),
        }
    }
}

impl TryFrom<LayerRecord> for Layer {
    type Error = CodecError;

    fn try_from(record: LayerRecord) -> Result<Self, Self::Error> {
        if record.id.is_empty() {
            return Err(CodecError::InvalidLayer("empty id".to_string()));
        }
        let elements = record
            .elements
            .into_iter()
            .map(Element::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Layer {
            id: LayerId::new(record.id),
            name: record.name,
            visible: record.visible,
            locked: record.locked,
            elements,
        })
    }
}

/// The complete saved board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDocument {
    pub layers: Vec<LayerRecord>,
    pub active_layer: String,
    #[serde(flatten)]
    pub settings: BoardSettings,
}

/// Fallback document written when the full one cannot be stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinimalDocument {
    pub layers: Vec<LayerRecord>,
    pub active_layer: String,
}

impl BoardDocument {
    pub fn new(scene: &Scene, settings: &BoardSettings) -> Self {
        Self {
            layers: encode_layers(scene.layers()),
            active_layer: scene.active_layer_id().as_str().to_string(),
            settings: settings.clone(),
        }
    }
}

impl MinimalDocument {
    pub fn new(scene: &Scene) -> Self {
        Self {
            layers: encode_layers(scene.layers()),
            active_layer: scene.active_layer_id().as_str().to_string(),
        }
    }
}

pub fn encode_layers(layers: &[Layer]) -> Vec<LayerRecord> {
    layers.iter().map(LayerRecord::from).collect()
}

/// Decode a JSON array of layer records. Any bad layer or element fails the whole list.
pub fn decode_layers(value: &Value) -> Result<Vec<Layer>, CodecError> {
    let records: Vec<LayerRecord> = serde_json::from_value(value.clone())?;
    records.into_iter().map(Layer::try_from).collect()
}

/// Decode a single element record.
pub fn decode_element(value: &Value) -> Result<Element, CodecError> {
    let record: ElementRecord = serde_json::from_value(value.clone())?;
    Element::try_from(record)
}

/// Fields recovered from a saved document. `None` means the field was absent
/// or failed validation and the current value should be kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedDocument {
    pub layers: Option<Vec<Layer>>,
    pub active_layer: Option<LayerId>,
    pub current_color: Option<String>,
    pub line_width: Option<f64>,
    pub show_grid: Option<bool>,
    pub snap_to_grid: Option<bool>,
}

impl DecodedDocument {
    /// Validate a full or minimal document field by field.
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let value: Value = serde_json::from_str(json)?;
        let obj = value.as_object().ok_or(CodecError::NotAnObject)?;
        let mut doc = DecodedDocument::default();

        if let Some(raw) = obj.get("layers") {
            match decode_layers(raw) {
                Ok(layers) if !layers.is_empty() => doc.layers = Some(layers),
                Ok(_) => log::warn!("Ignoring saved layers: list is empty"),
                Err(e) => log::warn!("Ignoring saved layers: {}", e),
            }
        }
        doc.active_layer = obj
            .get("activeLayer")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(LayerId::from);
        doc.current_color = obj
            .get("currentColor")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        doc.line_width = obj.get("lineWidth").and_then(Value::as_f64);
        doc.show_grid = obj.get("showGrid").and_then(Value::as_bool);
        doc.snap_to_grid = obj.get("snapToGrid").and_then(Value::as_bool);
        Ok(doc)
    }

    /// Whether nothing usable was found.
    pub fn is_empty(&self) -> bool {
        *self == DecodedDocument::default()
    }
}
