//! Element definitions for the whiteboard.
//!
//! Every drawable kind is its own struct carrying only the fields that matter
//! for it. [`Element`] is the closed set the rest of the engine works with.

mod arrow;
mod circle;
mod freehand;
mod image;
mod line;
mod note;
mod rectangle;
mod sticker;
mod text;
mod triangle;

pub use arrow::{Arrow, ArrowHead};
pub use circle::Circle;
pub use freehand::Freehand;
pub use image::{DEFAULT_IMAGE_SIZE, Image};
pub use line::Line;
pub use note::{
    DEFAULT_NOTE_HEIGHT, DEFAULT_NOTE_WIDTH, NOTE_COLOR, NOTE_FONT_SIZE, NOTE_LINE_HEIGHT, Note,
};
pub use rectangle::Rectangle;
pub use sticker::{STICKER_FONT_SIZE, Sticker};
pub use text::{DEFAULT_FONT_SIZE, Text};
pub use triangle::Triangle;

use kurbo::{BezPath, Point, Rect, Vec2};
use peniko::Color;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the participant that created an element.
pub type UserId = u64;

/// Default stroke color for new elements.
pub const DEFAULT_COLOR: &str = "#4B5563";

/// Default stroke width for new elements.
pub const DEFAULT_STROKE_WIDTH: f64 = 2.0;

/// Stable element identifier, ordered by creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Style properties shared by every element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementStyle {
    /// CSS-style hex color (`#RRGGBB`, `#RGB` or `#RRGGBBAA`).
    pub color: String,
    /// Stroke width in scene pixels.
    pub stroke_width: f64,
}

impl ElementStyle {
    pub fn new(color: impl Into<String>, stroke_width: f64) -> Self {
        Self {
            color: color.into(),
            stroke_width,
        }
    }

    /// Get the color as a peniko Color, falling back to the default color.
    pub fn stroke(&self) -> Color {
        parse_hex_color(&self.color)
            .or_else(|| parse_hex_color(DEFAULT_COLOR))
            .unwrap_or(Color::from_rgba8(0, 0, 0, 255))
    }
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self::new(DEFAULT_COLOR, DEFAULT_STROKE_WIDTH)
    }
}

/// Parse a `#RGB`, `#RRGGBB` or `#RRGGBBAA` color string.
pub fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.trim().strip_prefix('#')?;
    if !hex.is_ascii() {
        return None;
    }
    let channel = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut rgb = [0u8; 3];
            for (i, c) in hex.chars().enumerate() {
                let v = c.to_digit(16)? as u8;
                rgb[i] = v * 17;
            }
            Some(Color::from_rgba8(rgb[0], rgb[1], rgb[2], 255))
        }
        6 | 8 => {
            let r = channel(&hex[0..2])?;
            let g = channel(&hex[2..4])?;
            let b = channel(&hex[4..6])?;
            let a = if hex.len() == 8 { channel(&hex[6..8])? } else { 255 };
            Some(Color::from_rgba8(r, g, b, a))
        }
        _ => None,
    }
}

/// Measures rendered text width. Supplied by the host, which owns fonts.
pub trait TextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64;
}

/// Width estimate used when no font metrics are available.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTextMeasure;

impl TextMeasure for ApproxTextMeasure {
    fn text_width(&self, text: &str, font_size: f64) -> f64 {
        text.chars().count() as f64 * font_size * 0.6
    }
}

/// An axis-aligned box as stored on box-like elements.
///
/// Width and height keep their sign: lines use them as the end point
/// relative to the start.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoxGeometry {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The box with non-negative extents covering the same area.
    pub fn normalized(self) -> Self {
        Self {
            x: self.x.min(self.x + self.width),
            y: self.y.min(self.y + self.height),
            width: self.width.abs(),
            height: self.height.abs(),
        }
    }

    pub fn to_rect(self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.width, self.y + self.height).abs()
    }
}

/// Kind tag of an element, matching the persisted `type` string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Freehand,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Arrow,
    Text,
    Sticker,
    Image,
    Note,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Freehand => "pen",
            ElementKind::Rectangle => "rectangle",
            ElementKind::Circle => "circle",
            ElementKind::Triangle => "triangle",
            ElementKind::Line => "line",
            ElementKind::Arrow => "arrow",
            ElementKind::Text => "text",
            ElementKind::Sticker => "sticker",
            ElementKind::Image => "image",
            ElementKind::Note => "note",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "pen" => ElementKind::Freehand,
            "rectangle" => ElementKind::Rectangle,
            "circle" => ElementKind::Circle,
            "triangle" => ElementKind::Triangle,
            "line" => ElementKind::Line,
            "arrow" => ElementKind::Arrow,
            "text" => ElementKind::Text,
            "sticker" => ElementKind::Sticker,
            "image" => ElementKind::Image,
            "note" => ElementKind::Note,
            _ => return None,
        })
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Common trait for all element kinds.
pub trait ElementShape {
    /// Get the unique identifier.
    fn id(&self) -> &ElementId;

    /// Get the creating participant.
    fn owner(&self) -> UserId;

    /// Get the bounding box in scene coordinates.
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect;

    /// Check if a point hits this element, using the kind's own tolerance.
    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool;

    /// Get the outline path for rendering. Empty for glyph-only kinds.
    fn to_path(&self) -> BezPath;

    /// The reference point moved by a drag.
    fn anchor(&self) -> Point;

    /// Move the element without changing its shape.
    fn translate(&mut self, delta: Vec2);

    fn style(&self) -> &ElementStyle;

    fn style_mut(&mut self) -> &mut ElementStyle;
}

/// Enum wrapper for all element kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Freehand(Freehand),
    Rectangle(Rectangle),
    Circle(Circle),
    Triangle(Triangle),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
    Sticker(Sticker),
    Image(Image),
    Note(Note),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Freehand(s) => s.id(),
            Element::Rectangle(s) => s.id(),
            Element::Circle(s) => s.id(),
            Element::Triangle(s) => s.id(),
            Element::Line(s) => s.id(),
            Element::Arrow(s) => s.id(),
            Element::Text(s) => s.id(),
            Element::Sticker(s) => s.id(),
            Element::Image(s) => s.id(),
            Element::Note(s) => s.id(),
        }
    }

    pub fn owner(&self) -> UserId {
        match self {
            Element::Freehand(s) => s.owner(),
            Element::Rectangle(s) => s.owner(),
            Element::Circle(s) => s.owner(),
            Element::Triangle(s) => s.owner(),
            Element::Line(s) => s.owner(),
            Element::Arrow(s) => s.owner(),
            Element::Text(s) => s.owner(),
            Element::Sticker(s) => s.owner(),
            Element::Image(s) => s.owner(),
            Element::Note(s) => s.owner(),
        }
    }

    pub fn set_owner(&mut self, owner: UserId) {
        match self {
            Element::Freehand(s) => s.owner = owner,
            Element::Rectangle(s) => s.owner = owner,
            Element::Circle(s) => s.owner = owner,
            Element::Triangle(s) => s.owner = owner,
            Element::Line(s) => s.owner = owner,
            Element::Arrow(s) => s.owner = owner,
            Element::Text(s) => s.owner = owner,
            Element::Sticker(s) => s.owner = owner,
            Element::Image(s) => s.owner = owner,
            Element::Note(s) => s.owner = owner,
        }
    }

    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Freehand(_) => ElementKind::Freehand,
            Element::Rectangle(_) => ElementKind::Rectangle,
            Element::Circle(_) => ElementKind::Circle,
            Element::Triangle(_) => ElementKind::Triangle,
            Element::Line(_) => ElementKind::Line,
            Element::Arrow(_) => ElementKind::Arrow,
            Element::Text(_) => ElementKind::Text,
            Element::Sticker(_) => ElementKind::Sticker,
            Element::Image(_) => ElementKind::Image,
            Element::Note(_) => ElementKind::Note,
        }
    }

    pub fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        match self {
            Element::Freehand(s) => s.bounds(measure),
            Element::Rectangle(s) => s.bounds(measure),
            Element::Circle(s) => s.bounds(measure),
            Element::Triangle(s) => s.bounds(measure),
            Element::Line(s) => s.bounds(measure),
            Element::Arrow(s) => s.bounds(measure),
            Element::Text(s) => s.bounds(measure),
            Element::Sticker(s) => s.bounds(measure),
            Element::Image(s) => s.bounds(measure),
            Element::Note(s) => s.bounds(measure),
        }
    }

    pub fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        match self {
            Element::Freehand(s) => s.hit_test(point, measure),
            Element::Rectangle(s) => s.hit_test(point, measure),
            Element::Circle(s) => s.hit_test(point, measure),
            Element::Triangle(s) => s.hit_test(point, measure),
            Element::Line(s) => s.hit_test(point, measure),
            Element::Arrow(s) => s.hit_test(point, measure),
            Element::Text(s) => s.hit_test(point, measure),
            Element::Sticker(s) => s.hit_test(point, measure),
            Element::Image(s) => s.hit_test(point, measure),
            Element::Note(s) => s.hit_test(point, measure),
        }
    }

    pub fn to_path(&self) -> BezPath {
        match self {
            Element::Freehand(s) => s.to_path(),
            Element::Rectangle(s) => s.to_path(),
            Element::Circle(s) => s.to_path(),
            Element::Triangle(s) => s.to_path(),
            Element::Line(s) => s.to_path(),
            Element::Arrow(s) => s.to_path(),
            Element::Text(s) => s.to_path(),
            Element::Sticker(s) => s.to_path(),
            Element::Image(s) => s.to_path(),
            Element::Note(s) => s.to_path(),
        }
    }

    pub fn anchor(&self) -> Point {
        match self {
            Element::Freehand(s) => s.anchor(),
            Element::Rectangle(s) => s.anchor(),
            Element::Circle(s) => s.anchor(),
            Element::Triangle(s) => s.anchor(),
            Element::Line(s) => s.anchor(),
            Element::Arrow(s) => s.anchor(),
            Element::Text(s) => s.anchor(),
            Element::Sticker(s) => s.anchor(),
            Element::Image(s) => s.anchor(),
            Element::Note(s) => s.anchor(),
        }
    }

    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Freehand(s) => s.translate(delta),
            Element::Rectangle(s) => s.translate(delta),
            Element::Circle(s) => s.translate(delta),
            Element::Triangle(s) => s.translate(delta),
            Element::Line(s) => s.translate(delta),
            Element::Arrow(s) => s.translate(delta),
            Element::Text(s) => s.translate(delta),
            Element::Sticker(s) => s.translate(delta),
            Element::Image(s) => s.translate(delta),
            Element::Note(s) => s.translate(delta),
        }
    }

    pub fn style(&self) -> &ElementStyle {
        match self {
            Element::Freehand(s) => s.style(),
            Element::Rectangle(s) => s.style(),
            Element::Circle(s) => s.style(),
            Element::Triangle(s) => s.style(),
            Element::Line(s) => s.style(),
            Element::Arrow(s) => s.style(),
            Element::Text(s) => s.style(),
            Element::Sticker(s) => s.style(),
            Element::Image(s) => s.style(),
            Element::Note(s) => s.style(),
        }
    }

    pub fn style_mut(&mut self) -> &mut ElementStyle {
        match self {
            Element::Freehand(s) => s.style_mut(),
            Element::Rectangle(s) => s.style_mut(),
            Element::Circle(s) => s.style_mut(),
            Element::Triangle(s) => s.style_mut(),
            Element::Line(s) => s.style_mut(),
            Element::Arrow(s) => s.style_mut(),
            Element::Text(s) => s.style_mut(),
            Element::Sticker(s) => s.style_mut(),
            Element::Image(s) => s.style_mut(),
            Element::Note(s) => s.style_mut(),
        }
    }

    /// Path-like kinds store a point sequence instead of a box.
    pub fn points(&self) -> Option<&[Point]> {
        match self {
            Element::Freehand(s) => Some(&s.points),
            Element::Arrow(s) => Some(&s.points),
            _ => None,
        }
    }

    /// The stored `{x, y, width, height}` of box-like and line-like kinds.
    pub fn box_geometry(&self) -> Option<BoxGeometry> {
        match self {
            Element::Rectangle(s) => Some(s.geometry()),
            Element::Circle(s) => Some(s.geometry()),
            Element::Triangle(s) => Some(s.geometry()),
            Element::Line(s) => Some(s.geometry()),
            Element::Image(s) => Some(s.geometry()),
            Element::Note(s) => Some(s.geometry()),
            _ => None,
        }
    }

    /// Overwrite the stored box. No-op for kinds without one.
    pub fn set_box_geometry(&mut self, geometry: BoxGeometry) {
        match self {
            Element::Rectangle(s) => s.set_geometry(geometry),
            Element::Circle(s) => s.set_geometry(geometry),
            Element::Triangle(s) => s.set_geometry(geometry),
            Element::Line(s) => s.set_geometry(geometry),
            Element::Image(s) => s.set_geometry(geometry),
            Element::Note(s) => s.set_geometry(geometry),
            _ => {}
        }
    }

    /// Flip negative drag-out extents so width and height are non-negative.
    /// Lines keep their direction.
    pub fn normalize(&mut self) {
        if matches!(self, Element::Line(_)) {
            return;
        }
        if let Some(geometry) = self.box_geometry() {
            self.set_box_geometry(geometry.normalized());
        }
    }

    /// Whether the element has no extent at all (a click without a drag).
    pub fn is_degenerate(&self) -> bool {
        match self {
            Element::Freehand(s) => s.points.len() < 2,
            Element::Arrow(s) => s.points.len() < 2,
            _ => self
                .box_geometry()
                .is_some_and(|g| g.width.abs() < f64::EPSILON && g.height.abs() < f64::EPSILON),
        }
    }

    /// Text content for kinds that carry it.
    pub fn text(&self) -> Option<&str> {
        match self {
            Element::Text(s) => Some(&s.text),
            Element::Note(s) => Some(&s.text),
            _ => None,
        }
    }

    /// Check if this element can be opened for text editing.
    pub fn is_editable(&self) -> bool {
        matches!(self, Element::Text(_) | Element::Note(_))
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Element::Note(n) => Some(n),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_color() {
        let c = parse_hex_color("#3b82f6").unwrap().to_rgba8();
        assert_eq!((c.r, c.g, c.b, c.a), (59, 130, 246, 255));

        let short = parse_hex_color("#fff").unwrap().to_rgba8();
        assert_eq!((short.r, short.g, short.b), (255, 255, 255));

        let alpha = parse_hex_color("#00000080").unwrap().to_rgba8();
        assert_eq!(alpha.a, 128);

        assert!(parse_hex_color("red").is_none());
        assert!(parse_hex_color("#12345").is_none());
        assert!(parse_hex_color("#ggg").is_none());
    }

    #[test]
    fn test_style_falls_back_to_default_color() {
        let style = ElementStyle::new("not-a-color", 2.0);
        let expected = parse_hex_color(DEFAULT_COLOR).unwrap().to_rgba8();
        let actual = style.stroke().to_rgba8();
        assert_eq!((actual.r, actual.g, actual.b), (expected.r, expected.g, expected.b));
    }

    #[test]
    fn test_kind_round_trips_through_type_string() {
        for kind in [
            ElementKind::Freehand,
            ElementKind::Rectangle,
            ElementKind::Circle,
            ElementKind::Triangle,
            ElementKind::Line,
            ElementKind::Arrow,
            ElementKind::Text,
            ElementKind::Sticker,
            ElementKind::Image,
            ElementKind::Note,
        ] {
            assert_eq!(ElementKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ElementKind::parse("star"), None);
    }

    #[test]
    fn test_normalize_flips_negative_extent() {
        let mut el = Element::Rectangle(Rectangle::new(
            "r".into(),
            Point::new(50.0, 50.0),
            -30.0,
            -20.0,
        ));
        el.normalize();
        assert_eq!(el.box_geometry(), Some(BoxGeometry::new(20.0, 30.0, 30.0, 20.0)));
    }

    #[test]
    fn test_normalize_keeps_line_direction() {
        let mut el = Element::Line(Line::new("l".into(), Point::new(50.0, 50.0), -30.0, 10.0));
        el.normalize();
        assert_eq!(el.box_geometry(), Some(BoxGeometry::new(50.0, 50.0, -30.0, 10.0)));
    }

    #[test]
    fn test_degenerate_detection() {
        let click = Element::Rectangle(Rectangle::new("r".into(), Point::new(5.0, 5.0), 0.0, 0.0));
        assert!(click.is_degenerate());

        let dot = Element::Freehand(Freehand::from_points("f".into(), vec![Point::ZERO]));
        assert!(dot.is_degenerate());

        let flat = Element::Line(Line::new("l".into(), Point::ZERO, 10.0, 0.0));
        assert!(!flat.is_degenerate());
    }
}
