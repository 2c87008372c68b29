//! Sticky note element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::point_in_rect;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};

/// Default note fill.
pub const NOTE_COLOR: &str = "#FFEB3B";

pub const DEFAULT_NOTE_WIDTH: f64 = 200.0;
pub const DEFAULT_NOTE_HEIGHT: f64 = 150.0;

/// Font size of note text.
pub const NOTE_FONT_SIZE: f64 = 14.0;

/// Distance between wrapped lines.
pub const NOTE_LINE_HEIGHT: f64 = 18.0;

/// Horizontal inset of the text block.
pub const NOTE_PADDING: f64 = 10.0;

/// Baseline of the first line, from the top edge.
pub const NOTE_FIRST_BASELINE: f64 = 20.0;

/// A filled rectangle with wrapped text.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub(crate) id: ElementId,
    pub owner: UserId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub text: String,
    /// Fill color lives in `style.color`.
    pub style: ElementStyle,
}

impl Note {
    pub fn new(id: ElementId, position: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            owner: 0,
            position,
            width: DEFAULT_NOTE_WIDTH,
            height: DEFAULT_NOTE_HEIGHT,
            text: text.into(),
            style: ElementStyle {
                color: NOTE_COLOR.to_string(),
                ..ElementStyle::default()
            },
        }
    }

    pub fn as_rect(&self) -> Rect {
        self.geometry().to_rect()
    }

    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn set_geometry(&mut self, geometry: BoxGeometry) {
        self.position = Point::new(geometry.x, geometry.y);
        self.width = geometry.width;
        self.height = geometry.height;
    }

    /// Split the text into lines that fit the note, breaking on spaces.
    pub fn wrapped_lines(&self, measure: &dyn TextMeasure) -> Vec<String> {
        let max_width = self.width.abs() - NOTE_PADDING * 2.0;
        let mut lines = Vec::new();
        let mut line = String::new();
        for word in self.text.split(' ') {
            let candidate = if line.is_empty() {
                word.to_string()
            } else {
                format!("{line} {word}")
            };
            if !line.is_empty() && measure.text_width(&candidate, NOTE_FONT_SIZE) > max_width {
                lines.push(std::mem::replace(&mut line, word.to_string()));
            } else {
                line = candidate;
            }
        }
        if !line.is_empty() {
            lines.push(line);
        }
        lines
    }

    /// Baseline origin of each wrapped line.
    pub fn line_origins(&self, count: usize) -> impl Iterator<Item = Point> + '_ {
        let rect = self.as_rect();
        (0..count).map(move |i| {
            Point::new(
                rect.x0 + NOTE_PADDING,
                rect.y0 + NOTE_FIRST_BASELINE + i as f64 * NOTE_LINE_HEIGHT,
            )
        })
    }
}

impl ElementShape for Note {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.as_rect()
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_in_rect(point, self.as_rect())
    }

    fn to_path(&self) -> BezPath {
        self.as_rect().to_path(0.1)
    }

    fn anchor(&self) -> Point {
        self.position
    }

    fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    fn style(&self) -> &ElementStyle {
        &self.style
    }

    fn style_mut(&mut self) -> &mut ElementStyle {
        &mut self.style
    }
}
