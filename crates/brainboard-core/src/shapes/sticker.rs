//! Sticker (emoji glyph) element.

use super::{ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::STICKER_HIT_RADIUS;
use kurbo::{BezPath, Point, Rect, Vec2};

/// Font size stickers are drawn at.
pub const STICKER_FONT_SIZE: f64 = 32.0;

/// A single glyph stamped onto the board.
#[derive(Debug, Clone, PartialEq)]
pub struct Sticker {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Baseline origin of the glyph.
    pub position: Point,
    /// Glyph identifier, usually an emoji.
    pub glyph: String,
    pub style: ElementStyle,
}

impl Sticker {
    pub fn new(id: ElementId, position: Point, glyph: impl Into<String>) -> Self {
        Self {
            id,
            owner: 0,
            position,
            glyph: glyph.into(),
            style: ElementStyle::default(),
        }
    }
}

impl ElementShape for Sticker {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        let width = measure.text_width(&self.glyph, STICKER_FONT_SIZE);
        Rect::new(
            self.position.x,
            self.position.y - STICKER_FONT_SIZE,
            self.position.x + width,
            self.position.y,
        )
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point.distance(self.position) < STICKER_HIT_RADIUS
    }

    fn to_path(&self) -> BezPath {
        BezPath::new()
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
