//! Text element.

use super::{ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::point_in_rect;
use kurbo::{BezPath, Point, Rect, Vec2};

/// Default font size for new text.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

/// Slack around the glyph box accepted by hit tests.
const HIT_MARGIN: f64 = 2.0;

/// Room below the baseline for descenders.
const DESCENT: f64 = 4.0;

/// A single line of text anchored at its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Left end of the baseline.
    pub position: Point,
    pub text: String,
    pub font_size: f64,
    pub style: ElementStyle,
}

impl Text {
    pub fn new(id: ElementId, position: Point, text: impl Into<String>) -> Self {
        Self {
            id,
            owner: 0,
            position,
            text: text.into(),
            font_size: DEFAULT_FONT_SIZE,
            style: ElementStyle::default(),
        }
    }

    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }
}

impl ElementShape for Text {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    /// Box from the baseline up by the font size.
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        let width = measure.text_width(&self.text, self.font_size);
        Rect::new(
            self.position.x,
            self.position.y - self.font_size,
            self.position.x + width,
            self.position.y,
        )
    }

    fn hit_test(&self, point: Point, measure: &dyn TextMeasure) -> bool {
        let b = self.bounds(measure);
        let hit_box = Rect::new(
            b.x0 - HIT_MARGIN,
            b.y0 - HIT_MARGIN,
            b.x1 + HIT_MARGIN,
            self.position.y + DESCENT,
        );
        point_in_rect(point, hit_box)
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

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMeasure(f64);

    impl TextMeasure for FixedMeasure {
        fn text_width(&self, _text: &str, _font_size: f64) -> f64 {
            self.0
        }
    }

    #[test]
    fn test_bounds_extend_up_from_baseline() {
        let text = Text::new("t".into(), Point::new(10.0, 100.0), "hello");
        let b = text.bounds(&FixedMeasure(40.0));
        assert_eq!(b, Rect::new(10.0, 84.0, 50.0, 100.0));
    }

    #[test]
    fn test_hit_test() {
        let text = Text::new("t".into(), Point::new(10.0, 100.0), "hello");
        let m = FixedMeasure(40.0);
        assert!(text.hit_test(Point::new(30.0, 90.0), &m));
        assert!(text.hit_test(Point::new(9.0, 103.0), &m));
        assert!(!text.hit_test(Point::new(30.0, 105.0), &m));
        assert!(!text.hit_test(Point::new(30.0, 80.0), &m));
    }

    #[test]
    fn test_font_size_scales_box() {
        let text = Text::new("t".into(), Point::new(0.0, 50.0), "x").with_font_size(32.0);
        let b = text.bounds(&FixedMeasure(10.0));
        assert!((b.height() - 32.0).abs() < f64::EPSILON);
    }
}
