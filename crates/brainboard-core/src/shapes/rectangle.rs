//! Rectangle element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::point_in_rect;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    pub(crate) id: ElementId,
    /// Creating participant.
    pub owner: UserId,
    /// Top-left corner position (before normalization, the drag start).
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Style properties.
    pub style: ElementStyle,
}

impl Rectangle {
    /// Create a new rectangle.
    pub fn new(id: ElementId, position: Point, width: f64, height: f64) -> Self {
        Self {
            id,
            owner: 0,
            position,
            width,
            height,
            style: ElementStyle::default(),
        }
    }

    /// Get the rectangle as a normalized kurbo Rect.
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
}

impl ElementShape for Rectangle {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::ApproxTextMeasure;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new("r".into(), Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.position.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.position.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
        assert_eq!(rect.style.color, super::super::DEFAULT_COLOR);
    }

    #[test]
    fn test_hit_test() {
        let rect = Rectangle::new("r".into(), Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(rect.hit_test(Point::new(50.0, 50.0), &ApproxTextMeasure));
        assert!(rect.hit_test(Point::new(100.0, 0.0), &ApproxTextMeasure));
        assert!(!rect.hit_test(Point::new(150.0, 50.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_zero_size_never_hits() {
        let dot = Rectangle::new("z".into(), Point::new(5.0, 5.0), 0.0, 0.0);
        assert!(!dot.hit_test(Point::new(5.0, 5.0), &ApproxTextMeasure));

        let sliver = Rectangle::new("s".into(), Point::new(5.0, 5.0), 0.0, 40.0);
        assert!(!sliver.hit_test(Point::new(5.0, 20.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_hit_test_during_drag_out() {
        // Dragged up and to the left from (100, 100)
        let rect = Rectangle::new("r".into(), Point::new(100.0, 100.0), -40.0, -40.0);
        assert!(rect.hit_test(Point::new(80.0, 80.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_translate() {
        let mut rect = Rectangle::new("r".into(), Point::new(10.0, 20.0), 100.0, 50.0);
        rect.translate(Vec2::new(5.0, -5.0));
        assert_eq!(rect.position, Point::new(15.0, 15.0));
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_bounds() {
        let rect = Rectangle::new("r".into(), Point::new(10.0, 20.0), 100.0, 50.0);
        let bounds = rect.bounds(&ApproxTextMeasure);
        assert!((bounds.x0 - 10.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 20.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 110.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 70.0).abs() < f64::EPSILON);
    }
}
