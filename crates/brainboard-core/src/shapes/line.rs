//! Straight line element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::{LINE_HIT_DISTANCE, point_to_segment_dist};
use kurbo::{BezPath, Point, Rect, Vec2};

/// A straight line from `position` to `position + (width, height)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Start point.
    pub position: Point,
    /// End point offset along x. May be negative.
    pub width: f64,
    /// End point offset along y. May be negative.
    pub height: f64,
    pub style: ElementStyle,
}

impl Line {
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

    /// Create a line between two points.
    pub fn from_points(id: ElementId, start: Point, end: Point) -> Self {
        let d = end - start;
        Self::new(id, start, d.x, d.y)
    }

    pub fn start(&self) -> Point {
        self.position
    }

    pub fn end(&self) -> Point {
        self.position + Vec2::new(self.width, self.height)
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

impl ElementShape for Line {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::from_points(self.start(), self.end())
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_to_segment_dist(point, self.start(), self.end())
            .is_some_and(|d| d < LINE_HIT_DISTANCE)
    }

    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.start());
        path.line_to(self.end());
        path
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
    fn test_line_from_points() {
        let line = Line::from_points("l".into(), Point::new(10.0, 10.0), Point::new(0.0, 30.0));
        assert!((line.width + 10.0).abs() < f64::EPSILON);
        assert!((line.height - 20.0).abs() < f64::EPSILON);
        assert_eq!(line.end(), Point::new(0.0, 30.0));
    }

    #[test]
    fn test_hit_test() {
        let line = Line::new("l".into(), Point::new(0.0, 0.0), 100.0, 0.0);
        assert!(line.hit_test(Point::new(50.0, 4.0), &ApproxTextMeasure));
        assert!(!line.hit_test(Point::new(50.0, 6.0), &ApproxTextMeasure));
        assert!(!line.hit_test(Point::new(120.0, 0.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_zero_length_line_never_hits() {
        let line = Line::new("l".into(), Point::new(5.0, 5.0), 0.0, 0.0);
        assert!(!line.hit_test(Point::new(5.0, 5.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_bounds_of_backward_line() {
        let line = Line::new("l".into(), Point::new(50.0, 50.0), -20.0, -10.0);
        assert_eq!(line.bounds(&ApproxTextMeasure), Rect::new(30.0, 40.0, 50.0, 50.0));
    }
}
