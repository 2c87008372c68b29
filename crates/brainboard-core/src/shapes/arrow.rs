//! Arrow element.

use super::{ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::{ARROW_HIT_RADIUS, near_any, union_all};
use kurbo::{BezPath, Point, Rect, Vec2};
use std::f64::consts::PI;

/// Minimum arrowhead length.
const MIN_HEAD_LENGTH: f64 = 25.0;

/// Arrowhead length per unit of stroke width.
const HEAD_LENGTH_PER_WIDTH: f64 = 5.0;

/// Half the opening angle of the arrowhead.
const HEAD_HALF_ANGLE: f64 = PI / 6.0;

/// Fraction of the head length the shaft stops short of the tip.
const SHAFT_INSET: f64 = 0.3;

/// An arrow drawn from the first to the last captured point.
///
/// Intermediate points are kept so the element can be picked along the
/// gesture, but only the endpoints shape the shaft and head.
#[derive(Debug, Clone, PartialEq)]
pub struct Arrow {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Captured points, in gesture order.
    pub points: Vec<Point>,
    pub style: ElementStyle,
}

/// Resolved arrowhead geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArrowHead {
    pub tip: Point,
    pub left: Point,
    pub right: Point,
    /// Where the shaft stops so the head does not overdraw it.
    pub shaft_end: Point,
}

impl ArrowHead {
    /// Compute the head for an arrow from `start` to `tip` drawn at `stroke_width`.
    pub fn compute(start: Point, tip: Point, stroke_width: f64) -> Self {
        let length = MIN_HEAD_LENGTH.max(stroke_width * HEAD_LENGTH_PER_WIDTH);
        let angle = (tip.y - start.y).atan2(tip.x - start.x);
        let back = |theta: f64| tip - Vec2::new(theta.cos(), theta.sin()) * length;
        Self {
            tip,
            left: back(angle - HEAD_HALF_ANGLE),
            right: back(angle + HEAD_HALF_ANGLE),
            shaft_end: tip - Vec2::new(angle.cos(), angle.sin()) * (length * SHAFT_INSET),
        }
    }

    /// Length of the head along its sides.
    pub fn length(&self) -> f64 {
        self.tip.distance(self.left)
    }

    /// Filled triangle of the head.
    pub fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(self.tip);
        path.line_to(self.left);
        path.line_to(self.right);
        path.close_path();
        path
    }
}

impl Arrow {
    pub fn new(id: ElementId, start: Point) -> Self {
        Self::from_points(id, vec![start])
    }

    pub fn from_points(id: ElementId, points: Vec<Point>) -> Self {
        Self {
            id,
            owner: 0,
            points,
            style: ElementStyle::default(),
        }
    }

    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }

    /// The head, once the arrow has two distinct samples.
    pub fn head(&self) -> Option<ArrowHead> {
        if self.points.len() < 2 {
            return None;
        }
        let (start, end) = (self.start()?, self.end()?);
        Some(ArrowHead::compute(start, end, self.style.stroke_width))
    }
}

impl ElementShape for Arrow {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        let points = self.points.iter().map(|p| Rect::from_points(*p, *p));
        let head = self
            .head()
            .map(|h| Rect::from_points(h.left, h.right).union_pt(h.tip));
        union_all(points.chain(head)).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        near_any(point, &self.points, ARROW_HIT_RADIUS)
    }

    /// The shaft only; the head is filled separately.
    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        if let (Some(start), Some(head)) = (self.start(), self.head()) {
            path.move_to(start);
            path.line_to(head.shaft_end);
        }
        path
    }

    fn anchor(&self) -> Point {
        self.start().unwrap_or(Point::ZERO)
    }

    fn translate(&mut self, delta: Vec2) {
        for p in &mut self.points {
            *p += delta;
        }
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
    fn test_head_geometry() {
        let head = ArrowHead::compute(Point::ZERO, Point::new(100.0, 0.0), 2.0);
        assert!((head.length() - 25.0).abs() < 1e-9);
        assert!((head.shaft_end.x - 92.5).abs() < 1e-9);
        assert!(head.shaft_end.y.abs() < 1e-9);
        // Both barbs sit behind the tip, mirrored across the shaft
        assert!(head.left.x < 100.0 && head.right.x < 100.0);
        assert!((head.left.y + head.right.y).abs() < 1e-9);
    }

    #[test]
    fn test_head_grows_with_stroke_width() {
        let head = ArrowHead::compute(Point::ZERO, Point::new(0.0, 100.0), 10.0);
        assert!((head.length() - 50.0).abs() < 1e-9);
        assert!((head.shaft_end.y - 85.0).abs() < 1e-9);
    }

    #[test]
    fn test_single_point_has_no_head() {
        let arrow = Arrow::new("a".into(), Point::new(1.0, 1.0));
        assert!(arrow.head().is_none());
        assert!(arrow.to_path().elements().is_empty());
    }

    #[test]
    fn test_hit_test_on_vertices() {
        let arrow = Arrow::from_points(
            "a".into(),
            vec![Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(100.0, 0.0)],
        );
        assert!(arrow.hit_test(Point::new(52.0, 3.0), &ApproxTextMeasure));
        assert!(!arrow.hit_test(Point::new(25.0, 0.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_translate_moves_every_point() {
        let mut arrow = Arrow::from_points("a".into(), vec![Point::ZERO, Point::new(10.0, 10.0)]);
        arrow.translate(Vec2::new(5.0, 0.0));
        assert_eq!(arrow.points, vec![Point::new(5.0, 0.0), Point::new(15.0, 10.0)]);
    }
}
