//! Freehand pen stroke.

use super::{ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::{FREEHAND_HIT_RADIUS, near_any, union_all};
use kurbo::{BezPath, Point, Rect, Vec2};

/// A freehand stroke (series of points rendered as quadratic segments).
#[derive(Debug, Clone, PartialEq)]
pub struct Freehand {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Points in the freehand path.
    pub points: Vec<Point>,
    pub style: ElementStyle,
}

impl Freehand {
    /// Create a stroke starting at `start`.
    pub fn new(id: ElementId, start: Point) -> Self {
        Self::from_points(id, vec![start])
    }

    /// Create from existing points.
    pub fn from_points(id: ElementId, points: Vec<Point>) -> Self {
        Self {
            id,
            owner: 0,
            points,
            style: ElementStyle::default(),
        }
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the path is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl ElementShape for Freehand {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        union_all(self.points.iter().map(|p| Rect::from_points(*p, *p))).unwrap_or(Rect::ZERO)
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        near_any(point, &self.points, FREEHAND_HIT_RADIUS)
    }

    /// Quadratic segments through the midpoints of consecutive samples.
    fn to_path(&self) -> BezPath {
        let mut path = BezPath::new();
        let points = &self.points;
        match points.len() {
            0 => {}
            1 => path.move_to(points[0]),
            2 => {
                path.move_to(points[0]);
                path.line_to(points[1]);
            }
            n => {
                path.move_to(points[0]);
                for i in 1..n - 2 {
                    path.quad_to(points[i], points[i].midpoint(points[i + 1]));
                }
                path.quad_to(points[n - 2], points[n - 1]);
            }
        }
        path
    }

    fn anchor(&self) -> Point {
        self.points.first().copied().unwrap_or(Point::ZERO)
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
    use kurbo::PathEl;

    #[test]
    fn test_freehand_creation() {
        let fh = Freehand::new("f".into(), Point::new(3.0, 4.0));
        assert_eq!(fh.len(), 1);
        assert!(!fh.is_empty());
    }

    #[test]
    fn test_bounds() {
        let fh = Freehand::from_points(
            "f".into(),
            vec![Point::new(0.0, 0.0), Point::new(100.0, 50.0), Point::new(50.0, 100.0)],
        );
        let bounds = fh.bounds(&ApproxTextMeasure);
        assert!((bounds.x0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.y0 - 0.0).abs() < f64::EPSILON);
        assert!((bounds.x1 - 100.0).abs() < f64::EPSILON);
        assert!((bounds.y1 - 100.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_hit_test_radius() {
        let fh = Freehand::from_points("f".into(), vec![Point::new(0.0, 0.0), Point::new(100.0, 0.0)]);
        assert!(fh.hit_test(Point::new(0.0, 19.0), &ApproxTextMeasure));
        assert!(!fh.hit_test(Point::new(0.0, 21.0), &ApproxTextMeasure));
        // Only samples count, not the segment between them
        assert!(!fh.hit_test(Point::new(50.0, 0.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_path_uses_quadratic_segments() {
        let fh = Freehand::from_points(
            "f".into(),
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(20.0, 10.0), Point::new(30.0, 0.0)],
        );
        let els = fh.to_path().elements().to_vec();
        assert_eq!(els.len(), 3);
        assert_eq!(els[1], PathEl::QuadTo(Point::new(10.0, 0.0), Point::new(15.0, 5.0)));
        assert_eq!(els[2], PathEl::QuadTo(Point::new(20.0, 10.0), Point::new(30.0, 0.0)));
    }

    #[test]
    fn test_translate_preserves_shape() {
        let mut fh = Freehand::from_points("f".into(), vec![Point::new(0.0, 0.0), Point::new(10.0, 5.0)]);
        fh.translate(Vec2::new(-2.0, 3.0));
        assert_eq!(fh.points, vec![Point::new(-2.0, 3.0), Point::new(8.0, 8.0)]);
    }
}
