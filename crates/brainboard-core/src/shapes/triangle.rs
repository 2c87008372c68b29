//! Triangle element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::point_in_triangle;
use kurbo::{BezPath, Point, Rect, Vec2};

/// An isosceles triangle inscribed in its box: apex at the top-center,
/// base along the bottom edge.
#[derive(Debug, Clone, PartialEq)]
pub struct Triangle {
    pub(crate) id: ElementId,
    pub owner: UserId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ElementStyle,
}

impl Triangle {
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

    pub fn apex(&self) -> Point {
        Point::new(self.position.x + self.width / 2.0, self.position.y)
    }

    pub fn bottom_left(&self) -> Point {
        Point::new(self.position.x, self.position.y + self.height)
    }

    pub fn bottom_right(&self) -> Point {
        Point::new(self.position.x + self.width, self.position.y + self.height)
    }

    /// Vertices in apex, bottom-right, bottom-left order.
    pub fn vertices(&self) -> [Point; 3] {
        [self.apex(), self.bottom_right(), self.bottom_left()]
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

impl ElementShape for Triangle {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.geometry().to_rect()
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        point_in_triangle(point, self.vertices())
    }

    fn to_path(&self) -> BezPath {
        let [apex, right, left] = self.vertices();
        let mut path = BezPath::new();
        path.move_to(apex);
        path.line_to(right);
        path.line_to(left);
        path.close_path();
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
    fn test_vertices() {
        let t = Triangle::new("t".into(), Point::new(0.0, 0.0), 100.0, 80.0);
        assert_eq!(t.apex(), Point::new(50.0, 0.0));
        assert_eq!(t.bottom_right(), Point::new(100.0, 80.0));
        assert_eq!(t.bottom_left(), Point::new(0.0, 80.0));
    }

    #[test]
    fn test_hit_test() {
        let t = Triangle::new("t".into(), Point::new(0.0, 0.0), 100.0, 100.0);
        assert!(t.hit_test(Point::new(50.0, 60.0), &ApproxTextMeasure));
        // Inside the box, outside the triangle
        assert!(!t.hit_test(Point::new(5.0, 5.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_flat_triangle_never_hits() {
        let t = Triangle::new("t".into(), Point::new(0.0, 0.0), 100.0, 0.0);
        assert!(!t.hit_test(Point::new(50.0, 0.0), &ApproxTextMeasure));
    }

    #[test]
    fn test_path_is_closed() {
        let t = Triangle::new("t".into(), Point::new(0.0, 0.0), 10.0, 10.0);
        assert_eq!(t.to_path().elements().len(), 4);
    }
}
