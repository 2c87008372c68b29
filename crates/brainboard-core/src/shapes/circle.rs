//! Circle element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use kurbo::{BezPath, Circle as KurboCircle, Point, Rect, Shape as KurboShape, Vec2};

/// A circle stored by its bounding box. The radius is always `width / 2`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    pub(crate) id: ElementId,
    pub owner: UserId,
    /// Top-left corner of the bounding box.
    pub position: Point,
    pub width: f64,
    pub height: f64,
    pub style: ElementStyle,
}

impl Circle {
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

    pub fn radius(&self) -> f64 {
        self.width.abs() / 2.0
    }

    pub fn center(&self) -> Point {
        let r = self.radius();
        let rect = self.geometry().to_rect();
        Point::new(rect.x0 + r, rect.y0 + r)
    }

    pub fn geometry(&self) -> BoxGeometry {
        BoxGeometry::new(self.position.x, self.position.y, self.width, self.height)
    }

    pub fn set_geometry(&mut self, geometry: BoxGeometry) {
        self.position = Point::new(geometry.x, geometry.y);
        self.width = geometry.width;
        self.height = geometry.height;
    }

    /// Get as a kurbo Circle.
    pub fn as_kurbo(&self) -> KurboCircle {
        KurboCircle::new(self.center(), self.radius())
    }
}

impl ElementShape for Circle {
    fn id(&self) -> &ElementId {
        &self.id
    }

    fn owner(&self) -> UserId {
        self.owner
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        let r = self.radius();
        Rect::from_center_size(self.center(), (r * 2.0, r * 2.0))
    }

    fn hit_test(&self, point: Point, _measure: &dyn TextMeasure) -> bool {
        let r = self.radius();
        if r < f64::EPSILON {
            return false;
        }
        point.distance(self.center()) <= r
    }

    fn to_path(&self) -> BezPath {
        self.as_kurbo().to_path(0.1)
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
