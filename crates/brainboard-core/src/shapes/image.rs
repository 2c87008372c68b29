//! Image element.

use super::{BoxGeometry, ElementId, ElementShape, ElementStyle, TextMeasure, UserId};
use crate::geometry::point_in_rect;
use kurbo::{BezPath, Point, Rect, Shape as KurboShape, Vec2};

/// Default size of a newly placed image.
pub const DEFAULT_IMAGE_SIZE: f64 = 200.0;

/// A placed image. Loading and decoding the source is left to the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub(crate) id: ElementId,
    pub owner: UserId,
    pub position: Point,
    pub width: f64,
    pub height: f64,
    /// Source location (URL or data URL).
    pub url: String,
    pub style: ElementStyle,
}

impl Image {
    pub fn new(id: ElementId, position: Point, url: impl Into<String>) -> Self {
        Self {
            id,
            owner: 0,
            position,
            width: DEFAULT_IMAGE_SIZE,
            height: DEFAULT_IMAGE_SIZE,
            url: url.into(),
            style: ElementStyle::default(),
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
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
}

impl ElementShape for Image {
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
