//! Selection handles and move/resize manipulation.

use crate::shapes::{BoxGeometry, Element, ElementId};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// Drawn handle size in scene pixels.
pub const HANDLE_SIZE: f64 = 8.0;

/// Gap between an element's bounds and its selection outline.
pub const SELECTION_OUTSET: f64 = 2.0;

/// Type of selection handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandleKind {
    /// Corner of a box-like element.
    Corner(Corner),
    /// Line endpoint (0 = start, 1 = end).
    Endpoint(usize),
    /// Triangle vertex.
    Vertex(TriangleVertex),
}

/// Corner positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl Corner {
    /// Whether dragging this corner moves the left edge.
    pub fn is_left(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::BottomLeft)
    }

    /// Whether dragging this corner moves the top edge.
    pub fn is_top(self) -> bool {
        matches!(self, Corner::TopLeft | Corner::TopRight)
    }
}

/// Triangle vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriangleVertex {
    Apex,
    BottomLeft,
    BottomRight,
}

/// A selection handle with its position and type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Handle {
    /// Position in scene coordinates.
    pub position: Point,
    /// Handle type.
    pub kind: HandleKind,
}

impl Handle {
    /// Create a new handle.
    pub fn new(position: Point, kind: HandleKind) -> Self {
        Self { position, kind }
    }

    /// Square hit test, `tolerance` pixels either side of the center.
    pub fn hit_test(&self, point: Point, tolerance: f64) -> bool {
        (point.x - self.position.x).abs() <= tolerance
            && (point.y - self.position.y).abs() <= tolerance
    }

    /// The square drawn for this handle.
    pub fn rect(&self) -> Rect {
        Rect::from_center_size(self.position, (HANDLE_SIZE, HANDLE_SIZE))
    }
}

/// Get the resize handles of an element, in hit-test priority order.
///
/// Path-like kinds, text and stickers have none: they can only be moved.
pub fn get_handles(element: &Element) -> Vec<Handle> {
    match element {
        Element::Rectangle(_) | Element::Circle(_) | Element::Image(_) | Element::Note(_) => {
            let Some(g) = element.box_geometry() else {
                return Vec::new();
            };
            let (left, top) = (g.x, g.y);
            let (right, bottom) = (g.x + g.width, g.y + g.height);
            vec![
                Handle::new(Point::new(right, bottom), HandleKind::Corner(Corner::BottomRight)),
                Handle::new(Point::new(left, top), HandleKind::Corner(Corner::TopLeft)),
                Handle::new(Point::new(right, top), HandleKind::Corner(Corner::TopRight)),
                Handle::new(Point::new(left, bottom), HandleKind::Corner(Corner::BottomLeft)),
            ]
        }
        Element::Line(line) => vec![
            Handle::new(line.end(), HandleKind::Endpoint(1)),
            Handle::new(line.start(), HandleKind::Endpoint(0)),
        ],
        Element::Triangle(tri) => vec![
            Handle::new(tri.bottom_right(), HandleKind::Vertex(TriangleVertex::BottomRight)),
            Handle::new(tri.apex(), HandleKind::Vertex(TriangleVertex::Apex)),
            Handle::new(tri.bottom_left(), HandleKind::Vertex(TriangleVertex::BottomLeft)),
        ],
        Element::Freehand(_)
        | Element::Arrow(_)
        | Element::Text(_)
        | Element::Sticker(_) => Vec::new(),
    }
}

/// Find the first handle of `element` under `point`.
pub fn hit_test_handles(element: &Element, point: Point, tolerance: f64) -> Option<HandleKind> {
    get_handles(element)
        .into_iter()
        .find(|h| h.hit_test(point, tolerance))
        .map(|h| h.kind)
}

/// State of an in-progress move or resize of one element.
#[derive(Debug, Clone)]
pub struct ManipulationState {
    /// The element being manipulated.
    pub element_id: ElementId,
    /// The handle being dragged (None = moving the whole element).
    pub handle: Option<HandleKind>,
    /// Pointer position when the gesture started.
    pub start_point: Point,
    /// Latest pointer position.
    pub current_point: Point,
    /// The element as it was when grabbed.
    pub original: Element,
}

impl ManipulationState {
    pub fn new(handle: Option<HandleKind>, start_point: Point, original: Element) -> Self {
        Self {
            element_id: original.id().clone(),
            handle,
            start_point,
            current_point: start_point,
            original,
        }
    }

    /// Pointer travel since the grab.
    pub fn delta(&self) -> Vec2 {
        self.current_point - self.start_point
    }

    /// Offset from the element's anchor to the grab point.
    pub fn grab_offset(&self) -> Vec2 {
        self.start_point - self.original.anchor()
    }

    pub fn is_resize(&self) -> bool {
        self.handle.is_some()
    }

    /// The manipulated element for the current pointer position.
    pub fn apply(&self, min_size: f64) -> Element {
        apply_manipulation(&self.original, self.handle, self.delta(), min_size)
    }
}

/// Produce a moved or resized copy of `element`.
///
/// `delta` is the pointer travel since the grab, applied to the element as it
/// was grabbed. Box kinds keep at least `min_size` on each axis and pin the
/// corner opposite the dragged one. Circles scale uniformly. Lines and
/// triangles move the dragged point freely.
pub fn apply_manipulation(
    element: &Element,
    handle: Option<HandleKind>,
    delta: Vec2,
    min_size: f64,
) -> Element {
    let mut element = element.clone();
    let Some(handle) = handle else {
        element.translate(delta);
        return element;
    };
    let Some(g) = element.box_geometry() else {
        return element;
    };

    let resized = match (&element, handle) {
        (Element::Circle(_), HandleKind::Corner(corner)) => resize_uniform(g, corner, delta, min_size),
        (
            Element::Rectangle(_) | Element::Image(_) | Element::Note(_),
            HandleKind::Corner(corner),
        ) => resize_box(g, corner, delta, min_size),
        (Element::Line(_), HandleKind::Endpoint(1)) => {
            BoxGeometry::new(g.x, g.y, g.width + delta.x, g.height + delta.y)
        }
        (Element::Line(_), HandleKind::Endpoint(0)) => BoxGeometry::new(
            g.x + delta.x,
            g.y + delta.y,
            g.width - delta.x,
            g.height - delta.y,
        ),
        (Element::Triangle(_), HandleKind::Vertex(vertex)) => match vertex {
            TriangleVertex::BottomRight => {
                BoxGeometry::new(g.x, g.y, g.width + delta.x, g.height + delta.y)
            }
            TriangleVertex::BottomLeft => {
                BoxGeometry::new(g.x + delta.x, g.y, g.width - delta.x, g.height + delta.y)
            }
            TriangleVertex::Apex => {
                BoxGeometry::new(g.x, g.y + delta.y, g.width + delta.x, g.height - delta.y)
            }
        },
        _ => {
            log::debug!("Handle {:?} does not apply to {}", handle, element.kind());
            return element;
        }
    };
    element.set_box_geometry(resized);
    element
}

fn resize_box(g: BoxGeometry, corner: Corner, delta: Vec2, min_size: f64) -> BoxGeometry {
    let width = if corner.is_left() {
        (g.width - delta.x).max(min_size)
    } else {
        (g.width + delta.x).max(min_size)
    };
    let height = if corner.is_top() {
        (g.height - delta.y).max(min_size)
    } else {
        (g.height + delta.y).max(min_size)
    };
    pin_opposite(g, corner, width, height)
}

fn resize_uniform(g: BoxGeometry, corner: Corner, delta: Vec2, min_size: f64) -> BoxGeometry {
    let candidate = resize_box(g, corner, delta, min_size);
    let size = if g.width > 0.0 && g.height > 0.0 {
        let scale = (candidate.width / g.width).max(candidate.height / g.height);
        (g.width.max(g.height) * scale).max(min_size)
    } else {
        candidate.width.max(candidate.height)
    };
    pin_opposite(g, corner, size, size)
}

/// Place a box of the given size so the corner opposite `corner` stays put.
fn pin_opposite(g: BoxGeometry, corner: Corner, width: f64, height: f64) -> BoxGeometry {
    let x = if corner.is_left() { g.x + g.width - width } else { g.x };
    let y = if corner.is_top() { g.y + g.height - height } else { g.y };
    BoxGeometry::new(x, y, width, height)
}
