//! Tool system for the whiteboard.

mod stroke;

pub use stroke::{MIN_SAMPLE_DISTANCE, StrokeCapture};

use crate::shapes::{
    Arrow, BoxGeometry, Circle, Element, ElementId, ElementStyle, Freehand, Line, Rectangle,
    Triangle, UserId,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Rectangle,
    Circle,
    Triangle,
    Line,
    Arrow,
    Text,
    Sticker,
    Image,
    Note,
    Eraser,
}

impl ToolKind {
    /// Tools that create an element by dragging.
    pub fn draws_by_gesture(self) -> bool {
        matches!(
            self,
            ToolKind::Pen
                | ToolKind::Rectangle
                | ToolKind::Circle
                | ToolKind::Triangle
                | ToolKind::Line
                | ToolKind::Arrow
        )
    }

    /// Capture policy for path-like tools.
    pub fn stroke_capture(self) -> Option<StrokeCapture> {
        match self {
            ToolKind::Pen => Some(StrokeCapture::Smoothed),
            ToolKind::Arrow => Some(StrokeCapture::Verbatim),
            _ => None,
        }
    }
}

/// State of a tool interaction.
#[derive(Debug, Clone, Default)]
pub enum ToolState {
    /// Tool is idle, waiting for interaction.
    #[default]
    Idle,
    /// An element is being drawn.
    Active {
        /// Starting point of the interaction.
        start: Point,
        /// Latest pointer position.
        current: Point,
        /// The element as it would be committed right now.
        preview: Element,
    },
}

/// Manages the current tool and the element it is drawing.
#[derive(Debug, Clone, Default)]
pub struct ToolManager {
    /// Currently selected tool.
    pub current_tool: ToolKind,
    /// Current state of the tool.
    pub state: ToolState,
}

impl ToolManager {
    /// Create a new tool manager.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the current tool, abandoning any drawing in progress.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.current_tool = tool;
        self.state = ToolState::Idle;
    }

    /// Begin drawing at `point`. Returns false if the current tool does not draw.
    pub fn begin(&mut self, point: Point, id: ElementId, style: ElementStyle, owner: UserId) -> bool {
        let Some(mut preview) = self.seed_element(point, id) else {
            return false;
        };
        *preview.style_mut() = style;
        preview.set_owner(owner);
        self.state = ToolState::Active {
            start: point,
            current: point,
            preview,
        };
        true
    }

    /// Advance the drawing. Returns whether the preview changed.
    pub fn update(&mut self, point: Point) -> bool {
        let tool = self.current_tool;
        let ToolState::Active {
            start,
            current,
            preview,
        } = &mut self.state
        else {
            return false;
        };
        *current = point;
        let start = *start;

        match preview {
            Element::Freehand(f) => tool
                .stroke_capture()
                .is_some_and(|capture| capture.push(&mut f.points, point)),
            Element::Arrow(a) => tool
                .stroke_capture()
                .is_some_and(|capture| capture.push(&mut a.points, point)),
            Element::Circle(c) => {
                let diameter = start.distance(point) * 2.0;
                c.set_geometry(BoxGeometry::new(start.x, start.y, diameter, diameter));
                true
            }
            other => {
                let d = point - start;
                other.set_box_geometry(BoxGeometry::new(start.x, start.y, d.x, d.y));
                true
            }
        }
    }

    /// End the drawing and return the element to commit, if it has any extent.
    pub fn end(&mut self) -> Option<Element> {
        let ToolState::Active { mut preview, .. } = std::mem::take(&mut self.state) else {
            return None;
        };
        preview.normalize();
        if preview.is_degenerate() {
            log::debug!("Discarding empty {} gesture", preview.kind());
            return None;
        }
        Some(preview)
    }

    /// Cancel the current interaction.
    pub fn cancel(&mut self) {
        self.state = ToolState::Idle;
    }

    /// Check if a tool interaction is active.
    pub fn is_active(&self) -> bool {
        matches!(self.state, ToolState::Active { .. })
    }

    /// Get the element being drawn.
    pub fn preview(&self) -> Option<&Element> {
        match &self.state {
            ToolState::Active { preview, .. } => Some(preview),
            ToolState::Idle => None,
        }
    }

    fn seed_element(&self, point: Point, id: ElementId) -> Option<Element> {
        Some(match self.current_tool {
            ToolKind::Pen => Element::Freehand(Freehand::new(id, point)),
            ToolKind::Arrow => Element::Arrow(Arrow::new(id, point)),
            ToolKind::Rectangle => Element::Rectangle(Rectangle::new(id, point, 0.0, 0.0)),
            ToolKind::Circle => Element::Circle(Circle::new(id, point, 0.0, 0.0)),
            ToolKind::Triangle => Element::Triangle(Triangle::new(id, point, 0.0, 0.0)),
            ToolKind::Line => Element::Line(Line::new(id, point, 0.0, 0.0)),
            ToolKind::Select
            | ToolKind::Text
            | ToolKind::Sticker
            | ToolKind::Image
            | ToolKind::Note
            | ToolKind::Eraser => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn begin(tm: &mut ToolManager, x: f64, y: f64) -> bool {
        tm.begin(Point::new(x, y), "e1".into(), ElementStyle::default(), 1)
    }

    #[test]
    fn test_tool_selection() {
        let mut tm = ToolManager::new();
        assert_eq!(tm.current_tool, ToolKind::Select);

        tm.set_tool(ToolKind::Rectangle);
        assert_eq!(tm.current_tool, ToolKind::Rectangle);
    }

    #[test]
    fn test_rectangle_drag_out() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);

        assert!(!tm.is_active());
        assert!(begin(&mut tm, 10.0, 10.0));
        assert!(tm.is_active());

        tm.update(Point::new(60.0, 40.0));
        let preview = tm.preview().unwrap();
        assert_eq!(preview.box_geometry(), Some(BoxGeometry::new(10.0, 10.0, 50.0, 30.0)));

        let shape = tm.end().unwrap();
        assert_eq!(shape.owner(), 1);
        assert!(!tm.is_active());
    }

    #[test]
    fn test_drag_out_is_normalized_on_end() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Triangle);
        begin(&mut tm, 100.0, 100.0);
        tm.update(Point::new(60.0, 70.0));

        let shape = tm.end().unwrap();
        assert_eq!(shape.box_geometry(), Some(BoxGeometry::new(60.0, 70.0, 40.0, 30.0)));
    }

    #[test]
    fn test_circle_uses_distance_as_radius() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Circle);
        begin(&mut tm, 0.0, 0.0);
        tm.update(Point::new(30.0, 40.0));

        let shape = tm.end().unwrap();
        assert_eq!(shape.box_geometry(), Some(BoxGeometry::new(0.0, 0.0, 100.0, 100.0)));
    }

    #[test]
    fn test_line_keeps_direction() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Line);
        begin(&mut tm, 50.0, 50.0);
        tm.update(Point::new(20.0, 80.0));

        let shape = tm.end().unwrap();
        assert_eq!(shape.box_geometry(), Some(BoxGeometry::new(50.0, 50.0, -30.0, 30.0)));
    }

    #[test]
    fn test_click_without_drag_is_discarded() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);
        begin(&mut tm, 10.0, 10.0);
        assert!(tm.end().is_none());

        tm.set_tool(ToolKind::Pen);
        begin(&mut tm, 10.0, 10.0);
        tm.update(Point::new(11.0, 10.0));
        assert!(tm.end().is_none());
    }

    #[test]
    fn test_pen_capture() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Pen);
        begin(&mut tm, 0.0, 0.0);
        tm.update(Point::new(1.0, 0.0));
        tm.update(Point::new(100.0, 0.0));

        let shape = tm.end().unwrap();
        assert_eq!(
            shape.points().unwrap(),
            &[Point::new(0.0, 0.0), Point::new(50.0, 0.0), Point::new(100.0, 0.0)]
        );
    }

    #[test]
    fn test_arrow_capture() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Arrow);
        begin(&mut tm, 0.0, 0.0);
        tm.update(Point::new(1.0, 0.0));
        tm.update(Point::new(2.0, 0.0));

        let shape = tm.end().unwrap();
        assert_eq!(shape.points().unwrap().len(), 3);
    }

    #[test]
    fn test_cancel_interaction() {
        let mut tm = ToolManager::new();
        tm.set_tool(ToolKind::Rectangle);

        begin(&mut tm, 0.0, 0.0);
        assert!(tm.is_active());

        tm.cancel();
        assert!(!tm.is_active());
        assert!(tm.end().is_none());
    }

    #[test]
    fn test_non_drawing_tools() {
        let mut tm = ToolManager::new();
        for tool in [ToolKind::Select, ToolKind::Eraser, ToolKind::Text, ToolKind::Note] {
            tm.set_tool(tool);
            assert!(!begin(&mut tm, 0.0, 0.0));
            assert!(!tm.update(Point::new(10.0, 10.0)));
            assert!(tm.end().is_none());
        }
    }
}
