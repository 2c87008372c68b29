//! Surface abstraction and per-frame render context.

use brainboard_core::canvas::Canvas;
use brainboard_core::shapes::{ElementId, TextMeasure};
use kurbo::{Affine, BezPath, Point, Rect, Shape, Size, Stroke};
use peniko::Color;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RendererError {
    #[error("Image unavailable: {0}")]
    ImageUnavailable(String),
    #[error("Surface error: {0}")]
    Surface(String),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RendererError>;

/// A raster target the painter draws onto.
///
/// Every call carries the transform from scene to surface coordinates.
/// Surfaces also measure text so note wrapping matches what they draw.
pub trait Surface: TextMeasure {
    fn fill_path(&mut self, transform: Affine, path: &BezPath, color: Color);

    fn stroke_path(&mut self, transform: Affine, path: &BezPath, stroke: &Stroke, color: Color);

    /// Draw `text` with its baseline starting at `origin`.
    fn fill_text(&mut self, transform: Affine, text: &str, origin: Point, font_size: f64, color: Color);

    /// Draw the image at `url` stretched over `rect`.
    fn draw_image(&mut self, transform: Affine, url: &str, rect: Rect) -> RenderResult<()>;

    fn fill_rect(&mut self, transform: Affine, rect: Rect, color: Color) {
        self.fill_path(transform, &rect.to_path(0.1), color);
    }
}

/// Context for a single render frame.
pub struct RenderContext<'a> {
    /// The canvas to render.
    pub canvas: &'a Canvas,
    /// Viewport size in scene pixels.
    pub viewport_size: Size,
    /// Background color.
    pub background_color: Color,
    /// Grid line color.
    pub grid_color: Color,
    /// Selection outline and handle color.
    pub selection_color: Color,
    /// Element currently being edited in an overlay (skipped when painting).
    pub editing_element_id: Option<ElementId>,
}

impl<'a> RenderContext<'a> {
    /// Create a new render context covering the canvas viewport.
    pub fn new(canvas: &'a Canvas) -> Self {
        Self {
            canvas,
            viewport_size: canvas.viewport(),
            background_color: Color::WHITE,
            grid_color: Color::from_rgba8(229, 231, 235, 255),
            selection_color: Color::from_rgba8(59, 130, 246, 255), // Blue
            editing_element_id: None,
        }
    }

    pub fn with_viewport(mut self, size: Size) -> Self {
        self.viewport_size = size;
        self
    }

    /// Set the background color.
    pub fn with_background(mut self, color: Color) -> Self {
        self.background_color = color;
        self
    }

    pub fn with_selection_color(mut self, color: Color) -> Self {
        self.selection_color = color;
        self
    }

    /// Set the element being edited (will be skipped by `paint`).
    pub fn with_editing_element(mut self, id: Option<ElementId>) -> Self {
        self.editing_element_id = id;
        self
    }

    pub fn viewport_rect(&self) -> Rect {
        self.viewport_size.to_rect()
    }
}
