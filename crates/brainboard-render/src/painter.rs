//! Painting the live view and exported images.

use crate::renderer::{RenderContext, Surface};
use brainboard_core::canvas::Canvas;
use brainboard_core::selection::{HANDLE_SIZE, SELECTION_OUTSET, get_handles};
use brainboard_core::shapes::{
    DEFAULT_FONT_SIZE, Element, NOTE_FONT_SIZE, Note, STICKER_FONT_SIZE,
};
use brainboard_core::snap::grid_lines;
use brainboard_core::tools::ToolKind;
use kurbo::{Affine, BezPath, Cap, Join, Point, Rect, Shape, Stroke};
use peniko::Color;

const NOTE_TEXT_COLOR: Color = Color::BLACK;

fn image_placeholder() -> Color {
    Color::from_rgba8(229, 231, 235, 255)
}

/// Paint the current frame: background, grid, layers back to front, the
/// element being drawn, and the selection.
///
/// Locked layers are only shown while the select tool is active.
pub fn paint<S: Surface>(surface: &mut S, ctx: &RenderContext) {
    let canvas = ctx.canvas;
    let viewport = ctx.viewport_rect();
    surface.fill_rect(Affine::IDENTITY, viewport, ctx.background_color);

    if canvas.settings().show_grid {
        render_grid(surface, viewport, canvas.config().grid_size, ctx.grid_color);
    }

    let show_locked = canvas.tool() == ToolKind::Select;
    for layer in canvas.scene().visible_layers() {
        if layer.locked && !show_locked {
            continue;
        }
        for element in &layer.elements {
            if ctx.editing_element_id.as_ref() == Some(element.id()) {
                continue;
            }
            render_element(surface, element, Affine::IDENTITY);
        }
    }

    if let Some(preview) = canvas.preview() {
        render_element(surface, preview, Affine::IDENTITY);
    }

    if let Some(selected) = canvas.selected_element() {
        render_selection(surface, selected, ctx.selection_color);
    }
}

/// Paint every visible element into a content-sized image on a white
/// background. Returns the scene-space frame that was painted, or `None` for
/// an empty board.
pub fn export<S: Surface>(surface: &mut S, canvas: &Canvas) -> Option<Rect> {
    let frame = canvas.export_frame()?;
    let transform = Affine::translate(-frame.origin().to_vec2());

    surface.fill_rect(Affine::IDENTITY, frame.with_origin(Point::ZERO), Color::WHITE);
    for layer in canvas.scene().visible_layers() {
        for element in &layer.elements {
            render_element(surface, element, transform);
        }
    }
    log::debug!("Exported {}x{} frame", frame.width(), frame.height());
    Some(frame)
}

/// Draw a single element.
pub fn render_element<S: Surface>(surface: &mut S, element: &Element, transform: Affine) {
    let style = element.style();
    let color = style.stroke();
    let stroke = Stroke::new(style.stroke_width)
        .with_caps(Cap::Round)
        .with_join(Join::Round);

    match element {
        Element::Freehand(_)
        | Element::Rectangle(_)
        | Element::Circle(_)
        | Element::Triangle(_)
        | Element::Line(_) => {
            surface.stroke_path(transform, &element.to_path(), &stroke, color);
        }
        Element::Arrow(arrow) => {
            let Some(head) = arrow.head() else {
                return;
            };
            surface.stroke_path(transform, &element.to_path(), &stroke, color);
            surface.fill_path(transform, &head.to_path(), color);
        }
        Element::Text(text) => {
            let font_size = if text.font_size > 0.0 { text.font_size } else { DEFAULT_FONT_SIZE };
            surface.fill_text(transform, &text.text, text.position, font_size, color);
        }
        Element::Sticker(sticker) => {
            surface.fill_text(transform, &sticker.glyph, sticker.position, STICKER_FONT_SIZE, color);
        }
        Element::Image(image) => {
            let rect = image.as_rect().abs();
            if let Err(e) = surface.draw_image(transform, &image.url, rect) {
                log::debug!("Drawing placeholder for image {}: {}", image.url, e);
                surface.fill_rect(transform, rect, image_placeholder());
            }
        }
        Element::Note(note) => render_note(surface, note, transform),
    }
}

fn render_note<S: Surface>(surface: &mut S, note: &Note, transform: Affine) {
    surface.fill_rect(transform, note.as_rect().abs(), note.style.stroke());
    let lines = note.wrapped_lines(&*surface);
    for (line, origin) in lines.iter().zip(note.line_origins(lines.len())) {
        surface.fill_text(transform, line, origin, NOTE_FONT_SIZE, NOTE_TEXT_COLOR);
    }
}

/// Outline the selected element and mark its handles.
///
/// Lines and arrows get endpoint markers only. Kinds without resize handles
/// still get corner markers so the selection is visible.
pub fn render_selection<S: Surface>(surface: &mut S, element: &Element, color: Color) {
    let markers: Vec<Point> = match element {
        Element::Arrow(arrow) => arrow.start().into_iter().chain(arrow.end()).collect(),
        _ => {
            let bounds = element.bounds(&*surface).abs();
            let outline = bounds.inflate(SELECTION_OUTSET, SELECTION_OUTSET);
            if !matches!(element, Element::Line(_)) {
                surface.stroke_path(Affine::IDENTITY, &outline.to_path(0.1), &Stroke::new(1.0), color);
            }
            let handles = get_handles(element);
            if handles.is_empty() {
                vec![
                    Point::new(bounds.x0, bounds.y0),
                    Point::new(bounds.x1, bounds.y0),
                    Point::new(bounds.x0, bounds.y1),
                    Point::new(bounds.x1, bounds.y1),
                ]
            } else {
                handles.iter().map(|h| h.position).collect()
            }
        }
    };

    for center in markers {
        let rect = Rect::from_center_size(center, (HANDLE_SIZE, HANDLE_SIZE));
        surface.fill_rect(Affine::IDENTITY, rect, color);
    }
}

fn render_grid<S: Surface>(surface: &mut S, viewport: Rect, grid_size: f64, color: Color) {
    let stroke = Stroke::new(1.0);
    for line in grid_lines(viewport, grid_size) {
        let mut path = BezPath::new();
        path.move_to(line.p0);
        path.line_to(line.p1);
        surface.stroke_path(Affine::IDENTITY, &path, &stroke, color);
    }
}
