//! Grid snapping and grid line layout.

use kurbo::{Line, Point, Rect};

/// Grid size for snapping (matches the visual grid).
pub const GRID_SIZE: f64 = 20.0;

/// Round a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> Point {
    if grid_size <= 0.0 {
        return point;
    }
    Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    )
}

/// Vertical then horizontal grid lines covering `area`, starting at the
/// first grid multiple inside it.
pub fn grid_lines(area: Rect, grid_size: f64) -> Vec<Line> {
    if grid_size <= 0.0 {
        return Vec::new();
    }
    let area = area.abs();
    let mut lines = Vec::new();

    let mut x = (area.x0 / grid_size).ceil() * grid_size;
    while x <= area.x1 {
        lines.push(Line::new((x, area.y0), (x, area.y1)));
        x += grid_size;
    }

    let mut y = (area.y0 / grid_size).ceil() * grid_size;
    while y <= area.y1 {
        lines.push(Line::new((area.x0, y), (area.x1, y)));
        y += grid_size;
    }
    lines
}
