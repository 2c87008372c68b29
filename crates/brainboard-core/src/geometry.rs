//! Hit-testing primitives shared by selection, handles and the eraser.
//!
//! Everything here is a pure function of its arguments. Degenerate input
//! (zero-length segments, zero-area triangles) answers "no hit" instead of
//! dividing by zero.

use kurbo::{Point, Rect};

/// Pick radius around freehand path points.
pub const FREEHAND_HIT_RADIUS: f64 = 20.0;

/// Pick radius around a sticker's anchor.
pub const STICKER_HIT_RADIUS: f64 = 20.0;

/// Pick radius around arrow vertices.
pub const ARROW_HIT_RADIUS: f64 = 10.0;

/// Maximum distance from a straight line that still counts as a hit.
pub const LINE_HIT_DISTANCE: f64 = 5.0;

/// Slack allowed when comparing sub-triangle areas with the full area.
pub const TRIANGLE_AREA_TOLERANCE: f64 = 0.1;

/// True if any of `points` lies strictly closer than `radius` to `point`.
pub fn near_any(point: Point, points: &[Point], radius: f64) -> bool {
    points.iter().any(|p| p.distance(point) < radius)
}

/// Distance from a point to the segment a→b, or `None` if the segment has no length.
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> Option<f64> {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return None;
    }
    let t = ((point - a).dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + seg * t;
    Some(point.distance(proj))
}

/// Inclusive point-in-rectangle test. The rectangle may have negative extents.
/// A rectangle with no width or no height contains nothing.
pub fn point_in_rect(point: Point, rect: Rect) -> bool {
    let rect = rect.abs();
    if rect.width() < f64::EPSILON || rect.height() < f64::EPSILON {
        return false;
    }
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Unsigned area of the triangle abc.
pub fn triangle_area(a: Point, b: Point, c: Point) -> f64 {
    ((a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y)) / 2.0).abs()
}

/// Point-in-triangle by area decomposition.
pub fn point_in_triangle(point: Point, [a, b, c]: [Point; 3]) -> bool {
    let total = triangle_area(a, b, c);
    if total < f64::EPSILON {
        return false;
    }
    let sum = triangle_area(point, b, c) + triangle_area(a, point, c) + triangle_area(a, b, point);
    (total - sum).abs() < TRIANGLE_AREA_TOLERANCE
}

/// Corners and edge midpoints of a rectangle.
pub fn box_sample_points(rect: Rect) -> [Point; 8] {
    let rect = rect.abs();
    let cx = (rect.x0 + rect.x1) / 2.0;
    let cy = (rect.y0 + rect.y1) / 2.0;
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
        Point::new(cx, rect.y0),
        Point::new(cx, rect.y1),
        Point::new(rect.x0, cy),
        Point::new(rect.x1, cy),
    ]
}

/// True if `point` is within `radius` of any of the rectangle's four edges.
pub fn near_rect_edge(point: Point, rect: Rect, radius: f64) -> bool {
    let rect = rect.abs();
    let within_x = point.x >= rect.x0 && point.x <= rect.x1;
    let within_y = point.y >= rect.y0 && point.y <= rect.y1;
    let near_vertical = (point.x - rect.x0).abs() < radius || (point.x - rect.x1).abs() < radius;
    let near_horizontal = (point.y - rect.y0).abs() < radius || (point.y - rect.y1).abs() < radius;
    (near_vertical && within_y) || (near_horizontal && within_x)
}

/// Union of rectangles, or `None` for an empty iterator.
pub fn union_all(rects: impl IntoIterator<Item = Rect>) -> Option<Rect> {
    rects.into_iter().reduce(|acc, r| acc.union(r))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_distance() {
        let d = point_to_segment_dist(Point::new(5.0, 3.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d.unwrap() - 3.0).abs() < f64::EPSILON);

        // Past the end clamps to the endpoint
        let d = point_to_segment_dist(Point::new(13.0, 4.0), Point::ZERO, Point::new(10.0, 0.0));
        assert!((d.unwrap() - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_degenerate_segment_has_no_distance() {
        let p = Point::new(1.0, 1.0);
        assert!(point_to_segment_dist(p, p, p).is_none());
    }

    #[test]
    fn test_point_in_rect_accepts_negative_extent() {
        let rect = Rect::new(50.0, 50.0, 10.0, 10.0);
        assert!(point_in_rect(Point::new(30.0, 30.0), rect));
        assert!(point_in_rect(Point::new(10.0, 50.0), rect));
        assert!(!point_in_rect(Point::new(51.0, 30.0), rect));
    }

    #[test]
    fn test_degenerate_rect_contains_nothing() {
        let p = Point::new(5.0, 5.0);
        assert!(!point_in_rect(p, Rect::new(5.0, 5.0, 5.0, 5.0)));
        assert!(!point_in_rect(p, Rect::new(5.0, 0.0, 5.0, 10.0)));
        assert!(!point_in_rect(p, Rect::new(0.0, 5.0, 10.0, 5.0)));
    }

    #[test]
    fn test_point_in_triangle() {
        let tri = [Point::new(50.0, 0.0), Point::new(100.0, 100.0), Point::new(0.0, 100.0)];
        assert!(point_in_triangle(Point::new(50.0, 50.0), tri));
        assert!(point_in_triangle(Point::new(50.0, 99.0), tri));
        assert!(!point_in_triangle(Point::new(5.0, 5.0), tri));
        assert!(!point_in_triangle(Point::new(50.0, 101.0), tri));
    }

    #[test]
    fn test_flat_triangle_never_hits() {
        let tri = [Point::ZERO, Point::new(10.0, 0.0), Point::new(20.0, 0.0)];
        assert!(!point_in_triangle(Point::new(5.0, 0.0), tri));
    }

    #[test]
    fn test_near_rect_edge() {
        let rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        assert!(near_rect_edge(Point::new(-5.0, 50.0), rect, 10.0));
        assert!(near_rect_edge(Point::new(50.0, 95.0), rect, 10.0));
        assert!(!near_rect_edge(Point::new(50.0, 50.0), rect, 10.0));
        // Beside the edge's extension, not the edge itself
        assert!(!near_rect_edge(Point::new(-5.0, 150.0), rect, 10.0));
        // Diagonally off a corner: within radius of both edge lines but
        // farther than radius from the corner itself
        assert!(!near_rect_edge(Point::new(-8.0, -8.0), rect, 10.0));
        assert!(!near_rect_edge(Point::new(108.0, 108.0), rect, 10.0));
    }

    #[test]
    fn test_box_samples_cover_corners_and_midpoints() {
        let samples = box_sample_points(Rect::new(0.0, 0.0, 20.0, 10.0));
        assert!(samples.contains(&Point::new(20.0, 10.0)));
        assert!(samples.contains(&Point::new(10.0, 0.0)));
        assert!(samples.contains(&Point::new(0.0, 5.0)));
    }

    #[test]
    fn test_union_all() {
        assert!(union_all(Vec::<Rect>::new()).is_none());
        let u = union_all([Rect::new(0.0, 0.0, 1.0, 1.0), Rect::new(5.0, 5.0, 6.0, 8.0)]).unwrap();
        assert_eq!(u, Rect::new(0.0, 0.0, 6.0, 8.0));
    }
}
