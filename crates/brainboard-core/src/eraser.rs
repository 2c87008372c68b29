//! Proximity eraser.
//!
//! The eraser is more generous than selection: box kinds are hit near any
//! edge, not just inside, and path kinds by any vertex within the radius.

use crate::geometry::{
    box_sample_points, near_any, near_rect_edge, point_in_rect, point_in_triangle,
    point_to_segment_dist,
};
use crate::shapes::{Element, ElementId};
use kurbo::Point;

/// Whether the eraser at `point` with `radius` would remove `element`.
pub fn erasable(element: &Element, point: Point, radius: f64) -> bool {
    match element {
        Element::Freehand(f) => near_any(point, &f.points, radius),
        Element::Arrow(a) => near_any(point, &a.points, radius),
        Element::Rectangle(_) | Element::Image(_) | Element::Note(_) => {
            let Some(g) = element.box_geometry() else {
                return false;
            };
            let rect = g.to_rect();
            near_any(point, &box_sample_points(rect), radius)
                || point_in_rect(point, rect)
                || near_rect_edge(point, rect, radius)
        }
        Element::Circle(c) => {
            let d = point.distance(c.center());
            d < radius || (d - c.radius()).abs() < radius
        }
        Element::Triangle(t) => {
            let vertices = t.vertices();
            near_any(point, &vertices, radius)
                || point_in_triangle(point, vertices)
                || (0..3).any(|i| {
                    point_to_segment_dist(point, vertices[i], vertices[(i + 1) % 3])
                        .is_some_and(|d| d < radius)
                })
        }
        Element::Line(l) => match point_to_segment_dist(point, l.start(), l.end()) {
            Some(d) => d < radius,
            None => l.start().distance(point) < radius,
        },
        Element::Text(_) | Element::Sticker(_) => element.anchor().distance(point) < radius,
    }
}

/// Ids of every element the eraser would remove, in layer order.
pub fn erase_targets(elements: &[Element], point: Point, radius: f64) -> Vec<ElementId> {
    elements
        .iter()
        .filter(|e| erasable(e, point, radius))
        .map(|e| e.id().clone())
        .collect()
}

/// Remove every erasable element in one pass. Returns the removed ids.
pub fn erase(elements: &mut Vec<Element>, point: Point, radius: f64) -> Vec<ElementId> {
    let targets = erase_targets(elements, point, radius);
    if !targets.is_empty() {
        elements.retain(|e| !targets.contains(e.id()));
    }
    targets
}
