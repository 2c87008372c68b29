//! Point accumulation for path-like tools.

use kurbo::Point;

/// Samples closer than this to the previous point are dropped.
pub const MIN_SAMPLE_DISTANCE: f64 = 2.0;

/// How pointer samples are added to a path while it is being drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrokeCapture {
    /// Freehand: thin out close samples and insert a midpoint before each
    /// accepted sample so quadratic rendering has a control point to use.
    Smoothed,
    /// Arrow: keep every sample. Only the endpoints are drawn.
    Verbatim,
}

impl StrokeCapture {
    /// Add a sample. Returns whether the path changed.
    pub fn push(self, points: &mut Vec<Point>, point: Point) -> bool {
        match self {
            StrokeCapture::Verbatim => {
                points.push(point);
                true
            }
            StrokeCapture::Smoothed => {
                let Some(&last) = points.last() else {
                    points.push(point);
                    return true;
                };
                if last.distance(point) <= MIN_SAMPLE_DISTANCE {
                    return false;
                }
                points.push(last.midpoint(point));
                points.push(point);
                true
            }
        }
    }
}
