use super::{Measurement, Point, Quantity, Segment};
use crate::render::RenderOptions;
use sonoview_core::constants::{ANGLE_LABEL_OFFSET, EPSILON};

/// Angle at `vertex` between the arms to `start` and `end`, in degrees.
///
/// Returns 0 when either arm has zero length.
pub fn angle_degrees(start: Point, vertex: Point, end: Point) -> f64 {
    let (v1x, v1y) = (start.x - vertex.x, start.y - vertex.y);
    let (v2x, v2y) = (end.x - vertex.x, end.y - vertex.y);
    let len1 = (v1x * v1x + v1y * v1y).sqrt();
    let len2 = (v2x * v2x + v2y * v2y).sqrt();
    if len1 < EPSILON || len2 < EPSILON {
        return 0.0;
    }
    let cos = ((v1x * v2x + v1y * v2y) / (len1 * len2)).clamp(-1.0, 1.0);
    cos.acos().to_degrees()
}

pub(super) fn measure(points: &[Point]) -> Vec<Measurement> {
    let degrees = match points {
        [start, vertex, end, ..] => angle_degrees(*start, *vertex, *end),
        _ => 0.0,
    };
    vec![Measurement::new("Angle", Quantity::Angle(degrees))]
}

/// The two arms meeting at the vertex; one arm while the third point is pending.
pub(super) fn outline(points: &[Point], _: &RenderOptions, _: bool) -> Vec<Segment> {
    points
        .windows(2)
        .take(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect()
}

pub(super) fn label_anchor(points: &[Point], _: &RenderOptions) -> Point {
    match points {
        [_, vertex, ..] => vertex.offset(ANGLE_LABEL_OFFSET, -ANGLE_LABEL_OFFSET),
        _ => Point::default(),
    }
}
