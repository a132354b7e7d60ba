use super::{Measurement, Point, Quantity, Rect, Segment};
use crate::render::RenderOptions;
use std::f64::consts::PI;

/// Semi-axes `(a, b)` from the centre and a bounding corner.
pub fn ellipse_axes(points: &[Point]) -> (f64, f64) {
    match points {
        [center, corner, ..] => ((corner.x - center.x).abs(), (corner.y - center.y).abs()),
        _ => (0.0, 0.0),
    }
}

/// Ramanujan's second approximation of the ellipse circumference.
pub fn ramanujan_perimeter(a: f64, b: f64) -> f64 {
    let sum = a + b;
    if sum == 0.0 {
        return 0.0;
    }
    let h = ((a - b) / sum).powi(2);
    PI * sum * (1.0 + 3.0 * h / (10.0 + (4.0 - 3.0 * h).sqrt()))
}

/// `segments` points evenly spaced by parameter angle around the ellipse.
pub fn ellipse_outline(center: Point, a: f64, b: f64, segments: usize) -> Vec<Point> {
    (0..segments)
        .map(|i| {
            let theta = 2.0 * PI * i as f64 / segments as f64;
            Point::new(center.x + a * theta.cos(), center.y + b * theta.sin())
        })
        .collect()
}

pub(super) fn measure(points: &[Point]) -> Vec<Measurement> {
    let (a, b) = ellipse_axes(points);
    vec![
        Measurement::new("Major Axis", Quantity::Length(2.0 * a)),
        Measurement::new("Minor Axis", Quantity::Length(2.0 * b)),
        Measurement::new("Area", Quantity::Area(PI * a * b)),
        Measurement::new("Perimeter", Quantity::Length(ramanujan_perimeter(a, b))),
    ]
}

pub(super) fn outline(points: &[Point], options: &RenderOptions, _: bool) -> Vec<Segment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let (a, b) = ellipse_axes(points);
    let ring = ellipse_outline(points[0], a, b, options.ellipse_segments);
    let n = ring.len();
    (0..n)
        .map(|i| Segment::new(ring[i], ring[(i + 1) % n]))
        .collect()
}

/// Horizontal and vertical axis lines through the centre.
pub(super) fn axis_lines(points: &[Point]) -> Vec<Segment> {
    let (a, b) = ellipse_axes(points);
    let c = points[0];
    vec![
        Segment::new(c.offset(-a, 0.0), c.offset(a, 0.0)),
        Segment::new(c.offset(0.0, -b), c.offset(0.0, b)),
    ]
}

/// True extent `centre ± (a, b)`.
pub(super) fn bounds(points: &[Point]) -> Rect {
    if points.len() < 2 {
        return Rect::default();
    }
    let (a, b) = ellipse_axes(points);
    let c = points[0];
    Rect::new(c.x - a, c.y - b, 2.0 * a, 2.0 * b)
}

pub(super) fn label_anchor(points: &[Point], _: &RenderOptions) -> Point {
    if points.len() < 2 {
        return Point::default();
    }
    points[0]
}
