use super::{Measurement, Point, Quantity, Rect, Segment};
use crate::render::RenderOptions;

/// Sum of consecutive edge lengths, plus the closing edge when `closed`
/// and there are at least three points.
pub fn polyline_length(points: &[Point], closed: bool) -> f64 {
    let open: f64 = points.windows(2).map(|w| w[0].distance_to(&w[1])).sum();
    match points {
        [first, .., last] if closed && points.len() >= 3 => open + last.distance_to(first),
        _ => open,
    }
}

/// Unsigned area by the shoelace formula. Zero below three points.
pub fn shoelace_area(points: &[Point]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| {
            let (p, q) = (points[i], points[(i + 1) % n]);
            p.x * q.y - q.x * p.y
        })
        .sum();
    twice.abs() / 2.0
}

/// Vertex average. Origin for an empty list.
pub fn centroid(points: &[Point]) -> Point {
    if points.is_empty() {
        return Point::default();
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Point::new(sx / n, sy / n)
}

pub(super) fn measure_polygon(points: &[Point]) -> Vec<Measurement> {
    vec![
        Measurement::new("Perimeter", Quantity::Length(polyline_length(points, true))),
        Measurement::new("Area", Quantity::Area(shoelace_area(points))),
    ]
}

pub(super) fn measure_area(points: &[Point]) -> Vec<Measurement> {
    vec![
        Measurement::new("Area", Quantity::Area(shoelace_area(points))),
        Measurement::new("Perimeter", Quantity::Length(polyline_length(points, true))),
    ]
}

pub(super) fn measure_perimeter(points: &[Point]) -> Vec<Measurement> {
    vec![
        Measurement::new(
            "Total Length",
            Quantity::Length(polyline_length(points, false)),
        ),
        Measurement::new("Segments", Quantity::Count(points.len().saturating_sub(1))),
    ]
}

pub(super) fn outline(points: &[Point], _: &RenderOptions, close: bool) -> Vec<Segment> {
    let mut segments: Vec<Segment> = points
        .windows(2)
        .map(|w| Segment::new(w[0], w[1]))
        .collect();
    if let [first, .., last] = points {
        if close && points.len() >= 3 {
            segments.push(Segment::new(*last, *first));
        }
    }
    segments
}

pub(super) fn centroid_anchor(points: &[Point], _: &RenderOptions) -> Point {
    if points.len() < 3 {
        return Rect::from_points(points).center();
    }
    centroid(points)
}

/// Middle vertex lifted by the label offset.
pub(super) fn raised_middle_vertex(points: &[Point], options: &RenderOptions) -> Point {
    if points.len() < 2 {
        return Point::default();
    }
    points[points.len() / 2].offset(0.0, -options.label_offset)
}
