use super::{Measurement, Point, Quantity, Segment};
use crate::render::RenderOptions;

/// Corners of the rectangle spanned by two opposite points, in
/// top-left, top-right, bottom-right, bottom-left order.
pub fn corners(a: Point, b: Point) -> [Point; 4] {
    let (min_x, max_x) = (a.x.min(b.x), a.x.max(b.x));
    let (min_y, max_y) = (a.y.min(b.y), a.y.max(b.y));
    [
        Point::new(min_x, min_y),
        Point::new(max_x, min_y),
        Point::new(max_x, max_y),
        Point::new(min_x, max_y),
    ]
}

pub(super) fn measure(points: &[Point]) -> Vec<Measurement> {
    let (w, h) = match points {
        [a, b, ..] => ((b.x - a.x).abs(), (b.y - a.y).abs()),
        _ => (0.0, 0.0),
    };
    vec![
        Measurement::new("Width", Quantity::Length(w)),
        Measurement::new("Height", Quantity::Length(h)),
        Measurement::new("Area", Quantity::Area(w * h)),
    ]
}

pub(super) fn outline(points: &[Point], _: &RenderOptions, _: bool) -> Vec<Segment> {
    match points {
        [a, b, ..] => {
            let c = corners(*a, *b);
            (0..4).map(|i| Segment::new(c[i], c[(i + 1) % 4])).collect()
        }
        _ => Vec::new(),
    }
}
