use super::{Measurement, Point, Quantity, Segment};
use crate::render::RenderOptions;

fn length(points: &[Point]) -> f64 {
    match points {
        [a, b, ..] => a.distance_to(b),
        _ => 0.0,
    }
}

pub(super) fn measure_length(points: &[Point]) -> Vec<Measurement> {
    vec![Measurement::new("Length", Quantity::Length(length(points)))]
}

pub(super) fn measure_distance(points: &[Point]) -> Vec<Measurement> {
    vec![Measurement::new("Distance", Quantity::Length(length(points)))]
}

pub(super) fn outline(points: &[Point], _: &RenderOptions, _: bool) -> Vec<Segment> {
    match points {
        [a, b, ..] => vec![Segment::new(*a, *b)],
        _ => Vec::new(),
    }
}

/// Midpoint lifted above the line by the label offset.
pub(super) fn raised_midpoint(points: &[Point], options: &RenderOptions) -> Point {
    match points {
        [a, b, ..] => a.midpoint(b).offset(0.0, -options.label_offset),
        _ => Point::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_length() {
        let m = measure_length(&[Point::new(0.0, 0.0), Point::new(3.0, 4.0)]);
        assert_eq!(m[0].name, "Length");
        assert_eq!(m[0].quantity, Quantity::Length(5.0));
    }

    #[test]
    fn test_single_point_is_zero() {
        let m = measure_distance(&[Point::new(7.0, 7.0)]);
        assert_eq!(m[0].quantity.value(), 0.0);
        assert!(outline(&[Point::new(7.0, 7.0)], &RenderOptions::default(), false).is_empty());
    }

    #[test]
    fn test_label_sits_above_midpoint() {
        let p = raised_midpoint(
            &[Point::new(0.0, 100.0), Point::new(20.0, 100.0)],
            &RenderOptions::default(),
        );
        assert_eq!(p, Point::new(10.0, 85.0));
    }
}
