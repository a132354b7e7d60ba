use sonoview_annotate::model::{Quantity, Shape, ShapeFactory, ShapeKind};
use sonoview_core::UnitScale;

fn build(kind: ShapeKind, points: &[(f64, f64)]) -> Shape {
    let mut shape = ShapeFactory::new().create(kind);
    for &(x, y) in points {
        assert!(shape.add_point(x, y));
    }
    assert!(shape.complete());
    shape
}

fn value(shape: &Shape, name: &str) -> f64 {
    shape
        .measurements()
        .iter()
        .find(|m| m.name == name)
        .map(|m| m.quantity.value())
        .unwrap_or_else(|| panic!("missing measurement {name}"))
}

#[test]
fn test_square_polygon() {
    let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
    let polygon = build(ShapeKind::Polygon, &square);
    assert!((value(&polygon, "Perimeter") - 40.0).abs() < 1e-9);
    assert!((value(&polygon, "Area") - 100.0).abs() < 1e-9);

    let area = build(ShapeKind::Area, &square);
    assert_eq!(
        area.primary_measurement().map(|m| m.quantity),
        Some(Quantity::Area(100.0))
    );
}

#[test]
fn test_angles() {
    let right = build(ShapeKind::Angle, &[(1.0, 0.0), (0.0, 0.0), (0.0, 1.0)]);
    assert!((value(&right, "Angle") - 90.0).abs() < 1e-9);
    assert_eq!(right.label_text(&UnitScale::pixels()), "90.0°");

    let straight = build(ShapeKind::Angle, &[(-1.0, 0.0), (0.0, 0.0), (1.0, 0.0)]);
    assert!((value(&straight, "Angle") - 180.0).abs() < 1e-9);
}

#[test]
fn test_ellipse() {
    let ellipse = build(ShapeKind::Ellipse, &[(0.0, 0.0), (10.0, 5.0)]);
    assert!((value(&ellipse, "Area") - 157.08).abs() < 0.01);
    assert!((value(&ellipse, "Major Axis") - 20.0).abs() < 1e-9);
    assert!((value(&ellipse, "Minor Axis") - 10.0).abs() < 1e-9);
}

#[test]
fn test_open_perimeter_counts_segments() {
    let path = build(ShapeKind::Perimeter, &[(0.0, 0.0), (3.0, 4.0), (3.0, 10.0)]);
    assert!((value(&path, "Total Length") - 11.0).abs() < 1e-9);
    assert_eq!(value(&path, "Segments"), 2.0);
}

#[test]
fn test_calibrated_labels() {
    let distance = build(ShapeKind::Distance, &[(0.0, 0.0), (30.0, 40.0)]);
    let px = UnitScale::pixels();
    let mm = UnitScale::new(Some(0.5));

    assert_eq!(distance.label_text(&px), "50.0 px");
    assert_eq!(distance.label_text(&mm), "25.00 mm");
    assert_eq!(distance.label_text(&mm), distance.label_text(&mm));

    let rect = build(ShapeKind::Rectangle, &[(0.0, 0.0), (20.0, 10.0)]);
    assert_eq!(rect.label_text(&px), "200 px²");
    // 200 px² at 1 mm/px = 200 mm² = 2 cm²
    assert_eq!(rect.label_text(&UnitScale::new(Some(1.0))), "2.00 cm²");
}

#[test]
fn test_incomplete_shapes_measure_zero() {
    let mut polygon = ShapeFactory::new().create(ShapeKind::Polygon);
    polygon.add_point(0.0, 0.0);
    polygon.add_point(5.0, 0.0);
    assert!(!polygon.complete());
    assert!(!polygon.is_completed());
    assert_eq!(value(&polygon, "Area"), 0.0);
}
