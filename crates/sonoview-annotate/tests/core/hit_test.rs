use proptest::prelude::*;
use sonoview_annotate::hit_test::{point_near_shape, point_to_segment_distance, topmost_at};
use sonoview_annotate::model::{Point, Segment, Shape, ShapeFactory, ShapeKind};
use sonoview_annotate::ShapeStore;

fn line(factory: &mut ShapeFactory, a: (f64, f64), b: (f64, f64)) -> Shape {
    let mut shape = factory.create(ShapeKind::Line);
    shape.add_point(a.0, a.1);
    shape.add_point(b.0, b.1);
    shape.complete();
    shape
}

#[test]
fn test_line_midpoint_is_near() {
    let shape = line(&mut ShapeFactory::new(), (0.0, 0.0), (10.0, 0.0));
    assert!(point_near_shape(&shape, Point::new(5.0, 0.0), 0.0));
    assert!(!point_near_shape(&shape, Point::new(5.0, 3.0), 2.0));
    assert!(point_near_shape(&shape, Point::new(5.0, 3.0), 3.0));
}

#[test]
fn test_topmost_wins() {
    let mut factory = ShapeFactory::new();
    let mut store = ShapeStore::new();
    let below = line(&mut factory, (0.0, 0.0), (10.0, 0.0));
    let above = line(&mut factory, (5.0, -5.0), (5.0, 5.0));
    let above_id = above.id();
    store.insert(below);
    store.insert(above);

    assert_eq!(topmost_at(&store, Point::new(5.0, 0.0), 1.0), Some(above_id));
    assert_eq!(topmost_at(&store, Point::new(50.0, 50.0), 1.0), None);
}

proptest! {
    #[test]
    fn prop_distance_never_exceeds_endpoints(
        ax in -100.0f64..100.0, ay in -100.0f64..100.0,
        bx in -100.0f64..100.0, by in -100.0f64..100.0,
        px in -100.0f64..100.0, py in -100.0f64..100.0,
    ) {
        let a = Point::new(ax, ay);
        let b = Point::new(bx, by);
        let p = Point::new(px, py);
        let d = point_to_segment_distance(p, &Segment::new(a, b));
        prop_assert!(d >= 0.0);
        prop_assert!(d <= p.distance_to(&a) + 1e-9);
        prop_assert!(d <= p.distance_to(&b) + 1e-9);
    }

    #[test]
    fn prop_points_on_line_are_hit(t in 0.0f64..=1.0) {
        let shape = line(&mut ShapeFactory::new(), (-20.0, 10.0), (40.0, -30.0));
        let p = Point::new(-20.0 + 60.0 * t, 10.0 - 40.0 * t);
        prop_assert!(point_near_shape(&shape, p, 1e-6));
    }
}
