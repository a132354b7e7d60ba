use glam::DMat4;
use proptest::prelude::*;
use sonoview_annotate::viewport::{CoordinateConverter, Projection, ViewTransform};

fn image_plane(width: f64, height: f64) -> ViewTransform {
    image_plane_with_depth(width, height, 1.0)
}

fn image_plane_with_depth(width: f64, height: f64, depth: f64) -> ViewTransform {
    ViewTransform::new(
        DMat4::IDENTITY,
        Projection::Orthographic {
            left: 0.0,
            right: width,
            bottom: height,
            top: 0.0,
            near: -depth,
            far: depth,
        },
    )
}

#[test]
fn test_live_transform_overrides_baseline() {
    let mut conv = CoordinateConverter::new(200.0, 100.0, 400.0, 400.0);
    let baseline = conv.screen_to_image(0.0, 0.0);
    assert!((baseline.y + 50.0).abs() < 1e-9);

    assert!(conv.set_view_transform(image_plane(200.0, 100.0)));
    let live = conv.screen_to_image(400.0, 400.0);
    assert!((live.x - 200.0).abs() < 1e-6);
    assert!((live.y - 100.0).abs() < 1e-6);

    // Same matrices again are filtered out
    assert!(!conv.set_view_transform(image_plane(200.0, 100.0)));

    assert!(conv.clear_view_transform());
    let back = conv.screen_to_image(0.0, 0.0);
    assert!((back.y - baseline.y).abs() < 1e-9);
}

#[test]
fn test_tolerance_scales_with_zoom() {
    let conv = CoordinateConverter::new(100.0, 100.0, 400.0, 400.0);
    assert!((conv.tolerance_to_image(10.0) - 2.5).abs() < 1e-9);
}

#[test]
fn test_world_is_image_plane() {
    let conv = CoordinateConverter::new(100.0, 100.0, 200.0, 200.0);
    let w = conv.screen_to_world(100.0, 100.0);
    assert!((w.x - 50.0).abs() < 1e-9);
    assert!((w.y - 50.0).abs() < 1e-9);
    assert_eq!(w.z, 0.0);
}

proptest! {
    #[test]
    fn prop_baseline_round_trip(
        iw in 1.0f64..4096.0, ih in 1.0f64..4096.0,
        ww in 1.0f64..4096.0, wh in 1.0f64..4096.0,
        x in -1000.0f64..5000.0, y in -1000.0f64..5000.0,
    ) {
        let conv = CoordinateConverter::new(iw, ih, ww, wh);
        let image = conv.screen_to_image(x, y);
        let screen = conv.image_to_screen(image.x, image.y);
        prop_assert!((screen.x - x).abs() < 1e-6);
        prop_assert!((screen.y - y).abs() < 1e-6);
    }

    #[test]
    fn prop_live_round_trip(x in 0.0f64..800.0, y in 0.0f64..600.0) {
        let mut conv = CoordinateConverter::new(512.0, 512.0, 800.0, 600.0);
        prop_assert!(conv.set_view_transform(image_plane(512.0, 384.0)));
        let image = conv.screen_to_image(x, y);
        let screen = conv.image_to_screen(image.x, image.y);
        prop_assert!((screen.x - x).abs() < 1e-6);
        prop_assert!((screen.y - y).abs() < 1e-6);
    }

    #[test]
    fn prop_live_transform_at_image_scale(
        width in 1.0f64..8192.0, height in 1.0f64..8192.0,
        depth in 0.01f64..10000.0,
        x in 0.0f64..800.0, y in 0.0f64..600.0,
    ) {
        let mut conv = CoordinateConverter::new(width, height, 800.0, 600.0);
        prop_assert!(conv.set_view_transform(image_plane_with_depth(width, height, depth)));
        prop_assert!(conv.has_view_transform());

        let image = conv.screen_to_image(x, y);
        prop_assert!((image.x - x / 800.0 * width).abs() < 1e-6 * width.max(1.0));
        prop_assert!((image.y - y / 600.0 * height).abs() < 1e-6 * height.max(1.0));

        let screen = conv.image_to_screen(image.x, image.y);
        prop_assert!((screen.x - x).abs() < 1e-6);
        prop_assert!((screen.y - y).abs() < 1e-6);
    }
}
