use sonoview_annotate::{
    AnnotationEvent, Classification, CoordinateConverter, Delta, InteractionController, ShapeKind,
    Tool,
};
use sonoview_settings::Config;

fn controller() -> InteractionController {
    // 1:1 mapping between screen and image
    InteractionController::new(CoordinateConverter::new(200.0, 200.0, 200.0, 200.0))
}

#[test]
fn test_polygon_needs_double_click() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Polygon));
    c.pointer_down(10.0, 10.0);
    c.pointer_down(50.0, 10.0);
    c.pointer_move(50.0, 50.0);
    c.double_click(50.0, 50.0);
    assert!(c.shapes().is_empty());
    assert!(c.is_drawing());

    c.pointer_down(50.0, 50.0);
    c.double_click(50.0, 50.0);
    assert_eq!(c.shapes().len(), 1);
    assert!(!c.is_drawing());
    assert!(c.preview().is_none());
}

#[test]
fn test_drag_commits_event_sequence() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Distance));
    c.drain_events();

    c.pointer_down(0.0, 0.0);
    c.pointer_move(30.0, 40.0);
    c.pointer_up(30.0, 40.0);

    let events = c.drain_events();
    assert!(matches!(events[0], AnnotationEvent::PreviewUpdated { tool: Tool::Distance, .. }));
    assert!(matches!(events[1], AnnotationEvent::PreviewUpdated { .. }));
    match &events[2] {
        AnnotationEvent::ShapeCommitted { shape } => {
            assert_eq!(shape.kind(), ShapeKind::Distance);
            assert_eq!(shape.label_text(c.converter().units()), "50.0 px");
        }
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(events[3], AnnotationEvent::PreviewCleared);
}

#[test]
fn test_angle_completes_on_third_click() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Angle));
    c.pointer_down(110.0, 100.0);
    c.pointer_down(100.0, 100.0);
    assert!(c.shapes().is_empty());
    c.pointer_down(100.0, 90.0);
    assert_eq!(c.shapes().len(), 1);

    let entry = &c.layer_entries()[0];
    assert_eq!(entry.summary, "Angle: 90.0°");
}

#[test]
fn test_switching_tool_discards_work() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Area));
    c.pointer_down(0.0, 0.0);
    c.pointer_down(10.0, 0.0);
    assert!(c.is_drawing());

    c.select_tool("line").unwrap();
    assert!(!c.is_drawing());
    assert_eq!(c.active_tool(), Some(Tool::Line));
    assert!(c.shapes().is_empty());
}

#[test]
fn test_unknown_tool_keeps_current() {
    let mut c = controller();
    c.select_tool("rectangle").unwrap();
    let err = c.select_tool("lasso").unwrap_err();
    assert!(err.is_tool_error());
    assert_eq!(c.active_tool(), Some(Tool::Rectangle));

    c.select_tool("none").unwrap();
    assert_eq!(c.active_tool(), None);
}

#[test]
fn test_window_level_uses_sensitivity() {
    let mut config = Config::default();
    config.interaction.window_level_sensitivity = 2.0;
    let mut c = controller().with_config(&config);
    c.set_active_tool(Some(Tool::WindowLevel));
    c.drain_events();

    c.pointer_move(5.0, 5.0);
    assert!(c.drain_events().is_empty());

    c.pointer_down(10.0, 10.0);
    c.pointer_move(15.0, 7.0);
    c.pointer_up(15.0, 7.0);
    assert_eq!(
        c.drain_events(),
        vec![AnnotationEvent::DeltaEmitted(Delta::WindowLevel {
            window: 10.0,
            level: 6.0,
        })]
    );
}

#[test]
fn test_layer_operations() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Line));
    c.pointer_down(0.0, 100.0);
    c.pointer_move(200.0, 100.0);
    c.pointer_up(200.0, 100.0);
    let id = c.layer_entries()[0].id;

    assert_eq!(c.select_at(100.0, 105.0), Some(id));
    assert!(c.layer_entries()[0].selected);

    assert!(c.set_classification(id, Some(Classification::Thrombus)));
    assert_eq!(c.layer_entries()[0].color_hex, "#FF6B6B");

    assert!(c.set_visibility(id, false));
    assert!(!c.set_visibility(id, false));
    assert_eq!(c.scene().line_count(), 0);

    assert!(c.toggle_all_visibility());
    assert!(c.layer_entries()[0].visible);

    assert!(c.delete(id));
    assert_eq!(c.selected(), None);
    assert!(c.layer_entries().is_empty());
}

#[test]
fn test_spacing_relabels_shapes() {
    let mut c = controller();
    c.set_active_tool(Some(Tool::Distance));
    c.pointer_down(0.0, 0.0);
    c.pointer_move(100.0, 0.0);
    c.pointer_up(100.0, 0.0);
    c.drain_events();

    c.set_pixel_spacing(Some(0.2));
    let events = c.drain_events();
    assert_eq!(events.len(), 1);
    assert!(matches!(events[0], AnnotationEvent::ShapeChanged { .. }));
    assert_eq!(c.layer_entries()[0].summary, "Distance: 20.00 mm");
}
