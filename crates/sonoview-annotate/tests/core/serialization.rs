use sonoview_annotate::serialization::{AnnotationFile, ImageInfo, ShapeRecord};
use sonoview_annotate::{
    AnnotationEvent, Classification, CoordinateConverter, InteractionController, ShapeId,
    ShapeKind, Tool,
};
use tempfile::TempDir;

fn drawn_session() -> InteractionController {
    let mut c =
        InteractionController::new(CoordinateConverter::new(200.0, 200.0, 200.0, 200.0));
    c.set_pixel_spacing(Some(0.5));

    c.set_active_tool(Some(Tool::Rectangle));
    c.pointer_down(10.0, 10.0);
    c.pointer_move(50.0, 30.0);
    c.pointer_up(50.0, 30.0);

    c.set_active_tool(Some(Tool::Polygon));
    c.pointer_down(0.0, 0.0);
    c.pointer_down(20.0, 0.0);
    c.pointer_down(20.0, 20.0);
    c.double_click(20.0, 20.0);

    // Left unfinished
    c.set_active_tool(Some(Tool::Area));
    c.pointer_down(100.0, 100.0);
    c
}

#[test]
fn test_save_and_load_session() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("study.json");

    let mut source = drawn_session();
    let first = source.layer_entries()[0].id;
    source.set_classification(first, Some(Classification::Calcification));

    let file = AnnotationFile::from_controller("study", &source);
    assert_eq!(file.shapes.len(), 2);
    assert_eq!(file.image.pixel_spacing, Some(0.5));
    file.save_to_file(&path).unwrap();

    let loaded = AnnotationFile::load_from_file(&path).unwrap();
    assert_eq!(loaded.metadata.name, "study");
    assert_eq!(loaded.shapes, file.shapes);

    let mut target =
        InteractionController::new(CoordinateConverter::new(10.0, 10.0, 200.0, 200.0));
    assert_eq!(loaded.apply_to(&mut target).unwrap(), 2);
    assert_eq!(target.converter().image_size(), (200.0, 200.0));

    let before = source.layer_entries();
    let after = target.layer_entries();
    assert_eq!(before, after);
    assert_eq!(after[0].classification, Some(Classification::Calcification));
}

#[test]
fn test_ids_continue_after_load() {
    let mut file = AnnotationFile::new(
        "legacy",
        ImageInfo {
            width: 100.0,
            height: 100.0,
            pixel_spacing: None,
        },
    );
    file.shapes.push(ShapeRecord {
        id: 41,
        kind: "measure_distance".to_string(),
        points: vec![(0.0, 0.0), (10.0, 0.0)],
        visible: true,
        classification: None,
    });

    let mut c = InteractionController::new(CoordinateConverter::new(100.0, 100.0, 100.0, 100.0));
    assert_eq!(file.apply_to(&mut c).unwrap(), 1);

    c.set_active_tool(Some(Tool::Line));
    c.pointer_down(0.0, 0.0);
    c.pointer_up(0.0, 0.0);

    let ids: Vec<ShapeId> = c.layer_entries().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![ShapeId(41), ShapeId(42)]);
    assert_eq!(c.layer_entries()[0].kind, ShapeKind::Distance);
}

#[test]
fn test_legacy_file_is_migrated() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.json");
    std::fs::write(
        &path,
        r#"{
            "version": "1.0",
            "metadata": {
                "name": "old",
                "created": "2024-03-01T10:00:00Z",
                "modified": "2024-03-01T10:00:00Z"
            },
            "image": { "width": 64, "height": 64 },
            "shapes": [
                { "id": 1, "kind": "freeform", "points": [[0, 0], [8, 0], [8, 8]] },
                { "id": 2, "kind": "rect", "points": [[1, 1], [5, 5]], "classification": "None" },
                { "id": 3, "kind": "circle", "points": [[0, 0], [4, 4]] }
            ]
        }"#,
    )
    .unwrap();

    let file = AnnotationFile::load_from_file(&path).unwrap();
    let shapes = file.to_shapes().unwrap();
    let kinds: Vec<ShapeKind> = shapes.iter().map(|s| s.kind()).collect();
    // The two-point circle is below the polygon minimum and is skipped
    assert_eq!(kinds, vec![ShapeKind::Polygon, ShapeKind::Rectangle]);
}

#[test]
fn test_unknown_kind_fails_load() {
    let mut file = AnnotationFile::new(
        "bad",
        ImageInfo {
            width: 10.0,
            height: 10.0,
            pixel_spacing: None,
        },
    );
    file.shapes.push(ShapeRecord {
        id: 1,
        kind: "bezier".to_string(),
        points: vec![(0.0, 0.0), (1.0, 1.0)],
        visible: true,
        classification: None,
    });

    let mut c = InteractionController::new(CoordinateConverter::new(10.0, 10.0, 10.0, 10.0));
    assert!(file.apply_to(&mut c).is_err());
    assert!(c.drain_events().iter().all(|e| *e != AnnotationEvent::ShapesCleared));
}

#[test]
fn test_missing_file() {
    let temp_dir = TempDir::new().unwrap();
    assert!(AnnotationFile::load_from_file(temp_dir.path().join("nope.json")).is_err());
}
