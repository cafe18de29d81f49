//! Domain documents survive export and re-import.

use floorplan_core::domain::{self, DOMAIN_FILENAME, ProjectMeta};
use floorplan_core::{DirectDownload, Item, Scene, SceneController, SnapRef, Wall};
use kurbo::Point;
use pretty_assertions::assert_eq;
use serde_json::json;

fn furnished_scene() -> Scene {
    let mut door = Item::with_id("I-door", "door.single.900", Point::new(120.0, 0.0));
    door.snap = Some(SnapRef::wall("W-a", Point::new(120.0, 0.0)));
    door.props.insert("swing".into(), json!({"side": "left", "angle": 90}));

    let mut table = Item::with_id("I-table", "furniture.table", Point::new(-33.25, 1e6));
    table.rotation = 359.5;
    table.scale_x = 0.01;

    Scene::from_parts(
        vec![
            Wall::with_id("W-a", Point::new(0.0, 0.0), Point::new(300.0, 0.0), 12.0),
            Wall::with_id("W-b", Point::new(300.0, 0.0), Point::new(300.0, 300.0), 24.5),
            Wall::with_id("W-dot", Point::new(5.0, 5.0), Point::new(5.0, 5.0), 12.0),
        ],
        vec![door, table],
        vec![json!({"kind": "dimension", "from": [0, 0], "to": [300, 0]}), json!("free text")],
    )
}

#[test]
fn parse_of_serialize_is_identity() {
    let scene = furnished_scene();
    let doc = domain::serialize(&scene, &ProjectMeta::new("Roundtrip"));
    let story = doc.story().unwrap();
    assert_eq!((story.id.as_str(), story.name.as_str()), ("S1", "1F"));
    assert_eq!(story.elements.len(), 5);
    let parsed = domain::parse(&serde_json::to_value(&doc).unwrap()).unwrap();
    assert_eq!(parsed.scene, scene);
}

#[test]
fn controller_export_reimports_identically() {
    let dir = tempfile::tempdir().unwrap();

    let mut source = SceneController::new();
    source
        .import_value(&serde_json::to_value(domain::serialize(&furnished_scene(), &ProjectMeta::new("Src"))).unwrap())
        .unwrap();
    source.export_domain(&DirectDownload::new(dir.path().to_path_buf())).unwrap();

    let mut target = SceneController::new();
    target.import_file(&dir.path().join(DOMAIN_FILENAME)).unwrap();

    assert_eq!(target.scene(), source.scene());
    assert_eq!(target.meta().project_id, source.meta().project_id);
    assert_eq!(target.meta().name, "Src");
}

#[test]
fn hand_written_document_with_gaps() {
    let doc = json!({
        "schemaVersion": "0.9",
        "stories": [{
            "elements": [
                {"id": 7, "type": "wall", "a": {"x": 0, "y": 0}, "b": {"x": 0, "y": 250}},
                {"id": "I-x", "type": "item", "catalogRef": "door.single.900",
                 "transform": {"rotation": 90}},
                {"id": "G-1", "type": "guide"}
            ]
        }, {
            "elements": [{"id": "W-upstairs", "type": "wall", "a": {"x": 0, "y": 0}, "b": {"x": 1, "y": 0}}]
        }]
    });

    let parsed = domain::parse(&doc).unwrap();
    assert_eq!(parsed.scene.walls.len(), 1);
    assert_eq!(parsed.scene.walls[0].id, "7");
    assert_eq!(parsed.scene.walls[0].thickness, 12.0);
    assert_eq!(parsed.scene.items[0].rotation, 90.0);
    assert_eq!(parsed.scene.items[0].position(), Point::ZERO);
    assert_eq!(parsed.meta.name, "Imported");
}

#[test]
fn rejected_import_keeps_the_session() {
    let mut c = SceneController::new();
    c.import_value(&serde_json::to_value(domain::serialize(&furnished_scene(), &ProjectMeta::new("Keep"))).unwrap())
        .unwrap();
    let before = c.scene().clone();

    assert!(c.import_str("{\"meta\": {}}").is_err());
    assert!(c.import_str("not json at all").is_err());
    assert_eq!(c.scene(), &before);
    assert_eq!(c.meta().name, "Keep");
    assert_eq!(c.history().past().len(), 1);
}
