//! Versioned domain document: the exchange format for floorplans.
//!
//! [`serialize`] turns a [`Scene`] into a [`DomainDocument`]; [`parse`] reads
//! a JSON value back into a scene. Parsing only fails when the story
//! container is missing. Every other absent field falls back to a default.

use crate::model::{
    Annotation, DEFAULT_WALL_THICKNESS, ElementId, Item, Props, Scene, SnapRef, Wall,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Schema version written to every document.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Conventional export filename.
pub const DOMAIN_FILENAME: &str = "floorplan.domain.json";

/// Extruded wall height written on export (millimetres).
pub const WALL_HEIGHT: f64 = 2400.0;

/// Grid cell size written to the viewport section.
pub const GRID_SIZE: f64 = 50.0;

const STORY_ID: &str = "S1";
const STORY_NAME: &str = "1F";
const UNIT: &str = "mm";

const IMPORTED_NAME: &str = "Imported";
const IMPORTED_PROJECT_ID: &str = "IMPORTED";

/// Domain codec errors.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid domain json: stories[0] missing")]
    MissingStory,
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("IO error: {0}")]
    Io(String),
}

/// Result type for codec operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Current UTC time as an RFC 3339 string.
pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default()
}

/// Project-level metadata carried alongside the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMeta {
    pub project_id: String,
    pub name: String,
    pub created_at: String,
    /// Viewport zoom at export time.
    pub scale: f64,
}

impl ProjectMeta {
    /// Create metadata for a new project started now.
    ///
    /// The project id has the form `P-<YYYYMMDD>-0001`.
    pub fn new(name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        let project_id = format!(
            "P-{:04}{:02}{:02}-0001",
            now.year(),
            u8::from(now.month()),
            now.day()
        );
        Self {
            project_id,
            name: name.into(),
            created_at: now.format(&Rfc3339).unwrap_or_default(),
            scale: 1.0,
        }
    }
}

/// Top-level domain document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DomainDocument {
    pub schema_version: String,
    pub meta: DocumentMeta,
    pub viewport: DocumentViewport,
    pub stories: Vec<Story>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMeta {
    pub project_id: String,
    pub name: String,
    pub unit: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentViewport {
    pub origin: Point,
    pub scale: f64,
    pub grid: GridSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSettings {
    pub enabled: bool,
    pub size: f64,
}

/// One storey of the building. Only the first story is read on import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Story {
    pub id: String,
    pub name: String,
    pub elements: Vec<Element>,
    #[serde(rename = "x_annotations", default)]
    pub annotations: Vec<Annotation>,
}

/// A story element, tagged by `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Wall(WallElement),
    Item(ItemElement),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallElement {
    pub id: ElementId,
    pub a: Point,
    pub b: Point,
    pub thickness: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemElement {
    pub id: ElementId,
    pub catalog_ref: String,
    pub transform: Transform,
    pub snap: Option<SnapRef>,
    pub props: Props,
}

/// Placement of an item.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
        }
    }
}

impl From<&Wall> for WallElement {
    fn from(wall: &Wall) -> Self {
        Self {
            id: wall.id.clone(),
            a: wall.a,
            b: wall.b,
            thickness: wall.thickness,
            height: WALL_HEIGHT,
        }
    }
}

impl From<&Item> for ItemElement {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id.clone(),
            catalog_ref: item.catalog_ref.clone(),
            transform: Transform {
                x: item.x,
                y: item.y,
                rotation: item.rotation,
                scale_x: item.scale_x,
                scale_y: item.scale_y,
            },
            snap: item.snap.clone(),
            props: item.props.clone(),
        }
    }
}

impl DomainDocument {
    /// The first story, if any.
    pub fn story(&self) -> Option<&Story> {
        self.stories.first()
    }

    /// Serialize as pretty-printed JSON.
    pub fn to_json(&self) -> DomainResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Build a domain document from a scene.
pub fn serialize(scene: &Scene, meta: &ProjectMeta) -> DomainDocument {
    let elements = scene
        .walls
        .iter()
        .map(|w| Element::Wall(w.into()))
        .chain(scene.items.iter().map(|i| Element::Item(i.into())))
        .collect();

    DomainDocument {
        schema_version: SCHEMA_VERSION.to_string(),
        meta: DocumentMeta {
            project_id: meta.project_id.clone(),
            name: meta.name.clone(),
            unit: UNIT.to_string(),
            created_at: meta.created_at.clone(),
            updated_at: now_rfc3339(),
        },
        viewport: DocumentViewport {
            origin: Point::ZERO,
            scale: meta.scale,
            grid: GridSettings {
                enabled: true,
                size: GRID_SIZE,
            },
        },
        stories: vec![Story {
            id: STORY_ID.to_string(),
            name: STORY_NAME.to_string(),
            elements,
            annotations: scene.annotations.clone(),
        }],
    }
}

/// A scene read back from a domain document.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    pub scene: Scene,
    pub meta: ProjectMeta,
}

/// Parse a domain document.
///
/// Fails with [`DomainError::MissingStory`] when `stories[0]` is absent.
/// Elements of unknown type are ignored; walls or items missing their id,
/// endpoints or catalog reference are skipped with a warning.
///
/// Only `{to: "wall", targetId, at}` snaps are understood. Any other snap
/// shape is dropped, so it is lost when the scene is exported again.
pub fn parse(json: &Value) -> DomainResult<ParsedDocument> {
    let story = json
        .get("stories")
        .and_then(Value::as_array)
        .and_then(|stories| stories.first())
        .filter(|story| !story.is_null())
        .ok_or(DomainError::MissingStory)?;

    let mut walls = Vec::new();
    let mut items = Vec::new();

    let elements = story.get("elements").and_then(Value::as_array);
    for (index, element) in elements.into_iter().flatten().enumerate() {
        match element.get("type").and_then(Value::as_str) {
            Some("wall") => match parse_wall(element) {
                Some(wall) => walls.push(wall),
                None => log::warn!("Skipping malformed wall at element {}", index),
            },
            Some("item") => match parse_item(element) {
                Some(item) => items.push(item),
                None => log::warn!("Skipping malformed item at element {}", index),
            },
            other => log::debug!("Ignoring element {} of type {:?}", index, other),
        }
    }

    let annotations = story
        .get("x_annotations")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let meta = json.get("meta");
    let meta_str = |key: &str| meta.and_then(|m| m.get(key)).and_then(Value::as_str);
    let meta = ProjectMeta {
        project_id: meta_str("projectId").unwrap_or(IMPORTED_PROJECT_ID).to_string(),
        name: meta_str("name").unwrap_or(IMPORTED_NAME).to_string(),
        created_at: meta_str("createdAt").map(str::to_string).unwrap_or_else(now_rfc3339),
        scale: 1.0,
    };

    Ok(ParsedDocument {
        scene: Scene::from_parts(walls, items, annotations),
        meta,
    })
}

/// Parse a domain document from JSON text.
pub fn parse_str(json: &str) -> DomainResult<ParsedDocument> {
    let value: Value = serde_json::from_str(json)?;
    parse(&value)
}

/// Read and parse a domain document file.
pub fn read_document_file(path: &Path) -> DomainResult<ParsedDocument> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| DomainError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
    parse_str(&json)
}

fn parse_id(element: &Value) -> Option<ElementId> {
    match element.get("id")? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn parse_point(value: Option<&Value>) -> Option<Point> {
    let value = value?;
    let x = value.get("x")?.as_f64()?;
    let y = value.get("y")?.as_f64()?;
    Some(Point::new(x, y))
}

fn parse_wall(element: &Value) -> Option<Wall> {
    let id = parse_id(element)?;
    let a = parse_point(element.get("a"))?;
    let b = parse_point(element.get("b"))?;
    let thickness = element
        .get("thickness")
        .and_then(Value::as_f64)
        .unwrap_or(DEFAULT_WALL_THICKNESS);
    Some(Wall::with_id(id, a, b, thickness))
}

fn parse_item(element: &Value) -> Option<Item> {
    let id = parse_id(element)?;
    let catalog_ref = element.get("catalogRef")?.as_str()?;

    let defaults = Transform::default();
    let transform = element.get("transform");
    let field = |key: &str, default: f64| {
        transform
            .and_then(|t| t.get(key))
            .and_then(Value::as_f64)
            .unwrap_or(default)
    };

    let snap = match element.get("snap") {
        None | Some(Value::Null) => None,
        Some(value) => match serde_json::from_value::<SnapRef>(value.clone()) {
            Ok(snap) => Some(snap),
            Err(e) => {
                log::warn!("Dropping malformed snap on item {}: {}", id, e);
                None
            }
        },
    };

    let props = element
        .get("props")
        .and_then(Value::as_object)
        .cloned()
        .unwrap_or_default();

    let mut item = Item::with_id(id, catalog_ref, Point::new(field("x", defaults.x), field("y", defaults.y)));
    item.rotation = field("rotation", defaults.rotation);
    item.scale_x = field("scaleX", defaults.scale_x);
    item.scale_y = field("scaleY", defaults.scale_y);
    item.snap = snap;
    item.props = props;
    Some(item)
}
