//! Scene data model: walls, items, annotations.

use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier shared by walls and items.
pub type ElementId = String;

/// Free-form item attributes.
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Opaque annotation record, passed through unchanged.
pub type Annotation = serde_json::Value;

/// Default wall thickness in millimetres.
pub const DEFAULT_WALL_THICKNESS: f64 = 12.0;

/// Id prefix for walls.
pub const WALL_ID_PREFIX: &str = "W";
/// Id prefix for items.
pub const ITEM_ID_PREFIX: &str = "I";

/// Generate a fresh identifier of the form `<prefix>-<8 hex chars>`.
pub fn new_id(prefix: &str) -> ElementId {
    let hex = Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &hex[..8])
}

/// A straight wall segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: ElementId,
    /// Start point.
    pub a: Point,
    /// End point.
    pub b: Point,
    pub thickness: f64,
}

impl Wall {
    /// Create a wall with a fresh id.
    pub fn new(a: Point, b: Point, thickness: f64) -> Self {
        Self::with_id(new_id(WALL_ID_PREFIX), a, b, thickness)
    }

    pub fn with_id(id: impl Into<ElementId>, a: Point, b: Point, thickness: f64) -> Self {
        Self {
            id: id.into(),
            a,
            b,
            thickness,
        }
    }

    /// Length of the wall.
    pub fn length(&self) -> f64 {
        self.a.distance(self.b)
    }
}

/// Kind of entity an item can be snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapTo {
    #[default]
    Wall,
}

/// Advisory reference from an item to the wall it is attached to.
///
/// This is a named lookup, not ownership: removing the wall leaves the
/// reference in place (see [`Scene::orphaned_snaps`]).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapRef {
    pub to: SnapTo,
    pub target_id: ElementId,
    /// Attachment point on the wall.
    pub at: Point,
}

impl SnapRef {
    pub fn wall(target_id: impl Into<ElementId>, at: Point) -> Self {
        Self {
            to: SnapTo::Wall,
            target_id: target_id.into(),
            at,
        }
    }
}

/// A placed catalog item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ElementId,
    /// Dot-delimited catalog path, e.g. `door.single.900`.
    pub catalog_ref: String,
    pub x: f64,
    pub y: f64,
    /// Rotation in degrees.
    pub rotation: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub snap: Option<SnapRef>,
    pub props: Props,
}

impl Item {
    /// Create an unrotated, unscaled, unsnapped item with a fresh id.
    pub fn new(catalog_ref: impl Into<String>, position: Point) -> Self {
        Self::with_id(new_id(ITEM_ID_PREFIX), catalog_ref, position)
    }

    pub fn with_id(id: impl Into<ElementId>, catalog_ref: impl Into<String>, position: Point) -> Self {
        Self {
            id: id.into(),
            catalog_ref: catalog_ref.into(),
            x: position.x,
            y: position.y,
            rotation: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            snap: None,
            props: Props::new(),
        }
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn set_position(&mut self, point: Point) {
        self.x = point.x;
        self.y = point.y;
    }
}

/// The committed set of walls, items and annotations.
///
/// All fields are owned values, so cloning a scene yields a fully independent
/// copy with no shared sub-objects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    pub walls: Vec<Wall>,
    pub items: Vec<Item>,
    pub annotations: Vec<Annotation>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(walls: Vec<Wall>, items: Vec<Item>, annotations: Vec<Annotation>) -> Self {
        Self {
            walls,
            items,
            annotations,
        }
    }

    /// Check whether the scene has no walls and no items.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty() && self.items.is_empty()
    }

    pub fn wall(&self, id: &str) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    pub fn item(&self, id: &str) -> Option<&Item> {
        self.items.iter().find(|i| i.id == id)
    }

    /// Check whether a wall or an item carries this id.
    pub fn contains(&self, id: &str) -> bool {
        self.wall(id).is_some() || self.item(id).is_some()
    }

    /// Items whose snap reference names a wall that no longer exists.
    pub fn orphaned_snaps(&self) -> Vec<&Item> {
        self.items
            .iter()
            .filter(|item| {
                item.snap
                    .as_ref()
                    .is_some_and(|snap| self.wall(&snap.target_id).is_none())
            })
            .collect()
    }

    /// Ids that occur more than once among walls or among items.
    pub fn duplicate_ids(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        let mut dups = Vec::new();
        for id in self
            .walls
            .iter()
            .map(|w| w.id.as_str())
            .chain(self.items.iter().map(|i| i.id.as_str()))
        {
            if !seen.insert(id) && !dups.contains(&id) {
                dups.push(id);
            }
        }
        dups
    }
}
