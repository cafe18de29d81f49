//! Catalog of placeable items.

use serde::{Deserialize, Serialize};

/// Prefix of catalog references that denote doors.
pub const DOOR_PREFIX: &str = "door.";
/// Prefix of catalog references that denote kitchen fixtures.
pub const KITCHEN_PREFIX: &str = "kitchen.";

/// What a catalog entry may snap to when placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapRule {
    Wall,
}

/// A single catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntry {
    pub catalog_ref: String,
    /// Display name.
    pub name: String,
    pub category: String,
    #[serde(default)]
    pub snap_rules: Vec<SnapRule>,
}

impl CatalogEntry {
    pub fn new(catalog_ref: &str, name: &str, category: &str, snap_rules: &[SnapRule]) -> Self {
        Self {
            catalog_ref: catalog_ref.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            snap_rules: snap_rules.to_vec(),
        }
    }

    /// Check if a newly placed item of this entry snaps to walls.
    pub fn snaps_to_walls(&self) -> bool {
        self.snap_rules.contains(&SnapRule::Wall)
    }

    /// Short label: the first two segments of the reference (`door.single`).
    pub fn label(&self) -> String {
        self.catalog_ref.split('.').take(2).collect::<Vec<_>>().join(".")
    }
}

/// Check if a catalog reference denotes a door.
pub fn is_door(catalog_ref: &str) -> bool {
    catalog_ref.starts_with(DOOR_PREFIX)
}

/// Check if an item with this reference re-snaps to walls when moved.
pub fn is_wall_snap_target(catalog_ref: &str) -> bool {
    is_door(catalog_ref) || catalog_ref.starts_with(KITCHEN_PREFIX)
}

/// A list of catalog entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// The default catalog shipped with the editor.
    pub fn builtin() -> Self {
        Self::new(vec![
            CatalogEntry::new("door.single.900", "Single door 900", "Door", &[SnapRule::Wall]),
            CatalogEntry::new("kitchen.sink.1200", "Sink 1200", "Kitchen", &[SnapRule::Wall]),
            CatalogEntry::new("furniture.sofa.1800", "Sofa 1800", "Furniture", &[]),
        ])
    }

    /// Load a catalog from a JSON array of entries.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn get(&self, catalog_ref: &str) -> Option<&CatalogEntry> {
        self.entries.iter().find(|e| e.catalog_ref == catalog_ref)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
