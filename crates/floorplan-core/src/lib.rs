//! Floorplan Core Library
//!
//! Platform-agnostic scene model, wall snapping, undo history and the domain
//! document codec for the floorplan editor.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod domain;
pub mod export;
pub mod geometry;
pub mod history;
pub mod model;
pub mod session;
pub mod snap;
pub mod viewport;

pub use catalog::{Catalog, CatalogEntry, SnapRule};
pub use config::{ConfigError, EditorConfig};
pub use controller::{ControllerError, ControllerResult, SceneController, SceneHandle};
pub use domain::{DomainDocument, DomainError, ParsedDocument, ProjectMeta, Transform};
pub use export::{DirectDownload, ExportError, ExportPayload, ExportSink, HostBridge, RasterFormat, select_sink};
pub use history::History;
pub use model::{ElementId, Item, Scene, SnapRef, SnapTo, Wall};
pub use session::{DraftWall, SessionState, ToolKind};
pub use snap::{WALL_SNAP_THRESHOLD, WallSnap, snap_item_to_walls};
pub use viewport::{Viewport, ZoomDirection};
