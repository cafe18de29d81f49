//! Scene controller: turns user actions into committed snapshots.
//!
//! Every committing action builds the next [`Scene`] from a copy of the
//! current one and pushes it through the [`History`]. Selection, tool and
//! draft-wall state live in [`SessionState`] and never enter history.

use crate::catalog::{CatalogEntry, is_door, is_wall_snap_target};
use crate::config::EditorConfig;
use crate::domain::{self, DomainDocument, DomainError, ProjectMeta, Transform};
use crate::export::{ExportError, ExportPayload, ExportSink, RasterFormat};
use crate::history::History;
use crate::model::{ElementId, Item, Scene};
use crate::session::{DraftWall, SessionState, ToolKind};
use crate::snap::snap_item_to_walls;
use crate::viewport::ZoomDirection;
use kurbo::{Point, Vec2};
use serde_json::Value;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use thiserror::Error;

/// Controller errors.
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("Unknown catalog reference: {0}")]
    UnknownCatalogRef(String),
    #[error("Unknown item: {0}")]
    UnknownItem(String),
    #[error("Import rejected: {0}")]
    Import(#[from] DomainError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Result type for controller operations.
pub type ControllerResult<T> = Result<T, ControllerError>;

/// Owns the current scene, its history and the session state.
#[derive(Debug, Clone)]
pub struct SceneController {
    scene: Scene,
    history: History<Scene>,
    session: SessionState,
    config: EditorConfig,
    meta: ProjectMeta,
}

impl Default for SceneController {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneController {
    /// Create a controller with default configuration.
    pub fn new() -> Self {
        Self::with_config(EditorConfig::default())
    }

    /// Create a controller. The empty scene is recorded as the first snapshot.
    pub fn with_config(config: EditorConfig) -> Self {
        let mut history = History::new(config.history_limit);
        history.push(Scene::new());
        Self {
            scene: Scene::new(),
            history,
            session: SessionState::new(),
            meta: ProjectMeta::new(config.project_name.clone()),
            config,
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn history(&self) -> &History<Scene> {
        &self.history
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn meta(&self) -> &ProjectMeta {
        &self.meta
    }

    /// Record `next` as the new current scene.
    fn commit(&mut self, next: Scene) {
        self.history.push(next.clone());
        self.scene = next;
        log::debug!(
            "Committed scene: {} walls, {} items ({} undo steps)",
            self.scene.walls.len(),
            self.scene.items.len(),
            self.history.past().len()
        );
    }

    // ---- Tools and selection ----

    pub fn tool(&self) -> ToolKind {
        self.session.tool
    }

    pub fn set_tool(&mut self, tool: ToolKind) {
        self.session.set_tool(tool);
    }

    /// Select a wall or item. Returns false if no element has this id.
    pub fn select(&mut self, id: &str) -> bool {
        if !self.scene.contains(id) {
            return false;
        }
        self.session.selected_id = Some(id.to_string());
        true
    }

    pub fn clear_selection(&mut self) {
        self.session.selected_id = None;
    }

    pub fn selected_id(&self) -> Option<&str> {
        self.session.selected_id.as_deref()
    }

    // ---- Items ----

    /// Place a new item from a catalog entry at `point`.
    ///
    /// Entries with a wall snap rule are snapped to the nearest wall within
    /// the configured radius; only doors take the wall's rotation.
    pub fn place_item(&mut self, entry: &CatalogEntry, point: Point) -> ElementId {
        let mut item = Item::new(entry.catalog_ref.clone(), point);
        if entry.snaps_to_walls() {
            self.apply_wall_snap(&mut item);
        }

        let id = item.id.clone();
        log::info!("Placed {} as {} (snapped: {})", entry.catalog_ref, id, item.snap.is_some());

        let mut next = self.scene.clone();
        next.items.push(item);
        self.commit(next);
        id
    }

    /// Place a new item by catalog reference.
    pub fn place_catalog_ref(&mut self, catalog_ref: &str, point: Point) -> ControllerResult<ElementId> {
        let entry = self
            .config
            .catalog
            .get(catalog_ref)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownCatalogRef(catalog_ref.to_string()))?;
        Ok(self.place_item(&entry, point))
    }

    /// Finish dragging an item to `point`.
    ///
    /// Doors and kitchen fixtures re-snap from the new position. The old snap
    /// relation is dropped and only replaced if a wall is in range.
    pub fn move_item(&mut self, id: &str, point: Point) -> ControllerResult<()> {
        let mut item = self.item_for_edit(id)?;
        item.set_position(point);
        item.snap = None;
        if is_wall_snap_target(&item.catalog_ref) {
            self.apply_wall_snap(&mut item);
        }
        self.replace_item(item);
        Ok(())
    }

    /// Finish resizing or rotating an item.
    ///
    /// Applies the full transform, then re-snaps like [`Self::move_item`].
    pub fn transform_item(&mut self, id: &str, transform: Transform) -> ControllerResult<()> {
        let mut item = self.item_for_edit(id)?;
        item.set_position(Point::new(transform.x, transform.y));
        item.rotation = transform.rotation;
        item.scale_x = transform.scale_x;
        item.scale_y = transform.scale_y;
        item.snap = None;
        if is_wall_snap_target(&item.catalog_ref) {
            self.apply_wall_snap(&mut item);
        }
        self.replace_item(item);
        Ok(())
    }

    fn item_for_edit(&self, id: &str) -> ControllerResult<Item> {
        self.scene
            .item(id)
            .cloned()
            .ok_or_else(|| ControllerError::UnknownItem(id.to_string()))
    }

    fn apply_wall_snap(&self, item: &mut Item) {
        let Some(result) = snap_item_to_walls(item.position(), &self.scene.walls, self.config.snap_threshold) else {
            return;
        };
        item.set_position(result.point);
        if is_door(&item.catalog_ref) {
            item.rotation = result.rotation;
        }
        item.snap = Some(result.snap);
    }

    fn replace_item(&mut self, item: Item) {
        let mut next = self.scene.clone();
        if let Some(slot) = next.items.iter_mut().find(|i| i.id == item.id) {
            *slot = item;
        }
        self.commit(next);
    }

    // ---- Walls ----

    /// Start a wall gesture. Ignored unless the wall tool is active.
    pub fn begin_wall(&mut self, point: Point) -> bool {
        if self.session.tool != ToolKind::Wall {
            return false;
        }
        self.session.draft_wall = Some(DraftWall::new(point, self.config.default_wall_thickness));
        true
    }

    /// Move the end of the draft wall. Nothing is committed.
    pub fn extend_wall(&mut self, point: Point) {
        if self.session.tool != ToolKind::Wall {
            return;
        }
        if let Some(draft) = self.session.draft_wall.as_mut() {
            draft.b = point;
        }
    }

    /// End the wall gesture.
    ///
    /// Gestures shorter than the configured minimum are discarded without a
    /// commit. Returns the new wall's id when one was created.
    pub fn finish_wall(&mut self) -> Option<ElementId> {
        if self.session.tool != ToolKind::Wall {
            return None;
        }
        let draft = self.session.draft_wall.take()?;
        if !draft.is_long_enough(self.config.min_wall_gesture) {
            log::debug!("Discarded wall gesture from {:?} to {:?}", draft.a, draft.b);
            return None;
        }

        let wall = draft.finalize();
        let id = wall.id.clone();
        let mut next = self.scene.clone();
        next.walls.push(wall);
        self.commit(next);
        Some(id)
    }

    /// Drop the draft wall without committing.
    pub fn cancel_wall(&mut self) {
        self.session.draft_wall = None;
    }

    pub fn draft_wall(&self) -> Option<&DraftWall> {
        self.session.draft_wall.as_ref()
    }

    // ---- Deletion ----

    /// Delete the selected wall or item.
    /// Returns false if nothing was selected.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.session.selected_id.take() else {
            return false;
        };
        let mut next = self.scene.clone();
        next.walls.retain(|w| w.id != id);
        next.items.retain(|i| i.id != id);
        self.commit(next);
        true
    }

    /// Remove all walls and items. Annotations are kept.
    pub fn clear_all(&mut self) {
        self.session.selected_id = None;
        self.session.draft_wall = None;
        let next = Scene::from_parts(Vec::new(), Vec::new(), self.scene.annotations.clone());
        self.commit(next);
    }

    // ---- History ----

    /// Undo the last commit. Returns false if there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        if !self.history.undo() {
            return false;
        }
        self.restore_present();
        true
    }

    /// Redo the last undone commit. Returns false if there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.history.redo() {
            return false;
        }
        self.restore_present();
        true
    }

    fn restore_present(&mut self) {
        if let Some(present) = self.history.present() {
            self.scene = present.clone();
        }
        self.session.selected_id = None;
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // ---- Import / export ----

    /// Replace the scene with a parsed domain document in a single commit.
    ///
    /// On a parse error nothing changes. On success the viewport, selection
    /// and draft are reset.
    pub fn import_value(&mut self, json: &Value) -> ControllerResult<()> {
        let parsed = domain::parse(json)?;
        log::info!(
            "Imported '{}': {} walls, {} items",
            parsed.meta.name,
            parsed.scene.walls.len(),
            parsed.scene.items.len()
        );
        self.session.reset();
        self.meta = parsed.meta;
        self.commit(parsed.scene);
        Ok(())
    }

    pub fn import_str(&mut self, json: &str) -> ControllerResult<()> {
        let value: Value = serde_json::from_str(json).map_err(DomainError::from)?;
        self.import_value(&value)
    }

    pub fn import_file(&mut self, path: &Path) -> ControllerResult<()> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| DomainError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        self.import_str(&json)
    }

    /// Build the domain document for the current scene.
    pub fn export_document(&self) -> DomainDocument {
        let mut meta = self.meta.clone();
        meta.scale = self.session.viewport.zoom;
        domain::serialize(&self.scene, &meta)
    }

    /// Deliver the domain document through `sink`.
    pub fn export_domain(&self, sink: &dyn ExportSink) -> ControllerResult<()> {
        let payload = ExportPayload::domain(&self.export_document())?;
        log::info!("Exporting {} via {}", payload.filename, sink.name());
        sink.deliver(&payload)?;
        Ok(())
    }

    /// Deliver an externally rendered snapshot through `sink`.
    pub fn export_raster(&self, sink: &dyn ExportSink, format: RasterFormat, bytes: Vec<u8>) -> ControllerResult<()> {
        let payload = ExportPayload::raster(format, bytes);
        log::info!("Exporting {} via {}", payload.filename, sink.name());
        sink.deliver(&payload)?;
        Ok(())
    }

    /// Oversampling factor the renderer should use for raster exports.
    pub fn raster_pixel_ratio(&self) -> f64 {
        self.config.raster_pixel_ratio
    }

    // ---- Viewport ----

    pub fn pan(&mut self, delta: Vec2) {
        self.session.viewport.pan(delta);
    }

    pub fn zoom_at(&mut self, screen_point: Point, direction: ZoomDirection) {
        self.session.viewport.zoom_at(screen_point, direction);
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.session.viewport.screen_to_world(screen_point)
    }

    // ---- Queries ----

    /// Items whose snap reference points at a wall that no longer exists.
    ///
    /// Deleting a wall leaves attached items' snap relation in place; this
    /// lists them.
    pub fn orphaned_snaps(&self) -> Vec<&Item> {
        self.scene.orphaned_snaps()
    }
}

/// Shared handle that serializes all access to one controller.
///
/// Concurrent commits would both read the same present snapshot and one
/// history entry would be lost, so every action runs under the lock.
#[derive(Debug, Clone, Default)]
pub struct SceneHandle {
    inner: Arc<Mutex<SceneController>>,
}

impl SceneHandle {
    pub fn new(controller: SceneController) -> Self {
        Self {
            inner: Arc::new(Mutex::new(controller)),
        }
    }

    /// Run `f` with exclusive access to the controller.
    pub fn with<R>(&self, f: impl FnOnce(&mut SceneController) -> R) -> R {
        let mut guard = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}
