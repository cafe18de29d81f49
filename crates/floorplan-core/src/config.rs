//! Editor configuration.

use crate::catalog::Catalog;
use crate::model::DEFAULT_WALL_THICKNESS;
use crate::session::MIN_WALL_GESTURE;
use crate::snap::WALL_SNAP_THRESHOLD;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Number of undo steps kept by an editing session.
pub const SESSION_HISTORY_LIMIT: usize = 80;

/// Oversampling factor used for raster exports.
pub const RASTER_PIXEL_RATIO: f64 = 3.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Tunables for an editing session. Missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    /// Name given to new projects.
    pub project_name: String,
    pub history_limit: usize,
    /// Wall snap radius in drawing units.
    pub snap_threshold: f64,
    pub default_wall_thickness: f64,
    /// Shortest wall gesture (Manhattan distance) that creates a wall.
    pub min_wall_gesture: f64,
    pub raster_pixel_ratio: f64,
    pub catalog: Catalog,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            project_name: "Floorplan".to_string(),
            history_limit: SESSION_HISTORY_LIMIT,
            snap_threshold: WALL_SNAP_THRESHOLD,
            default_wall_thickness: DEFAULT_WALL_THICKNESS,
            min_wall_gesture: MIN_WALL_GESTURE,
            raster_pixel_ratio: RASTER_PIXEL_RATIO,
            catalog: Catalog::builtin(),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}
