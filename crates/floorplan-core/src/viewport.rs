//! Viewport pan/zoom for display.
//!
//! Scene coordinates are always stored unscaled; the viewport only maps them
//! to screen space and back.

use kurbo::{Affine, Point, Vec2};
use serde::{Deserialize, Serialize};

/// Zoom factor applied per wheel step.
pub const ZOOM_STEP: f64 = 1.05;
/// Smallest allowed zoom.
pub const MIN_ZOOM: f64 = 0.3;
/// Largest allowed zoom.
pub const MAX_ZOOM: f64 = 3.0;

/// Direction of a zoom gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

impl ZoomDirection {
    /// Map a wheel delta to a direction (scrolling down zooms out).
    pub fn from_wheel_delta(delta_y: f64) -> Self {
        if delta_y > 0.0 { ZoomDirection::Out } else { ZoomDirection::In }
    }
}

/// Current pan offset and zoom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// Screen-space translation (pan).
    pub offset: Vec2,
    /// Zoom level (1.0 = 100%).
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            zoom: 1.0,
        }
    }
}

impl Viewport {
    pub fn new() -> Self {
        Self::default()
    }

    /// World-to-screen transform.
    pub fn transform(&self) -> Affine {
        Affine::translate(self.offset) * Affine::scale(self.zoom)
    }

    /// Screen-to-world transform.
    pub fn inverse_transform(&self) -> Affine {
        Affine::scale(1.0 / self.zoom) * Affine::translate(-self.offset)
    }

    pub fn screen_to_world(&self, screen_point: Point) -> Point {
        self.inverse_transform() * screen_point
    }

    pub fn world_to_screen(&self, world_point: Point) -> Point {
        self.transform() * world_point
    }

    /// Pan by a delta in screen coordinates.
    pub fn pan(&mut self, delta: Vec2) {
        self.offset += delta;
    }

    /// Zoom one step, keeping the given screen point fixed.
    pub fn zoom_at(&mut self, screen_point: Point, direction: ZoomDirection) {
        let factor = match direction {
            ZoomDirection::In => ZOOM_STEP,
            ZoomDirection::Out => 1.0 / ZOOM_STEP,
        };
        let new_zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (new_zoom - self.zoom).abs() < f64::EPSILON {
            return;
        }

        let world_point = self.screen_to_world(screen_point);
        self.zoom = new_zoom;

        let new_screen = self.world_to_screen(world_point);
        self.offset += Vec2::new(screen_point.x - new_screen.x, screen_point.y - new_screen.y);
    }

    /// Zoom as a whole percentage for display.
    pub fn zoom_percent(&self) -> i32 {
        (self.zoom * 100.0).round() as i32
    }

    /// Reset to no pan and 100% zoom.
    pub fn reset(&mut self) {
        self.offset = Vec2::ZERO;
        self.zoom = 1.0;
    }
}
