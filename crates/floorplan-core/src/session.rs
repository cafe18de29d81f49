//! Transient editing state that is not part of history.

use crate::geometry::manhattan;
use crate::model::{ElementId, Wall};
use crate::viewport::Viewport;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Gestures shorter than this (Manhattan distance) are treated as clicks.
pub const MIN_WALL_GESTURE: f64 = 6.0;

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ToolKind {
    /// Select items and pan the canvas.
    #[default]
    Select,
    /// Draw walls.
    Wall,
}

/// A wall being drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftWall {
    pub a: Point,
    pub b: Point,
    pub thickness: f64,
}

impl DraftWall {
    /// Open a draft anchored at `start`.
    pub fn new(start: Point, thickness: f64) -> Self {
        Self {
            a: start,
            b: start,
            thickness,
        }
    }

    /// Check if the gesture is long enough to become a wall.
    pub fn is_long_enough(&self, min_gesture: f64) -> bool {
        manhattan(self.a, self.b) >= min_gesture
    }

    /// Turn the draft into a wall with a fresh id.
    pub fn finalize(&self) -> Wall {
        Wall::new(self.a, self.b, self.thickness)
    }
}

/// Per-session UI state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub tool: ToolKind,
    pub selected_id: Option<ElementId>,
    pub draft_wall: Option<DraftWall>,
    pub viewport: Viewport,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tools. Any in-progress draft is dropped.
    pub fn set_tool(&mut self, tool: ToolKind) {
        self.tool = tool;
        self.draft_wall = None;
    }

    /// Forget selection and draft, and reset the viewport.
    pub fn reset(&mut self) {
        self.selected_id = None;
        self.draft_wall = None;
        self.viewport.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_micro_gesture() {
        let mut draft = DraftWall::new(Point::new(0.0, 0.0), 12.0);
        draft.b = Point::new(2.0, 3.0);
        assert!(!draft.is_long_enough(MIN_WALL_GESTURE));
        draft.b = Point::new(3.0, 3.0);
        assert!(draft.is_long_enough(MIN_WALL_GESTURE));
    }

    #[test]
    fn test_finalize_keeps_geometry() {
        let mut draft = DraftWall::new(Point::new(1.0, 2.0), 12.0);
        draft.b = Point::new(100.0, 2.0);
        let wall = draft.finalize();
        assert!(wall.id.starts_with("W-"));
        assert_eq!((wall.a, wall.b, wall.thickness), (draft.a, draft.b, 12.0));
    }

    #[test]
    fn test_set_tool_drops_draft() {
        let mut session = SessionState::new();
        session.set_tool(ToolKind::Wall);
        session.draft_wall = Some(DraftWall::new(Point::ZERO, 12.0));
        session.set_tool(ToolKind::Select);
        assert!(session.draft_wall.is_none());
    }

    #[test]
    fn test_session_serializes() {
        let mut session = SessionState::new();
        session.selected_id = Some("W-1".into());
        let json = serde_json::to_string(&session).unwrap();
        let back: SessionState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, session);
    }
}
