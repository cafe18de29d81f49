//! Snap functionality for attaching items to walls.

use crate::geometry::{angle_deg, closest_point_on_segment, dist2};
use crate::model::{SnapRef, Wall};
use kurbo::Point;

/// Distance threshold for wall snapping (in drawing units).
pub const WALL_SNAP_THRESHOLD: f64 = 45.0;

/// Result of snapping an item to a wall.
#[derive(Debug, Clone, PartialEq)]
pub struct WallSnap {
    /// Relation to record on the item.
    pub snap: SnapRef,
    /// The snapped position (closest point on the wall).
    pub point: Point,
    /// Orientation of the wall in degrees.
    pub rotation: f64,
}

/// Snap a point to the nearest wall within `threshold`.
///
/// Every wall is measured by the closest point on its segment. The strictly
/// nearest wall wins, so ties go to the wall that comes first in `walls`.
/// Returns `None` when there are no walls or when the nearest squared distance
/// is not below `threshold²`.
///
/// The returned rotation is the wall's own direction (`a -> b`) no matter
/// which side the point approached from.
pub fn snap_item_to_walls(point: Point, walls: &[Wall], threshold: f64) -> Option<WallSnap> {
    let mut best: Option<(&Wall, Point, f64)> = None;

    for wall in walls {
        let closest = closest_point_on_segment(wall.a, wall.b, point).point;
        let d2 = dist2(point, closest);
        if best.is_none_or(|(_, _, best_d2)| d2 < best_d2) {
            best = Some((wall, closest, d2));
        }
    }

    let (wall, closest, d2) = best?;
    if d2 >= threshold * threshold {
        return None;
    }

    Some(WallSnap {
        snap: SnapRef::wall(wall.id.clone(), closest),
        point: closest,
        rotation: angle_deg(wall.a, wall.b),
    })
}
