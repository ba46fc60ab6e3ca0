//! Position correction while dragging: grid snap or magnetic alignment.
//!
//! Grid snapping and magnetic snapping are mutually exclusive. Magnetic
//! snapping compares the dragged entity's center lines and edges with those of
//! every other entity, one axis at a time. When several entities are within
//! the threshold, the one visited last wins, so the outcome depends on the
//! order of `others`.

use crate::grid::snap_point;
use crate::model::{Entity, Point};

/// Result of a magnetic snap: which axes were pulled into alignment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MagneticSnap {
    pub position: Point,
    pub snapped_x: bool,
    pub snapped_y: bool,
}

/// Align a dragged rectangle of `size` at `proposed` with the other entities.
///
/// Checks, per entity and in this order: center-x, center-y, left, right,
/// top, bottom. A delta strictly below `threshold` snaps that axis.
pub fn magnetic_snap<'a, I>(
    proposed: Point,
    size: (f32, f32),
    others: I,
    threshold: f32,
) -> MagneticSnap
where
    I: IntoIterator<Item = &'a Entity>,
{
    let (width, height) = size;
    let mut result = MagneticSnap {
        position: proposed,
        snapped_x: false,
        snapped_y: false,
    };

    for other in others {
        let r = other.rect();

        let other_cx = r.x + r.width / 2.0;
        if (other_cx - (proposed.x + width / 2.0)).abs() < threshold {
            result.position.x = other_cx - width / 2.0;
            result.snapped_x = true;
        }

        let other_cy = r.y + r.height / 2.0;
        if (other_cy - (proposed.y + height / 2.0)).abs() < threshold {
            result.position.y = other_cy - height / 2.0;
            result.snapped_y = true;
        }

        if (r.x - proposed.x).abs() < threshold {
            result.position.x = r.x;
            result.snapped_x = true;
        }

        if (r.right() - (proposed.x + width)).abs() < threshold {
            result.position.x = r.right() - width;
            result.snapped_x = true;
        }

        if (r.y - proposed.y).abs() < threshold {
            result.position.y = r.y;
            result.snapped_y = true;
        }

        if (r.bottom() - (proposed.y + height)).abs() < threshold {
            result.position.y = r.bottom() - height;
            result.snapped_y = true;
        }
    }

    result
}

/// Snapping policy applied to every live drag position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapEngine {
    pub snap_to_grid: bool,
    pub grid_size: f32,
    pub threshold: f32,
}

impl SnapEngine {
    /// Correct a proposed position for `dragged`: grid snap when enabled,
    /// magnetic alignment against every other entity otherwise.
    pub fn apply(&self, dragged: &Entity, proposed: Point, entities: &[Entity]) -> Point {
        if self.snap_to_grid {
            return snap_point(proposed, self.grid_size);
        }
        let others = entities.iter().filter(|e| e.id != dragged.id);
        magnetic_snap(proposed, (dragged.width, dragged.height), others, self.threshold).position
    }
}
