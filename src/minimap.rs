//! Minimap viewport indicator.
//!
//! The minimap shows the bounding box of all entities, padded, and a
//! rectangle marking the part of it currently visible on screen. Everything
//! is expressed in percent of the padded diagram size.

use crate::model::{Entity, Point, Rect};
use crate::viewport::Viewport;

/// Padding added to the entity bounds in each dimension.
pub const MINIMAP_PADDING: f32 = 200.0;

/// Visible-region rectangle in percent of the minimap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MinimapViewport {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl MinimapViewport {
    /// Whole minimap, used for an empty diagram.
    pub const FULL: MinimapViewport = MinimapViewport {
        left: 0.0,
        top: 0.0,
        width: 100.0,
        height: 100.0,
    };
}

/// Bounding box of all entities, or `None` for an empty diagram.
pub fn diagram_bounds(entities: &[Entity]) -> Option<Rect> {
    let first = entities.first()?.rect();
    let (min, max) = entities.iter().skip(1).fold(
        (Point::new(first.x, first.y), Point::new(first.right(), first.bottom())),
        |(min, max), e| {
            let r = e.rect();
            (
                Point::new(min.x.min(r.x), min.y.min(r.y)),
                Point::new(max.x.max(r.right()), max.y.max(r.bottom())),
            )
        },
    );
    Some(Rect {
        x: min.x,
        y: min.y,
        width: max.x - min.x,
        height: max.y - min.y,
    })
}

/// Compute the minimap indicator for a canvas of `client` screen size.
pub fn minimap_viewport(
    entities: &[Entity],
    viewport: &Viewport,
    client: (f32, f32),
) -> MinimapViewport {
    let Some(bounds) = diagram_bounds(entities) else {
        return MinimapViewport::FULL;
    };
    let diagram_w = bounds.width + MINIMAP_PADDING;
    let diagram_h = bounds.height + MINIMAP_PADDING;
    let scale = viewport.scale();
    let visible_origin = viewport.to_diagram(Point::ZERO);

    MinimapViewport {
        left: (100.0 * (visible_origin.x - bounds.x) / diagram_w).max(0.0),
        top: (100.0 * (visible_origin.y - bounds.y) / diagram_h).max(0.0),
        width: (100.0 * (client.0 / diagram_w) / scale).min(100.0),
        height: (100.0 * (client.1 / diagram_h) / scale).min(100.0),
    }
}
