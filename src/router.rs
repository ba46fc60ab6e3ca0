//! Relationship routing.
//!
//! Computes the curve and cardinality markers for every relationship from the
//! current entity layout. Routing is a pure function of the store: nothing is
//! cached and nothing is written back. A relationship whose endpoint entity or
//! attribute has disappeared simply produces no route.
//!
//! # Example
//!
//! ```ignore
//! use erd_canvas::{route_all, RouterConfig};
//!
//! let config = RouterConfig::from(&editor_config).with_grid(Some(20.0));
//! for route in route_all(session.store(), &config, None) {
//!     draw_path(&route.curve.to_svg_path());
//!     draw_path(&route.from_marker.to_svg_path());
//!     draw_path(&route.to_marker.to_svg_path());
//! }
//! ```

use std::f32::consts::FRAC_PI_2;

use crate::config::EditorConfig;
use crate::grid::snap_point;
use crate::model::{Cardinality, Entity, Point, Relationship, RelationshipId, RelationshipType};
use crate::path::CubicBezier;
use crate::store::DiagramStore;
use crate::viewport::Viewport;

/// Geometry parameters for routing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RouterConfig {
    pub header_height: f32,
    pub row_height: f32,
    /// Grid size when grid snapping is on.
    pub grid: Option<f32>,
    pub max_control_offset: f32,
    pub control_offset_ratio: f32,
    pub marker_distance: f32,
    pub marker_size: f32,
    pub marker_size_hovered: f32,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for RouterConfig {
    fn from(config: &EditorConfig) -> Self {
        Self {
            header_height: config.header_height,
            row_height: config.row_height,
            grid: config.snap_to_grid.then_some(config.grid_size),
            max_control_offset: config.max_control_offset,
            control_offset_ratio: config.control_offset_ratio,
            marker_distance: config.marker_distance,
            marker_size: config.marker_size,
            marker_size_hovered: config.marker_size_hovered,
        }
    }
}

impl RouterConfig {
    pub fn with_grid(mut self, grid: Option<f32>) -> Self {
        self.grid = grid;
        self
    }

    fn snap(&self, p: Point) -> Point {
        match self.grid {
            Some(size) => snap_point(p, size),
            None => p,
        }
    }
}

/// The four candidate anchor points for one attribute row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowAnchors {
    pub left: Point,
    pub right: Point,
    pub top: Point,
    pub bottom: Point,
}

/// Anchor candidates for the attribute at `index` of `entity`.
pub fn row_anchors(entity: &Entity, index: usize, config: &RouterConfig) -> RowAnchors {
    let i = index as f32;
    let Point { x, y } = entity.position;
    let row_mid = y + config.header_height + i * config.row_height + config.row_height / 2.0;
    let top_offset = if index > 0 {
        i * config.row_height / 2.0
    } else {
        0.0
    };
    let top_y = y + config.header_height / 2.0 + top_offset;

    RowAnchors {
        left: Point::new(x, row_mid),
        right: Point::new(x + entity.width, row_mid),
        top: Point::new(x + entity.width / 2.0, top_y),
        bottom: Point::new(
            x + entity.width / 2.0,
            y + config.header_height + (i + 1.0) * config.row_height,
        ),
    }
}

/// Pick facing anchors by comparing entity centers: left/right when the
/// horizontal separation dominates, top/bottom otherwise.
pub fn choose_anchors(
    from: &Entity,
    from_row: &RowAnchors,
    to: &Entity,
    to_row: &RowAnchors,
) -> (Point, Point) {
    let d = to.rect().center() - from.rect().center();
    if d.x.abs() > d.y.abs() {
        if d.x > 0.0 {
            (from_row.right, to_row.left)
        } else {
            (from_row.left, to_row.right)
        }
    } else if d.y > 0.0 {
        (from_row.bottom, to_row.top)
    } else {
        (from_row.top, to_row.bottom)
    }
}

/// Control points pushed out from each anchor along the dominant axis of the
/// anchor-to-anchor vector, with a slight lean along the minor axis.
pub fn control_points(start: Point, end: Point, config: &RouterConfig) -> (Point, Point) {
    let d = end - start;
    let angle = d.y.atan2(d.x);
    let length = config
        .max_control_offset
        .min(d.length() * config.control_offset_ratio);
    let (cos, sin) = (angle.cos(), angle.sin());

    let offset = if d.x.abs() > d.y.abs() {
        Point::new(cos * length, sin * length * 0.2)
    } else {
        Point::new(cos * length * 0.2, sin * length)
    };
    (start + offset, end - offset)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerShape {
    /// Single stroke across the curve.
    Bar { a: Point, b: Point },
    /// Two strokes converging on the anchor, plus a stem from the marker point.
    CrowsFoot { a: Point, b: Point, tip: Point, stem: Point },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub center: Point,
    /// Tangent direction in radians.
    pub angle: f32,
    pub shape: MarkerShape,
}

impl Marker {
    /// Map every point through `f`, e.g. diagram to screen.
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        let shape = match self.shape {
            MarkerShape::Bar { a, b } => MarkerShape::Bar { a: f(a), b: f(b) },
            MarkerShape::CrowsFoot { a, b, tip, stem } => MarkerShape::CrowsFoot {
                a: f(a),
                b: f(b),
                tip: f(tip),
                stem: f(stem),
            },
        };
        Self {
            center: f(self.center),
            angle: self.angle,
            shape,
        }
    }

    pub fn to_svg_path(&self) -> String {
        match self.shape {
            MarkerShape::Bar { a, b } => format!("M {} {} L {} {}", a.x, a.y, b.x, b.y),
            MarkerShape::CrowsFoot { a, b, tip, stem } => format!(
                "M {} {} L {} {} L {} {} M {} {} L {} {}",
                a.x, a.y, tip.x, tip.y, b.x, b.y, stem.x, stem.y, tip.x, tip.y
            ),
        }
    }
}

fn marker(
    center: Point,
    angle: f32,
    anchor: Point,
    cardinality: Cardinality,
    size: f32,
    config: &RouterConfig,
) -> Marker {
    let perp = angle + FRAC_PI_2;
    let spread = Point::new(perp.cos(), perp.sin()) * size;
    let a = config.snap(center + spread);
    let b = config.snap(center - spread);
    let shape = match cardinality {
        Cardinality::One => MarkerShape::Bar { a, b },
        Cardinality::Many => MarkerShape::CrowsFoot {
            a,
            b,
            tip: anchor,
            stem: center,
        },
    };
    Marker { center, angle, shape }
}

/// Full geometry of one relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct RelationshipRoute {
    pub id: RelationshipId,
    pub rel_type: RelationshipType,
    pub curve: CubicBezier,
    pub from_marker: Marker,
    pub to_marker: Marker,
}

impl RelationshipRoute {
    /// The same route in screen space.
    pub fn to_screen(&self, viewport: &Viewport) -> Self {
        let f = |p| viewport.to_screen(p);
        Self {
            id: self.id,
            rel_type: self.rel_type,
            curve: self.curve.map(f),
            from_marker: self.from_marker.map(f),
            to_marker: self.to_marker.map(f),
        }
    }
}

/// Route a relationship, or `None` if an endpoint no longer exists.
pub fn route(
    store: &DiagramStore,
    relationship: &Relationship,
    config: &RouterConfig,
    hovered: bool,
) -> Option<RelationshipRoute> {
    let from = store.entity(relationship.from.entity)?;
    let to = store.entity(relationship.to.entity)?;
    let from_index = from.attribute_index(&relationship.from.attribute)?;
    let to_index = to.attribute_index(&relationship.to.attribute)?;

    let from_row = row_anchors(from, from_index, config);
    let to_row = row_anchors(to, to_index, config);
    let (start, end) = choose_anchors(from, &from_row, to, &to_row);
    let (start, end) = (config.snap(start), config.snap(end));

    let (cp1, cp2) = control_points(start, end, config);
    let (cp1, cp2) = (config.snap(cp1), config.snap(cp2));
    let curve = CubicBezier::new(start, cp1, cp2, end);

    let from_angle = curve.start_angle();
    let to_angle = curve.end_angle();
    let from_dir = Point::new(from_angle.cos(), from_angle.sin());
    let to_dir = Point::new(to_angle.cos(), to_angle.sin());
    let from_center = config.snap(start + from_dir * config.marker_distance);
    let to_center = config.snap(end - to_dir * config.marker_distance);

    let size = if hovered {
        config.marker_size_hovered
    } else {
        config.marker_size
    };
    let (from_card, to_card) = relationship.rel_type.ends();

    Some(RelationshipRoute {
        id: relationship.id,
        rel_type: relationship.rel_type,
        curve,
        from_marker: marker(from_center, from_angle, start, from_card, size, config),
        to_marker: marker(to_center, to_angle, end, to_card, size, config),
    })
}

/// Route every relationship that still has both endpoints.
pub fn route_all(
    store: &DiagramStore,
    config: &RouterConfig,
    hovered: Option<RelationshipId>,
) -> Vec<RelationshipRoute> {
    store
        .relationships()
        .iter()
        .filter_map(|r| route(store, r, config, hovered == Some(r.id)))
        .collect()
}
