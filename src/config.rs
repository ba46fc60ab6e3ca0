//! Tunable constants for the diagram editor.

/// Configuration for a [`DiagramSession`](crate::DiagramSession).
///
/// All distances are in diagram-space pixels unless noted otherwise.
/// Marked `#[non_exhaustive]` so new knobs can be added without breaking
/// callers; start from [`EditorConfig::default()`] and override fields.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub struct EditorConfig {
    /// Grid spacing used for grid snapping (default: 20.0).
    pub grid_size: f32,
    /// Whether grid snapping starts enabled (default: true).
    pub snap_to_grid: bool,
    /// Magnetic alignment threshold (default: 10.0). A delta must be strictly
    /// smaller than this to snap.
    pub magnetic_threshold: f32,
    /// Lower zoom bound in percent (default: 30).
    pub min_zoom: i32,
    /// Upper zoom bound in percent (default: 200).
    pub max_zoom: i32,
    /// Zoom step in percent (default: 10).
    pub zoom_step: i32,
    /// Width of newly created entities (default: 200.0).
    pub entity_width: f32,
    /// Height of newly created entities (default: 150.0).
    pub entity_height: f32,
    /// Height of the entity header above the first attribute row (default: 45.0).
    pub header_height: f32,
    /// Height of one attribute row (default: 35.0).
    pub row_height: f32,
    /// Screen point used by `add_entity(None)`, before adding the pan offset
    /// (default: (50, 50)).
    pub default_spawn: (f32, f32),
    /// Distance of cardinality markers from their anchor (default: 12.0).
    pub marker_distance: f32,
    /// Half-length of marker strokes (default: 8.0).
    pub marker_size: f32,
    /// Half-length of marker strokes while the relationship is hovered (default: 10.0).
    pub marker_size_hovered: f32,
    /// Upper bound on the control-point offset of relationship curves (default: 100.0).
    pub max_control_offset: f32,
    /// Control-point offset as a fraction of anchor distance (default: 0.4).
    pub control_offset_ratio: f32,
    /// Maximum number of inertia frames after a drag (default: 20).
    pub inertia_frames: u32,
    /// Per-frame damping applied to the release velocity (default: 0.95).
    pub inertia_damping: f32,
    /// Pointer idle time after which no glide is started, in ms (default: 100).
    pub inertia_max_idle_ms: u64,
    /// Screen-space distance within which a click hits a relationship (default: 8.0).
    pub relationship_hit_distance: f32,
    /// Number of samples used when measuring distance to a curve (default: 20).
    pub hit_samples: usize,
    /// Opacity of the drag ghost (default: 0.3).
    pub ghost_opacity: f32,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            grid_size: 20.0,
            snap_to_grid: true,
            magnetic_threshold: 10.0,
            min_zoom: 30,
            max_zoom: 200,
            zoom_step: 10,
            entity_width: 200.0,
            entity_height: 150.0,
            header_height: 45.0,
            row_height: 35.0,
            default_spawn: (50.0, 50.0),
            marker_distance: 12.0,
            marker_size: 8.0,
            marker_size_hovered: 10.0,
            max_control_offset: 100.0,
            control_offset_ratio: 0.4,
            inertia_frames: 20,
            inertia_damping: 0.95,
            inertia_max_idle_ms: 100,
            relationship_hit_distance: 8.0,
            hit_samples: 20,
            ghost_opacity: 0.3,
        }
    }
}

impl EditorConfig {
    /// Default config with a different grid size.
    pub fn with_grid_size(grid_size: f32) -> Self {
        Self {
            grid_size,
            ..Self::default()
        }
    }

    /// Default config with grid snapping initially off.
    pub fn without_grid_snap() -> Self {
        Self {
            snap_to_grid: false,
            ..Self::default()
        }
    }
}
