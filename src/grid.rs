use crate::model::Point;

/// Round a coordinate to the nearest multiple of `grid_size`.
pub fn snap_value(value: f32, grid_size: f32) -> f32 {
    if grid_size <= 0.0 {
        return value;
    }
    (value / grid_size).round() * grid_size
}

/// Snap both coordinates of a point to the grid.
pub fn snap_point(p: Point, grid_size: f32) -> Point {
    Point::new(snap_value(p.x, grid_size), snap_value(p.y, grid_size))
}

/// Snap a point only when grid snapping is enabled.
pub fn snap_if(p: Point, enabled: bool, grid_size: f32) -> Point {
    if enabled {
        snap_point(p, grid_size)
    } else {
        p
    }
}

/// Grid overlay opacity: stronger while an entity is being dragged.
pub fn overlay_opacity(dragging: bool) -> f32 {
    if dragging {
        0.3
    } else {
        0.1
    }
}

/// Generate SVG path commands for the grid overlay
///
/// Creates a string of SVG path commands for rendering an infinite grid
/// that follows pan and zoom.
///
/// # Arguments
/// * `width` - Canvas width in pixels
/// * `height` - Canvas height in pixels
/// * `scale` - Zoom as a scale factor (1.0 at 100 %)
/// * `pan` - Pan offset in pixels
/// * `spacing` - Grid spacing in diagram space
///
/// # Returns
/// SVG path commands string (e.g., "M 20 0 L 20 600 M 40 0 L 40 600...")
pub fn generate_grid_commands(
    width: f32,
    height: f32,
    scale: f32,
    pan: Point,
    spacing: f32,
) -> String {
    let effective_spacing = spacing * scale;

    // Too dense to be useful
    if effective_spacing < 4.0 {
        return String::new();
    }

    let offset_x = pan.x.rem_euclid(effective_spacing);
    let offset_y = pan.y.rem_euclid(effective_spacing);

    let mut commands = String::with_capacity(10000);

    let mut x = offset_x;
    while x < width + effective_spacing {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M {} 0 L {} {}", x, x, height));
        x += effective_spacing;
    }

    let mut y = offset_y;
    while y < height + effective_spacing {
        commands.push(' ');
        commands.push_str(&format!("M 0 {} L {} {}", y, width, y));
        y += effective_spacing;
    }

    commands
}
