//! Screen ⇄ diagram coordinate mapping.
//!
//! Diagram space is where entities live; screen space is viewport pixels.
//! The mapping is `screen = diagram * zoom / 100 + pan`.

use crate::model::Point;

/// Map a diagram-space point to screen space.
pub fn to_screen(p: Point, pan: Point, zoom_percent: i32) -> Point {
    let z = scale(zoom_percent);
    Point::new(p.x * z + pan.x, p.y * z + pan.y)
}

/// Map a screen-space point to diagram space. Inverse of [`to_screen`].
pub fn to_diagram(s: Point, pan: Point, zoom_percent: i32) -> Point {
    let z = scale(zoom_percent);
    Point::new((s.x - pan.x) / z, (s.y - pan.y) / z)
}

fn scale(zoom_percent: i32) -> f32 {
    if zoom_percent > 0 {
        zoom_percent as f32 / 100.0
    } else {
        1.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoomDirection {
    In,
    Out,
}

/// Pan offset and zoom level of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    zoom: i32,
    pan: Point,
    min_zoom: i32,
    max_zoom: i32,
    step: i32,
    pan_anchor: Option<Point>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(30, 200, 10)
    }
}

impl Viewport {
    pub fn new(min_zoom: i32, max_zoom: i32, step: i32) -> Self {
        Self {
            zoom: 100,
            pan: Point::ZERO,
            min_zoom,
            max_zoom,
            step,
            pan_anchor: None,
        }
    }

    /// Zoom level in percent.
    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    /// Zoom as a scale factor (1.0 at 100 %).
    pub fn scale(&self) -> f32 {
        scale(self.zoom)
    }

    pub fn pan(&self) -> Point {
        self.pan
    }

    pub fn to_screen(&self, p: Point) -> Point {
        to_screen(p, self.pan, self.zoom)
    }

    pub fn to_diagram(&self, s: Point) -> Point {
        to_diagram(s, self.pan, self.zoom)
    }

    /// Step the zoom one increment and clamp it. Returns the new zoom.
    ///
    /// Wheel and keyboard zooming both go through here.
    pub fn step_zoom(&mut self, direction: ZoomDirection) -> i32 {
        self.zoom = match direction {
            ZoomDirection::In => (self.zoom + self.step).min(self.max_zoom),
            ZoomDirection::Out => (self.zoom - self.step).max(self.min_zoom),
        };
        self.zoom
    }

    /// Zoom for a wheel event; negative `delta_y` (scrolling up) zooms in.
    pub fn wheel_zoom(&mut self, delta_y: f32) -> i32 {
        if delta_y < 0.0 {
            self.step_zoom(ZoomDirection::In)
        } else {
            self.step_zoom(ZoomDirection::Out)
        }
    }

    pub fn reset(&mut self) {
        self.zoom = 100;
        self.pan = Point::ZERO;
        self.pan_anchor = None;
    }

    pub fn set_pan(&mut self, pan: Point) {
        self.pan = pan;
    }

    // === Panning ===

    /// Begin a pan gesture at the given screen point.
    pub fn begin_pan(&mut self, pointer: Point) {
        self.pan_anchor = Some(pointer);
    }

    /// Move the pan by the pointer delta since the last call. Returns `false`
    /// when no pan gesture is active.
    pub fn update_pan(&mut self, pointer: Point) -> bool {
        let Some(anchor) = self.pan_anchor else {
            return false;
        };
        self.pan = self.pan + (pointer - anchor);
        self.pan_anchor = Some(pointer);
        true
    }

    pub fn end_pan(&mut self) {
        self.pan_anchor = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan_anchor.is_some()
    }
}
