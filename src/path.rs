use crate::model::Point;

/// Cubic bezier curve
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub p0: Point, // Start anchor
    pub p1: Point, // Control point 1
    pub p2: Point, // Control point 2
    pub p3: Point, // End anchor
}

impl CubicBezier {
    pub fn new(p0: Point, p1: Point, p2: Point, p3: Point) -> Self {
        Self { p0, p1, p2, p3 }
    }

    /// Evaluate the bezier curve at parameter t (0.0 to 1.0)
    pub fn eval(&self, t: f32) -> Point {
        let t2 = t * t;
        let t3 = t2 * t;
        let mt = 1.0 - t;
        let mt2 = mt * mt;
        let mt3 = mt2 * mt;

        let x = mt3 * self.p0.x
            + 3.0 * mt2 * t * self.p1.x
            + 3.0 * mt * t2 * self.p2.x
            + t3 * self.p3.x;
        let y = mt3 * self.p0.y
            + 3.0 * mt2 * t * self.p1.y
            + 3.0 * mt * t2 * self.p2.y
            + t3 * self.p3.y;

        Point::new(x, y)
    }

    /// Tangent angle (radians) leaving the start anchor, towards the first control point.
    pub fn start_angle(&self) -> f32 {
        (self.p1.y - self.p0.y).atan2(self.p1.x - self.p0.x)
    }

    /// Tangent angle (radians) arriving at the end anchor, from the second control point.
    pub fn end_angle(&self) -> f32 {
        (self.p3.y - self.p2.y).atan2(self.p3.x - self.p2.x)
    }

    /// SVG path command, e.g. `"M 0 50 C 40 50 60 80 100 80"`.
    pub fn to_svg_path(&self) -> String {
        format!(
            "M {} {} C {} {} {} {} {} {}",
            self.p0.x, self.p0.y, self.p1.x, self.p1.y, self.p2.x, self.p2.y, self.p3.x, self.p3.y
        )
    }

    /// Map every point through `f` (e.g. diagram → screen).
    pub fn map(&self, f: impl Fn(Point) -> Point) -> Self {
        Self::new(f(self.p0), f(self.p1), f(self.p2), f(self.p3))
    }
}

/// Calculate squared distance from a point to a line segment
fn distance_to_line_segment_sq(point: Point, a: Point, b: Point) -> f32 {
    let ab = b - a;
    let ap = point - a;

    let ab_len_sq = ab.x * ab.x + ab.y * ab.y;

    if ab_len_sq < f32::EPSILON {
        // Degenerate segment (a == b)
        return ap.x * ap.x + ap.y * ap.y;
    }

    // Project point onto line, clamped to segment
    let t = ((ap.x * ab.x + ap.y * ab.y) / ab_len_sq).clamp(0.0, 1.0);

    let closest = a + ab * t;
    let d = point - closest;
    d.x * d.x + d.y * d.y
}

/// Calculate the minimum distance from a point to a cubic bezier curve
///
/// Uses subdivision approach: sample curve at regular intervals and find closest point.
///
/// # Arguments
/// * `point` - The point to measure distance from
/// * `bezier` - The bezier curve
/// * `num_samples` - Number of samples for distance calculation (default: 20)
pub fn distance_to_bezier(point: Point, bezier: &CubicBezier, num_samples: usize) -> f32 {
    let num_samples = if num_samples == 0 { 20 } else { num_samples };

    let mut min_dist_sq = f32::MAX;
    let mut prev_point = bezier.eval(0.0);

    for i in 1..=num_samples {
        let t = i as f32 / num_samples as f32;
        let curr_point = bezier.eval(t);

        let dist_sq = distance_to_line_segment_sq(point, prev_point, curr_point);
        if dist_sq < min_dist_sq {
            min_dist_sq = dist_sq;
        }

        prev_point = curr_point;
    }

    min_dist_sq.sqrt()
}
