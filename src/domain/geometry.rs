//! Zoom transforms and distance math for annotation geometry

/// Factor that maps coordinates stored at `creation_zoom` to `render_zoom`
#[inline]
pub fn scale_factor(render_zoom: f32, creation_zoom: f32) -> f32 {
    render_zoom / creation_zoom
}

/// Scale an integer stroke width, clamped to one device pixel
#[inline]
pub fn scaled_stroke_width(width: u32, scale: f32) -> f32 {
    (width as f32 * scale).max(1.0)
}

/// Axis-aligned rectangle in display pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DisplayRect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl DisplayRect {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Self {
            x1: self.x1 * scale,
            y1: self.y1 * scale,
            x2: self.x2 * scale,
            y2: self.y2 * scale,
        }
    }

    /// Closed-bounds containment; edges count as inside
    pub fn contains(&self, x: f32, y: f32) -> bool {
        let (min_x, max_x) = (self.x1.min(self.x2), self.x1.max(self.x2));
        let (min_y, max_y) = (self.y1.min(self.y2), self.y1.max(self.y2));
        min_x <= x && x <= max_x && min_y <= y && y <= max_y
    }
}

/// Two-point segment in display pixels
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Segment {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Segment {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    pub fn scaled(self, scale: f32) -> Self {
        Self {
            x1: self.x1 * scale,
            y1: self.y1 * scale,
            x2: self.x2 * scale,
            y2: self.y2 * scale,
        }
    }

    /// Euclidean distance from a point to the closest point on the segment
    ///
    /// Projects onto `A + t(B - A)` with `t` clamped to `[0, 1]`. Zero-length
    /// segments degrade to point distance.
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        let dx = self.x2 - self.x1;
        let dy = self.y2 - self.y1;
        let len_sq = dx * dx + dy * dy;
        if len_sq == 0.0 {
            return ((x - self.x1).powi(2) + (y - self.y1).powi(2)).sqrt();
        }
        let t = (((x - self.x1) * dx + (y - self.y1) * dy) / len_sq).clamp(0.0, 1.0);
        let proj_x = self.x1 + t * dx;
        let proj_y = self.y1 + t * dy;
        ((x - proj_x).powi(2) + (y - proj_y).powi(2)).sqrt()
    }
}
