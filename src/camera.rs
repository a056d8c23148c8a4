use glam::{DVec2, DVec3};

/// Secondary scale/offset layered on top of the axis for detail inspection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InRange {
    pub center: DVec2,
    pub scale: f64,
}

impl Default for InRange {
    fn default() -> Self {
        Self { center: DVec2::ZERO, scale: 1.0 }
    }
}

/// Rectangular coordinate frame of a plot.
///
/// `range` holds half extents, so the visible x interval is `center.x ± range.x`.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    center: DVec3,
    range: DVec3,
    home_center: DVec3,
    in_range: InRange,
}

impl Default for Axis {
    fn default() -> Self {
        Self::new(DVec3::ZERO, DVec3::ONE)
    }
}

impl Axis {
    pub fn new(center: DVec3, range: DVec3) -> Self {
        debug_assert!(range.min_element() > 0.0, "axis ranges must be positive");
        Self { center, range, home_center: center, in_range: InRange::default() }
    }

    pub fn center(&self) -> DVec3 {
        self.center
    }

    pub fn range(&self) -> DVec3 {
        self.range
    }

    pub fn in_range(&self) -> InRange {
        self.in_range
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        self.center += DVec3::new(dx, dy, dz);
    }

    /// Scales every range by `factor`; values below one zoom in.
    pub fn zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.range *= factor;
    }

    pub fn in_move(&mut self, dx: f64, dy: f64) {
        self.in_range.center += DVec2::new(dx, dy);
    }

    pub fn in_zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.in_range.scale *= factor;
    }

    pub fn reset_center(&mut self) {
        self.center = self.home_center;
    }

    /// Width of one viewport pixel in world units along x.
    pub fn pixel_size(&self, viewport_width: u32) -> f64 {
        if viewport_width == 0 {
            return 0.0;
        }
        2.0 * self.range.x / viewport_width as f64
    }

    /// Maps a viewport pixel to `[-1, 1]` on both axes, y growing upward.
    pub fn pixel_to_unit(pixel: DVec2, width: u32, height: u32) -> Option<DVec2> {
        if width == 0 || height == 0 {
            return None;
        }
        Some(DVec2::new(2.0 * pixel.x / width as f64 - 1.0, 1.0 - 2.0 * pixel.y / height as f64))
    }

    pub fn unit_to_world(&self, unit: DVec2) -> DVec2 {
        DVec2::new(unit.x * self.range.x + self.center.x, unit.y * self.range.y + self.center.y)
    }

    pub fn view_to_world(&self, pixel: DVec2, width: u32, height: u32) -> Option<DVec2> {
        Self::pixel_to_unit(pixel, width, height).map(|unit| self.unit_to_world(unit))
    }
}
