use crate::camera::Axis;
use glam::{DQuat, DVec3};

const MIN_MAGNIFICATION: f64 = 1.0e-4;
const MAX_MAGNIFICATION: f64 = 1.0e4;

/// View transform used by the free 3D navigation model.
///
/// `orientation` maps world directions into view space (x right, y up, z towards the viewer).
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    orientation: DQuat,
    magnification: f64,
    viewport: (u32, u32),
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self { orientation: DQuat::IDENTITY, magnification: 1.0, viewport: (0, 0) };
        camera.set_angles(-30.0, 25.0, 0.0);
        camera
    }
}

impl Camera {
    pub fn orientation(&self) -> DQuat {
        self.orientation
    }

    pub fn viewport(&mut self, width: u32, height: u32) {
        self.viewport = (width, height);
    }

    pub fn aspect(&self) -> f64 {
        let (width, height) = self.viewport;
        if width == 0 {
            1.0
        } else {
            height as f64 / width as f64
        }
    }

    /// Rotates about the view x axis by `ax`, the view y axis by `ay` and the world z axis by `az`
    /// (radians).
    pub fn rotate(&mut self, ax: f64, ay: f64, az: f64) {
        let view = DQuat::from_rotation_x(ax) * DQuat::from_rotation_y(ay);
        self.orientation = (view * self.orientation * DQuat::from_rotation_z(az)).normalize();
    }

    /// Replaces the orientation with a preset. Angles are in degrees: azimuth around world z,
    /// elevation above the xy plane, then roll around the view axis.
    pub fn set_angles(&mut self, azimuth: f64, elevation: f64, roll: f64) {
        let tilt = DQuat::from_rotation_x(-(90.0 - elevation).to_radians());
        let spin = DQuat::from_rotation_z(-azimuth.to_radians());
        let roll = DQuat::from_rotation_z(roll.to_radians());
        self.orientation = (roll * tilt * spin).normalize();
    }

    /// Multiplies the viewing distance by `factor`; values below one move closer.
    pub fn zoom(&mut self, factor: f64) {
        if factor <= 0.0 || !factor.is_finite() {
            return;
        }
        self.magnification = (self.magnification / factor).clamp(MIN_MAGNIFICATION, MAX_MAGNIFICATION);
    }

    pub fn scale_factor(&self) -> f64 {
        self.magnification
    }

    /// Direction in world space of a view space vector.
    pub fn view_to_world(&self, view: DVec3) -> DVec3 {
        self.orientation.inverse() * view
    }

    /// Translates the axis center along the camera's screen directions.
    pub fn move_axis(&self, axis: &mut Axis, dx: f64, dy: f64, dz: f64) {
        let world = self.view_to_world(DVec3::new(dx, dy, dz));
        axis.translate(world.x, world.y, world.z);
    }
}
