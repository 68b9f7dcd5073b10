use glam::{Vec2, Vec3};

use crate::scene::transform::Transform;

const EPS: f32 = 0.0001;

/// Orbit camera controller.
///
/// Keeps the camera on a sphere around [`target`](Self::target). Every
/// [`update`](Self::update) re-derives the spherical coordinates from the
/// camera's current position, so code that moves the camera directly (such as
/// a framing animation) only needs to call `update` afterwards.
pub struct OrbitControls {
    pub rotate_speed: f32,
    pub damping_factor: f32,
    pub enable_damping: bool,
    pub min_distance: f32,
    pub max_distance: f32,

    /// Look-at target
    pub target: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, measured from +Z
    pub theta: f32,
    /// Polar angle from +Y
    pub phi: f32,

    rotate_delta: Vec2,
    zoom_scale: f32,
}

impl OrbitControls {
    #[must_use]
    pub fn new(target: Vec3) -> Self {
        Self {
            rotate_speed: 1.0,
            damping_factor: 0.05,
            enable_damping: false,
            min_distance: 0.0,
            max_distance: f32::INFINITY,

            target,
            radius: 1.0,
            theta: 0.0,
            phi: std::f32::consts::FRAC_PI_2,

            rotate_delta: Vec2::ZERO,
            zoom_scale: 1.0,
        }
    }

    /// Queues an orbit by the given azimuth / polar deltas (radians).
    pub fn rotate(&mut self, delta_theta: f32, delta_phi: f32) {
        self.rotate_delta += Vec2::new(delta_theta, delta_phi) * self.rotate_speed;
    }

    /// Queues a distance change; `scale < 1` moves closer.
    pub fn dolly(&mut self, scale: f32) {
        if scale.is_finite() && scale > 0.0 {
            self.zoom_scale *= scale;
        }
    }

    /// Applies pending input to `transform` and points it at the target.
    ///
    /// `transform` is the camera node's transform; the camera is expected to
    /// live at the root level so its local position is its world position.
    pub fn update(&mut self, transform: &mut Transform) {
        let offset = transform.position - self.target;
        let distance = offset.length();
        if distance.is_finite() && distance > EPS {
            self.radius = distance;
            self.theta = offset.x.atan2(offset.z);
            self.phi = (offset.y / distance).clamp(-1.0, 1.0).acos();
        }

        if self.enable_damping {
            let delta_apply = self.rotate_delta * self.damping_factor;
            self.theta += delta_apply.x;
            self.phi += delta_apply.y;
            self.rotate_delta -= delta_apply;
        } else {
            self.theta += self.rotate_delta.x;
            self.phi += self.rotate_delta.y;
            self.rotate_delta = Vec2::ZERO;
        }

        self.phi = self.phi.clamp(EPS, std::f32::consts::PI - EPS);
        self.radius = (self.radius * self.zoom_scale).clamp(self.min_distance, self.max_distance);
        self.zoom_scale = 1.0;

        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        let offset = Vec3::new(
            self.radius * sin_phi * sin_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * cos_theta,
        );

        transform.position = self.target + offset;
        transform.look_at(self.target, Vec3::Y);
    }
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new(Vec3::ZERO)
    }
}
