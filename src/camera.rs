//! Orbit camera.
//!
//! Stock yaw/pitch/radius state around a target point, with the initial pose
//! saved for reset. Exposes the view matrix and eye position the render
//! frame consumes; the input-to-motion mapping lives in the app layer.

use glam::{Mat4, Vec3};

pub struct OrbitCamera {
    radius: f32,
    /// Degrees.
    yaw: f32,
    /// Degrees, clamped to avoid the poles.
    pitch: f32,
    target: Vec3,

    // Initial pose captured at construction, restored by `reset`.
    init_radius: f32,
    init_yaw: f32,
    init_pitch: f32,
    init_target: Vec3,
}

impl OrbitCamera {
    pub const ZOOM_SPEED: f32 = 0.25;
    pub const PAN_SPEED: f32 = 0.005;
    pub const ROTATE_SPEED: f32 = 0.1;
    pub const MIN_RADIUS: f32 = 0.01;
    pub const MAX_RADIUS: f32 = 100.0;

    #[must_use]
    pub fn new() -> Self {
        let (radius, yaw, pitch, target) = (1.0, -90.0, 0.0, Vec3::ZERO);
        Self {
            radius,
            yaw,
            pitch,
            target,
            init_radius: radius,
            init_yaw: yaw,
            init_pitch: pitch,
            init_target: target,
        }
    }

    /// Restores the pose captured at construction.
    pub fn reset(&mut self) {
        self.radius = self.init_radius;
        self.yaw = self.init_yaw;
        self.pitch = self.init_pitch;
        self.target = self.init_target;
    }

    /// Drag rotation, in pixels of cursor movement.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * Self::ROTATE_SPEED;
        self.pitch = (self.pitch - dy * Self::ROTATE_SPEED).clamp(-89.0, 89.0);
    }

    /// Wheel zoom; the radius stays inside its clamped range.
    pub fn zoom(&mut self, scroll: f32) {
        self.radius =
            (self.radius - scroll * Self::ZOOM_SPEED).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
    }

    /// Drag panning of the orbit target. The step scales with the orbit
    /// radius so the scene tracks the cursor at any zoom level.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let front = self.orbit_direction();
        let right = front.cross(Vec3::Y).normalize();
        let up = right.cross(front).normalize();
        let step = Self::PAN_SPEED * self.radius;

        self.target -= right * dx * step;
        self.target += up * dy * step;
    }

    /// Unit direction from the target toward the eye.
    fn orbit_direction(&self) -> Vec3 {
        let yaw = self.yaw.to_radians();
        let pitch = self.pitch.to_radians();
        Vec3::new(
            yaw.cos() * pitch.cos(),
            pitch.sin(),
            yaw.sin() * pitch.cos(),
        )
    }

    /// World-space eye position on the orbit sphere.
    #[must_use]
    pub fn eye_position(&self) -> Vec3 {
        self.target + self.orbit_direction() * self.radius
    }

    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye_position(), self.target, Vec3::Y)
    }

    #[must_use]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.target
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new()
    }
}
