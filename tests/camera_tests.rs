//! Orbit Camera Tests
//!
//! Tests for:
//! - Initial pose and eye position on the orbit sphere
//! - Reset restoring the construction-time pose
//! - Zoom radius clamping and pitch clamping

use glam::Vec3;

use glance::camera::OrbitCamera;

const EPSILON: f32 = 1e-4;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).length() < EPSILON
}

#[test]
fn initial_eye_position() {
    let camera = OrbitCamera::new();
    // yaw -90°, pitch 0°, radius 1 around the origin.
    assert!(vec3_approx(camera.eye_position(), Vec3::new(0.0, 0.0, -1.0)));
}

#[test]
fn view_matrix_looks_at_target() {
    let camera = OrbitCamera::new();
    let view = camera.view_matrix();
    let target_in_view = view.transform_point3(camera.target());
    // The target sits straight ahead, one radius down the -Z view axis.
    assert!(vec3_approx(
        target_in_view,
        Vec3::new(0.0, 0.0, -camera.radius())
    ));
}

#[test]
fn reset_restores_initial_pose() {
    let mut camera = OrbitCamera::new();
    let initial_eye = camera.eye_position();

    camera.orbit(150.0, -80.0);
    camera.zoom(-12.0);
    camera.pan(40.0, 25.0);
    assert!(!vec3_approx(camera.eye_position(), initial_eye));

    camera.reset();
    assert!(vec3_approx(camera.eye_position(), initial_eye));
}

#[test]
fn zoom_clamps_radius() {
    let mut camera = OrbitCamera::new();

    camera.zoom(-10_000.0);
    assert!((camera.radius() - OrbitCamera::MAX_RADIUS).abs() < EPSILON);

    camera.zoom(10_000.0);
    assert!((camera.radius() - OrbitCamera::MIN_RADIUS).abs() < EPSILON);
}

#[test]
fn pitch_is_clamped_away_from_poles() {
    let mut camera = OrbitCamera::new();
    // Drag far past the pole; the eye must stay below it.
    camera.orbit(0.0, -10_000.0);
    let eye = camera.eye_position();
    let max_height = camera.radius() * 89.0_f32.to_radians().sin();
    assert!(eye.y <= max_height + EPSILON);

    // And the view matrix stays well-formed.
    assert!(camera.view_matrix().is_finite());
}

#[test]
fn pan_moves_the_target() {
    let mut camera = OrbitCamera::new();
    let before = camera.target();
    camera.pan(100.0, 0.0);
    assert!(!vec3_approx(camera.target(), before));
}
