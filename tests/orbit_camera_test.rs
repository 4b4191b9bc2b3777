use std::time::Duration;

use cgmath::{InnerSpace, Point3};
use partview::camera::{Camera, OrbitController};

fn camera_at(position: [f32; 3]) -> Camera {
    Camera::new(Point3::from(position))
}

fn distance(camera: &Camera) -> f32 {
    (camera.position - camera.target).magnitude()
}

#[test]
fn should_complete_one_orbit_in_thirty_seconds_at_speed_two() {
    // Same unit as three.js OrbitControls.autoRotateSpeed.
    let mut camera = camera_at([0.0, 0.0, 100.0]);
    let mut controller = OrbitController::from_camera(&camera, 2.0);

    controller.update(&mut camera, Duration::from_secs(15));
    // Half an orbit later the camera sits on the opposite side.
    assert!((camera.position.z + 100.0).abs() < 1e-2, "{:?}", camera.position);
    assert!(camera.position.x.abs() < 1e-2);

    controller.update(&mut camera, Duration::from_secs(15));
    assert!((camera.position.z - 100.0).abs() < 1e-2, "{:?}", camera.position);
}

#[test]
fn should_keep_the_orbit_radius_while_rotating() {
    let mut camera = camera_at([100.0, 100.0, 0.0]);
    let mut controller = OrbitController::from_camera(&camera, 10.0);

    for _ in 0..100 {
        controller.update(&mut camera, Duration::from_millis(16));
    }
    assert!((distance(&camera) - 2.0f32.sqrt() * 100.0).abs() < 1e-2);
}

#[test]
fn should_clamp_the_pitch_below_the_pole() {
    let mut camera = camera_at([0.0, 0.0, 100.0]);
    let mut controller = OrbitController::from_camera(&camera, 0.0);
    controller.auto_rotate = false;

    // Drag far past the top of the orbit sphere.
    controller.handle_mouse(0.0, -1e6);
    for _ in 0..10 {
        controller.update(&mut camera, Duration::from_millis(16));
    }

    // The camera approaches the pole but never tips over it.
    assert!(camera.position.y < 100.0);
    assert!(camera.position.y > 99.0);
    assert!(camera.position.z > 0.0);
}

#[test]
fn should_apply_drag_with_inertia() {
    let mut camera = camera_at([0.0, 0.0, 100.0]);
    let mut controller = OrbitController::from_camera(&camera, 0.0);
    controller.auto_rotate = false;

    controller.handle_mouse(100.0, 0.0);

    controller.update(&mut camera, Duration::from_millis(16));
    let first = camera.position;
    controller.update(&mut camera, Duration::from_millis(16));
    let second = camera.position;

    let step1 = (first - Point3::new(0.0, 0.0, 100.0)).magnitude();
    let step2 = (second - first).magnitude();
    // The pending drag keeps moving the camera, but each frame bleeds off.
    assert!(step1 > 0.0);
    assert!(step2 > 0.0);
    assert!(step2 < step1);
}

#[test]
fn should_zoom_towards_the_focus_on_scroll() {
    let mut camera = camera_at([0.0, 0.0, 100.0]);
    let mut controller = OrbitController::from_camera(&camera, 0.0);
    controller.auto_rotate = false;

    controller.handle_scroll(1.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert!((distance(&camera) - 95.0).abs() < 1e-3);

    // Zooming out undoes it.
    controller.handle_scroll(-1.0);
    controller.update(&mut camera, Duration::from_millis(16));
    assert!((distance(&camera) - 100.0).abs() < 1e-3);
}
