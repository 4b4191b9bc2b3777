//! Orbit camera, controller and uniforms for view/projection.
//!
//! The controller mirrors the orbit-control scheme the previews were designed
//! around: left-drag rotates around a fixed focus point with inertia
//! ("damping"), the wheel zooms, and an optional continuous auto-rotation
//! spins the part for show. Auto-rotation speed uses the same unit as
//! three.js `OrbitControls.autoRotateSpeed`: a speed of 2.0 is one full orbit
//! per 30 seconds.

use std::f32::consts::TAU;

use cgmath::{InnerSpace, Matrix4, Point3, Rad, perspective};
use instant::Duration;
use winit::event::{MouseScrollDelta, WindowEvent};

#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Just below a quarter turn, keeps the orbit away from the poles.
const PITCH_LIMIT: f32 = TAU / 4.0 - 0.01;

/// Camera position and the focus point it looks at.
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
}

impl Camera {
    pub fn new<P: Into<Point3<f32>>>(position: P) -> Self {
        Self {
            position: position.into(),
            target: Point3::new(0.0, 0.0, 0.0),
        }
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(self.position, self.target, cgmath::Vector3::unit_y())
    }
}

/// Perspective projection tracking the surface dimensions.
#[derive(Clone, Debug)]
pub struct Projection {
    aspect: f32,
    fovy: Rad<f32>,
    znear: f32,
    zfar: f32,
}

impl Projection {
    pub fn new<F: Into<Rad<f32>>>(width: u32, height: u32, fovy: F, znear: f32, zfar: f32) -> Self {
        Self {
            aspect: width as f32 / height as f32,
            fovy: fovy.into(),
            znear,
            zfar,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height as f32;
    }

    pub fn calc_matrix(&self) -> Matrix4<f32> {
        OPENGL_TO_WGPU_MATRIX * perspective(self.fovy, self.aspect, self.znear, self.zfar)
    }
}

/// Orbit-style camera controller with damping and auto-rotation.
#[derive(Clone, Debug)]
pub struct OrbitController {
    yaw: f32,
    pitch: f32,
    radius: f32,
    // Pending rotation offsets fed by input, bled off by the damping factor.
    yaw_delta: f32,
    pitch_delta: f32,
    zoom_delta: f32,
    pub auto_rotate: bool,
    auto_rotate_speed: f32,
    damping: f32,
    sensitivity: f32,
}

impl OrbitController {
    /// Derives the spherical orbit state from the camera's start position.
    pub fn from_camera(camera: &Camera, auto_rotate_speed: f32) -> Self {
        let offset = camera.position - camera.target;
        let radius = offset.magnitude().max(f32::EPSILON);
        Self {
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            radius,
            yaw_delta: 0.0,
            pitch_delta: 0.0,
            zoom_delta: 0.0,
            auto_rotate: true,
            auto_rotate_speed,
            damping: 0.05,
            sensitivity: 0.005,
        }
    }

    pub fn auto_rotate_speed(&self) -> f32 {
        self.auto_rotate_speed
    }

    pub fn set_auto_rotate_speed(&mut self, speed: f32) {
        self.auto_rotate_speed = speed;
    }

    /// Feed a mouse drag (pixel deltas) into the orbit.
    pub fn handle_mouse(&mut self, dx: f64, dy: f64) {
        self.yaw_delta -= dx as f32 * self.sensitivity;
        self.pitch_delta -= dy as f32 * self.sensitivity;
    }

    /// Feed a wheel step into the zoom. Positive steps zoom in.
    pub fn handle_scroll(&mut self, scroll: f32) {
        self.zoom_delta += scroll;
    }

    pub fn handle_window_events(&mut self, event: &WindowEvent) {
        if let WindowEvent::MouseWheel { delta, .. } = event {
            let scroll = match delta {
                MouseScrollDelta::LineDelta(_, y) => *y,
                MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 60.0,
            };
            self.handle_scroll(scroll);
        }
    }

    /// Advance the orbit by one frame and place the camera.
    ///
    /// Pending input offsets are applied scaled by the damping factor and
    /// decay by the remainder, which gives the drag its inertia. The
    /// auto-rotation is time-based and therefore frame-rate independent.
    pub fn update(&mut self, camera: &mut Camera, dt: Duration) {
        if self.auto_rotate {
            self.yaw -= self.auto_rotate_speed * dt.as_secs_f32() * TAU / 60.0;
        }
        self.yaw += self.yaw_delta * self.damping;
        self.pitch = (self.pitch + self.pitch_delta * self.damping)
            .clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.yaw_delta *= 1.0 - self.damping;
        self.pitch_delta *= 1.0 - self.damping;

        if self.zoom_delta != 0.0 {
            self.radius = (self.radius * 0.95f32.powf(self.zoom_delta)).max(0.1);
            self.zoom_delta = 0.0;
        }

        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        camera.position = camera.target
            + cgmath::Vector3::new(
                self.radius * cos_pitch * sin_yaw,
                self.radius * sin_pitch,
                self.radius * cos_pitch * cos_yaw,
            );
    }
}

/// View/projection data as uploaded to the GPU.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    view_position: [f32; 4],
    view_proj: [[f32; 4]; 4],
}

impl CameraUniform {
    pub fn new() -> Self {
        use cgmath::SquareMatrix;
        Self {
            view_position: [0.0; 4],
            view_proj: Matrix4::identity().into(),
        }
    }

    pub fn update_view_proj(&mut self, camera: &Camera, projection: &Projection) {
        self.view_position = camera.position.to_homogeneous().into();
        self.view_proj = (projection.calc_matrix() * camera.calc_matrix()).into();
    }
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

/// Camera state bundled with its GPU resources.
#[derive(Debug)]
pub struct CameraResources {
    pub camera: Camera,
    pub controller: OrbitController,
    pub uniform: CameraUniform,
    pub buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub bind_group_layout: wgpu::BindGroupLayout,
}
