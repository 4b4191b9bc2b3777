//! partview
//!
//! An interactive preview viewer for machined parts (a slider, a spring, a
//! housing and the combined assembly), rendered with physically-based
//! clearcoat materials under HDR environment lighting. Runs natively and on
//! the web (WASM/WebGL) from the same codebase.
//!
//! High-level modules
//! - `app`: winit event loop, the view session and its teardown semantics
//! - `camera`: orbit camera, controller with damping/auto-rotation, uniforms
//! - `context`: central GPU and window context that owns device/queue/pipelines
//! - `data_structures`: CPU mesh data, GPU models, textures and instances
//! - `material`: clearcoat material parameters and the procedural flake map
//! - `pipelines`: the physically-based render pipeline and its shader
//! - `resources`: async loading of part meshes and the HDR environment
//! - `timeline`: the staggered load/rotation sequencer for the combined view
//! - `view`: the four view presets (slider, spring, housing, combined)
//!

pub mod app;
pub mod camera;
pub mod context;
pub mod data_structures;
pub mod material;
pub mod pipelines;
pub mod resources;
pub mod timeline;
pub mod view;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
pub use winit::event::DeviceEvent;
pub use winit::event::WindowEvent;
