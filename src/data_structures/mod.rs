//! Viewer data structures: CPU geometry, GPU models, textures and instances.
//!
//! - `geometry` holds CPU mesh data and the normalization pass
//! - `model` contains GPU mesh/model types and the draw trait
//! - `instance` holds per-instance transformation data
//! - `texture` contains the GPU texture wrapper and creation utilities

pub mod geometry;
pub mod instance;
pub mod model;
pub mod texture;
