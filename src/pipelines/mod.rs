//! Render pipeline definitions.

pub mod physical;

pub use physical::Pipelines;
