//! Rendering handoff for the voxel world.
//!
//! The core does not draw anything. This module turns block data into mesh-ready
//! geometry and keeps it in a cache the presentation layer reads from; shading,
//! pipelines and presentation live outside the crate.

pub mod meshing;

// Re-export commonly used types
pub use meshing::{greedy_mesh, MeshCache, MeshData, MeshHandle, MeshUpdate, Quad};
