//! Mesh generation for voxel rendering.
//!
//! This module converts sets of same-typed blocks into optimized, GPU-friendly mesh
//! data. It implements greedy meshing to reduce the number of vertices and faces by
//! combining coplanar visible faces into larger rectangles.
//!
//! # Architecture
//! - [`MeshData`]: Flat positions, normals, texture coordinates and indices
//! - [`Quad`]: A merged rectangle on one slice plane
//! - [`greedy_mesh`]: The per-type greedy meshing pass
//!
//! # Usage
//! ```
//! use voxel_world::engine_state::{
//!     rendering::meshing::mesh::greedy_mesh,
//!     voxels::block::{BlockKey, BlockType},
//! };
//!
//! let blocks = [BlockKey::new(0, 0, 0), BlockKey::new(1, 0, 0)];
//! let mesh = greedy_mesh(&blocks, BlockType::Stone, |_, _, _| false);
//! assert_eq!(mesh.quad_count(), 6);
//! ```

mod face;
mod greedy;
mod mesh;

pub use face::Quad;
pub use greedy::greedy_mesh;
pub use mesh::*;
