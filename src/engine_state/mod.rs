//! # Engine State Module
//!
//! The engine-side subsystems of the voxel world core.
//!
//! ## Key Components
//!
//! * `rendering` - Greedy meshing and the mesh cache handed to the presentation layer
//! * `task_management` - Worker pool for background work
//! * `voxels` - Voxel data, chunks, world generation and the `World` facade

pub mod rendering;
pub mod task_management;
pub mod voxels;
