//! # Voxel Task System
//!
//! This module contains tasks related to voxel world generation. These tasks are
//! processed on worker threads so chunk streaming does not stall the owning thread.

pub mod chunk_generation_task;

pub use chunk_generation_task::ChunkGenerationTask;
