//! # Chunk Generation Task
//!
//! This module defines the `ChunkGenerationTask`, which computes a chunk's generated
//! blocks on a worker thread. The task only reads the shared generator; merging the
//! result into the block store and meshing happen on the owning thread.

use std::sync::Arc;

use crate::engine_state::{
    task_management::task::Task,
    voxels::{
        chunk::ChunkCoord,
        generation::{GeneratedChunk, TerrainGenerator},
    },
};

/// A task that generates one chunk's blocks.
pub struct ChunkGenerationTask {
    /// Shared, immutable generator for the world's seed
    generator: Arc<TerrainGenerator>,
    /// The chunk to generate
    coord: ChunkCoord,
}

impl ChunkGenerationTask {
    /// Creates a new chunk generation task.
    ///
    /// # Arguments
    /// * `generator` - The world's terrain generator
    /// * `coord` - The chunk column to generate
    pub fn new(generator: Arc<TerrainGenerator>, coord: ChunkCoord) -> Self {
        ChunkGenerationTask { generator, coord }
    }

    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }
}

impl Task for ChunkGenerationTask {
    type Output = GeneratedChunk;

    /// Runs the generation pass. The output depends only on the seed and coordinate.
    fn process(&self) -> GeneratedChunk {
        self.generator.generate_chunk(self.coord)
    }
}
