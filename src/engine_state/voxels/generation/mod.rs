//! # World Generation
//!
//! Deterministic procedural generation: seeded coherent noise for terrain height, a
//! chunk-local random stream for decorations, and the generator that turns both into
//! block writes for one chunk column.
//!
//! Generation output is a [`GeneratedChunk`] write list rather than direct writes to
//! the world, so chunks can be generated on worker threads and merged later.

pub mod noise;
pub mod random;
pub mod terrain;
pub mod trees;

pub use self::noise::NoiseGenerator;
pub use random::SeededRandom;
pub use terrain::TerrainGenerator;

use super::{
    block::{BlockKey, BlockType},
    chunk::ChunkCoord,
};

/// Blocks produced by one chunk's generation pass, sorted by key.
///
/// Decorations may spill past the chunk's own columns into its neighbours.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratedChunk {
    pub coord: ChunkCoord,
    pub blocks: Vec<(BlockKey, BlockType)>,
}
