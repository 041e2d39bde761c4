//! # World Module
//!
//! This module provides the `World` struct, the single owned entry point to the voxel
//! core. It ties together the block store, the chunk manager, the terrain generator and
//! the mesh cache, and exposes the query/mutate API and the geometry handoff used by a
//! presentation layer.
//!
//! ## Architecture
//!
//! The world stores blocks sparsely, so its extent is effectively unbounded. Chunks are
//! streamed in around the position passed to [`World::update_chunks`], and every
//! mutation rebuilds the geometry of the chunks it can affect.
//!
//! ## Notifications
//!
//! Observers register with [`World::subscribe`] and receive a [`BlockChanged`] event for
//! every successful `add_block` and `remove_block`. Receivers that have been dropped
//! are pruned on the next send.

use std::sync::{
    mpsc::{channel, Receiver, Sender},
    Arc,
};

use cgmath::Point3;
use log::info;

use crate::{
    config::{ConfigResult, WorldConfig},
    engine_state::rendering::meshing::{MeshCache, MeshHandle, MeshUpdate},
};

use super::{
    block::{Block, BlockKey, BlockType},
    block_store::BlockStore,
    chunk::{
        chunk_manager::{BlockPlacement, BlockRemoval, ChunkManager, ChunkUpdateSummary},
        ChunkCoord, ChunkState,
    },
    generation::TerrainGenerator,
};

/// Whether a block appeared or disappeared.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockChangeKind {
    Added,
    Removed,
}

/// Notification sent to subscribers after a successful mutation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct BlockChanged {
    pub position: BlockKey,
    /// The type added, or the type that was removed.
    pub block_type: BlockType,
    pub kind: BlockChangeKind,
}

/// A voxel world: blocks, streamed chunks and their geometry.
///
/// # Examples
///
/// ```
/// use cgmath::Point3;
/// use voxel_world::{BlockPlacement, BlockType, World};
///
/// let mut world = World::with_seed(12345);
/// world.update_chunks(Point3::new(0.0, 40.0, 0.0));
///
/// let top = world.get_highest_block_at(0, 0).unwrap();
/// assert_eq!(
///     world.add_block(0, top + 1, 0, BlockType::Glass),
///     BlockPlacement::Placed
/// );
/// ```
pub struct World {
    config: WorldConfig,
    seed: u32,
    store: BlockStore,
    chunk_manager: ChunkManager,
    mesh_cache: MeshCache,
    subscribers: Vec<Sender<BlockChanged>>,
}

impl World {
    /// Creates a world from a configuration.
    ///
    /// A missing seed is replaced with a random one, which is logged so the world can be
    /// reproduced.
    ///
    /// # Returns
    /// The world, or the validation error of the configuration.
    pub fn new(config: WorldConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Creates a world with default settings and a fixed seed.
    pub fn with_seed(seed: u32) -> Self {
        Self::build(WorldConfig::with_seed(seed))
    }

    fn build(mut config: WorldConfig) -> Self {
        let seed = match config.seed {
            Some(seed) => seed,
            None => {
                let seed = fastrand::u32(..);
                info!("No world seed configured, using random seed {}", seed);
                seed
            }
        };
        config.seed = Some(seed);

        let generator = Arc::new(TerrainGenerator::new(seed, &config));
        let chunk_manager = ChunkManager::new(generator, &config);
        let store = BlockStore::new(config.chunk_size, config.terrain.min_y, config.terrain.max_y);
        info!(
            "Created world with seed {} (render distance {}, chunk size {})",
            seed, config.render_distance, config.chunk_size
        );

        World {
            config,
            seed,
            store,
            chunk_manager,
            mesh_cache: MeshCache::new(),
            subscribers: Vec::new(),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// The effective configuration, with the seed filled in.
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Streams chunks around a world-space position. Call once per frame.
    pub fn update_chunks(&mut self, position: Point3<f64>) -> ChunkUpdateSummary {
        self.chunk_manager
            .update_chunks(position, &mut self.store, &mut self.mesh_cache)
    }

    /// Waits for background generation to finish and meshes the results.
    ///
    /// Returns the number of chunks merged; always 0 without worker threads.
    pub fn flush_pending_generation(&mut self) -> usize {
        self.chunk_manager
            .flush_pending_generation(&mut self.store, &mut self.mesh_cache)
    }

    /// Places a block if the cell is empty.
    ///
    /// A block placed into a chunk that has never been generated may later be overwritten
    /// by that chunk's terrain.
    pub fn add_block(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> BlockPlacement {
        let position = BlockKey::new(x, y, z);
        let placement =
            self.chunk_manager
                .add_block(position, block_type, &mut self.store, &mut self.mesh_cache);
        if placement == BlockPlacement::Placed {
            self.notify(BlockChanged {
                position,
                block_type,
                kind: BlockChangeKind::Added,
            });
        }
        placement
    }

    /// Removes the block at a cell, if any.
    pub fn remove_block(&mut self, x: i32, y: i32, z: i32) -> BlockRemoval {
        let position = BlockKey::new(x, y, z);
        let removal = self
            .chunk_manager
            .remove_block(position, &mut self.store, &mut self.mesh_cache);
        if let BlockRemoval::Removed(block_type) = removal {
            self.notify(BlockChanged {
                position,
                block_type,
                kind: BlockChangeKind::Removed,
            });
        }
        removal
    }

    pub fn get_block(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.store.get(x, y, z)
    }

    pub fn is_block_at(&self, x: i32, y: i32, z: i32) -> bool {
        self.store.has(x, y, z)
    }

    /// Block at a floating point world position, floored to its cell.
    pub fn get_block_at_point(&self, position: Point3<f64>) -> Option<Block> {
        let key = BlockKey::from_world(position.x, position.y, position.z);
        self.store.get(key.x, key.y, key.z)
    }

    /// Highest occupied `y` of a column within the configured vertical range.
    pub fn get_highest_block_at(&self, x: i32, z: i32) -> Option<i32> {
        self.store.highest_occupied_y(x, z)
    }

    /// Total number of stored blocks.
    pub fn get_block_count(&self) -> usize {
        self.store.len()
    }

    pub fn block_store(&self) -> &BlockStore {
        &self.store
    }

    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        self.chunk_manager.chunk_state(coord)
    }

    pub fn loaded_chunks(&self) -> Vec<ChunkCoord> {
        self.chunk_manager.loaded_chunks()
    }

    /// Chunk column containing a world-space position.
    pub fn chunk_containing(&self, position: Point3<f64>) -> ChunkCoord {
        ChunkCoord::containing_point(position, self.config.chunk_size)
    }

    /// Current geometry of a chunk, one mesh per block type present.
    pub fn meshes_for_chunk(&self, coord: ChunkCoord) -> Vec<(BlockType, MeshHandle)> {
        self.mesh_cache.meshes_for_chunk(coord)
    }

    pub fn mesh_cache(&self) -> &MeshCache {
        &self.mesh_cache
    }

    /// Geometry changes since the last call, oldest first.
    pub fn drain_mesh_updates(&mut self) -> Vec<MeshUpdate> {
        self.mesh_cache.drain_updates()
    }

    /// Registers an observer of block mutations.
    pub fn subscribe(&mut self) -> Receiver<BlockChanged> {
        let (sender, receiver) = channel();
        self.subscribers.push(sender);
        receiver
    }

    fn notify(&mut self, event: BlockChanged) {
        self.subscribers
            .retain(|subscriber| subscriber.send(event).is_ok());
    }
}
