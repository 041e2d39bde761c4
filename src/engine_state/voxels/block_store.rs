//! # Block Store Module
//!
//! The sparse mapping from voxel coordinate to block type. The store is the single
//! source of truth for occupancy: the terrain generator writes to it, the mesher's
//! occlusion predicate reads from it, and explicit mutations go through it.
//!
//! Besides the primary map, the store keeps a per-chunk-column index of occupied keys
//! so the mesher can enumerate one chunk's blocks without scanning the whole world.
//!
//! ## Performance Characteristics
//! - `get`, `has`, `set`, `set_if_absent`, `remove`: O(1) amortized
//! - `highest_occupied_y`: O(height range)
//! - `blocks_by_type_in_chunk`: O(blocks in the chunk)

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use cgmath::Point3;

use super::{
    block::{Block, BlockKey, BlockType},
    chunk::ChunkCoord,
    generation::GeneratedChunk,
};

/// Sparse block storage for one world.
#[derive(Debug, Clone)]
pub struct BlockStore {
    blocks: HashMap<BlockKey, BlockType>,
    columns: HashMap<ChunkCoord, HashSet<BlockKey>>,
    chunk_size: i32,
    min_y: i32,
    max_y: i32,
}

impl BlockStore {
    /// Creates an empty store.
    ///
    /// `min_y..=max_y` bounds the vertical scan of `highest_occupied_y`; blocks outside
    /// the range are stored normally but are invisible to that scan.
    pub fn new(chunk_size: i32, min_y: i32, max_y: i32) -> Self {
        BlockStore {
            blocks: HashMap::new(),
            columns: HashMap::new(),
            chunk_size,
            min_y,
            max_y,
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    #[inline]
    fn column_of(&self, key: BlockKey) -> ChunkCoord {
        ChunkCoord::containing(key.x, key.z, self.chunk_size)
    }

    /// Type of the block at `key`, if any.
    #[inline]
    pub fn block_type_at(&self, key: BlockKey) -> Option<BlockType> {
        self.blocks.get(&key).copied()
    }

    /// The block at `(x, y, z)`, or `None` when the cell is empty.
    pub fn get(&self, x: i32, y: i32, z: i32) -> Option<Block> {
        self.block_type_at(BlockKey::new(x, y, z))
            .map(|block_type| Block::new(Point3::new(x, y, z), block_type))
    }

    #[inline]
    pub fn has(&self, x: i32, y: i32, z: i32) -> bool {
        self.blocks.contains_key(&BlockKey::new(x, y, z))
    }

    /// Inserts or overwrites the block at `(x, y, z)`, returning the previous type.
    pub fn set(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> Option<BlockType> {
        self.set_key(BlockKey::new(x, y, z), block_type)
    }

    fn set_key(&mut self, key: BlockKey, block_type: BlockType) -> Option<BlockType> {
        let previous = self.blocks.insert(key, block_type);
        if previous.is_none() {
            let column = self.column_of(key);
            self.columns.entry(column).or_default().insert(key);
        }
        previous
    }

    /// Inserts the block only if the cell is empty. Returns whether it was inserted.
    pub fn set_if_absent(&mut self, x: i32, y: i32, z: i32, block_type: BlockType) -> bool {
        let key = BlockKey::new(x, y, z);
        if self.blocks.contains_key(&key) {
            return false;
        }
        self.set_key(key, block_type);
        true
    }

    /// Inserts a generated block if the cell is empty or holds a block of lower
    /// generation rank. Returns whether the cell changed.
    pub fn place_generated(&mut self, key: BlockKey, block_type: BlockType) -> bool {
        match self.blocks.get(&key) {
            Some(existing) if existing.generation_rank() >= block_type.generation_rank() => {
                false
            }
            _ => {
                self.set_key(key, block_type);
                true
            }
        }
    }

    /// Removes the block at `(x, y, z)`, returning its type.
    pub fn remove(&mut self, x: i32, y: i32, z: i32) -> Option<BlockType> {
        let key = BlockKey::new(x, y, z);
        let removed = self.blocks.remove(&key)?;
        let column = self.column_of(key);
        if let Some(keys) = self.columns.get_mut(&column) {
            keys.remove(&key);
            if keys.is_empty() {
                self.columns.remove(&column);
            }
        }
        Some(removed)
    }

    /// Highest occupied `y` in column `(x, z)` within the scan range, scanning top-down.
    pub fn highest_occupied_y(&self, x: i32, z: i32) -> Option<i32> {
        (self.min_y..=self.max_y)
            .rev()
            .find(|&y| self.blocks.contains_key(&BlockKey::new(x, y, z)))
    }

    /// Total number of stored blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Number of blocks stored inside one chunk column.
    pub fn chunk_block_count(&self, coord: ChunkCoord) -> usize {
        self.columns.get(&coord).map_or(0, HashSet::len)
    }

    /// Every block inside a chunk column, grouped by type with keys sorted.
    pub fn blocks_by_type_in_chunk(&self, coord: ChunkCoord) -> BTreeMap<BlockType, Vec<BlockKey>> {
        let mut by_type: BTreeMap<BlockType, Vec<BlockKey>> = BTreeMap::new();
        if let Some(keys) = self.columns.get(&coord) {
            for key in keys {
                if let Some(block_type) = self.blocks.get(key) {
                    by_type.entry(*block_type).or_default().push(*key);
                }
            }
        }
        for keys in by_type.values_mut() {
            keys.sort_unstable();
        }
        by_type
    }

    /// Merges the output of one chunk's generation pass.
    ///
    /// Terrain strata overwrite whatever is there. Every other generated block goes
    /// through [`place_generated`](Self::place_generated), so the merged result is the
    /// same whichever order chunks are merged in. Returns the chunk columns whose
    /// contents changed.
    pub fn apply_generated(&mut self, generated: &GeneratedChunk) -> BTreeSet<ChunkCoord> {
        let mut touched = BTreeSet::new();
        for &(key, block_type) in &generated.blocks {
            let changed = if block_type.is_terrain() {
                self.set_key(key, block_type) != Some(block_type)
            } else {
                self.place_generated(key, block_type)
            };
            if changed {
                touched.insert(self.column_of(key));
            }
        }
        touched
    }

    /// Every stored block, sorted by key. Intended for diagnostics and tests.
    pub fn snapshot(&self) -> Vec<(BlockKey, BlockType)> {
        let mut blocks: Vec<(BlockKey, BlockType)> =
            self.blocks.iter().map(|(key, t)| (*key, *t)).collect();
        blocks.sort_unstable_by_key(|(key, _)| *key);
        blocks
    }
}
