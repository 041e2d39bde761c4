//! # Chunk Manager
//!
//! Streams chunk columns around a position: generates chunks entering the render
//! distance, keeps their geometry current, and releases geometry of chunks that move
//! past the render distance plus a hysteresis margin.
//!
//! ## Streaming Rules
//!
//! - Distances are Chebyshev distances in chunk units
//! - Chunks within `render_distance` are brought in, nearest first
//! - Chunks beyond `render_distance + unload_hysteresis` are unloaded
//! - Chunks in between keep whatever state they had
//! - Unloading releases geometry only; block data stays in the store and a chunk that
//!   returns is re-meshed, never regenerated
//!
//! ## Background Generation
//!
//! With a worker pool, generation of a chunk's blocks runs on a worker while the chunk
//! sits in `Generating`. Results are merged into the store and meshed on the owning
//! thread during a later `update_chunks`. A chunk that leaves range while generating is
//! cancelled: its queued task is dropped, or its result is discarded on arrival.

use std::{
    collections::{BTreeMap, BTreeSet, HashMap},
    sync::Arc,
};

use cgmath::Point3;
use log::{debug, trace};
use web_time::Instant;

use crate::{
    config::WorldConfig,
    engine_state::{
        rendering::meshing::{greedy_mesh, MeshCache, MeshData},
        task_management::{task::Task, TaskManager},
        voxels::{
            block::{BlockKey, BlockType},
            block_store::BlockStore,
            generation::{GeneratedChunk, TerrainGenerator},
            tasks::ChunkGenerationTask,
        },
    },
};

use super::{Chunk, ChunkCoord, ChunkState};

/// Outcome of `add_block`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockPlacement {
    /// The block was inserted.
    Placed,
    /// The cell was already occupied; nothing changed.
    Ignored,
}

/// Outcome of `remove_block`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BlockRemoval {
    /// A block of this type was removed.
    Removed(BlockType),
    /// The cell was empty; nothing changed.
    Ignored,
}

/// What one streaming step did.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkUpdateSummary {
    /// Chunks whose generated blocks were merged into the store.
    pub generated: usize,
    /// Chunks handed to workers for generation.
    pub dispatched: usize,
    /// Previously generated chunks that came back into range.
    pub reloaded: usize,
    /// Chunks whose geometry was rebuilt.
    pub meshed: usize,
    /// Chunks whose geometry was released.
    pub unloaded: usize,
    /// Chunks generating in the background that left range.
    pub cancelled: usize,
    /// Chunks in range still waiting for the per-update budget.
    pub deferred: usize,
}

/// Per-chunk lifecycle bookkeeping and streaming.
pub struct ChunkManager {
    chunks: HashMap<ChunkCoord, Chunk>,
    generator: Arc<TerrainGenerator>,
    chunk_size: i32,
    render_distance: i32,
    unload_hysteresis: i32,
    max_chunks_per_update: Option<usize>,
    task_manager: Option<TaskManager<ChunkGenerationTask>>,
}

impl ChunkManager {
    /// Creates a chunk manager for a world.
    ///
    /// # Arguments
    /// * `generator` - The world's terrain generator
    /// * `config` - Streaming parameters; `worker_threads > 0` enables background
    ///   generation when threads can be spawned on this target
    pub fn new(generator: Arc<TerrainGenerator>, config: &WorldConfig) -> Self {
        let task_manager = if config.worker_threads > 0 {
            let manager = TaskManager::new(config.worker_threads);
            if manager.worker_count() > 0 {
                Some(manager)
            } else {
                debug!("No generation workers available, generating synchronously");
                None
            }
        } else {
            None
        };

        ChunkManager {
            chunks: HashMap::new(),
            generator,
            chunk_size: config.chunk_size,
            render_distance: config.render_distance,
            unload_hysteresis: config.unload_hysteresis,
            max_chunks_per_update: config.max_chunks_per_update,
            task_manager,
        }
    }

    pub fn chunk_size(&self) -> i32 {
        self.chunk_size
    }

    /// Current lifecycle state of a chunk. Chunks never seen are `Unloaded`.
    pub fn chunk_state(&self, coord: ChunkCoord) -> ChunkState {
        self.chunks
            .get(&coord)
            .map_or(ChunkState::Unloaded, |chunk| chunk.state)
    }

    /// Whether the chunk's blocks have been merged into the store.
    pub fn is_generated(&self, coord: ChunkCoord) -> bool {
        self.chunks.get(&coord).is_some_and(|chunk| chunk.generated)
    }

    /// Coordinates of every loaded chunk, sorted.
    pub fn loaded_chunks(&self) -> Vec<ChunkCoord> {
        let mut loaded: Vec<ChunkCoord> = self
            .chunks
            .values()
            .filter(|chunk| chunk.is_loaded())
            .map(|chunk| chunk.coord)
            .collect();
        loaded.sort_unstable();
        loaded
    }

    /// Number of chunks waiting on background generation.
    pub fn pending_generation(&self) -> usize {
        self.chunks
            .values()
            .filter(|chunk| chunk.state == ChunkState::Generating)
            .count()
    }

    /// Streams chunks around `position`.
    ///
    /// # Arguments
    /// * `position` - World-space position of the viewer; only `x` and `z` matter
    /// * `store` - The world's block store
    /// * `cache` - The world's mesh cache
    ///
    /// # Returns
    /// A summary of the work done in this step.
    pub fn update_chunks(
        &mut self,
        position: Point3<f64>,
        store: &mut BlockStore,
        cache: &mut MeshCache,
    ) -> ChunkUpdateSummary {
        let start = Instant::now();
        let center = ChunkCoord::containing_point(position, self.chunk_size);
        let mut summary = ChunkUpdateSummary::default();
        let mut dirty = BTreeSet::new();

        // Merge background results first so the unload pass sees their final state.
        let completed = match self.task_manager.as_mut() {
            Some(task_manager) => task_manager.process_completed_tasks(),
            None => Vec::new(),
        };
        for generated in completed {
            if self.merge_generated(&generated, store, &mut dirty) {
                summary.generated += 1;
            }
        }

        self.unload_out_of_range(center, cache, &mut summary);

        let mut budget = self.max_chunks_per_update.unwrap_or(usize::MAX);
        for coord in self.coords_in_range(center) {
            let chunk = self
                .chunks
                .entry(coord)
                .or_insert_with(|| Chunk::new(coord));
            if chunk.state != ChunkState::Unloaded {
                continue;
            }
            if budget == 0 {
                summary.deferred += 1;
                continue;
            }
            budget -= 1;

            if chunk.generated {
                chunk.state = ChunkState::Loaded;
                dirty.insert(coord);
                summary.reloaded += 1;
                continue;
            }

            chunk.state = ChunkState::Generating;
            let task = ChunkGenerationTask::new(self.generator.clone(), coord);
            if let Some(task_manager) = self.task_manager.as_mut() {
                task_manager.publish_task(task);
                summary.dispatched += 1;
            } else {
                let generated = task.process();
                if self.merge_generated(&generated, store, &mut dirty) {
                    summary.generated += 1;
                }
            }
        }

        summary.meshed = self.remesh(&dirty, store, cache);

        if summary != ChunkUpdateSummary::default() {
            debug!(
                "Chunk update around {:?}: {:?} in {:?}",
                center,
                summary,
                start.elapsed()
            );
        }
        summary
    }

    /// Blocks until every background generation finishes, then merges and meshes the
    /// results. Returns the number of chunks merged.
    pub fn flush_pending_generation(
        &mut self,
        store: &mut BlockStore,
        cache: &mut MeshCache,
    ) -> usize {
        let Some(task_manager) = self.task_manager.as_mut() else {
            return 0;
        };
        let completed = task_manager.wait_for_all();

        let mut dirty = BTreeSet::new();
        let mut merged = 0;
        for generated in completed {
            if self.merge_generated(&generated, store, &mut dirty) {
                merged += 1;
            }
        }
        self.remesh(&dirty, store, cache);
        merged
    }

    /// Inserts a block if the cell is empty and rebuilds the affected geometry.
    pub fn add_block(
        &mut self,
        key: BlockKey,
        block_type: BlockType,
        store: &mut BlockStore,
        cache: &mut MeshCache,
    ) -> BlockPlacement {
        if !store.set_if_absent(key.x, key.y, key.z, block_type) {
            return BlockPlacement::Ignored;
        }
        self.remesh_around(key, store, cache);
        BlockPlacement::Placed
    }

    /// Removes a block if present and rebuilds the affected geometry.
    pub fn remove_block(
        &mut self,
        key: BlockKey,
        store: &mut BlockStore,
        cache: &mut MeshCache,
    ) -> BlockRemoval {
        let Some(removed) = store.remove(key.x, key.y, key.z) else {
            return BlockRemoval::Ignored;
        };
        self.remesh_around(key, store, cache);
        BlockRemoval::Removed(removed)
    }

    /// Chunks whose geometry can change when `key` changes: the owning chunk plus each
    /// horizontal neighbour across a boundary the block touches.
    pub fn chunks_affected_by(&self, key: BlockKey) -> Vec<ChunkCoord> {
        let owner = ChunkCoord::containing(key.x, key.z, self.chunk_size);
        let local_x = key.x.rem_euclid(self.chunk_size);
        let local_z = key.z.rem_euclid(self.chunk_size);
        let last = self.chunk_size - 1;

        let mut affected = vec![owner];
        if local_x == 0 {
            affected.push(ChunkCoord::new(owner.x - 1, owner.z));
        }
        if local_x == last {
            affected.push(ChunkCoord::new(owner.x + 1, owner.z));
        }
        if local_z == 0 {
            affected.push(ChunkCoord::new(owner.x, owner.z - 1));
        }
        if local_z == last {
            affected.push(ChunkCoord::new(owner.x, owner.z + 1));
        }
        affected
    }

    fn remesh_around(&mut self, key: BlockKey, store: &BlockStore, cache: &mut MeshCache) {
        let dirty: BTreeSet<ChunkCoord> = self.chunks_affected_by(key).into_iter().collect();
        self.remesh(&dirty, store, cache);
    }

    /// Builds the geometry of one chunk, one greedy mesh per block type present.
    ///
    /// The occlusion predicate reads the whole store, so faces against blocks in
    /// neighbouring chunks are culled too.
    pub fn mesh_chunk(&self, coord: ChunkCoord, store: &BlockStore, cache: &mut MeshCache) {
        let start = Instant::now();
        let mut meshes: BTreeMap<BlockType, MeshData> = BTreeMap::new();

        for (block_type, keys) in store.blocks_by_type_in_chunk(coord) {
            let mesh = greedy_mesh(&keys, block_type, |x, y, z| {
                store
                    .block_type_at(BlockKey::new(x, y, z))
                    .is_some_and(|neighbor| block_type.is_hidden_by(neighbor))
            });
            meshes.insert(block_type, mesh);
        }

        trace!(
            "Meshed chunk {:?}: {} types in {:?}",
            coord,
            meshes.len(),
            start.elapsed()
        );
        cache.replace_chunk(coord, meshes);
    }

    /// Rebuilds every loaded chunk in `dirty`. Returns how many were rebuilt.
    fn remesh(
        &self,
        dirty: &BTreeSet<ChunkCoord>,
        store: &BlockStore,
        cache: &mut MeshCache,
    ) -> usize {
        let mut meshed = 0;
        for coord in dirty {
            if self.chunk_state(*coord) == ChunkState::Loaded {
                self.mesh_chunk(*coord, store, cache);
                meshed += 1;
            }
        }
        meshed
    }

    /// Merges a generation result if its chunk is still waiting for it.
    ///
    /// Marks the chunk, its horizontal neighbours and every column touched by spill as
    /// needing new geometry. Returns `false` for a cancelled chunk's stale result.
    fn merge_generated(
        &mut self,
        generated: &GeneratedChunk,
        store: &mut BlockStore,
        dirty: &mut BTreeSet<ChunkCoord>,
    ) -> bool {
        let coord = generated.coord;
        let Some(chunk) = self.chunks.get_mut(&coord) else {
            return false;
        };
        if chunk.state != ChunkState::Generating {
            debug!("Discarding generation result for cancelled chunk {:?}", coord);
            return false;
        }

        let touched = store.apply_generated(generated);
        chunk.generated = true;
        chunk.state = ChunkState::Loaded;

        dirty.insert(coord);
        dirty.extend(coord.neighbors());
        dirty.extend(touched);
        trace!("Merged chunk {:?}: {} blocks", coord, generated.blocks.len());
        true
    }

    fn unload_out_of_range(
        &mut self,
        center: ChunkCoord,
        cache: &mut MeshCache,
        summary: &mut ChunkUpdateSummary,
    ) {
        let unload_distance = self.render_distance.saturating_add(self.unload_hysteresis);
        let mut cancelled = BTreeSet::new();

        for chunk in self.chunks.values_mut() {
            if chunk.coord.chebyshev_distance(center) <= unload_distance {
                continue;
            }
            match chunk.state {
                ChunkState::Loaded => {
                    cache.remove_chunk(chunk.coord);
                    chunk.state = ChunkState::Unloaded;
                    summary.unloaded += 1;
                }
                ChunkState::Generating => {
                    chunk.state = ChunkState::Unloaded;
                    cancelled.insert(chunk.coord);
                    summary.cancelled += 1;
                }
                ChunkState::Unloaded => {}
            }
        }

        if cancelled.is_empty() {
            return;
        }
        if let Some(task_manager) = self.task_manager.as_mut() {
            let dropped = task_manager.retain_queued(|task| !cancelled.contains(&task.coord()));
            trace!("Dropped {} queued generation tasks", dropped);
        }
    }

    /// Every coordinate within the render distance, nearest first.
    fn coords_in_range(&self, center: ChunkCoord) -> Vec<ChunkCoord> {
        let r = self.render_distance;
        let side = 2 * r.unsigned_abs() as usize + 1;
        let mut coords = Vec::with_capacity(side * side);
        for dz in -r..=r {
            for dx in -r..=r {
                coords.push(ChunkCoord::new(center.x + dx, center.z + dz));
            }
        }
        coords.sort_by_key(|coord| {
            let (dx, dz) = (coord.x - center.x, coord.z - center.z);
            (dx.abs().max(dz.abs()), dx * dx + dz * dz, *coord)
        });
        coords
    }
}
