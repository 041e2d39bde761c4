//! Mesh generation and caching for voxel rendering.
//!
//! This module owns the geometry handed to the presentation layer. The key goals are:
//! 1. One mesh per `(chunk, block type)` so each type can use its own material
//! 2. Cheap sharing of finished meshes with the presentation layer
//! 3. An explicit stream of changes so uploads only touch what moved
//!
//! # Architecture
//! - [`MeshCache`]: Current geometry handles per chunk, plus the change queue
//! - [`MeshUpdate`]: One change the presentation layer must apply
//! - `mesh/`: The greedy meshing algorithm and mesh data structures

use std::{
    collections::{BTreeMap, HashMap},
    mem,
    sync::Arc,
};

use log::debug;

use crate::engine_state::voxels::{block::BlockType, chunk::ChunkCoord};

/// Core mesh generation algorithms and data structures.
///
/// This module contains the implementation of greedy meshing and related
/// functionality for converting voxel data into optimized triangle meshes.
pub mod mesh;

// Re-export the mesh module's public interface for external use
pub use mesh::*;

/// Shared, immutable geometry for one block type in one chunk.
pub type MeshHandle = Arc<MeshData>;

/// A change to the cached geometry.
#[derive(Debug, Clone)]
pub enum MeshUpdate {
    /// A new or replaced mesh for a `(chunk, type)` pair.
    Upserted {
        chunk: ChunkCoord,
        block_type: BlockType,
        mesh: MeshHandle,
    },
    /// The mesh of a `(chunk, type)` pair was released.
    Removed {
        chunk: ChunkCoord,
        block_type: BlockType,
    },
}

impl MeshUpdate {
    /// The `(chunk, type)` pair this change applies to.
    pub fn key(&self) -> (ChunkCoord, BlockType) {
        match self {
            MeshUpdate::Upserted {
                chunk, block_type, ..
            }
            | MeshUpdate::Removed { chunk, block_type } => (*chunk, *block_type),
        }
    }
}

/// Geometry handles per chunk and block type.
///
/// # Memory Management
///
/// Replacing a chunk releases every handle it no longer needs, so at most one mesh per
/// `(chunk, type)` pair is ever held. Types whose geometry is empty are not stored.
///
/// Pending updates are coalesced: a newer change to a `(chunk, type)` pair replaces the
/// undrained older one, so the queue holds at most one entry per pair. Callers that
/// never drain still keep a handle alive for every pair upserted since the last drain.
#[derive(Debug, Default)]
pub struct MeshCache {
    chunks: HashMap<ChunkCoord, BTreeMap<BlockType, MeshHandle>>,
    updates: Vec<MeshUpdate>,
    pending: HashMap<(ChunkCoord, BlockType), usize>,
    total_quads: usize,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a freshly built set of meshes for a chunk.
    ///
    /// # Arguments
    ///
    /// * `chunk` - The chunk the meshes belong to
    /// * `meshes` - One mesh per block type present in the chunk
    ///
    /// # Implementation Details
    ///
    /// - Empty meshes are treated as absent
    /// - Unchanged meshes keep their existing handle and queue no update
    /// - Types that disappeared from the chunk are released
    pub fn replace_chunk(&mut self, chunk: ChunkCoord, meshes: BTreeMap<BlockType, MeshData>) {
        let mut previous = self.chunks.remove(&chunk).unwrap_or_default();
        let mut current = BTreeMap::new();

        for (block_type, mesh) in meshes {
            if mesh.is_empty() {
                continue;
            }
            match previous.remove(&block_type) {
                Some(old) if *old == mesh => {
                    current.insert(block_type, old);
                }
                old => {
                    if let Some(old) = old {
                        self.total_quads -= old.quad_count();
                    }
                    self.total_quads += mesh.quad_count();
                    let handle = Arc::new(mesh);
                    self.queue(MeshUpdate::Upserted {
                        chunk,
                        block_type,
                        mesh: handle.clone(),
                    });
                    current.insert(block_type, handle);
                }
            }
        }

        for (block_type, old) in previous {
            self.total_quads -= old.quad_count();
            self.queue(MeshUpdate::Removed { chunk, block_type });
        }

        if !current.is_empty() {
            self.chunks.insert(chunk, current);
        }
    }

    /// Releases every mesh of a chunk. Returns how many handles were released.
    pub fn remove_chunk(&mut self, chunk: ChunkCoord) -> usize {
        let Some(meshes) = self.chunks.remove(&chunk) else {
            return 0;
        };
        let released = meshes.len();
        for (block_type, mesh) in meshes {
            self.total_quads -= mesh.quad_count();
            self.queue(MeshUpdate::Removed { chunk, block_type });
        }
        debug!("Released {} meshes of chunk {:?}", released, chunk);
        released
    }

    /// Current meshes of a chunk, ordered by block type.
    pub fn meshes_for_chunk(&self, chunk: ChunkCoord) -> Vec<(BlockType, MeshHandle)> {
        self.chunks
            .get(&chunk)
            .map(|meshes| meshes.iter().map(|(t, m)| (*t, m.clone())).collect())
            .unwrap_or_default()
    }

    /// Mesh of one `(chunk, type)` pair.
    pub fn get(&self, chunk: ChunkCoord, block_type: BlockType) -> Option<MeshHandle> {
        self.chunks.get(&chunk)?.get(&block_type).cloned()
    }

    pub fn contains_chunk(&self, chunk: ChunkCoord) -> bool {
        self.chunks.contains_key(&chunk)
    }

    /// Number of chunks holding at least one mesh.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Number of live mesh handles.
    pub fn mesh_count(&self) -> usize {
        self.chunks.values().map(BTreeMap::len).sum()
    }

    pub fn total_quads(&self) -> usize {
        self.total_quads
    }

    pub fn total_triangles(&self) -> usize {
        self.total_quads * 2
    }

    /// Number of changes waiting to be drained.
    pub fn pending_updates(&self) -> usize {
        self.updates.len()
    }

    /// Takes every queued change, ordered by when each pair first changed.
    ///
    /// The presentation layer is expected to call this regularly; the queue is only
    /// emptied here.
    pub fn drain_updates(&mut self) -> Vec<MeshUpdate> {
        self.pending.clear();
        mem::take(&mut self.updates)
    }

    fn queue(&mut self, update: MeshUpdate) {
        match self.pending.get(&update.key()) {
            Some(&index) => self.updates[index] = update,
            None => {
                self.pending.insert(update.key(), self.updates.len());
                self.updates.push(update);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine_state::voxels::block::BlockKey;

    fn cube(x: i32) -> MeshData {
        greedy_mesh(&[BlockKey::new(x, 0, 0)], BlockType::Stone, |_, _, _| false)
    }

    #[test]
    fn replace_queues_upserts_and_skips_empty_meshes() {
        let mut cache = MeshCache::new();
        let chunk = ChunkCoord::new(0, 0);
        let meshes = BTreeMap::from([
            (BlockType::Stone, cube(0)),
            (BlockType::Water, MeshData::new()),
        ]);
        cache.replace_chunk(chunk, meshes);

        assert_eq!(cache.mesh_count(), 1);
        assert!(cache.get(chunk, BlockType::Water).is_none());
        assert_eq!(cache.total_quads(), 6);
        assert_eq!(cache.total_triangles(), 12);

        let updates = cache.drain_updates();
        assert_eq!(updates.len(), 1);
        assert!(matches!(
            updates[0],
            MeshUpdate::Upserted {
                block_type: BlockType::Stone,
                ..
            }
        ));
        assert!(cache.drain_updates().is_empty());
    }

    #[test]
    fn identical_remesh_keeps_handle() {
        let mut cache = MeshCache::new();
        let chunk = ChunkCoord::new(1, -1);
        cache.replace_chunk(chunk, BTreeMap::from([(BlockType::Stone, cube(0))]));
        let before = cache.get(chunk, BlockType::Stone).unwrap();
        cache.drain_updates();

        cache.replace_chunk(chunk, BTreeMap::from([(BlockType::Stone, cube(0))]));
        let after = cache.get(chunk, BlockType::Stone).unwrap();
        assert!(Arc::ptr_eq(&before, &after));
        assert!(cache.drain_updates().is_empty());
    }

    #[test]
    fn dropped_types_and_chunks_are_released() {
        let mut cache = MeshCache::new();
        let chunk = ChunkCoord::new(0, 0);
        cache.replace_chunk(
            chunk,
            BTreeMap::from([(BlockType::Stone, cube(0)), (BlockType::Dirt, cube(2))]),
        );
        cache.replace_chunk(chunk, BTreeMap::from([(BlockType::Stone, cube(0))]));
        assert_eq!(cache.mesh_count(), 1);
        assert_eq!(cache.total_quads(), 6);

        assert_eq!(cache.remove_chunk(chunk), 1);
        assert_eq!(cache.remove_chunk(chunk), 0);
        assert!(!cache.contains_chunk(chunk));
        assert_eq!(cache.total_quads(), 0);

        let removed = cache
            .drain_updates()
            .into_iter()
            .filter(|u| matches!(u, MeshUpdate::Removed { .. }))
            .count();
        assert_eq!(removed, 2);
    }

    #[test]
    fn undrained_updates_coalesce_per_chunk_and_type() {
        let mut cache = MeshCache::new();
        let chunk = ChunkCoord::new(2, 3);
        for x in 0..50 {
            cache.replace_chunk(
                chunk,
                BTreeMap::from([(BlockType::Stone, cube(x)), (BlockType::Glass, cube(x + 1))]),
            );
        }
        assert_eq!(cache.pending_updates(), 2);

        cache.remove_chunk(chunk);
        let updates = cache.drain_updates();
        assert_eq!(updates.len(), 2);
        assert!(updates
            .iter()
            .all(|u| matches!(u, MeshUpdate::Removed { .. })));

        cache.replace_chunk(chunk, BTreeMap::from([(BlockType::Stone, cube(0))]));
        let updates = cache.drain_updates();
        assert_eq!(updates.len(), 1);
        assert_eq!(updates[0].key(), (chunk, BlockType::Stone));
    }
}
