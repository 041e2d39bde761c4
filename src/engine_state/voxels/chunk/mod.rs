//! # Chunk Module
//!
//! Chunks are fixed-footprint, unbounded-height columns of the world and the unit of
//! generation, streaming and meshing. A chunk owns no block data: blocks live in the
//! [`BlockStore`](super::block_store::BlockStore) and a chunk is addressed by the X/Z
//! range it covers. What a chunk does own is its lifecycle state; its geometry handles
//! live in the mesh cache under the same coordinate.

use cgmath::Point3;

pub mod chunk_manager;

/// Default horizontal dimension of a chunk in blocks.
pub const CHUNK_DIMENSION: i32 = 16;

/// Horizontal coordinate of a chunk column, in chunk units.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkCoord {
    pub x: i32,
    pub z: i32,
}

impl ChunkCoord {
    pub const fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// The chunk containing block column `(x, z)`.
    #[inline]
    pub fn containing(x: i32, z: i32, chunk_size: i32) -> Self {
        ChunkCoord::new(x.div_euclid(chunk_size), z.div_euclid(chunk_size))
    }

    /// The chunk containing a world-space position.
    pub fn containing_point(position: Point3<f64>, chunk_size: i32) -> Self {
        ChunkCoord::containing(
            position.x.floor() as i32,
            position.z.floor() as i32,
            chunk_size,
        )
    }

    /// Block coordinates of the chunk's minimum corner column.
    #[inline]
    pub fn origin(self, chunk_size: i32) -> (i32, i32) {
        (self.x * chunk_size, self.z * chunk_size)
    }

    /// Chebyshev (chessboard) distance in chunk units.
    #[inline]
    pub fn chebyshev_distance(self, other: ChunkCoord) -> i32 {
        (self.x - other.x).abs().max((self.z - other.z).abs())
    }

    /// The four horizontally adjacent chunks.
    pub fn neighbors(self) -> [ChunkCoord; 4] {
        [
            ChunkCoord::new(self.x + 1, self.z),
            ChunkCoord::new(self.x - 1, self.z),
            ChunkCoord::new(self.x, self.z + 1),
            ChunkCoord::new(self.x, self.z - 1),
        ]
    }
}

/// Lifecycle state of a chunk.
///
/// `Unloaded -> Generating -> Loaded -> Unloaded`. Unloading only discards geometry;
/// a chunk that has been generated once is never regenerated, it is re-meshed from
/// the block store when it comes back into range.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ChunkState {
    Unloaded,
    Generating,
    Loaded,
}

/// Bookkeeping record for one chunk column.
#[derive(Clone, Debug)]
pub struct Chunk {
    /// The position of this chunk in chunk coordinates.
    pub coord: ChunkCoord,
    /// Current lifecycle state.
    pub state: ChunkState,
    /// Whether terrain for this chunk has been written to the block store.
    pub generated: bool,
}

impl Chunk {
    pub fn new(coord: ChunkCoord) -> Self {
        Chunk {
            coord,
            state: ChunkState::Unloaded,
            generated: false,
        }
    }

    #[inline]
    pub fn is_loaded(&self) -> bool {
        self.state == ChunkState::Loaded
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containing_uses_floor_division() {
        assert_eq!(ChunkCoord::containing(0, 0, 16), ChunkCoord::new(0, 0));
        assert_eq!(ChunkCoord::containing(15, 16, 16), ChunkCoord::new(0, 1));
        assert_eq!(ChunkCoord::containing(-1, -16, 16), ChunkCoord::new(-1, -1));
        assert_eq!(ChunkCoord::containing(-17, 31, 16), ChunkCoord::new(-2, 1));
    }

    #[test]
    fn containing_point_floors_fractional_positions() {
        let coord = ChunkCoord::containing_point(Point3::new(-0.5, 100.0, 16.2), 16);
        assert_eq!(coord, ChunkCoord::new(-1, 1));
    }

    #[test]
    fn chebyshev_distance_takes_max_axis() {
        let a = ChunkCoord::new(0, 0);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(3, -1)), 3);
        assert_eq!(a.chebyshev_distance(ChunkCoord::new(-2, -2)), 2);
        assert_eq!(a.chebyshev_distance(a), 0);
    }
}
