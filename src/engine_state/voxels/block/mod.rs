//! # Block Module
//!
//! This module provides the core block-related functionality for the voxel engine.
//! It includes block type definitions, block face handling, the block record and the
//! composite coordinate key the block store is indexed by.

use cgmath::Point3;

pub use block_type::{BlockType, Material, Opacity};

pub mod block_side;
pub mod block_type;

/// The underlying integer type used to represent block types in memory.
pub type BlockTypeSize = u8;

/// A single voxel block in the world.
///
/// Identity is the integer coordinate; the block store guarantees at most one block
/// per coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Block {
    /// World coordinate of the block.
    pub position: Point3<i32>,
    /// The type of this block.
    pub block_type: BlockType,
}

impl Block {
    /// Creates a new block of the specified type at `position`.
    pub fn new(position: Point3<i32>, block_type: BlockType) -> Self {
        Block {
            position,
            block_type,
        }
    }
}

/// Composite key identifying a voxel coordinate.
///
/// Keys are plain integer triples, so lookups allocate nothing and keys order
/// lexicographically by `(x, y, z)`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockKey {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockKey {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        BlockKey { x, y, z }
    }

    /// Builds the key of the voxel containing a world-space point.
    pub fn from_world(x: f64, y: f64, z: f64) -> Self {
        BlockKey::new(x.floor() as i32, y.floor() as i32, z.floor() as i32)
    }

    /// The key shifted by `(dx, dy, dz)`, or `None` past the edge of the `i32` range.
    #[inline]
    pub fn checked_offset(self, dx: i32, dy: i32, dz: i32) -> Option<Self> {
        Some(BlockKey::new(
            self.x.checked_add(dx)?,
            self.y.checked_add(dy)?,
            self.z.checked_add(dz)?,
        ))
    }

    /// Coordinates as an array indexable by axis.
    #[inline]
    pub fn to_array(self) -> [i32; 3] {
        [self.x, self.y, self.z]
    }

    #[inline]
    pub fn from_array(coords: [i32; 3]) -> Self {
        BlockKey::new(coords[0], coords[1], coords[2])
    }

    pub fn position(self) -> Point3<i32> {
        Point3::new(self.x, self.y, self.z)
    }
}

impl From<Point3<i32>> for BlockKey {
    fn from(point: Point3<i32>) -> Self {
        BlockKey::new(point.x, point.y, point.z)
    }
}
