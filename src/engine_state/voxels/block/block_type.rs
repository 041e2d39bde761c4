//! # Block Type Module
//!
//! This module defines the different types of blocks in the voxel world together with
//! their static properties: opacity, render material, vertical extent and the rank used
//! when generated writes from different chunks land on the same cell.

use std::fmt;

use num_derive::FromPrimitive;
use phf::phf_map;

use super::{block_side::BlockSide, BlockTypeSize};

/// Enumerates all possible block types in the voxel world.
///
/// The set is closed: every property below is a static per-type property, never a
/// per-instance one. The `FromPrimitive` derive allows conversion from the compact
/// `BlockTypeSize` representation.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, FromPrimitive)]
pub enum BlockType {
    /// Bedrock-like base layer of every column.
    Stone,
    /// The band just below the surface.
    Dirt,
    /// Surface block above the beach line.
    Grass,
    /// Surface block at or just above sea level.
    Sand,
    /// Tree trunks.
    Wood,
    /// Tree foliage. Transparent so neighbouring faces stay visible.
    Leaves,
    /// Sea fill.
    Water,
    /// Player-placed transparent block.
    Glass,
    /// A half-height snow layer capping high columns.
    Snow,
    /// Red bauble hung on conical trees.
    OrnamentRed,
    /// Gold bauble hung on conical trees; also used for the apex.
    OrnamentGold,
}

/// Whether a block hides the faces of its neighbours.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Opacity {
    /// Hides any adjacent face.
    Opaque,
    /// Only hides faces of blocks of the same type.
    Transparent,
}

/// Render material tag handed to the presentation layer.
///
/// The core does not define shading; the tag only tells the renderer which texture
/// atlas entry to use per face and whether to draw in the transparent pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Material {
    /// Texture atlas index for each face, indexed by `BlockSide`.
    pub texture_indices: [u16; 6],
    /// Whether the presentation layer should blend this material.
    pub transparent: bool,
}

/// Number of block types.
pub const BLOCK_TYPE_COUNT: usize = 11;

/// Texture indices per block type, in `BlockSide` order:
/// [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
static BLOCK_TYPE_TO_TEXTURE_INDICES: [[u16; 6]; BLOCK_TYPE_COUNT] = [
    [0, 0, 0, 0, 0, 0],       // Stone
    [1, 1, 1, 1, 1, 1],       // Dirt
    [2, 2, 1, 3, 2, 2],       // Grass (bottom: dirt, top: grass)
    [4, 4, 4, 4, 4, 4],       // Sand
    [5, 5, 6, 6, 5, 5],       // Wood (rings on top and bottom)
    [7, 7, 7, 7, 7, 7],       // Leaves
    [8, 8, 8, 8, 8, 8],       // Water
    [9, 9, 9, 9, 9, 9],       // Glass
    [10, 10, 10, 10, 10, 10], // Snow
    [11, 11, 11, 11, 11, 11], // OrnamentRed
    [12, 12, 12, 12, 12, 12], // OrnamentGold
];

/// Lookup from lowercase block names to block types, used by config and tooling.
static BLOCK_NAMES: phf::Map<&'static str, BlockType> = phf_map! {
    "stone" => BlockType::Stone,
    "dirt" => BlockType::Dirt,
    "grass" => BlockType::Grass,
    "sand" => BlockType::Sand,
    "wood" => BlockType::Wood,
    "leaves" => BlockType::Leaves,
    "water" => BlockType::Water,
    "glass" => BlockType::Glass,
    "snow" => BlockType::Snow,
    "ornament_red" => BlockType::OrnamentRed,
    "ornament_gold" => BlockType::OrnamentGold,
};

impl BlockType {
    /// All block types in declaration order.
    pub const ALL: [BlockType; BLOCK_TYPE_COUNT] = [
        BlockType::Stone,
        BlockType::Dirt,
        BlockType::Grass,
        BlockType::Sand,
        BlockType::Wood,
        BlockType::Leaves,
        BlockType::Water,
        BlockType::Glass,
        BlockType::Snow,
        BlockType::OrnamentRed,
        BlockType::OrnamentGold,
    ];

    /// Converts a `BlockTypeSize` to a `BlockType`, or `None` for unknown values.
    pub fn from_int(btype: BlockTypeSize) -> Option<Self> {
        num_traits::FromPrimitive::from_u8(btype)
    }

    /// Looks a block type up by its lowercase name.
    pub fn from_name(name: &str) -> Option<Self> {
        BLOCK_NAMES.get(name).copied()
    }

    /// The lowercase name of this block type.
    pub fn name(self) -> &'static str {
        match self {
            BlockType::Stone => "stone",
            BlockType::Dirt => "dirt",
            BlockType::Grass => "grass",
            BlockType::Sand => "sand",
            BlockType::Wood => "wood",
            BlockType::Leaves => "leaves",
            BlockType::Water => "water",
            BlockType::Glass => "glass",
            BlockType::Snow => "snow",
            BlockType::OrnamentRed => "ornament_red",
            BlockType::OrnamentGold => "ornament_gold",
        }
    }

    /// Static opacity of this type.
    pub fn opacity(self) -> Opacity {
        match self {
            BlockType::Stone
            | BlockType::Dirt
            | BlockType::Grass
            | BlockType::Sand
            | BlockType::Wood => Opacity::Opaque,
            BlockType::Leaves
            | BlockType::Water
            | BlockType::Glass
            | BlockType::Snow
            | BlockType::OrnamentRed
            | BlockType::OrnamentGold => Opacity::Transparent,
        }
    }

    #[inline]
    pub fn is_opaque(self) -> bool {
        self.opacity() == Opacity::Opaque
    }

    /// Decides whether a face of a block of this type is hidden by `neighbor`.
    ///
    /// A face is hidden by a neighbour of the same type or by any opaque neighbour.
    /// A transparent neighbour of a different type never hides it.
    #[inline]
    pub fn is_hidden_by(self, neighbor: BlockType) -> bool {
        neighbor == self || neighbor.is_opaque()
    }

    /// Vertical extent of the block in world units.
    pub fn height(self) -> f32 {
        match self {
            BlockType::Snow => 0.5,
            _ => 1.0,
        }
    }

    #[inline]
    pub fn is_half_height(self) -> bool {
        self.height() < 1.0
    }

    /// Whether this type belongs to the layered terrain strata.
    pub fn is_terrain(self) -> bool {
        matches!(
            self,
            BlockType::Stone | BlockType::Dirt | BlockType::Grass | BlockType::Sand
        )
    }

    /// Precedence used when generated writes from different chunks collide on one cell.
    ///
    /// The occupant is only replaced by a generated block of strictly higher rank, so
    /// the final content of a cell does not depend on the order chunks were generated.
    /// Types that are never generated rank highest and are never replaced.
    pub fn generation_rank(self) -> u8 {
        match self {
            BlockType::Snow => 0,
            BlockType::Leaves => 1,
            BlockType::OrnamentRed => 2,
            BlockType::OrnamentGold => 3,
            BlockType::Wood => 4,
            BlockType::Water => 5,
            BlockType::Stone | BlockType::Dirt | BlockType::Grass | BlockType::Sand => 6,
            BlockType::Glass => u8::MAX,
        }
    }

    /// Render material of this type.
    pub fn material(self) -> Material {
        Material {
            texture_indices: BLOCK_TYPE_TO_TEXTURE_INDICES[self as usize],
            transparent: !self.is_opaque(),
        }
    }

    /// Texture atlas index for one face of this type.
    pub fn texture_index(self, side: BlockSide) -> u16 {
        BLOCK_TYPE_TO_TEXTURE_INDICES[self as usize][side as usize]
    }
}

impl fmt::Display for BlockType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
