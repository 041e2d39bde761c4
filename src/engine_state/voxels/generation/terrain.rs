//! Layered terrain, sea fill, snow caps and tree placement for one chunk column.

use log::trace;

use crate::config::{TerrainConfig, TreeConfig, WorldConfig};

use super::{
    super::{
        block::BlockType,
        block_store::BlockStore,
        chunk::ChunkCoord,
    },
    noise::NoiseGenerator,
    random::SeededRandom,
    trees, GeneratedChunk,
};

/// Number of dirt blocks between the stone base and the surface block.
const DIRT_DEPTH: i32 = 3;

/// Produces the blocks of a chunk from the world seed and the chunk coordinate.
///
/// Generation is a pure function of `(seed, coord)`: the generator holds no mutable
/// state, and every chunk draws from its own random stream.
#[derive(Clone, Debug)]
pub struct TerrainGenerator {
    seed: u32,
    chunk_size: i32,
    noise: NoiseGenerator,
    terrain: TerrainConfig,
    trees: TreeConfig,
}

impl TerrainGenerator {
    pub fn new(seed: u32, config: &WorldConfig) -> Self {
        TerrainGenerator {
            seed,
            chunk_size: config.chunk_size,
            noise: NoiseGenerator::new(seed),
            terrain: config.terrain.clone(),
            trees: config.trees.clone(),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Height of the surface block of column `(x, z)`. Never below 1.
    pub fn surface_height(&self, x: i32, z: i32) -> i32 {
        let n = self.noise.octave_noise_2d(
            x as f64,
            z as f64,
            self.terrain.octaves,
            self.terrain.persistence,
            self.terrain.noise_scale,
        );
        let height = (self.terrain.base_height + n * self.terrain.height_amplitude).floor() as i32;
        height.max(1)
    }

    /// Surface block type for a column of the given height.
    pub fn surface_block(&self, height: i32) -> BlockType {
        if height <= self.terrain.sea_level + 1 {
            BlockType::Sand
        } else {
            BlockType::Grass
        }
    }

    /// Runs the full generation pass for one chunk.
    ///
    /// Blocks are written into a chunk-local store first, so `set` and `set_if_absent`
    /// behave exactly as the pass describes regardless of what neighbouring chunks have
    /// already produced; the result is merged into the world by
    /// [`BlockStore::apply_generated`].
    pub fn generate_chunk(&self, coord: ChunkCoord) -> GeneratedChunk {
        let mut local = BlockStore::new(self.chunk_size, self.terrain.min_y, self.terrain.max_y);
        let mut rng = SeededRandom::for_chunk(self.seed, coord);
        let (origin_x, origin_z) = coord.origin(self.chunk_size);

        let mut columns = Vec::with_capacity((self.chunk_size * self.chunk_size) as usize);
        for lz in 0..self.chunk_size {
            for lx in 0..self.chunk_size {
                let (x, z) = (origin_x + lx, origin_z + lz);
                let height = self.surface_height(x, z);
                self.stamp_column(&mut local, x, z, height);
                columns.push((x, z, height));
            }
        }

        let mut tree_count = 0;
        for (x, z, height) in columns {
            if height >= self.terrain.snow_line {
                local.set_if_absent(x, height + 1, z, BlockType::Snow);
                continue;
            }
            if self.surface_block(height) != BlockType::Grass {
                continue;
            }
            if !rng.chance(self.trees.probability) {
                continue;
            }
            if rng.chance(self.trees.conical_fraction) {
                trees::place_conical_tree(&mut local, &mut rng, &self.trees, x, height + 1, z);
            } else {
                trees::place_round_tree(&mut local, &mut rng, &self.trees, x, height + 1, z);
            }
            tree_count += 1;
        }

        let generated = GeneratedChunk {
            coord,
            blocks: local.snapshot(),
        };
        trace!(
            "Generated chunk {:?}: {} blocks, {} trees",
            coord,
            generated.blocks.len(),
            tree_count
        );
        generated
    }

    /// Stamps the strata of one column bottom-up, then fills up to sea level with water.
    fn stamp_column(&self, store: &mut BlockStore, x: i32, z: i32, height: i32) {
        let min_y = self.terrain.min_y;
        for y in min_y..(height - DIRT_DEPTH) {
            store.set(x, y, z, BlockType::Stone);
        }
        for y in (height - DIRT_DEPTH).max(min_y)..height {
            store.set(x, y, z, BlockType::Dirt);
        }
        store.set(x, height, z, self.surface_block(height));

        for y in (height + 1)..=self.terrain.sea_level {
            store.set_if_absent(x, y, z, BlockType::Water);
        }
    }
}
