//! Deterministic pseudo-random stream for chunk-local decoration.

use super::super::chunk::ChunkCoord;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// Linear congruential generator advancing one step per call.
///
/// Two streams built from the same seed produce the same sequence for the same call
/// sequence, which keeps tree placement reproducible per chunk.
#[derive(Clone, Debug)]
pub struct SeededRandom {
    state: u32,
}

impl SeededRandom {
    pub fn new(seed: u32) -> Self {
        SeededRandom { state: seed }
    }

    /// Stream for one chunk, derived from the world seed and the chunk coordinate only.
    pub fn for_chunk(seed: u32, coord: ChunkCoord) -> Self {
        SeededRandom::new(chunk_seed(seed, coord))
    }

    /// Next value in `[0, 1)`.
    pub fn next(&mut self) -> f64 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state as f64 / 4_294_967_296.0
    }

    /// Next integer in `[min, max)`. Returns `min` when the range is empty.
    pub fn next_int(&mut self, min: i32, max: i32) -> i32 {
        let value = self.next();
        if max <= min {
            return min;
        }
        let span = (max as i64 - min as i64) as f64;
        (min as i64 + (value * span).floor() as i64) as i32
    }

    /// `true` with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f64) -> bool {
        self.next() < p
    }
}

/// Seed of a chunk's local stream: `seed + f(chunk_x, chunk_z)`.
pub fn chunk_seed(seed: u32, coord: ChunkCoord) -> u32 {
    let hx = (coord.x as u32).wrapping_mul(0x9E37_79B1);
    let hz = (coord.z as u32).wrapping_mul(0x85EB_CA77).rotate_left(13);
    seed.wrapping_add(hx ^ hz)
}
