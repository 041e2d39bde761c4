//! Seeded 2D coherent noise with octave (fractal) composition.

use ::noise::{NoiseFn, Perlin};

/// Deterministic 2D noise source.
///
/// The only state is the Perlin permutation table derived from the seed when the
/// generator is built; every query is a pure function of that table and its inputs.
#[derive(Clone, Debug)]
pub struct NoiseGenerator {
    seed: u32,
    perlin: Perlin,
}

impl NoiseGenerator {
    pub fn new(seed: u32) -> Self {
        NoiseGenerator {
            seed,
            perlin: Perlin::new(seed),
        }
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }

    /// Single coherent noise sample.
    #[inline]
    pub fn noise_2d(&self, x: f64, y: f64) -> f64 {
        self.perlin.get([x, y])
    }

    /// Fractal sum of `octaves` samples.
    ///
    /// Each octave doubles the frequency (starting at `scale`) and multiplies the
    /// amplitude by `persistence`; the sum is normalised by the total amplitude so the
    /// result stays in `[-1, 1]`.
    pub fn octave_noise_2d(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        scale: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut frequency = scale;
        let mut amplitude = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.noise_2d(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= 2.0;
        }

        if max_value == 0.0 {
            return 0.0;
        }
        (total / max_value).clamp(-1.0, 1.0)
    }
}
