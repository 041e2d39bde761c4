//! # World Configuration
//!
//! Every tunable of the world core lives here: chunk size, streaming radii, sea level,
//! terrain shape and decoration probabilities. Configurations deserialize from JSON with
//! every field optional (missing fields take their defaults).

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine_state::voxels::chunk::CHUNK_DIMENSION;

/// Errors raised while loading or validating a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// The configuration is not valid JSON for `WorldConfig`.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A field holds a value the world cannot run with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Largest accepted `render_distance` and `unload_hysteresis`, in chunks.
pub const MAX_STREAMING_RADIUS: i32 = 1024;

/// Terrain shape parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Highest `y` filled with water.
    pub sea_level: i32,
    /// Surface height where the noise is zero.
    pub base_height: f64,
    /// Surface height swing for noise values of +/-1.
    pub height_amplitude: f64,
    /// Frequency of the first noise octave.
    pub noise_scale: f64,
    pub octaves: u32,
    /// Amplitude multiplier between octaves.
    pub persistence: f64,
    /// Columns at or above this height get a snow cap and no trees.
    pub snow_line: i32,
    /// Bottom of the vertical scan range.
    pub min_y: i32,
    /// Top of the vertical scan range.
    pub max_y: i32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        TerrainConfig {
            sea_level: 12,
            base_height: 16.0,
            height_amplitude: 12.0,
            noise_scale: 0.015,
            octaves: 4,
            persistence: 0.5,
            snow_line: 26,
            min_y: 0,
            max_y: 128,
        }
    }
}

/// Tree placement parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Probability that a grass column hosts a tree.
    pub probability: f64,
    /// Fraction of trees that use the ornamented conical variant.
    pub conical_fraction: f64,
    pub trunk_min_height: i32,
    pub trunk_max_height: i32,
    /// Radius of the round canopy.
    pub leaf_radius: i32,
    /// Number of layers in a conical canopy.
    pub cone_layers: i32,
    /// Radius of the lowest conical layer.
    pub cone_base_radius: i32,
    /// Probability that a conical leaf cell becomes an ornament.
    pub ornament_probability: f64,
}

impl Default for TreeConfig {
    fn default() -> Self {
        TreeConfig {
            probability: 0.02,
            conical_fraction: 0.3,
            trunk_min_height: 4,
            trunk_max_height: 6,
            leaf_radius: 2,
            cone_layers: 4,
            cone_base_radius: 3,
            ornament_probability: 0.08,
        }
    }
}

/// Configuration of one world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Root of all procedural generation. A random seed is chosen (and logged) if absent.
    pub seed: Option<u32>,
    /// Horizontal size of a chunk column in blocks.
    pub chunk_size: i32,
    /// Chebyshev radius, in chunks, that must be loaded around the player.
    pub render_distance: i32,
    /// Extra chunks beyond the render distance before a chunk is unloaded.
    pub unload_hysteresis: i32,
    /// Cap on chunks generated per `update_chunks` call. `None` generates everything.
    pub max_chunks_per_update: Option<usize>,
    /// Background generation workers. `0` generates synchronously.
    pub worker_threads: usize,
    pub terrain: TerrainConfig,
    pub trees: TreeConfig,
}

impl Default for WorldConfig {
    fn default() -> Self {
        WorldConfig {
            seed: None,
            chunk_size: CHUNK_DIMENSION,
            render_distance: 4,
            unload_hysteresis: 2,
            max_chunks_per_update: None,
            worker_threads: 0,
            terrain: TerrainConfig::default(),
            trees: TreeConfig::default(),
        }
    }
}

impl WorldConfig {
    /// Default configuration with a fixed seed.
    pub fn with_seed(seed: u32) -> Self {
        WorldConfig {
            seed: Some(seed),
            ..Default::default()
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: WorldConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_json_file(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let json = fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Checks that every field holds a usable value.
    pub fn validate(&self) -> ConfigResult<()> {
        fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigResult<()> {
            Err(ConfigError::Invalid {
                field,
                reason: reason.into(),
            })
        }
        fn probability(field: &'static str, p: f64) -> ConfigResult<()> {
            if (0.0..=1.0).contains(&p) {
                Ok(())
            } else {
                invalid(field, format!("{p} is not a probability"))
            }
        }

        if self.chunk_size <= 0 {
            return invalid("chunk_size", "must be positive");
        }
        if !(0..=MAX_STREAMING_RADIUS).contains(&self.render_distance) {
            return invalid(
                "render_distance",
                format!("must be between 0 and {MAX_STREAMING_RADIUS}"),
            );
        }
        if !(0..=MAX_STREAMING_RADIUS).contains(&self.unload_hysteresis) {
            return invalid(
                "unload_hysteresis",
                format!("must be between 0 and {MAX_STREAMING_RADIUS}"),
            );
        }
        if self.max_chunks_per_update == Some(0) {
            return invalid("max_chunks_per_update", "must be at least 1 when set");
        }
        if self.terrain.min_y > self.terrain.max_y {
            return invalid("terrain.min_y", "must not exceed terrain.max_y");
        }
        if self.trees.trunk_min_height < 1 {
            return invalid("trees.trunk_min_height", "must be at least 1");
        }
        if self.trees.trunk_max_height < self.trees.trunk_min_height {
            return invalid("trees.trunk_max_height", "must not be below trunk_min_height");
        }
        if self.trees.leaf_radius < 0 || self.trees.cone_base_radius < 0 || self.trees.cone_layers < 0
        {
            return invalid("trees", "canopy sizes must not be negative");
        }
        probability("trees.probability", self.trees.probability)?;
        probability("trees.conical_fraction", self.trees.conical_fraction)?;
        probability("trees.ornament_probability", self.trees.ornament_probability)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(WorldConfig::default().validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config = WorldConfig::from_json_str(
            r#"{ "seed": 7, "render_distance": 2, "terrain": { "sea_level": 5 } }"#,
        )
        .unwrap();
        assert_eq!(config.seed, Some(7));
        assert_eq!(config.render_distance, 2);
        assert_eq!(config.terrain.sea_level, 5);
        assert_eq!(config.terrain.octaves, TerrainConfig::default().octaves);
        assert_eq!(config.chunk_size, 16);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = WorldConfig::from_json_str("{ seed: }").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn invalid_values_name_the_field() {
        let err = WorldConfig::from_json_str(r#"{ "chunk_size": 0 }"#).unwrap_err();
        match err {
            ConfigError::Invalid { field, .. } => assert_eq!(field, "chunk_size"),
            other => panic!("unexpected error {other:?}"),
        }

        let err =
            WorldConfig::from_json_str(r#"{ "trees": { "probability": 1.5 } }"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "trees.probability",
                ..
            }
        ));
    }

    #[test]
    fn streaming_radii_are_bounded() {
        let config = WorldConfig {
            render_distance: MAX_STREAMING_RADIUS,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_ok());

        for (render_distance, unload_hysteresis) in
            [(MAX_STREAMING_RADIUS + 1, 1), (30_000, 1), (-1, 1), (4, i32::MAX)]
        {
            let config = WorldConfig {
                render_distance,
                unload_hysteresis,
                ..WorldConfig::default()
            };
            assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));
        }
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = WorldConfig::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
