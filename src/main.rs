//! # Voxel World Demo
//!
//! A headless run of the voxel world core. It builds a world, streams chunks around a
//! viewer walking away from the origin, places and removes a block, and logs what the
//! streaming and meshing did at every step.
//!
//! ## Usage
//!
//! ```bash
//! RUST_LOG=info cargo run --release
//! VOXEL_WORLD_CONFIG=world.json RUST_LOG=debug cargo run --release
//! ```

use std::{env, process::ExitCode};

use cgmath::Point3;
use log::{error, info};
use voxel_world::{BlockType, World, WorldConfig};

/// Environment variable naming an optional JSON configuration file.
const CONFIG_ENV: &str = "VOXEL_WORLD_CONFIG";

/// Number of simulated frames.
const STEPS: i32 = 8;

fn load_config() -> Result<WorldConfig, voxel_world::ConfigError> {
    match env::var(CONFIG_ENV) {
        Ok(path) => {
            info!("Loading world config from {}", path);
            WorldConfig::from_json_file(path)
        }
        Err(_) => Ok(WorldConfig::default()),
    }
}

fn main() -> ExitCode {
    voxel_world::init_logging();

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    let chunk_size = config.chunk_size as f64;
    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(err) => {
            error!("{}", err);
            return ExitCode::FAILURE;
        }
    };

    for step in 0..STEPS {
        let position = Point3::new(step as f64 * chunk_size * 0.5, 64.0, 0.0);
        let summary = world.update_chunks(position);
        let updates = world.drain_mesh_updates();
        info!(
            "Step {}: {:?}, {} mesh updates, {} loaded chunks",
            step,
            summary,
            updates.len(),
            world.loaded_chunks().len()
        );
    }
    world.flush_pending_generation();

    if let Some(top) = world.get_highest_block_at(0, 0) {
        let placed = world.add_block(0, top + 1, 0, BlockType::Glass);
        let removed = world.remove_block(0, top + 1, 0);
        info!("Column (0, 0) tops out at y = {}: {:?}, {:?}", top, placed, removed);
    }

    let cache = world.mesh_cache();
    info!(
        "Seed {}: {} blocks, {} meshes over {} chunks, {} triangles",
        world.seed(),
        world.get_block_count(),
        cache.mesh_count(),
        cache.chunk_count(),
        cache.total_triangles()
    );
    ExitCode::SUCCESS
}
