#![warn(rustdoc::missing_crate_level_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Voxel World
//!
//! The core of a chunked voxel world: sparse block storage, deterministic seeded
//! terrain, chunk streaming around a viewer, and per-block-type greedy meshing ready
//! to hand to a renderer.
//!
//! ## Key Modules
//!
//! * `config` - Serde-backed world configuration and its validation
//! * `engine_state` - Voxel data, generation, streaming, meshing and task management
//!
//! ## Architecture
//!
//! The crate is a library consumed by a thin presentation layer:
//! * The presentation layer calls [`World::update_chunks`] once per frame
//! * Block queries and mutations go through [`World`]
//! * Geometry is read from the mesh cache, either per chunk or as a stream of
//!   [`MeshUpdate`]s
//!
//! Shading, input, physics and persistence live outside the crate.
//!
//! ## Usage
//!
//! ```rust
//! use cgmath::Point3;
//! use voxel_world::{World, WorldConfig};
//!
//! let config = WorldConfig {
//!     render_distance: 1,
//!     ..WorldConfig::with_seed(7)
//! };
//! let mut world = World::new(config).unwrap();
//! world.update_chunks(Point3::new(0.0, 0.0, 0.0));
//! assert_eq!(world.loaded_chunks().len(), 9);
//!
//! for update in world.drain_mesh_updates() {
//!     // upload or release geometry
//!     let _ = update;
//! }
//! ```

pub mod config;
pub mod engine_state;

pub use config::{
    ConfigError, ConfigResult, TerrainConfig, TreeConfig, WorldConfig, MAX_STREAMING_RADIUS,
};
pub use engine_state::{
    rendering::meshing::{MeshCache, MeshData, MeshHandle, MeshUpdate},
    voxels::{
        block::{Block, BlockKey, BlockType},
        chunk::{
            chunk_manager::{BlockPlacement, BlockRemoval, ChunkUpdateSummary},
            ChunkCoord, ChunkState,
        },
        world::{BlockChangeKind, BlockChanged, World},
    },
};

#[cfg(not(target_family = "wasm"))]
use log::info;

/// Installs the logger for the current target.
///
/// Native builds log to stdout through `env_logger`, filtered by `RUST_LOG`. Web builds
/// log to the browser console and route panics there too. Calling this more than once
/// is harmless.
#[cfg(not(target_family = "wasm"))]
pub fn init_logging() {
    let mut log_builder = env_logger::Builder::new();
    let initialized = log_builder
        .target(env_logger::Target::Stdout)
        .parse_env("RUST_LOG")
        .try_init()
        .is_ok();

    if initialized {
        info!("Logger initialized");
    }
}

/// Installs the logger for the current target.
///
/// Native builds log to stdout through `env_logger`, filtered by `RUST_LOG`. Web builds
/// log to the browser console and route panics there too. Calling this more than once
/// is harmless.
#[cfg(target_family = "wasm")]
pub fn init_logging() {
    std::panic::set_hook(Box::new(console_error_panic_hook::hook));
    let _ = console_log::init_with_level(log::Level::Info);
}
