//! # Voxel World Core
//!
//! This module contains the voxel world itself: block types and storage, chunk
//! streaming, procedural generation and the world facade that ties them together.
//!
//! ## Architecture
//!
//! The voxel system is organized into several key components:
//!
//! * **Block**: Block types, their static properties, and coordinate keys
//! * **Block Store**: The sparse map from coordinate to block type
//! * **Chunk**: Chunk coordinates, lifecycle states and the streaming manager
//! * **Generation**: Seeded noise, seeded random streams, terrain and trees
//! * **Tasks**: Background chunk generation on the worker pool
//! * **World**: The owned facade used by a presentation layer
//!
//! ## Data Flow
//!
//! 1. The world receives a viewer position once per frame
//! 2. The chunk manager generates chunks entering range and merges them into the store
//! 3. Affected chunks are greedy meshed per block type
//! 4. Meshes land in the mesh cache, which queues updates for the presentation layer
//!
//! ## Thread Safety
//!
//! The block store has a single writer, the thread that owns the `World`. Worker threads
//! only produce write lists from the seed and a chunk coordinate.

pub mod block;
pub mod block_store;
pub mod chunk;
pub mod generation;
pub mod tasks;
pub mod world;
