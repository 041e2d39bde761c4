use cgmath::Point3;
use voxel_world::{ChunkCoord, ChunkState, ChunkUpdateSummary, MeshUpdate, World, WorldConfig};

fn chunk_center(x: i32, z: i32) -> Point3<f64> {
    Point3::new(x as f64 * 16.0 + 8.0, 64.0, z as f64 * 16.0 + 8.0)
}

fn streaming_config(seed: u32) -> WorldConfig {
    WorldConfig {
        render_distance: 2,
        unload_hysteresis: 1,
        ..WorldConfig::with_seed(seed)
    }
}

#[test]
fn render_distance_square_is_loaded() {
    let mut world = World::new(streaming_config(1)).unwrap();
    world.update_chunks(chunk_center(0, 0));

    for x in -4i32..=4 {
        for z in -4i32..=4 {
            let expected = if x.abs().max(z.abs()) <= 2 {
                ChunkState::Loaded
            } else {
                ChunkState::Unloaded
            };
            assert_eq!(world.chunk_state(ChunkCoord::new(x, z)), expected);
        }
    }
    assert_eq!(world.loaded_chunks().len(), 25);
}

#[test]
fn hysteresis_band_keeps_state() {
    let mut world = World::new(streaming_config(2)).unwrap();
    world.update_chunks(chunk_center(0, 0));
    world.update_chunks(chunk_center(3, 0));

    // Within the render distance of the new position.
    for x in 1..=5 {
        assert_eq!(world.chunk_state(ChunkCoord::new(x, 0)), ChunkState::Loaded);
    }
    // Distance 3 from (3, 0): in the band, previously loaded, stays loaded.
    assert_eq!(world.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Loaded);
    // Distance 4 and 5: unloaded.
    assert_eq!(world.chunk_state(ChunkCoord::new(-1, 0)), ChunkState::Unloaded);
    assert_eq!(world.chunk_state(ChunkCoord::new(-2, 2)), ChunkState::Unloaded);
    // Distance 3 but never loaded: stays unloaded.
    assert_eq!(world.chunk_state(ChunkCoord::new(6, 0)), ChunkState::Unloaded);

    for _ in 0..3 {
        let summary = world.update_chunks(chunk_center(3, 0));
        assert_eq!(summary, ChunkUpdateSummary::default());
    }

    // Oscillating across a chunk boundary never thrashes.
    world.update_chunks(chunk_center(4, 0));
    world.update_chunks(chunk_center(3, 0));
    for step in 0..6 {
        let x = if step % 2 == 0 { 3 } else { 4 };
        let summary = world.update_chunks(chunk_center(x, 0));
        assert_eq!(summary.unloaded, 0);
        assert_eq!(summary.reloaded, 0);
    }
}

#[test]
fn unload_releases_geometry_and_keeps_blocks() {
    let mut world = World::new(streaming_config(3)).unwrap();
    world.update_chunks(chunk_center(0, 0));
    let origin = ChunkCoord::new(0, 0);
    let highest = world.get_highest_block_at(8, 8);
    assert!(!world.meshes_for_chunk(origin).is_empty());
    world.drain_mesh_updates();

    world.update_chunks(chunk_center(10, 0));
    assert_eq!(world.chunk_state(origin), ChunkState::Unloaded);
    assert!(world.meshes_for_chunk(origin).is_empty());
    assert_eq!(world.get_highest_block_at(8, 8), highest);

    let removed_origin = world
        .drain_mesh_updates()
        .into_iter()
        .filter(|update| matches!(update, MeshUpdate::Removed { chunk, .. } if *chunk == origin))
        .count();
    assert!(removed_origin > 0);

    let summary = world.update_chunks(chunk_center(0, 0));
    assert_eq!(summary.generated, 0);
    assert_eq!(summary.reloaded, 25);
    assert!(!world.meshes_for_chunk(origin).is_empty());
}

#[test]
fn budget_streams_nearest_chunks_first() {
    let config = WorldConfig {
        max_chunks_per_update: Some(4),
        ..streaming_config(4)
    };
    let mut world = World::new(config).unwrap();

    let summary = world.update_chunks(chunk_center(0, 0));
    assert_eq!(summary.generated, 4);
    assert_eq!(summary.deferred, 21);
    assert_eq!(world.chunk_state(ChunkCoord::new(0, 0)), ChunkState::Loaded);
    assert!(world
        .loaded_chunks()
        .iter()
        .all(|c| c.x.abs().max(c.z.abs()) <= 1));

    let mut calls = 1;
    while world.loaded_chunks().len() < 25 {
        world.update_chunks(chunk_center(0, 0));
        calls += 1;
        assert!(calls <= 7);
    }
}

#[test]
fn background_workers_produce_the_same_world() {
    let sync_config = streaming_config(5);
    let threaded_config = WorldConfig {
        worker_threads: 3,
        ..streaming_config(5)
    };

    let mut sync_world = World::new(sync_config).unwrap();
    sync_world.update_chunks(chunk_center(0, 0));

    let mut threaded_world = World::new(threaded_config).unwrap();
    threaded_world.update_chunks(chunk_center(0, 0));
    threaded_world.flush_pending_generation();

    assert_eq!(threaded_world.loaded_chunks(), sync_world.loaded_chunks());
    assert_eq!(
        threaded_world.block_store().snapshot(),
        sync_world.block_store().snapshot()
    );
    assert_eq!(
        threaded_world.mesh_cache().total_quads(),
        sync_world.mesh_cache().total_quads()
    );
}

#[test]
fn chunks_leaving_range_while_generating_are_cancelled() {
    let config = WorldConfig {
        worker_threads: 1,
        ..streaming_config(6)
    };
    let mut world = World::new(config).unwrap();
    world.update_chunks(chunk_center(0, 0));

    let summary = world.update_chunks(chunk_center(40, 0));
    assert!(summary.cancelled > 0);
    world.flush_pending_generation();

    for x in -2..=2 {
        for z in -2..=2 {
            assert_eq!(
                world.chunk_state(ChunkCoord::new(x, z)),
                ChunkState::Unloaded
            );
        }
    }
    assert_eq!(world.loaded_chunks().len(), 25);
}
