mod common;

use std::collections::HashMap;

use cgmath::Point3;
use voxel_world::{
    engine_state::voxels::{block_store::BlockStore, generation::TerrainGenerator},
    BlockPlacement, BlockRemoval, BlockType, ChunkCoord, ChunkState, MeshHandle, World,
    WorldConfig,
};

use common::{covers_face, small_config};

fn origin() -> Point3<f64> {
    Point3::new(8.0, 64.0, 8.0)
}

fn loaded_world(seed: u32) -> World {
    let mut world = World::new(small_config(seed)).unwrap();
    world.update_chunks(origin());
    world
}

fn mesh_of(world: &World, chunk: ChunkCoord, block_type: BlockType) -> Option<MeshHandle> {
    world.mesh_cache().get(chunk, block_type)
}

#[test]
fn same_seed_gives_same_terrain() {
    let a = loaded_world(2024);
    let b = loaded_world(2024);
    for x in -16..32 {
        for z in -16..32 {
            assert_eq!(a.get_highest_block_at(x, z), b.get_highest_block_at(x, z));
        }
    }
    assert_eq!(a.block_store().snapshot(), b.block_store().snapshot());
}

#[test]
fn generation_order_does_not_change_the_world() {
    let mut config = WorldConfig::with_seed(99);
    config.trees.probability = 0.3;
    config.trees.conical_fraction = 0.5;
    let generator = TerrainGenerator::new(99, &config);

    let mut coords = Vec::new();
    for x in -2..=2 {
        for z in -2..=2 {
            coords.push(ChunkCoord::new(x, z));
        }
    }
    let generated: Vec<_> = coords.iter().map(|c| generator.generate_chunk(*c)).collect();

    let build = |order: &[usize]| {
        let mut store =
            BlockStore::new(config.chunk_size, config.terrain.min_y, config.terrain.max_y);
        for &index in order {
            store.apply_generated(&generated[index]);
        }
        store.snapshot()
    };

    let mut order: Vec<usize> = (0..generated.len()).collect();
    let reference = build(&order);
    let mut rng = fastrand::Rng::with_seed(5);
    for _ in 0..4 {
        rng.shuffle(&mut order);
        assert_eq!(build(&order), reference);
    }

    // Independently streamed worlds agree on a chunk whose neighbours are all present,
    // even when other chunks were generated first.
    let mut near_first = World::new(small_config(7)).unwrap();
    near_first.update_chunks(origin());

    let mut far_first = World::new(small_config(7)).unwrap();
    far_first.update_chunks(Point3::new(-56.0, 64.0, 40.0));
    far_first.update_chunks(origin());

    let center = ChunkCoord::new(0, 0);
    assert_eq!(
        near_first.block_store().blocks_by_type_in_chunk(center),
        far_first.block_store().blocks_by_type_in_chunk(center)
    );
}

#[test]
fn occupancy_tracks_the_latest_mutation() {
    let mut world = World::with_seed(3);
    let mut model: HashMap<(i32, i32, i32), BlockType> = HashMap::new();
    let mut rng = fastrand::Rng::with_seed(11);
    let types = [BlockType::Stone, BlockType::Glass, BlockType::Water, BlockType::Wood];

    for _ in 0..500 {
        let cell = (rng.i32(-3..3), rng.i32(90..94), rng.i32(-3..3));
        if rng.bool() {
            let block_type = types[rng.usize(..types.len())];
            let outcome = world.add_block(cell.0, cell.1, cell.2, block_type);
            if model.contains_key(&cell) {
                assert_eq!(outcome, BlockPlacement::Ignored);
            } else {
                assert_eq!(outcome, BlockPlacement::Placed);
                model.insert(cell, block_type);
            }
        } else {
            let outcome = world.remove_block(cell.0, cell.1, cell.2);
            match model.remove(&cell) {
                Some(block_type) => assert_eq!(outcome, BlockRemoval::Removed(block_type)),
                None => assert_eq!(outcome, BlockRemoval::Ignored),
            }
        }
    }

    for x in -3..3 {
        for y in 90..94 {
            for z in -3..3 {
                assert_eq!(
                    world.get_block(x, y, z).map(|b| b.block_type),
                    model.get(&(x, y, z)).copied()
                );
                assert_eq!(world.is_block_at(x, y, z), model.contains_key(&(x, y, z)));
            }
        }
    }
    assert_eq!(world.get_block_count(), model.len());
}

#[test]
fn faces_across_chunk_boundaries_are_culled_and_restored() {
    let mut world = loaded_world(41);
    let (left, right) = (ChunkCoord::new(0, 0), ChunkCoord::new(1, 0));
    assert_eq!(world.chunk_state(left), ChunkState::Loaded);
    assert_eq!(world.chunk_state(right), ChunkState::Loaded);

    assert_eq!(world.add_block(15, 100, 4, BlockType::Glass), BlockPlacement::Placed);
    assert_eq!(world.add_block(16, 100, 4, BlockType::Stone), BlockPlacement::Placed);

    let shared_min = [16.0, 100.0, 4.0];
    let shared_max = [16.0, 101.0, 5.0];

    let glass = mesh_of(&world, left, BlockType::Glass).unwrap();
    assert!(!covers_face(&glass, [1.0, 0.0, 0.0], shared_min, shared_max));
    // Glass is transparent, so the stone face looking at it stays visible.
    let stone = mesh_of(&world, right, BlockType::Stone).unwrap();
    assert!(covers_face(&stone, [-1.0, 0.0, 0.0], shared_min, shared_max));

    assert_eq!(
        world.remove_block(16, 100, 4),
        BlockRemoval::Removed(BlockType::Stone)
    );
    let glass = mesh_of(&world, left, BlockType::Glass).unwrap();
    assert!(covers_face(&glass, [1.0, 0.0, 0.0], shared_min, shared_max));
}

#[test]
fn opaque_neighbours_in_other_chunks_hide_faces_both_ways() {
    let mut world = loaded_world(42);
    let (near, far) = (ChunkCoord::new(0, 0), ChunkCoord::new(0, -1));

    world.add_block(3, 110, 0, BlockType::Wood);
    world.add_block(3, 110, -1, BlockType::Stone);

    let min = [3.0, 110.0, 0.0];
    let max = [4.0, 111.0, 0.0];
    let wood = mesh_of(&world, near, BlockType::Wood).unwrap();
    assert!(!covers_face(&wood, [0.0, 0.0, -1.0], min, max));
    let stone = mesh_of(&world, far, BlockType::Stone).unwrap();
    assert!(!covers_face(&stone, [0.0, 0.0, 1.0], min, max));
}

#[test]
fn water_shows_through_glass_but_not_through_water() {
    let mut world = loaded_world(43);
    let chunk = ChunkCoord::new(0, 0);

    world.add_block(5, 100, 5, BlockType::Water);
    world.add_block(6, 100, 5, BlockType::Glass);
    world.add_block(5, 100, 9, BlockType::Water);
    world.add_block(6, 100, 9, BlockType::Water);

    let water = mesh_of(&world, chunk, BlockType::Water).unwrap();
    let glass = mesh_of(&world, chunk, BlockType::Glass).unwrap();

    let glass_side = ([6.0, 100.0, 5.0], [6.0, 101.0, 6.0]);
    assert!(covers_face(&water, [1.0, 0.0, 0.0], glass_side.0, glass_side.1));
    assert!(covers_face(&glass, [-1.0, 0.0, 0.0], glass_side.0, glass_side.1));

    let water_side = ([6.0, 100.0, 9.0], [6.0, 101.0, 10.0]);
    assert!(!covers_face(&water, [1.0, 0.0, 0.0], water_side.0, water_side.1));
    assert!(!covers_face(&water, [-1.0, 0.0, 0.0], water_side.0, water_side.1));
}

#[test]
fn snow_caps_are_half_height() {
    let mut config = small_config(8);
    config.terrain.base_height = 40.0;
    config.terrain.height_amplitude = 0.0;
    let mut world = World::new(config).unwrap();
    world.update_chunks(origin());

    assert_eq!(world.get_highest_block_at(4, 4), Some(41));
    assert_eq!(
        world.get_block(4, 41, 4).map(|b| b.block_type),
        Some(BlockType::Snow)
    );
    let snow = mesh_of(&world, ChunkCoord::new(0, 0), BlockType::Snow).unwrap();
    let top = snow.positions.iter().map(|p| p[1]).fold(f32::MIN, f32::max);
    assert_eq!(top, 41.5);
}

#[test]
fn block_events_follow_mutations() {
    let mut world = loaded_world(44);
    let events = world.subscribe();
    world.add_block(2, 120, 2, BlockType::Glass);
    world.remove_block(2, 120, 2);
    assert_eq!(events.try_iter().count(), 2);
}

#[test]
fn edits_far_from_the_terrain_stay_cheap_and_consistent() {
    let config = WorldConfig {
        render_distance: 0,
        ..small_config(45)
    };
    let mut world = World::new(config).unwrap();
    world.update_chunks(origin());
    let chunk = ChunkCoord::new(0, 0);
    let stone_quads = mesh_of(&world, chunk, BlockType::Stone).unwrap().quad_count();

    assert_eq!(world.add_block(3, 200_000, 3, BlockType::Stone), BlockPlacement::Placed);
    let stone = mesh_of(&world, chunk, BlockType::Stone).unwrap();
    assert_eq!(stone.quad_count(), stone_quads + 6);

    for y in [i32::MAX, i32::MIN] {
        assert_eq!(world.add_block(3, y, 3, BlockType::Glass), BlockPlacement::Placed);
        assert!(world.is_block_at(3, y, 3));
    }
    let glass = mesh_of(&world, chunk, BlockType::Glass).unwrap();
    assert_eq!(glass.quad_count(), 12);

    assert_eq!(
        world.remove_block(3, i32::MAX, 3),
        BlockRemoval::Removed(BlockType::Glass)
    );
    assert_eq!(mesh_of(&world, chunk, BlockType::Glass).unwrap().quad_count(), 6);
}
