//! Tree decorations.
//!
//! Both variants write through `set_if_absent`, so a tree never clobbers terrain or an
//! earlier decoration of the same generation pass. Every random draw happens whether
//! or not the write lands, which keeps the stream in lockstep across runs.

use crate::config::TreeConfig;

use super::{
    super::{block::BlockType, block_store::BlockStore},
    random::SeededRandom,
};

/// Round tree: a trunk capped by a canopy whose density falls off with distance from
/// the trunk axis.
///
/// `(x, y, z)` is the first trunk cell, directly above the surface block.
pub fn place_round_tree(
    store: &mut BlockStore,
    rng: &mut SeededRandom,
    config: &TreeConfig,
    x: i32,
    y: i32,
    z: i32,
) {
    let trunk_height = rng.next_int(config.trunk_min_height, config.trunk_max_height + 1);
    for dy in 0..trunk_height {
        store.set_if_absent(x, y + dy, z, BlockType::Wood);
    }

    let top = y + trunk_height - 1;
    let radius = config.leaf_radius;
    let reach = radius as f64 + 0.5;

    for dy in -1..=radius {
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx == 0 && dz == 0 && dy <= 0 {
                    continue;
                }
                let distance = ((dx * dx + dy * dy + dz * dz) as f64).sqrt();
                if distance > reach {
                    continue;
                }
                let axis_distance = ((dx * dx + dz * dz) as f64).sqrt();
                if rng.chance(leaf_probability(axis_distance, radius)) {
                    store.set_if_absent(x + dx, top + dy, z + dz, BlockType::Leaves);
                }
            }
        }
    }
}

/// Leaf placement probability at `axis_distance` from the trunk axis.
///
/// Highest on the axis and strictly below 1 everywhere.
pub fn leaf_probability(axis_distance: f64, radius: i32) -> f64 {
    (0.95 * (1.0 - axis_distance / (radius as f64 + 1.0))).max(0.0)
}

/// Conical tree: a trunk wrapped in layers of shrinking radius, with a chance for each
/// leaf cell to become an ornament and a gold ornament on the apex.
pub fn place_conical_tree(
    store: &mut BlockStore,
    rng: &mut SeededRandom,
    config: &TreeConfig,
    x: i32,
    y: i32,
    z: i32,
) {
    let trunk_height = rng.next_int(config.trunk_min_height, config.trunk_max_height + 1);
    for dy in 0..trunk_height {
        store.set_if_absent(x, y + dy, z, BlockType::Wood);
    }

    let top = y + trunk_height - 1;
    let layers = config.cone_layers.max(1);
    let first_layer = top - layers + 2;

    for layer in 0..layers {
        let layer_y = first_layer + layer;
        let radius = config.cone_base_radius * (layers - layer) / layers;
        for dz in -radius..=radius {
            for dx in -radius..=radius {
                if dx * dx + dz * dz > radius * radius + radius {
                    continue;
                }
                if dx == 0 && dz == 0 && layer_y <= top {
                    continue;
                }
                let block_type = if rng.chance(config.ornament_probability) {
                    if rng.chance(0.5) {
                        BlockType::OrnamentRed
                    } else {
                        BlockType::OrnamentGold
                    }
                } else {
                    BlockType::Leaves
                };
                store.set_if_absent(x + dx, layer_y, z + dz, block_type);
            }
        }
    }

    let apex = (first_layer + layers).max(top + 1);
    store.set_if_absent(x, apex, z, BlockType::OrnamentGold);
}
