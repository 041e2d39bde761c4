#![allow(dead_code)]

use voxel_world::{MeshData, WorldConfig};

/// Small, fast world settings used across the integration tests.
pub fn small_config(seed: u32) -> WorldConfig {
    WorldConfig {
        render_distance: 1,
        unload_hysteresis: 1,
        ..WorldConfig::with_seed(seed)
    }
}

/// Iterates the quads of a mesh as `(normal, min corner, max corner)`.
pub fn quads(mesh: &MeshData) -> Vec<([f32; 3], [f32; 3], [f32; 3])> {
    mesh.positions
        .chunks(4)
        .zip(mesh.normals.chunks(4))
        .map(|(corners, normals)| {
            let mut min = corners[0];
            let mut max = corners[0];
            for corner in corners {
                for axis in 0..3 {
                    min[axis] = min[axis].min(corner[axis]);
                    max[axis] = max[axis].max(corner[axis]);
                }
            }
            (normals[0], min, max)
        })
        .collect()
}

/// Whether some quad with `normal` covers the unit face whose bounding box is
/// `[min, max]`.
pub fn covers_face(mesh: &MeshData, normal: [f32; 3], min: [f32; 3], max: [f32; 3]) -> bool {
    quads(mesh).into_iter().any(|(n, qmin, qmax)| {
        n == normal && (0..3).all(|axis| qmin[axis] <= min[axis] && qmax[axis] >= max[axis])
    })
}

/// Total area of all quads in a mesh, in unit faces.
pub fn total_area(mesh: &MeshData) -> f32 {
    quads(mesh)
        .into_iter()
        .map(|(_, min, max)| {
            (0..3)
                .map(|axis| max[axis] - min[axis])
                .filter(|extent| *extent > 0.0)
                .product::<f32>()
        })
        .sum()
}
