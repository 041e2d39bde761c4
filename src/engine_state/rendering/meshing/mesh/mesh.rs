//! Mesh data structures handed to the presentation layer.
//!
//! A [`MeshData`] is flat, GPU-friendly geometry for one block type in one chunk:
//! positions, normals, texture coordinates and a triangle index list.

use super::face::Quad;

/// Geometry for one `(chunk, block type)` pair.
///
/// Every quad contributes four vertices and six indices. Positions are in world space.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions, three floats per vertex.
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals, one unit axis vector per vertex.
    pub normals: Vec<[f32; 3]>,
    /// Texture coordinates; values above 1 tile the texture across merged cells.
    pub uvs: Vec<[f32; 2]>,
    /// Triangle list indices into the vertex arrays.
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Creates an empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends the four vertices and two triangles of a quad.
    ///
    /// # Arguments
    /// * `quad` - The merged rectangle to emit
    /// * `block_height` - Vertical extent of the block type the quad belongs to
    pub fn push_quad(&mut self, quad: &Quad, block_height: f32) {
        let base = self.positions.len() as u32;
        let normal = quad.block_side.normal();

        self.positions.extend(quad.corners(block_height));
        self.normals.extend([normal; 4]);
        self.uvs.extend(quad.uvs());
        self.indices
            .extend(quad.indices().iter().map(|index| base + index));
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    #[inline]
    pub fn quad_count(&self) -> usize {
        self.positions.len() / 4
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Axis-aligned bounds of all vertex positions as `(min, max)`, or `None` when empty.
    pub fn bounds(&self) -> Option<([f32; 3], [f32; 3])> {
        let first = *self.positions.first()?;
        Some(self.positions.iter().fold((first, first), |(mut min, mut max), p| {
            for axis in 0..3 {
                min[axis] = min[axis].min(p[axis]);
                max[axis] = max[axis].max(p[axis]);
            }
            (min, max)
        }))
    }

    /// Raw bytes of the position buffer, ready for upload.
    pub fn position_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.positions)
    }

    /// Raw bytes of the normal buffer.
    pub fn normal_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.normals)
    }

    /// Raw bytes of the texture coordinate buffer.
    pub fn uv_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.uvs)
    }

    /// Raw bytes of the index buffer.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}
