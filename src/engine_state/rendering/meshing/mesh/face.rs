use crate::engine_state::voxels::block::block_side::{BlockSide, AXIS_Y};

/// A merged rectangle of visible faces on one slice plane.
///
/// The rectangle is stored in the plane's `(u, v)` cell coordinates; `slice` is the cell
/// index along the face normal. `corners` turns it into world-space vertex positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Quad {
    /// Which side of the blocks this quad covers.
    pub block_side: BlockSide,
    /// Cell index along the normal axis.
    pub slice: i32,
    /// Lowest cell along the `u` axis.
    pub u: i32,
    /// Lowest cell along the `v` axis.
    pub v: i32,
    /// Extent along `u`, in cells.
    pub width: i32,
    /// Extent along `v`, in cells.
    pub height: i32,
}

impl Quad {
    /// World-space corners in `(u, v)` order: `(0,0)`, `(w,0)`, `(w,h)`, `(0,h)`.
    ///
    /// # Arguments
    /// * `block_height` - Vertical extent of the block type; below 1 for half-height
    ///   types, which lowers top faces and shortens side faces.
    pub fn corners(&self, block_height: f32) -> [[f32; 3]; 4] {
        let axis = self.block_side.axis();
        let (u_axis, v_axis) = self.block_side.plane_axes();

        // Extents are summed in f64; cells at the ends of the i32 range stay valid.
        let block_height = block_height as f64;
        let slice = self.slice as f64;
        let plane = if !self.block_side.is_positive() {
            slice
        } else if axis == AXIS_Y {
            slice + block_height
        } else {
            slice + 1.0
        };

        let u0 = self.u as f64;
        let u1 = u0 + self.width as f64;
        let v0 = self.v as f64;
        let v1 = if v_axis == AXIS_Y {
            v0 + (self.height - 1) as f64 + block_height
        } else {
            v0 + self.height as f64
        };

        [(u0, v0), (u1, v0), (u1, v1), (u0, v1)].map(|(u, v)| {
            let mut corner = [0.0; 3];
            corner[axis] = plane as f32;
            corner[u_axis] = u as f32;
            corner[v_axis] = v as f32;
            corner
        })
    }

    /// Texture coordinates that tile one texture per cell.
    pub fn uvs(&self) -> [[f32; 2]; 4] {
        let (w, h) = (self.width as f32, self.height as f32);
        [[0.0, 0.0], [w, 0.0], [w, h], [0.0, h]]
    }

    /// Index pattern for the two triangles of this quad, relative to its first vertex.
    pub fn indices(&self) -> [u32; 6] {
        if self.block_side.reversed_winding() {
            [0, 2, 1, 0, 3, 2]
        } else {
            [0, 1, 2, 0, 2, 3]
        }
    }

    #[inline]
    pub fn area(&self) -> i32 {
        self.width * self.height
    }
}
