//! # Block Side Module
//!
//! This module defines the six axis-aligned faces of a voxel block and the fixed
//! axis mapping the mesher uses to lay quads out on each face plane.

/// Represents the six possible faces of a voxel block.
///
/// The order is: [FRONT, BACK, BOTTOM, TOP, LEFT, RIGHT]
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug, PartialOrd, Ord)]
pub enum BlockSide {
    /// The front face (facing positive Z)
    FRONT = 0,

    /// The back face (facing negative Z)
    BACK = 1,

    /// The bottom face (facing negative Y)
    BOTTOM = 2,

    /// The top face (facing positive Y)
    TOP = 3,

    /// The left face (facing negative X)
    LEFT = 4,

    /// The right face (facing positive X)
    RIGHT = 5,
}

/// Index of the X axis in coordinate triples.
pub const AXIS_X: usize = 0;
/// Index of the Y axis in coordinate triples.
pub const AXIS_Y: usize = 1;
/// Index of the Z axis in coordinate triples.
pub const AXIS_Z: usize = 2;

impl BlockSide {
    /// Returns an array containing all six block faces in a consistent order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::FRONT,
            BlockSide::BACK,
            BlockSide::BOTTOM,
            BlockSide::TOP,
            BlockSide::LEFT,
            BlockSide::RIGHT,
        ]
    }

    /// The axis the face normal points along.
    pub fn axis(self) -> usize {
        match self {
            BlockSide::LEFT | BlockSide::RIGHT => AXIS_X,
            BlockSide::BOTTOM | BlockSide::TOP => AXIS_Y,
            BlockSide::FRONT | BlockSide::BACK => AXIS_Z,
        }
    }

    /// Whether the normal points in the positive direction of its axis.
    pub fn is_positive(self) -> bool {
        matches!(self, BlockSide::RIGHT | BlockSide::TOP | BlockSide::FRONT)
    }

    /// The in-plane `(u, v)` axes used to lay out quads on this face.
    ///
    /// X faces use `u = Z, v = Y`, Y faces use `u = X, v = Z` and Z faces use
    /// `u = X, v = Y`, so side faces always have `v` pointing up.
    pub fn plane_axes(self) -> (usize, usize) {
        match self.axis() {
            AXIS_X => (AXIS_Z, AXIS_Y),
            AXIS_Y => (AXIS_X, AXIS_Z),
            _ => (AXIS_X, AXIS_Y),
        }
    }

    /// Offset from a block to the neighbour this face looks at.
    pub fn offset(self) -> [i32; 3] {
        let mut offset = [0; 3];
        offset[self.axis()] = if self.is_positive() { 1 } else { -1 };
        offset
    }

    /// Unit normal of the face.
    pub fn normal(self) -> [f32; 3] {
        let [x, y, z] = self.offset();
        [x as f32, y as f32, z as f32]
    }

    /// Whether quads on this face need reversed triangle winding.
    ///
    /// With the `plane_axes` mapping, `u x v` points against the normal for +X, +Y and
    /// -Z, so those faces flip their winding to stay front-facing outward.
    pub fn reversed_winding(self) -> bool {
        matches!(self, BlockSide::RIGHT | BlockSide::TOP | BlockSide::BACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn unit(axis: usize) -> [i32; 3] {
        let mut v = [0; 3];
        v[axis] = 1;
        v
    }

    #[test]
    fn reversed_winding_matches_plane_orientation() {
        for side in BlockSide::all() {
            let (u, v) = side.plane_axes();
            let natural = cross(unit(u), unit(v));
            let faces_outward = natural == side.offset();
            assert_eq!(
                faces_outward,
                !side.reversed_winding(),
                "winding mismatch for {:?}",
                side
            );
        }
    }

    #[test]
    fn plane_axes_exclude_normal_axis() {
        for side in BlockSide::all() {
            let (u, v) = side.plane_axes();
            assert_ne!(u, side.axis());
            assert_ne!(v, side.axis());
            assert_ne!(u, v);
        }
    }
}
