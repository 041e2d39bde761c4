//! Greedy meshing implementation for voxel rendering.
//!
//! This module implements the greedy meshing algorithm which combines adjacent coplanar
//! visible faces of one block type into larger quads, significantly reducing the number
//! of vertices the presentation layer has to draw.
//!
//! For each of the six face directions the visible faces are bucketed by slice along
//! the face normal. Within a slice, faces are split into spans of contiguous `u`
//! columns; each span gets one bit mask row per occupied `v` row, and the rows are
//! covered in order with rectangles grown first along `u`, then along `v`. Work and
//! memory follow the number of visible faces, never the coordinates they sit at.

use std::collections::{BTreeMap, HashSet};

use bitvec::prelude::*;
use log::trace;
use web_time::Instant;

use crate::engine_state::voxels::block::{
    block_side::{BlockSide, AXIS_Y},
    BlockKey, BlockType,
};

use super::{face::Quad, mesh::MeshData};

/// Builds the greedy mesh of one block type.
///
/// # Arguments
/// * `blocks` - Positions of every block of `block_type` to mesh; order is irrelevant
/// * `block_type` - The shared type, used for its height
/// * `should_cull` - Called with a neighbour position outside `blocks`; returning `true`
///   hides the face looking at that neighbour
///
/// # Returns
/// Geometry with one quad per merged rectangle. Empty input yields an empty mesh.
///
/// Half-height types never hide their top faces, and a half-height block stacked on
/// another of its type keeps its bottom face, since the gap between them is open.
pub fn greedy_mesh<F>(blocks: &[BlockKey], block_type: BlockType, should_cull: F) -> MeshData
where
    F: Fn(i32, i32, i32) -> bool,
{
    let mut mesh = MeshData::new();
    if blocks.is_empty() {
        return mesh;
    }
    let set: HashSet<BlockKey> = blocks.iter().copied().collect();

    let start = Instant::now();
    let block_height = block_type.height();
    let half_height = block_type.is_half_height();

    for side in BlockSide::all() {
        let faces = visible_faces(&set, side, half_height, &should_cull);
        for quad in side_quads(faces, side, !half_height) {
            mesh.push_quad(&quad, block_height);
        }
    }

    trace!(
        "Greedy meshed {} {} blocks into {} quads in {:?}",
        set.len(),
        block_type,
        mesh.quad_count(),
        start.elapsed()
    );
    mesh
}

/// Visible faces of one direction as `slice -> [(v, u)]`.
fn visible_faces<F>(
    set: &HashSet<BlockKey>,
    side: BlockSide,
    half_height: bool,
    should_cull: &F,
) -> BTreeMap<i32, Vec<(i32, i32)>>
where
    F: Fn(i32, i32, i32) -> bool,
{
    let d_axis = side.axis();
    let (u_axis, v_axis) = side.plane_axes();
    let [dx, dy, dz] = side.offset();
    let vertical = d_axis == AXIS_Y;

    let mut slices: BTreeMap<i32, Vec<(i32, i32)>> = BTreeMap::new();
    for key in set {
        let visible = match key.checked_offset(dx, dy, dz) {
            // Nothing exists past the edge of the coordinate range.
            None => true,
            Some(_) if half_height && vertical && side.is_positive() => true,
            Some(neighbor) if set.contains(&neighbor) => half_height && vertical,
            Some(neighbor) => !should_cull(neighbor.x, neighbor.y, neighbor.z),
        };
        if visible {
            let p = key.to_array();
            slices.entry(p[d_axis]).or_default().push((p[v_axis], p[u_axis]));
        }
    }
    slices
}

/// Merges the visible faces of one direction into quads.
fn side_quads(
    slices: BTreeMap<i32, Vec<(i32, i32)>>,
    side: BlockSide,
    merge_vertically: bool,
) -> Vec<Quad> {
    let (_, v_axis) = side.plane_axes();
    let grow_v = merge_vertically || v_axis != AXIS_Y;

    let mut quads = Vec::new();
    for (slice, cells) in slices {
        let spans = u_spans(&cells);
        let mut span_rows: Vec<BTreeMap<i32, BitVec>> = vec![BTreeMap::new(); spans.len()];
        for &(v, u) in &cells {
            let index = spans.partition_point(|&(first, _)| first <= u) - 1;
            let (first, width) = spans[index];
            span_rows[index]
                .entry(v)
                .or_insert_with(|| bitvec![0; width])
                .set((u as i64 - first as i64) as usize, true);
        }

        for (&(u_min, width), rows) in spans.iter().zip(span_rows.iter_mut()) {
            cover_rows(rows, width, grow_v, |u, v, w, h| {
                quads.push(Quad {
                    block_side: side,
                    slice,
                    u: u_min + u as i32,
                    v,
                    width: w as i32,
                    height: h,
                });
            });
        }
    }
    quads
}

/// Runs of contiguous `u` values in a slice as `(first u, length)`.
///
/// No face exists between two runs, so no rectangle crosses from one into the next.
fn u_spans(cells: &[(i32, i32)]) -> Vec<(i32, usize)> {
    let mut columns: Vec<i32> = cells.iter().map(|&(_, u)| u).collect();
    columns.sort_unstable();
    columns.dedup();

    let mut spans: Vec<(i32, usize)> = Vec::new();
    for u in columns {
        match spans.last_mut() {
            Some((first, len)) if u as i64 - *first as i64 == *len as i64 => *len += 1,
            _ => spans.push((u, 1)),
        }
    }
    spans
}

/// Covers the set bits of `rows` with rectangles, row-major, growing each rectangle
/// along `u` first and then into the following rows.
///
/// `emit` receives `(u offset, first row, width, height)`.
fn cover_rows<E>(rows: &mut BTreeMap<i32, BitVec>, width: usize, grow_v: bool, mut emit: E)
where
    E: FnMut(usize, i32, usize, i32),
{
    let row_keys: Vec<i32> = rows.keys().copied().collect();
    for v in row_keys {
        let mut i = 0;
        while i < width {
            let Some(row) = rows.get(&v) else {
                break;
            };
            if !row[i] {
                i += 1;
                continue;
            }

            let mut w = 1;
            while i + w < width && row[i + w] {
                w += 1;
            }

            let mut h: i32 = 1;
            if grow_v {
                while let Some(next) = v.checked_add(h) {
                    match rows.get(&next) {
                        Some(next_row) if next_row[i..i + w].all() => h += 1,
                        _ => break,
                    }
                }
            }

            for offset in 0..h {
                if let Some(row) = rows.get_mut(&(v + offset)) {
                    row[i..i + w].fill(false);
                }
            }

            emit(i, v, w, h);
            i += w;
        }
    }
}
