use loam_blocks::BlockKind;

use crate::atlas::{ATLAS_CELL, atlas_cell};
use crate::face::Face;

/// Surface geometry for one chunk, rebuilt in full on every meshing pass.
///
/// Positions are chunk-local (relative to the chunk origin). Each face
/// contributes 4 vertices, 4 UV pairs and 6 indices; nothing is ever
/// patched in place.
#[derive(Default, Clone)]
pub struct MeshBuffer {
    pub positions: Vec<f32>,
    pub uvs: Vec<f32>,
    pub indices: Vec<u32>,
    face_count: u32,
}

impl MeshBuffer {
    /// Clears all arrays but retains capacity for reuse across passes.
    #[inline]
    pub fn clear_keep_capacity(&mut self) {
        self.positions.clear();
        self.uvs.clear();
        self.indices.clear();
        self.face_count = 0;
    }

    /// Pre-reserves capacity for approximately `n` faces.
    #[inline]
    pub fn reserve_faces(&mut self, n: usize) {
        self.positions.reserve(n * 4 * 3);
        self.uvs.reserve(n * 4 * 2);
        self.indices.reserve(n * 6);
    }

    #[inline]
    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.face_count == 0
    }

    /// Appends one unit-quad face of `kind` at the voxel whose center is
    /// `center` (already chunk-local).
    pub fn push_face(&mut self, center: [f32; 3], face: Face, kind: BlockKind) {
        let base = self.face_count * 4;
        for corner in face.corner_offsets() {
            self.positions.extend_from_slice(&[
                center[0] + corner[0],
                center[1] + corner[1],
                center[2] + corner[2],
            ]);
        }

        self.indices.extend_from_slice(&[
            base,
            base + 1,
            base + 2,
            base,
            base + 2,
            base + 3,
        ]);

        let (col, row) = atlas_cell(kind);
        let u0 = ATLAS_CELL * col as f32;
        let v0 = ATLAS_CELL * row as f32;
        let u1 = u0 + ATLAS_CELL;
        let v1 = v0 + ATLAS_CELL;
        self.uvs
            .extend_from_slice(&[u1, v0, u1, v1, u0, v1, u0, v0]);

        self.face_count += 1;
    }
}
