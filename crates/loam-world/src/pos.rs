use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Integer lattice position of one voxel (or of a chunk origin, y = 0).
///
/// Ordering compares (x, z, y) ascending. That is not a spatial index, only
/// the deterministic enumeration order used when sorting voxels for meshing
/// and edits for serialization.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z + dz,
        }
    }

    #[inline]
    pub fn with_y(self, y: i32) -> Self {
        Self { y, ..self }
    }

    /// Origin of the chunk that owns this position.
    ///
    /// Chunks are center-anchored (their footprint spans `origin ± radius`),
    /// so the owner is the *nearest* multiple of `chunk_size` on x and z,
    /// not the floor.
    #[inline]
    pub fn owning_origin(self, chunk_size: i32) -> BlockPos {
        BlockPos {
            x: snap_axis(self.x as f32, chunk_size),
            y: 0,
            z: snap_axis(self.z as f32, chunk_size),
        }
    }
}

/// Snaps a world-space point to the chunk grid (nearest origin, y = 0).
#[inline]
pub fn snap_to_grid(x: f32, z: f32, chunk_size: i32) -> BlockPos {
    BlockPos {
        x: snap_axis(x, chunk_size),
        y: 0,
        z: snap_axis(z, chunk_size),
    }
}

#[inline]
fn snap_axis(v: f32, chunk_size: i32) -> i32 {
    (v / chunk_size as f32).round() as i32 * chunk_size
}

impl Ord for BlockPos {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.x, self.z, self.y).cmp(&(other.x, other.z, other.y))
    }
}

impl PartialOrd for BlockPos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<(i32, i32, i32)> for BlockPos {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_by_x_then_z_then_y() {
        let mut v = vec![
            BlockPos::new(1, 0, 0),
            BlockPos::new(0, 5, 2),
            BlockPos::new(0, 1, 2),
            BlockPos::new(0, 9, 1),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                BlockPos::new(0, 9, 1),
                BlockPos::new(0, 1, 2),
                BlockPos::new(0, 5, 2),
                BlockPos::new(1, 0, 0),
            ]
        );
    }

    #[test]
    fn owner_is_nearest_multiple() {
        // chunk at origin 0 spans -7..=7 for size 15
        assert_eq!(
            BlockPos::new(7, 3, -7).owning_origin(15),
            BlockPos::new(0, 0, 0)
        );
        assert_eq!(
            BlockPos::new(8, 3, 0).owning_origin(15),
            BlockPos::new(15, 0, 0)
        );
        assert_eq!(
            BlockPos::new(-8, 0, 22).owning_origin(15),
            BlockPos::new(-15, 0, 15)
        );
    }

    #[test]
    fn snap_drops_height() {
        assert_eq!(snap_to_grid(1.0, 44.9, 15), BlockPos::new(0, 0, 45));
        assert_eq!(snap_to_grid(-7.4, 0.0, 15), BlockPos::new(0, 0, 0));
    }
}
