use loam_blocks::BlockKind;

/// One of the six axis-aligned directions of a unit cube.
///
/// Left/Right step along x, Front/Back along z, matching the original
/// world orientation (Front = +z).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Face {
    Top = 0,
    Bottom = 1,
    Left = 2,
    Right = 3,
    Front = 4,
    Back = 5,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
        Face::Front,
        Face::Back,
    ];

    /// Integer grid delta (dx, dy, dz) to the neighbor behind this face.
    #[inline]
    pub fn delta(self) -> (i32, i32, i32) {
        match self {
            Face::Top => (0, 1, 0),
            Face::Bottom => (0, -1, 0),
            Face::Left => (-1, 0, 0),
            Face::Right => (1, 0, 0),
            Face::Front => (0, 0, 1),
            Face::Back => (0, 0, -1),
        }
    }

    /// Outward unit normal.
    #[inline]
    pub fn normal(self) -> [f32; 3] {
        match self {
            Face::Top => [0.0, 1.0, 0.0],
            Face::Bottom => [0.0, -1.0, 0.0],
            Face::Left => [-1.0, 0.0, 0.0],
            Face::Right => [1.0, 0.0, 0.0],
            Face::Front => [0.0, 0.0, 1.0],
            Face::Back => [0.0, 0.0, -1.0],
        }
    }

    /// The quad's four corner offsets from the voxel center, in the winding
    /// order the index pattern `[0,1,2, 0,2,3]` expects.
    #[inline]
    pub fn corner_offsets(self) -> [[f32; 3]; 4] {
        const H: f32 = 0.5;
        match self {
            Face::Top => [[-H, H, H], [H, H, H], [H, H, -H], [-H, H, -H]],
            Face::Bottom => [[-H, -H, -H], [H, -H, -H], [H, -H, H], [-H, -H, H]],
            Face::Left => [[-H, -H, H], [-H, H, H], [-H, H, -H], [-H, -H, -H]],
            Face::Right => [[H, -H, -H], [H, H, -H], [H, H, H], [H, -H, H]],
            Face::Front => [[H, -H, H], [H, H, H], [-H, H, H], [-H, -H, H]],
            Face::Back => [[-H, -H, -H], [-H, H, -H], [H, H, -H], [H, -H, -H]],
        }
    }

    /// Whether water counts as see-through for this face.
    ///
    /// Every direction except Bottom treats a Water neighbor like air, so
    /// terrain under lakes still gets side and top faces. The Bottom face
    /// does not — longstanding behavior the save files' visuals depend on,
    /// preserved as-is.
    #[inline]
    pub fn water_transparent(self) -> bool {
        !matches!(self, Face::Bottom)
    }
}

/// Per-direction visibility rule: a face is emitted when the neighbor cell
/// does not hide it.
#[inline]
pub fn face_visible(face: Face, neighbor: Option<BlockKind>) -> bool {
    match neighbor {
        None | Some(BlockKind::Air) => true,
        Some(BlockKind::Water) => face.water_transparent(),
        Some(_) => false,
    }
}
