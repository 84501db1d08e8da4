use loam_blocks::BlockKind;

/// Side length of one block texture inside the square atlas, in UV units.
/// The atlas therefore holds `1 / ATLAS_CELL` cells per row.
pub const ATLAS_CELL: f32 = 0.25;

/// Atlas cell (column, row) for a kind, derived from its wire code:
/// column = code mod cells-per-row, row = floor(code * cell size).
#[inline]
pub fn atlas_cell(kind: BlockKind) -> (u32, u32) {
    let code = kind.code() as u32;
    let per_row = (1.0 / ATLAS_CELL) as u32;
    let col = code % per_row;
    let row = (code as f32 * ATLAS_CELL) as u32;
    (col, row)
}
