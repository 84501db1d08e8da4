//! Block kinds and the destruction-hardness catalog.
#![forbid(unsafe_code)]

mod catalog;

pub use catalog::BlockCatalog;

/// Closed set of block materials. `Air` means "no solid material" — both
/// never-generated space and voxels a player has removed.
///
/// The discriminant doubles as the save-file wire code and the texture-atlas
/// cell index, so the order here is load-bearing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BlockKind {
    Grass = 0,
    Sand = 1,
    Snow = 2,
    Water = 3,
    Stone = 4,
    Air = 5,
}

impl BlockKind {
    pub const ALL: [BlockKind; 6] = [
        BlockKind::Grass,
        BlockKind::Sand,
        BlockKind::Snow,
        BlockKind::Water,
        BlockKind::Stone,
        BlockKind::Air,
    ];

    /// Wire code used by the save format and atlas mapping.
    #[inline]
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Decodes a wire code; codes outside the closed set are invalid.
    #[inline]
    pub fn from_code(code: u8) -> Option<BlockKind> {
        match code {
            0 => Some(BlockKind::Grass),
            1 => Some(BlockKind::Sand),
            2 => Some(BlockKind::Snow),
            3 => Some(BlockKind::Water),
            4 => Some(BlockKind::Stone),
            5 => Some(BlockKind::Air),
            _ => None,
        }
    }

    /// Lowercase name used in catalog config files.
    pub fn name(self) -> &'static str {
        match self {
            BlockKind::Grass => "grass",
            BlockKind::Sand => "sand",
            BlockKind::Snow => "snow",
            BlockKind::Water => "water",
            BlockKind::Stone => "stone",
            BlockKind::Air => "air",
        }
    }

    pub fn from_name(name: &str) -> Option<BlockKind> {
        BlockKind::ALL.into_iter().find(|k| k.name() == name)
    }

    /// True for materials that occupy their cell with something visible.
    #[inline]
    pub fn is_present(self) -> bool {
        self != BlockKind::Air
    }
}
