//! World coordinates, generation config and the terrain height field.
#![forbid(unsafe_code)]

mod config;
mod pos;
mod terrain;

pub use config::{MAX_RENDER_DISTANCE, MIN_RENDER_DISTANCE, WorldConfig};
pub use pos::{BlockPos, snap_to_grid};
pub use terrain::TerrainColumnGenerator;
