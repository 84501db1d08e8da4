//! Face tables, visibility rules and the rebuilt-per-pass mesh buffer.
#![forbid(unsafe_code)]

mod atlas;
mod buffer;
mod face;

pub use atlas::{ATLAS_CELL, atlas_cell};
pub use buffer::MeshBuffer;
pub use face::{Face, face_visible};
