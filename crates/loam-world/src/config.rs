use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

pub const MIN_RENDER_DISTANCE: i32 = 1;
pub const MAX_RENDER_DISTANCE: i32 = 10;

/// World generation and streaming parameters.
///
/// Every field has a default, so an empty config file (or none at all)
/// produces the stock world. Elevation bands must satisfy
/// `water_level < sand_level < snow_level < max_height` and
/// `stone_depth < 0`; `validated()` enforces this after deserialization.
#[derive(Clone, Debug, Deserialize)]
pub struct WorldConfig {
    #[serde(default = "default_seed")]
    pub seed: i32,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: i32,
    #[serde(default = "default_render_distance")]
    pub render_distance: i32,
    #[serde(default = "default_max_height")]
    pub max_height: i32,
    #[serde(default = "default_detail_scale")]
    pub detail_scale: f32,
    #[serde(default = "default_sand_level")]
    pub sand_level: i32,
    #[serde(default = "default_snow_level")]
    pub snow_level: i32,
    #[serde(default = "default_water_level")]
    pub water_level: i32,
    #[serde(default = "default_stone_depth")]
    pub stone_depth: i32,
}

fn default_seed() -> i32 {
    1231
}
fn default_chunk_size() -> i32 {
    15
}
fn default_render_distance() -> i32 {
    MIN_RENDER_DISTANCE
}
fn default_max_height() -> i32 {
    50
}
fn default_detail_scale() -> f32 {
    25.0
}
fn default_sand_level() -> i32 {
    15
}
fn default_snow_level() -> i32 {
    35
}
fn default_water_level() -> i32 {
    10
}
fn default_stone_depth() -> i32 {
    -15
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            chunk_size: default_chunk_size(),
            render_distance: default_render_distance(),
            max_height: default_max_height(),
            detail_scale: default_detail_scale(),
            sand_level: default_sand_level(),
            snow_level: default_snow_level(),
            water_level: default_water_level(),
            stone_depth: default_stone_depth(),
        }
    }
}

impl WorldConfig {
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: WorldConfig = toml::from_str(toml_str)?;
        cfg.validated()
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }

    /// Checks band ordering and clamps the render distance into its range.
    pub fn validated(mut self) -> Result<Self, Box<dyn Error>> {
        if self.chunk_size < 1 {
            return Err("chunk_size must be positive".into());
        }
        if self.detail_scale <= 0.0 {
            return Err("detail_scale must be positive".into());
        }
        if !(self.water_level < self.sand_level
            && self.sand_level < self.snow_level
            && self.snow_level < self.max_height)
        {
            return Err("elevation bands must satisfy water < sand < snow < max_height".into());
        }
        if self.stone_depth >= 0 {
            return Err("stone_depth must be negative".into());
        }
        self.render_distance = self
            .render_distance
            .clamp(MIN_RENDER_DISTANCE, MAX_RENDER_DISTANCE);
        Ok(self)
    }

    /// Radius of the column footprint generated around a chunk origin.
    #[inline]
    pub fn generation_radius(&self) -> i32 {
        self.chunk_size / 2
    }
}
