use fastnoise_lite::{FastNoiseLite, NoiseType};
use loam_blocks::BlockKind;

use crate::config::WorldConfig;
use crate::pos::BlockPos;

/// Samples the noise slightly off the integer lattice; Perlin noise is
/// identically zero at lattice points.
const LATTICE_NUDGE: f32 = 0.1;

/// Pure height-field terrain: (seed, world column) -> voxel column.
///
/// Determinism is load-bearing. Persisted player edits are replayed on top
/// of freshly generated terrain after every chunk reload, so the same seed
/// and column must reproduce the same base voxels forever.
pub struct TerrainColumnGenerator {
    noise: FastNoiseLite,
    max_height: i32,
    sand_level: i32,
    snow_level: i32,
    water_level: i32,
    stone_depth: i32,
}

impl TerrainColumnGenerator {
    pub fn new(cfg: &WorldConfig) -> Self {
        let mut noise = FastNoiseLite::with_seed(cfg.seed);
        noise.set_noise_type(Some(NoiseType::Perlin));
        noise.set_frequency(Some(1.0 / cfg.detail_scale));
        Self {
            noise,
            max_height: cfg.max_height,
            sand_level: cfg.sand_level,
            snow_level: cfg.snow_level,
            water_level: cfg.water_level,
            stone_depth: cfg.stone_depth,
        }
    }

    /// Terrain surface height of the column at (wx, wz), in `0..=max_height`.
    pub fn height_at(&self, wx: i32, wz: i32) -> i32 {
        let n = self
            .noise
            .get_noise_2d(wx as f32 + LATTICE_NUDGE, wz as f32 + LATTICE_NUDGE);
        // remap [-1, 1] -> [0, 1] before scaling
        let h = ((n + 1.0) * 0.5 * self.max_height as f32) as i32;
        h.clamp(0, self.max_height)
    }

    /// Appends every voxel of the column at (wx, wz) to `out` as (y, kind).
    ///
    /// Band rules, top to bottom:
    /// - `0..=height`: Sand below `sand_level`, Grass below `snow_level`,
    ///   Snow above.
    /// - basins (`height < water_level`): Water up to one below the level.
    /// - `stone_depth+1..=-1`: a Stone slab under every column.
    /// Anything else stays out of the map (air).
    pub fn fill_column(&self, wx: i32, wz: i32, out: &mut Vec<(i32, BlockKind)>) {
        let height = self.height_at(wx, wz);

        for y in (0..=height).rev() {
            let kind = if y < self.sand_level {
                BlockKind::Sand
            } else if y < self.snow_level {
                BlockKind::Grass
            } else {
                BlockKind::Snow
            };
            out.push((y, kind));
        }

        for y in (height + 1)..self.water_level {
            out.push((y, BlockKind::Water));
        }

        for y in (self.stone_depth + 1)..=-1 {
            out.push((y, BlockKind::Stone));
        }
    }

    /// Convenience for callers that want world-space positions directly.
    pub fn column_at(&self, wx: i32, wz: i32) -> Vec<(BlockPos, BlockKind)> {
        let mut ys = Vec::new();
        self.fill_column(wx, wz, &mut ys);
        ys.into_iter()
            .map(|(y, kind)| (BlockPos::new(wx, y, wz), kind))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stock() -> TerrainColumnGenerator {
        TerrainColumnGenerator::new(&WorldConfig::default())
    }

    #[test]
    fn heights_are_deterministic_across_instances() {
        let a = stock();
        let b = stock();
        for wx in -40..40 {
            for wz in [-31, 0, 17] {
                assert_eq!(a.height_at(wx, wz), b.height_at(wx, wz));
            }
        }
    }

    #[test]
    fn different_seeds_differ_somewhere() {
        let a = stock();
        let cfg = WorldConfig {
            seed: 777,
            ..WorldConfig::default()
        };
        let b = TerrainColumnGenerator::new(&cfg);
        let differs = (-50..50).any(|wx| a.height_at(wx, 3) != b.height_at(wx, 3));
        assert!(differs);
    }

    #[test]
    fn banding_matches_the_thresholds() {
        let generator = stock();
        for (wx, wz) in [(0, 0), (12, -7), (-100, 55)] {
            let height = generator.height_at(wx, wz);
            let mut column = Vec::new();
            generator.fill_column(wx, wz, &mut column);

            for &(y, kind) in &column {
                if (0..=height).contains(&y) {
                    let expect = if y < 15 {
                        BlockKind::Sand
                    } else if y < 35 {
                        BlockKind::Grass
                    } else {
                        BlockKind::Snow
                    };
                    assert_eq!(kind, expect, "surface band at y={y}");
                } else if y > height && y >= 0 {
                    assert_eq!(kind, BlockKind::Water);
                    assert!(height < 10, "water only fills basins");
                    assert!(y < 10);
                } else {
                    assert_eq!(kind, BlockKind::Stone);
                    assert!((-14..=-1).contains(&y));
                }
            }

            // the stone slab is always exactly 14 blocks
            let stones = column.iter().filter(|(_, k)| *k == BlockKind::Stone).count();
            assert_eq!(stones, 14);
        }
    }

    #[test]
    fn column_keys_are_unique() {
        let generator = stock();
        let mut column = Vec::new();
        generator.fill_column(3, -9, &mut column);
        let mut ys: Vec<i32> = column.iter().map(|(y, _)| *y).collect();
        ys.sort_unstable();
        ys.dedup();
        assert_eq!(ys.len(), column.len());
    }
}
