//! One streamed chunk: voxel map, edit overlay, cooperative terrain fill
//! and face-culled mesh extraction.
#![forbid(unsafe_code)]

use hashbrown::HashMap;

use loam_blocks::{BlockCatalog, BlockKind};
use loam_mesh::{Face, MeshBuffer, face_visible};
use loam_world::{BlockPos, TerrainColumnGenerator};

/// Level of detail assigned per streaming pass. `Near` sorts before `Far`,
/// which is what prioritizes visible chunks in the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Lod {
    /// Rendered and collidable.
    Near,
    /// Voxel data stays resident, nothing is drawn.
    Far,
}

/// Outcome of advancing a cooperative task by one budgeted slice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Step {
    Yielded,
    Done,
}

/// Run a whole task in one call instead of slicing it.
pub const UNBUDGETED: usize = usize::MAX;

struct TerrainCursor {
    next: usize,
    scratch: Vec<(i32, BlockKind)>,
}

struct MeshCursor {
    order: Vec<BlockPos>,
    next: usize,
    build: MeshBuffer,
}

/// A pooled, reusable chunk instance.
///
/// Lifecycle: `reset` (spawn at an origin, edit overlay loaded) → terrain
/// stepped to completion → mesh stepped to completion → possibly edited /
/// re-leveled for many passes → `unload` back to the pool. The origin never
/// changes between `reset` calls, and the mesh is only meaningful once
/// `mesh_ready` reports true.
pub struct Chunk {
    origin: BlockPos,
    radius: i32,
    voxels: HashMap<BlockPos, BlockKind>,
    edits: HashMap<BlockPos, BlockKind>,
    mesh: MeshBuffer,
    lod: Lod,
    terrain_ready: bool,
    mesh_ready: bool,
    terrain_cursor: Option<TerrainCursor>,
    mesh_cursor: Option<MeshCursor>,
}

impl Chunk {
    /// A blank instance for the pool. `chunk_size` fixes the generation
    /// footprint (`radius = chunk_size / 2` columns in each direction).
    pub fn new(chunk_size: i32) -> Self {
        Self {
            origin: BlockPos::default(),
            radius: chunk_size / 2,
            voxels: HashMap::new(),
            edits: HashMap::new(),
            mesh: MeshBuffer::default(),
            lod: Lod::Near,
            terrain_ready: false,
            mesh_ready: false,
            terrain_cursor: None,
            mesh_cursor: None,
        }
    }

    /// Re-targets a pooled instance to `origin` and seeds the persisted edit
    /// overlay. Clears any state a previous tenant left behind.
    pub fn reset(
        &mut self,
        origin: BlockPos,
        overlay: impl IntoIterator<Item = (BlockPos, BlockKind)>,
    ) {
        self.unload();
        self.origin = origin;
        for (pos, kind) in overlay {
            self.edits.insert(pos, kind);
        }
    }

    #[inline]
    pub fn origin(&self) -> BlockPos {
        self.origin
    }

    #[inline]
    pub fn lod(&self) -> Lod {
        self.lod
    }

    #[inline]
    pub fn set_lod(&mut self, lod: Lod) {
        self.lod = lod;
    }

    #[inline]
    pub fn terrain_ready(&self) -> bool {
        self.terrain_ready
    }

    #[inline]
    pub fn mesh_ready(&self) -> bool {
        self.mesh_ready
    }

    /// Renderable output; only valid once `mesh_ready` is true.
    #[inline]
    pub fn mesh(&self) -> &MeshBuffer {
        &self.mesh
    }

    #[inline]
    pub fn is_renderable(&self) -> bool {
        self.mesh_ready && self.lod == Lod::Near
    }

    #[inline]
    pub fn voxel_at(&self, pos: BlockPos) -> Option<BlockKind> {
        self.voxels.get(&pos).copied()
    }

    #[inline]
    pub fn voxel_count(&self) -> usize {
        self.voxels.len()
    }

    pub fn edits(&self) -> impl Iterator<Item = (BlockPos, BlockKind)> + '_ {
        self.edits.iter().map(|(p, k)| (*p, *k))
    }

    /// True when (wx, wz) falls inside this chunk's column footprint.
    #[inline]
    pub fn footprint_contains(&self, pos: BlockPos) -> bool {
        (pos.x - self.origin.x).abs() <= self.radius
            && (pos.z - self.origin.z).abs() <= self.radius
    }

    fn footprint_width(&self) -> usize {
        (2 * self.radius + 1) as usize
    }

    /// Advances terrain generation by up to `columns` columns.
    ///
    /// On completion the persisted edit overlay is written over the fresh
    /// terrain, so player changes always win over regeneration.
    pub fn step_terrain(&mut self, generator: &TerrainColumnGenerator, columns: usize) -> Step {
        if self.terrain_ready {
            return Step::Done;
        }

        let width = self.footprint_width();
        let total = width * width;
        let mut cursor = self.terrain_cursor.take().unwrap_or(TerrainCursor {
            next: 0,
            scratch: Vec::new(),
        });

        let mut produced = 0;
        while cursor.next < total && produced < columns {
            let i = (cursor.next / width) as i32 - self.radius;
            let j = (cursor.next % width) as i32 - self.radius;
            let wx = self.origin.x + i;
            let wz = self.origin.z + j;

            cursor.scratch.clear();
            generator.fill_column(wx, wz, &mut cursor.scratch);
            for &(y, kind) in &cursor.scratch {
                self.voxels.insert(BlockPos::new(wx, y, wz), kind);
            }

            cursor.next += 1;
            produced += 1;
        }

        if cursor.next < total {
            self.terrain_cursor = Some(cursor);
            return Step::Yielded;
        }

        for (pos, kind) in &self.edits {
            self.voxels.insert(*pos, *kind);
        }
        self.terrain_ready = true;
        self.mesh_ready = false;
        log::debug!(
            target: "chunk",
            "terrain ready at {} ({} voxels)",
            self.origin,
            self.voxels.len()
        );
        Step::Done
    }

    /// Advances mesh extraction by up to `voxels` map entries.
    ///
    /// The voxel map is walked in (x, z, y) order so output geometry is
    /// deterministic; the buffer under construction lives in the cursor and
    /// only replaces the chunk's mesh once the pass finishes, which makes
    /// abandoning a half-built pass (edit, unload) safe.
    pub fn step_mesh(&mut self, voxels: usize) -> Step {
        if self.mesh_ready {
            return Step::Done;
        }
        debug_assert!(self.terrain_ready, "mesh extraction before terrain");

        let mut cursor = self.mesh_cursor.take().unwrap_or_else(|| {
            let mut order: Vec<BlockPos> = self.voxels.keys().copied().collect();
            order.sort_unstable();
            let mut build = std::mem::take(&mut self.mesh);
            build.clear_keep_capacity();
            build.reserve_faces(order.len() / 2);
            MeshCursor {
                order,
                next: 0,
                build,
            }
        });

        let mut visited = 0;
        while cursor.next < cursor.order.len() && visited < voxels {
            let pos = cursor.order[cursor.next];
            cursor.next += 1;
            visited += 1;

            let kind = match self.voxels.get(&pos) {
                Some(k) if k.is_present() => *k,
                _ => continue,
            };

            let center = [
                (pos.x - self.origin.x) as f32,
                pos.y as f32,
                (pos.z - self.origin.z) as f32,
            ];
            for face in Face::ALL {
                let (dx, dy, dz) = face.delta();
                let neighbor = self.voxels.get(&pos.offset(dx, dy, dz)).copied();
                if face_visible(face, neighbor) {
                    cursor.build.push_face(center, face, kind);
                }
            }
        }

        if cursor.next < cursor.order.len() {
            self.mesh_cursor = Some(cursor);
            return Step::Yielded;
        }

        self.mesh = cursor.build;
        self.mesh_ready = true;
        log::debug!(
            target: "chunk",
            "mesh ready at {} ({} faces)",
            self.origin,
            self.mesh.face_count()
        );
        Step::Done
    }

    /// Places or removes (`BlockKind::Air`) a single voxel.
    ///
    /// The edit lands in both the voxel map and the edit overlay, supersedes
    /// any mesh pass in flight, and remeshes immediately once terrain
    /// exists — edits must never wait behind throttled background work.
    pub fn apply_edit(&mut self, pos: BlockPos, kind: BlockKind) {
        self.voxels.insert(pos, kind);
        self.edits.insert(pos, kind);
        self.mesh_cursor = None;
        self.mesh_ready = false;
        if self.terrain_ready {
            self.step_mesh(UNBUDGETED);
        }
    }

    /// Destruction time of the voxel at `pos`; 0.0 for air or anything the
    /// catalog does not list.
    pub fn hardness_at(&self, pos: BlockPos, catalog: &BlockCatalog) -> f32 {
        self.voxels
            .get(&pos)
            .map(|kind| catalog.hardness(*kind))
            .unwrap_or(0.0)
    }

    /// Cancels in-flight work and releases voxel state so the instance can
    /// go back to the pool. Idempotent; a chunk that never generated
    /// anything has nothing to drop.
    pub fn unload(&mut self) {
        self.terrain_cursor = None;
        self.mesh_cursor = None;
        self.voxels.clear();
        self.edits.clear();
        self.mesh.clear_keep_capacity();
        self.terrain_ready = false;
        self.mesh_ready = false;
        self.lod = Lod::Near;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use loam_world::WorldConfig;

    fn generator() -> TerrainColumnGenerator {
        TerrainColumnGenerator::new(&WorldConfig::default())
    }

    fn ready_chunk(origin: BlockPos) -> Chunk {
        let mut c = Chunk::new(15);
        c.reset(origin, []);
        assert_eq!(c.step_terrain(&generator(), UNBUDGETED), Step::Done);
        assert_eq!(c.step_mesh(UNBUDGETED), Step::Done);
        c
    }

    #[test]
    fn throttled_and_immediate_runs_agree() {
        let generator = generator();
        let origin = BlockPos::new(15, 0, -30);

        let mut fast = Chunk::new(15);
        fast.reset(origin, []);
        fast.step_terrain(&generator, UNBUDGETED);
        fast.step_mesh(UNBUDGETED);

        let mut slow = Chunk::new(15);
        slow.reset(origin, []);
        let mut guard = 0;
        while slow.step_terrain(&generator, 5) == Step::Yielded {
            guard += 1;
            assert!(guard < 10_000);
        }
        while slow.step_mesh(150) == Step::Yielded {
            guard += 1;
            assert!(guard < 100_000);
        }

        assert_eq!(fast.voxel_count(), slow.voxel_count());
        assert_eq!(fast.mesh().face_count(), slow.mesh().face_count());
        assert_eq!(fast.mesh().positions, slow.mesh().positions);
    }

    #[test]
    fn overlay_beats_regenerated_terrain() {
        let generator = generator();
        let origin = BlockPos::new(0, 0, 0);
        let pos = BlockPos::new(2, 1, 3);

        let mut first = Chunk::new(15);
        first.reset(origin, []);
        first.step_terrain(&generator, UNBUDGETED);
        first.step_mesh(UNBUDGETED);
        let generated = first.voxel_at(pos);
        first.apply_edit(pos, BlockKind::Stone);
        assert_ne!(generated, Some(BlockKind::Stone));

        // a fresh instance regenerates the same terrain, then replays edits
        let mut second = Chunk::new(15);
        second.reset(origin, first.edits().collect::<Vec<_>>());
        second.step_terrain(&generator, UNBUDGETED);
        assert_eq!(second.voxel_at(pos), Some(BlockKind::Stone));
    }

    #[test]
    fn edit_remeshes_immediately() {
        let mut chunk = ready_chunk(BlockPos::new(0, 0, 0));
        let before = chunk.mesh().face_count();

        // a floating block above the terrain adds exactly six faces
        let high = BlockPos::new(0, 60, 0);
        chunk.apply_edit(high, BlockKind::Stone);
        assert!(chunk.mesh_ready());
        assert_eq!(chunk.mesh().face_count(), before + 6);

        // removing it restores the old count; no stale faces survive
        chunk.apply_edit(high, BlockKind::Air);
        assert_eq!(chunk.mesh().face_count(), before);
    }

    #[test]
    fn face_count_matches_visibility_rule() {
        let chunk = ready_chunk(BlockPos::new(-15, 0, 15));
        let mut expected = 0u32;
        for y in -20..=55 {
            for dx in -7..=7 {
                for dz in -7..=7 {
                    let pos = BlockPos::new(-15 + dx, y, 15 + dz);
                    if !chunk.voxel_at(pos).is_some_and(|k| k.is_present()) {
                        continue;
                    }
                    for face in Face::ALL {
                        let (ddx, ddy, ddz) = face.delta();
                        if face_visible(face, chunk.voxel_at(pos.offset(ddx, ddy, ddz))) {
                            expected += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(chunk.mesh().face_count(), expected);
    }

    #[test]
    fn unload_is_idempotent_and_enables_reuse() {
        let mut chunk = ready_chunk(BlockPos::new(0, 0, 0));
        assert!(chunk.voxel_count() > 0);

        chunk.unload();
        chunk.unload();
        assert_eq!(chunk.voxel_count(), 0);
        assert!(!chunk.terrain_ready());
        assert!(!chunk.mesh_ready());
        assert!(chunk.mesh().is_empty());

        // never-generated chunks can unload too
        let mut blank = Chunk::new(15);
        blank.unload();
        assert_eq!(blank.voxel_count(), 0);

        chunk.reset(BlockPos::new(45, 0, 0), []);
        chunk.step_terrain(&generator(), UNBUDGETED);
        assert!(chunk.terrain_ready());
        assert_eq!(chunk.origin(), BlockPos::new(45, 0, 0));
    }

    #[test]
    fn unload_cancels_inflight_work() {
        let generator = generator();
        let mut chunk = Chunk::new(15);
        chunk.reset(BlockPos::new(0, 0, 0), []);
        assert_eq!(chunk.step_terrain(&generator, 3), Step::Yielded);
        chunk.unload();
        assert_eq!(chunk.voxel_count(), 0);

        // resumes cleanly from scratch
        chunk.reset(BlockPos::new(0, 0, 0), []);
        assert_eq!(chunk.step_terrain(&generator, UNBUDGETED), Step::Done);
    }

    #[test]
    fn hardness_defaults_to_zero_off_the_map() {
        let chunk = ready_chunk(BlockPos::new(0, 0, 0));
        let catalog = BlockCatalog::builtin();
        // far above terrain: nothing there
        assert_eq!(
            chunk.hardness_at(BlockPos::new(0, 64, 0), &catalog),
            0.0
        );
        // bedrock is always stone
        assert_eq!(
            chunk.hardness_at(BlockPos::new(0, -1, 0), &catalog),
            2.5
        );
    }
}
