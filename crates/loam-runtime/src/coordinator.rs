use loam_blocks::{BlockCatalog, BlockKind};
use loam_chunk::{Chunk, Lod, Step, UNBUDGETED};
use loam_edit::EditStore;
use loam_world::{BlockPos, TerrainColumnGenerator, WorldConfig, snap_to_grid};

use crate::pool::{InstancePool, PoolStats};

/// Per-call slice sizes for cooperative stepping. The defaults keep a
/// single `step` call cheap enough to interleave with a frame; use
/// `immediate()` when latency matters more than pacing.
#[derive(Clone, Copy, Debug)]
pub struct StepBudget {
    pub columns: usize,
    pub voxels: usize,
}

impl Default for StepBudget {
    fn default() -> Self {
        Self {
            columns: 5,
            voxels: 150,
        }
    }
}

impl StepBudget {
    /// Run every task to completion within one `step` call.
    pub fn immediate() -> Self {
        Self {
            columns: UNBUDGETED,
            voxels: UNBUDGETED,
        }
    }
}

/// What a `step` call accomplished.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Progress {
    /// No pass in flight.
    Idle,
    /// A pass is in flight and advanced.
    Working,
    /// The in-flight pass just finished; every desired chunk is ready.
    Completed,
}

/// Decides which chunks exist around the viewpoint and drives their
/// terrain and mesh tasks, near chunks first.
///
/// One streaming pass runs at a time. A new pass begins only when the
/// viewpoint's snapped grid position differs from the last completed
/// one (or on an explicit `run_pass`), so small movements inside a chunk
/// are free.
pub struct ChunkCoordinator {
    cfg: WorldConfig,
    generator: TerrainColumnGenerator,
    catalog: BlockCatalog,
    pool: InstancePool<Chunk>,
    active: Vec<Chunk>,
    last_center: Option<BlockPos>,
    pending_center: Option<BlockPos>,
}

impl ChunkCoordinator {
    pub fn new(cfg: WorldConfig, catalog: BlockCatalog) -> Self {
        let generator = TerrainColumnGenerator::new(&cfg);
        let chunk_size = cfg.chunk_size;
        Self {
            cfg,
            generator,
            catalog,
            pool: InstancePool::new(move || Chunk::new(chunk_size)),
            active: Vec::new(),
            last_center: None,
            pending_center: None,
        }
    }

    #[inline]
    pub fn config(&self) -> &WorldConfig {
        &self.cfg
    }

    /// Queues enough pooled chunks for a full streaming ring plus slack.
    pub fn warm_up(&mut self) {
        let side = (self.cfg.render_distance + 2) as usize;
        self.pool.warm_up(side * side * 2);
    }

    /// Advances pool warm-up by up to `budget` instances.
    pub fn step_warm_up(&mut self, budget: usize) -> Step {
        self.pool.step_warm_up(budget)
    }

    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Snaps the viewpoint to the chunk grid and, if it moved to a new
    /// grid cell and no pass is in flight, begins a streaming pass.
    /// Returns whether a pass was started.
    pub fn update_center(&mut self, viewpoint: [f32; 3], store: &EditStore) -> bool {
        if self.pending_center.is_some() {
            return false;
        }
        let center = snap_to_grid(viewpoint[0], viewpoint[2], self.cfg.chunk_size);
        if self.last_center == Some(center) {
            return false;
        }
        self.begin_pass(center, store);
        true
    }

    /// Starts a pass at `center` unconditionally (used at startup, before
    /// any center has been processed).
    pub fn begin_pass(&mut self, center: BlockPos, store: &EditStore) {
        let cs = self.cfg.chunk_size;
        let rd = self.cfg.render_distance;

        // Data ring is one chunk wider than the rendered ring; the rim is
        // kept resident at Far so crossing a boundary has terrain waiting.
        let data_radius = rd + 1;
        let mut desired: Vec<BlockPos> = Vec::new();
        for dz in -data_radius..=data_radius {
            for dx in -data_radius..=data_radius {
                desired.push(BlockPos::new(center.x + dx * cs, 0, center.z + dz * cs));
            }
        }

        let lod_for = |origin: BlockPos| {
            let far = (origin.x - center.x).abs().max((origin.z - center.z).abs()) > rd * cs;
            if far { Lod::Far } else { Lod::Near }
        };

        let mut retained = 0usize;
        let mut recycled = 0usize;
        let mut kept: Vec<Chunk> = Vec::with_capacity(desired.len());
        for mut chunk in self.active.drain(..) {
            if desired.contains(&chunk.origin()) {
                chunk.set_lod(lod_for(chunk.origin()));
                kept.push(chunk);
                retained += 1;
            } else {
                chunk.unload();
                self.pool.release(chunk);
                recycled += 1;
            }
        }

        for origin in desired {
            if kept.iter().any(|c| c.origin() == origin) {
                continue;
            }
            let mut chunk = self.pool.acquire();
            chunk.reset(origin, store.edits_for(origin));
            chunk.set_lod(lod_for(origin));
            kept.push(chunk);
        }

        // Near chunks generate and mesh before Far ones.
        kept.sort_by_key(|c| (c.lod(), c.origin()));
        let spawned = kept.len() - retained;
        self.active = kept;
        self.pending_center = Some(center);
        log::info!(
            target: "runtime",
            "pass at {center}: {retained} retained, {spawned} spawned, {recycled} recycled"
        );
    }

    /// Advances the in-flight pass by one budgeted slice: the first chunk
    /// that is not fully meshed gets either a terrain slice or a mesh
    /// slice, in the pass ordering.
    pub fn step(&mut self, budget: StepBudget) -> Progress {
        let Some(center) = self.pending_center else {
            return Progress::Idle;
        };

        for chunk in &mut self.active {
            if chunk.mesh_ready() {
                continue;
            }
            if !chunk.terrain_ready() {
                chunk.step_terrain(&self.generator, budget.columns);
            } else {
                chunk.step_mesh(budget.voxels);
            }
            return Progress::Working;
        }

        self.pending_center = None;
        self.last_center = Some(center);
        log::debug!(target: "runtime", "pass at {center} complete");
        Progress::Completed
    }

    /// Runs the in-flight pass (if any) to completion without yielding.
    pub fn run_pass(&mut self) {
        while self.step(StepBudget::immediate()) == Progress::Working {}
    }

    /// Routes a single-block edit to the chunk owning `pos`. The edit is
    /// applied and remeshed immediately, and recorded in `store` for
    /// persistence. Returns false (and records nothing) when no active
    /// chunk owns the position.
    pub fn place_block(&mut self, pos: BlockPos, kind: BlockKind, store: &mut EditStore) -> bool {
        let origin = pos.owning_origin(self.cfg.chunk_size);
        let Some(chunk) = self.active.iter_mut().find(|c| c.origin() == origin) else {
            log::warn!(target: "runtime", "edit at {pos} outside the active ring; dropped");
            return false;
        };
        chunk.apply_edit(pos, kind);
        store.record_edit(origin, pos, kind);
        true
    }

    /// Destruction time for the voxel at `pos`; 0.0 when nothing is there
    /// or no active chunk owns the position.
    pub fn hardness_at(&self, pos: BlockPos) -> f32 {
        let origin = pos.owning_origin(self.cfg.chunk_size);
        self.active
            .iter()
            .find(|c| c.origin() == origin)
            .map(|c| c.hardness_at(pos, &self.catalog))
            .unwrap_or(0.0)
    }

    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> {
        self.active.iter()
    }

    /// Chunks whose mesh should be drawn this frame.
    pub fn renderable(&self) -> impl Iterator<Item = &Chunk> {
        self.active.iter().filter(|c| c.is_renderable())
    }

    #[inline]
    pub fn last_center(&self) -> Option<BlockPos> {
        self.last_center
    }

    #[inline]
    pub fn pass_in_flight(&self) -> bool {
        self.pending_center.is_some()
    }
}
