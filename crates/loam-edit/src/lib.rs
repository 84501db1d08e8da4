//! Player edits and persisted session state, keyed by chunk origin.
#![forbid(unsafe_code)]

use hashbrown::HashMap;
use loam_blocks::BlockKind;
use loam_world::BlockPos;

/// Spawn height used when no save exists yet.
pub const DEFAULT_SPAWN: [f32; 3] = [0.0, 45.0, 0.0];

#[derive(Default, Debug, Clone, Copy)]
pub struct EditStoreStats {
    pub origin_entries: usize,
    pub block_edits: usize,
}

/// Everything that survives a session: block edits grouped under the
/// origin of the chunk that owns them, plus the last player position.
///
/// Edits are a sparse overlay; the store never holds generated terrain.
#[derive(Clone, Debug)]
pub struct EditStore {
    inner: HashMap<BlockPos, HashMap<BlockPos, BlockKind>>,
    player_position: [f32; 3],
}

impl Default for EditStore {
    fn default() -> Self {
        Self {
            inner: HashMap::new(),
            player_position: DEFAULT_SPAWN,
        }
    }
}

impl EditStore {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn player_position(&self) -> [f32; 3] {
        self.player_position
    }

    #[inline]
    pub fn set_player_position(&mut self, pos: [f32; 3]) {
        self.player_position = pos;
    }

    /// Records an edit under `origin`. A later edit at the same position
    /// replaces the earlier one.
    pub fn record_edit(&mut self, origin: BlockPos, pos: BlockPos, kind: BlockKind) {
        self.inner.entry(origin).or_default().insert(pos, kind);
    }

    pub fn edit_at(&self, origin: BlockPos, pos: BlockPos) -> Option<BlockKind> {
        self.inner.get(&origin).and_then(|m| m.get(&pos).copied())
    }

    /// Snapshot of all edits recorded under one chunk origin.
    pub fn edits_for(&self, origin: BlockPos) -> Vec<(BlockPos, BlockKind)> {
        match self.inner.get(&origin) {
            Some(m) => m.iter().map(|(p, k)| (*p, *k)).collect(),
            None => Vec::new(),
        }
    }

    /// Origins that have at least one edit, in deterministic order.
    pub fn origins(&self) -> Vec<BlockPos> {
        let mut out: Vec<BlockPos> = self.inner.keys().copied().collect();
        out.sort();
        out
    }

    pub fn stats(&self) -> EditStoreStats {
        EditStoreStats {
            origin_entries: self.inner.len(),
            block_edits: self.inner.values().map(|m| m.len()).sum(),
        }
    }
}
