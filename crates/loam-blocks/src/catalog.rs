use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::BlockKind;

/// Seconds it takes to destroy each kind, indexed by wire code.
/// Water is free to "destroy"; `Air` has no entry at all.
const BUILTIN_HARDNESS: [f32; 5] = [0.5, 1.0, 1.5, 0.0, 2.5];

/// Static hardness table for the block set.
///
/// Lookups past the end of the table return 0.0 (instantly destructible).
/// That default covers `Air` and any future kind the table does not know
/// about; gameplay relies on it, so it is deliberate and kept.
#[derive(Clone, Debug)]
pub struct BlockCatalog {
    hardness: Vec<f32>,
}

impl Default for BlockCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl BlockCatalog {
    /// Catalog with the built-in hardness values.
    pub fn builtin() -> Self {
        Self {
            hardness: BUILTIN_HARDNESS.to_vec(),
        }
    }

    /// Destruction time for `kind`, or 0.0 when the table has no entry.
    #[inline]
    pub fn hardness(&self, kind: BlockKind) -> f32 {
        self.hardness_by_code(kind.code())
    }

    #[inline]
    pub fn hardness_by_code(&self, code: u8) -> f32 {
        self.hardness.get(code as usize).copied().unwrap_or(0.0)
    }

    /// Loads hardness overrides from a `[blocks]` table keyed by kind name.
    /// Unlisted kinds keep their built-in values; unknown names are rejected.
    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: CatalogConfig = toml::from_str(toml_str)?;
        let mut catalog = Self::builtin();
        for (name, value) in cfg.blocks {
            let kind = BlockKind::from_name(&name)
                .ok_or_else(|| format!("unknown block kind {name:?} in catalog"))?;
            let ix = kind.code() as usize;
            if ix >= catalog.hardness.len() {
                return Err(format!("block kind {name:?} has no hardness slot").into());
            }
            if value < 0.0 {
                return Err(format!("negative hardness for {name:?}").into());
            }
            catalog.hardness[ix] = value;
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

#[derive(Deserialize)]
struct CatalogConfig {
    #[serde(default)]
    blocks: HashMap<String, f32>,
}
