//! Streaming coordinator and chunk instance pool.
#![forbid(unsafe_code)]

mod coordinator;
mod pool;

pub use coordinator::{ChunkCoordinator, Progress, StepBudget};
pub use pool::{InstancePool, PoolStats};
