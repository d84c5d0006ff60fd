//! Local character snapshot and the cache-first policy built on it.
//!
//! - One logical snapshot per store, always replaced as a whole
//! - Unreadable snapshots are treated as absent (logged, not surfaced)
//! - List and detail lookups only hit the network on a cache miss
//! - Creates that the remote refuses are kept locally under a clock-based id

mod layer;
mod storage;
mod traits;

pub use layer::{CacheLayer, CacheResult, CacheSource, CreateOutcome};
pub use storage::{MemoryStorage, SqliteStorage};
pub use traits::CharacterStore;
