//! Cache Module
//!
//! Sharded in-memory key-value cache with per-key TTL expiration,
//! probabilistic garbage collection, and JSON snapshot persistence.

use std::time::Duration;

mod entry;
mod partition;
mod shard;
mod snapshot;
mod store;


// Re-export public types
pub use store::{Cache, Ttl};

// == Public Constants ==
/// Default number of shards
pub const DEFAULT_PARTITIONS: usize = 10;

/// Default garbage-collection tick interval
pub const DEFAULT_GC_INTERVAL: Duration = Duration::from_secs(1);

/// Default number of random expiring keys sampled per shard per GC tick,
/// also the floor applied when a caller passes zero
pub const DEFAULT_GC_CHECK_ITEMS: usize = 10;

/// Default snapshot file name
pub const DEFAULT_SNAPSHOT_FILE: &str = "cacheData.json";
