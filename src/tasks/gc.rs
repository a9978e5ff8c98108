//! TTL Garbage Collection Task
//!
//! Background task that periodically sweeps random expiring keys out of
//! every shard.

use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::Cache;

/// Spawns the background garbage-collection task for a cache.
///
/// Every tick of the cache's configured interval the task samples random
/// expiring keys in each shard and deletes the expired ones, re-sweeping
/// shards where more than a quarter of the sample was dead. Shard locks
/// are released between passes, so no client operation waits longer than
/// one sampling window.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it during graceful shutdown.
pub fn spawn_gc_task(cache: Cache) -> JoinHandle<()> {
    let interval = cache.gc_interval();

    tokio::spawn(async move {
        info!("starting TTL garbage collector, tick interval {:?}", interval);
        let mut rng = StdRng::from_entropy();

        loop {
            tokio::time::sleep(interval).await;

            let removed = cache.collect_garbage(&mut rng).await;

            if removed > 0 {
                info!("garbage collector removed {} expired entries", removed);
            } else {
                debug!("garbage collector found no expired entries");
            }
        }
    })
}
