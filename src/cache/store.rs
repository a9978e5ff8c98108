//! Cache Store Module
//!
//! The cache facade: routes each key to its shard, enforces the locking
//! discipline, and carries the snapshot and garbage-collection plumbing.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::entry::now_nanos;
use crate::cache::partition::shard_index;
use crate::cache::shard::ShardState;
use crate::cache::snapshot::{self, Snapshot};
use crate::cache::{
    DEFAULT_GC_CHECK_ITEMS, DEFAULT_GC_INTERVAL, DEFAULT_PARTITIONS, DEFAULT_SNAPSHOT_FILE,
};
use crate::error::Result;

// == TTL Verdict ==
/// Result of a TTL query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ttl {
    /// Key absent, or its remaining lifetime floors to zero or less
    Missing,
    /// Key present with no expiration set
    NoExpiry,
    /// Remaining whole seconds, always positive
    Seconds(i64),
}

// == Cache ==
/// Sharded in-memory cache with per-key TTL and snapshot persistence.
///
/// Cloning is cheap; clones share the same shards. Each shard is guarded
/// by its own reader-writer lock and no operation ever holds two shard
/// locks at once. A separate top-level lock serializes `persist` against
/// `reload`; plain operations never touch it.
#[derive(Debug, Clone)]
pub struct Cache {
    inner: Arc<CacheInner>,
}

#[derive(Debug)]
struct CacheInner {
    shards: Vec<RwLock<ShardState>>,
    /// Serializes persistence: `persist` takes it shared, `reload` exclusive.
    persistence: RwLock<()>,
    snapshot_path: PathBuf,
    gc_interval: Duration,
    gc_check_items: usize,
}

impl Cache {
    // == Constructor ==
    /// Creates a cache with `partitions` shards (floored to 1), the given
    /// garbage-collection cadence and per-shard sample size (floored to
    /// 10), and the snapshot file path.
    ///
    /// The garbage collector itself is a separate task; see
    /// [`crate::tasks::spawn_gc_task`].
    pub fn new(
        partitions: usize,
        gc_interval: Duration,
        gc_check_items: usize,
        snapshot_path: impl Into<PathBuf>,
    ) -> Self {
        let partitions = partitions.max(1);
        let shards = (0..partitions)
            .map(|_| RwLock::new(ShardState::default()))
            .collect();
        Self {
            inner: Arc::new(CacheInner {
                shards,
                persistence: RwLock::new(()),
                snapshot_path: snapshot_path.into(),
                gc_interval,
                gc_check_items: if gc_check_items > 0 {
                    gc_check_items
                } else {
                    DEFAULT_GC_CHECK_ITEMS
                },
            }),
        }
    }

    /// Creates a cache with the reference defaults: 10 partitions, a one
    /// second GC tick, 10 sampled keys per shard per tick, and
    /// `cacheData.json` as the snapshot file.
    pub fn with_defaults() -> Self {
        Self::new(
            DEFAULT_PARTITIONS,
            DEFAULT_GC_INTERVAL,
            DEFAULT_GC_CHECK_ITEMS,
            DEFAULT_SNAPSHOT_FILE,
        )
    }

    /// Garbage-collection tick interval this cache was built with.
    pub fn gc_interval(&self) -> Duration {
        self.inner.gc_interval
    }

    fn shard_for(&self, key: &str) -> &RwLock<ShardState> {
        &self.inner.shards[shard_index(key, self.inner.shards.len())]
    }

    // == Get ==
    /// Retrieves the value stored under `key`, or `None` when the key is
    /// absent or its entry has expired.
    ///
    /// An expired entry is deleted before returning, under the shard's
    /// write lock and only after re-checking the deadline there, so a
    /// racing `put` that re-installs the key is never clobbered.
    pub async fn get(&self, key: &str) -> Option<Value> {
        let shard = self.shard_for(key);
        {
            let state = shard.read().await;
            match state.entries.get(key) {
                None => return None,
                Some(entry) if !entry.is_expired_at(now_nanos()) => {
                    return Some(entry.value.clone());
                }
                Some(_) => {}
            }
        }
        Self::remove_if_expired(shard, key).await;
        None
    }

    /// Deletes `key` if it is still expired once the write lock is held.
    async fn remove_if_expired(shard: &RwLock<ShardState>, key: &str) {
        let mut state = shard.write().await;
        let stale = state
            .entries
            .get(key)
            .map_or(false, |entry| entry.is_expired_at(now_nanos()));
        if stale {
            state.remove(key);
        }
    }

    // == Put ==
    /// Stores `value` under `key`, replacing any existing value in place.
    ///
    /// `expire_seconds > 0` sets or refreshes the TTL; zero or negative
    /// clears it, so a plain overwrite leaves the entry persistent.
    pub async fn put(&self, key: &str, value: Value, expire_seconds: i64) {
        let mut state = self.shard_for(key).write().await;
        state.insert(key, value, expire_seconds, now_nanos());
    }

    // == Expire ==
    /// Sets, refreshes, or clears (`expire_seconds <= 0`) the TTL of an
    /// existing key. Returns `false` without touching anything when the
    /// key is absent or already expired; an expired entry found here is
    /// deleted in the same critical section.
    pub async fn expire(&self, key: &str, expire_seconds: i64) -> bool {
        let mut state = self.shard_for(key).write().await;
        let now = now_nanos();
        match state.entries.get(key) {
            None => false,
            Some(entry) if entry.is_expired_at(now) => {
                state.remove(key);
                false
            }
            Some(_) => {
                state.update_expiration(key, expire_seconds, now);
                true
            }
        }
    }

    // == Remove ==
    /// Deletes `key`. Returns whether a live (non-expired) entry was
    /// present; an expired leftover is dropped but reported as absent.
    pub async fn remove(&self, key: &str) -> bool {
        let mut state = self.shard_for(key).write().await;
        let live = state
            .entries
            .get(key)
            .map_or(false, |entry| !entry.is_expired_at(now_nanos()));
        state.remove(key);
        live
    }

    // == Keys ==
    /// Collects every live key. Shards are visited one at a time under
    /// their read locks; the order of the result is unspecified and the
    /// list is a point-in-time snapshot per shard.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        for shard in &self.inner.shards {
            let state = shard.read().await;
            keys.extend(state.live_keys(now_nanos()));
        }
        keys
    }

    // == TTL ==
    /// Reports the remaining lifetime of `key`; see [`Ttl`].
    ///
    /// A present entry whose remaining time floors to zero or less is
    /// reported as [`Ttl::Missing`], and one already past its deadline is
    /// removed the same way `get` removes it.
    pub async fn ttl(&self, key: &str) -> Ttl {
        let shard = self.shard_for(key);
        {
            let state = shard.read().await;
            let now = now_nanos();
            match state.entries.get(key) {
                None => return Ttl::Missing,
                Some(entry) if entry.is_expired_at(now) => {}
                Some(entry) => {
                    return match entry.remaining_seconds_at(now) {
                        None => Ttl::NoExpiry,
                        Some(seconds) if seconds > 0 => Ttl::Seconds(seconds),
                        Some(_) => Ttl::Missing,
                    };
                }
            }
        }
        Self::remove_if_expired(shard, key).await;
        Ttl::Missing
    }

    // == Clear ==
    /// Drops every entry in every shard.
    pub async fn clear(&self) {
        for shard in &self.inner.shards {
            let mut state = shard.write().await;
            *state = ShardState::default();
        }
    }

    // == Garbage Collection ==
    /// Runs one garbage-collection tick over all shards and returns the
    /// number of entries removed.
    ///
    /// Per shard: a cheap read-locked size probe skips empty indices, then
    /// bounded sampling passes run under the write lock, each inspecting
    /// up to the configured number of random expiring keys. A pass that
    /// deletes more than 25% of its sample re-runs for the same shard, so
    /// sweep effort tracks expiration pressure; the lock is released
    /// between passes.
    pub async fn collect_garbage<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let check_items = self.inner.gc_check_items;
        let mut total = 0;
        for (index, shard) in self.inner.shards.iter().enumerate() {
            if shard.read().await.expire_keys.is_empty() {
                continue;
            }
            loop {
                let deleted = {
                    let mut state = shard.write().await;
                    state.sweep_sample(check_items, now_nanos(), rng)
                };
                total += deleted;
                if deleted * 100 / check_items <= 25 {
                    break;
                }
                debug!(shard = index, deleted, "re-sweeping shard under pressure");
            }
        }
        total
    }

    // == Persist ==
    /// Serializes the whole cache to the snapshot file.
    ///
    /// Shards are captured sequentially under their read locks, so the
    /// image may interleave with writes on other shards (a fuzzy
    /// snapshot); concurrent persists race on the file last-writer-wins.
    pub async fn persist(&self) -> Result<()> {
        let _guard = self.inner.persistence.read().await;
        let mut wire_shards = Vec::with_capacity(self.inner.shards.len());
        for shard in &self.inner.shards {
            let state = shard.read().await;
            wire_shards.push(snapshot::shard_to_wire(&state));
        }
        let document = Snapshot::new(
            wire_shards,
            self.inner.gc_interval,
            self.inner.gc_check_items,
            &self.inner.snapshot_path,
        );
        let bytes = serde_json::to_vec(&document)?;
        tokio::fs::write(&self.inner.snapshot_path, bytes).await?;
        Ok(())
    }

    // == Reload ==
    /// Replaces the cache contents with the snapshot file.
    ///
    /// A missing or malformed file is an error. Entries are re-hashed
    /// through the partitioner and every shard's expiring-keys index is
    /// rebuilt, so serialized back-indices are never trusted and the
    /// snapshot loads correctly even into a different partition count.
    pub async fn reload(&self) -> Result<()> {
        let _guard = self.inner.persistence.write().await;
        let bytes = tokio::fs::read(&self.inner.snapshot_path).await?;
        let document: Snapshot = serde_json::from_slice(&bytes)?;
        let states = snapshot::partition_entries(document, self.inner.shards.len());
        for (shard, state) in self.inner.shards.iter().zip(states) {
            *shard.write().await = state;
        }
        Ok(())
    }

    /// Asserts every shard's structural invariants; test helper.
    #[cfg(test)]
    pub(crate) async fn check_invariants(&self) {
        for shard in &self.inner.shards {
            shard.read().await.check_invariants();
        }
    }
}
