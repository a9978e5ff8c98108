//! Cache Shard Module
//!
//! One partition of the cache: the entry map plus a dense index of every
//! key that currently has an expiration. The index lets the garbage
//! collector pick expiring keys uniformly at random in O(1) and supports
//! O(1) swap-removal.
//!
//! All methods here assume the caller holds the shard's lock; the `Cache`
//! facade owns the locking.

use std::collections::HashMap;

use rand::Rng;
use serde_json::Value;

use crate::cache::entry::{deadline_after, Entry, Expiry};

// == Shard State ==
/// Entry map and expiring-keys index of a single shard.
///
/// `expire_keys` is kept dense: positions form the contiguous range
/// `[0, len)`, and for every position `i` the entry stored under
/// `expire_keys[i]` carries `index == i`. Removal swaps the last key into
/// the vacated slot and fixes that key's back-index, so both properties
/// survive every mutation.
#[derive(Debug, Default)]
pub(crate) struct ShardState {
    /// Key-value storage
    pub(crate) entries: HashMap<String, Entry>,
    /// Dense index over the keys that currently have an expiration
    pub(crate) expire_keys: Vec<String>,
}

impl ShardState {
    // == Insert ==
    /// Stores `value` under `key`, replacing the value in place when the
    /// key already exists, then applies `expire_seconds` through the
    /// expiration chokepoint.
    pub fn insert(&mut self, key: &str, value: Value, expire_seconds: i64, now_ns: i64) {
        match self.entries.get_mut(key) {
            Some(entry) => entry.value = value,
            None => {
                self.entries.insert(key.to_owned(), Entry::new(value));
            }
        }
        self.update_expiration(key, expire_seconds, now_ns);
    }

    // == Update Expiration ==
    /// Single chokepoint for every expiration change.
    ///
    /// - no current expiration, `expire_seconds > 0`: register the key at
    ///   the end of `expire_keys` and set the deadline;
    /// - no current expiration, `expire_seconds <= 0`: nothing to do;
    /// - existing expiration, `expire_seconds > 0`: overwrite the deadline
    ///   only, the index entry stays where it is;
    /// - existing expiration, `expire_seconds <= 0`: de-register it.
    pub fn update_expiration(&mut self, key: &str, expire_seconds: i64, now_ns: i64) {
        let next_index = self.expire_keys.len();
        let Some(entry) = self.entries.get_mut(key) else {
            return;
        };

        match entry.expiry {
            None => {
                if expire_seconds > 0 {
                    entry.expiry = Some(Expiry {
                        deadline_ns: deadline_after(now_ns, expire_seconds),
                        index: next_index,
                    });
                    self.expire_keys.push(key.to_owned());
                }
            }
            Some(ref mut expiry) => {
                if expire_seconds > 0 {
                    expiry.deadline_ns = deadline_after(now_ns, expire_seconds);
                } else {
                    let index = expiry.index;
                    self.remove_expiration(index);
                }
            }
        }
    }

    // == Remove Expiration ==
    /// Swap-removes position `index` from the expiring-keys index and
    /// clears the affected entry's expiration.
    ///
    /// The key formerly at the end of the index moves into the vacated
    /// slot; its entry's back-index is rewritten in the same call, keeping
    /// the index dense and the back-pointers exact.
    pub fn remove_expiration(&mut self, index: usize) {
        let key = self.expire_keys.swap_remove(index);
        if let Some(entry) = self.entries.get_mut(&key) {
            entry.expiry = None;
        }

        if let Some(moved_key) = self.expire_keys.get(index).cloned() {
            if let Some(expiry) = self
                .entries
                .get_mut(&moved_key)
                .and_then(|entry| entry.expiry.as_mut())
            {
                expiry.index = index;
            }
        }
    }

    // == Remove ==
    /// Deletes `key` entirely: de-registers its expiration (if any), then
    /// drops the entry. Returns whether the key was present.
    pub fn remove(&mut self, key: &str) -> bool {
        let Some(entry) = self.entries.get(key) else {
            return false;
        };
        if let Some(expiry) = entry.expiry {
            self.remove_expiration(expiry.index);
        }
        self.entries.remove(key).is_some()
    }

    // == Live Keys ==
    /// Collects every key whose entry has not expired as of `now_ns`.
    pub fn live_keys(&self, now_ns: i64) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, entry)| !entry.is_expired_at(now_ns))
            .map(|(key, _)| key.clone())
            .collect()
    }

    // == Sampling Sweep ==
    /// One bounded garbage-collection pass: inspects up to `check_items`
    /// uniformly random positions of the expiring-keys index and deletes
    /// the entries found expired. Returns the number deleted.
    ///
    /// Each deletion swap-removes inside the same critical section, so the
    /// index stays dense between samples.
    pub fn sweep_sample<R: Rng + ?Sized>(
        &mut self,
        check_items: usize,
        now_ns: i64,
        rng: &mut R,
    ) -> usize {
        let mut deleted = 0;
        for _ in 0..check_items {
            let Some(max_index) = self.expire_keys.len().checked_sub(1) else {
                break;
            };
            let index = if max_index == 0 {
                0
            } else {
                rng.gen_range(0..=max_index)
            };
            let key = self.expire_keys[index].clone();
            let expired = self
                .entries
                .get(&key)
                .map_or(false, |entry| entry.is_expired_at(now_ns));
            if expired {
                self.remove(&key);
                deleted += 1;
            }
        }
        deleted
    }

    // == Invariant Check ==
    /// Asserts the shard's structural invariants; test helper.
    #[cfg(test)]
    pub fn check_invariants(&self) {
        for (i, key) in self.expire_keys.iter().enumerate() {
            let entry = self
                .entries
                .get(key)
                .unwrap_or_else(|| panic!("indexed key {:?} has no entry", key));
            let expiry = entry
                .expiry
                .unwrap_or_else(|| panic!("indexed key {:?} has no expiration", key));
            assert_eq!(expiry.index, i, "back-index mismatch for {:?}", key);
        }
        let with_expiry = self
            .entries
            .values()
            .filter(|entry| entry.expiry.is_some())
            .count();
        assert_eq!(with_expiry, self.expire_keys.len(), "index count mismatch");
    }
}
