//! Snapshot Persistence Format
//!
//! Serializable types for the on-disk JSON snapshot. The wire format keeps
//! the historical field names (`Data`, `map`, `expireKeys`, `Value`,
//! `Expiration`, `ExpireKeyIndex`) with `-1` sentinels standing in for
//! "no expiration", while the in-memory model stays `Option`-based.
//!
//! Loading never trusts serialized back-indices: every entry is re-hashed
//! through the live partitioner and each shard's expiring-keys index is
//! rebuilt from scratch, so a snapshot survives partition-count changes.

use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::entry::{Entry, Expiry};
use crate::cache::partition::shard_index;
use crate::cache::shard::ShardState;

/// Sentinel for "no expiration" in the wire format.
const NO_EXPIRATION: i64 = -1;

// == Wire Types ==
/// Top-level snapshot document.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Snapshot {
    #[serde(rename = "Data")]
    pub data: Vec<SnapshotShard>,
    #[serde(rename = "GarbageCollectionInterval")]
    pub gc_interval_nanos: i64,
    #[serde(rename = "GarbageCollectionCheckItems")]
    pub gc_check_items: usize,
    #[serde(rename = "DataFileName")]
    pub data_file_name: String,
}

/// One serialized shard.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SnapshotShard {
    pub map: HashMap<String, SnapshotItem>,
    /// Index-to-key view of the expiring-keys set. JSON object keys are
    /// strings, so the dense indices are stringified on the wire.
    #[serde(rename = "expireKeys")]
    pub expire_keys: HashMap<String, String>,
}

/// One serialized entry.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct SnapshotItem {
    #[serde(rename = "Value")]
    pub value: Value,
    #[serde(rename = "Expiration")]
    pub expiration: i64,
    #[serde(rename = "ExpireKeyIndex")]
    pub expire_key_index: i64,
}

impl Snapshot {
    pub fn new(
        data: Vec<SnapshotShard>,
        gc_interval: Duration,
        gc_check_items: usize,
        path: &Path,
    ) -> Self {
        Self {
            data,
            gc_interval_nanos: gc_interval.as_nanos() as i64,
            gc_check_items,
            data_file_name: path.to_string_lossy().into_owned(),
        }
    }
}

// == Encoding ==
/// Converts one live shard into its wire representation.
pub(crate) fn shard_to_wire(state: &ShardState) -> SnapshotShard {
    let map = state
        .entries
        .iter()
        .map(|(key, entry)| {
            let (expiration, expire_key_index) = match entry.expiry {
                Some(expiry) => (expiry.deadline_ns, expiry.index as i64),
                None => (NO_EXPIRATION, -1),
            };
            (
                key.clone(),
                SnapshotItem {
                    value: entry.value.clone(),
                    expiration,
                    expire_key_index,
                },
            )
        })
        .collect();
    let expire_keys = state
        .expire_keys
        .iter()
        .enumerate()
        .map(|(index, key)| (index.to_string(), key.clone()))
        .collect();
    SnapshotShard { map, expire_keys }
}

// == Decoding ==
/// Distributes every entry of a parsed snapshot across `shard_count`
/// fresh shard states, hashing keys through the live partitioner and
/// rebuilding each shard's expiring-keys index and back-indices.
pub(crate) fn partition_entries(snapshot: Snapshot, shard_count: usize) -> Vec<ShardState> {
    let mut states: Vec<ShardState> = (0..shard_count).map(|_| ShardState::default()).collect();

    for wire_shard in snapshot.data {
        for (key, item) in wire_shard.map {
            let state = &mut states[shard_index(&key, shard_count)];
            let mut entry = Entry::new(item.value);
            if item.expiration != NO_EXPIRATION {
                entry.expiry = Some(Expiry {
                    deadline_ns: item.expiration,
                    index: state.expire_keys.len(),
                });
                state.expire_keys.push(key.clone());
            }
            state.entries.insert(key, entry);
        }
    }

    states
}
