//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;

/// Nanoseconds per second, for deadline arithmetic.
pub(crate) const NANOS_PER_SEC: i64 = 1_000_000_000;

// == Cache Entry ==
/// A single cache entry: the stored JSON value plus optional expiration.
///
/// An entry either has no expiration (`expiry == None`) or carries both a
/// wall-clock deadline and its position in the owning shard's expiring-keys
/// index. The two always change together, so an entry can never be half
/// registered.
#[derive(Debug, Clone)]
pub(crate) struct Entry {
    /// The stored value
    pub value: Value,
    /// Expiration deadline and expiring-keys back-index, if any
    pub expiry: Option<Expiry>,
}

// == Expiry ==
/// Expiration state of an entry that has a TTL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Expiry {
    /// Expiration deadline, nanoseconds since the Unix epoch
    pub deadline_ns: i64,
    /// Position of the entry's key in the shard's `expire_keys` index
    pub index: usize,
}

impl Entry {
    /// Creates a new entry with no expiration.
    pub fn new(value: Value) -> Self {
        Self {
            value,
            expiry: None,
        }
    }

    // == Is Expired ==
    /// Checks whether the entry's deadline is strictly in the past.
    ///
    /// An entry whose deadline equals `now_ns` exactly is still alive;
    /// entries without a TTL never expire.
    pub fn is_expired_at(&self, now_ns: i64) -> bool {
        match self.expiry {
            Some(expiry) => expiry.deadline_ns < now_ns,
            None => false,
        }
    }

    // == Remaining TTL ==
    /// Remaining whole seconds until expiry, or `None` for entries without
    /// a TTL. The result is floored and may be zero or negative for an
    /// entry at or past its deadline.
    pub fn remaining_seconds_at(&self, now_ns: i64) -> Option<i64> {
        self.expiry
            .map(|expiry| (expiry.deadline_ns - now_ns).div_euclid(NANOS_PER_SEC))
    }
}

// == Utility Functions ==
/// Returns the current wall-clock time in nanoseconds since the Unix epoch.
pub(crate) fn now_nanos() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos() as i64
}

/// Computes an expiration deadline `expire_seconds` from `now_ns`,
/// saturating instead of wrapping on absurd inputs.
pub(crate) fn deadline_after(now_ns: i64, expire_seconds: i64) -> i64 {
    now_ns.saturating_add(expire_seconds.saturating_mul(NANOS_PER_SEC))
}
