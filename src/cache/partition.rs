//! Key Partitioner
//!
//! Maps a key to its shard with a stable FNV-1a hash over the key's UTF-8
//! bytes. The hash is byte-order independent and deterministic for the
//! lifetime of the process; snapshots store full entry maps rather than
//! partition indices, so the function may change between versions.

const FNV_OFFSET_BASIS: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 16_777_619;

/// FNV-1a 32-bit hash of a byte slice.
pub(crate) fn fnv1a(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, byte| {
        (hash ^ u32::from(*byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Returns the index of the shard owning `key`.
pub(crate) fn shard_index(key: &str, shard_count: usize) -> usize {
    fnv1a(key.as_bytes()) as usize % shard_count
}
