//! Content hashing for synthetic record keys.

use xxhash_rust::xxh3::xxh3_64;

/// Hash arbitrary bytes with xxh3.
#[must_use]
pub fn content_hash(data: &[u8]) -> u64 {
    xxh3_64(data)
}

/// Stable hexadecimal key derived from text, used when an item carries no
/// identifier of its own.
#[must_use]
pub fn content_key(text: &str) -> String {
    format!("{:016x}", content_hash(text.as_bytes()))
}
