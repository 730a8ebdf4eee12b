//! Deterministic keyed hash
//!
//! Seeded xxHash64 over the UTF-8 bytes of a field value.

use xxhash_rust::xxh64::xxh64;

/// Seeded 64-bit hash of key values
///
/// The digest depends only on the seed and the key bytes, never on how many
/// keys were hashed before.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeyHasher {
    seed: u64,
}

impl KeyHasher {
    /// Create a hasher from a seed
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    /// Seed this hasher was created with
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Hash a string key
    #[inline]
    pub fn digest(&self, key: &str) -> u64 {
        self.digest_bytes(key.as_bytes())
    }

    /// Hash raw bytes
    #[inline]
    pub fn digest_bytes(&self, bytes: &[u8]) -> u64 {
        xxh64(bytes, self.seed)
    }

    /// Digest of `key` scaled into [0, 1]
    #[inline]
    pub fn unit(&self, key: &str) -> f64 {
        self.digest(key) as f64 / u64::MAX as f64
    }
}
