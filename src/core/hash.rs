//! Seed and Result Hashing
//!
//! Provides deterministic hashing for:
//! - Scope sub-seed derivation
//! - Session seed derivation
//! - Result fingerprints for replay validation

use sha2::{Sha256, Digest};

/// Hash output type (256 bits / 32 bytes)
pub type Digest32 = [u8; 32];

/// Domain separator for scoped sub-seeds.
pub const SCOPE_DOMAIN: &[u8] = b"HATCHERY_SCOPE_V1";

/// Domain separator for the session stream.
pub const SESSION_DOMAIN: &[u8] = b"HATCHERY_SESSION_V1";

/// Domain separator for result fingerprints.
pub const RESULTS_DOMAIN: &[u8] = b"HATCHERY_RESULTS_V1";

/// Deterministic hasher for seeds and generated records.
///
/// Wraps SHA-256 with helpers for the primitive types the engine feeds it.
/// Order of updates is critical for determinism.
pub struct SeedHasher {
    hasher: Sha256,
}

impl SeedHasher {
    /// Create a new hasher with domain separator.
    pub fn new(domain: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(domain);
        Self { hasher }
    }

    /// Create hasher for a scoped sub-seed.
    pub fn for_scope() -> Self {
        Self::new(SCOPE_DOMAIN)
    }

    /// Create hasher for the session stream.
    pub fn for_session() -> Self {
        Self::new(SESSION_DOMAIN)
    }

    /// Create hasher for a batch of generation results.
    pub fn for_results() -> Self {
        Self::new(RESULTS_DOMAIN)
    }

    /// Update with a u8 value.
    #[inline]
    pub fn update_u8(&mut self, value: u8) {
        self.hasher.update([value]);
    }

    /// Update with a u16 value (little-endian).
    #[inline]
    pub fn update_u16(&mut self, value: u16) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u32 value (little-endian).
    #[inline]
    pub fn update_u32(&mut self, value: u32) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a u64 value (little-endian).
    #[inline]
    pub fn update_u64(&mut self, value: u64) {
        self.hasher.update(value.to_le_bytes());
    }

    /// Update with a boolean.
    #[inline]
    pub fn update_bool(&mut self, value: bool) {
        self.update_u8(value as u8);
    }

    /// Update with a length-prefixed UTF-8 string.
    ///
    /// The u32 length prefix keeps `("ab", "c")` and `("a", "bc")` apart.
    #[inline]
    pub fn update_str(&mut self, value: &str) {
        self.update_u32(value.len() as u32);
        self.hasher.update(value.as_bytes());
    }

    /// Finalize and return the full digest.
    pub fn finalize(self) -> Digest32 {
        self.hasher.finalize().into()
    }

    /// Finalize and fold the first 8 digest bytes into a u64 seed (little-endian).
    pub fn finalize_u64(self) -> u64 {
        let digest = self.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        u64::from_le_bytes(head)
    }
}

/// Derive the seed of a scoped sub-stream.
///
/// Depends only on the session seed string, the numeric offset and the salt,
/// never on how far the session stream has advanced.
pub fn derive_scope_seed(seed: &str, offset: u64, salt: &str) -> u64 {
    let mut hasher = SeedHasher::for_scope();
    hasher.update_str(seed);
    hasher.update_u64(offset);
    hasher.update_str(salt);
    hasher.finalize_u64()
}

/// Derive the seed of the unscoped session stream.
pub fn derive_session_seed(seed: &str) -> u64 {
    let mut hasher = SeedHasher::for_session();
    hasher.update_str(seed);
    hasher.finalize_u64()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hasher_determinism() {
        let make_hash = || {
            let mut hasher = SeedHasher::for_results();
            hasher.update_u32(100);
            hasher.update_u64(12345);
            hasher.update_str("EGG");
            hasher.update_bool(true);
            hasher.finalize()
        };

        assert_eq!(make_hash(), make_hash());
    }

    #[test]
    fn test_hash_order_matters() {
        let hash1 = {
            let mut h = SeedHasher::new(b"test");
            h.update_u32(1);
            h.update_u32(2);
            h.finalize()
        };

        let hash2 = {
            let mut h = SeedHasher::new(b"test");
            h.update_u32(2);
            h.update_u32(1);
            h.finalize()
        };

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_domain_separation() {
        assert_ne!(derive_scope_seed("SEED", 0, ""), derive_session_seed("SEED"));
    }

    #[test]
    fn test_length_prefix_separates_fields() {
        assert_ne!(
            derive_scope_seed("AB", 1, "C"),
            derive_scope_seed("A", 1, "BC"),
        );
    }

    #[test]
    fn test_scope_seed_inputs() {
        let base = derive_scope_seed("TESTSEED", 42, "EGG");
        assert_eq!(base, derive_scope_seed("TESTSEED", 42, "EGG"));
        assert_ne!(base, derive_scope_seed("TESTSEED", 43, "EGG"));
        assert_ne!(base, derive_scope_seed("TESTSEED", 42, "EGH"));
        assert_ne!(base, derive_scope_seed("TESTSEEE", 42, "EGG"));
    }
}
