//! Core deterministic primitives.
//!
//! Seeded random streams, seed derivation and scoped sub-streams. Nothing in
//! here reads the clock or the environment.

pub mod rng;
pub mod hash;
pub mod seed;

// Re-export core types
pub use rng::DeterministicRng;
pub use hash::{Digest32, SeedHasher};
pub use seed::{ScopeGuard, SeedContext};
