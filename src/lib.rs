//! # Hatchery
//!
//! Deterministic egg generation: species, hidden traits and rarity rolls that
//! replay identically from a session seed and an egg id.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                          HATCHERY                            │
//! ├─────────────────────────────────────────────────────────────┤
//! │  core/           - Deterministic primitives                  │
//! │  ├── rng.rs      - Deterministic Xorshift128+ PRNG           │
//! │  ├── hash.rs     - SHA-256 seed derivation                   │
//! │  └── seed.rs     - Scoped sub-streams (RAII restore)         │
//! │                                                              │
//! │  egg/            - Egg logic (deterministic)                 │
//! │  ├── id.rs       - Egg id codec                              │
//! │  ├── tier.rs     - Egg tiers and species bands               │
//! │  ├── registry.rs - Species table                             │
//! │  ├── pool.rs     - Weighted candidate selection              │
//! │  ├── traits.rs   - Hidden trait vectors                      │
//! │  ├── rarity.rs   - Shiny / variant / bonus rolls             │
//! │  ├── generate.rs - Hatch pipeline                            │
//! │  └── gacha.rs    - Egg minting, pity, featured legendary     │
//! │                                                              │
//! │  config.rs       - Engine odds                               │
//! │  error.rs        - Error types                               │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Determinism Guarantee
//!
//! - No floating-point arithmetic in any roll
//! - Registry iterated in table order
//! - No system time dependencies (calendar dates are passed in)
//! - All randomness from seeded Xorshift128+
//!
//! The same seed string and egg id hatch the same creature on any platform,
//! no matter what else the session stream has been used for.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod config;
pub mod core;
pub mod egg;
pub mod error;

// Re-export commonly used types
pub use config::EngineConfig;
pub use core::rng::DeterministicRng;
pub use core::seed::SeedContext;
pub use egg::generate::{EggCategory, GenerationRequest, GenerationResult, Hatchery};
pub use egg::registry::{SpeciesRegistry, StaticRegistry};
pub use error::{ErrorKind, GenerationError, Result};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
