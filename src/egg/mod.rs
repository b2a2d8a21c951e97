//! Egg Module
//!
//! Everything that turns an egg id into a hatched creature. Deterministic
//! given the session seed.
//!
//! ## Module Structure
//!
//! - `id`: Egg id codec (tier packed above 2^30)
//! - `tier`: Egg tiers, species bands, hatch waves
//! - `registry`: Read-only species table
//! - `pool`: Weighted candidate selection
//! - `traits`: Hidden trait vectors
//! - `rarity`: Shiny, variant and bonus rolls
//! - `generate`: Hatch pipeline
//! - `gacha`: Egg minting, pity, featured legendary

pub mod id;
pub mod tier;
pub mod registry;
pub mod pool;
pub mod traits;
pub mod rarity;
pub mod generate;
pub mod gacha;

// Re-export key types
pub use id::{EggId, EGG_SEED};
pub use tier::EggTier;
pub use registry::{SpeciesEntry, SpeciesId, SpeciesRegistry, StaticRegistry};
pub use pool::CandidatePool;
pub use traits::TraitVector;
pub use rarity::{BonusSlot, Variant};
pub use generate::{fingerprint, EggCategory, GenerationRequest, GenerationResult, Hatchery};
pub use gacha::{EggPity, GachaMachine, MintedEgg, PullStats};
