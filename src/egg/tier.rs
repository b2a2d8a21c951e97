//! Egg Tiers
//!
//! Each egg tier hatches from a band of species tiers and takes a fixed
//! number of waves to hatch.

use serde::{Serialize, Deserialize};

/// Highest tier index (Master).
pub const MAX_TIER_INDEX: u8 = 3;

/// Rarity class of an egg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum EggTier {
    /// Species tiers 1-3
    #[default]
    Common = 0,
    /// Species tiers 4-5
    Great = 1,
    /// Species tiers 6-7
    Ultra = 2,
    /// Species tiers 8-9
    Master = 3,
}

impl EggTier {
    /// All tiers, lowest first.
    pub const ALL: [EggTier; 4] = [EggTier::Common, EggTier::Great, EggTier::Ultra, EggTier::Master];

    /// Tier index (0-3).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Inclusive species-tier band `(min, max)` hatched by this egg tier.
    pub fn species_tier_bounds(self) -> (u8, u8) {
        match self {
            EggTier::Common => (1, 3),
            EggTier::Great => (4, 5),
            EggTier::Ultra => (6, 7),
            EggTier::Master => (8, 9),
        }
    }

    /// Check if a species tier falls inside this egg tier's band.
    #[inline]
    pub fn contains_species_tier(self, tier: u8) -> bool {
        let (min, max) = self.species_tier_bounds();
        (min..=max).contains(&tier)
    }

    /// Waves until an egg of this tier hatches.
    pub fn default_hatch_waves(self) -> u32 {
        match self {
            EggTier::Common => 10,
            EggTier::Great => 25,
            EggTier::Ultra => 50,
            EggTier::Master => 100,
        }
    }

    /// Tier steps below Master (3 for Common, 0 for Master).
    #[inline]
    pub fn steps_below_max(self) -> u8 {
        MAX_TIER_INDEX - self.index()
    }
}
