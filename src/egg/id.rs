//! Egg id codec.
//!
//! An egg's tier is packed into the high bits of its 32-bit id:
//! `id = tier * EGG_SEED + offset`. This module is the only place that knows.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;

use super::tier::EggTier;

/// Id span per egg tier (2^30). Every u32 decodes to a tier in 0..=3.
pub const EGG_SEED: u32 = 1 << 30;

/// Common-tier ids divisible by this are singleton eggs.
pub const SINGLETON_DIVISOR: u32 = 204;

/// 32-bit egg identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EggId(pub u32);

impl EggId {
    /// Pack a tier and an offset below [`EGG_SEED`].
    pub fn mint(tier: EggTier, offset: u32) -> Option<Self> {
        if offset >= EGG_SEED {
            return None;
        }
        Some(Self::pack(tier, offset))
    }

    /// Mint an id with a random offset. Consumes one draw.
    pub fn roll(tier: EggTier, rng: &mut DeterministicRng) -> Self {
        Self::pack(tier, rng.next_int(EGG_SEED))
    }

    #[inline]
    fn pack(tier: EggTier, offset: u32) -> Self {
        debug_assert!(offset < EGG_SEED);
        Self(tier.index() as u32 * EGG_SEED + offset)
    }

    /// Raw id.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Tier packed into the id.
    pub fn tier(self) -> EggTier {
        match self.0 / EGG_SEED {
            0 => EggTier::Common,
            1 => EggTier::Great,
            2 => EggTier::Ultra,
            _ => EggTier::Master,
        }
    }

    /// Offset inside the tier's id span.
    #[inline]
    pub fn offset(self) -> u32 {
        self.0 % EGG_SEED
    }

    /// Singleton eggs hatch from a fixed two-species set instead of the pool.
    pub fn is_singleton(self) -> bool {
        self.tier() == EggTier::Common && self.0 % SINGLETON_DIVISOR == 0
    }

    /// Waves until hatch.
    pub fn hatch_waves(self) -> u32 {
        if self.is_singleton() {
            EggTier::Ultra.default_hatch_waves()
        } else {
            self.tier().default_hatch_waves()
        }
    }
}

impl From<u32> for EggId {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}
