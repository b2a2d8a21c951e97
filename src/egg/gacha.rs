//! Egg Gacha
//!
//! Mints egg ids: rolls a tier per pull, applies batch guarantees and pity
//! upgrades, then packs a random offset under the tier. Also rotates the
//! featured legendary by calendar day.
//!
//! All randomness comes from a caller-supplied stream, so a batch can be
//! replayed from the same session state.

use chrono::NaiveDate;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::core::rng::DeterministicRng;
use crate::core::seed::SeedContext;
use crate::error::{GenerationError, Result};

use super::generate::{EggCategory, EGG_SALT};
use super::id::EggId;
use super::registry::{SpeciesId, SpeciesRegistry};
use super::tier::EggTier;

/// Tier roll range per pull.
const TIER_ROLL_RANGE: u32 = 256;

/// Tier roll thresholds (before the legendary offset): at or above -> tier.
const COMMON_THRESHOLD: u32 = 52;
const GREAT_THRESHOLD: u32 = 8;
const ULTRA_THRESHOLD: u32 = 1;

/// Batches this large always contain an Ultra or better.
pub const ULTRA_GUARANTEE_PULLS: usize = 25;

/// Batches this large always contain a Great or better.
pub const GREAT_GUARANTEE_PULLS: usize = 10;

/// Pity counts at which a Common pull is upgraded.
const GREAT_PITY: u32 = 9;
const ULTRA_PITY: u32 = 59;
const MASTER_PITY: u32 = 412;

/// An egg fresh from the machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintedEgg {
    /// Egg id (tier packed in)
    pub id: EggId,
    /// Source machine
    pub category: EggCategory,
    /// Waves until hatch
    pub hatch_waves: u32,
}

/// Pulls since the last egg of each tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EggPity {
    counts: [u32; 4],
}

impl EggPity {
    /// Pulls since the last egg of `tier`.
    pub fn get(&self, tier: EggTier) -> u32 {
        self.counts[tier.index() as usize]
    }

    /// Apply one pull: bump counters, upgrade a Common pull that hit pity,
    /// reset the counter of the tier finally awarded.
    fn apply(&mut self, rolled: EggTier, legendary_offset: u32) -> EggTier {
        self.counts[EggTier::Great.index() as usize] += 1;
        self.counts[EggTier::Ultra.index() as usize] += 1;
        self.counts[EggTier::Master.index() as usize] += 1 + legendary_offset;

        let tier = if rolled != EggTier::Common {
            rolled
        } else if self.get(EggTier::Master) >= MASTER_PITY {
            EggTier::Master
        } else if self.get(EggTier::Ultra) >= ULTRA_PITY {
            EggTier::Ultra
        } else if self.get(EggTier::Great) >= GREAT_PITY {
            EggTier::Great
        } else {
            EggTier::Common
        };

        self.counts[tier.index() as usize] = 0;
        tier
    }
}

/// Map a tier roll in `[0, 256)` to a tier.
pub fn tier_for_roll(roll: u32, category: EggCategory) -> EggTier {
    let offset = legendary_offset(category);
    if roll >= COMMON_THRESHOLD + offset {
        EggTier::Common
    } else if roll >= GREAT_THRESHOLD + offset {
        EggTier::Great
    } else if roll >= ULTRA_THRESHOLD + offset {
        EggTier::Ultra
    } else {
        EggTier::Master
    }
}

fn legendary_offset(category: EggCategory) -> u32 {
    match category {
        EggCategory::Legendary => 1,
        _ => 0,
    }
}

/// Lifetime pull counts.
///
/// Singleton eggs count toward `singleton` only, never toward a tier.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PullStats {
    /// Every egg pulled
    pub total: u64,
    /// Great-tier eggs
    pub great: u64,
    /// Ultra-tier eggs
    pub ultra: u64,
    /// Master-tier eggs
    pub master: u64,
    /// Singleton eggs
    pub singleton: u64,
}

impl PullStats {
    fn record(&mut self, id: EggId) {
        self.total += 1;
        if id.is_singleton() {
            self.singleton += 1;
            return;
        }
        match id.tier() {
            EggTier::Common => {}
            EggTier::Great => self.great += 1,
            EggTier::Ultra => self.ultra += 1,
            EggTier::Master => self.master += 1,
        }
    }
}

/// Egg machine holding pity state and pull counts for one save file.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GachaMachine {
    pity: EggPity,
    #[serde(default)]
    stats: PullStats,
}

impl GachaMachine {
    /// Machine resumed from saved state.
    pub fn resume(pity: EggPity, stats: PullStats) -> Self {
        Self { pity, stats }
    }

    /// Current pity counters.
    pub fn pity(&self) -> EggPity {
        self.pity
    }

    /// Pull counts so far.
    pub fn stats(&self) -> PullStats {
        self.stats
    }

    /// Pull `count` eggs.
    ///
    /// Draw order: one tier roll per pull, then at most one guarantee slot
    /// roll, then one id offset roll per egg.
    pub fn pull(&mut self, rng: &mut DeterministicRng, category: EggCategory, count: usize) -> Vec<MintedEgg> {
        let mut tiers: Vec<EggTier> = (0..count)
            .map(|_| tier_for_roll(rng.next_int(TIER_ROLL_RANGE), category))
            .collect();

        if count >= ULTRA_GUARANTEE_PULLS && !tiers.iter().any(|t| *t >= EggTier::Ultra) {
            let slot = rng.next_int(count as u32) as usize;
            tiers[slot] = EggTier::Ultra;
        } else if count >= GREAT_GUARANTEE_PULLS && !tiers.iter().any(|t| *t >= EggTier::Great) {
            let slot = rng.next_int(count as u32) as usize;
            tiers[slot] = EggTier::Great;
        }

        let offset = legendary_offset(category);
        for tier in tiers.iter_mut() {
            *tier = self.pity.apply(*tier, offset);
        }

        let eggs: Vec<MintedEgg> = tiers
            .into_iter()
            .map(|tier| {
                let id = EggId::roll(tier, rng);
                self.stats.record(id);
                MintedEgg {
                    id,
                    category,
                    hatch_waves: id.hatch_waves(),
                }
            })
            .collect();

        debug!(?category, count, pity = ?self.pity, "pulled eggs");
        eggs
    }
}

/// Legendary species eligible to be featured, in registry order.
pub fn featured_pool<R: SpeciesRegistry + ?Sized>(registry: &R) -> Vec<SpeciesId> {
    registry
        .entries()
        .iter()
        .filter(|e| EggTier::Master.contains_species_tier(e.tier))
        .filter(|e| e.obtainable && !registry.is_excluded(e.id))
        .map(|e| e.id)
        .collect()
}

/// Days since 1970-01-01 (negative before).
pub fn day_index(date: NaiveDate) -> i64 {
    let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or(NaiveDate::MIN);
    (date - epoch).num_days()
}

/// Featured legendary for a calendar day.
///
/// Every `len` days form one cycle. Each cycle shuffles the pool inside a
/// scope keyed on the cycle number, and day `d` takes slot `d % len`, so each
/// species is featured exactly once per cycle. Dates before 1970-01-01 are
/// rejected.
pub fn featured_species<R: SpeciesRegistry + ?Sized>(
    ctx: &mut SeedContext,
    registry: &R,
    date: NaiveDate,
) -> Result<SpeciesId> {
    let mut pool = featured_pool(registry);
    if pool.is_empty() {
        return Err(GenerationError::EmptyPool(EggTier::Master));
    }

    let day = day_index(date);
    if day < 0 {
        return Err(GenerationError::DayBeforeEpoch { day });
    }
    let day = day as u64;
    let len = pool.len() as u64;
    let cycle = day / len;
    let index = (day % len) as usize;

    let species = ctx.with_seed_offset(cycle, EGG_SALT, |ctx| {
        ctx.rng().shuffle(&mut pool);
        pool[index]
    });

    debug!(%date, cycle, species = species.0, "featured legendary");
    Ok(species)
}

// =============================================================================
// TESTS
// =============================================================================
