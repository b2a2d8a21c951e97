//! Weighted Candidate Pool
//!
//! Exact-integer proportional sampling. Candidate `i` is picked with
//! probability `weight[i] / total` with no rounding anywhere.

use crate::core::rng::DeterministicRng;
use crate::error::{GenerationError, Result};

use super::registry::{SpeciesEntry, SpeciesId, SpeciesRegistry};
use super::tier::EggTier;

/// Pool weight of a species tier inside the band `[min_tier, max_tier]`.
///
/// Integer form of `floor(((max - tier) / (max - min + 1) * 1.5 + 1) * 100)`:
/// the lowest tier of a band gets the most weight, the highest gets 100.
///
/// ```
/// use hatchery::egg::pool::tier_weight;
///
/// assert_eq!(tier_weight(1, 1, 3), 200);
/// assert_eq!(tier_weight(3, 1, 3), 100);
/// ```
pub fn tier_weight(tier: u8, min_tier: u8, max_tier: u8) -> u32 {
    debug_assert!(min_tier <= tier && tier <= max_tier);
    let span = (max_tier - min_tier) as u32 + 1;
    let steps = max_tier.saturating_sub(tier) as u32;
    100 + (150 * steps) / span
}

/// Pool weight of a registry entry for an egg tier, after the regional divisor.
pub fn species_weight(entry: &SpeciesEntry, egg_tier: EggTier) -> u32 {
    let (min_tier, max_tier) = egg_tier.species_tier_bounds();
    tier_weight(entry.tier, min_tier, max_tier) / entry.regional.weight_divisor()
}

/// Smallest index whose cumulative weight is strictly greater than `roll`.
///
/// `roll` must lie in `[0, total)`. Ties on a boundary go to the next
/// candidate: with weights `[10, 20, 70]`, roll 10 selects index 1.
pub fn select_weighted(weights: &[u32], roll: u32) -> Result<usize> {
    let total = total_weight(weights)?;
    if roll >= total {
        return Err(GenerationError::RollOutOfRange { roll, total });
    }

    let mut cumulative = 0u32;
    for (idx, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if cumulative > roll {
            return Ok(idx);
        }
    }
    // roll < total guarantees a hit above
    Err(GenerationError::RollOutOfRange { roll, total })
}

/// Sum of a weight list; empty, zero-total and overflowing lists are rejected.
pub fn total_weight(weights: &[u32]) -> Result<u32> {
    if weights.is_empty() {
        return Err(GenerationError::ZeroTotalWeight);
    }
    let total = weights
        .iter()
        .try_fold(0u32, |acc, &w| acc.checked_add(w))
        .ok_or(GenerationError::WeightOverflow)?;
    if total == 0 {
        return Err(GenerationError::ZeroTotalWeight);
    }
    Ok(total)
}

/// Weighted species pool for one egg tier.
///
/// Built fresh for every request, in registry order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CandidatePool {
    species: Vec<SpeciesId>,
    weights: Vec<u32>,
    total: u32,
}

impl CandidatePool {
    /// Build from explicit `(species, weight)` pairs.
    pub fn from_weighted(candidates: Vec<(SpeciesId, u32)>) -> Result<Self> {
        let (species, weights): (Vec<_>, Vec<_>) = candidates.into_iter().unzip();
        let total = total_weight(&weights)?;
        Ok(Self { species, weights, total })
    }

    /// Build the pool an egg tier hatches from.
    ///
    /// Keeps entries inside the tier's species band that are not excluded,
    /// have no pre-form and are currently obtainable.
    pub fn for_tier<R: SpeciesRegistry + ?Sized>(registry: &R, egg_tier: EggTier) -> Result<Self> {
        let candidates: Vec<(SpeciesId, u32)> = registry
            .entries()
            .iter()
            .filter(|e| egg_tier.contains_species_tier(e.tier))
            .filter(|e| !registry.is_excluded(e.id))
            .filter(|e| !e.has_prevolution)
            .filter(|e| e.obtainable)
            .map(|e| (e.id, species_weight(e, egg_tier)))
            .collect();

        if candidates.is_empty() {
            return Err(GenerationError::EmptyPool(egg_tier));
        }
        Self::from_weighted(candidates)
    }

    /// Sum of all weights.
    #[inline]
    pub fn total(&self) -> u32 {
        self.total
    }

    /// Number of candidates.
    pub fn len(&self) -> usize {
        self.species.len()
    }

    /// Check if the pool is empty (never true for a built pool).
    pub fn is_empty(&self) -> bool {
        self.species.is_empty()
    }

    /// Iterate `(species, weight)` in pool order.
    pub fn iter(&self) -> impl Iterator<Item = (SpeciesId, u32)> + '_ {
        self.species.iter().copied().zip(self.weights.iter().copied())
    }

    /// Species selected by a roll in `[0, total)`.
    pub fn select(&self, roll: u32) -> Result<SpeciesId> {
        let idx = select_weighted(&self.weights, roll)?;
        Ok(self.species[idx])
    }

    /// Draw one roll from `rng` and select.
    pub fn draw(&self, rng: &mut DeterministicRng) -> Result<SpeciesId> {
        let roll = rng.next_int(self.total);
        self.select(roll)
    }
}

// =============================================================================
// TESTS
// =============================================================================
