//! Egg Generation Pipeline
//!
//! Hatches one egg inside a seed scope keyed on the egg id.
//!
//! ## Draw Order
//!
//! The order of rolls is part of the save-data contract. Reordering them
//! changes which values later rolls consume and silently changes what every
//! stored egg hatches into.
//!
//! ```text
//! 1. enter scope (offset = egg id, salt)
//! 2. category:  species egg         -> no roll
//!               singleton egg       -> 1 roll in [0, singleton_rare_odds)
//!               featured legendary  -> 1 roll in [0, featured_odds)
//! 3. species:   pool roll in [0, total weight)      (skipped if step 2 resolved)
//! 4. traits:    1 u32 for the secondary vector
//! 5. rarity:    1 roll in [0, shiny odds), +1 roll in [0, 10) if shiny
//! 6. bonus:     1 roll in [0, base * 2^(3 - tier)), +1 roll in [0, 3) on success
//! 7. exit scope
//! ```

use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::EngineConfig;
use crate::core::hash::{Digest32, SeedHasher};
use crate::core::rng::DeterministicRng;
use crate::core::seed::SeedContext;
use crate::error::{GenerationError, Result};

use super::id::EggId;
use super::pool::CandidatePool;
use super::rarity::{roll_bonus, roll_shiny, roll_sub_variant, BonusSlot, Variant};
use super::registry::{SpeciesId, SpeciesRegistry};
use super::tier::EggTier;
use super::traits::TraitVector;

/// Salt shared by every egg hatch scope.
pub const EGG_SALT: &str = "EGG";

// =============================================================================
// REQUEST / RESULT
// =============================================================================

/// Source of an egg; picks the odds used while hatching.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[derive(Default)]
pub enum EggCategory {
    /// Ordinary egg
    #[default]
    Standard,
    /// Better bonus-unlock odds
    MoveBoost,
    /// Better shiny odds
    ShinyBoost,
    /// May hatch the featured legendary
    Legendary,
}

impl EggCategory {
    /// One-in-N shiny odds.
    pub fn shiny_odds(self, config: &EngineConfig) -> u32 {
        match self {
            EggCategory::ShinyBoost => config.boosted_shiny_odds,
            _ => config.shiny_odds,
        }
    }

    /// Bonus roll base before tier scaling.
    pub fn bonus_base(self, config: &EngineConfig) -> u32 {
        match self {
            EggCategory::MoveBoost => config.boosted_bonus_base,
            _ => config.bonus_base,
        }
    }
}

/// One hatch request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRequest {
    /// Egg id; doubles as scope offset and primary trait source
    pub egg_id: EggId,
    /// Egg source
    pub category: EggCategory,
    /// Scope salt
    pub salt: String,
    /// Featured legendary for Legendary-category Master eggs
    #[serde(default)]
    pub featured: Option<SpeciesId>,
    /// Fixed species; skips the singleton, featured and pool rolls
    #[serde(default)]
    pub species: Option<SpeciesId>,
}

impl GenerationRequest {
    /// Request with the standard egg salt.
    pub fn new(egg_id: impl Into<EggId>, category: EggCategory) -> Self {
        Self {
            egg_id: egg_id.into(),
            category,
            salt: EGG_SALT.to_string(),
            featured: None,
            species: None,
        }
    }

    /// Override the scope salt.
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Hatch a fixed species. Traits, shiny and bonus are still rolled.
    pub fn with_species(mut self, species: SpeciesId) -> Self {
        self.species = Some(species);
        self
    }

    /// Attach the featured legendary.
    pub fn with_featured(mut self, species: SpeciesId) -> Self {
        self.featured = Some(species);
        self
    }
}

/// A hatched egg.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GenerationResult {
    /// Hatched species
    pub species: SpeciesId,
    /// Egg tier decoded from the id
    pub tier: EggTier,
    /// Hidden traits
    pub traits: TraitVector,
    /// Shiny flag
    pub shiny: bool,
    /// Shiny sub-variant (always Standard when not shiny)
    pub variant: Variant,
    /// Bonus unlock
    pub bonus: BonusSlot,
}

impl GenerationResult {
    /// Feed this result into a hasher in a fixed field order.
    pub fn hash_into(&self, hasher: &mut SeedHasher) {
        hasher.update_u16(self.species.0);
        hasher.update_u8(self.tier.index());
        for value in self.traits.values() {
            hasher.update_u8(value);
        }
        hasher.update_bool(self.shiny);
        hasher.update_u8(self.variant.index());
        hasher.update_u8(self.bonus.slot().unwrap_or(u8::MAX));
    }
}

/// Fingerprint of a batch of results, for replay verification.
pub fn fingerprint(results: &[GenerationResult]) -> Digest32 {
    let mut hasher = SeedHasher::for_results();
    hasher.update_u32(results.len() as u32);
    for result in results {
        result.hash_into(&mut hasher);
    }
    hasher.finalize()
}

// =============================================================================
// PIPELINE STAGES
// =============================================================================

/// Pipeline stages, in the only order they may occur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GenerationStage {
    /// Nothing done yet
    Idle,
    /// Seed scope active
    ScopeEntered,
    /// Special categories checked
    CategoryResolved,
    /// Species chosen
    CandidateSelected,
    /// Traits derived and combined
    TraitsRolled,
    /// Shiny and variant rolled
    RarityRolled,
    /// Bonus rolled
    BonusRolled,
    /// Scope restored (terminal)
    ScopeExited,
}

/// Records stage transitions and rejects out-of-order ones.
#[derive(Debug)]
struct StageTrace {
    stages: Vec<GenerationStage>,
}

impl StageTrace {
    fn new() -> Self {
        Self { stages: vec![GenerationStage::Idle] }
    }

    fn advance(&mut self, stage: GenerationStage) {
        debug_assert!(
            self.stages.last().is_some_and(|last| *last < stage),
            "stage {stage:?} out of order after {:?}",
            self.stages.last()
        );
        #[cfg(feature = "debug-tracing")]
        tracing::trace!(?stage, "generation stage");
        self.stages.push(stage);
    }
}

// =============================================================================
// HATCHERY
// =============================================================================

/// Generation orchestrator over a read-only registry.
#[derive(Clone, Debug)]
pub struct Hatchery<R> {
    registry: R,
    config: EngineConfig,
}

impl<R: SpeciesRegistry> Hatchery<R> {
    /// Create an orchestrator; the config is validated first.
    pub fn new(registry: R, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { registry, config })
    }

    /// The registry generation reads from.
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Active config.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Hatch one egg.
    ///
    /// Errors are configuration or misuse errors and recur identically on
    /// replay. The context's stream is restored whether or not this succeeds.
    pub fn generate(&self, ctx: &mut SeedContext, request: &GenerationRequest) -> Result<GenerationResult> {
        self.generate_traced(ctx, request).map(|(result, _)| result)
    }

    /// Hatch one egg and return the stages it passed through.
    pub fn generate_traced(
        &self,
        ctx: &mut SeedContext,
        request: &GenerationRequest,
    ) -> Result<(GenerationResult, Vec<GenerationStage>)> {
        let mut trace = StageTrace::new();

        let result = {
            let mut scope = ctx.enter_scope(request.egg_id.raw() as u64, &request.salt);
            trace.advance(GenerationStage::ScopeEntered);
            self.run_scoped(scope.rng(), request, &mut trace)?
        };
        trace.advance(GenerationStage::ScopeExited);

        debug!(
            egg_id = request.egg_id.raw(),
            species = result.species.0,
            tier = ?result.tier,
            shiny = result.shiny,
            variant = result.variant.index(),
            bonus = ?result.bonus,
            "hatched egg"
        );

        Ok((result, trace.stages))
    }

    /// Steps 2-6; runs entirely on the scoped stream.
    fn run_scoped(
        &self,
        rng: &mut DeterministicRng,
        request: &GenerationRequest,
        trace: &mut StageTrace,
    ) -> Result<GenerationResult> {
        let tier = request.egg_id.tier();

        let special = self.resolve_category(rng, request, tier)?;
        trace.advance(GenerationStage::CategoryResolved);

        let species = match special {
            Some(species) => species,
            None => CandidatePool::for_tier(&self.registry, tier)?.draw(rng)?,
        };
        trace.advance(GenerationStage::CandidateSelected);

        let primary = TraitVector::derive(request.egg_id.raw());
        let secondary = TraitVector::derive(rng.next_u32());
        let traits = primary.combine(secondary);
        trace.advance(GenerationStage::TraitsRolled);

        let shiny = roll_shiny(rng, request.category.shiny_odds(&self.config))?;
        let variant = if shiny {
            roll_sub_variant(rng)
        } else {
            Variant::Standard
        };
        trace.advance(GenerationStage::RarityRolled);

        let bonus = roll_bonus(rng, tier, request.category.bonus_base(&self.config))?;
        trace.advance(GenerationStage::BonusRolled);

        Ok(GenerationResult {
            species,
            tier,
            traits,
            shiny,
            variant,
            bonus,
        })
    }

    /// Species-egg, singleton and featured-legendary short circuits.
    fn resolve_category(
        &self,
        rng: &mut DeterministicRng,
        request: &GenerationRequest,
        tier: EggTier,
    ) -> Result<Option<SpeciesId>> {
        if let Some(species) = request.species {
            if self.registry.get(species).is_none() {
                return Err(GenerationError::MalformedEntry {
                    id: species,
                    reason: "fixed species missing from table",
                });
            }
            return Ok(Some(species));
        }

        if request.egg_id.is_singleton() {
            let pair = self.registry.singleton().ok_or(GenerationError::MissingSingleton)?;
            let species = if rng.next_int(self.config.singleton_rare_odds) == 0 {
                pair.rare
            } else {
                pair.common
            };
            return Ok(Some(species));
        }

        if request.category == EggCategory::Legendary && tier == EggTier::Master {
            if let Some(featured) = request.featured {
                if self.registry.get(featured).is_none() {
                    return Err(GenerationError::MalformedEntry {
                        id: featured,
                        reason: "featured species missing from table",
                    });
                }
                if rng.next_int(self.config.featured_odds) == 0 {
                    return Ok(Some(featured));
                }
            }
        }

        Ok(None)
    }
}

// =============================================================================
// TESTS
// =============================================================================
