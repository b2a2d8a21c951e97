//! Engine configuration.
//!
//! Odds used by the generation pipeline. Values come from [`Default`], from
//! `HATCHERY_*` environment variables, or from JSON; all are validated before
//! the engine accepts them.

use serde::{Serialize, Deserialize};

use crate::error::{GenerationError, Result};

/// Odds and divisors used by the generation pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// One-in-N shiny odds for ordinary eggs.
    pub shiny_odds: u32,
    /// One-in-N shiny odds for shiny-boosted eggs.
    pub boosted_shiny_odds: u32,
    /// Bonus roll base for ordinary eggs (scaled by 2^(3 - tier)).
    pub bonus_base: u32,
    /// Bonus roll base for move-boosted eggs.
    pub boosted_bonus_base: u32,
    /// One-in-N chance a singleton egg hatches the rare singleton species.
    pub singleton_rare_odds: u32,
    /// One-in-N chance a legendary Master egg hatches the featured species.
    pub featured_odds: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            shiny_odds: 128,         // 512 / 65536
            boosted_shiny_odds: 64,  // 1024 / 65536
            bonus_base: 6,
            boosted_bonus_base: 3,
            singleton_rare_odds: 8,
            featured_odds: 2,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables, falling back to defaults.
    ///
    /// Unparseable values are rejected rather than ignored.
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let config = Self {
            shiny_odds: env_u32("HATCHERY_SHINY_ODDS", defaults.shiny_odds)?,
            boosted_shiny_odds: env_u32("HATCHERY_BOOSTED_SHINY_ODDS", defaults.boosted_shiny_odds)?,
            bonus_base: env_u32("HATCHERY_BONUS_BASE", defaults.bonus_base)?,
            boosted_bonus_base: env_u32("HATCHERY_BOOSTED_BONUS_BASE", defaults.boosted_bonus_base)?,
            singleton_rare_odds: env_u32("HATCHERY_SINGLETON_RARE_ODDS", defaults.singleton_rare_odds)?,
            featured_odds: env_u32("HATCHERY_FEATURED_ODDS", defaults.featured_odds)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| GenerationError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero odds and bonus bases that overflow once scaled.
    pub fn validate(&self) -> Result<()> {
        let odds = [
            ("shiny_odds", self.shiny_odds),
            ("boosted_shiny_odds", self.boosted_shiny_odds),
            ("bonus_base", self.bonus_base),
            ("boosted_bonus_base", self.boosted_bonus_base),
            ("singleton_rare_odds", self.singleton_rare_odds),
            ("featured_odds", self.featured_odds),
        ];
        for (name, value) in odds {
            if value == 0 {
                return Err(GenerationError::InvalidConfig(format!("{name} must be non-zero")));
            }
        }
        for (name, base) in [("bonus_base", self.bonus_base), ("boosted_bonus_base", self.boosted_bonus_base)] {
            if base.checked_mul(1 << crate::egg::tier::MAX_TIER_INDEX).is_none() {
                return Err(GenerationError::InvalidConfig(format!("{name} too large")));
            }
        }
        Ok(())
    }
}

fn env_u32(key: &str, default: u32) -> Result<u32> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| GenerationError::InvalidConfig(format!("{key}={raw:?} is not a u32"))),
        Err(_) => Ok(default),
    }
}
