//! Shiny, variant and bonus-unlock rolls.

use serde::{Serialize, Deserialize};

use crate::core::rng::DeterministicRng;
use crate::error::{GenerationError, Result};

use super::tier::EggTier;

/// Cosmetic sub-variant of a shiny.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[derive(Default)]
pub enum Variant {
    /// Most common
    #[default]
    Standard = 0,
    /// Uncommon
    Rare = 1,
    /// Rarest
    Epic = 2,
}

impl Variant {
    /// Numeric variant (0-2).
    #[inline]
    pub fn index(self) -> u8 {
        self as u8
    }
}

/// Denominator of the variant roll.
pub const VARIANT_ROLL_RANGE: u32 = 10;

/// Cumulative variant table: first entry whose bound exceeds the roll wins.
///
/// Epic 1/10, Rare 3/10, Standard 6/10.
pub const VARIANT_TABLE: [(u32, Variant); 3] = [
    (1, Variant::Epic),
    (4, Variant::Rare),
    (10, Variant::Standard),
];

/// One-in-`base_odds` shiny roll. Consumes one draw.
pub fn roll_shiny(rng: &mut DeterministicRng, base_odds: u32) -> Result<bool> {
    if base_odds == 0 {
        return Err(GenerationError::ZeroOdds);
    }
    Ok(rng.next_int(base_odds) == 0)
}

/// Look up a variant roll in [`VARIANT_TABLE`].
pub fn variant_for_roll(roll: u32) -> Variant {
    VARIANT_TABLE
        .iter()
        .find(|(bound, _)| roll < *bound)
        .map(|&(_, variant)| variant)
        .unwrap_or(Variant::Standard)
}

/// Roll a shiny's sub-variant. Consumes one draw.
pub fn roll_sub_variant(rng: &mut DeterministicRng) -> Variant {
    variant_for_roll(rng.next_int(VARIANT_ROLL_RANGE))
}

/// Number of unlockable bonus slots.
pub const BONUS_SLOT_COUNT: u32 = 3;

/// Outcome of the bonus-unlock roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusSlot {
    /// Unlocks the slot with this index (`0..BONUS_SLOT_COUNT`).
    Unlocked(u8),
    /// Nothing unlocked.
    NoUnlock,
}

impl BonusSlot {
    /// Slot index, if one was unlocked.
    pub fn slot(self) -> Option<u8> {
        match self {
            BonusSlot::Unlocked(slot) => Some(slot),
            BonusSlot::NoUnlock => None,
        }
    }
}

/// One-in-N odds of the bonus unlock: `base * 2^(3 - tier)`.
///
/// Higher egg tiers halve the odds per step, so Master eggs unlock eight
/// times as often as Common ones.
pub fn bonus_odds(tier: EggTier, base: u32) -> Result<u32> {
    if base == 0 {
        return Err(GenerationError::ZeroOdds);
    }
    base.checked_mul(1 << tier.steps_below_max())
        .ok_or_else(|| GenerationError::InvalidConfig(format!("bonus base {base} too large")))
}

/// Roll the bonus unlock. Consumes one draw, plus one for the slot on success.
pub fn roll_bonus(rng: &mut DeterministicRng, tier: EggTier, base: u32) -> Result<BonusSlot> {
    let odds = bonus_odds(tier, base)?;
    if rng.next_int(odds) != 0 {
        return Ok(BonusSlot::NoUnlock);
    }
    Ok(BonusSlot::Unlocked(rng.next_int(BONUS_SLOT_COUNT) as u8))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_table() {
        assert_eq!(variant_for_roll(0), Variant::Epic);
        for roll in 1..4 {
            assert_eq!(variant_for_roll(roll), Variant::Rare);
        }
        for roll in 4..10 {
            assert_eq!(variant_for_roll(roll), Variant::Standard);
        }
    }

    #[test]
    fn test_table_is_cumulative() {
        let bounds: Vec<u32> = VARIANT_TABLE.iter().map(|(b, _)| *b).collect();
        assert!(bounds.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(bounds.last().copied(), Some(VARIANT_ROLL_RANGE));
    }

    #[test]
    fn test_zero_odds_rejected() {
        let mut rng = DeterministicRng::new(1);
        assert_eq!(roll_shiny(&mut rng, 0), Err(GenerationError::ZeroOdds));
    }

    #[test]
    fn test_odds_of_one_always_shiny() {
        let mut rng = DeterministicRng::new(1);
        for _ in 0..100 {
            assert!(roll_shiny(&mut rng, 1).unwrap());
        }
    }

    #[test]
    fn test_shiny_rate_converges() {
        let mut rng = DeterministicRng::new(512);
        let samples = 2_000_000u32;
        let mut hits = 0u32;
        for _ in 0..samples {
            if roll_shiny(&mut rng, 512).unwrap() {
                hits += 1;
            }
        }
        // Expected 3906.25, sd ~62.4; allow 5 sd
        let expected = samples as f64 / 512.0;
        assert!((hits as f64 - expected).abs() < 320.0, "hits = {hits}");
    }

    #[test]
    fn test_bonus_odds_scale_with_tier() {
        assert_eq!(bonus_odds(EggTier::Common, 6).unwrap(), 48);
        assert_eq!(bonus_odds(EggTier::Great, 6).unwrap(), 24);
        assert_eq!(bonus_odds(EggTier::Ultra, 6).unwrap(), 12);
        assert_eq!(bonus_odds(EggTier::Master, 6).unwrap(), 6);
        assert_eq!(bonus_odds(EggTier::Common, 3).unwrap(), 24);
        assert_eq!(bonus_odds(EggTier::Master, 0), Err(GenerationError::ZeroOdds));
        assert!(bonus_odds(EggTier::Common, u32::MAX).is_err());
    }

    #[test]
    fn test_bonus_draw_counts() {
        // Failure consumes one draw, success two.
        let mut rng = DeterministicRng::new(3);
        let mut twin = rng.clone();
        match roll_bonus(&mut rng, EggTier::Master, 1).unwrap() {
            BonusSlot::Unlocked(slot) => assert!((slot as u32) < BONUS_SLOT_COUNT),
            BonusSlot::NoUnlock => panic!("odds of one always unlock"),
        }
        twin.next_u64();
        twin.next_u64();
        assert_eq!(twin, rng);
    }

    #[test]
    fn test_bonus_rate() {
        let mut rng = DeterministicRng::new(6);
        let unlocked = (0..48_000)
            .filter(|_| roll_bonus(&mut rng, EggTier::Common, 6).unwrap().slot().is_some())
            .count();
        // Expected 1000, sd ~31
        assert!((850..1150).contains(&unlocked), "unlocked = {unlocked}");
    }

    #[test]
    fn test_variant_frequencies() {
        let mut rng = DeterministicRng::new(99);
        let mut counts = [0u32; 3];
        for _ in 0..100_000 {
            counts[roll_sub_variant(&mut rng).index() as usize] += 1;
        }
        assert!((58_500..61_500).contains(&counts[0]));
        assert!((28_500..31_500).contains(&counts[1]));
        assert!((9_000..11_000).contains(&counts[2]));
    }
}
