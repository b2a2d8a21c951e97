//! Generation errors.
//!
//! Nothing here is retryable: the engine performs no I/O, so the same inputs
//! fail the same way on every replay.

use crate::egg::registry::SpeciesId;
use crate::egg::tier::EggTier;

/// Broad class of a [`GenerationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// The engine was set up with data it cannot generate from.
    Configuration,
    /// A caller passed out-of-range input to an operation.
    Misuse,
}

/// Errors raised by the generation engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// No registry entry is eligible for an egg tier.
    #[error("no eligible species for {0:?} eggs")]
    EmptyPool(EggTier),

    /// Every eligible entry has weight zero.
    #[error("candidate pool has zero total weight")]
    ZeroTotalWeight,

    /// Pool weights do not fit the roll range.
    #[error("candidate pool total weight overflows u32")]
    WeightOverflow,

    /// Registry entry failed validation.
    #[error("malformed registry entry {id:?}: {reason}")]
    MalformedEntry {
        /// Offending species.
        id: SpeciesId,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// Registry data could not be parsed.
    #[error("registry parse error: {0}")]
    RegistryParse(String),

    /// Singleton egg hatched against a registry without a singleton pair.
    #[error("registry defines no singleton species")]
    MissingSingleton,

    /// Engine configuration failed validation.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    /// Weighted roll outside `[0, total)`.
    #[error("roll {roll} out of range for total weight {total}")]
    RollOutOfRange {
        /// The roll supplied.
        roll: u32,
        /// Pool total weight.
        total: u32,
    },

    /// Trait component outside `[0, 31]`.
    #[error("trait value {value} at index {index} exceeds {max}", max = crate::egg::traits::MAX_TRAIT_VALUE)]
    TraitOutOfRange {
        /// Component index.
        index: usize,
        /// Offending value.
        value: i64,
    },

    /// Odds of zero for a one-in-N roll.
    #[error("odds must be non-zero")]
    ZeroOdds,

    /// Calendar date before 1970-01-01.
    #[error("day {day} is before the featured rotation starts")]
    DayBeforeEpoch {
        /// Days since 1970-01-01 (negative).
        day: i64,
    },
}

impl GenerationError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::EmptyPool(_)
            | GenerationError::ZeroTotalWeight
            | GenerationError::WeightOverflow
            | GenerationError::MalformedEntry { .. }
            | GenerationError::RegistryParse(_)
            | GenerationError::MissingSingleton
            | GenerationError::InvalidConfig(_) => ErrorKind::Configuration,
            GenerationError::RollOutOfRange { .. }
            | GenerationError::TraitOutOfRange { .. }
            | GenerationError::ZeroOdds
            | GenerationError::DayBeforeEpoch { .. } => ErrorKind::Misuse,
        }
    }
}

/// Result alias for generation operations.
pub type Result<T> = std::result::Result<T, GenerationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kinds() {
        assert_eq!(GenerationError::ZeroTotalWeight.kind(), ErrorKind::Configuration);
        assert_eq!(GenerationError::EmptyPool(EggTier::Master).kind(), ErrorKind::Configuration);
        assert_eq!(GenerationError::ZeroOdds.kind(), ErrorKind::Misuse);
        assert_eq!(GenerationError::DayBeforeEpoch { day: -1 }.kind(), ErrorKind::Misuse);
        assert_eq!(
            GenerationError::RollOutOfRange { roll: 100, total: 100 }.kind(),
            ErrorKind::Misuse
        );
    }

    #[test]
    fn test_error_messages() {
        let err = GenerationError::TraitOutOfRange { index: 2, value: 40 };
        assert_eq!(err.to_string(), "trait value 40 at index 2 exceeds 31");
    }
}
