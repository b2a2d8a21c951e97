//! Hidden trait vectors.
//!
//! Six 5-bit values packed into the low 30 bits of a 32-bit id,
//! most significant field first. Pure bit operations, no platform variance.

use serde::{Serialize, Deserialize};

use crate::error::{GenerationError, Result};

/// Number of trait components.
pub const TRAIT_COUNT: usize = 6;

/// Largest value a trait component may hold.
pub const MAX_TRAIT_VALUE: u8 = 31;

/// Bit offset of each component, most significant first.
const TRAIT_SHIFTS: [u32; TRAIT_COUNT] = [25, 20, 15, 10, 5, 0];

const TRAIT_MASK: u32 = 0x1f;

/// Six trait values, each in `[0, 31]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[u8; 6]", into = "[u8; 6]")]
pub struct TraitVector([u8; TRAIT_COUNT]);

impl TraitVector {
    /// Validate raw component values.
    pub fn new(values: [u8; TRAIT_COUNT]) -> Result<Self> {
        for (index, &value) in values.iter().enumerate() {
            if value > MAX_TRAIT_VALUE {
                return Err(GenerationError::TraitOutOfRange { index, value: value as i64 });
            }
        }
        Ok(Self(values))
    }

    /// Validate signed component values (e.g. from an external data source).
    pub fn from_signed(values: [i64; TRAIT_COUNT]) -> Result<Self> {
        let mut out = [0u8; TRAIT_COUNT];
        for (index, (&value, slot)) in values.iter().zip(out.iter_mut()).enumerate() {
            if !(0..=MAX_TRAIT_VALUE as i64).contains(&value) {
                return Err(GenerationError::TraitOutOfRange { index, value });
            }
            *slot = value as u8;
        }
        Ok(Self(out))
    }

    /// Extract the six 5-bit fields of `id` at offsets 25, 20, 15, 10, 5, 0.
    ///
    /// The top two bits of `id` are ignored.
    ///
    /// ```
    /// use hatchery::egg::traits::TraitVector;
    ///
    /// let traits = TraitVector::derive(0b00_00001_00010_00011_00100_00101_00110);
    /// assert_eq!(traits.values(), [1, 2, 3, 4, 5, 6]);
    /// ```
    pub fn derive(id: u32) -> Self {
        let mut values = [0u8; TRAIT_COUNT];
        for (slot, shift) in values.iter_mut().zip(TRAIT_SHIFTS) {
            *slot = ((id >> shift) & TRAIT_MASK) as u8;
        }
        Self(values)
    }

    /// Component-wise maximum. The result is never worse than either input.
    pub fn combine(self, other: TraitVector) -> TraitVector {
        let mut values = self.0;
        for (slot, theirs) in values.iter_mut().zip(other.0) {
            *slot = (*slot).max(theirs);
        }
        Self(values)
    }

    /// Component values.
    #[inline]
    pub fn values(self) -> [u8; TRAIT_COUNT] {
        self.0
    }
}

impl TryFrom<[u8; TRAIT_COUNT]> for TraitVector {
    type Error = GenerationError;

    fn try_from(values: [u8; TRAIT_COUNT]) -> Result<Self> {
        Self::new(values)
    }
}

impl From<TraitVector> for [u8; TRAIT_COUNT] {
    fn from(traits: TraitVector) -> Self {
        traits.0
    }
}

/// Combine raw signed vectors, rejecting any component outside `[0, 31]`.
pub fn combine_raw(a: [i64; TRAIT_COUNT], b: [i64; TRAIT_COUNT]) -> Result<TraitVector> {
    Ok(TraitVector::from_signed(a)?.combine(TraitVector::from_signed(b)?))
}
