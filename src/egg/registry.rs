//! Species Registry
//!
//! Read-only table of hatchable species. The engine only queries it; the
//! table itself is owned by whoever loads the game data.

use std::collections::BTreeSet;

use serde::{Serialize, Deserialize};

use crate::error::{GenerationError, Result};

/// Highest species tier a registry entry may carry.
pub const MAX_SPECIES_TIER: u8 = 9;

/// Bundled species table.
const BUNDLED_SPECIES: &str = include_str!("../../data/species.json");

/// Species identifier.
///
/// Implements Ord so registries iterate in a fixed order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpeciesId(pub u16);

/// Regional availability of a species.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Regional {
    /// Available everywhere.
    #[default]
    None,
    /// Regional variant, half weight.
    Regional,
    /// Rare regional variant, one eighth weight.
    RareRegional,
}

impl Regional {
    /// Divisor applied to a candidate's pool weight.
    #[inline]
    pub fn weight_divisor(self) -> u32 {
        match self {
            Regional::None => 1,
            Regional::Regional => 2,
            Regional::RareRegional => 8,
        }
    }
}

/// One registry row.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesEntry {
    /// Species id
    pub id: SpeciesId,
    /// Display name (not used by generation)
    pub name: String,
    /// Species tier (1-9)
    pub tier: u8,
    /// Species evolves from a simpler pre-form
    #[serde(default)]
    pub has_prevolution: bool,
    /// Species can currently be obtained
    #[serde(default = "default_true")]
    pub obtainable: bool,
    /// Regional availability
    #[serde(default)]
    pub regional: Regional,
}

fn default_true() -> bool {
    true
}

/// The two species a singleton egg can hatch into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SingletonPair {
    /// Hatched on the rare roll.
    pub rare: SpeciesId,
    /// Hatched otherwise.
    pub common: SpeciesId,
}

/// Read-only species table queried during generation.
pub trait SpeciesRegistry: Send + Sync {
    /// All entries, ordered by id.
    fn entries(&self) -> &[SpeciesEntry];

    /// Check if a species is barred from the random pools.
    fn is_excluded(&self, id: SpeciesId) -> bool;

    /// Species pair used by singleton eggs.
    fn singleton(&self) -> Option<SingletonPair>;

    /// Look up a species.
    fn get(&self, id: SpeciesId) -> Option<&SpeciesEntry> {
        self.entries()
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|idx| &self.entries()[idx])
    }
}

/// Serialized registry layout.
#[derive(Debug, Deserialize)]
struct RegistryData {
    #[serde(default)]
    excluded: Vec<SpeciesId>,
    #[serde(default)]
    singleton: Option<SingletonPair>,
    species: Vec<SpeciesEntry>,
}

/// In-memory registry, validated on construction.
#[derive(Clone, Debug)]
pub struct StaticRegistry {
    entries: Vec<SpeciesEntry>,
    excluded: BTreeSet<SpeciesId>,
    singleton: Option<SingletonPair>,
}

impl StaticRegistry {
    /// Build a registry from entries.
    ///
    /// Entries are sorted by id. Duplicate ids, species tiers outside
    /// `1..=MAX_SPECIES_TIER` and singleton members missing from the table
    /// are rejected.
    pub fn new(
        mut entries: Vec<SpeciesEntry>,
        excluded: impl IntoIterator<Item = SpeciesId>,
        singleton: Option<SingletonPair>,
    ) -> Result<Self> {
        entries.sort_by_key(|e| e.id);

        for pair in entries.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(GenerationError::MalformedEntry {
                    id: pair[1].id,
                    reason: "duplicate species id",
                });
            }
        }

        for entry in &entries {
            if entry.tier == 0 || entry.tier > MAX_SPECIES_TIER {
                return Err(GenerationError::MalformedEntry {
                    id: entry.id,
                    reason: "species tier outside 1..=9",
                });
            }
        }

        let registry = Self {
            entries,
            excluded: excluded.into_iter().collect(),
            singleton,
        };

        if let Some(pair) = singleton {
            if pair.rare == pair.common {
                return Err(GenerationError::MalformedEntry {
                    id: pair.rare,
                    reason: "singleton pair repeats a species",
                });
            }
            for id in [pair.rare, pair.common] {
                if registry.get(id).is_none() {
                    return Err(GenerationError::MalformedEntry {
                        id,
                        reason: "singleton species missing from table",
                    });
                }
            }
        }

        Ok(registry)
    }

    /// Parse a registry from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let data: RegistryData = serde_json::from_str(json)
            .map_err(|e| GenerationError::RegistryParse(e.to_string()))?;
        Self::new(data.species, data.excluded, data.singleton)
    }

    /// The species table shipped with the crate.
    pub fn bundled() -> Result<Self> {
        Self::from_json(BUNDLED_SPECIES)
    }

    /// Number of species.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl SpeciesRegistry for StaticRegistry {
    fn entries(&self) -> &[SpeciesEntry] {
        &self.entries
    }

    fn is_excluded(&self, id: SpeciesId) -> bool {
        self.excluded.contains(&id)
    }

    fn singleton(&self) -> Option<SingletonPair> {
        self.singleton
    }
}
