//! Owned potato instances.
//!
//! # Responsibility
//! - Define the collectible the user grows with fertilizer.
//! - Derive species-dependent values (max level, progress, artwork).
//!
//! # Invariants
//! - `level >= 1` and `fertilizer >= 0`.
//! - `name` is copied at acquisition and never follows later species renames.
//! - `species_id` may point at a species the catalog no longer knows; such
//!   potatoes stay valid but have no leveling or artwork.

use crate::catalog::{self, PotatoSpecies};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for an owned potato.
pub type PotatoId = Uuid;

/// One owned potato.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Potato {
    pub id: PotatoId,
    /// Serialized as `typeId` to match the snapshot schema.
    #[serde(rename = "typeId")]
    pub species_id: String,
    pub name: String,
    pub level: u32,
    /// Progress toward the next level.
    pub fertilizer: i64,
}

/// Fertilizer progress toward the next level, ready for a progress bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelProgress {
    pub fertilizer: i64,
    pub needed: i64,
}

impl LevelProgress {
    /// Completed fraction in `0.0..=1.0`.
    pub fn fraction(&self) -> f64 {
        if self.needed <= 0 {
            return 1.0;
        }
        (self.fertilizer as f64 / self.needed as f64).clamp(0.0, 1.0)
    }
}

impl Potato {
    /// Creates a level 1 potato of `species` named after it.
    pub fn acquire(species: &PotatoSpecies) -> Self {
        Self::with_level(species, 1)
    }

    /// Creates a potato of `species` at an arbitrary starting level.
    pub fn with_level(species: &PotatoSpecies, level: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            species_id: species.id.to_string(),
            name: species.display_name.to_string(),
            level: level.max(1),
            fertilizer: 0,
        }
    }

    /// Resolves this potato's species, if the catalog still knows it.
    pub fn species(&self) -> Option<&'static PotatoSpecies> {
        catalog::lookup(&self.species_id)
    }

    /// Unknown species are never considered maxed.
    pub fn is_max_level(&self) -> bool {
        self.species()
            .is_some_and(|species| species.is_max_level(self.level))
    }

    /// Progress toward the next level; pinned full at max level.
    pub fn progress(&self) -> Option<LevelProgress> {
        let species = self.species()?;
        let needed = species.fertilizer_needed(self.level);
        let fertilizer = if species.is_max_level(self.level) {
            needed
        } else {
            self.fertilizer.min(needed)
        };
        Some(LevelProgress { fertilizer, needed })
    }

    /// Artwork asset name for the current level.
    pub fn image_name(&self) -> Option<String> {
        self.species().map(|species| species.image_name(self.level))
    }
}

#[cfg(test)]
mod tests {
    use super::{LevelProgress, Potato};
    use crate::catalog;

    #[test]
    fn acquire_copies_species_name_at_level_one() {
        let species = catalog::lookup("cephara").unwrap();
        let potato = Potato::acquire(species);
        assert_eq!(potato.name, "Cecil");
        assert_eq!(potato.species_id, "cephara");
        assert_eq!(potato.level, 1);
        assert_eq!(potato.fertilizer, 0);
    }

    #[test]
    fn progress_is_pinned_at_max_level() {
        let mut potato = Potato::with_level(catalog::starter(), 7);
        potato.fertilizer = 5_000;
        assert!(potato.is_max_level());
        let progress = potato.progress().unwrap();
        assert_eq!(progress.fertilizer, progress.needed);
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn unknown_species_has_no_derived_values() {
        let mut potato = Potato::acquire(catalog::starter());
        potato.species_id = "retired".to_string();
        assert!(!potato.is_max_level());
        assert_eq!(potato.progress(), None);
        assert_eq!(potato.image_name(), None);
    }

    #[test]
    fn progress_fraction_is_partial_below_threshold() {
        let progress = LevelProgress {
            fertilizer: 1,
            needed: 4,
        };
        assert_eq!(progress.fraction(), 0.25);
    }
}
