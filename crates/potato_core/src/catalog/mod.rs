//! Built-in potato species registry.
//!
//! # Responsibility
//! - Hold the immutable, process-wide table of purchasable species.
//! - Resolve species by stable id for leveling and display lookups.
//!
//! # Invariants
//! - Species ids are unique and `all()` order is fixed.
//! - The starter species always exists and costs nothing.

pub mod species;

pub use species::PotatoSpecies;

/// Catalog id of the species seeded on first run.
pub const STARTER_SPECIES_ID: &str = "stephania";

const SPECIES: &[PotatoSpecies] = &[
    PotatoSpecies {
        id: STARTER_SPECIES_ID,
        display_name: "Stephan",
        plant_type: "Stephania Erecta",
        plant_info: "likes to paint and ride bikes.",
        max_level: 7,
        base_fertilizer_per_level: 1,
        fertilizer_multiplier: 1.0,
        cost: 0,
    },
    PotatoSpecies {
        id: "cephara",
        display_name: "Cecil",
        plant_type: "Stephania Cepharantha",
        plant_info: "is a very pretty flower.",
        max_level: 9,
        base_fertilizer_per_level: 2,
        fertilizer_multiplier: 1.5,
        cost: 100,
    },
];

/// Returns every species in display order.
pub fn all() -> &'static [PotatoSpecies] {
    SPECIES
}

/// Looks up one species by catalog id.
pub fn lookup(id: &str) -> Option<&'static PotatoSpecies> {
    SPECIES.iter().find(|species| species.id == id)
}

/// Returns the free species used to seed a fresh installation.
pub fn starter() -> &'static PotatoSpecies {
    // The table is a compile-time constant whose first entry is the starter.
    lookup(STARTER_SPECIES_ID).unwrap_or(&SPECIES[0])
}
