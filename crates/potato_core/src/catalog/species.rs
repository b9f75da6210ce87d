//! Potato species definitions and leveling math.
//!
//! # Responsibility
//! - Describe one collectible potato kind with fixed leveling parameters.
//! - Own the fertilizer-per-level formula used by the economy.
//!
//! # Invariants
//! - `max_level >= 1`, `base_fertilizer_per_level > 0`,
//!   `fertilizer_multiplier >= 0`, `cost >= 0`.
//! - `fertilizer_needed` never returns less than 1.

/// Catalog-defined kind of potato.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotatoSpecies {
    /// Stable catalog key, persisted on owned potatoes as `typeId`.
    pub id: &'static str,
    /// Default display name copied onto a potato when it is acquired.
    pub display_name: &'static str,
    /// Botanical name shown under the potato name.
    pub plant_type: &'static str,
    /// Short flavor sentence.
    pub plant_info: &'static str,
    pub max_level: u32,
    pub base_fertilizer_per_level: i64,
    /// Compounding growth factor applied once per level above 1.
    pub fertilizer_multiplier: f64,
    /// Purchase price in spuds.
    pub cost: i64,
}

impl PotatoSpecies {
    /// Fertilizer required to go from `level` to `level + 1`.
    ///
    /// `floor(base * (1 + multiplier)^(level - 1))`, saturated into `i64`.
    /// Levels below 1 are treated as level 1.
    pub fn fertilizer_needed(&self, level: u32) -> i64 {
        let exponent = level.max(1) - 1;
        let factor = (1.0 + self.fertilizer_multiplier).powf(f64::from(exponent));
        let needed = (self.base_fertilizer_per_level as f64 * factor).floor();
        // `as` saturates on overflow and maps NaN to 0.
        (needed as i64).max(1)
    }

    /// Returns whether `level` has reached this species' cap.
    pub fn is_max_level(&self, level: u32) -> bool {
        level >= self.max_level
    }

    /// Asset name for the artwork of this species at `level`.
    ///
    /// The level is clamped into `1..=max_level`.
    pub fn image_name(&self, level: u32) -> String {
        let clamped = level.clamp(1, self.max_level.max(1));
        format!("{}_level{clamped}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::PotatoSpecies;

    const DOUBLING: PotatoSpecies = PotatoSpecies {
        id: "doubling",
        display_name: "Doubling",
        plant_type: "Testus Duplex",
        plant_info: "doubles every level.",
        max_level: 5,
        base_fertilizer_per_level: 1,
        fertilizer_multiplier: 1.0,
        cost: 0,
    };

    #[test]
    fn fertilizer_needed_compounds_per_level() {
        let needed: Vec<i64> = (1..=5).map(|level| DOUBLING.fertilizer_needed(level)).collect();
        assert_eq!(needed, vec![1, 2, 4, 8, 16]);
    }

    #[test]
    fn fertilizer_needed_floors_fractional_results() {
        let species = PotatoSpecies {
            base_fertilizer_per_level: 2,
            fertilizer_multiplier: 1.5,
            ..DOUBLING
        };
        // 2 * 2.5^2 = 12.5
        assert_eq!(species.fertilizer_needed(3), 12);
    }

    #[test]
    fn fertilizer_needed_treats_level_zero_as_one() {
        assert_eq!(DOUBLING.fertilizer_needed(0), 1);
    }

    #[test]
    fn fertilizer_needed_saturates_instead_of_wrapping() {
        assert_eq!(DOUBLING.fertilizer_needed(200), i64::MAX);
    }

    #[test]
    fn image_name_clamps_level() {
        assert_eq!(DOUBLING.image_name(0), "doubling_level1");
        assert_eq!(DOUBLING.image_name(3), "doubling_level3");
        assert_eq!(DOUBLING.image_name(99), "doubling_level5");
    }
}
