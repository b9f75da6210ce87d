//! Spud and fertilizer economy rules.
//!
//! # Responsibility
//! - Convert focus seconds into spuds and potato fertilizer.
//! - Run level-up steps against the species fertilizer curve.
//!
//! # Invariants
//! - One spud and one fertilizer per focus second, no multipliers.
//! - After `grow`, `fertilizer < fertilizer_needed(level)` unless the potato
//!   is at max level.
//! - Overflow is carried forward as `fertilizer - needed`.

use crate::catalog::PotatoSpecies;
use crate::model::potato::Potato;

/// Spuds earned per focus second.
pub const SPUDS_PER_SECOND: i64 = 1;
/// Fertilizer earned per focus second.
pub const FERTILIZER_PER_SECOND: i64 = 1;

/// Spuds earned for `elapsed_seconds` of focus.
pub fn spuds_for(elapsed_seconds: i64) -> i64 {
    elapsed_seconds.max(0).saturating_mul(SPUDS_PER_SECOND)
}

/// Fertilizer earned for `elapsed_seconds` of focus.
pub fn fertilizer_for(elapsed_seconds: i64) -> i64 {
    elapsed_seconds.max(0).saturating_mul(FERTILIZER_PER_SECOND)
}

/// Adds fertilizer to `potato` and levels it up as far as it now can.
///
/// Returns the number of levels gained. A single credit may cross several
/// thresholds; each one consumes exactly its own requirement.
pub fn grow(potato: &mut Potato, species: &PotatoSpecies, fertilizer: i64) -> u32 {
    potato.fertilizer = potato.fertilizer.saturating_add(fertilizer.max(0));

    let mut levels_gained = 0;
    while !species.is_max_level(potato.level) {
        let needed = species.fertilizer_needed(potato.level);
        if potato.fertilizer < needed {
            break;
        }
        potato.level += 1;
        potato.fertilizer -= needed;
        levels_gained += 1;
    }
    levels_gained
}

#[cfg(test)]
mod tests {
    use super::{fertilizer_for, grow, spuds_for};
    use crate::catalog::PotatoSpecies;
    use crate::model::potato::Potato;

    const SPROUT: PotatoSpecies = PotatoSpecies {
        id: "sprout",
        display_name: "Sprout",
        plant_type: "Testus Sproutus",
        plant_info: "grows on demand.",
        max_level: 4,
        base_fertilizer_per_level: 1,
        fertilizer_multiplier: 1.0,
        cost: 0,
    };

    #[test]
    fn single_threshold_levels_up_once_with_zero_carry() {
        let mut potato = Potato::acquire(&SPROUT);
        assert_eq!(grow(&mut potato, &SPROUT, 1), 1);
        assert_eq!(potato.level, 2);
        assert_eq!(potato.fertilizer, 0);
    }

    #[test]
    fn credit_cascades_through_every_crossed_threshold() {
        let mut potato = Potato::acquire(&SPROUT);
        // needed: 1 (lvl 1), 2 (lvl 2), 4 (lvl 3)
        assert_eq!(grow(&mut potato, &SPROUT, 3), 2);
        assert_eq!(potato.level, 3);
        assert_eq!(potato.fertilizer, 0);

        assert_eq!(grow(&mut potato, &SPROUT, 5), 1);
        assert_eq!(potato.level, 4);
        assert_eq!(potato.fertilizer, 1);
    }

    #[test]
    fn carry_is_plain_subtraction_when_requirement_grows() {
        let mut potato = Potato::acquire(&SPROUT);
        potato.level = 2;
        potato.fertilizer = 1;
        // 1 + 2 = 3 >= 2 → level 3 with 1 left, 1 < 4 so it stops.
        assert_eq!(grow(&mut potato, &SPROUT, 2), 1);
        assert_eq!(potato.level, 3);
        assert_eq!(potato.fertilizer, 1);
    }

    #[test]
    fn never_exceeds_max_level() {
        let mut potato = Potato::acquire(&SPROUT);
        assert_eq!(grow(&mut potato, &SPROUT, 10_000), 3);
        assert_eq!(potato.level, SPROUT.max_level);

        assert_eq!(grow(&mut potato, &SPROUT, 10_000), 0);
        assert_eq!(potato.level, SPROUT.max_level);
    }

    #[test]
    fn negative_inputs_earn_nothing() {
        assert_eq!(spuds_for(-5), 0);
        assert_eq!(fertilizer_for(-5), 0);
        assert_eq!(spuds_for(42), 42);
    }
}
