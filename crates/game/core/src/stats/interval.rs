//! Attack interval - how long an actor waits between attacks.
//!
//! Formula:
//! - interval = base_interval × max(1 − AGI × reduce_per_agi, 1 / max_attacks_per_second)
//!
//! The factor is floored BEFORE scaling, so the result can never drop below
//! `base_interval / max_attacks_per_second`.

use crate::config::GameConfig;

/// Calculate the attack interval for an actor with the given AGI.
///
/// # Examples
/// - AGI 0: 1000 × 1.00 = 1000
/// - AGI 10: 1000 × 0.90 = 900
/// - AGI 90: 1000 × max(0.10, 0.25) = 250
pub fn attack_interval(agi: u32, config: &GameConfig) -> u32 {
    let whole = u64::from(GameConfig::BASIS_POINTS);
    let reduction = u64::from(agi) * u64::from(config.reduce_per_agi_bp);
    let factor = whole
        .saturating_sub(reduction)
        .max(u64::from(config.min_interval_factor_bp()));

    (u64::from(config.base_interval) * factor / whole) as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn each_agi_point_shortens_by_one_percent() {
        let config = GameConfig::default();
        assert_eq!(attack_interval(0, &config), 1000);
        assert_eq!(attack_interval(1, &config), 990);
        assert_eq!(attack_interval(10, &config), 900);
        assert_eq!(attack_interval(75, &config), 250);
    }

    #[test]
    fn floor_holds_past_the_cap() {
        let config = GameConfig::default();
        assert_eq!(attack_interval(76, &config), 250);
        assert_eq!(attack_interval(u32::MAX, &config), 250);
    }

    proptest! {
        #[test]
        fn interval_never_below_floor(agi in any::<u32>()) {
            let config = GameConfig::default();
            prop_assert!(attack_interval(agi, &config) >= config.min_interval());
        }

        #[test]
        fn interval_non_increasing_in_agi(agi in 0u32..10_000) {
            let config = GameConfig::default();
            prop_assert!(attack_interval(agi + 1, &config) <= attack_interval(agi, &config));
        }

        #[test]
        fn interval_strictly_decreases_until_floor(agi in 0u32..75) {
            let config = GameConfig::default();
            prop_assert!(attack_interval(agi + 1, &config) < attack_interval(agi, &config));
        }
    }
}
