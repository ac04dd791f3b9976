//! Damage calculation and critical hits.

use crate::stats::DerivedStats;

/// Skill damage multiplier in percent (100 = ×1).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SkillMultiplier(pub u32);

impl SkillMultiplier {
    pub const NONE: Self = Self(100);

    pub fn apply(self, damage: u32) -> u32 {
        (u64::from(damage) * u64::from(self.0) / 100).min(u64::from(u32::MAX)) as u32
    }
}

impl Default for SkillMultiplier {
    fn default() -> Self {
        Self::NONE
    }
}

/// Result of one damage resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRoll {
    pub amount: u32,
    pub critical: bool,
}

/// Damage before skills and crits: `max(ATK − DEF, 1)`.
pub fn base_damage(attack: u32, defense: u32) -> u32 {
    attack.saturating_sub(defense).max(1)
}

/// A crit succeeds when `roll` (0..100) is below the crit chance.
pub fn is_critical(crit_chance: u32, roll: u32) -> bool {
    roll < crit_chance
}

/// Scales damage by `1 + crit_damage / 100`.
pub fn apply_critical(damage: u32, crit_damage: u32) -> u32 {
    let scaled = u64::from(damage) * (100 + u64::from(crit_damage)) / 100;
    scaled.min(u64::from(u32::MAX)) as u32
}

/// Resolve the damage of one attack.
///
/// # Formula
///
/// ```text
/// damage = max(max(ATK - DEF, 1) × skill_multiplier, 1)
/// if roll < CR:
///     damage ×= 1 + CRD / 100
/// ```
///
/// `crit_roll` is a percentage roll in `0..100` supplied by the caller's RNG.
pub fn resolve_damage(
    attacker: &DerivedStats,
    defender: &DerivedStats,
    skill: SkillMultiplier,
    crit_roll: u32,
) -> DamageRoll {
    let damage = skill.apply(base_damage(attacker.atk, defender.def)).max(1);
    let critical = is_critical(attacker.cr, crit_roll);
    let amount = if critical {
        apply_critical(damage, attacker.crd)
    } else {
        damage
    };

    DamageRoll { amount, critical }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{PcgRng, RngOracle, RollContext, compute_seed};
    use proptest::prelude::*;

    fn stats(atk: u32, def: u32, cr: u32, crd: u32) -> DerivedStats {
        DerivedStats {
            atk,
            def,
            cr,
            crd,
            ..DerivedStats::ZERO
        }
    }

    #[test]
    fn attack_below_defense_still_deals_one() {
        assert_eq!(base_damage(5, 50), 1);
        assert_eq!(base_damage(0, 0), 1);
        assert_eq!(base_damage(40, 20), 20);
    }

    #[test]
    fn skill_multiplier_applies_before_crit() {
        let roll = resolve_damage(
            &stats(40, 20, 100, 300),
            &stats(0, 20, 0, 0),
            SkillMultiplier(150),
            0,
        );
        // 20 × 1.5 = 30, × (1 + 3) = 120
        assert_eq!(roll, DamageRoll { amount: 120, critical: true });
    }

    #[test]
    fn zero_crit_chance_never_crits() {
        let rng = PcgRng;
        let attacker = stats(40, 0, 0, 300);
        let defender = stats(0, 10, 0, 0);
        for nonce in 0..10_000 {
            let roll = rng.roll_percent(compute_seed(3, nonce, 1, RollContext::Critical));
            assert!(!resolve_damage(&attacker, &defender, SkillMultiplier::NONE, roll).critical);
        }
    }

    #[test]
    fn full_crit_chance_always_crits() {
        let rng = PcgRng;
        let attacker = stats(40, 0, 100, 300);
        let defender = stats(0, 10, 0, 0);
        for nonce in 0..10_000 {
            let roll = rng.roll_percent(compute_seed(3, nonce, 1, RollContext::Critical));
            let result = resolve_damage(&attacker, &defender, SkillMultiplier::NONE, roll);
            assert!(result.critical);
            assert_eq!(result.amount, 120);
        }
    }

    proptest! {
        #[test]
        fn damage_is_at_least_one(atk in any::<u32>(), def in any::<u32>()) {
            prop_assert!(base_damage(atk, def) >= 1);
        }

        #[test]
        fn non_critical_damage_never_below_one(
            atk in 0u32..100_000,
            def in 0u32..100_000,
            roll in 0u32..100,
        ) {
            let result = resolve_damage(
                &stats(atk, 0, 0, 0),
                &stats(0, def, 0, 0),
                SkillMultiplier::NONE,
                roll,
            );
            prop_assert!(!result.critical);
            prop_assert!(result.amount >= 1);
        }
    }
}
