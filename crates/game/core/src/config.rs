/// Formula constants and tunable parameters for the combat rules.
///
/// Percent-like values are stored in basis points (1/100 of a percent) so the
/// attack-interval math stays in integers and is bit-for-bit reproducible.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    /// Attack interval of an actor with zero AGI, in time units.
    pub base_interval: u32,

    /// Interval reduction per AGI point, in basis points (100 = 1%).
    pub reduce_per_agi_bp: u32,

    /// Upper bound on attacks per second; sets the interval floor.
    pub max_attacks_per_second: u32,

    /// Percent growth applied to enemy attributes for each level above 1.
    pub attribute_growth_per_level: u32,

    /// Unspent stat points granted per player level-up.
    pub points_per_level: u32,

    /// Experience required to go from level 1 to level 2.
    pub base_exp_to_next: u64,

    /// Growth of the experience threshold per level, in percent (150 = ×1.5).
    pub exp_growth_percent: u64,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    pub const MAX_STATUS_EFFECTS: usize = 8;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_BASE_INTERVAL: u32 = 1000;
    pub const DEFAULT_REDUCE_PER_AGI_BP: u32 = 100;
    pub const DEFAULT_MAX_ATTACKS_PER_SECOND: u32 = 4;
    pub const DEFAULT_ATTRIBUTE_GROWTH_PER_LEVEL: u32 = 10;
    pub const DEFAULT_POINTS_PER_LEVEL: u32 = 5;
    pub const DEFAULT_BASE_EXP_TO_NEXT: u64 = 100;
    pub const DEFAULT_EXP_GROWTH_PERCENT: u64 = 150;

    /// One whole in basis points.
    pub const BASIS_POINTS: u32 = 10_000;

    pub fn new() -> Self {
        Self {
            base_interval: Self::DEFAULT_BASE_INTERVAL,
            reduce_per_agi_bp: Self::DEFAULT_REDUCE_PER_AGI_BP,
            max_attacks_per_second: Self::DEFAULT_MAX_ATTACKS_PER_SECOND,
            attribute_growth_per_level: Self::DEFAULT_ATTRIBUTE_GROWTH_PER_LEVEL,
            points_per_level: Self::DEFAULT_POINTS_PER_LEVEL,
            base_exp_to_next: Self::DEFAULT_BASE_EXP_TO_NEXT,
            exp_growth_percent: Self::DEFAULT_EXP_GROWTH_PERCENT,
        }
    }

    /// Shortest interval any actor may reach: `base_interval / max_attacks_per_second`.
    pub fn min_interval(&self) -> u32 {
        let floor = u64::from(self.base_interval) * u64::from(self.min_interval_factor_bp())
            / u64::from(Self::BASIS_POINTS);
        // factor is at most one whole, so the floor never exceeds base_interval
        floor as u32
    }

    /// Interval floor expressed as a factor of `base_interval`, in basis points.
    pub(crate) fn min_interval_factor_bp(&self) -> u32 {
        Self::BASIS_POINTS / self.max_attacks_per_second.max(1)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_floor_is_a_quarter_of_base_interval() {
        assert_eq!(GameConfig::default().min_interval(), 250);
    }

    #[test]
    fn zero_attack_rate_does_not_divide_by_zero() {
        let config = GameConfig {
            max_attacks_per_second: 0,
            ..GameConfig::default()
        };
        assert_eq!(config.min_interval(), config.base_interval);
    }

    #[test]
    fn large_base_interval_does_not_overflow() {
        let config = GameConfig {
            base_interval: 500_000,
            max_attacks_per_second: 1,
            ..GameConfig::default()
        };
        assert_eq!(config.min_interval(), 500_000);

        let config = GameConfig {
            base_interval: u32::MAX,
            ..GameConfig::default()
        };
        assert_eq!(config.min_interval(), u32::MAX / 4);
    }
}
