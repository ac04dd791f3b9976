//! Derived Stats - combat statistics computed from attributes.
//!
//! These are NOT hand-edited: every value is produced by [`derive`], then
//! layered with the class base table ([`compose`]) and equipment bonuses
//! ([`with_bonuses`]). An actor always stores the full result of that chain.
//!
//! ```text
//! [ Attributes ] --derive--> [ attribute portion ]
//!                                   + base table      (compose)
//!                                   + equipment       (with_bonuses)
//!                                   = DerivedStats
//! ```

use super::attributes::Attributes;
use super::bonus::StatBonuses;
use super::interval::attack_interval;
use crate::config::GameConfig;

/// Combat-facing statistics of an actor.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DerivedStats {
    /// Attack power.
    pub atk: u32,

    /// Flat damage reduction.
    pub def: u32,

    /// Maximum hit points.
    pub hp: u32,

    /// Attack interval in time units (lower is faster). Not a rate.
    pub aspd: u32,

    /// Critical hit chance, percent.
    pub cr: u32,

    /// Critical damage bonus, percent. A crit deals `1 + crd / 100` times damage.
    pub crd: u32,
}

impl DerivedStats {
    pub const ZERO: Self = Self {
        atk: 0,
        def: 0,
        hp: 0,
        aspd: 0,
        cr: 0,
        crd: 0,
    };
}

/// Maps attribute points to the attribute portion of the derived stats.
///
/// Formulas:
/// - ATK: STR × 3 + AGI
/// - DEF: DEX × 2
/// - HP: VIT × 20
/// - ASPD: see [`attack_interval`]
/// - CR: CTR
/// - CRD: CTR × 50 (the 50% baseline comes from the base table)
pub fn derive(attributes: &Attributes, config: &GameConfig) -> DerivedStats {
    DerivedStats {
        atk: attributes
            .str
            .saturating_mul(3)
            .saturating_add(attributes.agi),
        def: attributes.dex.saturating_mul(2),
        hp: attributes.vit.saturating_mul(20),
        aspd: attack_interval(attributes.agi, config),
        cr: attributes.ctr,
        crd: attributes.ctr.saturating_mul(50),
    }
}

/// Adds a class base table to the attribute portion, element-wise.
pub fn compose(base: &DerivedStats, derived: &DerivedStats) -> DerivedStats {
    DerivedStats {
        atk: base.atk.saturating_add(derived.atk),
        def: base.def.saturating_add(derived.def),
        hp: base.hp.saturating_add(derived.hp),
        aspd: base.aspd.saturating_add(derived.aspd),
        cr: base.cr.saturating_add(derived.cr),
        crd: base.crd.saturating_add(derived.crd),
    }
}

/// Folds additive equipment bonuses into composed stats.
///
/// Negative deltas clamp at zero; the attack interval never drops below
/// [`GameConfig::min_interval`].
pub fn with_bonuses(
    stats: &DerivedStats,
    bonuses: &StatBonuses,
    config: &GameConfig,
) -> DerivedStats {
    DerivedStats {
        atk: stats.atk.saturating_add_signed(bonuses.atk),
        def: stats.def.saturating_add_signed(bonuses.def),
        hp: stats.hp.saturating_add_signed(bonuses.hp),
        aspd: stats
            .aspd
            .saturating_add_signed(bonuses.aspd)
            .max(config.min_interval()),
        cr: stats.cr.saturating_add_signed(bonuses.cr),
        crd: stats.crd.saturating_add_signed(bonuses.crd),
    }
}
