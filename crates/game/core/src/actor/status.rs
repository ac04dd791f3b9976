//! Status effects carried in an actor's runtime block.
//!
//! Effects store `expires_at` on the combat clock (accumulated tick time).
//! An effect is active while `now < expires_at`.

use arrayvec::ArrayVec;

use crate::config::GameConfig;

/// Bounded list of active status effects.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffects {
    effects: ArrayVec<StatusEffect, { GameConfig::MAX_STATUS_EFFECTS }>,
}

/// A single status effect with expiration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusEffect {
    pub kind: StatusEffectKind,
    pub expires_at: u64,
}

/// Status effects the turn scheduler understands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatusEffectKind {
    /// Action timer does not advance.
    Stunned,

    /// Action timer advances at double rate.
    Hasted,
}

impl StatusEffects {
    /// Creates an empty status effect set.
    pub fn empty() -> Self {
        Self {
            effects: ArrayVec::new(),
        }
    }

    /// Checks if a specific status effect is active at `now`.
    pub fn has(&self, kind: StatusEffectKind, now: u64) -> bool {
        self.effects
            .iter()
            .any(|e| e.kind == kind && e.expires_at > now)
    }

    /// Adds a status effect with expiration time.
    ///
    /// If the effect already exists, extends to the later expiration time.
    /// Returns false if the list is full and the effect was dropped.
    pub fn add(&mut self, kind: StatusEffectKind, expires_at: u64) -> bool {
        if let Some(existing) = self.effects.iter_mut().find(|e| e.kind == kind) {
            existing.expires_at = existing.expires_at.max(expires_at);
            return true;
        }

        self.effects.try_push(StatusEffect { kind, expires_at }).is_ok()
    }

    /// Removes a status effect immediately.
    pub fn remove(&mut self, kind: StatusEffectKind) {
        self.effects.retain(|e| e.kind != kind);
    }

    /// Removes all effects expired at `now`.
    pub fn remove_expired(&mut self, now: u64) {
        self.effects.retain(|e| e.expires_at > now);
    }

    /// Timer rate in percent at `now` (0 when stunned, 200 when hasted).
    pub fn timer_rate_percent(&self, now: u64) -> u32 {
        if self.has(StatusEffectKind::Stunned, now) {
            0
        } else if self.has(StatusEffectKind::Hasted, now) {
            200
        } else {
            100
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &StatusEffect> {
        self.effects.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn re_adding_extends_expiration() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Stunned, 100);
        effects.add(StatusEffectKind::Stunned, 50);
        assert_eq!(effects.iter().count(), 1);
        assert!(effects.has(StatusEffectKind::Stunned, 99));
        assert!(!effects.has(StatusEffectKind::Stunned, 100));
    }

    #[test]
    fn stun_wins_over_haste() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Hasted, 500);
        assert_eq!(effects.timer_rate_percent(0), 200);
        effects.add(StatusEffectKind::Stunned, 100);
        assert_eq!(effects.timer_rate_percent(0), 0);
        assert_eq!(effects.timer_rate_percent(100), 200);
        assert_eq!(effects.timer_rate_percent(500), 100);
    }

    #[test]
    fn expired_effects_are_pruned() {
        let mut effects = StatusEffects::empty();
        effects.add(StatusEffectKind::Hasted, 10);
        effects.remove_expired(10);
        assert!(effects.is_empty());
    }
}
