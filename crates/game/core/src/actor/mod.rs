//! Combat actors: the player, enemies, and the runtime block they share.
//!
//! Every actor carries attributes, a full [`DerivedStats`] snapshot and a
//! [`Vitals`] block. Hit points are only reachable through [`Vitals`]
//! methods, which keep `alive == (hp > 0)` after every mutation.

mod enemy;
mod player;
mod status;
mod vitals;

pub use enemy::{Enemy, EnemyKind, EnemyRoster};
pub use player::Player;
pub use status::{StatusEffect, StatusEffectKind, StatusEffects};
pub use vitals::{DamageApplied, Vitals};

use core::fmt;

use crate::stats::{Attributes, DerivedStats};

/// Stable identifier for an actor.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorId(pub u32);

impl ActorId {
    /// Reserved identifier for the player.
    pub const PLAYER: Self = Self(0);

    /// First identifier handed out to spawned enemies.
    pub const FIRST_ENEMY: Self = Self(1);

    /// Returns true if this id is the player's.
    #[inline]
    pub const fn is_player(self) -> bool {
        self.0 == Self::PLAYER.0
    }

    /// Returns the id following this one.
    #[inline]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Shared part of every actor.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActorState {
    pub id: ActorId,
    pub level: u32,
    pub attributes: Attributes,
    pub stats: DerivedStats,
    pub vitals: Vitals,
}

impl ActorState {
    /// Creates an actor whose stats are not bound yet (hp 0, not alive).
    pub fn pending(id: ActorId, level: u32, attributes: Attributes) -> Self {
        Self {
            id,
            level: level.max(1),
            attributes,
            stats: DerivedStats::ZERO,
            vitals: Vitals::pending(),
        }
    }

    /// Replaces the derived stats and re-syncs the hit point maximum.
    pub fn bind_stats(&mut self, stats: DerivedStats) -> DamageApplied {
        self.stats = stats;
        self.vitals.rebind(stats.hp)
    }

    pub fn is_alive(&self) -> bool {
        self.vitals.is_alive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_actor_is_not_alive_until_bound() {
        let mut actor = ActorState::pending(ActorId(3), 0, Attributes::new(1, 1, 1, 1, 1));
        assert_eq!(actor.level, 1);
        assert!(!actor.is_alive());
        assert_eq!(actor.vitals.hp(), 0);

        actor.bind_stats(DerivedStats {
            hp: 50,
            ..DerivedStats::ZERO
        });
        assert!(actor.is_alive());
        assert_eq!(actor.vitals.hp(), 50);
    }

    #[test]
    fn ids_order_player_first() {
        assert!(ActorId::PLAYER < ActorId::FIRST_ENEMY);
        assert_eq!(ActorId::FIRST_ENEMY.next(), ActorId(2));
        assert_eq!(ActorId(7).to_string(), "#7");
    }
}
