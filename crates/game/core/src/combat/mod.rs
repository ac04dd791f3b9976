//! Combat resolution system.
//!
//! Pure functions and value types for the tick-driven turn scheduler:
//!
//! - `ActionTimers::advance`: accumulate tick time, report who may attack
//! - `resolve_damage`: `max(ATK − DEF, 1)` × skill multiplier, then crit
//! - `select_target`: the opposing actor an attack intent names
//!
//! Nothing here touches shared state or randomness directly; callers pass in
//! the crit roll from an [`crate::rng::RngOracle`].

pub mod damage;
pub mod timer;

pub use damage::{
    DamageRoll, SkillMultiplier, apply_critical, base_damage, is_critical, resolve_damage,
};
pub use timer::{ActionTimers, TimerEntry};

use crate::actor::{ActorId, EnemyRoster};

/// Opposing actor for an attack by `source`.
///
/// The player targets the lowest-id living enemy; enemies target the player
/// while the player is alive.
pub fn select_target(
    source: ActorId,
    player_alive: bool,
    enemies: &EnemyRoster,
) -> Option<ActorId> {
    if source.is_player() {
        enemies.first_living().map(|enemy| enemy.id())
    } else if player_alive {
        Some(ActorId::PLAYER)
    } else {
        None
    }
}
