//! State keys and their owners.
//!
//! Keys are dot-namespaced; the namespace names the only module that writes
//! them. Any module may read any key.
//!
//! | namespace  | owner            |
//! |------------|------------------|
//! | `kernel.*` | kernel           |
//! | `actor.*`  | actor module     |
//! | `combat.*` | combat module    |
//! | `stage.*`  | stage module     |
//! | `clock.*`  | clock module     |

pub const KERNEL_SEED: &str = "kernel.seed";
pub const KERNEL_MODULES: &str = "kernel.modules";
pub const KERNEL_BOOTED: &str = "kernel.booted";

/// [`arena_core::Player`] record.
pub const ACTOR_PLAYER: &str = "actor.player";
/// [`arena_core::EnemyRoster`] of the current stage.
pub const ACTOR_ENEMIES: &str = "actor.enemies";

pub const COMBAT_TIMERS: &str = "combat.timers";
/// Pending multiplier for the player's next attack.
pub const COMBAT_SKILL: &str = "combat.skill_multiplier";
/// Monotonic counter feeding crit roll seeds.
pub const COMBAT_ROLL_NONCE: &str = "combat.roll_nonce";

pub const STAGE_MACHINE: &str = "stage.machine";
/// Id handed to the next spawned enemy.
pub const STAGE_NEXT_ENEMY_ID: &str = "stage.next_enemy_id";

/// Accumulated tick time.
pub const CLOCK_NOW: &str = "clock.now";
pub const CLOCK_TICKS: &str = "clock.ticks";

const OWNERS: [&str; 5] = ["kernel", "actor", "combat", "stage", "clock"];

/// Namespace part of a key (`"stage"` for `"stage.machine"`).
pub fn namespace(key: &str) -> &str {
    key.split_once('.').map_or(key, |(namespace, _)| namespace)
}

/// Owner of a key, or `None` for keys outside the ownership map.
pub fn owner(key: &str) -> Option<&'static str> {
    let namespace = namespace(key);
    OWNERS.iter().copied().find(|owner| *owner == namespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_catalog_key_has_an_owner() {
        for key in [
            KERNEL_SEED,
            KERNEL_MODULES,
            KERNEL_BOOTED,
            ACTOR_PLAYER,
            ACTOR_ENEMIES,
            COMBAT_TIMERS,
            COMBAT_SKILL,
            COMBAT_ROLL_NONCE,
            STAGE_MACHINE,
            STAGE_NEXT_ENEMY_ID,
            CLOCK_NOW,
            CLOCK_TICKS,
        ] {
            assert_eq!(owner(key), Some(namespace(key)), "{key}");
        }
    }

    #[test]
    fn unknown_namespaces_have_no_owner() {
        assert_eq!(owner("ui.panel"), None);
        assert_eq!(owner("stage"), Some("stage"));
        assert_eq!(namespace("plain"), "plain");
    }
}
