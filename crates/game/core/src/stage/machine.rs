//! Stage progression state machine.
//!
//! ```text
//!            start / advance
//!                 ↓
//!  idle ── begin_combat ──→ combat ── last enemy died ──→ cleared ── advance ──┐
//!                              │                                              │
//!                              └──── player died ──→ failed (terminal)         │
//!  ↑──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition returns the signals the caller must publish, in order.
//! The machine never publishes anything itself, so it can be driven and
//! inspected without an event bus.

use super::StageError;
use super::config::{StageConfig, StageTable};
use crate::actor::ActorId;

/// Phase of the current stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StagePhase {
    #[default]
    Idle,
    Combat,
    Cleared,
    Failed,
}

/// Final result of a stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StageOutcome {
    Cleared { index: u32 },
    Failed { index: u32 },
}

/// Something the machine asks its driver to announce.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StageSignal {
    Entered { index: u32 },
    ConfigReady { index: u32, config: StageConfig, fallback: bool },
    SpawnRequested { index: u32, pool: String, count: u32 },
    Cleared { index: u32 },
    RewardTriggered { index: u32, exp: u64 },
    Failed { index: u32 },
}

/// Stage record: index, phase, resolved config and the enemies still standing.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StageMachine {
    index: u32,
    phase: StagePhase,
    last_result: Option<StageOutcome>,
    config: Option<StageConfig>,
    alive_count: u32,
    /// Enemies spawned for this stage that have not been counted dead yet.
    remaining: Vec<ActorId>,
    reward_exp: u64,
}

impl Default for StageMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl StageMachine {
    pub fn new() -> Self {
        Self {
            index: 1,
            phase: StagePhase::Idle,
            last_result: None,
            config: None,
            alive_count: 0,
            remaining: Vec::new(),
            reward_exp: 0,
        }
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn phase(&self) -> StagePhase {
        self.phase
    }

    pub fn last_result(&self) -> Option<StageOutcome> {
        self.last_result
    }

    pub fn config(&self) -> Option<&StageConfig> {
        self.config.as_ref()
    }

    pub fn alive_count(&self) -> u32 {
        self.alive_count
    }

    pub fn is_in_combat(&self) -> bool {
        self.phase == StagePhase::Combat
    }

    /// `game started`: back to stage 1, idle.
    pub fn start(&mut self) -> Vec<StageSignal> {
        *self = Self::new();
        vec![StageSignal::Entered { index: self.index }]
    }

    /// `stage entered`: resolve the configuration for the current index.
    pub fn enter(
        &mut self,
        index: u32,
        table: &StageTable,
    ) -> Result<Vec<StageSignal>, StageError> {
        if index != self.index {
            return Err(StageError::IndexMismatch {
                expected: self.index,
                received: index,
            });
        }
        if self.phase != StagePhase::Idle {
            return Err(StageError::InvalidTransition {
                phase: self.phase,
                action: "enter",
            });
        }

        let resolved = table.resolve(index);
        self.config = Some(resolved.config.clone());
        Ok(vec![StageSignal::ConfigReady {
            index,
            config: resolved.config,
            fallback: resolved.fallback,
        }])
    }

    /// `config ready`: request the spawn described by the resolved config.
    pub fn request_spawn(&self) -> Result<Vec<StageSignal>, StageError> {
        let config = self.config.as_ref().ok_or(StageError::InvalidTransition {
            phase: self.phase,
            action: "request_spawn",
        })?;

        Ok(vec![StageSignal::SpawnRequested {
            index: self.index,
            pool: config.pool.clone(),
            count: config.enemy_count,
        }])
    }

    /// Records the enemies instantiated for this stage.
    pub fn record_spawn(&mut self, enemies: Vec<ActorId>, reward_exp: u64) {
        self.alive_count = enemies.len() as u32;
        self.remaining = enemies;
        self.reward_exp = reward_exp;
    }

    /// `combat started`: idle → combat.
    pub fn begin_combat(&mut self) -> Result<(), StageError> {
        if self.phase != StagePhase::Idle {
            return Err(StageError::InvalidTransition {
                phase: self.phase,
                action: "begin_combat",
            });
        }
        self.phase = StagePhase::Combat;
        Ok(())
    }

    /// `actor died` for an enemy.
    ///
    /// Only enemies of this stage that were not already counted decrement the
    /// alive count, so duplicate or stray deaths can never clear twice.
    pub fn enemy_died(&mut self, id: ActorId) -> Vec<StageSignal> {
        if self.phase != StagePhase::Combat {
            return Vec::new();
        }
        let Some(position) = self.remaining.iter().position(|enemy| *enemy == id) else {
            return Vec::new();
        };
        self.remaining.swap_remove(position);
        self.alive_count = self.alive_count.saturating_sub(1);

        if self.alive_count > 0 {
            return Vec::new();
        }

        self.phase = StagePhase::Cleared;
        self.last_result = Some(StageOutcome::Cleared { index: self.index });
        vec![
            StageSignal::Cleared { index: self.index },
            StageSignal::RewardTriggered {
                index: self.index,
                exp: self.reward_exp,
            },
        ]
    }

    /// `actor died` for the player: combat → failed. Terminal for the run.
    pub fn player_died(&mut self) -> Vec<StageSignal> {
        if self.phase != StagePhase::Combat {
            return Vec::new();
        }
        self.phase = StagePhase::Failed;
        self.last_result = Some(StageOutcome::Failed { index: self.index });
        vec![StageSignal::Failed { index: self.index }]
    }

    /// `advance confirmed`: cleared → idle at the next index.
    pub fn advance(&mut self) -> Result<Vec<StageSignal>, StageError> {
        if self.phase != StagePhase::Cleared {
            return Err(StageError::InvalidTransition {
                phase: self.phase,
                action: "advance",
            });
        }

        self.index = self.index.saturating_add(1);
        self.phase = StagePhase::Idle;
        self.config = None;
        self.alive_count = 0;
        self.remaining.clear();
        self.reward_exp = 0;
        Ok(vec![StageSignal::Entered { index: self.index }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::StageKind;

    fn in_combat(enemies: &[u32]) -> StageMachine {
        let mut machine = StageMachine::new();
        machine.start();
        machine.enter(1, &StageTable::new()).unwrap();
        machine.record_spawn(enemies.iter().map(|id| ActorId(*id)).collect(), 30);
        machine.begin_combat().unwrap();
        machine
    }

    #[test]
    fn full_pipeline_from_start_to_spawn_request() {
        let table = StageTable::new().with_stage(1, StageConfig::new(StageKind::Elite, "elite", 2));
        let mut machine = StageMachine::new();

        assert_eq!(machine.start(), vec![StageSignal::Entered { index: 1 }]);

        let ready = machine.enter(1, &table).unwrap();
        assert!(matches!(
            &ready[..],
            [StageSignal::ConfigReady { index: 1, fallback: false, .. }]
        ));

        let spawn = machine.request_spawn().unwrap();
        assert_eq!(
            spawn,
            vec![StageSignal::SpawnRequested {
                index: 1,
                pool: "elite".into(),
                count: 2
            }]
        );
    }

    #[test]
    fn last_enemy_death_clears_once() {
        let mut machine = in_combat(&[1, 2]);

        assert!(machine.enemy_died(ActorId(1)).is_empty());
        assert!(machine.enemy_died(ActorId(1)).is_empty());
        assert_eq!(machine.alive_count(), 1);

        let signals = machine.enemy_died(ActorId(2));
        assert_eq!(
            signals,
            vec![
                StageSignal::Cleared { index: 1 },
                StageSignal::RewardTriggered { index: 1, exp: 30 }
            ]
        );
        assert_eq!(machine.phase(), StagePhase::Cleared);

        assert!(machine.enemy_died(ActorId(2)).is_empty());
        assert!(machine.enemy_died(ActorId(9)).is_empty());
        assert_eq!(machine.alive_count(), 0);
    }

    #[test]
    fn player_death_fails_and_blocks_advance() {
        let mut machine = in_combat(&[1]);
        assert_eq!(machine.player_died(), vec![StageSignal::Failed { index: 1 }]);
        assert_eq!(machine.phase(), StagePhase::Failed);
        assert_eq!(machine.last_result(), Some(StageOutcome::Failed { index: 1 }));

        assert!(machine.enemy_died(ActorId(1)).is_empty());
        assert!(machine.player_died().is_empty());
        assert!(matches!(
            machine.advance(),
            Err(StageError::InvalidTransition { phase: StagePhase::Failed, .. })
        ));
    }

    #[test]
    fn advance_moves_to_next_index() {
        let mut machine = in_combat(&[1]);
        machine.enemy_died(ActorId(1));

        assert_eq!(machine.advance().unwrap(), vec![StageSignal::Entered { index: 2 }]);
        assert_eq!(machine.index(), 2);
        assert_eq!(machine.phase(), StagePhase::Idle);
        assert_eq!(machine.last_result(), Some(StageOutcome::Cleared { index: 1 }));
        assert!(machine.config().is_none());
    }

    #[test]
    fn enter_rejects_stale_index() {
        let mut machine = StageMachine::new();
        assert!(matches!(
            machine.enter(4, &StageTable::new()),
            Err(StageError::IndexMismatch { expected: 1, received: 4 })
        ));
    }
}
