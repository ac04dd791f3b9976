use super::{ActorId, ActorState, DamageApplied};
use crate::config::GameConfig;
use crate::stats::{Attribute, Attributes, PlayerStatCalculator, StatBonuses, StatError};

/// The player character.
///
/// Besides the shared [`ActorState`] the player tracks progression
/// (experience, level threshold, unspent points) and the accumulated
/// equipment bonuses reported by the equipment collaborator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Player {
    pub actor: ActorState,
    pub exp: u64,
    pub exp_to_next: u64,
    pub unspent_points: u32,
    pub equipment: StatBonuses,
}

impl Player {
    /// Creates a level 1 player at full health.
    pub fn new(attributes: Attributes, calculator: &PlayerStatCalculator<'_>) -> Self {
        let mut player = Self {
            actor: ActorState::pending(ActorId::PLAYER, 1, attributes),
            exp: 0,
            exp_to_next: calculator.config().base_exp_to_next,
            unspent_points: 0,
            equipment: StatBonuses::new(),
        };
        player.recompute(calculator);
        player
    }

    pub fn id(&self) -> ActorId {
        self.actor.id
    }

    pub fn level(&self) -> u32 {
        self.actor.level
    }

    /// Recomputes the full derived stats from attributes and equipment.
    ///
    /// A new HP maximum of zero kills a living player; the outcome says so.
    pub fn recompute(&mut self, calculator: &PlayerStatCalculator<'_>) -> DamageApplied {
        let stats = calculator.calculate(&self.actor.attributes, &self.equipment);
        self.actor.bind_stats(stats)
    }

    /// Spends unspent points on one attribute.
    pub fn allocate(&mut self, attribute: Attribute, points: u32) -> Result<(), StatError> {
        if points > self.unspent_points {
            return Err(StatError::NotEnoughPoints {
                requested: points,
                available: self.unspent_points,
            });
        }
        self.unspent_points -= points;
        self.actor.attributes.add(attribute, points);
        Ok(())
    }

    /// Adds experience and applies any level-ups. Returns levels gained.
    ///
    /// Each level-up grants `points_per_level` unspent points and grows the
    /// threshold by `exp_growth_percent`, rounding up. Leftover experience
    /// carries over. Stats are not recomputed here; call [`Self::recompute`].
    pub fn gain_exp(&mut self, amount: u64, config: &GameConfig) -> u32 {
        self.exp = self.exp.saturating_add(amount);
        let mut levels = 0;
        while self.exp_to_next > 0 && self.exp >= self.exp_to_next {
            self.exp -= self.exp_to_next;
            self.actor.level = self.actor.level.saturating_add(1);
            self.unspent_points = self.unspent_points.saturating_add(config.points_per_level);
            self.exp_to_next = self
                .exp_to_next
                .saturating_mul(config.exp_growth_percent)
                .div_ceil(100);
            levels += 1;
        }
        levels
    }
}
