use super::{ActorId, ActorState};
use crate::stage::EnemyTemplate;
use crate::stats::{Attributes, EnemyStatCalculator, StatError};

/// Enemy type tag; selects the base attribute table.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EnemyKind {
    Normal,
    Elite,
    Boss,
}

/// A spawned enemy.
///
/// Enemies are created pending (hp 0) by the stage orchestrator and become
/// alive once [`Enemy::bind`] derives their stats from the type tag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub actor: ActorState,
    pub template_id: String,
    pub pool: String,
    /// Raw type tag from the template; parsed when stats are bound.
    pub type_tag: String,
    pub exp_reward: u64,
}

impl Enemy {
    /// Instantiates a template with zero hp, pending stat binding.
    pub fn pending(id: ActorId, template: &EnemyTemplate, pool: &str) -> Self {
        Self {
            actor: ActorState::pending(id, template.level, Attributes::default()),
            template_id: template.id.clone(),
            pool: pool.to_owned(),
            type_tag: template.kind.clone(),
            exp_reward: template.exp_reward,
        }
    }

    pub fn id(&self) -> ActorId {
        self.actor.id
    }

    /// Derives attributes and stats from the type tag and level.
    ///
    /// Fails with [`StatError::InvalidActorType`] for unknown tags.
    pub fn bind(&mut self, calculator: &EnemyStatCalculator<'_>) -> Result<EnemyKind, StatError> {
        let block = calculator.calculate(&self.type_tag, self.actor.level)?;
        self.actor.attributes = block.attributes;
        self.actor.bind_stats(block.stats);
        Ok(block.kind)
    }
}

/// The enemies of the current stage, ordered by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyRoster {
    enemies: Vec<Enemy>,
}

impl EnemyRoster {
    pub fn new(mut enemies: Vec<Enemy>) -> Self {
        enemies.sort_by_key(Enemy::id);
        Self { enemies }
    }

    pub fn get(&self, id: ActorId) -> Option<&Enemy> {
        self.enemies.iter().find(|enemy| enemy.id() == id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|enemy| enemy.id() == id)
    }

    /// Living enemies in ascending id order.
    pub fn living(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter().filter(|enemy| enemy.actor.is_alive())
    }

    /// Lowest-id living enemy; the player's default target.
    pub fn first_living(&self) -> Option<&Enemy> {
        self.living().next()
    }

    pub fn living_count(&self) -> usize {
        self.living().count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Enemy> {
        self.enemies.iter()
    }

    pub fn len(&self) -> usize {
        self.enemies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enemies.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::Tables;

    fn template(kind: &str, level: u32) -> EnemyTemplate {
        EnemyTemplate {
            id: "test".into(),
            name: "Test".into(),
            kind: kind.into(),
            level,
            exp_reward: 5,
        }
    }

    #[test]
    fn binding_normal_enemy_uses_stated_constants() {
        let tables = Tables::builtin();
        let calc = EnemyStatCalculator::new(&tables);
        let mut enemy = Enemy::pending(ActorId(1), &template("normal", 1), "normal");
        assert_eq!(enemy.actor.vitals.hp(), 0);

        let kind = enemy.bind(&calc).unwrap();
        assert_eq!(kind, EnemyKind::Normal);
        assert_eq!(enemy.actor.vitals.hp(), 200);
        assert!(enemy.actor.is_alive());
    }

    #[test]
    fn unknown_tag_fails_binding() {
        let tables = Tables::builtin();
        let calc = EnemyStatCalculator::new(&tables);
        let mut enemy = Enemy::pending(ActorId(1), &template("miniboss", 1), "normal");
        assert!(matches!(
            enemy.bind(&calc),
            Err(StatError::InvalidActorType { .. })
        ));
        assert!(!enemy.actor.is_alive());
    }

    #[test]
    fn roster_orders_by_id_and_skips_dead() {
        let tables = Tables::builtin();
        let calc = EnemyStatCalculator::new(&tables);
        let mut enemies: Vec<Enemy> = [3, 1, 2]
            .into_iter()
            .map(|id| Enemy::pending(ActorId(id), &template("normal", 1), "normal"))
            .collect();
        for enemy in &mut enemies {
            enemy.bind(&calc).unwrap();
        }
        let mut roster = EnemyRoster::new(enemies);
        assert_eq!(roster.first_living().map(Enemy::id), Some(ActorId(1)));

        roster
            .get_mut(ActorId(1))
            .unwrap()
            .actor
            .vitals
            .apply_damage(u32::MAX);
        assert_eq!(roster.first_living().map(Enemy::id), Some(ActorId(2)));
        assert_eq!(roster.living_count(), 2);
        assert_eq!(roster.len(), 3);
    }
}
