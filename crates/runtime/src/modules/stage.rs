//! Stage module: drives [`StageMachine`] from events and spawns enemies (`stage.*`).
//!
//! ```text
//! GameStarted → StageEntered → ConfigReady → EnemySpawnRequested → EnemiesSpawned
//!                    ↑                                                   │ (actor binds stats)
//!            AdvanceConfirmed                                      CombatStarted
//!                    │                                                   │
//!              StageCleared + RewardTriggered ←── last enemy ActorDied ──┤
//!                                StageFailed ←── player ActorDied ───────┘
//! ```

use arena_core::{ActorId, Enemy, StageMachine, StageSignal};
use tracing::{debug, info};

use crate::events::{Event, HandlerContext, HandlerResult, Topic};
use crate::kernel::{Module, ModuleContext, ModuleError};
use crate::store::keys;

#[derive(Clone, Copy, Debug, Default)]
pub struct StageModule;

impl StageModule {
    pub const NAME: &'static str = "stage";
}

impl Module for StageModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        ctx.write(keys::STAGE_MACHINE, StageMachine::new());
        ctx.write(keys::STAGE_NEXT_ENEMY_ID, ActorId::FIRST_ENEMY);

        ctx.subscribe(Topic::GameStarted, on_game_started);
        ctx.subscribe(Topic::StageEntered, on_stage_entered);
        ctx.subscribe(Topic::ConfigReady, on_config_ready);
        ctx.subscribe(Topic::EnemySpawnRequested, on_spawn_requested);
        ctx.subscribe(Topic::CombatStarted, on_combat_started);
        ctx.subscribe(Topic::ActorDied, on_actor_died);
        ctx.subscribe(Topic::AdvanceConfirmed, on_advance_confirmed);
        Ok(())
    }
}

fn machine(ctx: &HandlerContext<'_>) -> Result<StageMachine, crate::store::StateError> {
    ctx.read::<StageMachine>(keys::STAGE_MACHINE).cloned()
}

/// Writes the machine back, then announces its signals in order.
fn commit(ctx: &mut HandlerContext<'_>, machine: StageMachine, signals: Vec<StageSignal>) {
    ctx.write(keys::STAGE_MACHINE, machine);
    for signal in signals {
        ctx.emit(signal.into());
    }
}

fn on_game_started(_: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let mut machine = machine(ctx)?;
    let signals = machine.start();
    info!(target: "runtime::stage", "game started");
    commit(ctx, machine, signals);
    Ok(())
}

fn on_stage_entered(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::StageEntered { index } = event else {
        return Ok(());
    };

    let mut machine = machine(ctx)?;
    let signals = machine.enter(*index, &ctx.tables().stages)?;
    if let [StageSignal::ConfigReady { fallback: true, .. }] = signals.as_slice() {
        debug!(target: "runtime::stage", stage = index, "stage unconfigured, using default");
    }
    info!(target: "runtime::stage", stage = index, "stage entered");
    commit(ctx, machine, signals);
    Ok(())
}

fn on_config_ready(_: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let machine = machine(ctx)?;
    let signals = machine.request_spawn()?;
    commit(ctx, machine, signals);
    Ok(())
}

fn on_spawn_requested(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::EnemySpawnRequested { index, pool, count } = event else {
        return Ok(());
    };

    let tables = ctx.tables();
    let first_id = *ctx.read::<ActorId>(keys::STAGE_NEXT_ENEMY_ID)?;
    let draw = tables.pools.draw(
        pool,
        *count,
        &tables.templates,
        ctx.rng(),
        ctx.seed(),
        u64::from(first_id.0),
    )?;
    if draw.fallback {
        debug!(
            target: "runtime::stage",
            requested = %pool,
            pool = draw.pool,
            "unknown pool, using fallback"
        );
    }

    let mut next_id = first_id;
    let mut enemies = Vec::with_capacity(draw.templates.len());
    for template in &draw.templates {
        enemies.push(Enemy::pending(next_id, template, draw.pool));
        next_id = next_id.next();
    }
    let reward: u64 = enemies.iter().map(|enemy| enemy.exp_reward).sum();

    let mut machine = machine(ctx)?;
    machine.record_spawn(enemies.iter().map(Enemy::id).collect(), reward);
    info!(
        target: "runtime::stage",
        stage = index,
        pool = draw.pool,
        count = enemies.len(),
        reward,
        "enemies spawned"
    );

    ctx.write(keys::STAGE_NEXT_ENEMY_ID, next_id);
    commit(ctx, machine, Vec::new());
    ctx.emit(Event::EnemiesSpawned {
        index: *index,
        enemies,
    });
    Ok(())
}

fn on_combat_started(_: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let mut machine = machine(ctx)?;
    machine.begin_combat()?;
    commit(ctx, machine, Vec::new());
    Ok(())
}

fn on_actor_died(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::ActorDied { actor } = event else {
        return Ok(());
    };

    let mut machine = machine(ctx)?;
    let signals = if actor.is_player() {
        machine.player_died()
    } else {
        machine.enemy_died(*actor)
    };

    for signal in &signals {
        match signal {
            StageSignal::Cleared { index } => {
                info!(target: "runtime::stage", stage = index, "stage cleared");
            }
            StageSignal::Failed { index } => {
                info!(target: "runtime::stage", stage = index, "stage failed");
            }
            _ => {}
        }
    }
    commit(ctx, machine, signals);
    Ok(())
}

fn on_advance_confirmed(_: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let mut machine = machine(ctx)?;
    let signals = machine.advance()?;
    commit(ctx, machine, signals);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::Kernel;
    use arena_core::{EnemyRoster, StagePhase, Tables};

    fn booted(tables: Tables) -> Kernel {
        let mut kernel = Kernel::builder()
            .seed(3)
            .tables(tables)
            .with_default_modules()
            .build()
            .unwrap();
        kernel.boot().unwrap();
        kernel
    }

    fn machine(kernel: &Kernel) -> &StageMachine {
        kernel
            .store()
            .read::<StageMachine>(keys::STAGE_MACHINE)
            .unwrap()
    }

    #[test]
    fn boot_reaches_combat_on_stage_one() {
        let kernel = booted(Tables::builtin());
        let machine = machine(&kernel);
        assert_eq!(machine.index(), 1);
        assert_eq!(machine.phase(), StagePhase::Combat);
        assert_eq!(machine.alive_count(), 1);
    }

    #[test]
    fn boot_event_order_follows_the_pipeline() {
        let mut kernel = Kernel::builder()
            .seed(3)
            .with_default_modules()
            .build()
            .unwrap();
        let report = kernel.boot().unwrap();
        assert_eq!(
            report.delivered,
            vec![
                Topic::EngineBooted,
                Topic::GameStarted,
                Topic::StageEntered,
                Topic::ConfigReady,
                Topic::EnemySpawnRequested,
                Topic::EnemiesSpawned,
                Topic::StatChanged,
                Topic::CombatStarted,
            ]
        );
        assert!(report.is_clean());
    }

    #[test]
    fn unconfigured_stage_uses_the_default() {
        let mut tables = Tables::builtin();
        tables.stages = arena_core::StageTable::new();
        let kernel = booted(tables);

        let machine = machine(&kernel);
        assert_eq!(machine.config(), Some(&arena_core::StageConfig::default()));
        assert_eq!(machine.phase(), StagePhase::Combat);
    }

    #[test]
    fn unknown_pool_falls_back_to_normal() {
        let mut tables = Tables::builtin();
        tables.stages = arena_core::StageTable::new().with_stage(
            1,
            arena_core::StageConfig::new(arena_core::StageKind::Elite, "volcano", 2),
        );
        let kernel = booted(tables);

        let roster = kernel
            .store()
            .read::<EnemyRoster>(keys::ACTOR_ENEMIES)
            .unwrap();
        assert_eq!(roster.len(), 2);
        assert!(roster.iter().all(|enemy| enemy.pool == "normal"));
    }

    #[test]
    fn advance_before_clear_is_rejected() {
        let mut kernel = booted(Tables::builtin());
        let report = kernel.publish(Event::AdvanceConfirmed);

        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].code, "INVALID_TRANSITION");
        assert_eq!(machine(&kernel).index(), 1);
    }

    #[test]
    fn enemy_ids_keep_increasing_across_stages() {
        let mut kernel = booted(Tables::builtin());
        // clear stage 1 by hand
        let report = kernel.publish(Event::DamageResolved {
            source: ActorId::PLAYER,
            target: ActorId::FIRST_ENEMY,
            amount: 10_000,
            critical: false,
        });
        assert_eq!(report.count(Topic::StageCleared), 1);

        kernel.publish(Event::AdvanceConfirmed);
        let roster = kernel
            .store()
            .read::<EnemyRoster>(keys::ACTOR_ENEMIES)
            .unwrap();
        let ids: Vec<ActorId> = roster.iter().map(Enemy::id).collect();
        assert_eq!(ids, [ActorId(2), ActorId(3)]);
        assert_eq!(machine(&kernel).index(), 2);
    }
}
