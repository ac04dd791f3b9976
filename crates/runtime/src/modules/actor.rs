//! Actor module: owns the player record and the enemy roster (`actor.*`).
//!
//! It is the only writer of hit points. Damage, stat binding, experience and
//! every inbound player change land here and are re-announced as
//! `ActorUpdated` / `StatChanged` / `ActorDied`.

use arena_core::{
    ActorId, ActorState, EnemyRoster, EnemyStatCalculator, Player, PlayerStatCalculator,
};
use tracing::{debug, info, warn};

use crate::events::{Event, HandlerContext, HandlerError, HandlerResult, Topic};
use crate::kernel::{Module, ModuleContext, ModuleError};
use crate::modules::clock::clock_now;
use crate::store::keys;

#[derive(Clone, Copy, Debug, Default)]
pub struct ActorModule;

impl ActorModule {
    pub const NAME: &'static str = "actor";
}

impl Module for ActorModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        let tables = ctx.tables();
        let attributes = ctx
            .config()
            .player_attributes
            .unwrap_or(tables.player_attributes);
        let player = Player::new(attributes, &PlayerStatCalculator::new(tables));
        debug!(
            target: "runtime::actor",
            hp = player.actor.vitals.hp(),
            atk = player.actor.stats.atk,
            aspd = player.actor.stats.aspd,
            "player created"
        );

        ctx.write(keys::ACTOR_PLAYER, player);
        ctx.write(keys::ACTOR_ENEMIES, EnemyRoster::default());

        ctx.subscribe(Topic::StageEntered, on_stage_entered);
        ctx.subscribe(Topic::EnemiesSpawned, on_enemies_spawned);
        ctx.subscribe(Topic::DamageResolved, on_damage_resolved);
        ctx.subscribe(Topic::RewardTriggered, on_experience);
        ctx.subscribe(Topic::ExperienceGained, on_experience);
        ctx.subscribe(Topic::AttributePointsAllocated, on_player_changed);
        ctx.subscribe(Topic::AttributesChanged, on_player_changed);
        ctx.subscribe(Topic::EquipmentBonusChanged, on_player_changed);
        ctx.subscribe(Topic::StatusApplied, on_status_applied);
        Ok(())
    }
}

fn actor_updated(actor: &ActorState) -> Event {
    Event::ActorUpdated {
        actor: actor.id,
        hp: actor.vitals.hp(),
        max_hp: actor.vitals.max_hp(),
        alive: actor.is_alive(),
    }
}

/// Read-modify-write of one actor's shared block, player or enemy.
fn update_actor<R>(
    ctx: &mut HandlerContext<'_>,
    id: ActorId,
    f: impl FnOnce(&mut ActorState) -> R,
) -> Result<R, HandlerError> {
    if id.is_player() {
        let mut player = ctx.read::<Player>(keys::ACTOR_PLAYER)?.clone();
        let result = f(&mut player.actor);
        ctx.write(keys::ACTOR_PLAYER, player);
        Ok(result)
    } else {
        let mut roster = ctx.read::<EnemyRoster>(keys::ACTOR_ENEMIES)?.clone();
        let enemy = roster
            .get_mut(id)
            .ok_or(HandlerError::UnknownActor { actor: id })?;
        let result = f(&mut enemy.actor);
        ctx.write(keys::ACTOR_ENEMIES, roster);
        Ok(result)
    }
}

fn on_stage_entered(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::StageEntered { index } = event else {
        return Ok(());
    };

    ctx.write(keys::ACTOR_ENEMIES, EnemyRoster::default());

    let mut player = ctx.read::<Player>(keys::ACTOR_PLAYER)?.clone();
    let vitals = &mut player.actor.vitals;
    if vitals.hp() < vitals.max_hp() && vitals.restore_full() {
        debug!(target: "runtime::actor", stage = index, hp = vitals.hp(), "player restored");
        let update = actor_updated(&player.actor);
        ctx.write(keys::ACTOR_PLAYER, player);
        ctx.emit(update);
    }
    Ok(())
}

fn on_enemies_spawned(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::EnemiesSpawned { index, enemies } = event else {
        return Ok(());
    };

    let calculator = EnemyStatCalculator::new(ctx.tables());
    let mut bound = Vec::with_capacity(enemies.len());
    for enemy in enemies {
        let mut enemy = enemy.clone();
        let kind = enemy.bind(&calculator)?;
        debug!(
            target: "runtime::actor",
            enemy = %enemy.id(),
            template = %enemy.template_id,
            %kind,
            level = enemy.actor.level,
            hp = enemy.actor.vitals.hp(),
            atk = enemy.actor.stats.atk,
            "enemy bound"
        );
        bound.push(enemy);
    }

    let roster = EnemyRoster::new(bound);
    let announcements: Vec<Event> = roster
        .iter()
        .map(|enemy| Event::StatChanged {
            actor: enemy.id(),
            stats: enemy.actor.stats,
        })
        .collect();
    ctx.write(keys::ACTOR_ENEMIES, roster);

    for announcement in announcements {
        ctx.emit(announcement);
    }
    ctx.emit(Event::CombatStarted { index: *index });
    Ok(())
}

fn on_damage_resolved(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::DamageResolved {
        target, amount, ..
    } = event
    else {
        return Ok(());
    };

    let outcome = update_actor(ctx, *target, |actor| {
        if !actor.is_alive() {
            return None;
        }
        let applied = actor.vitals.apply_damage(*amount);
        Some((applied, actor_updated(actor)))
    })?;

    let Some((applied, update)) = outcome else {
        debug!(target: "runtime::actor", actor = %target, "damage to a downed actor ignored");
        return Ok(());
    };

    ctx.emit(update);
    if applied.died {
        info!(target: "runtime::actor", actor = %target, "actor died");
        ctx.emit(Event::ActorDied { actor: *target });
    }
    Ok(())
}

fn on_experience(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let amount = match event {
        Event::RewardTriggered { exp, .. } => *exp,
        Event::ExperienceGained { amount } => *amount,
        _ => return Ok(()),
    };
    if amount == 0 {
        return Ok(());
    }

    let tables = ctx.tables();
    let mut player = ctx.read::<Player>(keys::ACTOR_PLAYER)?.clone();
    let levels = player.gain_exp(amount, &tables.config);

    let mut follow_ups = Vec::new();
    if levels > 0 {
        player.recompute(&PlayerStatCalculator::new(tables));
        info!(
            target: "runtime::actor",
            level = player.level(),
            unspent = player.unspent_points,
            "player levelled up"
        );
        follow_ups.push(Event::LevelUp {
            level: player.level(),
            unspent_points: player.unspent_points,
        });
        follow_ups.push(Event::StatChanged {
            actor: player.id(),
            stats: player.actor.stats,
        });
    }

    ctx.write(keys::ACTOR_PLAYER, player);
    for event in follow_ups {
        ctx.emit(event);
    }
    Ok(())
}

fn on_player_changed(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let mut player = ctx.read::<Player>(keys::ACTOR_PLAYER)?.clone();
    match event {
        Event::AttributePointsAllocated { attribute, points } => {
            player.allocate(*attribute, *points)?;
        }
        Event::AttributesChanged { attributes } => player.actor.attributes = *attributes,
        Event::EquipmentBonusChanged { delta } => player.equipment.merge(delta),
        _ => return Ok(()),
    }

    let vitals_before = (player.actor.vitals.hp(), player.actor.vitals.max_hp());
    let rebound = player.recompute(&PlayerStatCalculator::new(ctx.tables()));
    let vitals_after = (player.actor.vitals.hp(), player.actor.vitals.max_hp());

    let stats = player.actor.stats;
    let update = actor_updated(&player.actor);
    ctx.write(keys::ACTOR_PLAYER, player);

    ctx.emit(Event::StatChanged {
        actor: ActorId::PLAYER,
        stats,
    });
    if vitals_before != vitals_after {
        ctx.emit(update);
    }
    if rebound.died {
        info!(
            target: "runtime::actor",
            actor = %ActorId::PLAYER,
            "player died from a stat change"
        );
        ctx.emit(Event::ActorDied {
            actor: ActorId::PLAYER,
        });
    }
    Ok(())
}

fn on_status_applied(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::StatusApplied {
        target,
        kind,
        duration,
    } = event
    else {
        return Ok(());
    };

    let now = clock_now(ctx)?;
    let added = update_actor(ctx, *target, |actor| {
        let statuses = &mut actor.vitals.statuses;
        statuses.remove_expired(now);
        statuses.add(*kind, now.saturating_add(*duration))
    })?;

    if added {
        debug!(
            target: "runtime::actor",
            actor = %target,
            %kind,
            until = now.saturating_add(*duration),
            "status applied"
        );
    } else {
        warn!(target: "runtime::actor", actor = %target, %kind, "status list full, effect dropped");
    }
    Ok(())
}
