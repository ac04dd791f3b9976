//! Combat module: tick-driven action timers and damage resolution (`combat.*`).
//!
//! Within one tick the player's timer advances first, then enemies in
//! ascending id order; intents are emitted in that order. Each intent is
//! fully resolved (damage, death, stage judgment) before the next one is
//! dispatched, and an intent whose source or target went down in between
//! is skipped.

use arena_core::{
    ActionTimers, ActorId, ActorState, DerivedStats, EnemyRoster, Player, RollContext,
    SkillMultiplier, StageMachine, StageOutcome, TimerEntry, combat::select_target,
    compute_seed, resolve_damage,
};
use tracing::{debug, trace};

use crate::events::{Event, HandlerContext, HandlerError, HandlerResult, Topic};
use crate::kernel::{Module, ModuleContext, ModuleError};
use crate::modules::clock::clock_now;
use crate::store::keys;

#[derive(Clone, Copy, Debug, Default)]
pub struct CombatModule;

impl CombatModule {
    pub const NAME: &'static str = "combat";
}

impl Module for CombatModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        ctx.write(keys::COMBAT_TIMERS, ActionTimers::new());
        ctx.write(keys::COMBAT_SKILL, SkillMultiplier::NONE);
        ctx.write(keys::COMBAT_ROLL_NONCE, 0u64);

        ctx.subscribe(Topic::CombatStarted, on_combat_started);
        ctx.subscribe(Topic::Tick, on_tick);
        ctx.subscribe(Topic::AttackIntent, on_attack_intent);
        ctx.subscribe(Topic::SkillMultiplierSet, on_skill_multiplier_set);
        ctx.subscribe(Topic::StageCleared, on_stage_resolved);
        ctx.subscribe(Topic::StageFailed, on_stage_resolved);
        Ok(())
    }
}

fn in_combat(ctx: &HandlerContext<'_>) -> Result<bool, HandlerError> {
    Ok(ctx.read::<StageMachine>(keys::STAGE_MACHINE)?.is_in_combat())
}

fn timer_entry(actor: &ActorState, now: u64) -> TimerEntry {
    TimerEntry::new(actor.id, actor.stats.aspd)
        .with_rate(actor.vitals.statuses.timer_rate_percent(now))
}

/// Stats of `id` if it is alive.
fn living_stats(
    ctx: &HandlerContext<'_>,
    id: ActorId,
) -> Result<Option<DerivedStats>, HandlerError> {
    let actor = if id.is_player() {
        &ctx.read::<Player>(keys::ACTOR_PLAYER)?.actor
    } else {
        &ctx
            .read::<EnemyRoster>(keys::ACTOR_ENEMIES)?
            .get(id)
            .ok_or(HandlerError::UnknownActor { actor: id })?
            .actor
    };
    Ok(actor.is_alive().then_some(actor.stats))
}

/// Takes the pending skill multiplier, leaving `NONE` behind.
fn take_skill_multiplier(ctx: &mut HandlerContext<'_>) -> Result<SkillMultiplier, HandlerError> {
    let skill = *ctx.read::<SkillMultiplier>(keys::COMBAT_SKILL)?;
    if skill != SkillMultiplier::NONE {
        ctx.write(keys::COMBAT_SKILL, SkillMultiplier::NONE);
    }
    Ok(skill)
}

fn on_combat_started(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::CombatStarted { index } = event else {
        return Ok(());
    };
    ctx.write(keys::COMBAT_TIMERS, ActionTimers::new());
    debug!(target: "runtime::combat", stage = index, "timers reset");
    Ok(())
}

fn on_tick(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::Tick { elapsed } = event else {
        return Ok(());
    };
    if !in_combat(ctx)? {
        return Ok(());
    }

    let now = clock_now(ctx)?;
    let player = &ctx.read::<Player>(keys::ACTOR_PLAYER)?.actor;
    let enemies = ctx.read::<EnemyRoster>(keys::ACTOR_ENEMIES)?;

    let entries: Vec<TimerEntry> = player
        .is_alive()
        .then(|| timer_entry(player, now))
        .into_iter()
        .chain(enemies.living().map(|enemy| timer_entry(&enemy.actor, now)))
        .collect();

    let mut timers = ctx.read::<ActionTimers>(keys::COMBAT_TIMERS)?.clone();
    let ready = timers.advance(&entries, *elapsed);
    let intents: Vec<(ActorId, ActorId)> = ready
        .into_iter()
        .filter_map(|source| {
            select_target(source, player.is_alive(), enemies).map(|target| (source, target))
        })
        .collect();
    ctx.write(keys::COMBAT_TIMERS, timers);

    for (source, target) in intents {
        let skill = if source.is_player() {
            take_skill_multiplier(ctx)?
        } else {
            SkillMultiplier::NONE
        };
        trace!(target: "runtime::combat", %source, %target, skill = skill.0, now, "attack intent");
        ctx.emit(Event::AttackIntent {
            source,
            target,
            skill,
        });
    }
    Ok(())
}

fn on_attack_intent(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::AttackIntent {
        source,
        target,
        skill,
    } = event
    else {
        return Ok(());
    };
    if !in_combat(ctx)? {
        debug!(target: "runtime::combat", %source, "intent outside combat skipped");
        return Ok(());
    }

    let (Some(attacker), Some(defender)) =
        (living_stats(ctx, *source)?, living_stats(ctx, *target)?)
    else {
        debug!(target: "runtime::combat", %source, %target, "intent with a downed actor skipped");
        return Ok(());
    };

    let nonce = *ctx.read::<u64>(keys::COMBAT_ROLL_NONCE)?;
    let roll = ctx
        .rng()
        .roll_percent(compute_seed(ctx.seed(), nonce, source.0, RollContext::Critical));
    ctx.write(keys::COMBAT_ROLL_NONCE, nonce.wrapping_add(1));

    let damage = resolve_damage(&attacker, &defender, *skill, roll);
    debug!(
        target: "runtime::combat",
        %source,
        %target,
        amount = damage.amount,
        critical = damage.critical,
        "damage resolved"
    );

    ctx.emit(Event::DamageResolved {
        source: *source,
        target: *target,
        amount: damage.amount,
        critical: damage.critical,
    });
    Ok(())
}

fn on_skill_multiplier_set(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::SkillMultiplierSet { multiplier } = event else {
        return Ok(());
    };
    ctx.write(keys::COMBAT_SKILL, *multiplier);
    Ok(())
}

fn on_stage_resolved(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let outcome = match event {
        Event::StageCleared { index } => StageOutcome::Cleared { index: *index },
        Event::StageFailed { index } => StageOutcome::Failed { index: *index },
        _ => return Ok(()),
    };

    ctx.write(keys::COMBAT_TIMERS, ActionTimers::new());
    debug!(target: "runtime::combat", ?outcome, "combat ended");
    ctx.emit(Event::CombatEnded { outcome });
    Ok(())
}
