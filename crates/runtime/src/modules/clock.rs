//! Clock module: accumulates tick time (`clock.*`).
//!
//! Registered last, so every other `Tick` handler sees the time at the
//! start of the tick.

use tracing::trace;

use crate::events::{Event, HandlerContext, HandlerResult, Topic};
use crate::kernel::{Module, ModuleContext, ModuleError};
use crate::store::{StateError, keys};

#[derive(Clone, Copy, Debug, Default)]
pub struct ClockModule;

impl ClockModule {
    pub const NAME: &'static str = "clock";
}

impl Module for ClockModule {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn init(&self, ctx: &mut ModuleContext<'_>) -> Result<(), ModuleError> {
        ctx.write(keys::CLOCK_NOW, 0u64);
        ctx.write(keys::CLOCK_TICKS, 0u64);
        ctx.subscribe(Topic::Tick, on_tick);
        Ok(())
    }
}

/// Current simulated time. Before the clock module has booted this is 0;
/// a `clock.now` of the wrong kind is still an error.
pub(crate) fn clock_now(ctx: &HandlerContext<'_>) -> Result<u64, StateError> {
    match ctx.read::<u64>(keys::CLOCK_NOW) {
        Ok(now) => Ok(*now),
        Err(StateError::MissingState { .. }) => Ok(0),
        Err(err) => Err(err),
    }
}

fn on_tick(event: &Event, ctx: &mut HandlerContext<'_>) -> HandlerResult {
    let Event::Tick { elapsed } = event else {
        return Ok(());
    };

    let now = ctx.read::<u64>(keys::CLOCK_NOW)?.saturating_add(*elapsed);
    let ticks = ctx.read::<u64>(keys::CLOCK_TICKS)?.saturating_add(1);
    ctx.write(keys::CLOCK_NOW, now);
    ctx.write(keys::CLOCK_TICKS, ticks);
    trace!(target: "runtime::clock", now, ticks);
    Ok(())
}
