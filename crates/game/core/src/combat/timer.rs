//! Per-actor action timers driven by tick time.

use std::collections::BTreeMap;

use crate::actor::ActorId;

/// One actor's entry for a timer advance.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEntry {
    pub actor: ActorId,
    /// Attack interval (DerivedStats::aspd).
    pub interval: u32,
    /// Accrual rate in percent (100 normal, 0 frozen).
    pub rate_percent: u32,
}

impl TimerEntry {
    pub fn new(actor: ActorId, interval: u32) -> Self {
        Self {
            actor,
            interval,
            rate_percent: 100,
        }
    }

    pub fn with_rate(mut self, rate_percent: u32) -> Self {
        self.rate_percent = rate_percent;
        self
    }
}

/// Accumulated action time per actor. Missing entries count as zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionTimers {
    elapsed: BTreeMap<ActorId, u64>,
}

impl ActionTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current accumulated time for an actor.
    pub fn get(&self, actor: ActorId) -> u64 {
        self.elapsed.get(&actor).copied().unwrap_or(0)
    }

    pub fn reset(&mut self, actor: ActorId) {
        self.elapsed.remove(&actor);
    }

    pub fn clear(&mut self) {
        self.elapsed.clear();
    }

    /// Adds `elapsed` to every entry and returns the actors whose timer
    /// reached their interval, in the order the entries were given.
    ///
    /// A firing timer resets to 0 (surplus time is dropped), so an actor
    /// fires at most once per advance.
    pub fn advance(&mut self, entries: &[TimerEntry], elapsed: u64) -> Vec<ActorId> {
        let mut ready = Vec::new();
        for entry in entries {
            let gained = elapsed.saturating_mul(u64::from(entry.rate_percent)) / 100;
            let timer = self.elapsed.entry(entry.actor).or_insert(0);
            *timer = timer.saturating_add(gained);

            if *timer >= u64::from(entry.interval) {
                *timer = 0;
                ready.push(entry.actor);
            }
        }
        ready
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_exactly_when_threshold_reached() {
        let mut timers = ActionTimers::new();
        let entries = [TimerEntry::new(ActorId(1), 900)];

        for _ in 0..8 {
            assert!(timers.advance(&entries, 100).is_empty());
        }
        assert_eq!(timers.get(ActorId(1)), 800);
        assert_eq!(timers.advance(&entries, 100), vec![ActorId(1)]);
        assert_eq!(timers.get(ActorId(1)), 0);
    }

    #[test]
    fn both_sides_can_fire_in_one_tick_in_entry_order() {
        let mut timers = ActionTimers::new();
        let entries = [
            TimerEntry::new(ActorId::PLAYER, 500),
            TimerEntry::new(ActorId(1), 400),
        ];

        assert_eq!(timers.advance(&entries, 500), vec![ActorId::PLAYER, ActorId(1)]);
    }

    #[test]
    fn large_tick_fires_once_and_drops_surplus() {
        let mut timers = ActionTimers::new();
        let entries = [TimerEntry::new(ActorId(1), 250)];
        assert_eq!(timers.advance(&entries, 10_000), vec![ActorId(1)]);
        assert_eq!(timers.get(ActorId(1)), 0);
    }

    #[test]
    fn frozen_and_hasted_rates() {
        let mut timers = ActionTimers::new();
        let frozen = [TimerEntry::new(ActorId(1), 100).with_rate(0)];
        assert!(timers.advance(&frozen, 1_000).is_empty());

        let hasted = [TimerEntry::new(ActorId(1), 100).with_rate(200)];
        assert_eq!(timers.advance(&hasted, 50), vec![ActorId(1)]);
    }
}
