use super::status::StatusEffects;

/// Runtime block of an actor: hit points, alive flag, status effects.
///
/// `hp` and `alive` are private; every mutation goes through a method that
/// re-establishes `alive == (hp > 0)`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vitals {
    hp: u32,
    max_hp: u32,
    alive: bool,
    /// Set once the actor has died; a later rebind never resurrects it.
    dead: bool,
    pub statuses: StatusEffects,
}

/// Result of an hp change on a [`Vitals`] block (damage or a new maximum).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DamageApplied {
    pub hp_before: u32,
    pub hp_after: u32,
    /// True only for the change that took a living actor to zero.
    pub died: bool,
}

impl Vitals {
    /// Hit points not bound yet: hp 0, not alive, not dead either.
    pub fn pending() -> Self {
        Self::default()
    }

    /// Full health at `max_hp`.
    pub fn full(max_hp: u32) -> Self {
        let mut vitals = Self::pending();
        vitals.rebind(max_hp);
        vitals
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// True once the actor has died. Pending actors are neither alive nor dead.
    pub fn is_dead(&self) -> bool {
        self.dead
    }

    /// Updates the maximum after a stat change.
    ///
    /// A pending actor is filled to the new maximum; a living actor keeps its
    /// current hp clamped to the new maximum and dies if that is zero; a dead
    /// actor stays dead.
    pub fn rebind(&mut self, max_hp: u32) -> DamageApplied {
        let hp_before = self.hp;
        let was_alive = self.alive;
        self.max_hp = max_hp;
        if !self.dead {
            self.hp = if was_alive { self.hp.min(max_hp) } else { max_hp };
            self.sync();
        }
        self.settle(hp_before, was_alive)
    }

    /// Subtracts damage, clamping at zero.
    pub fn apply_damage(&mut self, amount: u32) -> DamageApplied {
        let hp_before = self.hp;
        let was_alive = self.alive;
        self.hp = self.hp.saturating_sub(amount);
        self.sync();
        self.settle(hp_before, was_alive)
    }

    /// Marks the actor dead when a change took it from alive to not alive.
    fn settle(&mut self, hp_before: u32, was_alive: bool) -> DamageApplied {
        let died = was_alive && !self.alive;
        if died {
            self.dead = true;
        }

        DamageApplied {
            hp_before,
            hp_after: self.hp,
            died,
        }
    }

    /// Restores a living actor to full health. Returns false for the dead.
    pub fn restore_full(&mut self) -> bool {
        if self.dead {
            return false;
        }
        self.hp = self.max_hp;
        self.sync();
        true
    }

    fn sync(&mut self) {
        self.alive = self.hp > 0 && !self.dead;
    }
}
