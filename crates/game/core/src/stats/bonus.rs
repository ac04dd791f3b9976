//! Additive stat bonuses from collaborators outside the core (equipment).
//!
//! Bonuses are signed deltas over [`super::DerivedStats`]. They accumulate
//! on the player as equipment changes arrive and are folded in last by
//! [`super::with_bonuses`].

/// Signed, additive deltas over each derived stat.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct StatBonuses {
    pub atk: i32,
    pub def: i32,
    pub hp: i32,
    pub aspd: i32,
    pub cr: i32,
    pub crd: i32,
}

impl StatBonuses {
    /// Create new empty bonuses
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if every delta is zero.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Accumulates another set of deltas (saturating).
    pub fn merge(&mut self, other: &StatBonuses) {
        self.atk = self.atk.saturating_add(other.atk);
        self.def = self.def.saturating_add(other.def);
        self.hp = self.hp.saturating_add(other.hp);
        self.aspd = self.aspd.saturating_add(other.aspd);
        self.cr = self.cr.saturating_add(other.cr);
        self.crd = self.crd.saturating_add(other.crd);
    }
}
