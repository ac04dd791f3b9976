//! Attribute points - the only persistent input of the stat system.
//!
//! Everything combat-facing is derived from these five values (see
//! [`super::derived`]). They are never modified by combat; only level-ups,
//! point allocation and external attribute changes touch them.

/// The five base attributes of an actor.
///
/// - **STR** (Strength): attack power
/// - **DEX** (Dexterity): defense
/// - **VIT** (Vitality): hit points
/// - **AGI** (Agility): attack power and attack interval
/// - **CTR** (Critical): crit chance and crit damage
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attributes {
    pub str: u32,
    pub dex: u32,
    pub vit: u32,
    pub agi: u32,
    pub ctr: u32,
}

impl Attributes {
    pub const fn new(str: u32, dex: u32, vit: u32, agi: u32, ctr: u32) -> Self {
        Self {
            str,
            dex,
            vit,
            agi,
            ctr,
        }
    }

    /// Returns the value of a single attribute.
    pub const fn get(&self, attribute: Attribute) -> u32 {
        match attribute {
            Attribute::Str => self.str,
            Attribute::Dex => self.dex,
            Attribute::Vit => self.vit,
            Attribute::Agi => self.agi,
            Attribute::Ctr => self.ctr,
        }
    }

    /// Adds points to a single attribute (saturating).
    pub fn add(&mut self, attribute: Attribute, points: u32) {
        let slot = match attribute {
            Attribute::Str => &mut self.str,
            Attribute::Dex => &mut self.dex,
            Attribute::Vit => &mut self.vit,
            Attribute::Agi => &mut self.agi,
            Attribute::Ctr => &mut self.ctr,
        };
        *slot = slot.saturating_add(points);
    }

    /// Scales every attribute by `percent` (100 = unchanged), rounding down.
    pub fn scaled(&self, percent: u32) -> Self {
        let scale = |value: u32| (u64::from(value) * u64::from(percent) / 100) as u32;
        Self {
            str: scale(self.str),
            dex: scale(self.dex),
            vit: scale(self.vit),
            agi: scale(self.agi),
            ctr: scale(self.ctr),
        }
    }

    /// Sum of all attribute points.
    pub fn total(&self) -> u64 {
        [self.str, self.dex, self.vit, self.agi, self.ctr]
            .into_iter()
            .map(u64::from)
            .sum()
    }
}

/// Attribute selector used by point allocation and inbound change events.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "UPPERCASE")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Attribute {
    Str,
    Dex,
    Vit,
    Agi,
    Ctr,
}
