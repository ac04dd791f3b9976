//! Closed set of values the store can hold.

use arena_core::{ActionTimers, ActorId, EnemyRoster, Player, SkillMultiplier, StageMachine};
use serde::{Deserialize, Serialize};

/// A stored value. Records are written back whole, never patched in place.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum StateValue {
    Flag(bool),
    Counter(u64),
    Text(String),
    Names(Vec<String>),
    Actor(ActorId),
    Player(Player),
    Enemies(EnemyRoster),
    Stage(StageMachine),
    Timers(ActionTimers),
    Skill(SkillMultiplier),
}

impl StateValue {
    /// Variant name, used in type mismatch errors.
    pub fn kind(&self) -> &'static str {
        self.into()
    }
}

/// A Rust type with a dedicated [`StateValue`] variant.
pub trait StateRecord: Sized + Into<StateValue> {
    const KIND: &'static str;

    fn from_value(value: &StateValue) -> Option<&Self>;
}

macro_rules! state_record {
    ($ty:ty, $variant:ident, $kind:literal) => {
        impl StateRecord for $ty {
            const KIND: &'static str = $kind;

            fn from_value(value: &StateValue) -> Option<&Self> {
                match value {
                    StateValue::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }

        impl From<$ty> for StateValue {
            fn from(value: $ty) -> Self {
                StateValue::$variant(value)
            }
        }
    };
}

state_record!(bool, Flag, "flag");
state_record!(u64, Counter, "counter");
state_record!(String, Text, "text");
state_record!(Vec<String>, Names, "names");
state_record!(ActorId, Actor, "actor");
state_record!(Player, Player, "player");
state_record!(EnemyRoster, Enemies, "enemies");
state_record!(StageMachine, Stage, "stage");
state_record!(ActionTimers, Timers, "timers");
state_record!(SkillMultiplier, Skill, "skill");
