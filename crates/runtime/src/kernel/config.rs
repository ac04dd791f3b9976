use arena_core::Attributes;
use serde::{Deserialize, Serialize};

use crate::events::EventBus;

/// Runtime configuration shared by the kernel and its modules.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Game seed. A random seed is drawn at build time when unset.
    pub seed: Option<u64>,
    /// Nesting limit for follow-up events.
    pub max_dispatch_depth: usize,
    /// Player starting attributes; the static tables' value when unset.
    pub player_attributes: Option<Attributes>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            seed: None,
            max_dispatch_depth: EventBus::DEFAULT_MAX_DEPTH,
            player_attributes: None,
        }
    }
}
