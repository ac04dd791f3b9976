//! Stage progression: static stage table, enemy pools, and the stage state machine.

mod config;
mod machine;
mod spawn;

pub use config::{ResolvedStage, StageConfig, StageKind, StageTable};
pub use machine::{StageMachine, StageOutcome, StagePhase, StageSignal};
pub use spawn::{EnemyPools, EnemyTemplate, PoolDraw, TemplateCatalog};

use crate::error::{ErrorSeverity, GameError};

/// Errors raised by stage progression.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StageError {
    /// Neither the requested pool nor the fallback pool exists.
    #[error("unknown enemy pool '{pool}' and no fallback pool configured")]
    UnknownPool { pool: String },

    #[error("enemy pool '{pool}' is empty")]
    EmptyPool { pool: String },

    #[error("pool '{pool}' references unknown template '{template}'")]
    UnknownTemplate { template: String, pool: String },

    #[error("stage {received} entered while stage {expected} is current")]
    IndexMismatch { expected: u32, received: u32 },

    #[error("cannot {action} while stage is {phase}")]
    InvalidTransition {
        phase: StagePhase,
        action: &'static str,
    },
}

impl GameError for StageError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownPool { .. } | Self::EmptyPool { .. } | Self::UnknownTemplate { .. } => {
                ErrorSeverity::Internal
            }
            Self::IndexMismatch { .. } | Self::InvalidTransition { .. } => {
                ErrorSeverity::Validation
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownPool { .. } => "UNKNOWN_POOL",
            Self::EmptyPool { .. } => "EMPTY_POOL",
            Self::UnknownTemplate { .. } => "UNKNOWN_TEMPLATE",
            Self::IndexMismatch { .. } => "INDEX_MISMATCH",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}
