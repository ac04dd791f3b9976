//! Errors surfaced by registration and boot.

use arena_core::{ErrorSeverity, GameError, StatError, TableError};
use thiserror::Error;

use crate::store::StateError;

/// Failure inside a module's `init`.
#[derive(Debug, Error)]
pub enum ModuleError {
    #[error(transparent)]
    State(#[from] StateError),

    #[error(transparent)]
    Stat(#[from] StatError),

    #[error("{reason}")]
    Setup { reason: String },
}

#[derive(Debug, Error)]
pub enum KernelError {
    /// Rejected at registration; the module never enters the registry.
    #[error("invalid module '{name}': {reason}")]
    InvalidModule { name: String, reason: &'static str },

    #[error("module '{module}' failed to initialize")]
    ModuleInit {
        module: &'static str,
        #[source]
        source: ModuleError,
    },

    #[error("kernel already booted")]
    AlreadyBooted,

    #[error("static tables are invalid")]
    Tables(#[from] TableError),
}

impl GameError for KernelError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::AlreadyBooted => ErrorSeverity::Validation,
            Self::InvalidModule { .. } | Self::ModuleInit { .. } | Self::Tables(_) => {
                ErrorSeverity::Fatal
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidModule { .. } => "INVALID_MODULE",
            Self::ModuleInit { .. } => "MODULE_INIT",
            Self::AlreadyBooted => "ALREADY_BOOTED",
            Self::Tables(_) => "INVALID_TABLES",
        }
    }
}
