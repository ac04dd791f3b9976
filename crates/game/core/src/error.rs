//! Common error infrastructure for arena-core.
//!
//! Domain errors (`StatError`, `StageError`) live next to the code that
//! raises them. This module provides the shared severity classification
//! the runtime uses to decide how loudly to log and whether to keep going.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: "not ready yet" conditions; the caller no-ops and moves on
/// - **Validation**: bad input from outside the core; rejected without retry
/// - **Internal**: inconsistent tables or state; indicates a bug upstream
/// - **Fatal**: startup cannot continue
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error, e.g. a state key that has not been written yet.
    Recoverable,

    /// Validation error, e.g. an inbound event naming an unknown actor.
    Validation,

    /// Internal error, e.g. an enemy template with an unknown type tag.
    Internal,

    /// Fatal error, e.g. a module registration that violates the contract.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all arena errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for log fields and for matching in tests.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
