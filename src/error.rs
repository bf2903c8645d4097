//! Error types for the colony engine.

use thiserror::Error;

/// Errors surfaced to callers.
///
/// All of them are raised synchronously, before any run state exists.
/// Numeric degeneracies met during tour construction are resolved
/// internally and never reach this type; cancellation is a normal outcome
/// reported through [`RunState::Cancelled`](crate::RunState::Cancelled).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AcoError {
    /// Invalid parameter or too few cities.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A variant name that does not match AS, ACS, MMAS or RANK.
    #[error("Unknown ACO variant: {0}")]
    UnknownVariant(String),
}

/// Result type alias for engine operations.
pub type Result<T> = std::result::Result<T, AcoError>;
