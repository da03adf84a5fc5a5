use std::fmt;

use thiserror::Error;

use crate::timebox::TimeboxId;

/// Why an operation on a timebox was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// The timebox is the live, uncommitted trailing region.
    Trailing,
    /// No timebox with this id exists.
    Unknown,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::Trailing => write!(f, "it is the trailing timebox"),
            InvalidReason::Unknown => write!(f, "no such timebox"),
        }
    }
}

/// Error type for engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Invalid operation on timebox {id}: {reason}")]
    InvalidOperation { id: TimeboxId, reason: InvalidReason },
}

impl EngineError {
    pub(crate) fn trailing(id: TimeboxId) -> Self {
        EngineError::InvalidOperation {
            id,
            reason: InvalidReason::Trailing,
        }
    }

    pub(crate) fn unknown(id: TimeboxId) -> Self {
        EngineError::InvalidOperation {
            id,
            reason: InvalidReason::Unknown,
        }
    }

    /// The timebox the failed operation targeted.
    pub fn id(&self) -> TimeboxId {
        match self {
            EngineError::InvalidOperation { id, .. } => *id,
        }
    }
}

/// Result type alias using the engine's error.
pub type Result<T> = std::result::Result<T, EngineError>;
