//! Error types for chess engine
//!
//! Every failure the engine can report to a caller has its own variant so the
//! surrounding application can tell a bad request apart from an engine fault.
//! Running out of time is deliberately absent: it is reported through
//! [`crate::api::AbortReason::TimeExhausted`] on a normal result.

use thiserror::Error;

use crate::board::Position;

/// Errors that can occur in the chess engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Malformed or impossible position string
    #[error("Invalid position: {reason}")]
    InvalidPosition { reason: String },

    /// CPU level outside the supported 1-10 range
    #[error("Invalid CPU level: {level} (must be 1-10)")]
    InvalidLevel { level: i32 },

    /// A move was requested for a position that is already over
    #[error("No legal moves in position {fen}")]
    NoLegalMoves { fen: String },

    /// Move is well-formed but not in the legal set for the position
    #[error("Illegal move {notation} in position {fen}")]
    IllegalMove { notation: String, fen: String },

    /// Move text could not be parsed as coordinate notation
    #[error("Invalid move notation: {notation}")]
    InvalidMoveNotation { notation: String },

    /// Static difficulty table breaks one of its invariants
    #[error("Invalid difficulty profile for level {level}: {reason}")]
    InvalidProfile { level: u8, reason: String },

    /// Internal search invariant broken; never substituted with a fallback move
    #[error("Search invariant violated: {message} (position {fen})")]
    InvariantViolation { message: String, fen: String },
}

/// Result type alias for chess engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Build an [`EngineError::InvariantViolation`], logging the full position first.
///
/// Debug builds panic here so the fault surfaces during development.
pub(crate) fn invariant_violation(position: &Position, message: &str) -> EngineError {
    let fen = position.to_fen();
    tracing::error!("[SEARCH] invariant violated: {} | fen: {}", message, fen);
    debug_assert!(false, "search invariant violated: {message} (fen {fen})");
    EngineError::InvariantViolation {
        message: message.to_string(),
        fen,
    }
}
