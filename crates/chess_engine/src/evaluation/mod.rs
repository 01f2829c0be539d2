//! Position evaluation with piece-square tables
//!
//! Evaluates chess positions using:
//! - Material count (piece values)
//! - Positional bonuses (piece-square tables)
//! - King safety (castled bonus, missing pawn shield penalty)
//! - Center control and development
//! - Pawn structure (doubled, isolated and passed pawns)
//!
//! Scores are centipawns from the side to move's point of view (negamax
//! convention). Evaluation is pure: the same position and complexity always
//! produce the same score.
//!
//! ## Module Organization
//!
//! - `pst` - Piece-square tables for positional evaluation
//! - `material` - Material balance and game-phase detection
//! - `king_safety` - Castling and pawn-shield terms
//! - `pawns` - Pawn-structure terms
//! - `position` - Full position evaluation combining the above

mod king_safety;
mod material;
mod pawns;
mod position;
mod pst;

use serde::{Deserialize, Serialize};

pub use material::{evaluate_material, is_endgame};
pub use position::{evaluate, evaluate_white};

/// How much of the evaluator a difficulty level pays for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationComplexity {
    /// Material and piece-square tables only
    Lite,
    /// Every term
    Full,
}
