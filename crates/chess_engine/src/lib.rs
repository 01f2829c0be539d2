//! Time-budgeted chess engine for a CPU opponent
//!
//! Given a position and a difficulty level (1-10), the engine returns a legal
//! move within a fixed wall-clock budget. Every level shares the budget;
//! levels differ in search depth, root beam width, quiescence depth and
//! evaluation detail.
//!
//! ```no_run
//! use chess_engine::{select_move, Position};
//!
//! let position = Position::startpos();
//! let result = select_move(&position, 5, 1)?;
//! println!("{} ({})", result.san, result.abort_reason);
//! # Ok::<(), chess_engine::EngineError>(())
//! ```

pub mod api;
pub mod board;
pub mod book;
pub mod constants;
pub mod error;
pub mod evaluation;
pub mod hash;
pub mod move_gen;
pub mod moves;
pub mod notation;
pub mod profile;
pub mod search;

pub use api::{
    select_move, AbortReason, Diagnostics, MoveReport, MoveSelector, SearchRequest, SearchResult,
};
pub use board::{CastlingRights, Color, Piece, PieceKind, Position, Square};
pub use error::{EngineError, EngineResult};
pub use evaluation::EvaluationComplexity;
pub use move_gen::{apply_move, generate_legal_moves, is_terminal, TerminalState};
pub use moves::{parse_uci, Move};
pub use notation::{line_to_san, replay_uci, to_san};
pub use profile::{resolve_profile, validate_profile_table, BeamWidth, DifficultyProfile};
pub use search::{CancellationToken, Clock, ManualClock, TimeBudget, WallClock};
