//! # Chess Engine Constants - Evaluation Values & Search Parameters
//!
//! ## Overview
//!
//! This module centralizes the constant values used throughout the engine: piece valuations in
//! centipawns, search score bounds, and the square geometry shared by move generation and
//! evaluation.
//!
//! ## Centipawn Valuation System
//!
//! Chess engines use **centipawns** (1/100th of a pawn) as the standard unit for position
//! evaluation. This allows fine-grained scoring while keeping integer arithmetic:
//!
//! - **Pawn**: 100
//! - **Knight**: 320
//! - **Bishop**: 340
//! - **Rook**: 500
//! - **Queen**: 950
//!
//! Bishop and queen sit above the textbook 300/900 so the engine is reluctant to trade them
//! away early for an equal-looking piece. Positional factors (open files, outposts, pawn
//! shields) live in the evaluation function, not in these base numbers.
//!
//! ## Mate Scores
//!
//! A checkmate is scored `MATE_SCORE - ply`, so a mate found closer to the root is worth more
//! than a distant one and the search prefers the fastest win (and the slowest loss). Any score
//! whose magnitude reaches `MATE_THRESHOLD` is a mate score rather than a material score.
//!
//! ## Further Reading
//!
//! - **Centipawns**: https://www.chessprogramming.org/Centipawns
//! - **Alpha-Beta Search**: https://www.chessprogramming.org/Alpha-Beta
//! - **Checkmate scores**: https://www.chessprogramming.org/Score#Mate_Scores

pub const PAWN_VALUE: i32 = 100;
pub const KNIGHT_VALUE: i32 = 320;
pub const BISHOP_VALUE: i32 = 340;
pub const ROOK_VALUE: i32 = 500;
pub const QUEEN_VALUE: i32 = 950;
/// Kings are never traded; they carry no material weight.
pub const KING_VALUE: i32 = 0;

/// Indexed by [`crate::board::PieceKind::index`].
pub const FIGURE_VALUE: [i32; 6] = [
    PAWN_VALUE,
    KNIGHT_VALUE,
    BISHOP_VALUE,
    ROOK_VALUE,
    QUEEN_VALUE,
    KING_VALUE,
];

/// Bound wider than any reachable score.
pub const AB_INF: i32 = 32_000;
pub const MATE_SCORE: i32 = 30_000;
/// Deepest ply the search can ever reach (nominal + extensions + quiescence).
pub const MAX_PLY: usize = 128;
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;
pub const DRAW_SCORE: i32 = 0;

/// Halfmove clock value at which the fifty-move rule applies.
pub const FIFTY_MOVE_LIMIT: u32 = 100;

pub const START_FEN: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Knight jump offsets as (file, rank) deltas.
pub const KNIGHT_DELTAS: [(i8, i8); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];

pub const KING_DELTAS: [(i8, i8); 8] = [
    (0, 1),
    (1, 1),
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
];

pub const ROOK_DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];
pub const BISHOP_DIRS: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, -1), (-1, 1)];

/// Promotion choices in generation order.
pub const PROMOTION_KINDS: [crate::board::PieceKind; 4] = [
    crate::board::PieceKind::Queen,
    crate::board::PieceKind::Rook,
    crate::board::PieceKind::Bishop,
    crate::board::PieceKind::Knight,
];
