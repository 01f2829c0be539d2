//! Full position evaluation
//!
//! Evaluates positions using material and piece-square tables, plus king
//! safety, center control, development and pawn structure in
//! [`EvaluationComplexity::Full`] mode.

use super::king_safety::king_safety;
use super::material::is_endgame;
use super::pawns::pawn_structure;
use super::pst::pst_value;
use super::EvaluationComplexity;
use crate::board::{Color, PieceKind, Position, Square};

const CENTER_SQUARES: [Square; 4] = [Square::D4, Square::E4, Square::D5, Square::E5];
const CENTER_PAWN_BONUS: i32 = 25;
const CENTER_PIECE_BONUS: i32 = 10;

/// Full move from which undeveloped minor pieces start costing points
const DEVELOPMENT_MOVE_THRESHOLD: u32 = 6;
const UNDEVELOPED_MINOR_PENALTY: i32 = -15;

/// Score from the side to move's point of view
pub fn evaluate(position: &Position, complexity: EvaluationComplexity) -> i32 {
    evaluate_white(position, complexity) * position.side_to_move().sign()
}

/// Score from White's point of view
pub fn evaluate_white(position: &Position, complexity: EvaluationComplexity) -> i32 {
    let endgame = is_endgame(position);
    let mut score = 0;

    for (square, piece) in position.pieces() {
        score += (piece.kind.value() + pst_value(piece, square, endgame)) * piece.color.sign();
    }

    if complexity == EvaluationComplexity::Full {
        for color in [Color::White, Color::Black] {
            let terms = king_safety(position, color, endgame)
                + center_control(position, color)
                + development(position, color, endgame)
                + pawn_structure(position, color);
            score += terms * color.sign();
        }
    }

    score
}

fn center_control(position: &Position, color: Color) -> i32 {
    CENTER_SQUARES
        .iter()
        .filter_map(|&square| position.piece_at(square))
        .filter(|piece| piece.color == color)
        .map(|piece| match piece.kind {
            PieceKind::Pawn => CENTER_PAWN_BONUS,
            _ => CENTER_PIECE_BONUS,
        })
        .sum()
}

fn development(position: &Position, color: Color, endgame: bool) -> i32 {
    if endgame || position.fullmove_number() < DEVELOPMENT_MOVE_THRESHOLD {
        return 0;
    }

    let rank = color.home_rank();
    let home_minors = [
        (1, PieceKind::Knight),
        (6, PieceKind::Knight),
        (2, PieceKind::Bishop),
        (5, PieceKind::Bishop),
    ];

    home_minors
        .iter()
        .filter(|&&(file, kind)| {
            position
                .piece_at(Square::from_coords(file, rank))
                .is_some_and(|piece| piece.kind == kind && piece.color == color)
        })
        .count() as i32
        * UNDEVELOPED_MINOR_PENALTY
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fen(text: &str) -> Position {
        Position::from_fen(text).expect("valid test FEN")
    }

    #[test]
    fn test_start_position_is_balanced() {
        let position = Position::startpos();
        assert_eq!(evaluate(&position, EvaluationComplexity::Lite), 0);
        assert_eq!(evaluate(&position, EvaluationComplexity::Full), 0);
    }

    #[test]
    fn test_score_follows_side_to_move() {
        let white_to_move = fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1");
        let black_to_move = fen("rnb1kbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR b KQkq - 0 1");
        let white_view = evaluate(&white_to_move, EvaluationComplexity::Full);
        assert!(white_view > 800, "White is a queen up, got {white_view}");
        assert_eq!(evaluate(&black_to_move, EvaluationComplexity::Full), -white_view);
    }

    #[test]
    fn test_lite_skips_king_safety() {
        // White pawns advanced past the king's shield zone
        let position = fen("3qk3/pppppppp/8/8/PPPPPPPP/8/8/3QK3 w - - 0 1");
        let lite = evaluate_white(&position, EvaluationComplexity::Lite);
        let full = evaluate_white(&position, EvaluationComplexity::Full);
        assert_ne!(lite, full);
        assert!(full < lite, "exposed white king should cost points in full mode");
    }

    #[test]
    fn test_center_pawns_rewarded() {
        let position = fen("4k3/8/8/8/3PP3/8/8/4K3 w - - 0 1");
        assert_eq!(center_control(&position, Color::White), 2 * CENTER_PAWN_BONUS);
        assert_eq!(center_control(&position, Color::Black), 0);
    }

    #[test]
    fn test_development_penalty_after_threshold() {
        let early = Position::startpos();
        assert_eq!(development(&early, Color::White, false), 0);

        let late = fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 10");
        assert_eq!(
            development(&late, Color::White, false),
            4 * UNDEVELOPED_MINOR_PENALTY
        );
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let position = fen("r1bqkb1r/pppp1ppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
        let first = evaluate(&position, EvaluationComplexity::Full);
        for _ in 0..3 {
            assert_eq!(evaluate(&position, EvaluationComplexity::Full), first);
        }
    }
}
