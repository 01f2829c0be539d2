//! Attack detection and square checking
//!
//! Provides functions to check if squares are under attack and if kings are in check.
//! This module is critical for move legality validation and check detection.
//!
//! ## Algorithm
//!
//! Rather than scanning every enemy piece, we look outward from the target
//! square: a knight-jump away for knights, one diagonal step for pawns, and
//! along each ray until the first occupied square for sliders. A square is
//! attacked when the piece found is of the right kind and color.

use super::tables::tables;
use crate::board::{Color, Piece, PieceKind, Position, Square};
use crate::constants::{BISHOP_DIRS, ROOK_DIRS};

/// Check if `square` is attacked by any piece of color `by`
///
/// Used for check detection, castling-path safety, and legality filtering.
pub fn is_square_attacked(position: &Position, square: Square, by: Color) -> bool {
    // A pawn of `by` attacks from one rank behind the target (seen from its side)
    let pawn = Piece::new(PieceKind::Pawn, by);
    for df in [-1, 1] {
        if square
            .offset(df, -by.forward())
            .is_some_and(|from| position.piece_at(from) == Some(pawn))
        {
            return true;
        }
    }

    let knight = Piece::new(PieceKind::Knight, by);
    if tables().knight[square.index()]
        .iter()
        .any(|&from| position.piece_at(from) == Some(knight))
    {
        return true;
    }

    let king = Piece::new(PieceKind::King, by);
    if tables().king[square.index()]
        .iter()
        .any(|&from| position.piece_at(from) == Some(king))
    {
        return true;
    }

    slider_attacks(position, square, by, &ROOK_DIRS, PieceKind::Rook)
        || slider_attacks(position, square, by, &BISHOP_DIRS, PieceKind::Bishop)
}

/// Whether the king of `color` is currently attacked
#[inline]
pub fn is_in_check(position: &Position, color: Color) -> bool {
    is_square_attacked(position, position.king_square(color), color.opposite())
}

fn slider_attacks(
    position: &Position,
    square: Square,
    by: Color,
    dirs: &[(i8, i8)],
    kind: PieceKind,
) -> bool {
    for &(df, dr) in dirs {
        let mut current = square;
        while let Some(next) = current.offset(df, dr) {
            if let Some(piece) = position.piece_at(next) {
                if piece.color == by && (piece.kind == kind || piece.kind == PieceKind::Queen) {
                    return true;
                }
                break;
            }
            current = next;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pawn_attacks_point_forward() {
        let position = Position::from_fen("4k3/8/8/8/4P3/8/8/4K3 w - - 0 1").expect("valid");
        assert!(is_square_attacked(&position, Square::D5, Color::White));
        assert!(!is_square_attacked(&position, Square::parse("d3").expect("sq"), Color::White));
    }

    #[test]
    fn test_sliders_are_blocked() {
        let position = Position::from_fen("4k3/8/8/8/8/8/4P3/R3K3 w - - 0 1").expect("valid");
        assert!(is_square_attacked(&position, Square::D1, Color::White));
        assert!(is_square_attacked(&position, Square::A8, Color::White));
        // e-file above the e2 pawn is not reached by anything
        assert!(!is_square_attacked(&position, Square::parse("e5").expect("sq"), Color::White));
    }

    #[test]
    fn test_is_in_check() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/8/4RK2 b - - 0 1").expect("valid");
        assert!(is_in_check(&position, Color::Black));
        assert!(!is_in_check(&position, Color::White));
    }
}
