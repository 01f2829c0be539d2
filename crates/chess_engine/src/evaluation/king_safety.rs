//! King safety
//!
//! Middlegame-only: a king tucked away on a wing after castling earns a
//! bonus, and a king with no friendly pawn in front of it is heavily
//! penalised. Endgame kings are judged by the piece-square table alone.

use crate::board::{Color, Piece, PieceKind, Position, Square};

const CASTLED_BONUS: i32 = 50;
const EXPOSED_KING_PENALTY: i32 = -200;

/// King-safety score for `color`, from that side's point of view
pub(super) fn king_safety(position: &Position, color: Color, endgame: bool) -> i32 {
    if endgame {
        return 0;
    }

    let king = position.king_square(color);
    let mut score = 0;

    if is_castled(king, color) {
        score += CASTLED_BONUS;
    }
    if shield_pawns(position, king, color) == 0 {
        score += EXPOSED_KING_PENALTY;
    }

    score
}

/// King on its back rank on the g/h or a/b/c files
fn is_castled(king: Square, color: Color) -> bool {
    king.rank() == color.home_rank() && (king.file() >= 6 || king.file() <= 2)
}

/// Own pawns on the king's file and its neighbours, one or two ranks ahead
fn shield_pawns(position: &Position, king: Square, color: Color) -> usize {
    let pawn = Some(Piece::new(PieceKind::Pawn, color));
    let forward = color.forward();
    let mut count = 0;
    for df in -1..=1 {
        for steps in 1..=2 {
            if king
                .offset(df, forward * steps)
                .is_some_and(|square| position.piece_at(square) == pawn)
            {
                count += 1;
            }
        }
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_castled_king_behind_pawns() {
        let position =
            Position::from_fen("4k3/pppppppp/8/8/8/8/5PPP/6K1 w - - 0 1").expect("valid");
        assert_eq!(king_safety(&position, Color::White, false), CASTLED_BONUS);
    }

    #[test]
    fn test_exposed_king_is_penalised() {
        let position =
            Position::from_fen("4k3/pppppppp/8/8/8/8/8/4K3 w - - 0 1").expect("valid");
        assert_eq!(
            king_safety(&position, Color::White, false),
            EXPOSED_KING_PENALTY
        );
        assert_eq!(king_safety(&position, Color::Black, false), 0);
    }

    #[test]
    fn test_endgame_ignores_king_safety() {
        let position =
            Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("valid");
        assert_eq!(king_safety(&position, Color::White, true), 0);
    }
}
