//! Sliding piece move generation (bishops, rooks, queens)
//!
//! Each ray is walked square by square until it leaves the board or hits a
//! piece. An enemy piece ends the ray with a capture; an own piece ends it
//! without one.

use crate::board::{Color, Position, Square};
use crate::moves::{Move, MoveFlags};

pub(super) fn generate_sliding_moves(
    position: &Position,
    from: Square,
    color: Color,
    dirs: &[(i8, i8)],
    moves: &mut Vec<Move>,
) {
    for &(df, dr) in dirs {
        let mut current = from;
        while let Some(to) = current.offset(df, dr) {
            match position.piece_at(to) {
                None => moves.push(Move::new(from, to, MoveFlags::empty())),
                Some(piece) => {
                    if piece.color != color {
                        moves.push(Move::new(from, to, MoveFlags::CAPTURE));
                    }
                    break;
                }
            }
            current = to;
        }
    }
}
