//! Pawn move generation
//!
//! Pawns have the most complex movement rules:
//! - Move forward one square (or two from the starting rank)
//! - Capture diagonally forward
//! - En passant onto the position's en-passant target
//! - Promotion on reaching the last rank, to any of queen, rook, bishop or knight

use crate::board::{Color, Position, Square};
use crate::constants::PROMOTION_KINDS;
use crate::moves::{Move, MoveFlags};

pub(super) fn generate_pawn_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut Vec<Move>,
) {
    let forward = color.forward();
    let start_rank = match color {
        Color::White => 1,
        Color::Black => 6,
    };

    if let Some(one) = from.offset(0, forward) {
        if position.piece_at(one).is_none() {
            push_pawn_move(from, one, color, MoveFlags::empty(), moves);

            if from.rank() == start_rank {
                if let Some(two) = one.offset(0, forward) {
                    if position.piece_at(two).is_none() {
                        moves.push(Move::new(from, two, MoveFlags::DOUBLE_PAWN_PUSH));
                    }
                }
            }
        }
    }

    for df in [-1, 1] {
        let Some(to) = from.offset(df, forward) else {
            continue;
        };
        match position.piece_at(to) {
            Some(piece) if piece.color != color => {
                push_pawn_move(from, to, color, MoveFlags::CAPTURE, moves);
            }
            None if position.en_passant() == Some(to) => {
                moves.push(Move::new(
                    from,
                    to,
                    MoveFlags::CAPTURE | MoveFlags::EN_PASSANT,
                ));
            }
            _ => {}
        }
    }
}

/// Push a single-step or capturing pawn move, expanding promotions
fn push_pawn_move(from: Square, to: Square, color: Color, flags: MoveFlags, moves: &mut Vec<Move>) {
    if to.rank() == color.opposite().home_rank() {
        for kind in PROMOTION_KINDS {
            moves.push(Move::promoting(from, to, kind, flags));
        }
    } else {
        moves.push(Move::new(from, to, flags));
    }
}
