//! Knight move generation
//!
//! Knights jump, so only the destination square matters: empty squares give a
//! quiet move, enemy pieces a capture, own pieces nothing.

use super::tables::tables;
use crate::board::{Color, Position, Square};
use crate::moves::{Move, MoveFlags};

pub(super) fn generate_knight_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut Vec<Move>,
) {
    for &to in &tables().knight[from.index()] {
        match position.piece_at(to) {
            None => moves.push(Move::new(from, to, MoveFlags::empty())),
            Some(piece) if piece.color != color => {
                moves.push(Move::new(from, to, MoveFlags::CAPTURE))
            }
            Some(_) => {}
        }
    }
}
