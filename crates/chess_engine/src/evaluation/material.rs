//! Material evaluation
//!
//! Evaluates the material balance of a position by counting piece values.

use crate::board::{PieceKind, Position};

/// Material balance in centipawns, positive when White is ahead
pub fn evaluate_material(position: &Position) -> i32 {
    position
        .pieces()
        .map(|(_, piece)| piece.kind.value() * piece.color.sign())
        .sum()
}

/// Endgame once the queens are off or few pieces remain
pub fn is_endgame(position: &Position) -> bool {
    let mut piece_count = 0;
    let mut queen_count = 0;

    for (_, piece) in position.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Queen => {
                piece_count += 1;
                queen_count += 1;
            }
            _ => piece_count += 1,
        }
    }

    queen_count == 0 || piece_count <= 6
}
