//! Precomputed move tables
//!
//! Leaper destinations (knight and king) are computed once per process and
//! looked up by square. The same pass records how many squares each piece kind
//! reaches from each square on an empty board, which the move orderer uses as a
//! cheap mobility estimate for quiet moves.
//!
//! ## Performance Characteristics
//!
//! - **Initialization**: a single pass over 64 squares on first use
//! - **Lookup**: O(1), direct array access

use std::sync::LazyLock;

use crate::board::{PieceKind, Square};
use crate::constants::{BISHOP_DIRS, KING_DELTAS, KNIGHT_DELTAS, ROOK_DIRS};

pub(crate) struct MoveTables {
    pub(crate) knight: [Vec<Square>; 64],
    pub(crate) king: [Vec<Square>; 64],
    /// Empty-board reach per piece kind, indexed `[kind][square]`
    mobility: [[u8; 64]; 6],
}

static TABLES: LazyLock<MoveTables> = LazyLock::new(MoveTables::build);

impl MoveTables {
    fn build() -> Self {
        let knight = std::array::from_fn(|i| leaper_targets(Square::new(i as u8), &KNIGHT_DELTAS));
        let king = std::array::from_fn(|i| leaper_targets(Square::new(i as u8), &KING_DELTAS));

        let mut mobility = [[0u8; 64]; 6];
        for square in Square::all() {
            let i = square.index();
            let rook = ray_length(square, &ROOK_DIRS);
            let bishop = ray_length(square, &BISHOP_DIRS);
            mobility[PieceKind::Pawn.index()][i] = 1;
            mobility[PieceKind::Knight.index()][i] = knight[i].len() as u8;
            mobility[PieceKind::Bishop.index()][i] = bishop;
            mobility[PieceKind::Rook.index()][i] = rook;
            mobility[PieceKind::Queen.index()][i] = rook + bishop;
            mobility[PieceKind::King.index()][i] = king[i].len() as u8;
        }

        MoveTables {
            knight,
            king,
            mobility,
        }
    }
}

#[inline]
pub(crate) fn tables() -> &'static MoveTables {
    &TABLES
}

/// Squares `kind` reaches from `square` with nothing else on the board
#[inline]
pub(crate) fn empty_board_mobility(kind: PieceKind, square: Square) -> i32 {
    i32::from(tables().mobility[kind.index()][square.index()])
}

fn leaper_targets(from: Square, deltas: &[(i8, i8)]) -> Vec<Square> {
    deltas
        .iter()
        .filter_map(|&(df, dr)| from.offset(df, dr))
        .collect()
}

fn ray_length(from: Square, dirs: &[(i8, i8)]) -> u8 {
    let mut count = 0;
    for &(df, dr) in dirs {
        let mut current = from;
        while let Some(next) = current.offset(df, dr) {
            count += 1;
            current = next;
        }
    }
    count
}
