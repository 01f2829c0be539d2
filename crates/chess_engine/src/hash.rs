//! Zobrist hashing
//!
//! Every position carries a 64-bit key. Keys are built from fixed-seed random
//! tables, so the same position hashes identically across runs and builds.
//! [`crate::move_gen`] keeps the key up to date incrementally; [`compute_key`]
//! rebuilds it from scratch for freshly parsed positions.
//!
//! Keys drive repetition detection and opening-book lookup.

use std::sync::LazyLock;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::board::{CastlingRights, Color, Piece, Position, Square};

/// Fixed seed for reproducible keys
const ZOBRIST_SEED: u64 = 0x5EED_C0DE_2024_0001;

pub(crate) struct ZobristKeys {
    pieces: [[u64; 64]; 12],
    castling: [u64; 16],
    en_passant_file: [u64; 8],
    black_to_move: u64,
}

static ZOBRIST: LazyLock<ZobristKeys> = LazyLock::new(ZobristKeys::generate);

impl ZobristKeys {
    fn generate() -> Self {
        let mut rng = StdRng::seed_from_u64(ZOBRIST_SEED);
        let mut keys = ZobristKeys {
            pieces: [[0; 64]; 12],
            castling: [0; 16],
            en_passant_file: [0; 8],
            black_to_move: rng.random(),
        };

        for piece_keys in keys.pieces.iter_mut() {
            for key in piece_keys.iter_mut() {
                *key = rng.random();
            }
        }
        for key in keys.castling.iter_mut() {
            *key = rng.random();
        }
        for key in keys.en_passant_file.iter_mut() {
            *key = rng.random();
        }

        keys
    }

    #[inline]
    pub(crate) fn piece(&self, piece: Piece, square: Square) -> u64 {
        self.pieces[piece.index()][square.index()]
    }

    #[inline]
    pub(crate) fn castling(&self, rights: CastlingRights) -> u64 {
        self.castling[rights.bits() as usize]
    }

    #[inline]
    pub(crate) fn en_passant(&self, square: Square) -> u64 {
        self.en_passant_file[square.file() as usize]
    }

    #[inline]
    pub(crate) fn side(&self) -> u64 {
        self.black_to_move
    }
}

#[inline]
pub(crate) fn keys() -> &'static ZobristKeys {
    &ZOBRIST
}

/// Compute a position's key from scratch
pub fn compute_key(position: &Position) -> u64 {
    let keys = keys();
    let mut key = 0u64;

    for (square, piece) in position.pieces() {
        key ^= keys.piece(piece, square);
    }
    key ^= keys.castling(position.castling());
    if let Some(square) = position.en_passant() {
        key ^= keys.en_passant(square);
    }
    if position.side_to_move() == Color::Black {
        key ^= keys.side();
    }

    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_stable_for_equal_positions() {
        let a = Position::startpos();
        let b = Position::from_fen(crate::constants::START_FEN).expect("valid");
        assert_eq!(a.key(), b.key());
        assert_eq!(compute_key(&a), a.key());
    }

    #[test]
    fn test_side_to_move_changes_key() {
        let white = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1").expect("valid");
        let black = Position::from_fen("4k3/8/8/8/8/8/8/4K3 b - - 0 1").expect("valid");
        assert_ne!(white.key(), black.key());
    }

    #[test]
    fn test_castling_rights_change_key() {
        let with = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("valid");
        let without = Position::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w - - 0 1").expect("valid");
        assert_ne!(with.key(), without.key());
    }
}
