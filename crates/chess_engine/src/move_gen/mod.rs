//! Legal move generation and game-end detection
//!
//! Moves are generated pseudo-legally per piece, then filtered by playing each
//! one on a copy of the position and rejecting those that leave the mover's
//! king attacked. Generation order is fixed (squares a1 to h8, then each
//! piece's own direction order), so the same position always yields the same
//! list in the same order.
//!
//! ## Module Organization
//!
//! - `tables` - Precomputed leaper targets and empty-board mobility
//! - `attack` - Square attack and check detection
//! - `pawn`, `knight`, `sliding`, `king` - Per-piece generators
//! - `make` - Copy-make move application with incremental hashing

mod attack;
mod king;
mod knight;
mod make;
mod pawn;
mod sliding;
mod tables;

use serde::Serialize;

use crate::board::{Color, PieceKind, Position};
use crate::constants::{BISHOP_DIRS, FIFTY_MOVE_LIMIT, ROOK_DIRS};
use crate::error::{EngineError, EngineResult};
use crate::moves::Move;

pub use attack::{is_in_check, is_square_attacked};
pub(crate) use make::make_move;
pub(crate) use tables::empty_board_mobility;

/// Every move the side to move could make, ignoring checks on its own king
pub fn generate_pseudo_legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move();
    let mut moves = Vec::with_capacity(48);

    for (from, piece) in position.pieces() {
        if piece.color != us {
            continue;
        }
        match piece.kind {
            PieceKind::Pawn => pawn::generate_pawn_moves(position, from, us, &mut moves),
            PieceKind::Knight => knight::generate_knight_moves(position, from, us, &mut moves),
            PieceKind::Bishop => {
                sliding::generate_sliding_moves(position, from, us, &BISHOP_DIRS, &mut moves)
            }
            PieceKind::Rook => {
                sliding::generate_sliding_moves(position, from, us, &ROOK_DIRS, &mut moves)
            }
            PieceKind::Queen => {
                sliding::generate_sliding_moves(position, from, us, &ROOK_DIRS, &mut moves);
                sliding::generate_sliding_moves(position, from, us, &BISHOP_DIRS, &mut moves);
            }
            PieceKind::King => king::generate_king_moves(position, from, us, &mut moves),
        }
    }

    moves
}

/// All legal moves for the side to move, in deterministic generation order
pub fn generate_legal_moves(position: &Position) -> Vec<Move> {
    let us = position.side_to_move();
    generate_pseudo_legal_moves(position)
        .into_iter()
        .filter(|&mv| !is_in_check(&make_move(position, mv), us))
        .collect()
}

/// Whether the side to move has at least one legal move
pub fn has_legal_move(position: &Position) -> bool {
    let us = position.side_to_move();
    generate_pseudo_legal_moves(position)
        .into_iter()
        .any(|mv| !is_in_check(&make_move(position, mv), us))
}

/// Play a move, returning the resulting position
///
/// # Errors
///
/// [`EngineError::IllegalMove`] when `mv` is not legal in `position`.
pub fn apply_move(position: &Position, mv: Move) -> EngineResult<Position> {
    if generate_legal_moves(position).contains(&mv) {
        Ok(make_move(position, mv))
    } else {
        Err(EngineError::IllegalMove {
            notation: mv.to_uci(),
            fen: position.to_fen(),
        })
    }
}

/// Whether playing `mv` puts the opponent in check
pub fn gives_check(position: &Position, mv: Move) -> bool {
    let next = make_move(position, mv);
    is_in_check(&next, next.side_to_move())
}

/// Why a position has no game left in it, if it has none
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerminalState {
    None,
    Checkmate,
    Stalemate,
    FiftyMoveDraw,
    RepetitionDraw,
    InsufficientMaterial,
}

impl TerminalState {
    #[inline]
    pub fn is_over(self) -> bool {
        self != TerminalState::None
    }
}

/// Classify `position`
///
/// `history` holds the keys of the positions that came before it in the game.
/// A third occurrence of the current key is a repetition draw. Checkmate and
/// stalemate take precedence over the draw rules.
pub fn is_terminal(position: &Position, history: &[u64]) -> TerminalState {
    if !has_legal_move(position) {
        return if is_in_check(position, position.side_to_move()) {
            TerminalState::Checkmate
        } else {
            TerminalState::Stalemate
        };
    }
    if position.halfmove_clock() >= FIFTY_MOVE_LIMIT {
        return TerminalState::FiftyMoveDraw;
    }
    if history.iter().filter(|&&key| key == position.key()).count() >= 2 {
        return TerminalState::RepetitionDraw;
    }
    if is_insufficient_material(position) {
        return TerminalState::InsufficientMaterial;
    }
    TerminalState::None
}

/// Bare kings, or kings plus a single knight or bishop
pub fn is_insufficient_material(position: &Position) -> bool {
    let mut minors = 0;
    for (_, piece) in position.pieces() {
        match piece.kind {
            PieceKind::King => {}
            PieceKind::Knight | PieceKind::Bishop => minors += 1,
            PieceKind::Pawn | PieceKind::Rook | PieceKind::Queen => return false,
        }
    }
    minors <= 1
}

/// Count of `color`'s pieces of `kind`
pub(crate) fn count_pieces(position: &Position, kind: PieceKind, color: Color) -> usize {
    position
        .pieces()
        .filter(|(_, piece)| piece.kind == kind && piece.color == color)
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;
    use crate::hash::compute_key;
    use crate::moves::parse_uci;

    const KIWIPETE: &str = "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R w KQkq - 0 1";

    fn perft(position: &Position, depth: u32) -> u64 {
        if depth == 0 {
            return 1;
        }
        let moves = generate_legal_moves(position);
        if depth == 1 {
            return moves.len() as u64;
        }
        moves
            .into_iter()
            .map(|mv| {
                let next = make_move(position, mv);
                assert_eq!(next.key(), compute_key(&next), "incremental key drifted after {mv}");
                perft(&next, depth - 1)
            })
            .sum()
    }

    fn fen(text: &str) -> Position {
        Position::from_fen(text).expect("valid test FEN")
    }

    #[test]
    fn test_perft_startpos() {
        let position = Position::startpos();
        assert_eq!(perft(&position, 1), 20);
        assert_eq!(perft(&position, 2), 400);
        assert_eq!(perft(&position, 3), 8_902);
    }

    #[test]
    fn test_perft_kiwipete() {
        let position = fen(KIWIPETE);
        assert_eq!(perft(&position, 1), 48);
        assert_eq!(perft(&position, 2), 2_039);
        assert_eq!(perft(&position, 3), 97_862);
    }

    #[test]
    fn test_perft_en_passant_and_pins() {
        let position = fen("8/2p5/3p4/KP5r/1R3p1k/8/4P1P1/8 w - - 0 1");
        assert_eq!(perft(&position, 1), 14);
        assert_eq!(perft(&position, 2), 191);
        assert_eq!(perft(&position, 3), 2_812);
    }

    #[test]
    fn test_perft_promotions() {
        let position = fen("rnbq1k1r/pp1Pbppp/2p5/8/2B5/8/PPP1NnPP/RNBQK2R w KQ - 1 8");
        assert_eq!(perft(&position, 1), 44);
        assert_eq!(perft(&position, 2), 1_486);
    }

    #[test]
    fn test_generation_is_deterministic() {
        let position = fen(KIWIPETE);
        assert_eq!(generate_legal_moves(&position), generate_legal_moves(&position));
    }

    #[test]
    fn test_castling_moves_rook() {
        let position = fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1");
        let castle = parse_uci(&position, "e1g1").expect("castling is legal");
        assert!(castle.is_castle());
        let next = apply_move(&position, castle).expect("legal");
        assert_eq!(next.piece_at(Square::F1).map(|p| p.kind), Some(PieceKind::Rook));
        assert_eq!(next.piece_at(Square::H1), None);
        assert_eq!(next.king_square(Color::White), Square::G1);
        assert_eq!(next.to_fen(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 1 1");
    }

    #[test]
    fn test_cannot_castle_through_check() {
        // Black rook on f8 covers f1
        let position = fen("4kr2/8/8/8/8/8/8/R3K2R w KQ - 0 1");
        assert!(parse_uci(&position, "e1g1").is_err());
        assert!(parse_uci(&position, "e1c1").is_ok());
    }

    #[test]
    fn test_en_passant_capture_removes_pawn() {
        let position = fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2");
        let mv = parse_uci(&position, "d5e6").expect("en passant");
        assert!(mv.is_en_passant());
        let next = apply_move(&position, mv).expect("legal");
        assert_eq!(next.piece_at(Square::E5), None);
        assert_eq!(next.key(), compute_key(&next));
    }

    #[test]
    fn test_double_push_sets_target_only_when_capturable() {
        let position = Position::startpos();
        let next = apply_move(&position, parse_uci(&position, "e2e4").expect("legal"))
            .expect("legal");
        assert_eq!(next.en_passant(), None);

        let position = fen("4k3/8/8/8/3p4/8/4P3/4K3 w - - 0 1");
        let next = apply_move(&position, parse_uci(&position, "e2e4").expect("legal"))
            .expect("legal");
        assert_eq!(next.en_passant(), Square::parse("e3"));
    }

    #[test]
    fn test_terminal_states() {
        let mate = fen("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert_eq!(is_terminal(&mate, &[]), TerminalState::Checkmate);

        let stalemate = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert_eq!(is_terminal(&stalemate, &[]), TerminalState::Stalemate);

        let fifty = fen("4k3/8/8/8/8/8/8/R3K3 w - - 100 80");
        assert_eq!(is_terminal(&fifty, &[]), TerminalState::FiftyMoveDraw);

        let bare = fen("4k3/8/8/8/8/8/8/2B1K3 w - - 0 1");
        assert_eq!(is_terminal(&bare, &[]), TerminalState::InsufficientMaterial);

        let start = Position::startpos();
        assert_eq!(is_terminal(&start, &[]), TerminalState::None);
        assert_eq!(
            is_terminal(&start, &[start.key(), 7, start.key()]),
            TerminalState::RepetitionDraw
        );
    }

    #[test]
    fn test_apply_move_rejects_foreign_move() {
        let position = Position::startpos();
        let other = fen("4k3/8/8/8/8/8/8/R3K3 w - - 0 1");
        let rook_move = parse_uci(&other, "a1a8").expect("legal in other position");
        assert!(matches!(
            apply_move(&position, rook_move),
            Err(EngineError::IllegalMove { .. })
        ));
    }

    #[test]
    fn test_count_pieces() {
        let position = Position::startpos();
        assert_eq!(count_pieces(&position, PieceKind::Pawn, Color::White), 8);
        assert_eq!(count_pieces(&position, PieceKind::Queen, Color::Black), 1);
    }
}
