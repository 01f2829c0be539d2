//! Copy-make move application
//!
//! [`make_move`] returns a new [`Position`] and leaves its input untouched.
//! The zobrist key is updated incrementally: every piece, castling, en-passant
//! and side change XORs out the old contribution and XORs in the new one.

use crate::board::{CastlingRights, Color, Piece, PieceKind, Position, Square};
use crate::hash::keys;
use crate::moves::{Move, MoveFlags};

/// Apply a move produced by the generator for `position`
///
/// The move is trusted: callers that accept moves from outside go through
/// [`super::apply_move`], which checks legality first.
pub(crate) fn make_move(position: &Position, mv: Move) -> Position {
    let keys = keys();
    let mut next = *position;
    let us = position.side_to_move;
    let them = us.opposite();
    let from = mv.from();
    let to = mv.to();

    let Some(piece) = position.board[from.index()] else {
        debug_assert!(false, "no piece on {from} for {mv} in {}", position.to_fen());
        return next;
    };

    let mut key = position.key;
    if let Some(ep) = position.en_passant {
        key ^= keys.en_passant(ep);
    }
    key ^= keys.castling(position.castling);

    next.board[from.index()] = None;
    key ^= keys.piece(piece, from);

    let mut captured = false;
    if mv.is_en_passant() {
        if let Some(victim_square) = to.offset(0, -us.forward()) {
            if let Some(victim) = next.board[victim_square.index()].take() {
                key ^= keys.piece(victim, victim_square);
                captured = true;
            }
        }
    } else if let Some(victim) = next.board[to.index()].take() {
        key ^= keys.piece(victim, to);
        captured = true;
    }

    let placed = match mv.promotion() {
        Some(kind) => Piece::new(kind, us),
        None => piece,
    };
    next.board[to.index()] = Some(placed);
    key ^= keys.piece(placed, to);

    if mv.is_castle() {
        let rank = us.home_rank();
        let (rook_from, rook_to) = if mv.flags().contains(MoveFlags::CASTLE_KINGSIDE) {
            (Square::from_coords(7, rank), Square::from_coords(5, rank))
        } else {
            (Square::from_coords(0, rank), Square::from_coords(3, rank))
        };
        if let Some(rook) = next.board[rook_from.index()].take() {
            next.board[rook_to.index()] = Some(rook);
            key ^= keys.piece(rook, rook_from) ^ keys.piece(rook, rook_to);
        }
    }

    if piece.kind == PieceKind::King {
        next.king_squares[us.index()] = to;
    }

    next.castling
        .remove(CastlingRights::touched_by(from) | CastlingRights::touched_by(to));
    key ^= keys.castling(next.castling);

    next.side_to_move = them;
    key ^= keys.side();

    // Target recorded only when the opponent can capture onto it
    next.en_passant = None;
    if mv.flags().contains(MoveFlags::DOUBLE_PAWN_PUSH) {
        if let Some(target) = from.offset(0, us.forward()) {
            if next.en_passant_capturable(target) {
                next.en_passant = Some(target);
                key ^= keys.en_passant(target);
            }
        }
    }

    next.halfmove_clock = if piece.kind == PieceKind::Pawn || captured {
        0
    } else {
        position.halfmove_clock + 1
    };
    if them == Color::White {
        next.fullmove_number += 1;
    }

    next.key = key;
    next
}
