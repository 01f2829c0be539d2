//! King move generation, castling included
//!
//! Castling requires the right to be present, the squares between king and
//! rook to be empty, and the king not to start on, pass through, or land on an
//! attacked square. Landing safety is left to the legality filter like any
//! other king move.

use super::attack::is_square_attacked;
use super::tables::tables;
use crate::board::{CastlingRights, Color, Piece, PieceKind, Position, Square};
use crate::moves::{Move, MoveFlags};

pub(super) fn generate_king_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut Vec<Move>,
) {
    for &to in &tables().king[from.index()] {
        match position.piece_at(to) {
            None => moves.push(Move::new(from, to, MoveFlags::empty())),
            Some(piece) if piece.color != color => {
                moves.push(Move::new(from, to, MoveFlags::CAPTURE))
            }
            Some(_) => {}
        }
    }

    generate_castling_moves(position, from, color, moves);
}

fn generate_castling_moves(
    position: &Position,
    from: Square,
    color: Color,
    moves: &mut Vec<Move>,
) {
    let rights = position.castling();
    let kingside = rights.contains(CastlingRights::kingside(color));
    let queenside = rights.contains(CastlingRights::queenside(color));
    if !kingside && !queenside {
        return;
    }

    let rank = color.home_rank();
    if from != Square::from_coords(4, rank) {
        return;
    }
    let enemy = color.opposite();
    if is_square_attacked(position, from, enemy) {
        return;
    }

    let rook = Some(Piece::new(PieceKind::Rook, color));
    let empty = |file: u8| position.piece_at(Square::from_coords(file, rank)).is_none();
    let safe = |file: u8| !is_square_attacked(position, Square::from_coords(file, rank), enemy);

    if kingside
        && position.piece_at(Square::from_coords(7, rank)) == rook
        && empty(5)
        && empty(6)
        && safe(5)
        && safe(6)
    {
        moves.push(Move::new(
            from,
            Square::from_coords(6, rank),
            MoveFlags::CASTLE_KINGSIDE,
        ));
    }

    if queenside
        && position.piece_at(Square::from_coords(0, rank)) == rook
        && empty(1)
        && empty(2)
        && empty(3)
        && safe(2)
        && safe(3)
    {
        moves.push(Move::new(
            from,
            Square::from_coords(2, rank),
            MoveFlags::CASTLE_QUEENSIDE,
        ));
    }
}
