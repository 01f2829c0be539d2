//! Standard algebraic notation and move-list replay
//!
//! SAN is produced for display and diagnostics only; the engine itself works
//! in [`Move`] values and coordinate notation.

use crate::board::{PieceKind, Position};
use crate::error::EngineResult;
use crate::move_gen::{apply_move, generate_legal_moves, has_legal_move, is_in_check, make_move};
use crate::moves::{parse_uci, Move, MoveFlags};

/// Render `mv` in standard algebraic notation, e.g. `Nbd7`, `exd5`, `e8=Q+`, `O-O#`
///
/// `mv` must be legal in `position`.
pub fn to_san(position: &Position, mv: Move) -> String {
    let mut san = String::with_capacity(8);

    if mv.flags().contains(MoveFlags::CASTLE_KINGSIDE) {
        san.push_str("O-O");
    } else if mv.flags().contains(MoveFlags::CASTLE_QUEENSIDE) {
        san.push_str("O-O-O");
    } else {
        let kind = position
            .piece_at(mv.from())
            .map_or(PieceKind::Pawn, |piece| piece.kind);

        if kind == PieceKind::Pawn {
            if mv.is_capture() {
                san.push((b'a' + mv.from().file()) as char);
            }
        } else {
            san.push(kind.to_char().to_ascii_uppercase());
            san.push_str(&disambiguation(position, mv, kind));
        }

        if mv.is_capture() {
            san.push('x');
        }
        san.push_str(&mv.to().to_string());

        if let Some(promotion) = mv.promotion() {
            san.push('=');
            san.push(promotion.to_char().to_ascii_uppercase());
        }
    }

    let next = make_move(position, mv);
    if is_in_check(&next, next.side_to_move()) {
        san.push(if has_legal_move(&next) { '+' } else { '#' });
    }

    san
}

/// File, rank, or full square of the origin when another piece of the same
/// kind could also reach the destination
fn disambiguation(position: &Position, mv: Move, kind: PieceKind) -> String {
    let rivals: Vec<Move> = generate_legal_moves(position)
        .into_iter()
        .filter(|other| {
            other.to() == mv.to()
                && other.from() != mv.from()
                && position.piece_at(other.from()).map(|p| p.kind) == Some(kind)
        })
        .collect();

    if rivals.is_empty() {
        return String::new();
    }

    let from = mv.from();
    let file = (b'a' + from.file()) as char;
    let rank = (b'1' + from.rank()) as char;
    if rivals.iter().all(|other| other.from().file() != from.file()) {
        file.to_string()
    } else if rivals.iter().all(|other| other.from().rank() != from.rank()) {
        rank.to_string()
    } else {
        format!("{file}{rank}")
    }
}

/// SAN for a sequence of moves played from `position`
///
/// # Errors
///
/// [`crate::EngineError::IllegalMove`] if any move is not legal where it is played.
pub fn line_to_san(position: &Position, line: &[Move]) -> EngineResult<Vec<String>> {
    let mut current = *position;
    let mut sans = Vec::with_capacity(line.len());
    for &mv in line {
        let next = apply_move(&current, mv)?;
        sans.push(to_san(&current, mv));
        current = next;
    }
    Ok(sans)
}

/// Play coordinate-notation moves from `start`
///
/// Returns the final position together with the keys of every position before
/// it (the start included), ready to pass as search history.
///
/// # Errors
///
/// The first move that fails to parse or is illegal where it is played.
pub fn replay_uci<S: AsRef<str>>(
    start: &Position,
    moves: &[S],
) -> EngineResult<(Position, Vec<u64>)> {
    let mut current = *start;
    let mut history = Vec::with_capacity(moves.len());
    for text in moves {
        let mv = parse_uci(&current, text.as_ref())?;
        history.push(current.key());
        current = make_move(&current, mv);
    }
    Ok((current, history))
}
