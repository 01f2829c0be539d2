//! Move ordering for alpha-beta pruning
//!
//! Orders moves to maximize alpha-beta pruning efficiency by trying
//! the most forcing moves first:
//!
//! 1. Captures, by MVV-LVA (victim value x 10 - attacker value)
//! 2. Promotions, by promoted piece value
//! 3. Checks
//! 4. Quiet moves, by destination centrality plus the mobility gained
//!
//! The sort is stable, so equal scores keep move-generation order and the
//! result is fully deterministic.

use crate::board::{PieceKind, Position, Square};
use crate::move_gen::{empty_board_mobility, gives_check};
use crate::moves::Move;
use crate::profile::DifficultyProfile;

/// Kings carry no material value, but capturing with one is the least desirable attacker
const KING_ATTACKER_VALUE: i32 = 1_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Category {
    Quiet,
    Check,
    Promotion,
    Capture,
}

fn attacker_value(kind: PieceKind) -> i32 {
    match kind {
        PieceKind::King => KING_ATTACKER_VALUE,
        other => other.value(),
    }
}

/// 0 in the corners up to 6 on d4/e4/d5/e5
fn centrality(square: Square) -> i32 {
    let file_distance = (2 * i32::from(square.file()) - 7).abs();
    let rank_distance = (2 * i32::from(square.rank()) - 7).abs();
    7 - (file_distance + rank_distance) / 2
}

fn score_move(position: &Position, mv: Move) -> (Category, i32) {
    let attacker = position
        .piece_at(mv.from())
        .map_or(PieceKind::Pawn, |piece| piece.kind);

    if mv.is_capture() {
        let victim = if mv.is_en_passant() {
            PieceKind::Pawn
        } else {
            position
                .piece_at(mv.to())
                .map_or(PieceKind::Pawn, |piece| piece.kind)
        };
        let promotion = mv.promotion().map_or(0, PieceKind::value);
        return (
            Category::Capture,
            victim.value() * 10 - attacker_value(attacker) + promotion,
        );
    }

    if let Some(kind) = mv.promotion() {
        return (Category::Promotion, kind.value());
    }

    if gives_check(position, mv) {
        return (Category::Check, 0);
    }

    let mobility_delta =
        empty_board_mobility(attacker, mv.to()) - empty_board_mobility(attacker, mv.from());
    (Category::Quiet, centrality(mv.to()) * 5 + mobility_delta)
}

/// Order moves for better alpha-beta pruning, best first
pub fn order_moves(position: &Position, moves: Vec<Move>) -> Vec<Move> {
    let mut scored: Vec<((Category, i32), Move)> = moves
        .into_iter()
        .map(|mv| (score_move(position, mv), mv))
        .collect();

    // Vec::sort_by is stable: ties stay in generation order
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, mv)| mv).collect()
}

/// Order root moves and apply the profile's beam
///
/// The previous iteration's best move goes first. The beam is cut after
/// ordering, so it always keeps that move. Checking moves are never cut:
/// a quiet mate ranks below every capture and would otherwise fall off a
/// narrow beam unsearched.
pub fn order_root_moves(
    position: &Position,
    moves: Vec<Move>,
    profile: &DifficultyProfile,
    pv_move: Option<Move>,
) -> Vec<Move> {
    let mut ordered = order_moves(position, moves);

    if let Some(pv_move) = pv_move {
        if let Some(index) = ordered.iter().position(|&mv| mv == pv_move) {
            let mv = ordered.remove(index);
            ordered.insert(0, mv);
        }
    }

    let keep = profile.beam_width.keep(ordered.len());
    let mut rank = 0;
    ordered.retain(|&mv| {
        rank += 1;
        rank <= keep || gives_check(position, mv)
    });
    ordered
}
