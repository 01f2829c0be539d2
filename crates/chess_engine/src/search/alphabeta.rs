//! Alpha-beta search with negamax
//!
//! Recursive fail-soft negamax. Each child gets a copy of its parent's
//! position, so returning from a call needs no unmake step. Recursion depth
//! is bounded by the profile's depths plus check extensions and quiescence,
//! all far below [`MAX_PLY`].

use super::ordering::order_moves;
use super::quiescence::quiescence;
use super::{SearchContext, MAX_CHECK_EXTENSIONS};
use crate::board::Position;
use crate::constants::{AB_INF, DRAW_SCORE, FIFTY_MOVE_LIMIT, MATE_SCORE, MAX_PLY};
use crate::evaluation::evaluate;
use crate::move_gen::{generate_legal_moves, has_legal_move, is_in_check, make_move};
use crate::moves::Move;

/// Best move, its score and line at the root for one depth
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct RootOutcome {
    pub(super) best_move: Move,
    pub(super) score: i32,
    pub(super) pv: Vec<Move>,
}

/// Search the (already ordered and beam-cut) root moves to `depth`
///
/// Returns `None` only when `moves` is empty.
pub(super) fn search_root(
    ctx: &mut SearchContext,
    position: &Position,
    moves: &[Move],
    depth: i32,
    mut alpha: i32,
    beta: i32,
) -> Option<RootOutcome> {
    ctx.nodes += 1;
    let mut best: Option<RootOutcome> = None;
    let mut child_pv = Vec::new();

    for &mv in moves {
        let child = make_move(position, mv);
        let score = -negamax(ctx, &child, depth - 1, -beta, -alpha, 1, 0, &mut child_pv);

        if best.as_ref().map_or(true, |b| score > b.score) {
            let mut pv = Vec::with_capacity(child_pv.len() + 1);
            pv.push(mv);
            pv.extend_from_slice(&child_pv);
            best = Some(RootOutcome {
                best_move: mv,
                score,
                pv,
            });
        }
        if score > alpha {
            alpha = score;
        }
        if alpha >= beta {
            break;
        }
    }

    best
}

/// Negamax with alpha-beta pruning
///
/// Scores are from the side to move in `position`. Mates score
/// `MATE_SCORE - ply` so nearer mates are preferred. `pv` receives the best
/// line found below this node.
#[allow(clippy::too_many_arguments)]
pub(super) fn negamax(
    ctx: &mut SearchContext,
    position: &Position,
    mut depth: i32,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    mut extensions: u8,
    pv: &mut Vec<Move>,
) -> i32 {
    ctx.nodes += 1;
    pv.clear();

    if ctx.is_draw(position) {
        return DRAW_SCORE;
    }
    if ply >= MAX_PLY {
        return evaluate(position, ctx.profile.evaluation_complexity);
    }

    let in_check = is_in_check(position, position.side_to_move());
    if position.halfmove_clock() >= FIFTY_MOVE_LIMIT {
        return if in_check && !has_legal_move(position) {
            -(MATE_SCORE - ply as i32)
        } else {
            DRAW_SCORE
        };
    }
    if in_check && extensions < MAX_CHECK_EXTENSIONS {
        depth += 1;
        extensions += 1;
    }

    if depth <= 0 {
        return if ctx.profile.use_quiescence {
            quiescence(ctx, position, alpha, beta, ply, 0, pv)
        } else {
            evaluate(position, ctx.profile.evaluation_complexity)
        };
    }

    let moves = generate_legal_moves(position);
    if moves.is_empty() {
        return if in_check {
            -(MATE_SCORE - ply as i32)
        } else {
            DRAW_SCORE
        };
    }

    ctx.push(position.key());
    let mut best = -AB_INF;
    let mut child_pv = Vec::new();

    for mv in order_moves(position, moves) {
        let child = make_move(position, mv);
        let score = -negamax(
            ctx,
            &child,
            depth - 1,
            -beta,
            -alpha,
            ply + 1,
            extensions,
            &mut child_pv,
        );

        if score > best {
            best = score;
            if score > alpha {
                alpha = score;
                pv.clear();
                pv.push(mv);
                pv.extend_from_slice(&child_pv);
            }
        }
        if alpha >= beta {
            break;
        }
    }

    ctx.pop();
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MATE_THRESHOLD;
    use crate::profile::resolve_profile;

    fn fen(text: &str) -> Position {
        Position::from_fen(text).expect("valid test FEN")
    }

    fn root_search(position: &Position, level: i32, depth: i32) -> RootOutcome {
        let profile = resolve_profile(level).expect("valid level");
        let mut ctx = SearchContext::new(&profile, &[], position);
        let moves = order_moves(position, generate_legal_moves(position));
        search_root(&mut ctx, position, &moves, depth, -AB_INF, AB_INF).expect("moves exist")
    }

    #[test]
    fn test_finds_back_rank_mate() {
        let position = fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let outcome = root_search(&position, 4, 2);
        assert_eq!(outcome.best_move.to_uci(), "a1a8");
        assert!(outcome.score >= MATE_THRESHOLD, "score {} is not a mate", outcome.score);
        assert_eq!(outcome.pv[0], outcome.best_move);
    }

    #[test]
    fn test_takes_free_queen() {
        let position = fen("4k3/8/8/3q4/4P3/8/8/4K3 w - - 0 1");
        let outcome = root_search(&position, 3, 2);
        assert_eq!(outcome.best_move.to_uci(), "e4d5");
    }

    #[test]
    fn test_stalemate_scores_zero() {
        let position = fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        let profile = resolve_profile(4).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &Position::startpos());
        let mut pv = Vec::new();
        let score = negamax(&mut ctx, &position, 2, -AB_INF, AB_INF, 1, 0, &mut pv);
        assert_eq!(score, DRAW_SCORE);
        assert!(pv.is_empty());
    }

    #[test]
    fn test_mate_beats_the_fifty_move_rule() {
        let mated = fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 100 80");
        let profile = resolve_profile(4).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &Position::startpos());
        let mut pv = Vec::new();
        let score = negamax(&mut ctx, &mated, 2, -AB_INF, AB_INF, 1, 0, &mut pv);
        assert_eq!(score, -(MATE_SCORE - 1));

        let quiet = fen("6k1/5ppp/8/8/8/8/8/R5K1 b - - 100 80");
        let score = negamax(&mut ctx, &quiet, 2, -AB_INF, AB_INF, 1, 0, &mut pv);
        assert_eq!(score, DRAW_SCORE);
    }

    #[test]
    fn test_history_repetition_is_a_draw() {
        let position = fen("4k3/8/8/8/8/8/8/R3K3 b - - 0 1");
        let profile = resolve_profile(4).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[position.key()], &Position::startpos());
        let mut pv = Vec::new();
        let score = negamax(&mut ctx, &position, 3, -AB_INF, AB_INF, 1, 0, &mut pv);
        assert_eq!(score, DRAW_SCORE);
    }
}
