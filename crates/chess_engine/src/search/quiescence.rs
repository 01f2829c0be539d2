//! Quiescence search to avoid horizon effect
//!
//! Past the nominal depth only noisy moves are searched: captures and
//! promotions at every quiescence ply, plus quiet checks on the first one.
//! Quiet checks past the first quiescence ply are not searched.
//! A side that is not in check may "stand pat" on the static evaluation.
//! A side in check must answer it, so every evasion is searched instead.
//!
//! Depth is capped by the profile's `quiescence_max_depth`.

use super::ordering::order_moves;
use super::SearchContext;
use crate::board::Position;
use crate::constants::{DRAW_SCORE, MATE_SCORE, MAX_PLY};
use crate::evaluation::evaluate;
use crate::move_gen::{generate_legal_moves, is_in_check, make_move};
use crate::moves::Move;

pub(super) fn quiescence(
    ctx: &mut SearchContext,
    position: &Position,
    mut alpha: i32,
    beta: i32,
    ply: usize,
    qs_depth: u8,
    pv: &mut Vec<Move>,
) -> i32 {
    ctx.nodes += 1;
    pv.clear();

    let complexity = ctx.profile.evaluation_complexity;
    let in_check = is_in_check(position, position.side_to_move());
    let at_limit = qs_depth >= ctx.profile.quiescence_max_depth || ply >= MAX_PLY;

    let mut best = if in_check {
        if at_limit {
            return evaluate(position, complexity);
        }
        -(MATE_SCORE - ply as i32)
    } else {
        let stand_pat = evaluate(position, complexity);
        if stand_pat >= beta || at_limit {
            return stand_pat;
        }
        if stand_pat > alpha {
            alpha = stand_pat;
        }
        stand_pat
    };

    let legal = generate_legal_moves(position);
    if legal.is_empty() {
        return if in_check {
            -(MATE_SCORE - ply as i32)
        } else {
            DRAW_SCORE
        };
    }

    let candidates: Vec<Move> = if in_check {
        legal
    } else {
        legal
            .into_iter()
            .filter(|&mv| {
                mv.is_capture()
                    || mv.is_promotion()
                    || (qs_depth == 0 && {
                        let child = make_move(position, mv);
                        is_in_check(&child, child.side_to_move())
                    })
            })
            .collect()
    };

    let mut child_pv = Vec::new();
    for mv in order_moves(position, candidates) {
        let child = make_move(position, mv);
        let score = -quiescence(ctx, &child, -beta, -alpha, ply + 1, qs_depth + 1, &mut child_pv);

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

    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::AB_INF;
    use crate::evaluation::EvaluationComplexity;
    use crate::profile::resolve_profile;

    fn fen(text: &str) -> Position {
        Position::from_fen(text).expect("valid test FEN")
    }

    #[test]
    fn test_quiet_position_returns_stand_pat() {
        let position = fen("4k3/8/8/8/8/8/8/4K3 w - - 0 1");
        let profile = resolve_profile(6).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &position);
        let mut pv = Vec::new();
        let score = quiescence(&mut ctx, &position, -AB_INF, AB_INF, 0, 0, &mut pv);
        assert_eq!(score, evaluate(&position, EvaluationComplexity::Full));
        assert!(pv.is_empty());
    }

    #[test]
    fn test_sees_the_recapture() {
        // Qxd5 is met by exd5; quiescence must not count the queen grab as a win
        let position = fen("4k3/8/4p3/3p4/8/8/3Q4/4K3 w - - 0 1");
        let profile = resolve_profile(6).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &position);
        let mut pv = Vec::new();
        let score = quiescence(&mut ctx, &position, -AB_INF, AB_INF, 0, 0, &mut pv);
        let static_eval = evaluate(&position, EvaluationComplexity::Full);
        assert!(score >= static_eval, "stand pat is a lower bound");
        assert!(pv.first().map_or(true, |mv| mv.to_uci() != "d2d5"));
    }

    #[test]
    fn test_first_ply_quiet_check_finds_mate() {
        let position = fen("6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 1");
        let profile = resolve_profile(6).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &position);
        let mut pv = Vec::new();
        let score = quiescence(&mut ctx, &position, -AB_INF, AB_INF, 0, 0, &mut pv);
        assert_eq!(score, MATE_SCORE - 1);
        assert_eq!(pv[0].to_uci(), "a1a8");
    }

    #[test]
    fn test_wins_hanging_piece() {
        let position = fen("4k3/8/8/3r4/8/8/3Q4/4K3 w - - 0 1");
        let profile = resolve_profile(6).expect("valid");
        let mut ctx = SearchContext::new(&profile, &[], &position);
        let mut pv = Vec::new();
        let score = quiescence(&mut ctx, &position, -AB_INF, AB_INF, 0, 0, &mut pv);
        assert!(score > evaluate(&position, EvaluationComplexity::Full) + 300);
        assert_eq!(pv[0].to_uci(), "d2d5");
    }
}
