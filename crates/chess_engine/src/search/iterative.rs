//! Iterative deepening search
//!
//! Searches depth `min_depth`, then one ply deeper after each completed
//! depth, until the profile's target depth is reached or the budget
//! controller calls a stop. A depth is never abandoned halfway: the budget
//! is read only between depths, so the reported move always comes from a
//! fully searched depth. If time is left after the target depth (under
//! [`super::BONUS_DEPTH_FRACTION`] of the abort limit), the search carries on
//! toward the profile's hard cap.
//!
//! From the second depth on, a profile with aspiration enabled first searches
//! a narrow window around the previous score and falls back to a full window
//! when the result lands outside it.

use super::alphabeta::{search_root, RootOutcome};
use super::ordering::order_root_moves;
use super::time::{BudgetController, Verdict};
use super::SearchContext;
use crate::api::AbortReason;
use crate::board::Position;
use crate::constants::{AB_INF, MATE_THRESHOLD};
use crate::error::{invariant_violation, EngineResult};
use crate::move_gen::generate_legal_moves;
use crate::moves::Move;
use crate::profile::DifficultyProfile;

/// Result of one iterative deepening run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub best_move: Move,
    /// Centipawns from the side to move's point of view
    pub score: i32,
    pub depth_reached: u8,
    pub nodes: u64,
    pub principal_variation: Vec<Move>,
    pub abort_reason: AbortReason,
}

/// Time-budgeted iterative deepening from `position`
///
/// `history` holds the keys of the game positions before `position`.
///
/// # Errors
///
/// [`crate::EngineError::InvariantViolation`] when `position` has no legal
/// moves or a completed depth produced no move. Running out of time is not
/// an error.
pub fn iterative_deepening(
    position: &Position,
    profile: &DifficultyProfile,
    history: &[u64],
    controller: &BudgetController,
) -> EngineResult<SearchOutcome> {
    let root_moves = generate_legal_moves(position);
    if root_moves.is_empty() {
        return Err(invariant_violation(
            position,
            "search started on a position with no legal moves",
        ));
    }

    let mut ctx = SearchContext::new(profile, history, position);
    let mut best: Option<RootOutcome> = None;
    let mut depth = profile.min_depth;

    let (outcome, depth_reached, abort_reason) = loop {
        let ordered = order_root_moves(
            position,
            root_moves.clone(),
            profile,
            best.as_ref().map(|b| b.best_move),
        );
        let previous_score = best.as_ref().map(|b| b.score);
        let outcome = aspiration_search(&mut ctx, position, &ordered, depth, previous_score)?;

        let elapsed = controller.elapsed_ms();
        tracing::debug!(
            "[SEARCH] depth {} | best {} | score {} | nodes {} | {}ms",
            depth,
            outcome.best_move,
            outcome.score,
            ctx.nodes,
            elapsed
        );
        if depth == profile.min_depth && !super::should_continue(elapsed, controller.budget()) {
            tracing::warn!(
                "[SEARCH] first depth {} alone took {}ms of a {}ms abort limit",
                depth,
                elapsed,
                controller.budget().abort_limit_ms()
            );
        }

        let found_mate = outcome.score >= MATE_THRESHOLD;
        if found_mate || depth >= profile.hard_cap_depth {
            break (outcome, depth, AbortReason::Completed);
        }

        match controller.verdict_at(elapsed) {
            Verdict::Cancelled => break (outcome, depth, AbortReason::Cancelled),
            Verdict::TimeExhausted if depth >= profile.target_depth => {
                break (outcome, depth, AbortReason::Completed)
            }
            Verdict::TimeExhausted => break (outcome, depth, AbortReason::TimeExhausted),
            Verdict::Continue => {
                if depth >= profile.target_depth && !controller.allows_bonus_depth_at(elapsed) {
                    break (outcome, depth, AbortReason::Completed);
                }
            }
        }

        best = Some(outcome);
        depth += 1;
    };

    Ok(SearchOutcome {
        best_move: outcome.best_move,
        score: outcome.score,
        depth_reached,
        nodes: ctx.nodes,
        principal_variation: outcome.pv,
        abort_reason,
    })
}

/// One depth, narrow window first when the profile allows it
fn aspiration_search(
    ctx: &mut SearchContext,
    position: &Position,
    moves: &[Move],
    depth: u8,
    previous_score: Option<i32>,
) -> EngineResult<RootOutcome> {
    let depth = i32::from(depth);

    let profile = ctx.profile;
    let previous = previous_score.filter(|s| profile.use_aspiration && s.abs() < MATE_THRESHOLD);
    if let Some(previous) = previous {
        let window = profile.aspiration_window_cp;
        let (alpha, beta) = (previous - window, previous + window);
        if let Some(outcome) = search_root(ctx, position, moves, depth, alpha, beta) {
            if outcome.score > alpha && outcome.score < beta {
                return Ok(outcome);
            }
            tracing::trace!(
                "[SEARCH] aspiration miss at depth {}: {} outside ({}, {})",
                depth,
                outcome.score,
                alpha,
                beta
            );
        }
    }

    search_root(ctx, position, moves, depth, -AB_INF, AB_INF)
        .ok_or_else(|| invariant_violation(position, "completed depth produced no move"))
}
