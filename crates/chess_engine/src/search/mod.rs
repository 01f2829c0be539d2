//! Alpha-beta search with iterative deepening
//!
//! This module implements the CPU opponent's search using:
//! - Negamax variant of alpha-beta pruning (fail-soft, recursive)
//! - Quiescence search on captures, promotions and first-ply checks
//! - Aspiration windows around the previous depth's score
//! - Iterative deepening driven by a wall-clock budget
//! - Move ordering and a root beam for better pruning
//!
//! Positions are copied, never mutated, so each node owns its position on
//! the call stack and nothing outlives a single search.
//!
//! ## Module Organization
//!
//! - `alphabeta` - Core negamax search and root search
//! - `quiescence` - Quiescence search to avoid horizon effect
//! - `ordering` - Move ordering heuristics and root beam
//! - `iterative` - Iterative deepening and aspiration windows
//! - `time` - Time budget, clocks and cancellation

mod alphabeta;
mod iterative;
mod ordering;
mod quiescence;
mod time;

pub use iterative::{iterative_deepening, SearchOutcome};
pub use ordering::{order_moves, order_root_moves};
pub use time::{
    should_continue, BudgetController, CancellationToken, Clock, ManualClock, SteppingClock,
    TimeBudget, Verdict, WallClock, BONUS_DEPTH_FRACTION, DEFAULT_ABORT_THRESHOLD_FRACTION,
    DEFAULT_GRACE_MS, DEFAULT_TOTAL_BUDGET_MS, HARD_CEILING_MS,
};

use crate::board::Position;
use crate::move_gen::is_insufficient_material;
use crate::profile::DifficultyProfile;

/// Most check extensions a single line may take
pub(crate) const MAX_CHECK_EXTENSIONS: u8 = 2;

/// Per-search state threaded through the tree walk
pub(crate) struct SearchContext<'a> {
    pub(crate) profile: &'a DifficultyProfile,
    pub(crate) nodes: u64,
    /// Game history followed by the keys of the current line, root included
    line: Vec<u64>,
}

impl<'a> SearchContext<'a> {
    pub(crate) fn new(profile: &'a DifficultyProfile, history: &[u64], root: &Position) -> Self {
        let mut line = Vec::with_capacity(history.len() + 32);
        line.extend_from_slice(history);
        line.push(root.key());
        SearchContext {
            profile,
            nodes: 0,
            line,
        }
    }

    #[inline]
    pub(crate) fn push(&mut self, key: u64) {
        self.line.push(key);
    }

    #[inline]
    pub(crate) fn pop(&mut self) {
        self.line.pop();
    }

    /// Drawn by repetition or bare material below the root
    ///
    /// Neither can coincide with checkmate. The fifty-move rule can, so the
    /// search checks it separately once mate is ruled out.
    pub(crate) fn is_draw(&self, position: &Position) -> bool {
        self.line.contains(&position.key()) || is_insufficient_material(position)
    }
}
