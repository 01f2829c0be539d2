//! CPU move selection
//!
//! The single entry point the game calls when it is the CPU's turn. A request
//! is answered by the first of these that applies:
//!
//! 1. exactly one legal move: play it without searching
//! 2. the opening book knows the position: play the book reply
//! 3. otherwise run the time-budgeted iterative deepening search
//!
//! The difficulty level is validated before any of that, so a bad request
//! fails before the engine does any work.

use std::sync::Arc;

use super::result::{AbortReason, SearchResult};
use crate::board::Position;
use crate::book::{pick_opening_move, should_use_opening_book};
use crate::error::{EngineError, EngineResult};
use crate::evaluation::evaluate;
use crate::move_gen::generate_legal_moves;
use crate::moves::Move;
use crate::notation::{line_to_san, to_san};
use crate::profile::{resolve_profile, DifficultyProfile};
use crate::search::{
    iterative_deepening, BudgetController, CancellationToken, Clock, TimeBudget, WallClock,
    HARD_CEILING_MS,
};

/// Everything one move request carries
#[derive(Debug, Clone)]
pub struct SearchRequest {
    pub position: Position,
    /// CPU level; validated when the request is served
    pub level: i32,
    /// Full move number as the game counts it, used for the book window
    pub move_number: u32,
    /// Keys of the game positions before `position`, oldest first
    pub history: Vec<u64>,
    pub budget_override_ms: Option<u64>,
    pub cancel: Option<CancellationToken>,
}

impl SearchRequest {
    pub fn new(position: Position, level: i32, move_number: u32) -> Self {
        SearchRequest {
            position,
            level,
            move_number,
            history: Vec::new(),
            budget_override_ms: None,
            cancel: None,
        }
    }

    pub fn with_history(mut self, history: Vec<u64>) -> Self {
        self.history = history;
        self
    }

    pub fn with_budget_override(mut self, budget_ms: u64) -> Self {
        self.budget_override_ms = Some(budget_ms);
        self
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }
}

/// Picks the CPU's move within a wall-clock budget
#[derive(Clone)]
pub struct MoveSelector {
    budget: TimeBudget,
    ceiling_ms: u64,
    clock: Arc<dyn Clock>,
}

impl Default for MoveSelector {
    fn default() -> Self {
        Self::new(TimeBudget::default())
    }
}

impl MoveSelector {
    pub fn new(budget: TimeBudget) -> Self {
        MoveSelector {
            budget,
            ceiling_ms: HARD_CEILING_MS,
            clock: Arc::new(WallClock::new()),
        }
    }

    /// Largest budget a per-request override may ask for
    pub fn with_ceiling(mut self, ceiling_ms: u64) -> Self {
        self.ceiling_ms = ceiling_ms;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[inline]
    pub fn budget(&self) -> &TimeBudget {
        &self.budget
    }

    /// Choose a move for the side to move in `position`
    pub fn select_move(
        &self,
        position: &Position,
        level: i32,
        move_number: u32,
    ) -> EngineResult<SearchResult> {
        self.select(&SearchRequest::new(*position, level, move_number))
    }

    /// Serve a full request
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidLevel`] when the level is outside 1-10
    /// - [`EngineError::NoLegalMoves`] when the game is already over
    /// - [`EngineError::InvariantViolation`] when the search breaks an internal invariant
    pub fn select(&self, request: &SearchRequest) -> EngineResult<SearchResult> {
        let profile = resolve_profile(request.level)?;
        let position = &request.position;
        let budget = self
            .budget
            .with_override(request.budget_override_ms, self.ceiling_ms);
        let controller =
            BudgetController::start(budget, self.clock.as_ref(), request.cancel.as_ref());

        let legal = generate_legal_moves(position);
        let result = match legal.as_slice() {
            [] => {
                return Err(EngineError::NoLegalMoves {
                    fen: position.to_fen(),
                })
            }
            [only] => without_search(
                position,
                &profile,
                *only,
                AbortReason::ForcedSingleMove,
                None,
                controller.elapsed_ms(),
            ),
            _ => {
                let book = should_use_opening_book(position, request.move_number, &profile)
                    .then(|| pick_opening_move(position))
                    .flatten();
                match book {
                    Some(book) => without_search(
                        position,
                        &profile,
                        book.mv,
                        AbortReason::OpeningBook,
                        Some(book.opening),
                        controller.elapsed_ms(),
                    ),
                    None => {
                        let outcome =
                            iterative_deepening(position, &profile, &request.history, &controller)?;
                        SearchResult {
                            best_move: outcome.best_move,
                            san: to_san(position, outcome.best_move),
                            uci: outcome.best_move.to_uci(),
                            level: profile.level,
                            depth_reached: outcome.depth_reached,
                            nodes_searched: outcome.nodes,
                            evaluation_cp: outcome.score,
                            principal_variation_san: line_to_san(
                                position,
                                &outcome.principal_variation,
                            )?,
                            principal_variation: outcome.principal_variation,
                            elapsed_ms: controller.elapsed_ms(),
                            abort_reason: outcome.abort_reason,
                            opening: None,
                        }
                    }
                }
            }
        };

        tracing::info!(
            "[SELECT] level {} | {} ({}) | depth {} | {} nodes | eval {} | {}ms | {}",
            result.level,
            result.san,
            result.uci,
            result.depth_reached,
            result.nodes_searched,
            result.evaluation_cp,
            result.elapsed_ms,
            result.abort_reason
        );
        Ok(result)
    }
}

/// Choose a move with the default budget and the wall clock
pub fn select_move(
    position: &Position,
    level: i32,
    move_number: u32,
) -> EngineResult<SearchResult> {
    MoveSelector::default().select_move(position, level, move_number)
}

/// Result for a move played without searching
fn without_search(
    position: &Position,
    profile: &DifficultyProfile,
    mv: Move,
    abort_reason: AbortReason,
    opening: Option<&'static str>,
    elapsed_ms: u64,
) -> SearchResult {
    let san = to_san(position, mv);
    SearchResult {
        best_move: mv,
        uci: mv.to_uci(),
        level: profile.level,
        depth_reached: 0,
        nodes_searched: 0,
        evaluation_cp: evaluate(position, profile.evaluation_complexity),
        principal_variation: vec![mv],
        principal_variation_san: vec![san.clone()],
        san,
        elapsed_ms,
        abort_reason,
        opening,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notation::replay_uci;
    use crate::search::{ManualClock, SteppingClock};

    const PAWN_ENDING: &str = "4k3/pp3ppp/8/8/8/8/PP3PPP/4K3 w - - 0 30";
    const BACK_RANK: &str = "6k1/5ppp/8/8/8/8/8/R5K1 w - - 0 40";

    fn fen(text: &str) -> Position {
        Position::from_fen(text).expect("valid test FEN")
    }

    fn frozen() -> MoveSelector {
        MoveSelector::default().with_clock(Arc::new(ManualClock::new()))
    }

    fn stepping(step_ms: u64, budget_ms: u64) -> MoveSelector {
        MoveSelector::new(TimeBudget::new(budget_ms))
            .with_clock(Arc::new(SteppingClock::new(step_ms)))
    }

    #[test]
    fn test_same_input_same_move() {
        let position = fen("r1bqk2r/pppp1ppp/2n2n2/2b1p3/2B1P3/3P1N2/PPP2PPP/RNBQK2R w KQkq - 1 5");
        let first = stepping(10, 2_500).select_move(&position, 4, 20).expect("search");
        let second = stepping(10, 2_500).select_move(&position, 4, 20).expect("search");
        assert_eq!(first, second);
        assert!(generate_legal_moves(&position).contains(&first.best_move));
    }

    #[test]
    fn test_more_budget_never_searches_shallower() {
        let position = fen(PAWN_ENDING);
        let mut previous = 0;
        for budget_ms in [100, 500, 2_000, 10_000] {
            let result = stepping(100, budget_ms)
                .select_move(&position, 6, 30)
                .expect("search");
            assert!(
                result.depth_reached >= previous,
                "budget {budget_ms}ms reached depth {} after {previous}",
                result.depth_reached
            );
            previous = result.depth_reached;
        }
        assert_eq!(previous, 4);
    }

    #[test]
    fn test_forced_move_skips_search() {
        let position = fen("R6k/7p/8/8/8/8/8/6K1 b - - 0 1");
        for level in 1..=10 {
            let result = frozen().select_move(&position, level, 1).expect("forced");
            assert_eq!(result.uci, "h8g7");
            assert_eq!(result.san, "Kg7");
            assert_eq!(result.abort_reason, AbortReason::ForcedSingleMove);
            assert_eq!(result.depth_reached, 0);
            assert_eq!(result.nodes_searched, 0);
        }
    }

    #[test]
    fn test_book_reply_in_opening() {
        let (position, history) =
            replay_uci(&Position::startpos(), &["e2e4", "e7e5", "g1f3"]).expect("legal line");
        let request = SearchRequest::new(position, 5, 2).with_history(history);
        let result = frozen().select(&request).expect("book");
        assert_eq!(result.uci, "b8c6");
        assert_eq!(result.san, "Nc6");
        assert!(result.opening_book_used());
        assert_eq!(result.opening, Some("Ruy Lopez"));
        assert_eq!(result.nodes_searched, 0);
    }

    #[test]
    fn test_finds_mate_in_one_at_every_level() {
        let position = fen(BACK_RANK);
        for level in 1..=10 {
            let result = frozen().select_move(&position, level, 40).expect("search");
            assert_eq!(result.uci, "a1a8", "level {level} missed the mate");
            assert_eq!(result.san, "Ra8#");
            assert_eq!(result.mate_in(), Some(1));
            assert_eq!(result.abort_reason, AbortReason::Completed);
        }
    }

    #[test]
    fn test_does_not_hang_the_queen() {
        let position = fen("6k1/5ppp/4p3/8/8/8/5PPP/3Q2K1 w - - 0 30");
        for level in [1, 2, 4] {
            let result = frozen().select_move(&position, level, 30).expect("search");
            assert_ne!(result.uci, "d1d5", "level {level} gave the queen away");
        }
        let result = stepping(1_000, 500).select_move(&position, 8, 30).expect("search");
        assert_ne!(result.uci, "d1d5");
    }

    #[test]
    fn test_single_depth_still_sees_the_recapture() {
        // Qxd5 wins a pawn and loses the queen to exd5
        let position = fen("2k5/pp6/4p3/3p4/8/8/8/K6Q w - - 0 30");
        for level in 1..=3 {
            let result = stepping(1_000, 500)
                .select_move(&position, level, 30)
                .expect("search");
            assert_eq!(result.depth_reached, 1, "level {level} went past depth 1");
            assert_ne!(result.uci, "h1d5", "level {level} gave the queen away");
        }
    }

    #[test]
    fn test_narrow_beam_keeps_the_mate() {
        // Eleven pawn captures rank above Ra8#
        let position = fen("6k1/5ppp/8/2p1p1p1/1PpPpPpP/1P1P1P2/8/R6K w - - 0 40");
        for level in 1..=3 {
            let result = frozen().select_move(&position, level, 40).expect("search");
            assert_eq!(result.uci, "a1a8", "level {level} missed the mate");
            assert_eq!(result.mate_in(), Some(1));
        }
    }

    #[test]
    fn test_tiny_budget_still_returns_a_move() {
        let position = fen(PAWN_ENDING);
        let selector = MoveSelector::new(TimeBudget::new(1));
        let result = selector.select_move(&position, 10, 30).expect("search");
        let profile = resolve_profile(10).expect("valid");
        assert_eq!(result.depth_reached, profile.min_depth);
        assert_eq!(result.abort_reason, AbortReason::TimeExhausted);
        assert!(generate_legal_moves(&position).contains(&result.best_move));
    }

    #[test]
    fn test_cancelled_request_keeps_completed_depth() {
        let token = CancellationToken::new();
        token.cancel();
        let request = SearchRequest::new(fen(PAWN_ENDING), 6, 30).with_cancellation(token);
        let result = frozen().select(&request).expect("search");
        assert_eq!(result.abort_reason, AbortReason::Cancelled);
        assert_eq!(result.depth_reached, 2);
    }

    #[test]
    fn test_rejects_level_out_of_range() {
        let forced = fen("R6k/7p/8/8/8/8/8/6K1 b - - 0 1");
        for level in [0, 11, -3] {
            let err = frozen().select_move(&forced, level, 1).unwrap_err();
            assert_eq!(err, EngineError::InvalidLevel { level });
        }
    }

    #[test]
    fn test_finished_game_has_no_move() {
        let mated = fen("R5k1/5ppp/8/8/8/8/8/6K1 b - - 0 1");
        let err = frozen().select_move(&mated, 5, 40).unwrap_err();
        assert!(matches!(err, EngineError::NoLegalMoves { .. }));
    }

    #[test]
    fn test_report_carries_san_and_diagnostics() {
        let result = frozen().select_move(&fen(BACK_RANK), 5, 40).expect("search");
        let report = result.report();
        assert_eq!(report.san, "Ra8#");
        assert_eq!(report.uci, "a1a8");
        assert_eq!(report.diagnostics.mate_in, Some(1));
        assert_eq!(report.diagnostics.principal_variation[0], "a1a8");
        assert!(!report.diagnostics.opening_book_used);
    }
}
