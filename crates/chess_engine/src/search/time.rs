//! Time budget and cancellation
//!
//! Every move request gets one [`TimeBudget`], fixed for all difficulty
//! levels. The [`BudgetController`] is consulted only between iterative
//! deepening depths, never inside the tree walk, so a depth that has started
//! always finishes.
//!
//! Time is read through the [`Clock`] trait: [`WallClock`] in production,
//! [`ManualClock`] and [`SteppingClock`] in tests that need reproducible
//! elapsed times.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use web_time::Instant;

pub const DEFAULT_TOTAL_BUDGET_MS: u64 = 2_500;
pub const DEFAULT_GRACE_MS: u64 = 150;
pub const DEFAULT_ABORT_THRESHOLD_FRACTION: f64 = 0.90;
/// Largest budget a request may ask for, whatever the override says
pub const HARD_CEILING_MS: u64 = 15_000;
/// Share of the abort limit under which the search may go past its target depth
pub const BONUS_DEPTH_FRACTION: f64 = 0.30;

/// Source of monotonic milliseconds
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

/// Real time, measured from the clock's creation
#[derive(Debug, Clone, Copy)]
pub struct WallClock {
    origin: Instant,
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            origin: Instant::now(),
        }
    }
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for WallClock {
    fn now_ms(&self) -> u64 {
        u64::try_from(self.origin.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

/// Test clock that only moves when told to
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, ms: u64) {
        self.now.store(ms, Ordering::SeqCst);
    }

    pub fn advance(&self, ms: u64) {
        self.now.fetch_add(ms, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}

/// Test clock that moves forward a fixed step every time it is read
///
/// The search reads the clock once at the start and once per completed
/// depth, so elapsed time becomes a pure function of the depths searched.
#[derive(Debug)]
pub struct SteppingClock {
    now: AtomicU64,
    step_ms: u64,
}

impl SteppingClock {
    pub fn new(step_ms: u64) -> Self {
        SteppingClock {
            now: AtomicU64::new(0),
            step_ms,
        }
    }
}

impl Clock for SteppingClock {
    fn now_ms(&self) -> u64 {
        self.now.fetch_add(self.step_ms, Ordering::SeqCst)
    }
}

/// Wall-clock allowance for one move request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeBudget {
    pub total_budget_ms: u64,
    /// Reserved for hand-off and serialization after the search returns
    pub grace_ms: u64,
    pub abort_threshold_fraction: f64,
}

impl Default for TimeBudget {
    fn default() -> Self {
        TimeBudget {
            total_budget_ms: DEFAULT_TOTAL_BUDGET_MS,
            grace_ms: DEFAULT_GRACE_MS,
            abort_threshold_fraction: DEFAULT_ABORT_THRESHOLD_FRACTION,
        }
    }
}

impl TimeBudget {
    pub fn new(total_budget_ms: u64) -> Self {
        TimeBudget {
            total_budget_ms,
            ..Self::default()
        }
    }

    /// Apply a per-request override
    ///
    /// Only a positive override replaces the total, and never beyond `ceiling_ms`.
    pub fn with_override(self, override_ms: Option<u64>, ceiling_ms: u64) -> Self {
        match override_ms {
            Some(ms) if ms > 0 => TimeBudget {
                total_budget_ms: ms.min(ceiling_ms),
                ..self
            },
            _ => self,
        }
    }

    /// Elapsed time at which no further depth may start
    pub fn abort_limit_ms(&self) -> u64 {
        let by_fraction = (self.total_budget_ms as f64 * self.abort_threshold_fraction) as u64;
        by_fraction.min(self.total_budget_ms.saturating_sub(self.grace_ms))
    }
}

/// Whether another depth may start after `elapsed_ms`
#[inline]
pub fn should_continue(elapsed_ms: u64, budget: &TimeBudget) -> bool {
    elapsed_ms < budget.abort_limit_ms()
}

/// Cooperative stop signal shared between the requester and the search
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// What the controller says at a depth boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    TimeExhausted,
    Cancelled,
}

/// Budget, clock and cancellation for one search
pub struct BudgetController<'a> {
    budget: TimeBudget,
    clock: &'a dyn Clock,
    cancel: Option<&'a CancellationToken>,
    start_ms: u64,
}

impl<'a> BudgetController<'a> {
    /// Start timing now
    pub fn start(
        budget: TimeBudget,
        clock: &'a dyn Clock,
        cancel: Option<&'a CancellationToken>,
    ) -> Self {
        BudgetController {
            budget,
            clock,
            cancel,
            start_ms: clock.now_ms(),
        }
    }

    #[inline]
    pub fn budget(&self) -> &TimeBudget {
        &self.budget
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.clock.now_ms().saturating_sub(self.start_ms)
    }

    /// Decide at a depth boundary, given the elapsed time read there
    pub fn verdict_at(&self, elapsed_ms: u64) -> Verdict {
        if self.cancel.is_some_and(CancellationToken::is_cancelled) {
            Verdict::Cancelled
        } else if should_continue(elapsed_ms, &self.budget) {
            Verdict::Continue
        } else {
            Verdict::TimeExhausted
        }
    }

    /// Whether there is room to go past the target depth
    pub fn allows_bonus_depth_at(&self, elapsed_ms: u64) -> bool {
        (elapsed_ms as f64) < self.budget.abort_limit_ms() as f64 * BONUS_DEPTH_FRACTION
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_abort_limit() {
        let budget = TimeBudget::default();
        // 90% of 2500 is below 2500 - 150
        assert_eq!(budget.abort_limit_ms(), 2_250);
        assert!(should_continue(2_249, &budget));
        assert!(!should_continue(2_250, &budget));
    }

    #[test]
    fn test_grace_caps_small_budgets() {
        let budget = TimeBudget::new(1_000);
        assert_eq!(budget.abort_limit_ms(), 850);

        let tiny = TimeBudget::new(1);
        assert_eq!(tiny.abort_limit_ms(), 0);
        assert!(!should_continue(0, &tiny));
    }

    #[test]
    fn test_override_rules() {
        let base = TimeBudget::default();
        assert_eq!(base.with_override(None, HARD_CEILING_MS), base);
        assert_eq!(base.with_override(Some(0), HARD_CEILING_MS), base);
        assert_eq!(
            base.with_override(Some(5_000), HARD_CEILING_MS).total_budget_ms,
            5_000
        );
        assert_eq!(
            base.with_override(Some(60_000), HARD_CEILING_MS).total_budget_ms,
            HARD_CEILING_MS
        );
    }

    #[test]
    fn test_controller_verdicts() {
        let clock = ManualClock::new();
        let token = CancellationToken::new();
        let controller = BudgetController::start(TimeBudget::new(1_000), &clock, Some(&token));

        clock.advance(100);
        let elapsed = controller.elapsed_ms();
        assert_eq!(elapsed, 100);
        assert_eq!(controller.verdict_at(elapsed), Verdict::Continue);
        assert!(controller.allows_bonus_depth_at(elapsed));

        clock.advance(800);
        let elapsed = controller.elapsed_ms();
        assert_eq!(controller.verdict_at(elapsed), Verdict::TimeExhausted);
        assert!(!controller.allows_bonus_depth_at(elapsed));

        token.cancel();
        assert_eq!(controller.verdict_at(0), Verdict::Cancelled);
    }

    #[test]
    fn test_stepping_clock_advances_per_read() {
        let clock = SteppingClock::new(10);
        assert_eq!(clock.now_ms(), 0);
        assert_eq!(clock.now_ms(), 10);
        assert_eq!(clock.now_ms(), 20);
    }
}
