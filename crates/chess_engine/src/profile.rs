//! Difficulty profiles for the CPU opponent
//!
//! A CPU level (1-10) maps to a fixed set of search parameters. Every level
//! shares the same time budget, so the UI feels equally responsive at every
//! level; what changes is how deep and how wide the search goes within it.
//!
//! | Level | Depth (min/target/cap) | Beam      | Quiescence | Evaluation | Aspiration |
//! |-------|------------------------|-----------|------------|------------|------------|
//! | 1     | 1 / 1 / 2              | 8         | 1 ply      | lite       | off        |
//! | 2     | 1 / 2 / 2              | 10        | 1 ply      | lite       | off        |
//! | 3     | 1 / 2 / 3              | 12        | 2 plies    | lite       | off        |
//! | 4     | 2 / 3 / 3              | 16        | 2 plies    | full       | off        |
//! | 5     | 2 / 3 / 4              | 20        | 3 plies    | full       | ±50 cp     |
//! | 6     | 2 / 4 / 4              | 24        | 4 plies    | full       | ±50 cp     |
//! | 7     | 3 / 4 / 5              | 28        | 4 plies    | full       | ±40 cp     |
//! | 8     | 3 / 5 / 5              | 32        | 6 plies    | full       | ±35 cp     |
//! | 9     | 3 / 5 / 6              | unbounded | 6 plies    | full       | ±30 cp     |
//! | 10    | 4 / 6 / 7              | unbounded | 8 plies    | full       | ±25 cp     |
//!
//! The table is static and read-only. [`validate_profile_table`] checks its
//! invariants and is run once at startup by the hosting service.

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::evaluation::EvaluationComplexity;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 10;

/// Cap on how many root moves get a full search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BeamWidth {
    Unbounded,
    Top(usize),
}

impl BeamWidth {
    /// Number of moves kept out of `available`
    #[inline]
    pub fn keep(self, available: usize) -> usize {
        match self {
            BeamWidth::Unbounded => available,
            BeamWidth::Top(n) => n.min(available),
        }
    }
}

/// Concrete search parameters for one CPU level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DifficultyProfile {
    pub level: u8,
    pub min_depth: u8,
    pub target_depth: u8,
    pub hard_cap_depth: u8,
    pub beam_width: BeamWidth,
    pub use_quiescence: bool,
    pub quiescence_max_depth: u8,
    pub use_aspiration: bool,
    pub aspiration_window_cp: i32,
    pub evaluation_complexity: EvaluationComplexity,
    pub opening_book_enabled: bool,
}

impl DifficultyProfile {
    /// Check this profile's own invariants
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidProfile`] naming the broken rule.
    pub fn validate(&self) -> EngineResult<()> {
        let fail = |reason: &str| {
            Err(EngineError::InvalidProfile {
                level: self.level,
                reason: reason.to_string(),
            })
        };

        if !(MIN_LEVEL..=MAX_LEVEL).contains(&self.level) {
            return fail("level outside 1-10");
        }
        if self.min_depth == 0 {
            return fail("min_depth must be at least 1");
        }
        if !(self.min_depth <= self.target_depth && self.target_depth <= self.hard_cap_depth) {
            return fail("depths must satisfy min <= target <= hard cap");
        }
        if self.beam_width == BeamWidth::Top(0) {
            return fail("beam width must be at least 1");
        }
        if self.use_quiescence && self.quiescence_max_depth == 0 {
            return fail("quiescence enabled with zero depth");
        }
        if self.use_aspiration && self.aspiration_window_cp <= 0 {
            return fail("aspiration enabled with a non-positive window");
        }
        Ok(())
    }
}

const fn profile(
    level: u8,
    depths: (u8, u8, u8),
    beam_width: BeamWidth,
    quiescence_max_depth: u8,
    aspiration_window_cp: i32,
    evaluation_complexity: EvaluationComplexity,
) -> DifficultyProfile {
    DifficultyProfile {
        level,
        min_depth: depths.0,
        target_depth: depths.1,
        hard_cap_depth: depths.2,
        beam_width,
        use_quiescence: quiescence_max_depth > 0,
        quiescence_max_depth,
        use_aspiration: aspiration_window_cp > 0,
        aspiration_window_cp,
        evaluation_complexity,
        opening_book_enabled: true,
    }
}

use BeamWidth::{Top, Unbounded};
use EvaluationComplexity::{Full, Lite};

static PROFILES: [DifficultyProfile; MAX_LEVEL as usize] = [
    profile(1, (1, 1, 2), Top(8), 1, 0, Lite),
    profile(2, (1, 2, 2), Top(10), 1, 0, Lite),
    profile(3, (1, 2, 3), Top(12), 2, 0, Lite),
    profile(4, (2, 3, 3), Top(16), 2, 0, Full),
    profile(5, (2, 3, 4), Top(20), 3, 50, Full),
    profile(6, (2, 4, 4), Top(24), 4, 50, Full),
    profile(7, (3, 4, 5), Top(28), 4, 40, Full),
    profile(8, (3, 5, 5), Top(32), 6, 35, Full),
    profile(9, (3, 5, 6), Unbounded, 6, 30, Full),
    profile(10, (4, 6, 7), Unbounded, 8, 25, Full),
];

/// The full static table, level 1 first
pub fn profiles() -> &'static [DifficultyProfile] {
    &PROFILES
}

/// Look up the profile for a CPU level
///
/// # Errors
///
/// [`EngineError::InvalidLevel`] for anything outside 1-10. No default is
/// substituted.
pub fn resolve_profile(level: i32) -> EngineResult<DifficultyProfile> {
    u8::try_from(level)
        .ok()
        .filter(|l| (MIN_LEVEL..=MAX_LEVEL).contains(l))
        .map(|l| PROFILES[usize::from(l - MIN_LEVEL)])
        .ok_or(EngineError::InvalidLevel { level })
}

/// Check every profile plus the cross-level rules
///
/// # Errors
///
/// The first [`EngineError::InvalidProfile`] found.
pub fn validate_profile_table() -> EngineResult<()> {
    for (i, profile) in PROFILES.iter().enumerate() {
        profile.validate()?;
        if usize::from(profile.level) != i + 1 {
            return Err(EngineError::InvalidProfile {
                level: profile.level,
                reason: format!("stored at slot {} of the table", i + 1),
            });
        }
    }
    for pair in PROFILES.windows(2) {
        if pair[1].target_depth < pair[0].target_depth {
            return Err(EngineError::InvalidProfile {
                level: pair[1].level,
                reason: format!(
                    "target depth {} below level {}'s {}",
                    pair[1].target_depth, pair[0].level, pair[0].target_depth
                ),
            });
        }
    }
    Ok(())
}
