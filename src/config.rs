//! CPU opponent configuration
//!
//! Loads and saves [`OpponentConfig`] as JSON. The budget values are shared
//! by every difficulty level, so they live here rather than in the profile
//! table.
//!
//! # File Location
//!
//! `config.json` in the user's configuration directory, e.g.
//! `~/.config/cpu_opponent/config.json` on Linux.
//!
//! # Error Handling
//!
//! A missing file means defaults. A file that exists but cannot be read,
//! parsed or validated is an error: a silently ignored config would make
//! every level play with a budget nobody asked for.

use std::fs;
use std::path::{Path, PathBuf};

use chess_engine::search::{
    DEFAULT_ABORT_THRESHOLD_FRACTION, DEFAULT_GRACE_MS, DEFAULT_TOTAL_BUDGET_MS, HARD_CEILING_MS,
};
use chess_engine::{validate_profile_table, MoveSelector, TimeBudget};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{OpponentError, OpponentResult};

/// Config filename
pub const CONFIG_FILENAME: &str = "config.json";

/// Time budget settings for the CPU opponent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpponentConfig {
    /// Wall-clock budget per CPU move
    pub total_budget_ms: u64,
    /// Held back from the budget for hand-off after the search
    pub grace_ms: u64,
    /// Share of the budget after which no new depth starts
    pub abort_threshold_fraction: f64,
    /// Largest per-request override the host allows
    pub max_budget_ms: u64,
}

impl Default for OpponentConfig {
    fn default() -> Self {
        Self {
            total_budget_ms: DEFAULT_TOTAL_BUDGET_MS,
            grace_ms: DEFAULT_GRACE_MS,
            abort_threshold_fraction: DEFAULT_ABORT_THRESHOLD_FRACTION,
            max_budget_ms: HARD_CEILING_MS,
        }
    }
}

impl OpponentConfig {
    /// Path of `config.json` in the user's configuration directory
    ///
    /// Falls back to the working directory when no home directory is known.
    pub fn config_path() -> PathBuf {
        match ProjectDirs::from("com", "cpu-opponent", "cpu_opponent") {
            Some(dirs) => dirs.config_dir().join(CONFIG_FILENAME),
            None => PathBuf::from(CONFIG_FILENAME),
        }
    }

    /// Load from [`Self::config_path`], or defaults when no file exists
    pub fn load_or_default() -> OpponentResult<Self> {
        let path = Self::config_path();
        if !path.exists() {
            tracing::info!("[CONFIG] No config file at {:?}. Using defaults.", path);
            let config = Self::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from(&path)
    }

    /// Load and validate the config at `path`
    pub fn load_from(path: &Path) -> OpponentResult<Self> {
        let contents = fs::read_to_string(path).map_err(|source| OpponentError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self =
            serde_json::from_str(&contents).map_err(|source| OpponentError::ConfigParse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        tracing::info!("[CONFIG] Loaded config from {:?}", path);
        Ok(config)
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> OpponentResult<()> {
        let io_error = |source| OpponentError::ConfigIo {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| {
            OpponentError::ConfigParse {
                path: path.to_path_buf(),
                source,
            }
        })?;
        fs::write(path, json).map_err(io_error)?;
        tracing::info!("[CONFIG] Saved config to {:?}", path);
        Ok(())
    }

    /// Check the budget values and the static difficulty table
    pub fn validate(&self) -> OpponentResult<()> {
        let invalid = |reason: String| Err(OpponentError::InvalidConfig { reason });

        if self.total_budget_ms == 0 {
            return invalid("total_budget_ms must be positive".into());
        }
        if self.grace_ms >= self.total_budget_ms {
            return invalid(format!(
                "grace_ms ({}) must be below total_budget_ms ({})",
                self.grace_ms, self.total_budget_ms
            ));
        }
        if !(self.abort_threshold_fraction > 0.0 && self.abort_threshold_fraction <= 1.0) {
            return invalid(format!(
                "abort_threshold_fraction ({}) must be in (0, 1]",
                self.abort_threshold_fraction
            ));
        }
        if self.max_budget_ms < self.total_budget_ms {
            return invalid(format!(
                "max_budget_ms ({}) must be at least total_budget_ms ({})",
                self.max_budget_ms, self.total_budget_ms
            ));
        }

        validate_profile_table()?;
        Ok(())
    }

    pub fn time_budget(&self) -> TimeBudget {
        TimeBudget {
            total_budget_ms: self.total_budget_ms,
            grace_ms: self.grace_ms,
            abort_threshold_fraction: self.abort_threshold_fraction,
        }
    }

    /// Move selector on the wall clock with this config's budget and ceiling
    pub fn selector(&self) -> MoveSelector {
        MoveSelector::new(self.time_budget()).with_ceiling(self.max_budget_ms)
    }
}
