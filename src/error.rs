//! Error types for the CPU opponent service
//!
//! Engine failures pass through unchanged so a caller can still tell a bad
//! request from an engine fault. Configuration problems are reported, never
//! papered over with defaults.

use std::path::PathBuf;

use chess_engine::EngineError;
use thiserror::Error;

/// Errors that can occur in the CPU opponent service
#[derive(Error, Debug)]
pub enum OpponentError {
    /// The engine rejected or failed the move request
    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),

    /// Config file could not be read or written
    #[error("Config I/O error at {path:?}: {source}")]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid JSON for [`crate::config::OpponentConfig`]
    #[error("Config parse error at {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Config values are out of range
    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    /// The search thread could not be started
    #[error("Failed to spawn search thread: {source}")]
    WorkerSpawn {
        #[source]
        source: std::io::Error,
    },

    /// The search thread is gone or the result was already taken
    #[error("CPU worker is not running")]
    WorkerUnavailable,
}

/// Result type alias for service operations
pub type OpponentResult<T> = Result<T, OpponentError>;
