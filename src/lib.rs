//! CPU opponent service
//!
//! Hosts the `chess_engine` move search behind a dedicated worker thread,
//! with configuration loading and logging setup for the surrounding app.
//!
//! ## Module Organization
//!
//! - `config` - Budget configuration, JSON persistence and validation
//! - `worker` - Search thread, request queue and pending results
//! - `telemetry` - `tracing` subscriber setup
//! - `error` - Service error type

pub mod config;
pub mod error;
pub mod telemetry;
pub mod worker;

pub use chess_engine;
pub use config::OpponentConfig;
pub use error::{OpponentError, OpponentResult};
pub use worker::{CpuWorker, PendingMove};
