//! Public API for the chess engine
//!
//! The game asks for the CPU's move here and gets back the move plus the
//! diagnostics that explain it.
//!
//! ## Module Organization
//!
//! - `selector` - Move selection: forced moves, opening book, then search
//! - `result` - Search results, diagnostics and serializable reports

mod result;
mod selector;

pub use result::{AbortReason, Diagnostics, MoveReport, SearchResult};
pub use selector::{select_move, MoveSelector, SearchRequest};
