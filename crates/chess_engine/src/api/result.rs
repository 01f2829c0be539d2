//! Search results and their diagnostics
//!
//! A [`SearchResult`] is produced once per move request and handed to the
//! caller. [`SearchResult::report`] turns it into the serializable shape
//! the UI and telemetry layers consume.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::{MATE_SCORE, MATE_THRESHOLD};
use crate::moves::Move;

/// Why the engine stopped and returned the move it did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AbortReason {
    /// Target depth (or a forced mate) reached
    Completed,
    /// Budget ran out before the target depth; the deepest completed depth was used
    TimeExhausted,
    /// Reply taken from the opening book, no search
    OpeningBook,
    /// Only one legal move existed, no search
    ForcedSingleMove,
    /// Requester cancelled; the deepest completed depth was used
    Cancelled,
}

impl AbortReason {
    pub fn as_str(self) -> &'static str {
        match self {
            AbortReason::Completed => "completed",
            AbortReason::TimeExhausted => "time-exhausted",
            AbortReason::OpeningBook => "opening-book",
            AbortReason::ForcedSingleMove => "forced-single-move",
            AbortReason::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's answer to one move request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    pub best_move: Move,
    pub san: String,
    pub uci: String,
    pub level: u8,
    pub depth_reached: u8,
    pub nodes_searched: u64,
    /// Centipawns from the side to move's point of view
    pub evaluation_cp: i32,
    pub principal_variation: Vec<Move>,
    pub principal_variation_san: Vec<String>,
    pub elapsed_ms: u64,
    pub abort_reason: AbortReason,
    /// Name of the book line, when the reply came from the book
    pub opening: Option<&'static str>,
}

impl SearchResult {
    #[inline]
    pub fn opening_book_used(&self) -> bool {
        self.abort_reason == AbortReason::OpeningBook
    }

    /// Full moves to mate when the evaluation is a mate score
    ///
    /// Positive when the side to move mates, negative when it gets mated.
    pub fn mate_in(&self) -> Option<i32> {
        let magnitude = self.evaluation_cp.abs();
        if magnitude < MATE_THRESHOLD {
            return None;
        }
        let plies = MATE_SCORE - magnitude;
        let moves = (plies + 1) / 2;
        Some(if self.evaluation_cp > 0 { moves } else { -moves })
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            level: self.level,
            depth_reached: self.depth_reached,
            nodes_searched: self.nodes_searched,
            evaluation_centipawns: self.evaluation_cp,
            mate_in: self.mate_in(),
            principal_variation: self.principal_variation.iter().map(Move::to_uci).collect(),
            principal_variation_san: self.principal_variation_san.clone(),
            search_time_ms: self.elapsed_ms,
            abort_reason: self.abort_reason,
            opening_book_used: self.opening_book_used(),
            opening_name: self.opening.map(str::to_string),
        }
    }

    pub fn report(&self) -> MoveReport {
        MoveReport {
            san: self.san.clone(),
            uci: self.uci.clone(),
            diagnostics: self.diagnostics(),
        }
    }
}

/// Observability payload for the UI and telemetry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostics {
    pub level: u8,
    pub depth_reached: u8,
    pub nodes_searched: u64,
    pub evaluation_centipawns: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mate_in: Option<i32>,
    pub principal_variation: Vec<String>,
    pub principal_variation_san: Vec<String>,
    pub search_time_ms: u64,
    pub abort_reason: AbortReason,
    pub opening_book_used: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opening_name: Option<String>,
}

/// The selected move in both notations plus diagnostics
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveReport {
    pub san: String,
    pub uci: String,
    pub diagnostics: Diagnostics,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Position;
    use crate::move_gen::generate_legal_moves;

    fn sample(evaluation_cp: i32, abort_reason: AbortReason) -> SearchResult {
        let position = Position::startpos();
        let best_move = generate_legal_moves(&position)[0];
        SearchResult {
            best_move,
            san: "a3".into(),
            uci: best_move.to_uci(),
            level: 5,
            depth_reached: 3,
            nodes_searched: 1234,
            evaluation_cp,
            principal_variation: vec![best_move],
            principal_variation_san: vec!["a3".into()],
            elapsed_ms: 42,
            abort_reason,
            opening: None,
        }
    }

    #[test]
    fn test_mate_in_from_score() {
        assert_eq!(sample(MATE_SCORE - 1, AbortReason::Completed).mate_in(), Some(1));
        assert_eq!(sample(MATE_SCORE - 3, AbortReason::Completed).mate_in(), Some(2));
        assert_eq!(sample(-(MATE_SCORE - 2), AbortReason::Completed).mate_in(), Some(-1));
        assert_eq!(sample(250, AbortReason::Completed).mate_in(), None);
    }

    #[test]
    fn test_diagnostics_serialize_camel_case() {
        let json = serde_json::to_value(sample(35, AbortReason::TimeExhausted).diagnostics())
            .expect("serializable");
        assert_eq!(json["depthReached"], 3);
        assert_eq!(json["nodesSearched"], 1234);
        assert_eq!(json["evaluationCentipawns"], 35);
        assert_eq!(json["searchTimeMs"], 42);
        assert_eq!(json["abortReason"], "time-exhausted");
        assert_eq!(json["openingBookUsed"], false);
        assert!(json.get("mateIn").is_none());
    }

    #[test]
    fn test_abort_reason_display_matches_serde() {
        for reason in [
            AbortReason::Completed,
            AbortReason::TimeExhausted,
            AbortReason::OpeningBook,
            AbortReason::ForcedSingleMove,
            AbortReason::Cancelled,
        ] {
            let json = serde_json::to_string(&reason).expect("serializable");
            assert_eq!(json, format!("\"{reason}\""));
        }
    }
}
