//! Opening book
//!
//! A handful of named main lines, replayed once from the start position into
//! a map from position key to the book reply. When several lines pass through
//! the same position, the line listed first supplies the reply, so lookups
//! are deterministic.
//!
//! The book is only consulted during the first [`BOOK_MAX_FULL_MOVES`] full
//! moves; a position that has left every line simply falls through to search.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::board::Position;
use crate::move_gen::make_move;
use crate::moves::{parse_uci, Move};
use crate::profile::DifficultyProfile;

/// Last full move for which the book is consulted
pub const BOOK_MAX_FULL_MOVES: u32 = 5;

/// A named opening and its moves in coordinate notation
#[derive(Debug, Clone, Copy)]
pub struct BookLine {
    pub name: &'static str,
    pub moves: &'static [&'static str],
}

/// A book reply for the current position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookMove {
    pub mv: Move,
    pub opening: &'static str,
}

pub static BOOK_LINES: &[BookLine] = &[
    BookLine {
        name: "Ruy Lopez",
        moves: &[
            "e2e4", "e7e5", "g1f3", "b8c6", "f1b5", "a7a6", "b5a4", "g8f6", "e1g1", "f8e7",
        ],
    },
    BookLine {
        name: "Italian Game",
        moves: &[
            "e2e4", "e7e5", "g1f3", "b8c6", "f1c4", "f8c5", "c2c3", "g8f6", "d2d3", "d7d6",
        ],
    },
    BookLine {
        name: "Sicilian Defense: Najdorf",
        moves: &[
            "e2e4", "c7c5", "g1f3", "d7d6", "d2d4", "c5d4", "f3d4", "g8f6", "b1c3", "a7a6",
        ],
    },
    BookLine {
        name: "French Defense: Classical",
        moves: &[
            "e2e4", "e7e6", "d2d4", "d7d5", "b1c3", "g8f6", "c1g5", "f8e7", "e4e5", "f6d7",
        ],
    },
    BookLine {
        name: "Caro-Kann Defense",
        moves: &[
            "e2e4", "c7c6", "d2d4", "d7d5", "b1c3", "d5e4", "c3e4", "c8f5", "e4g3", "f5g6",
        ],
    },
    BookLine {
        name: "Scandinavian Defense",
        moves: &[
            "e2e4", "d7d5", "e4d5", "d8d5", "b1c3", "d5a5", "d2d4", "g8f6", "g1f3", "c8f5",
        ],
    },
    BookLine {
        name: "Queen's Gambit Declined",
        moves: &[
            "d2d4", "d7d5", "c2c4", "e7e6", "b1c3", "g8f6", "c1g5", "f8e7", "e2e3", "e8g8",
        ],
    },
    BookLine {
        name: "Slav Defense",
        moves: &[
            "d2d4", "d7d5", "c2c4", "c7c6", "g1f3", "g8f6", "b1c3", "d5c4", "a2a4", "c8f5",
        ],
    },
    BookLine {
        name: "King's Indian Defense",
        moves: &[
            "d2d4", "g8f6", "c2c4", "g7g6", "b1c3", "f8g7", "e2e4", "d7d6", "g1f3", "e8g8",
        ],
    },
    BookLine {
        name: "London System",
        moves: &[
            "d2d4", "d7d5", "g1f3", "g8f6", "c1f4", "e7e6", "e2e3", "c7c5", "c2c3", "b8c6",
        ],
    },
    BookLine {
        name: "English Opening",
        moves: &[
            "c2c4", "e7e5", "b1c3", "g8f6", "g1f3", "b8c6", "g2g3", "d7d5", "c4d5", "f6d5",
        ],
    },
];

struct BookEntry {
    uci: &'static str,
    opening: &'static str,
}

static BOOK: LazyLock<HashMap<u64, BookEntry>> = LazyLock::new(build_book);

fn build_book() -> HashMap<u64, BookEntry> {
    let mut book = HashMap::new();

    for line in BOOK_LINES {
        let mut position = Position::startpos();
        for &uci in line.moves {
            let mv = match parse_uci(&position, uci) {
                Ok(mv) => mv,
                Err(e) => {
                    tracing::error!("[BOOK] line '{}' broken at {}: {}", line.name, uci, e);
                    break;
                }
            };
            book.entry(position.key()).or_insert(BookEntry {
                uci,
                opening: line.name,
            });
            position = make_move(&position, mv);
        }
    }

    tracing::debug!("[BOOK] {} positions from {} lines", book.len(), BOOK_LINES.len());
    book
}

/// Whether the book may be consulted for this request
pub fn should_use_opening_book(
    position: &Position,
    move_number: u32,
    profile: &DifficultyProfile,
) -> bool {
    profile.opening_book_enabled
        && (1..=BOOK_MAX_FULL_MOVES).contains(&move_number)
        && position.fullmove_number() <= BOOK_MAX_FULL_MOVES
}

/// The book reply for `position`, if it lies on a known line
pub fn pick_opening_move(position: &Position) -> Option<BookMove> {
    let entry = BOOK.get(&position.key())?;
    match parse_uci(position, entry.uci) {
        Ok(mv) => Some(BookMove {
            mv,
            opening: entry.opening,
        }),
        // Zobrist collision with a position off the book
        Err(_) => None,
    }
}
