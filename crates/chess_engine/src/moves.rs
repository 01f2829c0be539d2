//! Move representation and coordinate (UCI) notation

use std::fmt;

use bitflags::bitflags;

use crate::board::{PieceKind, Position, Square};
use crate::error::{EngineError, EngineResult};
use crate::move_gen::generate_legal_moves;

bitflags! {
    /// Special-move markers set by the move generator
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct MoveFlags: u8 {
        const CAPTURE = 0b0_0001;
        const EN_PASSANT = 0b0_0010;
        const CASTLE_KINGSIDE = 0b0_0100;
        const CASTLE_QUEENSIDE = 0b0_1000;
        const DOUBLE_PAWN_PUSH = 0b1_0000;
    }
}

/// A move produced by the generator; never mutated after creation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
    flags: MoveFlags,
}

impl Move {
    #[inline]
    pub(crate) const fn new(from: Square, to: Square, flags: MoveFlags) -> Self {
        Move {
            from,
            to,
            promotion: None,
            flags,
        }
    }

    #[inline]
    pub(crate) const fn promoting(
        from: Square,
        to: Square,
        promotion: PieceKind,
        flags: MoveFlags,
    ) -> Self {
        Move {
            from,
            to,
            promotion: Some(promotion),
            flags,
        }
    }

    #[inline]
    pub fn from(&self) -> Square {
        self.from
    }

    #[inline]
    pub fn to(&self) -> Square {
        self.to
    }

    #[inline]
    pub fn promotion(&self) -> Option<PieceKind> {
        self.promotion
    }

    #[inline]
    pub fn flags(&self) -> MoveFlags {
        self.flags
    }

    #[inline]
    pub fn is_capture(&self) -> bool {
        self.flags.contains(MoveFlags::CAPTURE)
    }

    #[inline]
    pub fn is_en_passant(&self) -> bool {
        self.flags.contains(MoveFlags::EN_PASSANT)
    }

    #[inline]
    pub fn is_promotion(&self) -> bool {
        self.promotion.is_some()
    }

    #[inline]
    pub fn is_castle(&self) -> bool {
        self.flags
            .intersects(MoveFlags::CASTLE_KINGSIDE | MoveFlags::CASTLE_QUEENSIDE)
    }

    /// Coordinate notation, e.g. `e2e4` or `e7e8q`
    pub fn to_uci(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            write!(f, "{}", kind.to_char())?;
        }
        Ok(())
    }
}

/// Resolve coordinate notation against the legal moves of `position`
///
/// # Errors
///
/// [`EngineError::InvalidMoveNotation`] when the text is not coordinate
/// notation, [`EngineError::IllegalMove`] when it names no legal move.
pub fn parse_uci(position: &Position, text: &str) -> EngineResult<Move> {
    let text = text.trim();
    let malformed = || EngineError::InvalidMoveNotation {
        notation: text.to_string(),
    };

    if !(4..=5).contains(&text.len()) || !text.is_ascii() {
        return Err(malformed());
    }
    let from = Square::parse(&text[0..2]).ok_or_else(malformed)?;
    let to = Square::parse(&text[2..4]).ok_or_else(malformed)?;
    let promotion = match text[4..].chars().next() {
        Some(c) => match PieceKind::from_char(c) {
            Some(kind @ (PieceKind::Knight | PieceKind::Bishop | PieceKind::Rook | PieceKind::Queen)) => {
                Some(kind)
            }
            _ => return Err(malformed()),
        },
        None => None,
    };

    generate_legal_moves(position)
        .into_iter()
        .find(|mv| mv.from == from && mv.to == to && mv.promotion == promotion)
        .ok_or_else(|| EngineError::IllegalMove {
            notation: text.to_string(),
            fen: position.to_fen(),
        })
}
