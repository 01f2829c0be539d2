//! Board model: pieces, squares, castling rights and the [`Position`] itself
//!
//! A [`Position`] is a plain value. It is built from a FEN string (or the
//! standard start) and every move produces a fresh copy through
//! [`crate::move_gen::apply_move`], so a position handed to the search is never
//! mutated underneath it.
//!
//! ## Square Indexing
//!
//! Squares are numbered `rank * 8 + file` with a1 = 0, h1 = 7 and h8 = 63.
//! White pawns move toward higher indices.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::constants::{FIGURE_VALUE, START_FEN};
use crate::error::{EngineError, EngineResult};
use crate::hash::compute_key;
use crate::move_gen::is_square_attacked;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    White,
    Black,
}

impl Color {
    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Color::White => 0,
            Color::Black => 1,
        }
    }

    #[inline]
    pub const fn opposite(self) -> Color {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// +1 for White, -1 for Black
    #[inline]
    pub const fn sign(self) -> i32 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Rank direction pawns of this color advance in
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Back rank index (0 for White, 7 for Black)
    #[inline]
    pub const fn home_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Color;

    fn not(self) -> Color {
        self.opposite()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceKind {
    pub const ALL: [PieceKind; 6] = [
        PieceKind::Pawn,
        PieceKind::Knight,
        PieceKind::Bishop,
        PieceKind::Rook,
        PieceKind::Queen,
        PieceKind::King,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            PieceKind::Pawn => 0,
            PieceKind::Knight => 1,
            PieceKind::Bishop => 2,
            PieceKind::Rook => 3,
            PieceKind::Queen => 4,
            PieceKind::King => 5,
        }
    }

    /// Material value in centipawns
    #[inline]
    pub const fn value(self) -> i32 {
        FIGURE_VALUE[self.index()]
    }

    /// Lowercase letter used by FEN and coordinate notation
    pub const fn to_char(self) -> char {
        match self {
            PieceKind::Pawn => 'p',
            PieceKind::Knight => 'n',
            PieceKind::Bishop => 'b',
            PieceKind::Rook => 'r',
            PieceKind::Queen => 'q',
            PieceKind::King => 'k',
        }
    }

    pub fn from_char(c: char) -> Option<PieceKind> {
        match c.to_ascii_lowercase() {
            'p' => Some(PieceKind::Pawn),
            'n' => Some(PieceKind::Knight),
            'b' => Some(PieceKind::Bishop),
            'r' => Some(PieceKind::Rook),
            'q' => Some(PieceKind::Queen),
            'k' => Some(PieceKind::King),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub color: Color,
}

impl Piece {
    #[inline]
    pub const fn new(kind: PieceKind, color: Color) -> Self {
        Piece { kind, color }
    }

    /// Index 0-11 used by the zobrist tables
    #[inline]
    pub const fn index(self) -> usize {
        self.color.index() * 6 + self.kind.index()
    }

    pub fn to_fen_char(self) -> char {
        let c = self.kind.to_char();
        match self.color {
            Color::White => c.to_ascii_uppercase(),
            Color::Black => c,
        }
    }

    pub fn from_fen_char(c: char) -> Option<Piece> {
        let kind = PieceKind::from_char(c)?;
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        Some(Piece::new(kind, color))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Square(u8);

impl Square {
    pub const A1: Square = Square(0);
    pub const B1: Square = Square(1);
    pub const C1: Square = Square(2);
    pub const D1: Square = Square(3);
    pub const E1: Square = Square(4);
    pub const F1: Square = Square(5);
    pub const G1: Square = Square(6);
    pub const H1: Square = Square(7);
    pub const D4: Square = Square(27);
    pub const E4: Square = Square(28);
    pub const D5: Square = Square(35);
    pub const E5: Square = Square(36);
    pub const A8: Square = Square(56);
    pub const B8: Square = Square(57);
    pub const C8: Square = Square(58);
    pub const D8: Square = Square(59);
    pub const E8: Square = Square(60);
    pub const F8: Square = Square(61);
    pub const G8: Square = Square(62);
    pub const H8: Square = Square(63);

    #[inline]
    pub const fn new(index: u8) -> Square {
        debug_assert!(index < 64);
        Square(index)
    }

    #[inline]
    pub const fn from_coords(file: u8, rank: u8) -> Square {
        Square(rank * 8 + file)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn file(self) -> u8 {
        self.0 % 8
    }

    #[inline]
    pub const fn rank(self) -> u8 {
        self.0 / 8
    }

    /// Same square seen from Black's side of the board
    #[inline]
    pub const fn flip(self) -> Square {
        Square(self.0 ^ 56)
    }

    /// Step by a (file, rank) delta, `None` when it leaves the board
    #[inline]
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let file = self.file() as i8 + df;
        let rank = self.rank() as i8 + dr;
        if (0..8).contains(&file) && (0..8).contains(&rank) {
            Some(Square::from_coords(file as u8, rank as u8))
        } else {
            None
        }
    }

    pub fn all() -> impl Iterator<Item = Square> {
        (0..64u8).map(Square)
    }

    /// Parse algebraic coordinates such as `e4`
    pub fn parse(text: &str) -> Option<Square> {
        let mut chars = text.chars();
        let file = chars.next()?;
        let rank = chars.next()?;
        if chars.next().is_some() {
            return None;
        }
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return None;
        }
        Some(Square::from_coords(
            file as u8 - b'a',
            rank as u8 - b'1',
        ))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}",
            (b'a' + self.file()) as char,
            (b'1' + self.rank()) as char
        )
    }
}

bitflags! {
    /// Remaining castling rights, one bit per side and wing
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CastlingRights: u8 {
        const WHITE_KINGSIDE = 0b0001;
        const WHITE_QUEENSIDE = 0b0010;
        const BLACK_KINGSIDE = 0b0100;
        const BLACK_QUEENSIDE = 0b1000;
    }
}

impl CastlingRights {
    pub fn kingside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITE_KINGSIDE,
            Color::Black => CastlingRights::BLACK_KINGSIDE,
        }
    }

    pub fn queenside(color: Color) -> CastlingRights {
        match color {
            Color::White => CastlingRights::WHITE_QUEENSIDE,
            Color::Black => CastlingRights::BLACK_QUEENSIDE,
        }
    }

    /// Rights lost when a piece leaves or lands on `square`
    pub(crate) fn touched_by(square: Square) -> CastlingRights {
        match square {
            Square::E1 => CastlingRights::WHITE_KINGSIDE | CastlingRights::WHITE_QUEENSIDE,
            Square::H1 => CastlingRights::WHITE_KINGSIDE,
            Square::A1 => CastlingRights::WHITE_QUEENSIDE,
            Square::E8 => CastlingRights::BLACK_KINGSIDE | CastlingRights::BLACK_QUEENSIDE,
            Square::H8 => CastlingRights::BLACK_KINGSIDE,
            Square::A8 => CastlingRights::BLACK_QUEENSIDE,
            _ => CastlingRights::empty(),
        }
    }
}

/// A complete chess position
///
/// Legality is enforced by the move generator: a `Position` built through
/// [`Position::from_fen`] always has exactly one king per side and the side
/// that just moved is never left in check.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub(crate) board: [Option<Piece>; 64],
    pub(crate) side_to_move: Color,
    pub(crate) castling: CastlingRights,
    pub(crate) en_passant: Option<Square>,
    pub(crate) halfmove_clock: u32,
    pub(crate) fullmove_number: u32,
    pub(crate) king_squares: [Square; 2],
    pub(crate) key: u64,
}

impl Position {
    /// Standard starting position
    pub fn startpos() -> Position {
        match Position::from_fen(START_FEN) {
            Ok(position) => position,
            Err(e) => unreachable!("start position FEN is malformed: {e}"),
        }
    }

    /// Parse a FEN string
    ///
    /// The half-move and full-move counters may be omitted (they default to
    /// `0` and `1`). Castling rights that the piece placement cannot support are
    /// dropped, and an en-passant target no pawn can capture on is cleared, so
    /// equal positions always hash to equal keys.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidPosition`] for malformed fields, a missing or
    /// duplicated king, pawns on a back rank, or the side not to move being in
    /// check.
    pub fn from_fen(fen: &str) -> EngineResult<Position> {
        let fields: Vec<&str> = fen.split_whitespace().collect();
        if fields.len() < 4 || fields.len() > 6 {
            return Err(invalid(format!(
                "expected 4-6 FEN fields, found {}",
                fields.len()
            )));
        }

        let board = parse_placement(fields[0])?;

        let side_to_move = match fields[1] {
            "w" => Color::White,
            "b" => Color::Black,
            other => return Err(invalid(format!("bad side to move '{other}'"))),
        };

        let mut castling = CastlingRights::empty();
        if fields[2] != "-" {
            for c in fields[2].chars() {
                castling |= match c {
                    'K' => CastlingRights::WHITE_KINGSIDE,
                    'Q' => CastlingRights::WHITE_QUEENSIDE,
                    'k' => CastlingRights::BLACK_KINGSIDE,
                    'q' => CastlingRights::BLACK_QUEENSIDE,
                    other => return Err(invalid(format!("bad castling flag '{other}'"))),
                };
            }
        }

        let en_passant = match fields[3] {
            "-" => None,
            text => {
                let square = Square::parse(text)
                    .ok_or_else(|| invalid(format!("bad en-passant square '{text}'")))?;
                let expected_rank = match side_to_move {
                    Color::White => 5,
                    Color::Black => 2,
                };
                if square.rank() != expected_rank {
                    return Err(invalid(format!(
                        "en-passant square {square} impossible with {side_to_move:?} to move"
                    )));
                }
                Some(square)
            }
        };

        let halfmove_clock = match fields.get(4) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| invalid(format!("bad half-move clock '{text}'")))?,
            None => 0,
        };
        let fullmove_number = match fields.get(5) {
            Some(text) => text
                .parse::<u32>()
                .map_err(|_| invalid(format!("bad full-move number '{text}'")))?
                .max(1),
            None => 1,
        };

        let king_squares = locate_kings(&board)?;

        for square in Square::all() {
            if let Some(Piece {
                kind: PieceKind::Pawn,
                ..
            }) = board[square.index()]
            {
                if square.rank() == 0 || square.rank() == 7 {
                    return Err(invalid(format!("pawn on back rank at {square}")));
                }
            }
        }

        let mut position = Position {
            board,
            side_to_move,
            castling,
            en_passant,
            halfmove_clock,
            fullmove_number,
            king_squares,
            key: 0,
        };
        position.castling = position.supported_castling();
        if let Some(square) = position.en_passant {
            if !position.en_passant_capturable(square) {
                position.en_passant = None;
            }
        }

        let waiting = side_to_move.opposite();
        if is_square_attacked(&position, position.king_square(waiting), side_to_move) {
            return Err(invalid(format!(
                "{waiting:?} is in check but it is {side_to_move:?} to move"
            )));
        }

        position.key = compute_key(&position);
        Ok(position)
    }

    /// Serialize back to FEN
    pub fn to_fen(&self) -> String {
        let mut fen = String::with_capacity(90);
        for rank in (0..8u8).rev() {
            let mut empty = 0;
            for file in 0..8u8 {
                match self.board[Square::from_coords(file, rank).index()] {
                    Some(piece) => {
                        if empty > 0 {
                            fen.push(char::from(b'0' + empty));
                            empty = 0;
                        }
                        fen.push(piece.to_fen_char());
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                fen.push(char::from(b'0' + empty));
            }
            if rank > 0 {
                fen.push('/');
            }
        }

        fen.push(' ');
        fen.push(match self.side_to_move {
            Color::White => 'w',
            Color::Black => 'b',
        });

        fen.push(' ');
        if self.castling.is_empty() {
            fen.push('-');
        } else {
            for (flag, c) in [
                (CastlingRights::WHITE_KINGSIDE, 'K'),
                (CastlingRights::WHITE_QUEENSIDE, 'Q'),
                (CastlingRights::BLACK_KINGSIDE, 'k'),
                (CastlingRights::BLACK_QUEENSIDE, 'q'),
            ] {
                if self.castling.contains(flag) {
                    fen.push(c);
                }
            }
        }

        fen.push(' ');
        match self.en_passant {
            Some(square) => fen.push_str(&square.to_string()),
            None => fen.push('-'),
        }

        fen.push_str(&format!(" {} {}", self.halfmove_clock, self.fullmove_number));
        fen
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.board[square.index()]
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        self.en_passant
    }

    #[inline]
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    #[inline]
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Zobrist key of this position
    #[inline]
    pub fn key(&self) -> u64 {
        self.key
    }

    #[inline]
    pub fn king_square(&self, color: Color) -> Square {
        self.king_squares[color.index()]
    }

    /// All occupied squares with their pieces, a1 first
    pub fn pieces(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |square| self.piece_at(square).map(|p| (square, p)))
    }

    /// Castling rights the current placement can still support
    fn supported_castling(&self) -> CastlingRights {
        let mut rights = self.castling;
        for (color, king_home) in [(Color::White, Square::E1), (Color::Black, Square::E8)] {
            let king = Piece::new(PieceKind::King, color);
            let rook = Piece::new(PieceKind::Rook, color);
            let rank = color.home_rank();
            if self.piece_at(king_home) != Some(king) {
                rights.remove(CastlingRights::kingside(color) | CastlingRights::queenside(color));
                continue;
            }
            if self.piece_at(Square::from_coords(7, rank)) != Some(rook) {
                rights.remove(CastlingRights::kingside(color));
            }
            if self.piece_at(Square::from_coords(0, rank)) != Some(rook) {
                rights.remove(CastlingRights::queenside(color));
            }
        }
        rights
    }

    /// Whether the side to move has a pawn that can capture onto `target`
    pub(crate) fn en_passant_capturable(&self, target: Square) -> bool {
        let us = self.side_to_move;
        let Some(victim_square) = target.offset(0, -us.forward()) else {
            return false;
        };
        if self.piece_at(victim_square) != Some(Piece::new(PieceKind::Pawn, us.opposite())) {
            return false;
        }
        [-1, 1].iter().any(|&df| {
            victim_square
                .offset(df, 0)
                .is_some_and(|sq| self.piece_at(sq) == Some(Piece::new(PieceKind::Pawn, us)))
        })
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::startpos()
    }
}

impl FromStr for Position {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Position::from_fen(s)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_fen())
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Position({})", self.to_fen())
    }
}

fn invalid(reason: String) -> EngineError {
    EngineError::InvalidPosition { reason }
}

fn parse_placement(placement: &str) -> EngineResult<[Option<Piece>; 64]> {
    let mut board = [None; 64];
    let ranks: Vec<&str> = placement.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid(format!("expected 8 ranks, found {}", ranks.len())));
    }

    for (i, rank_text) in ranks.iter().enumerate() {
        let rank = 7 - i as u8;
        let mut file: u8 = 0;
        for c in rank_text.chars() {
            if let Some(skip) = c.to_digit(10) {
                if !(1..=8).contains(&skip) {
                    return Err(invalid(format!("bad empty-square count '{c}'")));
                }
                file += skip as u8;
            } else {
                let piece = Piece::from_fen_char(c)
                    .ok_or_else(|| invalid(format!("bad piece letter '{c}'")))?;
                if file >= 8 {
                    return Err(invalid(format!("rank {} overflows", rank + 1)));
                }
                board[Square::from_coords(file, rank).index()] = Some(piece);
                file += 1;
            }
            if file > 8 {
                return Err(invalid(format!("rank {} overflows", rank + 1)));
            }
        }
        if file != 8 {
            return Err(invalid(format!("rank {} has {} files", rank + 1, file)));
        }
    }

    Ok(board)
}

fn locate_kings(board: &[Option<Piece>; 64]) -> EngineResult<[Square; 2]> {
    let mut found: [Option<Square>; 2] = [None, None];
    for square in Square::all() {
        if let Some(Piece {
            kind: PieceKind::King,
            color,
        }) = board[square.index()]
        {
            if found[color.index()].replace(square).is_some() {
                return Err(invalid(format!("more than one {color:?} king")));
            }
        }
    }
    match found {
        [Some(white), Some(black)] => Ok([white, black]),
        [None, _] => Err(invalid("missing White king".to_string())),
        [_, None] => Err(invalid("missing Black king".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startpos_round_trips_through_fen() {
        let position = Position::startpos();
        assert_eq!(position.to_fen(), START_FEN);
        assert_eq!(position.side_to_move(), Color::White);
        assert_eq!(position.castling(), CastlingRights::all());
        assert_eq!(position.king_square(Color::White), Square::E1);
        assert_eq!(position.king_square(Color::Black), Square::E8);
    }

    #[test]
    fn test_square_parse_and_display() {
        let e4 = Square::parse("e4").expect("valid square");
        assert_eq!(e4, Square::E4);
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(Square::parse("i1"), None);
        assert_eq!(Square::parse("e44"), None);
        assert_eq!(Square::H8.flip(), Square::H1);
        assert_eq!(Square::A1.offset(-1, 0), None);
        assert_eq!(Square::A1.offset(1, 1), Square::parse("b2"));
    }

    #[test]
    fn test_counters_are_optional() {
        let position = Position::from_fen("4k3/8/8/8/8/8/8/4K3 w - -").expect("valid");
        assert_eq!(position.halfmove_clock(), 0);
        assert_eq!(position.fullmove_number(), 1);
    }

    #[test]
    fn test_rejects_missing_king() {
        let err = Position::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPosition { .. }));
    }

    #[test]
    fn test_rejects_two_kings_of_one_color() {
        let err = Position::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1").unwrap_err();
        assert!(err.to_string().contains("more than one"));
    }

    #[test]
    fn test_rejects_side_not_to_move_in_check() {
        // Black king attacked by the white rook while White is to move
        let err = Position::from_fen("4k3/8/8/8/8/8/8/4RK2 w - - 0 1").unwrap_err();
        assert!(matches!(err, EngineError::InvalidPosition { .. }));
    }

    #[test]
    fn test_rejects_malformed_fields() {
        for fen in [
            "",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP w KQkq - 0 1",
            "rnbqkbnr/pppppppp/9/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR x KQkq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQxq - 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq e4 0 1",
            "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - zero 1",
            "Pnbqkbnr/pppppppp/8/8/8/8/1PPPPPPP/RNBQKBNR w KQkq - 0 1",
        ] {
            assert!(
                matches!(
                    Position::from_fen(fen),
                    Err(EngineError::InvalidPosition { .. })
                ),
                "should reject {fen:?}"
            );
        }
    }

    #[test]
    fn test_unsupported_castling_rights_are_dropped() {
        // Rook missing from h1 means White cannot castle kingside
        let position =
            Position::from_fen("r3k2r/8/8/8/8/8/8/R3K3 w KQkq - 0 1").expect("valid");
        assert!(!position.castling().contains(CastlingRights::WHITE_KINGSIDE));
        assert!(position.castling().contains(CastlingRights::WHITE_QUEENSIDE));
        assert!(position.castling().contains(CastlingRights::BLACK_KINGSIDE));
    }

    #[test]
    fn test_uncapturable_en_passant_is_cleared() {
        let position = Position::from_fen(
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
        )
        .expect("valid");
        assert_eq!(position.en_passant(), None);

        let position =
            Position::from_fen("4k3/8/8/3Pp3/8/8/8/4K3 w - e6 0 2").expect("valid");
        assert_eq!(position.en_passant(), Square::parse("e6"));
    }
}
