use std::fmt;
use std::num::NonZeroI8;
use std::str::FromStr;

use derive_more::Display;
use thiserror::Error;

/// Error creating a [`Position`] from out-of-range numbers or from malformed notation
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum InvalidCoordinate {
    #[error("cell ({row}, {col}) is outside the board")]
    OutOfRange { row: isize, col: isize },
    #[error("unexpected file char {0:?}")]
    UnexpectedFile(char),
    #[error("unexpected rank char {0:?}")]
    UnexpectedRank(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    #[error("unexpected color char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum PieceKindParseError {
    #[error("unexpected piece char {0:?}")]
    UnexpectedChar(char),
    #[error("invalid string length")]
    BadLength,
}

/// Cell on the board
///
/// Row 0 is the eighth rank and row 7 is the first one, column 0 is file `A`. So, `"A8"`
/// is `(0, 0)` and `"H1"` is `(7, 7)`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    row: u8,
    col: u8,
}

impl Position {
    /// Creates a position from row and column, panicking if they are out of range
    ///
    /// Use [`Position::new()`] for values that come from outside.
    pub const fn from_parts(row: u8, col: u8) -> Position {
        assert!(row < 8 && col < 8, "row and column must be between 0 and 7");
        Position { row, col }
    }

    /// Creates a position from row and column
    pub fn new(row: isize, col: isize) -> Result<Position, InvalidCoordinate> {
        if !(0..8).contains(&row) || !(0..8).contains(&col) {
            return Err(InvalidCoordinate::OutOfRange { row, col });
        }
        Ok(Position {
            row: row as u8,
            col: col as u8,
        })
    }

    /// Parses two-character notation like `"E4"`
    ///
    /// Files are accepted in both cases. Does the same as [`Position::from_str`].
    pub fn from_notation(s: &str) -> Result<Position, InvalidCoordinate> {
        Position::from_str(s)
    }

    pub const fn from_index(val: usize) -> Position {
        assert!(val < 64, "index must be between 0 and 63");
        Position {
            row: (val >> 3) as u8,
            col: (val & 7) as u8,
        }
    }

    pub const fn index(&self) -> usize {
        ((self.row as usize) << 3) | self.col as usize
    }

    pub const fn row(&self) -> u8 {
        self.row
    }

    pub const fn col(&self) -> u8 {
        self.col
    }

    /// Chebyshev distance, zero iff both positions denote the same cell
    pub const fn distance(&self, other: Position) -> u8 {
        let dr = self.diff_row(other);
        let dc = self.diff_col(other);
        if dr > dc {
            dr
        } else {
            dc
        }
    }

    pub const fn diff_row(&self, other: Position) -> u8 {
        self.row.abs_diff(other.row)
    }

    pub const fn diff_col(&self, other: Position) -> u8 {
        self.col.abs_diff(other.col)
    }

    /// Signed row delta from `self` to `other`
    pub const fn delta_row(&self, other: Position) -> i8 {
        other.row as i8 - self.row as i8
    }

    /// Signed column delta from `self` to `other`
    pub const fn delta_col(&self, other: Position) -> i8 {
        other.col as i8 - self.col as i8
    }

    pub fn try_shift(self, delta_row: isize, delta_col: isize) -> Option<Position> {
        Position::new(self.row as isize + delta_row, self.col as isize + delta_col).ok()
    }

    pub fn file_char(&self) -> char {
        (b'A' + self.col) as char
    }

    pub fn rank_char(&self) -> char {
        (b'8' - self.row) as char
    }

    /// Iterates over all 64 cells, row by row
    pub fn iter() -> impl Iterator<Item = Self> {
        (0..64).map(Position::from_index)
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "Position({})", self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.file_char(), self.rank_char())
    }
}

impl FromStr for Position {
    type Err = InvalidCoordinate;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        let (file_ch, rank_ch) = match (chars.next(), chars.next(), chars.next()) {
            (Some(file), Some(rank), None) => (file, rank),
            _ => return Err(InvalidCoordinate::BadLength),
        };
        let col = match file_ch.to_ascii_uppercase() {
            c @ 'A'..='H' => c as u8 - b'A',
            _ => return Err(InvalidCoordinate::UnexpectedFile(file_ch)),
        };
        let row = match rank_ch {
            c @ '1'..='8' => b'8' - c as u8,
            _ => return Err(InvalidCoordinate::UnexpectedRank(rank_ch)),
        };
        Ok(Position { row, col })
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Color {
    White = 0,
    Black = 1,
}

impl Color {
    pub const fn inv(&self) -> Color {
        match *self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    pub const fn index(&self) -> usize {
        *self as u8 as usize
    }

    pub fn as_char(&self) -> char {
        match *self {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'w' => Some(Color::White),
            'b' => Some(Color::Black),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(ColorParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        Color::from_char(ch).ok_or(ColorParseError::UnexpectedChar(ch))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PieceKind {
    King = 0,
    Queen = 1,
    Rook = 2,
    Bishop = 3,
    Knight = 4,
    Pawn = 5,
}

impl PieceKind {
    pub const COUNT: usize = 6;

    pub const ALL: [PieceKind; Self::COUNT] = [
        PieceKind::King,
        PieceKind::Queen,
        PieceKind::Rook,
        PieceKind::Bishop,
        PieceKind::Knight,
        PieceKind::Pawn,
    ];

    /// Material value of the piece
    ///
    /// The king is worth nothing, as it is never captured.
    pub const fn value(&self) -> u32 {
        match *self {
            PieceKind::King => 0,
            PieceKind::Queen => 90,
            PieceKind::Rook => 50,
            PieceKind::Bishop => 30,
            PieceKind::Knight => 30,
            PieceKind::Pawn => 10,
        }
    }

    /// Returns ASCII letter of the piece, uppercase for White and lowercase for Black
    pub fn as_char(&self, color: Color) -> char {
        let c = b"KQRBNP"[*self as usize] as char;
        match color {
            Color::White => c,
            Color::Black => c.to_ascii_lowercase(),
        }
    }

    /// Returns Unicode chess glyph of the piece
    pub fn as_utf8_char(&self, color: Color) -> char {
        match color {
            Color::White => ['♔', '♕', '♖', '♗', '♘', '♙'][*self as usize],
            Color::Black => ['♚', '♛', '♜', '♝', '♞', '♟'][*self as usize],
        }
    }

    pub fn from_char(c: char) -> Option<(PieceKind, Color)> {
        let color = if c.is_ascii_uppercase() {
            Color::White
        } else {
            Color::Black
        };
        let kind = match c.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => return None,
        };
        Some((kind, color))
    }
}

impl FromStr for PieceKind {
    type Err = PieceKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() != 1 {
            return Err(PieceKindParseError::BadLength);
        }
        let ch = s.as_bytes()[0] as char;
        PieceKind::from_char(ch)
            .map(|(kind, _)| kind)
            .ok_or(PieceKindParseError::UnexpectedChar(ch))
    }
}

/// Identifier of a piece on a board
///
/// White pieces get positive identifiers `1..=16`, Black pieces get negative ones `-1..=-16`.
/// The magnitude minus one is the slot of the piece in its side's registry.
#[derive(Debug, Display, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PieceId(NonZeroI8);

impl PieceId {
    pub const SLOTS: usize = 16;

    /// Wraps a raw identifier, returning `None` if it is zero or out of range
    pub fn new(raw: i8) -> Option<PieceId> {
        if raw.unsigned_abs() as usize > Self::SLOTS {
            return None;
        }
        NonZeroI8::new(raw).map(PieceId)
    }

    /// Builds the identifier for the zero-based registry `slot` of side `color`
    pub fn from_slot(color: Color, slot: usize) -> PieceId {
        assert!(slot < Self::SLOTS, "slot must be between 0 and 15");
        let raw = slot as i8 + 1;
        let raw = match color {
            Color::White => raw,
            Color::Black => -raw,
        };
        match NonZeroI8::new(raw) {
            Some(id) => PieceId(id),
            None => unreachable!(),
        }
    }

    pub const fn get(&self) -> i8 {
        self.0.get()
    }

    pub const fn color(&self) -> Color {
        if self.0.get() > 0 {
            Color::White
        } else {
            Color::Black
        }
    }

    /// Zero-based registry slot
    pub const fn slot(&self) -> usize {
        self.0.get().unsigned_abs() as usize - 1
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CastlingSide {
    Queen = 0,
    King = 1,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DrawReason {
    Stalemate,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum WinReason {
    Checkmate,
}

/// Forced end of the game
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Outcome {
    Win { side: Color, reason: WinReason },
    Draw(DrawReason),
}

impl Outcome {
    pub fn winner(&self) -> Option<Color> {
        match self {
            Self::Win { side, .. } => Some(*side),
            Self::Draw(_) => None,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self {
            Self::Win {
                side: Color::White,
                reason: WinReason::Checkmate,
            } => write!(f, "White wins by checkmate"),
            Self::Win {
                side: Color::Black,
                reason: WinReason::Checkmate,
            } => write!(f, "Black wins by checkmate"),
            Self::Draw(DrawReason::Stalemate) => write!(f, "draw by stalemate"),
        }
    }
}
