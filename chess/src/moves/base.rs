use crate::piece::Piece;
use crate::types::{CastlingSide, Color, PieceKind, Position};

use std::fmt;

/// Move kind
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum MoveKind {
    /// Any move or capture without special rules
    #[default]
    Simple = 0,
    /// Kingside castling
    CastlingKingside = 1,
    /// Queenside castling
    CastlingQueenside = 2,
    /// Double pawn move from its starting row
    PawnDouble = 3,
    /// Enpassant
    Enpassant = 4,
    /// Pawn move or capture onto the promotion row
    Promote = 5,
}

impl MoveKind {
    #[inline]
    pub fn castling_side(self) -> Option<CastlingSide> {
        CastlingSide::try_from(self).ok()
    }
}

impl From<CastlingSide> for MoveKind {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => Self::CastlingKingside,
            CastlingSide::Queen => Self::CastlingQueenside,
        }
    }
}

impl TryFrom<MoveKind> for CastlingSide {
    type Error = ();

    #[inline]
    fn try_from(kind: MoveKind) -> Result<Self, Self::Error> {
        match kind {
            MoveKind::CastlingKingside => Ok(Self::King),
            MoveKind::CastlingQueenside => Ok(Self::Queen),
            _ => Err(()),
        }
    }
}

/// Target piece for promotion
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PromotePiece {
    Knight = 4,
    Bishop = 3,
    Rook = 2,
    #[default]
    Queen = 1,
}

impl PromotePiece {
    /// All the promotion choices, strongest first
    pub const ALL: [PromotePiece; 4] = [
        PromotePiece::Queen,
        PromotePiece::Rook,
        PromotePiece::Bishop,
        PromotePiece::Knight,
    ];
}

impl From<PromotePiece> for PieceKind {
    #[inline]
    fn from(p: PromotePiece) -> Self {
        match p {
            PromotePiece::Knight => PieceKind::Knight,
            PromotePiece::Bishop => PieceKind::Bishop,
            PromotePiece::Rook => PieceKind::Rook,
            PromotePiece::Queen => PieceKind::Queen,
        }
    }
}

impl TryFrom<PieceKind> for PromotePiece {
    type Error = ();

    #[inline]
    fn try_from(p: PieceKind) -> Result<Self, Self::Error> {
        match p {
            PieceKind::Knight => Ok(PromotePiece::Knight),
            PieceKind::Bishop => Ok(PromotePiece::Bishop),
            PieceKind::Rook => Ok(PromotePiece::Rook),
            PieceKind::Queen => Ok(PromotePiece::Queen),
            _ => Err(()),
        }
    }
}

/// Entry of the move history
///
/// Records where the piece went from and to, and keeps a snapshot of the piece as it was
/// right before the move. Moves returned by
/// [`Board::get_all_possible_moves()`](crate::Board::get_all_possible_moves) are built the
/// same way, so they can be replayed with [`Board::apply()`](crate::Board::apply).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Position,
    dst: Position,
    piece: Piece,
    kind: MoveKind,
    promote: Option<PromotePiece>,
    distance: u8,
}

impl Move {
    /// Creates a new move record
    ///
    /// `promote` is dropped unless `kind` is [`MoveKind::Promote`], and defaults to
    /// [`PromotePiece::Queen`] for promotions.
    pub fn new(
        src: Position,
        dst: Position,
        piece: Piece,
        kind: MoveKind,
        promote: Option<PromotePiece>,
    ) -> Move {
        let promote = match kind {
            MoveKind::Promote => Some(promote.unwrap_or_default()),
            _ => None,
        };
        Move {
            src,
            dst,
            piece,
            kind,
            promote,
            distance: src.distance(dst),
        }
    }

    #[inline]
    pub const fn src(&self) -> Position {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Position {
        self.dst
    }

    /// Returns the moved piece as it was before the move
    #[inline]
    pub const fn piece(&self) -> &Piece {
        &self.piece
    }

    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn promote(&self) -> Option<PromotePiece> {
        self.promote
    }

    /// Distance travelled, as given by [`Position::distance()`]
    #[inline]
    pub const fn distance(&self) -> u8 {
        self.distance
    }

    #[inline]
    pub fn side(&self) -> Color {
        self.piece.color()
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(p) = self.promote {
            write!(f, "{}", PieceKind::from(p).as_char(Color::Black))?;
        }
        Ok(())
    }
}
