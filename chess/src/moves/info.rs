use super::MoveKind;
use crate::types::Position;

/// Answer of a piece asked whether it can go to a cell
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// The target is the cell the piece already stands on
    NotAMove,
    /// The piece is not on the board, or there is no piece on the source cell
    Detached,
    /// The target is occupied by a piece of the same color
    SameColor,
    /// The piece never moves like this
    BadShape,
    /// The shape is right, but the path is obstructed or a special rule forbids the move
    Blocked,
    /// Quiet move to an empty cell
    Move,
    /// Capture of an opposing piece
    Attack,
}

/// Result of [`Piece::is_valid_move()`](crate::Piece::is_valid_move) and friends
///
/// The self-check rule is not considered here. A move with `can_move() == true` is only
/// shape-legal, see [`Board::is_legal_move()`](crate::Board::is_legal_move) for the full check.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MoveInfo {
    target: Position,
    verdict: Verdict,
    kind: MoveKind,
}

impl MoveInfo {
    #[inline]
    pub(crate) const fn rejected(target: Position, verdict: Verdict) -> MoveInfo {
        MoveInfo {
            target,
            verdict,
            kind: MoveKind::Simple,
        }
    }

    #[inline]
    pub(crate) const fn accepted(target: Position, attack: bool, kind: MoveKind) -> MoveInfo {
        MoveInfo {
            target,
            verdict: if attack { Verdict::Attack } else { Verdict::Move },
            kind,
        }
    }

    #[inline]
    pub const fn target(&self) -> Position {
        self.target
    }

    #[inline]
    pub const fn verdict(&self) -> Verdict {
        self.verdict
    }

    /// Kind of the move, meaningful only if [`MoveInfo::can_move()`] holds
    #[inline]
    pub const fn kind(&self) -> MoveKind {
        self.kind
    }

    #[inline]
    pub const fn can_move(&self) -> bool {
        matches!(self.verdict, Verdict::Move | Verdict::Attack)
    }

    /// Returns `true` if the move captures something
    ///
    /// For enpassant the captured pawn is not on the target cell.
    #[inline]
    pub const fn is_attack(&self) -> bool {
        matches!(self.verdict, Verdict::Attack)
    }

    /// Returns `true` if the move has a valid shape but is disallowed by occupancy
    #[inline]
    pub const fn is_blocked(&self) -> bool {
        matches!(self.verdict, Verdict::SameColor | Verdict::Blocked)
    }
}
