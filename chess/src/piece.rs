//! Pieces and their movement rules

use crate::between;
use crate::board::Board;
use crate::castling;
use crate::moves::{MoveInfo, MoveKind, PromotePiece, Verdict};
use crate::types::{Color, InvalidCoordinate, PieceId, PieceKind, Position};
use gridchess_base::geometry;

use tracing::debug;

/// Chess piece
///
/// A piece is created detached. It becomes live when added to a [`Board`], which assigns it
/// an identifier and marks it as being on board. The piece doesn't hold a reference to its
/// board. Instead, every rule that needs occupancy takes the board as an argument.
///
/// Pieces stored in the board are mutated only through the board. Copies obtained via
/// [`Board::piece()`] are snapshots and don't follow later changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    position: Position,
    id: Option<PieceId>,
    on_board: bool,
    moved: bool,
}

impl Piece {
    /// Creates a detached piece
    pub const fn new(kind: PieceKind, color: Color, position: Position) -> Piece {
        Piece {
            kind,
            color,
            position,
            id: None,
            on_board: false,
            moved: false,
        }
    }

    /// Creates a detached piece standing on the cell with notation `s` (like `"E4"`)
    pub fn from_notation(
        kind: PieceKind,
        color: Color,
        s: &str,
    ) -> Result<Piece, InvalidCoordinate> {
        Ok(Piece::new(kind, color, Position::from_notation(s)?))
    }

    #[inline]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[inline]
    pub const fn color(&self) -> Color {
        self.color
    }

    #[inline]
    pub const fn position(&self) -> Position {
        self.position
    }

    /// Identifier assigned by the board, `None` if the piece was never added to a board
    ///
    /// The identifier is kept after the piece is captured.
    #[inline]
    pub const fn id(&self) -> Option<PieceId> {
        self.id
    }

    #[inline]
    pub const fn is_on_board(&self) -> bool {
        self.on_board
    }

    /// Returns `true` if the piece has moved at least once on its board
    #[inline]
    pub const fn has_moved(&self) -> bool {
        self.moved
    }

    #[inline]
    pub const fn value(&self) -> u32 {
        self.kind.value()
    }

    /// Unicode glyph of the piece
    #[inline]
    pub fn symbol(&self) -> char {
        self.kind.as_utf8_char(self.color)
    }

    pub(crate) fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub(crate) fn set_id(&mut self, id: PieceId) {
        self.id = Some(id);
    }

    pub(crate) fn set_on_board(&mut self, on_board: bool) {
        self.on_board = on_board;
    }

    pub(crate) fn set_moved(&mut self) {
        self.moved = true;
    }

    pub(crate) fn set_kind(&mut self, kind: PieceKind) {
        self.kind = kind;
    }

    /// Checks whether the piece can go to `target` on board `b`
    ///
    /// Only the movement shape, path obstruction and the target occupancy are considered.
    /// Castling is not known here, as it is a rule of the board, see
    /// [`Board::is_valid_move()`]. The board is never modified.
    ///
    /// A piece which is not on a board cannot move anywhere.
    pub fn is_valid_move(&self, b: &Board, target: Position) -> MoveInfo {
        if !self.on_board {
            return MoveInfo::rejected(target, Verdict::Detached);
        }
        let src = self.position;
        if src.distance(target) == 0 {
            return MoveInfo::rejected(target, Verdict::NotAMove);
        }
        let attack = match b.piece_at(target) {
            Some(other) if other.color == self.color => {
                return MoveInfo::rejected(target, Verdict::SameColor)
            }
            Some(_) => true,
            None => false,
        };
        match self.kind {
            PieceKind::King => jump(target, src.distance(target) == 1, attack),
            PieceKind::Knight => jump(target, is_knight_shape(src, target), attack),
            PieceKind::Rook => slide(b, src, target, between::is_rook_valid(src, target), attack),
            PieceKind::Bishop => {
                slide(b, src, target, between::is_bishop_valid(src, target), attack)
            }
            PieceKind::Queen => {
                let shape =
                    between::is_rook_valid(src, target) || between::is_bishop_valid(src, target);
                slide(b, src, target, shape, attack)
            }
            PieceKind::Pawn => self.pawn_move(b, target, attack),
        }
    }

    /// Returns `true` if the piece attacks `target`, whatever stands there
    ///
    /// Unlike [`Piece::is_valid_move()`], pawns attack both forward diagonals even if they are
    /// empty, and pawn pushes are not attacks.
    pub fn attacks(&self, b: &Board, target: Position) -> bool {
        let src = self.position;
        if src == target {
            return false;
        }
        match self.kind {
            PieceKind::King => src.distance(target) == 1,
            PieceKind::Knight => is_knight_shape(src, target),
            PieceKind::Rook => {
                between::is_rook_valid(src, target) && between::is_path_clear(b, src, target)
            }
            PieceKind::Bishop => {
                between::is_bishop_valid(src, target) && between::is_path_clear(b, src, target)
            }
            PieceKind::Queen => {
                (between::is_rook_valid(src, target) || between::is_bishop_valid(src, target))
                    && between::is_path_clear(b, src, target)
            }
            PieceKind::Pawn => {
                src.delta_row(target) == geometry::pawn_forward_delta(self.color)
                    && src.diff_col(target) == 1
            }
        }
    }

    fn pawn_move(&self, b: &Board, target: Position, attack: bool) -> MoveInfo {
        let src = self.position;
        let forward = geometry::pawn_forward_delta(self.color);
        let delta_row = src.delta_row(target);
        let simple = if target.row() == geometry::promote_row(self.color) {
            MoveKind::Promote
        } else {
            MoveKind::Simple
        };

        match src.diff_col(target) {
            0 if delta_row == forward => match attack {
                true => MoveInfo::rejected(target, Verdict::Blocked),
                false => MoveInfo::accepted(target, false, simple),
            },
            0 if delta_row == 2 * forward && src.row() == geometry::pawn_start_row(self.color) => {
                if attack || !between::is_path_clear(b, src, target) {
                    return MoveInfo::rejected(target, Verdict::Blocked);
                }
                MoveInfo::accepted(target, false, MoveKind::PawnDouble)
            }
            1 if delta_row == forward => {
                if attack {
                    return MoveInfo::accepted(target, true, simple);
                }
                let passed = Position::from_parts(src.row(), target.col());
                if src.row() == geometry::enpassant_src_row(self.color)
                    && b.can_be_en_passanted(passed, self.color)
                {
                    return MoveInfo::accepted(target, true, MoveKind::Enpassant);
                }
                MoveInfo::rejected(target, Verdict::BadShape)
            }
            _ => MoveInfo::rejected(target, Verdict::BadShape),
        }
    }

    /// Moves the piece to `target` if the board allows it
    ///
    /// The move is validated again with [`Board::is_valid_move()`]. On success the captured
    /// piece (if any) is removed, the piece is relocated, the rook is brought over on castling
    /// and the pawn is turned into `promote` on the last row. The turn and the history are
    /// not touched: [`Board::move_piece()`] does that and is the usual way to move pieces.
    ///
    /// The piece is looked up on the board by its identifier, so a stale copy still moves
    /// the live piece.
    pub fn move_to(&self, b: &mut Board, target: Position, promote: PromotePiece) -> MoveInfo {
        let current = match self.id.and_then(|id| b.piece(id)) {
            Some(piece) => *piece,
            None => return MoveInfo::rejected(target, Verdict::Detached),
        };
        let Some(id) = current.id else {
            return MoveInfo::rejected(target, Verdict::Detached);
        };
        let info = b.move_info(&current, target);
        if !info.can_move() {
            return info;
        }

        let src = current.position;
        match info.kind() {
            MoveKind::Enpassant => {
                let taken = Position::from_parts(src.row(), target.col());
                debug!(%src, %target, %taken, "enpassant capture");
                b.remove_piece(taken);
            }
            _ if info.is_attack() => {
                debug!(%src, %target, "capture");
                b.remove_piece(target);
            }
            _ => {}
        }
        b.relocate(id, target);

        if let Some(side) = info.kind().castling_side() {
            let rook_src = castling::rook_src(current.color, side);
            if let Some(rook) = b.id_at(rook_src) {
                debug!(?side, color = ?current.color, "castling");
                b.teleport_rook_castle(rook, castling::rook_dst(current.color, side));
            }
        }
        if info.kind() == MoveKind::Promote {
            debug!(%target, ?promote, "promotion");
            b.promote(id, promote.into());
        }
        info
    }
}

#[inline]
fn is_knight_shape(src: Position, dst: Position) -> bool {
    matches!((src.diff_row(dst), src.diff_col(dst)), (2, 1) | (1, 2))
}

#[inline]
fn jump(target: Position, shape: bool, attack: bool) -> MoveInfo {
    match shape {
        true => MoveInfo::accepted(target, attack, MoveKind::Simple),
        false => MoveInfo::rejected(target, Verdict::BadShape),
    }
}

#[inline]
fn slide(b: &Board, src: Position, target: Position, shape: bool, attack: bool) -> MoveInfo {
    if !shape {
        return MoveInfo::rejected(target, Verdict::BadShape);
    }
    if !between::is_path_clear(b, src, target) {
        return MoveInfo::rejected(target, Verdict::Blocked);
    }
    MoveInfo::accepted(target, attack, MoveKind::Simple)
}
