//! Board and related things

use crate::between;
use crate::castling;
use crate::check::CheckSystem;
use crate::movegen::{self, MoveList};
use crate::moves::{Move, MoveInfo, PromotePiece, Verdict};
use crate::piece::Piece;
use crate::types::{
    CastlingSide, Color, DrawReason, InvalidCoordinate, Outcome, PieceId, PieceKind, Position,
    WinReason,
};
use gridchess_base::geometry;

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};

use thiserror::Error;
use tracing::{debug, trace};

/// Disagreement between the grid and the piece registry, reported by [`Board::validate()`]
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ConsistencyError {
    /// Cell refers to an identifier without a live piece
    #[error("cell {0} refers to piece {1} which is not in the registry")]
    DanglingId(Position, PieceId),
    /// Cell and registry disagree on where the piece stands
    #[error("piece {id} is on cell {cell}, but the registry says {registered}")]
    PositionMismatch {
        id: PieceId,
        cell: Position,
        registered: Position,
    },
    /// Piece is registered, but marked as not being on board
    #[error("piece {0} is registered, but marked as detached")]
    OffBoardInRegistry(PieceId),
    /// Piece is registered, but no cell refers to it
    #[error("piece {0} is missing from the grid")]
    MissingFromGrid(PieceId),
    /// More than one cell refers to the same identifier
    #[error("piece {0} occupies more than one cell")]
    DuplicateId(PieceId),
    /// Piece is stored in a registry slot which doesn't match its identifier
    #[error("registry slot {slot} of {color:?} holds a foreign piece")]
    WrongSlot { color: Color, slot: usize },
    /// Registry holds an identifier which was never issued
    #[error("piece {0} was never issued")]
    IdCounterBehind(PieceId),
}

/// Chess board
///
/// The board keeps two views of the same pieces: a grid of 8x8 cells holding piece identifiers
/// and a per-color registry of 16 slots holding the pieces themselves. Identifiers are issued
/// sequentially for each color and never reused, even after the piece is captured.
///
/// Row 0 is rank 8, column 0 is file A. White pawns go towards row 0.
///
/// Cloning the board makes a fully independent copy, which is what legality checks use for
/// lookahead: a candidate move is made on a copy, then the copy is checked for self-check.
///
/// The board does not enforce the move order. [`Board::move_piece()`] moves a piece of any color
/// and doesn't reject moves that leave the own king in check. Use [`Board::move_piece_checked()`]
/// to enforce both rules.
///
/// Two boards are equal if their grids, registries, turns and histories are equal. Identifier
/// counters are not compared, so removing a freshly added piece gives back an equal board.
#[derive(Debug, Clone)]
pub struct Board {
    cells: [[Option<PieceId>; 8]; 8],
    pieces: [[Option<Piece>; PieceId::SLOTS]; 2],
    issued: [u8; 2],
    side: Color,
    history: Vec<Move>,
}

fn initial_matrix() -> [[Piece; PieceId::SLOTS]; 2] {
    const OFFICERS: [(PieceKind, u8); 8] = [
        (PieceKind::King, 4),
        (PieceKind::Queen, 3),
        (PieceKind::Rook, 0),
        (PieceKind::Rook, 7),
        (PieceKind::Knight, 1),
        (PieceKind::Knight, 6),
        (PieceKind::Bishop, 2),
        (PieceKind::Bishop, 5),
    ];

    [Color::White, Color::Black].map(|color| {
        let home = geometry::home_row(color);
        let pawns = geometry::pawn_start_row(color);
        let mut side = [Piece::new(PieceKind::Pawn, color, Position::from_parts(pawns, 0)); 16];
        for (slot, (kind, col)) in OFFICERS.into_iter().enumerate() {
            side[slot] = Piece::new(kind, color, Position::from_parts(home, col));
        }
        for col in 0..8 {
            side[OFFICERS.len() + col as usize] =
                Piece::new(PieceKind::Pawn, color, Position::from_parts(pawns, col));
        }
        side
    })
}

impl Board {
    /// Creates an empty board with White to move
    pub fn new() -> Board {
        Board {
            cells: [[None; 8]; 8],
            pieces: [[None; PieceId::SLOTS]; 2],
            issued: [0; 2],
            side: Color::White,
            history: Vec::new(),
        }
    }

    /// Creates a board with the standard initial position
    ///
    /// For each color, the king gets identifier 1, the queen gets 2, rooks get 3-4, knights
    /// get 5-6, bishops get 7-8 and pawns get 9-16 (negated for Black).
    pub fn initial() -> Board {
        Board::from_matrix(initial_matrix())
    }

    /// Creates a board from two rows of pieces, White first
    ///
    /// Pieces are added alternately, i. e. `matrix[0][i]` goes before `matrix[1][i]`. Pieces
    /// which cannot be added (for example, because their cell is already taken) are skipped.
    pub fn from_matrix(matrix: [[Piece; PieceId::SLOTS]; 2]) -> Board {
        let mut b = Board::new();
        let [white, black] = matrix;
        for (w, bl) in white.into_iter().zip(black) {
            b.add_piece(w);
            b.add_piece(bl);
        }
        b
    }

    /// Returns the side to move
    #[inline]
    pub fn turn(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn set_turn(&mut self, side: Color) {
        self.side = side;
    }

    #[inline]
    pub fn switch_turn(&mut self) {
        self.side = self.side.inv();
    }

    /// Returns the identifier of the piece on `p`
    #[inline]
    pub fn id_at(&self, p: Position) -> Option<PieceId> {
        self.cells[p.row() as usize][p.col() as usize]
    }

    /// Looks up a live piece by its identifier
    #[inline]
    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces[id.color().index()][id.slot()].as_ref()
    }

    #[inline]
    pub fn piece_at(&self, p: Position) -> Option<&Piece> {
        self.id_at(p).and_then(|id| self.piece(id))
    }

    #[inline]
    pub fn is_empty_cell(&self, p: Position) -> bool {
        self.id_at(p).is_none()
    }

    /// Returns `true` if both cells hold pieces of the same color
    ///
    /// If any of the cells is empty, returns `false`.
    pub fn is_same_color(&self, a: Position, b: Position) -> bool {
        match (self.id_at(a), self.id_at(b)) {
            (Some(x), Some(y)) => x.color() == y.color(),
            _ => false,
        }
    }

    /// Iterates over live pieces of `color` in slot order
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = &Piece> + '_ {
        self.pieces[color.index()].iter().flatten()
    }

    /// Returns the king of `color`, if it is on the board
    pub fn king(&self, color: Color) -> Option<&Piece> {
        self.pieces(color).find(|p| p.kind() == PieceKind::King)
    }

    /// Moves made on this board, oldest first
    #[inline]
    pub fn history(&self) -> &[Move] {
        &self.history
    }

    #[inline]
    pub fn last_move(&self) -> Option<&Move> {
        self.history.last()
    }

    #[inline]
    pub fn check_system(&self) -> CheckSystem<'_> {
        CheckSystem::new(self)
    }

    #[inline]
    fn slot_mut(&mut self, id: PieceId) -> &mut Option<Piece> {
        &mut self.pieces[id.color().index()][id.slot()]
    }

    #[inline]
    fn put(&mut self, p: Position, id: Option<PieceId>) {
        self.cells[p.row() as usize][p.col() as usize] = id;
    }

    /// Adds a piece to the board and returns its new identifier
    ///
    /// Returns `None` if the target cell is occupied or all the identifiers of the piece's color
    /// are already issued. The piece is marked as being on board.
    pub fn add_piece(&mut self, mut piece: Piece) -> Option<PieceId> {
        let pos = piece.position();
        if !self.is_empty_cell(pos) {
            trace!(%pos, "cannot add piece: cell is occupied");
            return None;
        }
        let color = piece.color();
        let slot = self.issued[color.index()] as usize;
        if slot >= PieceId::SLOTS {
            debug!(?color, "cannot add piece: registry is full");
            return None;
        }

        let id = PieceId::from_slot(color, slot);
        self.issued[color.index()] += 1;
        piece.set_id(id);
        piece.set_on_board(true);
        *self.slot_mut(id) = Some(piece);
        self.put(pos, Some(id));
        self.selftest();
        Some(id)
    }

    /// Removes the piece from `pos` and returns it
    ///
    /// The returned piece keeps its identifier, but is marked as detached. The identifier is
    /// not issued again.
    pub fn remove_piece(&mut self, pos: Position) -> Option<Piece> {
        let Some(id) = self.id_at(pos) else {
            trace!(%pos, "nothing to remove");
            return None;
        };
        let piece = self.slot_mut(id).take();
        self.put(pos, None);
        self.selftest();
        piece.map(|mut p| {
            p.set_on_board(false);
            p
        })
    }

    pub(crate) fn relocate(&mut self, id: PieceId, dst: Position) {
        let src = match self.slot_mut(id) {
            Some(piece) => {
                let src = piece.position();
                piece.set_position(dst);
                piece.set_moved();
                src
            }
            None => return,
        };
        self.put(src, None);
        self.put(dst, Some(id));
        self.selftest();
    }

    pub(crate) fn promote(&mut self, id: PieceId, kind: PieceKind) {
        if let Some(piece) = self.slot_mut(id) {
            piece.set_kind(kind);
        }
        self.selftest();
    }

    /// Moves the castling rook to `dst`
    ///
    /// Returns `false` if `rook` is not a live rook or `dst` is occupied.
    pub fn teleport_rook_castle(&mut self, rook: PieceId, dst: Position) -> bool {
        match self.piece(rook) {
            Some(p) if p.kind() == PieceKind::Rook && self.is_empty_cell(dst) => {}
            _ => {
                trace!(%rook, %dst, "cannot teleport rook");
                return false;
            }
        }
        self.relocate(rook, dst);
        true
    }

    /// Moves the piece from `src` to `dst`, promoting pawns to queens
    ///
    /// See [`Board::move_piece_promote()`] for details.
    #[inline]
    pub fn move_piece(&mut self, src: Position, dst: Position) -> bool {
        self.move_piece_promote(src, dst, PromotePiece::Queen)
    }

    /// Moves the piece from `src` to `dst`
    ///
    /// Returns `false` and leaves the board intact if there is no piece on `src` or the move
    /// is not valid for it. Otherwise the move is made, the turn passes to the other side
    /// and the move is recorded in the history. A pawn reaching the last row becomes `promote`
    /// and keeps its identifier.
    ///
    /// Neither the side to move nor the self-check rule is enforced.
    pub fn move_piece_promote(&mut self, src: Position, dst: Position, promote: PromotePiece) -> bool {
        let Some(piece) = self.piece_at(src).copied() else {
            trace!(%src, %dst, "no piece to move");
            return false;
        };
        let info = piece.move_to(self, dst, promote);
        if !info.can_move() {
            trace!(%src, %dst, verdict = ?info.verdict(), "move rejected");
            return false;
        }
        self.switch_turn();
        self.history
            .push(Move::new(src, dst, piece, info.kind(), Some(promote)));
        true
    }

    /// Moves the piece with identifier `id` to the cell with notation `dst` (like `"E4"`)
    ///
    /// Fails if `dst` cannot be parsed. Returns `Ok(false)` if the piece is not on the board
    /// or cannot move there.
    pub fn move_piece_to(&mut self, id: PieceId, dst: &str) -> Result<bool, InvalidCoordinate> {
        let dst = Position::from_notation(dst)?;
        Ok(match self.piece(id) {
            Some(piece) => self.move_piece(piece.position(), dst),
            None => false,
        })
    }

    /// Makes the move `mv`, usually obtained from [`Board::get_all_possible_moves()`]
    pub fn apply(&mut self, mv: &Move) -> bool {
        if self.id_at(mv.src()) != mv.piece().id() {
            trace!(%mv, "move doesn't match the board");
            return false;
        }
        self.move_piece_promote(mv.src(), mv.dst(), mv.promote().unwrap_or_default())
    }

    /// Moves the piece only if it belongs to the side to move and the move is legal
    pub fn move_piece_checked(&mut self, src: Position, dst: Position) -> bool {
        match self.piece_at(src) {
            Some(p) if p.color() == self.side => {}
            _ => {
                trace!(%src, %dst, side = ?self.side, "not a piece of the side to move");
                return false;
            }
        }
        if !self.is_legal_move(src, dst) {
            trace!(%src, %dst, "move is not legal");
            return false;
        }
        self.move_piece(src, dst)
    }

    /// Checks whether the piece on `src` can go to `dst`, including castling
    ///
    /// The self-check rule is not considered, see [`Board::is_legal_move()`]. An empty `src`
    /// gives [`Verdict::Detached`].
    pub fn is_valid_move(&self, src: Position, dst: Position) -> MoveInfo {
        match self.piece_at(src) {
            Some(piece) => self.move_info(piece, dst),
            None => MoveInfo::rejected(dst, Verdict::Detached),
        }
    }

    pub(crate) fn move_info(&self, piece: &Piece, target: Position) -> MoveInfo {
        let info = piece.is_valid_move(self, target);
        if piece.kind() == PieceKind::King && info.verdict() == Verdict::BadShape {
            if let Some(side) = castling::side_of(piece.color(), piece.position(), target) {
                return self.castling_info(piece, side, target);
            }
        }
        info
    }

    fn castling_info(&self, king: &Piece, side: CastlingSide, target: Position) -> MoveInfo {
        let color = king.color();
        let blocked = MoveInfo::rejected(target, Verdict::Blocked);
        if king.has_moved() {
            return blocked;
        }

        let rook_src = castling::rook_src(color, side);
        let rook_ready = match self.piece_at(rook_src) {
            Some(r) => r.kind() == PieceKind::Rook && r.color() == color && !r.has_moved(),
            None => false,
        };
        if !rook_ready || !between::is_path_clear(self, king.position(), rook_src) {
            return blocked;
        }

        let check = self.check_system();
        let enemy = color.inv();
        if check.is_square_attacked(king.position(), enemy)
            || check.is_square_attacked(castling::rook_dst(color, side), enemy)
            || check.is_square_attacked(target, enemy)
        {
            return blocked;
        }
        MoveInfo::accepted(target, false, side.into())
    }

    /// Returns `true` if the move is valid and doesn't leave the own king in check
    #[inline]
    pub fn is_legal_move(&self, src: Position, dst: Position) -> bool {
        movegen::is_legal(self, src, dst)
    }

    /// Enumerates all legal moves of `color`, regardless of the side to move
    ///
    /// A promotion yields four moves, one for each choice, queen first.
    #[inline]
    pub fn get_all_possible_moves(&self, color: Color) -> MoveList {
        movegen::gen_legal(self, color)
    }

    #[inline]
    pub fn has_legal_moves(&self, color: Color) -> bool {
        movegen::has_legal_moves(self, color)
    }

    /// Returns `true` if `color` is in check and has no legal moves
    pub fn checkmate(&self, color: Color) -> bool {
        let mate = self.check_system().king_is_in_check(color) && !self.has_legal_moves(color);
        if mate {
            debug!(?color, "checkmate");
        }
        mate
    }

    /// Returns `true` if `color` is not in check, but has no legal moves
    pub fn stalemate(&self, color: Color) -> bool {
        let stale = !self.check_system().king_is_in_check(color) && !self.has_legal_moves(color);
        if stale {
            debug!(?color, "stalemate");
        }
        stale
    }

    /// Calculates the outcome for the side to move
    ///
    /// Returns `None` if the game is still running.
    pub fn calc_outcome(&self) -> Option<Outcome> {
        let side = self.side;
        if self.has_legal_moves(side) {
            return None;
        }
        let outcome = if self.check_system().king_is_in_check(side) {
            Outcome::Win {
                side: side.inv(),
                reason: WinReason::Checkmate,
            }
        } else {
            Outcome::Draw(DrawReason::Stalemate)
        };
        debug!(%outcome, "game is over");
        Some(outcome)
    }

    /// Returns `true` if the pawn on `p` can be taken enpassant by a pawn of `capturing`
    ///
    /// This holds only right after the pawn made a double move, i. e. the last move in the
    /// history is this pawn travelling two cells.
    pub fn can_be_en_passanted(&self, p: Position, capturing: Color) -> bool {
        let (Some(other), Some(last)) = (self.piece_at(p), self.history.last()) else {
            return false;
        };
        other.kind() == PieceKind::Pawn
            && other.color() != capturing
            && other.id().is_some()
            && other.id() == last.piece().id()
            && last.dst() == p
            && last.distance() == 2
    }

    /// Verifies that the grid and the registry agree with each other
    pub fn validate(&self) -> Result<(), ConsistencyError> {
        let mut seen = [[false; PieceId::SLOTS]; 2];
        for pos in Position::iter() {
            let Some(id) = self.id_at(pos) else {
                continue;
            };
            let piece = self
                .piece(id)
                .ok_or(ConsistencyError::DanglingId(pos, id))?;
            let mark = &mut seen[id.color().index()][id.slot()];
            if *mark {
                return Err(ConsistencyError::DuplicateId(id));
            }
            *mark = true;
            if !piece.is_on_board() {
                return Err(ConsistencyError::OffBoardInRegistry(id));
            }
            if piece.position() != pos {
                return Err(ConsistencyError::PositionMismatch {
                    id,
                    cell: pos,
                    registered: piece.position(),
                });
            }
        }

        for color in [Color::White, Color::Black] {
            for (slot, piece) in self.pieces[color.index()].iter().enumerate() {
                let Some(piece) = piece else {
                    continue;
                };
                let id = PieceId::from_slot(color, slot);
                if piece.id() != Some(id) || piece.color() != color {
                    return Err(ConsistencyError::WrongSlot { color, slot });
                }
                if slot >= self.issued[color.index()] as usize {
                    return Err(ConsistencyError::IdCounterBehind(id));
                }
                if !seen[color.index()][slot] {
                    return Err(ConsistencyError::MissingFromGrid(id));
                }
            }
        }
        Ok(())
    }

    #[inline]
    fn selftest(&self) {
        if cfg!(feature = "selftest") {
            if let Err(e) = self.validate() {
                panic!("board is inconsistent: {}", e);
            }
        }
    }

    /// Wraps the board to allow pretty-printing with the given style
    ///
    /// The resulting wrapper implements [`fmt::Display`], so can be used with
    /// `write!()`, `println!()`, or `ToString::to_string`.
    ///
    /// # Example
    ///
    /// ```
    /// # use gridchess::{Board, board::PrettyStyle};
    /// #
    /// let b = Board::initial();
    ///
    /// let res = r#"
    /// 8|rnbqkbnr
    /// 7|pppppppp
    /// 6|........
    /// 5|........
    /// 4|........
    /// 3|........
    /// 2|PPPPPPPP
    /// 1|RNBQKBNR
    /// -+--------
    /// W|ABCDEFGH
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    ///
    /// let res = r#"
    /// 8│♜♞♝♛♚♝♞♜
    /// 7│♟♟♟♟♟♟♟♟
    /// 6│........
    /// 5│........
    /// 4│........
    /// 3│........
    /// 2│♙♙♙♙♙♙♙♙
    /// 1│♖♘♗♕♔♗♘♖
    /// ─┼────────
    /// ○│ABCDEFGH
    /// "#;
    /// assert_eq!(b.pretty(PrettyStyle::Utf8).to_string().trim(), res.trim());
    /// ```
    #[inline]
    pub fn pretty(&self, style: PrettyStyle) -> Pretty<'_> {
        Pretty { board: self, style }
    }
}

impl Default for Board {
    #[inline]
    fn default() -> Board {
        Board::new()
    }
}

impl PartialEq for Board {
    #[inline]
    fn eq(&self, other: &Board) -> bool {
        self.cells == other.cells
            && self.pieces == other.pieces
            && self.side == other.side
            && self.history == other.history
    }
}

impl Eq for Board {}

impl Hash for Board {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cells.hash(state);
        self.pieces.hash(state);
        self.side.hash(state);
        self.history.hash(state);
    }
}

/// Prints the grid of identifiers, one row per line, `0` for empty cells
impl Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in &self.cells {
            for cell in row {
                write!(f, "{:>3}", cell.map_or(0, |id| id.get()))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Style for [`Board::pretty()`]
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PrettyStyle {
    /// Print pieces and frames as ASCII characters
    Ascii,
    /// Print pieces and frames as fancy Unicode characters
    Utf8,
}

/// Wrapper to pretty-print the board
///
/// See docs for [`Board::pretty()`] for more details.
pub struct Pretty<'a> {
    board: &'a Board,
    style: PrettyStyle,
}

trait StyleTable {
    const HORZ_FRAME: char;
    const VERT_FRAME: char;
    const ANGLE_FRAME: char;
    const WHITE_INDICATOR: char;
    const BLACK_INDICATOR: char;

    fn cell(p: &Piece) -> char;

    fn indicator(c: Color) -> char {
        match c {
            Color::White => Self::WHITE_INDICATOR,
            Color::Black => Self::BLACK_INDICATOR,
        }
    }

    fn fmt(b: &Board, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        for row in 0..8 {
            write!(f, "{}{}", Position::from_parts(row, 0).rank_char(), Self::VERT_FRAME)?;
            for col in 0..8 {
                let c = b.piece_at(Position::from_parts(row, col)).map_or('.', Self::cell);
                write!(f, "{}", c)?;
            }
            writeln!(f)?;
        }
        write!(f, "{}{}", Self::HORZ_FRAME, Self::ANGLE_FRAME)?;
        for _ in 0..8 {
            write!(f, "{}", Self::HORZ_FRAME)?;
        }
        writeln!(f)?;
        write!(f, "{}{}", Self::indicator(b.side), Self::VERT_FRAME)?;
        for col in 0..8 {
            write!(f, "{}", Position::from_parts(0, col).file_char())?;
        }
        writeln!(f)?;
        Ok(())
    }
}

struct AsciiStyleTable;
struct Utf8StyleTable;

impl StyleTable for AsciiStyleTable {
    const HORZ_FRAME: char = '-';
    const VERT_FRAME: char = '|';
    const ANGLE_FRAME: char = '+';
    const WHITE_INDICATOR: char = 'W';
    const BLACK_INDICATOR: char = 'B';

    fn cell(p: &Piece) -> char {
        p.kind().as_char(p.color())
    }
}

impl StyleTable for Utf8StyleTable {
    const HORZ_FRAME: char = '─';
    const VERT_FRAME: char = '│';
    const ANGLE_FRAME: char = '┼';
    const WHITE_INDICATOR: char = '○';
    const BLACK_INDICATOR: char = '●';

    fn cell(p: &Piece) -> char {
        p.symbol()
    }
}

impl<'a> Display for Pretty<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        match self.style {
            PrettyStyle::Ascii => AsciiStyleTable::fmt(self.board, f),
            PrettyStyle::Utf8 => Utf8StyleTable::fmt(self.board, f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveKind;
    use std::collections::hash_map::DefaultHasher;

    fn pos(s: &str) -> Position {
        Position::from_notation(s).unwrap()
    }

    fn put(b: &mut Board, kind: PieceKind, color: Color, s: &str) -> PieceId {
        b.add_piece(Piece::from_notation(kind, color, s).unwrap())
            .unwrap()
    }

    fn id(raw: i8) -> PieceId {
        PieceId::new(raw).unwrap()
    }

    fn hash_of(b: &Board) -> u64 {
        let mut hasher = DefaultHasher::new();
        b.hash(&mut hasher);
        hasher.finish()
    }

    fn kings(b: &mut Board, white: &str, black: &str) {
        put(b, PieceKind::King, Color::White, white);
        put(b, PieceKind::King, Color::Black, black);
    }

    #[test]
    fn test_initial() {
        let b = Board::initial();
        assert_eq!(b.turn(), Color::White);
        assert_eq!(b.pieces(Color::White).count(), 16);
        assert_eq!(b.pieces(Color::Black).count(), 16);
        assert_eq!(b.id_at(pos("E1")), Some(id(1)));
        assert_eq!(b.id_at(pos("E8")), Some(id(-1)));
        assert_eq!(b.id_at(pos("D1")), Some(id(2)));
        assert_eq!(b.id_at(pos("A1")), Some(id(3)));
        assert_eq!(b.id_at(pos("H8")), Some(id(-4)));
        assert_eq!(b.id_at(pos("G1")), Some(id(6)));
        assert_eq!(b.id_at(pos("C8")), Some(id(-7)));
        assert_eq!(b.id_at(pos("A2")), Some(id(9)));
        assert_eq!(b.id_at(pos("H7")), Some(id(-16)));
        assert!(b.is_empty_cell(pos("E4")));
        assert_eq!(b.king(Color::Black).map(Piece::position), Some(pos("E8")));
        assert!(b.is_same_color(pos("A1"), pos("H2")));
        assert!(!b.is_same_color(pos("A1"), pos("A8")));
        assert!(!b.is_same_color(pos("A1"), pos("A3")));
        assert!(b.history().is_empty());
        assert_eq!(b.validate(), Ok(()));
        assert_eq!(b.calc_outcome(), None);
    }

    #[test]
    fn test_add_remove() {
        let mut b = Board::new();
        let a = put(&mut b, PieceKind::Rook, Color::White, "A1");
        assert_eq!(a, id(1));
        assert_eq!(
            b.add_piece(Piece::from_notation(PieceKind::Knight, Color::Black, "A1").unwrap()),
            None
        );
        assert_eq!(b.remove_piece(pos("B1")), None);

        let removed = b.remove_piece(pos("A1")).unwrap();
        assert_eq!(removed.id(), Some(a));
        assert!(!removed.is_on_board());
        assert!(b.is_empty_cell(pos("A1")));
        assert_eq!(b.piece(a), None);

        // Identifiers are never reused
        assert_eq!(put(&mut b, PieceKind::Rook, Color::White, "A1"), id(2));
        assert_eq!(put(&mut b, PieceKind::Rook, Color::Black, "A2"), id(-1));
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn test_registry_full() {
        let mut b = Board::new();
        for (i, p) in Position::iter().take(16).enumerate() {
            let got = b.add_piece(Piece::new(PieceKind::Pawn, Color::Black, p));
            assert_eq!(got, Some(id(-(i as i8) - 1)));
        }
        b.remove_piece(Position::from_index(0));
        let extra = Piece::new(PieceKind::Pawn, Color::Black, Position::from_index(0));
        assert_eq!(b.add_piece(extra), None);
        let white = Piece::new(PieceKind::Pawn, Color::White, Position::from_index(0));
        assert_eq!(b.add_piece(white), Some(id(1)));
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn test_copy_independence() {
        let b = Board::initial();
        let mut c = b.clone();
        assert_eq!(b, c);
        assert!(c.move_piece(pos("E2"), pos("E4")));
        assert_ne!(b, c);
        assert!(b.is_empty_cell(pos("E4")));
        assert_eq!(b.id_at(pos("E2")), Some(id(13)));
        assert_eq!(b.turn(), Color::White);
        assert!(b.history().is_empty());
        assert!(!b.piece(id(13)).unwrap().has_moved());
        assert!(c.piece(id(13)).unwrap().has_moved());
    }

    #[test]
    fn test_move_piece() {
        let mut b = Board::initial();
        assert!(!b.move_piece(pos("E4"), pos("E5")));
        assert!(!b.move_piece(pos("E2"), pos("E5")));
        assert!(!b.move_piece(pos("A1"), pos("A3")));
        assert_eq!(b.turn(), Color::White);

        assert!(b.move_piece(pos("G1"), pos("F3")));
        assert_eq!(b.turn(), Color::Black);
        let last = b.last_move().unwrap();
        assert_eq!(last.src(), pos("G1"));
        assert_eq!(last.dst(), pos("F3"));
        assert_eq!(last.piece().id(), Some(id(6)));
        assert_eq!(last.distance(), 2);

        // The side to move is not enforced here
        assert!(b.move_piece(pos("B1"), pos("C3")));
        assert_eq!(b.turn(), Color::White);
        assert_eq!(b.history().len(), 2);
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn test_move_piece_to() {
        let mut b = Board::initial();
        assert_eq!(b.move_piece_to(id(13), "E4"), Ok(true));
        assert_eq!(b.id_at(pos("E4")), Some(id(13)));
        assert_eq!(b.move_piece_to(id(-13), "E3"), Ok(false));
        assert!(b.move_piece_to(id(-13), "E9").is_err());
        assert!(b.move_piece_to(id(-13), "Z5").is_err());
    }

    #[test]
    fn test_capture() {
        let mut b = Board::new();
        kings(&mut b, "E1", "E8");
        let rook = put(&mut b, PieceKind::Rook, Color::White, "A1");
        let knight = put(&mut b, PieceKind::Knight, Color::Black, "A7");
        assert!(b.is_valid_move(pos("A1"), pos("A7")).is_attack());
        assert_eq!(
            b.is_valid_move(pos("B1"), pos("B2")).verdict(),
            Verdict::Detached
        );
        assert!(b.move_piece(pos("A1"), pos("A7")));
        assert_eq!(b.id_at(pos("A7")), Some(rook));
        assert_eq!(b.piece(knight), None);
        assert_eq!(b.pieces(Color::Black).count(), 1);
        assert_eq!(b.validate(), Ok(()));
    }

    #[test]
    fn test_enpassant() {
        let mut b = Board::initial();
        for (src, dst) in [("E2", "E4"), ("A7", "A6"), ("E4", "E5"), ("D7", "D5")] {
            assert!(b.move_piece(pos(src), pos(dst)));
        }
        assert!(b.can_be_en_passanted(pos("D5"), Color::White));
        assert!(!b.can_be_en_passanted(pos("D5"), Color::Black));
        assert!(!b.can_be_en_passanted(pos("E5"), Color::Black));

        let mut after = b.clone();
        let info = after.is_valid_move(pos("E5"), pos("D6"));
        assert!(info.is_attack());
        assert_eq!(info.kind(), MoveKind::Enpassant);
        assert!(after.is_legal_move(pos("E5"), pos("D6")));
        assert!(after.move_piece(pos("E5"), pos("D6")));
        assert!(after.is_empty_cell(pos("D5")));
        assert!(after.is_empty_cell(pos("E5")));
        assert_eq!(after.id_at(pos("D6")), Some(id(13)));
        assert_eq!(after.piece(id(-12)), None);
        assert_eq!(after.last_move().unwrap().kind(), MoveKind::Enpassant);
        assert_eq!(after.validate(), Ok(()));

        // The right expires after any other move
        assert!(b.move_piece(pos("H2"), pos("H3")));
        assert!(b.move_piece(pos("A6"), pos("A5")));
        assert!(!b.can_be_en_passanted(pos("D5"), Color::White));
        assert!(!b.is_valid_move(pos("E5"), pos("D6")).can_move());
        assert!(!b.move_piece(pos("E5"), pos("D6")));
    }

    #[test]
    fn test_enpassant_single_steps() {
        let mut b = Board::initial();
        for (src, dst) in [("E2", "E4"), ("D7", "D6"), ("E4", "E5"), ("D6", "D5")] {
            assert!(b.move_piece(pos(src), pos(dst)));
        }
        // The pawn came from D7 in two moves, not in one double move
        assert!(!b.can_be_en_passanted(pos("D5"), Color::White));
        assert!(!b.is_valid_move(pos("E5"), pos("D6")).can_move());
    }

    #[test]
    fn test_checkmate() {
        let mut b = Board::new();
        put(&mut b, PieceKind::King, Color::Black, "H8");
        put(&mut b, PieceKind::Queen, Color::White, "G7");
        put(&mut b, PieceKind::King, Color::White, "F6");
        b.set_turn(Color::Black);

        assert!(b.check_system().king_is_in_check(Color::Black));
        assert!(!b.check_system().king_is_in_check(Color::White));
        assert!(b.checkmate(Color::Black));
        assert!(!b.stalemate(Color::Black));
        assert!(!b.checkmate(Color::White));
        assert!(b.get_all_possible_moves(Color::Black).is_empty());
        assert_eq!(
            b.calc_outcome(),
            Some(Outcome::Win {
                side: Color::White,
                reason: WinReason::Checkmate,
            })
        );
    }

    #[test]
    fn test_stalemate() {
        let mut b = Board::new();
        put(&mut b, PieceKind::King, Color::Black, "H8");
        put(&mut b, PieceKind::Queen, Color::White, "G6");
        put(&mut b, PieceKind::King, Color::White, "F7");
        b.set_turn(Color::Black);

        assert!(!b.check_system().king_is_in_check(Color::Black));
        assert!(b.stalemate(Color::Black));
        assert!(!b.checkmate(Color::Black));
        assert!(!b.stalemate(Color::White));
        assert_eq!(b.calc_outcome(), Some(Outcome::Draw(DrawReason::Stalemate)));
    }

    #[test]
    fn test_fools_mate() {
        let mut b = Board::initial();
        for (src, dst) in [("F2", "F3"), ("E7", "E5"), ("G2", "G4"), ("D8", "H4")] {
            assert!(b.move_piece_checked(pos(src), pos(dst)));
        }
        assert!(b.checkmate(Color::White));
        assert_eq!(
            b.calc_outcome(),
            Some(Outcome::Win {
                side: Color::Black,
                reason: WinReason::Checkmate,
            })
        );
    }

    #[test]
    fn test_self_check() {
        let mut b = Board::new();
        kings(&mut b, "E1", "A8");
        put(&mut b, PieceKind::Rook, Color::White, "E2");
        put(&mut b, PieceKind::Rook, Color::Black, "E8");

        assert!(b.is_valid_move(pos("E2"), pos("D2")).can_move());
        assert!(!b.is_legal_move(pos("E2"), pos("D2")));
        assert!(b.is_legal_move(pos("E2"), pos("E5")));
        assert!(b.is_legal_move(pos("E2"), pos("E8")));
        assert!(!b.move_piece_checked(pos("E2"), pos("D2")));
        assert!(!b.move_piece_checked(pos("E8"), pos("E2")));

        let moves = b.get_all_possible_moves(Color::White);
        assert!(moves.iter().all(|m| m.src() != pos("E2") || m.dst().col() == 4));
        assert!(moves.iter().any(|m| m.dst() == pos("E8")));

        // Unchecked moves may expose the king
        assert!(b.move_piece(pos("E2"), pos("D2")));
        assert!(b.check_system().king_is_in_check(Color::White));
    }

    #[test]
    fn test_castling() {
        let mut b = Board::new();
        kings(&mut b, "E1", "E8");
        let kingside = put(&mut b, PieceKind::Rook, Color::White, "H1");
        let queenside = put(&mut b, PieceKind::Rook, Color::White, "A1");

        let info = b.is_valid_move(pos("E1"), pos("G1"));
        assert_eq!(info.kind(), MoveKind::CastlingKingside);
        assert_eq!(
            b.is_valid_move(pos("E1"), pos("C1")).kind(),
            MoveKind::CastlingQueenside
        );
        assert!(b.is_legal_move(pos("E1"), pos("G1")));

        let mut c = b.clone();
        assert!(c.move_piece(pos("E1"), pos("G1")));
        assert_eq!(c.id_at(pos("G1")), Some(id(1)));
        assert_eq!(c.id_at(pos("F1")), Some(kingside));
        assert!(c.is_empty_cell(pos("H1")));
        assert!(c.piece(kingside).unwrap().has_moved());
        assert_eq!(c.turn(), Color::Black);
        assert_eq!(c.history().len(), 1);
        assert_eq!(c.validate(), Ok(()));

        let mut c = b.clone();
        assert!(c.move_piece(pos("E1"), pos("C1")));
        assert_eq!(c.id_at(pos("C1")), Some(id(1)));
        assert_eq!(c.id_at(pos("D1")), Some(queenside));
        assert!(c.is_empty_cell(pos("A1")));

        let moves = b.get_all_possible_moves(Color::White);
        assert!(moves.iter().any(|m| m.kind() == MoveKind::CastlingKingside));
        assert!(moves.iter().any(|m| m.kind() == MoveKind::CastlingQueenside));
    }

    #[test]
    fn test_castling_blocked() {
        let mut b = Board::new();
        kings(&mut b, "E1", "A8");
        put(&mut b, PieceKind::Rook, Color::White, "H1");
        put(&mut b, PieceKind::Rook, Color::White, "A1");
        put(&mut b, PieceKind::Knight, Color::White, "B1");
        assert!(!b.is_valid_move(pos("E1"), pos("C1")).can_move());
        assert!(b.is_valid_move(pos("E1"), pos("G1")).can_move());

        // Transit cell under attack
        let mut c = b.clone();
        put(&mut c, PieceKind::Rook, Color::Black, "F8");
        assert!(!c.is_valid_move(pos("E1"), pos("G1")).can_move());

        // Destination under attack
        let mut c = b.clone();
        put(&mut c, PieceKind::Bishop, Color::Black, "C5");
        assert!(!c.is_valid_move(pos("E1"), pos("G1")).can_move());

        // King in check
        let mut c = b.clone();
        put(&mut c, PieceKind::Rook, Color::Black, "E5");
        assert!(!c.is_valid_move(pos("E1"), pos("G1")).can_move());

        // King has already moved
        let mut c = b.clone();
        assert!(c.move_piece(pos("E1"), pos("E2")));
        assert!(c.move_piece(pos("E2"), pos("E1")));
        assert!(!c.is_valid_move(pos("E1"), pos("G1")).can_move());

        // Rook has already moved
        let mut c = b.clone();
        assert!(c.move_piece(pos("H1"), pos("H2")));
        assert!(c.move_piece(pos("H2"), pos("H1")));
        assert!(!c.is_valid_move(pos("E1"), pos("G1")).can_move());
    }

    #[test]
    fn test_teleport_rook() {
        let mut b = Board::new();
        let rook = put(&mut b, PieceKind::Rook, Color::Black, "A8");
        let knight = put(&mut b, PieceKind::Knight, Color::Black, "B8");
        assert!(!b.teleport_rook_castle(knight, pos("C8")));
        assert!(!b.teleport_rook_castle(rook, pos("B8")));
        assert!(b.teleport_rook_castle(rook, pos("D8")));
        assert_eq!(b.id_at(pos("D8")), Some(rook));
        assert!(b.history().is_empty());
    }

    #[test]
    fn test_promote() {
        let mut b = Board::new();
        kings(&mut b, "E1", "H8");
        let pawn = put(&mut b, PieceKind::Pawn, Color::White, "B7");

        let mut c = b.clone();
        assert!(c.move_piece(pos("B7"), pos("B8")));
        assert_eq!(c.id_at(pos("B8")), Some(pawn));
        assert_eq!(c.piece(pawn).unwrap().kind(), PieceKind::Queen);
        assert_eq!(c.last_move().unwrap().kind(), MoveKind::Promote);
        assert_eq!(c.last_move().unwrap().piece().kind(), PieceKind::Pawn);
        assert!(c.check_system().king_is_in_check(Color::Black));

        let mut c = b.clone();
        assert!(c.move_piece_promote(pos("B7"), pos("B8"), PromotePiece::Knight));
        assert_eq!(c.piece(pawn).unwrap().kind(), PieceKind::Knight);
        assert_eq!(c.last_move().unwrap().promote(), Some(PromotePiece::Knight));

        let promotions: Vec<_> = b
            .get_all_possible_moves(Color::White)
            .iter()
            .filter(|m| m.src() == pos("B7"))
            .map(|m| (m.dst(), m.promote()))
            .collect();
        assert_eq!(
            promotions,
            PromotePiece::ALL
                .iter()
                .map(|&p| (pos("B8"), Some(p)))
                .collect::<Vec<_>>()
        );

        let mv = b
            .get_all_possible_moves(Color::White)
            .iter()
            .copied()
            .find(|m| m.promote() == Some(PromotePiece::Rook))
            .unwrap();
        assert!(b.apply(&mv));
        assert_eq!(b.piece(pawn).unwrap().kind(), PieceKind::Rook);
        assert!(!b.apply(&mv));
    }

    #[test]
    fn test_validate() {
        let mut b = Board::initial();
        assert_eq!(b.validate(), Ok(()));

        let mut c = b.clone();
        c.cells[4][4] = Some(id(-1));
        assert_eq!(c.validate(), Err(ConsistencyError::DuplicateId(id(-1))));

        let mut c = b.clone();
        c.cells[7][4] = None;
        assert_eq!(c.validate(), Err(ConsistencyError::MissingFromGrid(id(1))));

        let mut c = b.clone();
        c.pieces[0][0] = None;
        assert_eq!(
            c.validate(),
            Err(ConsistencyError::DanglingId(pos("E1"), id(1)))
        );

        let mut c = b.clone();
        c.issued[1] = 3;
        assert_eq!(c.validate(), Err(ConsistencyError::IdCounterBehind(id(-4))));

        b.pieces[0].swap(2, 3);
        assert_eq!(
            b.validate(),
            Err(ConsistencyError::PositionMismatch {
                id: id(3),
                cell: pos("A1"),
                registered: pos("H1"),
            })
        );
    }

    #[cfg(feature = "selftest")]
    #[test]
    #[should_panic(expected = "board is inconsistent")]
    fn test_selftest_catches_corruption() {
        let mut b = Board::new();
        put(&mut b, PieceKind::Rook, Color::White, "A1");
        b.cells[4][4] = Some(id(1));
        put(&mut b, PieceKind::Rook, Color::Black, "H8");
    }

    #[test]
    fn test_eq_ignores_counters() {
        let mut b = Board::new();
        put(&mut b, PieceKind::Rook, Color::White, "A1");
        assert_ne!(b, Board::new());
        assert!(b.remove_piece(pos("A1")).is_some());
        assert_eq!(b, Board::new());
        assert_eq!(hash_of(&b), hash_of(&Board::new()));

        // Counters still differ, so the next identifier does too
        assert_eq!(put(&mut b, PieceKind::Rook, Color::White, "A1"), id(2));
        let mut fresh = Board::new();
        assert_eq!(put(&mut fresh, PieceKind::Rook, Color::White, "A1"), id(1));
        assert_ne!(b, fresh);

        let mut turned = Board::new();
        turned.switch_turn();
        assert_ne!(turned, Board::new());
    }

    #[test]
    fn test_display() {
        let mut b = Board::new();
        assert_eq!(b.to_string(), "  0  0  0  0  0  0  0  0\n".repeat(8));

        put(&mut b, PieceKind::King, Color::White, "A8");
        put(&mut b, PieceKind::King, Color::Black, "H1");
        let s = b.to_string();
        let lines: Vec<_> = s.lines().collect();
        assert_eq!(lines.len(), 8);
        assert_eq!(lines[0], "  1  0  0  0  0  0  0  0");
        assert_eq!(lines[7], "  0  0  0  0  0  0  0 -1");
    }

    #[test]
    fn test_pretty() {
        let mut b = Board::new();
        kings(&mut b, "G1", "B8");
        put(&mut b, PieceKind::Pawn, Color::Black, "C7");
        b.set_turn(Color::Black);

        let res = r#"
8|.k......
7|..p.....
6|........
5|........
4|........
3|........
2|........
1|......K.
-+--------
B|ABCDEFGH
"#;
        assert_eq!(b.pretty(PrettyStyle::Ascii).to_string().trim(), res.trim());
    }
}
