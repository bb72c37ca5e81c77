//! Check detection

use crate::board::Board;
use crate::types::{Color, PieceId, Position};

use arrayvec::ArrayVec;

/// Answers questions about attacked cells and checks on a board
///
/// Borrows the board, so it is cheap to create one for each query via [`Board::check_system()`].
#[derive(Debug, Copy, Clone)]
pub struct CheckSystem<'a> {
    board: &'a Board,
}

impl<'a> CheckSystem<'a> {
    #[inline]
    pub fn new(board: &'a Board) -> Self {
        CheckSystem { board }
    }

    #[inline]
    pub fn board(&self) -> &'a Board {
        self.board
    }

    /// Returns `true` if the king of `color` is attacked by any opposing piece
    ///
    /// A side without a king is never in check.
    pub fn king_is_in_check(&self, color: Color) -> bool {
        let Some(king) = self.board.king(color) else {
            return false;
        };
        let target = king.position();
        self.board
            .pieces(color.inv())
            .any(|p| p.is_valid_move(self.board, target).can_move())
    }

    /// Returns the identifiers of the pieces giving check to the king of `color`
    pub fn checkers(&self, color: Color) -> ArrayVec<PieceId, { PieceId::SLOTS }> {
        let mut res = ArrayVec::new();
        let Some(king) = self.board.king(color) else {
            return res;
        };
        let target = king.position();
        res.extend(
            self.board
                .pieces(color.inv())
                .filter(|p| p.is_valid_move(self.board, target).can_move())
                .filter_map(|p| p.id()),
        );
        res
    }

    /// Returns `true` if any piece of `by` attacks the cell `p`
    ///
    /// The cell may be empty. Pawns attack diagonally here, while pawn pushes are ignored.
    pub fn is_square_attacked(&self, p: Position, by: Color) -> bool {
        self.board.pieces(by).any(|piece| piece.attacks(self.board, p))
    }
}
