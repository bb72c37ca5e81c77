//! Legal move generation
//!
//! Legality is decided by lookahead: each candidate move is made on a copy of the board, and
//! the move is kept only if the mover's king is not in check on the copy.

use crate::board::Board;
use crate::moves::{Move, MoveKind, PromotePiece};
use crate::piece::Piece;
use crate::types::{Color, Position};

use std::ops::{Deref, DerefMut};
use std::slice;

use arrayvec::ArrayVec;

/// Capacity of [`MoveList`]
///
/// A side has at most 16 pieces, and no position yields more legal moves than this even when
/// each promotion is counted four times.
pub const MAX_MOVES: usize = 512;

#[derive(Default, Debug, Clone, Eq, PartialEq)]
pub struct MoveList(ArrayVec<Move, MAX_MOVES>);

impl Deref for MoveList {
    type Target = ArrayVec<Move, MAX_MOVES>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for MoveList {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a mut MoveList {
    type Item = &'a mut Move;
    type IntoIter = slice::IterMut<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter_mut()
    }
}

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }
}

fn keeps_king_safe(b: &Board, src: Position, dst: Position, color: Color) -> bool {
    let mut after = b.clone();
    after.move_piece(src, dst) && !after.check_system().king_is_in_check(color)
}

fn is_legal_for(b: &Board, piece: &Piece, dst: Position) -> bool {
    b.move_info(piece, dst).can_move() && keeps_king_safe(b, piece.position(), dst, piece.color())
}

/// Returns `true` if the piece on `src` can legally go to `dst`
///
/// The side to move is not taken into account.
pub fn is_legal(b: &Board, src: Position, dst: Position) -> bool {
    match b.piece_at(src) {
        Some(piece) => is_legal_for(b, piece, dst),
        None => false,
    }
}

/// Generates all legal moves for the pieces of `color`
///
/// Moves are ordered by piece slot, then by target cell. A promotion yields one move per
/// [`PromotePiece`], strongest first.
pub fn gen_legal(b: &Board, color: Color) -> MoveList {
    let mut res = MoveList::new();
    for piece in b.pieces(color) {
        let src = piece.position();
        for dst in Position::iter() {
            let info = b.move_info(piece, dst);
            if !info.can_move() || !keeps_king_safe(b, src, dst, color) {
                continue;
            }
            match info.kind() {
                MoveKind::Promote => {
                    for p in PromotePiece::ALL {
                        res.push(Move::new(src, dst, *piece, MoveKind::Promote, Some(p)));
                    }
                }
                kind => res.push(Move::new(src, dst, *piece, kind, None)),
            }
        }
    }
    res
}

/// Returns `true` if `color` has at least one legal move
///
/// Stops at the first legal move found, so it's faster than checking [`gen_legal()`] for
/// emptiness.
pub fn has_legal_moves(b: &Board, color: Color) -> bool {
    b.pieces(color)
        .any(|piece| Position::iter().any(|dst| is_legal_for(b, piece, dst)))
}
