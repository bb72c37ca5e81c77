use crate::types::{CastlingSide, Color, Position};
use gridchess_base::geometry;

const KING_FILE: u8 = 4;

#[inline]
pub const fn king_src(c: Color) -> Position {
    Position::from_parts(geometry::home_row(c), KING_FILE)
}

#[inline]
pub const fn king_dst(c: Color, s: CastlingSide) -> Position {
    let col = match s {
        CastlingSide::King => 6,
        CastlingSide::Queen => 2,
    };
    Position::from_parts(geometry::home_row(c), col)
}

#[inline]
pub const fn rook_src(c: Color, s: CastlingSide) -> Position {
    let col = match s {
        CastlingSide::King => 7,
        CastlingSide::Queen => 0,
    };
    Position::from_parts(geometry::home_row(c), col)
}

/// Cell the rook lands on, which is also the cell the king passes through
#[inline]
pub const fn rook_dst(c: Color, s: CastlingSide) -> Position {
    let col = match s {
        CastlingSide::King => 5,
        CastlingSide::Queen => 3,
    };
    Position::from_parts(geometry::home_row(c), col)
}

/// Detects whether a king move from `src` to `dst` is a castling request
pub fn side_of(c: Color, src: Position, dst: Position) -> Option<CastlingSide> {
    if src != king_src(c) {
        return None;
    }
    [CastlingSide::King, CastlingSide::Queen]
        .into_iter()
        .find(|&s| king_dst(c, s) == dst)
}
