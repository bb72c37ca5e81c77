use crate::types::Color;

/// Row with the king and the rooks at the start of the game
pub const fn home_row(c: Color) -> u8 {
    match c {
        Color::White => 7,
        Color::Black => 0,
    }
}

pub const fn pawn_start_row(c: Color) -> u8 {
    match c {
        Color::White => 6,
        Color::Black => 1,
    }
}

/// Row on which the pawns of color `c` are promoted
pub const fn promote_row(c: Color) -> u8 {
    match c {
        Color::White => 0,
        Color::Black => 7,
    }
}

/// Row on which a pawn of color `c` must stand to capture en passant
pub const fn enpassant_src_row(c: Color) -> u8 {
    match c {
        Color::White => 3,
        Color::Black => 4,
    }
}

pub const fn pawn_forward_delta(c: Color) -> i8 {
    match c {
        Color::White => -1,
        Color::Black => 1,
    }
}
