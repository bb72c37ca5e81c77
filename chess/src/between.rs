use crate::board::Board;
use crate::types::Position;

/// Returns `true` if `src` and `dst` lie on one row or one column and differ
#[inline]
pub fn is_rook_valid(src: Position, dst: Position) -> bool {
    (src.diff_row(dst) == 0) != (src.diff_col(dst) == 0)
}

/// Returns `true` if `src` and `dst` lie on one diagonal and differ
#[inline]
pub fn is_bishop_valid(src: Position, dst: Position) -> bool {
    src.diff_row(dst) == src.diff_col(dst) && src.diff_row(dst) != 0
}

/// Iterator over the cells strictly between two aligned cells
#[derive(Debug, Clone)]
pub struct Strict {
    cur: Position,
    step_row: isize,
    step_col: isize,
    left: u8,
}

impl Iterator for Strict {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        if self.left == 0 {
            return None;
        }
        self.left -= 1;
        self.cur = self.cur.try_shift(self.step_row, self.step_col)?;
        Some(self.cur)
    }
}

/// Returns the cells strictly between `src` and `dst`
///
/// The cells must be aligned on a line or a diagonal, otherwise the result is meaningless.
#[inline]
pub fn strict(src: Position, dst: Position) -> Strict {
    Strict {
        cur: src,
        step_row: src.delta_row(dst).signum() as isize,
        step_col: src.delta_col(dst).signum() as isize,
        left: src.distance(dst).saturating_sub(1),
    }
}

#[inline]
pub fn is_path_clear(b: &Board, src: Position, dst: Position) -> bool {
    strict(src, dst).all(|p| b.is_empty_cell(p))
}
