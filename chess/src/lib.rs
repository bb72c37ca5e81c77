//! Chess rules on a dense grid of piece identifiers
//!
//! The board keeps every piece twice: the grid maps each cell to a piece identifier, and the
//! registry maps each identifier to the piece. Pieces decide move shapes, while the board adds
//! castling, enpassant, promotion and the self-check rule on top.
//!
//! With the `selftest` feature, the board checks itself with [`Board::validate()`] after every
//! mutation and panics on inconsistency. `cargo test --features selftest` runs the test suite
//! this way.
//!
//! # Example
//!
//! ```
//! use gridchess::{Board, Color, Position};
//!
//! let mut b = Board::initial();
//! let pos = |s| Position::from_notation(s).unwrap();
//!
//! assert!(b.move_piece_checked(pos("F2"), pos("F3")));
//! assert!(b.move_piece_checked(pos("E7"), pos("E5")));
//! assert!(b.move_piece_checked(pos("G2"), pos("G4")));
//! assert!(b.move_piece_checked(pos("D8"), pos("H4")));
//! assert!(b.checkmate(Color::White));
//! ```

pub mod board;
pub mod check;
pub mod movegen;
pub mod moves;
pub mod piece;
pub mod types;

mod between;
mod castling;

pub use board::{Board, ConsistencyError};
pub use check::CheckSystem;
pub use movegen::MoveList;
pub use moves::{Move, MoveInfo, MoveKind, PromotePiece, Verdict};
pub use piece::Piece;
pub use types::{CastlingSide, Color, InvalidCoordinate, Outcome, PieceId, PieceKind, Position};
