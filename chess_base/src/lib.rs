//! # Base types for gridchess
//!
//! This is an auxiliary crate for `gridchess`, which contains the plain value types: cells,
//! colors, piece kinds and identifiers. None of them knows anything about the board.
//!
//! Normally you don't want to use this crate directly. Use `gridchess` instead.

pub mod geometry;
pub mod types;
