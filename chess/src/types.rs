//! Value types shared by all the modules
//!
//! They live in `gridchess_base` and are re-exported here.

pub use gridchess_base::types::*;
