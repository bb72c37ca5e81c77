mod base;
mod info;

pub use base::*;
pub use info::*;
