//! Core math modules.

pub mod argmax;
pub mod stable;
