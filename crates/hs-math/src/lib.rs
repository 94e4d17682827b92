//! hmmseg math utilities.

pub mod math;

pub use math::argmax::*;
pub use math::stable::*;
