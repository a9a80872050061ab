//! Services around the core engine: usage tracking, trigger detection and
//! random insertion.

pub mod popularity;
pub mod random;
pub mod trigger;
