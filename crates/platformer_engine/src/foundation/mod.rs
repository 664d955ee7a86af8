//! Shared building blocks: vector and matrix types, the frame clock and
//! logger setup.

pub mod math;
pub mod time;
pub mod logging;
