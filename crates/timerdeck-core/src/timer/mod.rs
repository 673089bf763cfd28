//! Timer entity and countdown arithmetic.

mod countdown;
mod entity;

pub use countdown::TimeLeft;
pub use entity::{Timer, TimerDoc, TimerId, TimerPhase};
