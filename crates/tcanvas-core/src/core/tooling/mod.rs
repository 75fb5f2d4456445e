//! Outcome shaping for CLI-facing results.

mod messages;
pub mod outcome;

pub(crate) use messages::*;
