//! Domain types for macroloop
//!
//! - LoopState: flags and counters carried across iterations
//! - Termination / RunSummary: how a run ended and what it saw

pub mod loop_state;
pub mod outcome;

pub use loop_state::LoopState;
pub use outcome::{RunSummary, Termination};
