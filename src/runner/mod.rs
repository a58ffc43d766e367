//! Loop runner module - the activity loop controller.
//!
//! This module provides:
//! - LoopRunner for driving an activity against a host
//! - LoopPhase, the explicit states of one iteration

mod loop_runner;

pub use loop_runner::{LoopPhase, LoopRunner};
