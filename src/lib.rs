//! Macroloop - repetitive in-game activities driven by one loop controller.
//!
//! Fishing, lockpicking, item identification, crafting and skill training all
//! run through the same cycle: check preconditions, dispatch one action, wait
//! for it to settle, classify the journal, react. Activities only supply the
//! parameters of that cycle.

pub mod activity;
pub mod classify;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod error;
pub mod feedback;
pub mod host;
pub mod id;
pub mod precondition;
pub mod runner;

pub use error::{MacroError, Result};
