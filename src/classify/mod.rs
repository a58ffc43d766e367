//! Outcome classification.
//!
//! After an action settles, the loop gathers an `Observation` (journal lines
//! plus targeting/gump state) and runs it through an ordered `RuleTable`.
//! The first matching rule decides the `Outcome`; nothing matching yields
//! `Outcome::Unclassified`.

mod classifier;
mod outcome;
mod rules;

pub use classifier::{Observation, OutcomeClassifier};
pub use outcome::{Outcome, OutcomeCategory};
pub use rules::{Rule, RuleTable, Signature};
