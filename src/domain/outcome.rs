//! Run outcome types.
//!
//! This module defines how a run ends and what it reports.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::classify::Outcome;

/// Why a run stopped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// A required item or state could not be restored
    Fatal(String),
    /// The configured iteration limit was reached
    IterationLimit,
    /// The host session ended
    Disconnected,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Termination::Fatal(reason) => write!(f, "fatal: {}", reason),
            Termination::IterationLimit => write!(f, "iteration limit reached"),
            Termination::Disconnected => write!(f, "host disconnected"),
        }
    }
}

/// Summary of a finished run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub run_id: String,
    pub activity: String,
    pub started_at: DateTime<Utc>,
    pub iterations: u64,
    pub remediations: u32,
    /// How often each outcome was classified
    pub outcomes: BTreeMap<Outcome, u64>,
    pub termination: Termination,
}

impl RunSummary {
    pub fn count(&self, outcome: Outcome) -> u64 {
        self.outcomes.get(&outcome).copied().unwrap_or(0)
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self.termination, Termination::Fatal(_))
    }
}
