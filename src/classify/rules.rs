//! Prioritized outcome rules.
//!
//! A rule pairs a signature (something observable after an action) with the
//! outcome it indicates. Tables are evaluated top to bottom and the first
//! match wins, so specific signals must sit above generic ones.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::classifier::Observation;
use super::outcome::Outcome;
use crate::dispatch::GumpStatus;

/// Something the classifier can look for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Signature {
    /// A journal line contains this text, ignoring case
    Contains(String),
    /// A journal line is exactly this text, ignoring surrounding whitespace
    Exact(String),
    /// The concealment flag has this value
    Hidden(bool),
    /// The action needed a target and did not get one
    TargetFailed,
    /// The action expected a gump that never opened
    GumpMissing,
}

impl Signature {
    pub fn matches(&self, observation: &Observation<'_>) -> bool {
        match self {
            Signature::Contains(needle) => {
                let needle = needle.to_lowercase();
                observation
                    .journal
                    .iter()
                    .any(|entry| entry.text.to_lowercase().contains(&needle))
            }
            Signature::Exact(text) => observation.journal.iter().any(|entry| entry.text.trim() == text.as_str()),
            Signature::Hidden(hidden) => observation.hidden == *hidden,
            Signature::TargetFailed => observation.target.is_failure(),
            Signature::GumpMissing => observation.gump == GumpStatus::Missing,
        }
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signature::Contains(text) => write!(f, "journal contains \"{}\"", text),
            Signature::Exact(text) => write!(f, "journal line is \"{}\"", text),
            Signature::Hidden(true) => write!(f, "player is hidden"),
            Signature::Hidden(false) => write!(f, "player is visible"),
            Signature::TargetFailed => write!(f, "no target acquired"),
            Signature::GumpMissing => write!(f, "expected gump did not open"),
        }
    }
}

/// A signature and the outcome it indicates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub signature: Signature,
    pub outcome: Outcome,
}

impl Rule {
    pub fn new(signature: Signature, outcome: Outcome) -> Self {
        Self { signature, outcome }
    }
}

/// Ordered list of rules; earlier rules take precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule matching a journal substring
    pub fn contains(self, text: impl Into<String>, outcome: Outcome) -> Self {
        self.when(Signature::Contains(text.into()), outcome)
    }

    /// Append a rule matching a whole journal line
    pub fn exact(self, text: impl Into<String>, outcome: Outcome) -> Self {
        self.when(Signature::Exact(text.into()), outcome)
    }

    /// Append an arbitrary rule
    pub fn when(mut self, signature: Signature, outcome: Outcome) -> Self {
        self.rules.push(Rule::new(signature, outcome));
        self
    }

    /// Return a table with `extra` evaluated before the existing rules
    pub fn with_priority_rules(self, extra: &[Rule]) -> Self {
        let mut rules = extra.to_vec();
        rules.extend(self.rules);
        Self { rules }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl From<Vec<Rule>> for RuleTable {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}
