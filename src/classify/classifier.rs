//! Outcome classifier.

use super::outcome::Outcome;
use super::rules::{Rule, RuleTable};
use crate::dispatch::{GumpStatus, TargetStatus};
use crate::host::JournalEntry;

/// Everything observable after one action settled.
#[derive(Debug, Clone, Copy)]
pub struct Observation<'a> {
    pub journal: &'a [JournalEntry],
    pub target: TargetStatus,
    pub gump: GumpStatus,
    pub hidden: bool,
}

/// Classifies observations against a prioritized rule table.
///
/// Classification never mutates anything: the same observation always yields
/// the same outcome.
#[derive(Debug, Clone)]
pub struct OutcomeClassifier {
    rules: RuleTable,
}

impl OutcomeClassifier {
    pub fn new(rules: RuleTable) -> Self {
        Self { rules }
    }

    /// First rule whose signature matches, if any
    pub fn matching_rule(&self, observation: &Observation<'_>) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.signature.matches(observation))
    }

    pub fn classify(&self, observation: &Observation<'_>) -> Outcome {
        self.matching_rule(observation)
            .map(|rule| rule.outcome)
            .unwrap_or(Outcome::Unclassified)
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }
}
