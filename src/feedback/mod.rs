//! Operator feedback.
//!
//! Every classified outcome and every failed precondition produces one
//! operator-visible line through `Host::overhead_message`. The same text is
//! mirrored to the log. Feedback never influences control flow.

use crate::classify::{Outcome, OutcomeCategory};
use crate::host::{Host, Tone};
use crate::precondition::Shortfall;

/// Tone used for an outcome
pub fn tone_for(outcome: Outcome) -> Tone {
    match outcome.category() {
        OutcomeCategory::Advance => Tone::Success,
        OutcomeCategory::Retry | OutcomeCategory::Cooldown => Tone::Info,
        OutcomeCategory::Retarget | OutcomeCategory::Depleted | OutcomeCategory::Unclassified => Tone::Warning,
    }
}

/// Sends status lines to the operator.
#[derive(Debug, Clone)]
pub struct FeedbackEmitter {
    activity: String,
}

impl FeedbackEmitter {
    pub fn new(activity: impl Into<String>) -> Self {
        Self {
            activity: activity.into(),
        }
    }

    /// Report a classified outcome
    pub fn outcome(&self, host: &mut dyn Host, outcome: Outcome, text: &str) {
        log::info!("[{}] {}: {}", self.activity, outcome, text);
        host.overhead_message(text, tone_for(outcome));
    }

    /// Report a failed precondition
    pub fn shortfall(&self, host: &mut dyn Host, shortfall: &Shortfall) {
        let tone = if shortfall.is_wait() { Tone::Info } else { Tone::Warning };
        log::info!("[{}] precondition: {}", self.activity, shortfall.reason);
        host.overhead_message(&shortfall.reason, tone);
    }

    /// Report the reason a run is stopping
    pub fn fatal(&self, host: &mut dyn Host, reason: &str) {
        log::error!("[{}] stopping: {}", self.activity, reason);
        host.overhead_message(&format!("Stopping: {}", reason), Tone::Fatal);
    }

    /// Free-form status line
    pub fn say(&self, host: &mut dyn Host, text: &str, tone: Tone) {
        log::debug!("[{}] {}", self.activity, text);
        host.overhead_message(text, tone);
    }
}
