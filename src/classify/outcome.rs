//! Outcome classifications and how the loop reacts to each.

use std::fmt;

use serde::{Deserialize, Serialize};

/// What happened after one dispatched action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The action worked (fish caught, lock picked, item created, ...)
    Success,
    /// The attempt failed but nothing else changed
    Failed,
    /// The attempt produced nothing this time
    NothingFound,
    /// The client refused because another action is still cooling down
    Busy,
    OutOfRange,
    NotVisible,
    /// No target could be selected (cursor never opened or operator cancelled)
    TargetFailed,
    /// The selected target is not valid for this action
    InvalidTarget,
    /// The current spot is exhausted; a new target is needed
    AreaDepleted,
    /// The action itself did not go through (e.g. expected gump never opened)
    ActionFailed,
    ToolBroken,
    ConsumableExhausted,
    /// No known signal matched
    Unclassified,
}

/// How the loop controller reacts to an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeCategory {
    /// Continue normally
    Advance,
    /// Try again next iteration
    Retry,
    /// Try again after the cooldown delay
    Cooldown,
    /// Force a fresh manual target, then try again
    Retarget,
    /// Attempt one remediation, terminate if it fails
    Depleted,
    /// Notify the operator and try again
    Unclassified,
}

impl Outcome {
    /// All outcomes, in declaration order
    pub const ALL: [Outcome; 13] = [
        Outcome::Success,
        Outcome::Failed,
        Outcome::NothingFound,
        Outcome::Busy,
        Outcome::OutOfRange,
        Outcome::NotVisible,
        Outcome::TargetFailed,
        Outcome::InvalidTarget,
        Outcome::AreaDepleted,
        Outcome::ActionFailed,
        Outcome::ToolBroken,
        Outcome::ConsumableExhausted,
        Outcome::Unclassified,
    ];

    pub fn category(self) -> OutcomeCategory {
        match self {
            Outcome::Success => OutcomeCategory::Advance,
            Outcome::Failed | Outcome::NothingFound | Outcome::ActionFailed => OutcomeCategory::Retry,
            Outcome::Busy => OutcomeCategory::Cooldown,
            Outcome::OutOfRange
            | Outcome::NotVisible
            | Outcome::TargetFailed
            | Outcome::InvalidTarget
            | Outcome::AreaDepleted => OutcomeCategory::Retarget,
            Outcome::ToolBroken | Outcome::ConsumableExhausted => OutcomeCategory::Depleted,
            Outcome::Unclassified => OutcomeCategory::Unclassified,
        }
    }

    /// Operator text used when an activity has nothing more specific to say
    pub fn default_message(self) -> &'static str {
        match self {
            Outcome::Success => "Success",
            Outcome::Failed => "Failed, trying again",
            Outcome::NothingFound => "Nothing this time",
            Outcome::Busy => "Still busy, waiting",
            Outcome::OutOfRange => "Target is out of range, pick a new one",
            Outcome::NotVisible => "Target cannot be seen, pick a new one",
            Outcome::TargetFailed => "No target selected",
            Outcome::InvalidTarget => "That target will not work, pick a new one",
            Outcome::AreaDepleted => "Nothing left here, pick a new spot",
            Outcome::ActionFailed => "Action did not go through",
            Outcome::ToolBroken => "Tool broke",
            Outcome::ConsumableExhausted => "Out of supplies",
            Outcome::Unclassified => "Unknown result",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Outcome::Success => "success",
            Outcome::Failed => "failed",
            Outcome::NothingFound => "nothing_found",
            Outcome::Busy => "busy",
            Outcome::OutOfRange => "out_of_range",
            Outcome::NotVisible => "not_visible",
            Outcome::TargetFailed => "target_failed",
            Outcome::InvalidTarget => "invalid_target",
            Outcome::AreaDepleted => "area_depleted",
            Outcome::ActionFailed => "action_failed",
            Outcome::ToolBroken => "tool_broken",
            Outcome::ConsumableExhausted => "consumable_exhausted",
            Outcome::Unclassified => "unclassified",
        };
        write!(f, "{}", name)
    }
}
