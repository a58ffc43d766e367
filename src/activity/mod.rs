//! Activities - the parameterizations of the activity loop.
//!
//! An activity decides what "ready" means, which single action to dispatch,
//! which journal signals mean what, and how to restore a depleted resource.
//! The loop controller in `runner` is the same for all of them.

use std::collections::BTreeMap;

use crate::classify::{Outcome, RuleTable, Signature};
use crate::config::{GlobalConfig, TimingConfig, TrainerDefinition};
use crate::dispatch::Action;
use crate::domain::LoopState;
use crate::error::{MacroError, Result};
use crate::host::{Host, Item};
use crate::precondition::{Readiness, Remediation};

mod crafting;
mod fishing;
mod identification;
mod lockpicking;
mod training;

pub use crafting::Crafting;
pub use fishing::Fishing;
pub use identification::Identification;
pub use lockpicking::Lockpicking;
pub use training::SkillTraining;

/// One repetitive in-game activity.
pub trait Activity {
    /// Short name used in logs and on the command line
    fn name(&self) -> &str;

    /// Outcome rules in priority order
    fn rules(&self) -> RuleTable;

    /// Decide whether the next action can be dispatched. Must not change
    /// anything on the host.
    fn check(&self, host: &dyn Host, state: &LoopState, timing: &TimingConfig) -> Readiness;

    /// The action for this iteration, given the tool found by `check`
    fn plan(&self, tool: Option<&Item>) -> Result<Action>;

    /// How to restore the resource lost to a depletion outcome
    fn replenish(&self, outcome: Outcome) -> Remediation;

    /// Operator text for an outcome
    fn describe(&self, outcome: Outcome) -> String {
        outcome.default_message().to_string()
    }
}

impl<A: Activity + ?Sized> Activity for Box<A> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn rules(&self) -> RuleTable {
        (**self).rules()
    }

    fn check(&self, host: &dyn Host, state: &LoopState, timing: &TimingConfig) -> Readiness {
        (**self).check(host, state, timing)
    }

    fn plan(&self, tool: Option<&Item>) -> Result<Action> {
        (**self).plan(tool)
    }

    fn replenish(&self, outcome: Outcome) -> Remediation {
        (**self).replenish(outcome)
    }

    fn describe(&self, outcome: Outcome) -> String {
        (**self).describe(outcome)
    }
}

/// Rules shared by every targeted action: a failed target first, then range
/// and line-of-sight complaints.
pub(crate) fn targeting_rules(table: RuleTable) -> RuleTable {
    table
        .when(Signature::TargetFailed, Outcome::TargetFailed)
        .contains("too far away", Outcome::OutOfRange)
        .contains("target cannot be seen", Outcome::NotVisible)
        .contains("can't see that", Outcome::NotVisible)
}

/// The client's generic "slow down" message.
pub(crate) fn busy_rule(table: RuleTable) -> RuleTable {
    table.contains("must wait to perform another action", Outcome::Busy)
}

/// Names of the fixed activities; trainers are added from their definitions.
pub const FIXED_ACTIVITIES: [&str; 4] = ["fishing", "lockpicking", "identification", "crafting"];

/// Every activity name that `build_activity` accepts.
pub fn available_activities(trainers: &BTreeMap<String, TrainerDefinition>) -> Vec<String> {
    FIXED_ACTIVITIES
        .iter()
        .map(|s| s.to_string())
        .chain(trainers.keys().cloned())
        .collect()
}

/// Construct an activity by name.
pub fn build_activity(
    name: &str,
    config: &GlobalConfig,
    trainers: &BTreeMap<String, TrainerDefinition>,
) -> Result<Box<dyn Activity>> {
    let activity: Box<dyn Activity> = match name {
        "fishing" => Box::new(Fishing::new(config.fishing.clone())),
        "lockpicking" => Box::new(Lockpicking::new(config.lockpicking.clone())),
        "identification" => Box::new(Identification::new(config.identification.clone())),
        "crafting" => Box::new(Crafting::new(config.crafting.clone())),
        other => match trainers.get(other) {
            Some(trainer) => Box::new(SkillTraining::new(trainer.clone())),
            None => {
                return Err(MacroError::Config(format!(
                    "unknown activity '{}' (available: {})",
                    other,
                    available_activities(trainers).join(", ")
                )));
            }
        },
    };
    Ok(activity)
}
