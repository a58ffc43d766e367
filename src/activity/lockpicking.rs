//! Lockpicking: work a lockpick on a locked container.

use std::time::Duration;

use crate::classify::{Outcome, RuleTable};
use crate::config::{LockpickingConfig, TimingConfig};
use crate::dispatch::{Action, TargetChoice};
use crate::domain::LoopState;
use crate::error::{MacroError, Result};
use crate::host::{Host, Item, ItemQuery};
use crate::precondition::{Readiness, Remediation, require_carried_tool};

use super::{Activity, busy_rule, targeting_rules};

const LOCKPICK: &str = "lockpick";

#[derive(Debug, Clone)]
pub struct Lockpicking {
    config: LockpickingConfig,
}

impl Lockpicking {
    pub fn new(config: LockpickingConfig) -> Self {
        Self { config }
    }

    fn target(&self) -> TargetChoice {
        self.config.chest.map(TargetChoice::Object).unwrap_or(TargetChoice::Last)
    }
}

impl Activity for Lockpicking {
    fn name(&self) -> &str {
        "lockpicking"
    }

    fn rules(&self) -> RuleTable {
        let table = RuleTable::new().contains("broke the lockpick", Outcome::ConsumableExhausted);
        let table = targeting_rules(table)
            .contains("does not appear to be locked", Outcome::InvalidTarget)
            .contains("cannot be unlocked", Outcome::InvalidTarget);
        busy_rule(table)
            .contains("unable to pick the lock", Outcome::Failed)
            .contains("fail to pick the lock", Outcome::Failed)
            .contains("successfully pick the lock", Outcome::Success)
            .with_priority_rules(&self.config.extra_rules)
    }

    fn check(&self, host: &dyn Host, _state: &LoopState, _timing: &TimingConfig) -> Readiness {
        require_carried_tool(host, LOCKPICK, self.config.lockpick_graphic)
    }

    fn plan(&self, tool: Option<&Item>) -> Result<Action> {
        let pick = tool.ok_or_else(|| MacroError::InvalidState("lockpicking needs a lockpick".to_string()))?;
        Ok(Action::use_object(pick.serial, Duration::from_millis(self.config.attempt_delay_ms)).targeting(self.target()))
    }

    fn replenish(&self, _outcome: Outcome) -> Remediation {
        Remediation::acquire(LOCKPICK, ItemQuery::graphic(self.config.lockpick_graphic), None)
    }

    fn describe(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => "Lock picked!".to_string(),
            Outcome::Failed => "Failed to pick the lock".to_string(),
            Outcome::ConsumableExhausted => "Lockpick broke, using the next one".to_string(),
            Outcome::InvalidTarget => "That isn't locked, pick another container".to_string(),
            other => other.default_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Observation, OutcomeClassifier};
    use crate::dispatch::{GumpStatus, TargetStatus};
    use crate::host::{JournalEntry, Scenario, Serial, SimulatedHost};

    fn classify(activity: &Lockpicking, lines: &[&str], target: TargetStatus) -> Outcome {
        let journal: Vec<_> = lines.iter().map(|l| JournalEntry::new(*l, 0)).collect();
        OutcomeClassifier::new(activity.rules()).classify(&Observation {
            journal: &journal,
            target,
            gump: GumpStatus::NotRequired,
            hidden: false,
        })
    }

    #[test]
    fn test_signals() {
        let lockpicking = Lockpicking::new(LockpickingConfig::default());
        let reused = TargetStatus::Reused;
        assert_eq!(classify(&lockpicking, &["You broke the lockpick."], reused), Outcome::ConsumableExhausted);
        assert_eq!(classify(&lockpicking, &["You are unable to pick the lock."], reused), Outcome::Failed);
        assert_eq!(classify(&lockpicking, &["You successfully pick the lock."], reused), Outcome::Success);
        assert_eq!(classify(&lockpicking, &["That does not appear to be locked."], reused), Outcome::InvalidTarget);
        assert_eq!(classify(&lockpicking, &[], TargetStatus::Cancelled), Outcome::TargetFailed);
    }

    #[test]
    fn test_broken_pick_outranks_failure() {
        let lockpicking = Lockpicking::new(LockpickingConfig::default());
        assert_eq!(
            classify(
                &lockpicking,
                &["You are unable to pick the lock.", "You broke the lockpick."],
                TargetStatus::Reused
            ),
            Outcome::ConsumableExhausted
        );
    }

    #[test]
    fn test_configured_chest_is_targeted_directly() {
        let config = LockpickingConfig {
            chest: Some(Serial(0x4000_0010)),
            ..Default::default()
        };
        let pick = Item::new(5, 0x14FC, "lockpick").with_amount(20);
        let action = Lockpicking::new(config).plan(Some(&pick)).unwrap();
        assert_eq!(action.target, Some(TargetChoice::Object(Serial(0x4000_0010))));

        let action = Lockpicking::new(LockpickingConfig::default()).plan(Some(&pick)).unwrap();
        assert_eq!(action.target, Some(TargetChoice::Last));
    }

    #[test]
    fn test_check_without_picks() {
        let lockpicking = Lockpicking::new(LockpickingConfig::default());
        let host = SimulatedHost::new(Scenario::default());
        match lockpicking.check(&host, &LoopState::default(), &TimingConfig::default()) {
            Readiness::NotReady(shortfall) => {
                assert_eq!(shortfall.remediation.failure_reason(), "required lockpick unavailable");
            }
            other => panic!("Expected shortfall, got {:?}", other),
        }
    }
}
