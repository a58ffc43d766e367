//! Skill training driven by a `TrainerDefinition`.

use std::time::Duration;

use crate::classify::{Outcome, RuleTable, Signature};
use crate::config::{TimingConfig, TrainerDefinition};
use crate::dispatch::Action;
use crate::domain::LoopState;
use crate::error::Result;
use crate::host::{Host, Item, Vital};
use crate::precondition::{Readiness, Remediation, Shortfall, check_vital};

use super::{Activity, busy_rule, targeting_rules};

/// Hiding takes this long to settle before the hidden state shows.
const HIDE_SETTLE: Duration = Duration::from_millis(1_500);

#[derive(Debug, Clone)]
pub struct SkillTraining {
    trainer: TrainerDefinition,
}

impl SkillTraining {
    pub fn new(trainer: TrainerDefinition) -> Self {
        Self { trainer }
    }

    fn skill_delay(&self) -> Duration {
        Duration::from_millis(self.trainer.skill_delay_ms)
    }
}

impl Activity for SkillTraining {
    fn name(&self) -> &str {
        &self.trainer.name
    }

    fn rules(&self) -> RuleTable {
        let mut table = RuleTable::new();
        if self.trainer.target.is_some() {
            table = targeting_rules(table);
        }
        if self.trainer.requires_hidden {
            // Revealed mid-attempt; the next check hides again.
            table = table.when(Signature::Hidden(false), Outcome::Failed);
        }
        table = busy_rule(table);
        for text in &self.trainer.failure {
            table = table.contains(text.as_str(), Outcome::Failed);
        }
        for text in &self.trainer.success {
            table = table.contains(text.as_str(), Outcome::Success);
        }
        table.with_priority_rules(&self.trainer.extra_rules)
    }

    fn check(&self, host: &dyn Host, _state: &LoopState, timing: &TimingConfig) -> Readiness {
        if let Some(min) = self.trainer.min_mana {
            if let Some(shortfall) = check_vital(host, Vital::Mana, min, timing) {
                return Readiness::NotReady(shortfall);
            }
        }
        if self.trainer.requires_hidden && !host.is_hidden() {
            return Readiness::NotReady(Shortfall::new(
                format!("{} needs hiding, hiding first", self.trainer.skill),
                Remediation::UseSkill {
                    skill: "Hiding".to_string(),
                    settle: HIDE_SETTLE,
                    expect_hidden: true,
                },
            ));
        }
        Readiness::ready()
    }

    fn plan(&self, _tool: Option<&Item>) -> Result<Action> {
        let action = Action::use_skill(self.trainer.skill.as_str(), self.skill_delay());
        Ok(match self.trainer.target {
            Some(choice) => action.targeting(choice),
            None => action,
        })
    }

    fn replenish(&self, _outcome: Outcome) -> Remediation {
        Remediation::Wait {
            delay: self.skill_delay(),
        }
    }

    fn describe(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => format!("{} succeeded", self.trainer.skill),
            Outcome::Failed => format!("{} failed", self.trainer.skill),
            other => other.default_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Observation, OutcomeClassifier};
    use crate::dispatch::{ActionKind, GumpStatus, TargetChoice, TargetStatus};
    use crate::host::{JournalEntry, Scenario, SimulatedHost, Vitals};

    fn builtin(name: &str) -> SkillTraining {
        let trainer = TrainerDefinition::builtins()
            .into_iter()
            .find(|t| t.name == name)
            .unwrap();
        SkillTraining::new(trainer)
    }

    fn classify(activity: &SkillTraining, lines: &[&str], hidden: bool) -> Outcome {
        let journal: Vec<_> = lines.iter().map(|l| JournalEntry::new(*l, 0)).collect();
        OutcomeClassifier::new(activity.rules()).classify(&Observation {
            journal: &journal,
            target: TargetStatus::NotRequired,
            gump: GumpStatus::NotRequired,
            hidden,
        })
    }

    #[test]
    fn test_hiding_messages() {
        let hiding = builtin("hiding");
        assert_eq!(classify(&hiding, &["You have hidden yourself well."], true), Outcome::Success);
        assert_eq!(classify(&hiding, &["You can't seem to hide here."], false), Outcome::Failed);
    }

    #[test]
    fn test_stealth_failure_when_revealed() {
        let stealth = builtin("stealth");
        assert_eq!(classify(&stealth, &["You begin to move quietly."], true), Outcome::Success);
        assert_eq!(classify(&stealth, &["You begin to move quietly."], false), Outcome::Failed);
    }

    #[test]
    fn test_low_mana_waits() {
        let spirit = builtin("spirit_speak");
        let host = SimulatedHost::new(Scenario {
            vitals: Vitals {
                mana: 3,
                ..Default::default()
            },
            ..Default::default()
        });
        match spirit.check(&host, &LoopState::default(), &TimingConfig::default()) {
            Readiness::NotReady(shortfall) => assert!(shortfall.is_wait()),
            other => panic!("Expected wait, got {:?}", other),
        }
    }

    #[test]
    fn test_stealth_hides_first() {
        let stealth = builtin("stealth");
        let host = SimulatedHost::new(Scenario::default());
        match stealth.check(&host, &LoopState::default(), &TimingConfig::default()) {
            Readiness::NotReady(shortfall) => match shortfall.remediation {
                Remediation::UseSkill { skill, .. } => assert_eq!(skill, "Hiding"),
                other => panic!("Expected hiding, got {:?}", other),
            },
            other => panic!("Expected shortfall, got {:?}", other),
        }

        let hidden = SimulatedHost::new(Scenario {
            hidden: true,
            ..Default::default()
        });
        assert_eq!(
            stealth.check(&hidden, &LoopState::default(), &TimingConfig::default()),
            Readiness::ready()
        );
    }

    #[test]
    fn test_targeted_trainer() {
        let mut trainer = builtin("hiding").trainer;
        trainer.target = Some(TargetChoice::Myself);
        let activity = SkillTraining::new(trainer);
        let action = activity.plan(None).unwrap();
        assert_eq!(action.kind, ActionKind::UseSkill("Hiding".to_string()));
        assert_eq!(action.target, Some(TargetChoice::Myself));
        assert_eq!(activity.rules().iter().next().unwrap().outcome, Outcome::TargetFailed);
    }
}
