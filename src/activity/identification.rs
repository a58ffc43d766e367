//! Item identification: use the skill on one item over and over.

use std::time::Duration;

use crate::classify::{Outcome, RuleTable};
use crate::config::{IdentificationConfig, TimingConfig};
use crate::dispatch::{Action, TargetChoice};
use crate::domain::LoopState;
use crate::error::Result;
use crate::host::{Host, Item, ItemQuery};
use crate::precondition::{Readiness, Remediation, Shortfall};

use super::{Activity, busy_rule, targeting_rules};

const SKILL: &str = "Item Identification";

#[derive(Debug, Clone)]
pub struct Identification {
    config: IdentificationConfig,
}

impl Identification {
    pub fn new(config: IdentificationConfig) -> Self {
        Self { config }
    }

    fn item_query(&self) -> ItemQuery {
        match self.config.item {
            Some(serial) => ItemQuery::serial(serial),
            None => ItemQuery::default().in_backpack(),
        }
    }
}

impl Activity for Identification {
    fn name(&self) -> &str {
        "identification"
    }

    fn rules(&self) -> RuleTable {
        let table = targeting_rules(RuleTable::new()).contains("not an item", Outcome::InvalidTarget);
        busy_rule(table)
            .contains("you are not certain", Outcome::Failed)
            .contains("appears to be", Outcome::Success)
            .with_priority_rules(&self.config.extra_rules)
    }

    fn check(&self, host: &dyn Host, _state: &LoopState, _timing: &TimingConfig) -> Readiness {
        let Some(serial) = self.config.item else {
            return Readiness::ready();
        };
        if host.find_items(&ItemQuery::serial(serial)).is_empty() {
            return Readiness::NotReady(Shortfall::new(
                format!("Item {} is gone, searching", serial),
                self.replenish(Outcome::ConsumableExhausted),
            ));
        }
        Readiness::ready()
    }

    fn plan(&self, _tool: Option<&Item>) -> Result<Action> {
        let target = self.config.item.map(TargetChoice::Object).unwrap_or(TargetChoice::Last);
        Ok(Action::use_skill(SKILL, Duration::from_millis(self.config.skill_delay_ms)).targeting(target))
    }

    fn replenish(&self, _outcome: Outcome) -> Remediation {
        Remediation::acquire("item to identify", self.item_query(), None)
    }

    fn describe(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => "Identified".to_string(),
            Outcome::Failed => "Not certain what that is".to_string(),
            other => other.default_message().to_string(),
        }
    }
}
