//! Fishing: cast an equipped pole at a spot until it breaks.

use std::time::Duration;

use crate::classify::{Outcome, RuleTable};
use crate::config::{FishingConfig, TimingConfig};
use crate::dispatch::{Action, TargetChoice};
use crate::domain::LoopState;
use crate::error::{MacroError, Result};
use crate::host::{Host, Item, ItemQuery};
use crate::precondition::{Readiness, Remediation, require_equipped_tool};

use super::{Activity, busy_rule, targeting_rules};

const POLE: &str = "fishing pole";

#[derive(Debug, Clone)]
pub struct Fishing {
    config: FishingConfig,
}

impl Fishing {
    pub fn new(config: FishingConfig) -> Self {
        Self { config }
    }
}

impl Activity for Fishing {
    fn name(&self) -> &str {
        "fishing"
    }

    fn rules(&self) -> RuleTable {
        let table = RuleTable::new()
            .contains("fishing pole breaks", Outcome::ToolBroken)
            .contains("broke your fishing pole", Outcome::ToolBroken);
        let table = targeting_rules(table)
            .contains("need to be closer to the water", Outcome::OutOfRange)
            .contains("need water to fish in", Outcome::InvalidTarget)
            .contains("can't fish here", Outcome::InvalidTarget)
            .contains("fish don't seem to be biting here", Outcome::AreaDepleted);
        busy_rule(table)
            .contains("fail to catch anything", Outcome::NothingFound)
            .contains("you pull out", Outcome::Success)
            .contains("put it in your backpack", Outcome::Success)
            .with_priority_rules(&self.config.extra_rules)
    }

    fn check(&self, host: &dyn Host, _state: &LoopState, _timing: &TimingConfig) -> Readiness {
        require_equipped_tool(host, POLE, self.config.pole_graphic, self.config.pole_layer)
    }

    fn plan(&self, tool: Option<&Item>) -> Result<Action> {
        let pole = tool.ok_or_else(|| MacroError::InvalidState("fishing needs a pole".to_string()))?;
        Ok(Action::use_object(pole.serial, Duration::from_millis(self.config.cast_delay_ms)).targeting(TargetChoice::Last))
    }

    fn replenish(&self, _outcome: Outcome) -> Remediation {
        Remediation::acquire(
            POLE,
            ItemQuery::graphic(self.config.pole_graphic).in_backpack(),
            Some(self.config.pole_layer),
        )
    }

    fn describe(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => "Caught something!".to_string(),
            Outcome::NothingFound => "Nothing bit".to_string(),
            Outcome::ToolBroken => "Pole broke, equipping a spare".to_string(),
            Outcome::AreaDepleted => "Fish aren't biting here, pick a new spot".to_string(),
            Outcome::OutOfRange => "Too far from the water, pick a closer spot".to_string(),
            Outcome::InvalidTarget => "Can't fish there, pick water".to_string(),
            other => other.default_message().to_string(),
        }
    }
}
