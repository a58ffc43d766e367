//! Crafting: open the tool's menu and press "make last" until the tool wears
//! out or materials run low.

use std::time::Duration;

use crate::classify::{Outcome, RuleTable, Signature};
use crate::config::{CraftingConfig, TimingConfig};
use crate::dispatch::Action;
use crate::domain::LoopState;
use crate::error::{MacroError, Result};
use crate::host::{Host, Item, ItemQuery};
use crate::precondition::{Readiness, Remediation, Shortfall, count_items, require_carried_tool};

use super::{Activity, busy_rule};

const TOOL: &str = "crafting tool";
const MATERIALS: &str = "crafting materials";

#[derive(Debug, Clone)]
pub struct Crafting {
    config: CraftingConfig,
}

impl Crafting {
    pub fn new(config: CraftingConfig) -> Self {
        Self { config }
    }

    fn materials(&self) -> Remediation {
        Remediation::Acquire {
            what: MATERIALS.to_string(),
            query: ItemQuery::graphic(self.config.material_graphic),
            min_amount: self.config.min_materials,
            equip: None,
        }
    }
}

impl Activity for Crafting {
    fn name(&self) -> &str {
        "crafting"
    }

    fn rules(&self) -> RuleTable {
        let table = RuleTable::new()
            .contains("worn out your tool", Outcome::ToolBroken)
            .contains("do not have sufficient", Outcome::ConsumableExhausted)
            .contains("don't have enough", Outcome::ConsumableExhausted)
            .when(Signature::GumpMissing, Outcome::ActionFailed);
        busy_rule(table)
            .contains("failed to create", Outcome::Failed)
            .contains("you create", Outcome::Success)
            .with_priority_rules(&self.config.extra_rules)
    }

    fn check(&self, host: &dyn Host, _state: &LoopState, _timing: &TimingConfig) -> Readiness {
        let readiness = require_carried_tool(host, TOOL, self.config.tool_graphic);
        if matches!(readiness, Readiness::NotReady(_)) {
            return readiness;
        }
        let have = count_items(host, &ItemQuery::graphic(self.config.material_graphic));
        if have < self.config.min_materials {
            return Readiness::NotReady(Shortfall::new(
                format!("Low on materials ({}/{}), searching", have, self.config.min_materials),
                self.materials(),
            ));
        }
        readiness
    }

    fn plan(&self, tool: Option<&Item>) -> Result<Action> {
        let tool = tool.ok_or_else(|| MacroError::InvalidState("crafting needs a tool".to_string()))?;
        Ok(Action::use_with_gump(
            tool.serial,
            self.config.gump,
            self.config.make_button,
            Duration::from_millis(self.config.craft_delay_ms),
        ))
    }

    fn replenish(&self, outcome: Outcome) -> Remediation {
        match outcome {
            Outcome::ConsumableExhausted => self.materials(),
            _ => Remediation::acquire(TOOL, ItemQuery::graphic(self.config.tool_graphic), None),
        }
    }

    fn describe(&self, outcome: Outcome) -> String {
        match outcome {
            Outcome::Success => "Crafted an item".to_string(),
            Outcome::Failed => "Crafting failed, materials lost".to_string(),
            Outcome::ToolBroken => "Tool worn out, switching tools".to_string(),
            Outcome::ConsumableExhausted => "Out of materials".to_string(),
            Outcome::ActionFailed => "Crafting menu did not open".to_string(),
            other => other.default_message().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Observation, OutcomeClassifier};
    use crate::dispatch::{ActionKind, GumpStatus, TargetStatus};
    use crate::host::{GumpId, JournalEntry, Scenario, Serial, SimulatedHost};

    fn classify(crafting: &Crafting, lines: &[&str], gump: GumpStatus) -> Outcome {
        let journal: Vec<_> = lines.iter().map(|l| JournalEntry::new(*l, 0)).collect();
        OutcomeClassifier::new(crafting.rules()).classify(&Observation {
            journal: &journal,
            target: TargetStatus::NotRequired,
            gump,
            hidden: false,
        })
    }

    fn stocked(ingots: u32) -> SimulatedHost {
        SimulatedHost::new(Scenario {
            items: vec![
                Item::new(1, 0x1EB8, "tinker's tools"),
                Item::new(2, 0x1BF2, "iron ingots").with_amount(ingots),
            ],
            ..Default::default()
        })
    }

    #[test]
    fn test_signals() {
        let crafting = Crafting::new(CraftingConfig::default());
        let pressed = GumpStatus::Pressed;
        assert_eq!(
            classify(&crafting, &["You create the item and put it in your backpack."], pressed),
            Outcome::Success
        );
        assert_eq!(classify(&crafting, &["You failed to create the item."], pressed), Outcome::Failed);
        assert_eq!(
            classify(&crafting, &["You create the item.", "You have worn out your tool!"], pressed),
            Outcome::ToolBroken
        );
        assert_eq!(classify(&crafting, &[], GumpStatus::Missing), Outcome::ActionFailed);
    }

    #[test]
    fn test_check_counts_materials() {
        let crafting = Crafting::new(CraftingConfig::default());
        let timing = TimingConfig::default();
        match crafting.check(&stocked(1), &LoopState::default(), &timing) {
            Readiness::NotReady(shortfall) => {
                assert!(shortfall.reason.contains("1/2"));
                assert_eq!(shortfall.remediation.failure_reason(), "required crafting materials unavailable");
            }
            other => panic!("Expected shortfall, got {:?}", other),
        }
        match crafting.check(&stocked(10), &LoopState::default(), &timing) {
            Readiness::Ready { tool } => assert_eq!(tool.unwrap().serial, Serial(1)),
            other => panic!("Expected ready, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_presses_make_button() {
        let crafting = Crafting::new(CraftingConfig::default());
        let tool = Item::new(1, 0x1EB8, "tinker's tools");
        let action = crafting.plan(Some(&tool)).unwrap();
        assert_eq!(
            action.kind,
            ActionKind::UseWithGump {
                item: Serial(1),
                gump: GumpId(0x38920ABD),
                button: 21,
            }
        );
        assert_eq!(action.target, None);
    }

    #[test]
    fn test_replenish_depends_on_outcome() {
        let crafting = Crafting::new(CraftingConfig::default());
        assert!(crafting.replenish(Outcome::ToolBroken).failure_reason().contains(TOOL));
        assert!(crafting.replenish(Outcome::ConsumableExhausted).failure_reason().contains(MATERIALS));
    }
}
