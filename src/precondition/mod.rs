//! Precondition checks and remediation.
//!
//! Before each action an activity reports whether it is ready. When it is
//! not, it names one `Remediation`; the loop performs that remediation once
//! and terminates if it fails. A tool that sits in the backpack is a cheap
//! fix (equip it); a tool that is nowhere at all escalates to a single
//! re-scan of the inventory and is fatal if still missing.

use std::time::Duration;

use crate::config::TimingConfig;
use crate::error::Result;
use crate::host::{Host, Item, ItemQuery, Layer, Vital};

/// Where a required tool currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLocation {
    InHand(Item),
    InBackpack(Item),
    Missing,
}

/// Find a tool by graphic, preferring the one already equipped on `layer`.
pub fn locate_tool(host: &dyn Host, graphic: u16, layer: Layer) -> ToolLocation {
    if let Some(item) = host.equipped(layer).filter(|i| i.graphic == graphic) {
        return ToolLocation::InHand(item);
    }
    match host.find_items(&ItemQuery::graphic(graphic).in_backpack()).into_iter().next() {
        Some(item) => ToolLocation::InBackpack(item),
        None => ToolLocation::Missing,
    }
}

/// Total stack amount of everything matching `query`.
pub fn count_items(host: &dyn Host, query: &ItemQuery) -> u32 {
    host.find_items(query).iter().map(|i| i.amount).sum()
}

/// How to fix a failed precondition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Remediation {
    /// Equip a tool found in the backpack
    Equip { item: Item, layer: Layer },
    /// Re-scan the inventory for something that was not found
    Acquire {
        what: String,
        query: ItemQuery,
        min_amount: u32,
        equip: Option<Layer>,
    },
    /// Let a vital statistic or state recover
    Wait { delay: Duration },
    /// Use a skill to enter the required concealment state
    UseSkill {
        skill: String,
        settle: Duration,
        expect_hidden: bool,
    },
}

impl Remediation {
    /// Re-acquire an item matching `query`, optionally equipping it
    pub fn acquire(what: impl Into<String>, query: ItemQuery, equip: Option<Layer>) -> Self {
        Remediation::Acquire {
            what: what.into(),
            query,
            min_amount: 1,
            equip,
        }
    }

    /// Operator text for when this remediation fails
    pub fn failure_reason(&self) -> String {
        match self {
            Remediation::Equip { item, layer } => {
                format!("could not equip {} ({}) on {} layer", item.name, item.serial, layer)
            }
            Remediation::Acquire { what, .. } => format!("required {} unavailable", what),
            Remediation::Wait { .. } => "wait interrupted".to_string(),
            Remediation::UseSkill {
                skill, expect_hidden, ..
            } => {
                let state = if *expect_hidden { "hidden" } else { "revealed" };
                format!("{} did not leave the player {}", skill, state)
            }
        }
    }
}

/// A failed precondition and its fix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shortfall {
    /// Operator-facing explanation
    pub reason: String,
    pub remediation: Remediation,
}

impl Shortfall {
    pub fn new(reason: impl Into<String>, remediation: Remediation) -> Self {
        Self {
            reason: reason.into(),
            remediation,
        }
    }

    /// Waiting for a vital statistic is routine, not a problem
    pub fn is_wait(&self) -> bool {
        matches!(self.remediation, Remediation::Wait { .. })
    }
}

/// Result of a precondition check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Readiness {
    /// Ready to act, with the tool handle for this iteration if one is used
    Ready { tool: Option<Item> },
    NotReady(Shortfall),
}

impl Readiness {
    pub fn ready() -> Self {
        Readiness::Ready { tool: None }
    }

    pub fn with_tool(tool: Item) -> Self {
        Readiness::Ready { tool: Some(tool) }
    }
}

/// Shortfall for a vital statistic below `minimum`, if it is.
pub fn check_vital(host: &dyn Host, vital: Vital, minimum: u32, timing: &TimingConfig) -> Option<Shortfall> {
    let current = host.vitals().get(vital);
    if current >= minimum {
        return None;
    }
    Some(Shortfall::new(
        format!("Low {} ({}/{}), waiting", vital, current, minimum),
        Remediation::Wait {
            delay: timing.recovery_delay(),
        },
    ))
}

/// Shortfall for a tool that must be equipped on `layer`.
pub fn require_equipped_tool(host: &dyn Host, what: &str, graphic: u16, layer: Layer) -> Readiness {
    match locate_tool(host, graphic, layer) {
        ToolLocation::InHand(item) => Readiness::with_tool(item),
        ToolLocation::InBackpack(item) => Readiness::NotReady(Shortfall::new(
            format!("Equipping {}", what),
            Remediation::Equip { item, layer },
        )),
        ToolLocation::Missing => Readiness::NotReady(Shortfall::new(
            format!("No {} found, searching", what),
            Remediation::acquire(what, ItemQuery::graphic(graphic).in_backpack(), Some(layer)),
        )),
    }
}

/// Shortfall for a tool that is used from the backpack.
pub fn require_carried_tool(host: &dyn Host, what: &str, graphic: u16) -> Readiness {
    let query = ItemQuery::graphic(graphic);
    match host.find_items(&query).into_iter().next() {
        Some(item) => Readiness::with_tool(item),
        None => Readiness::NotReady(Shortfall::new(
            format!("No {} found, searching", what),
            Remediation::acquire(what, query, None),
        )),
    }
}

/// Perform one remediation attempt.
///
/// Returns whether it worked; the caller decides what a failure means.
pub fn perform_remediation(host: &mut dyn Host, remediation: &Remediation, timing: &TimingConfig) -> Result<bool> {
    match remediation {
        Remediation::Equip { item, layer } => equip_and_verify(host, item, *layer, timing),
        Remediation::Acquire {
            what,
            query,
            min_amount,
            equip,
        } => {
            host.sleep(timing.acquire_delay());
            let found = host.find_items(query);
            let total: u32 = found.iter().map(|i| i.amount).sum();
            if total < *min_amount {
                log::warn!("Re-scan found {} of {} {}", total, min_amount, what);
                return Ok(false);
            }
            match (equip, found.into_iter().next()) {
                (Some(layer), Some(item)) => equip_and_verify(host, &item, *layer, timing),
                _ => Ok(true),
            }
        }
        Remediation::Wait { delay } => {
            host.sleep(*delay);
            Ok(true)
        }
        Remediation::UseSkill {
            skill,
            settle,
            expect_hidden,
        } => {
            host.use_skill(skill)?;
            host.sleep(*settle);
            let reached = host.is_hidden() == *expect_hidden;
            if !reached {
                log::warn!("{} did not change the hidden state", skill);
            }
            Ok(reached)
        }
    }
}

fn equip_and_verify(host: &mut dyn Host, item: &Item, layer: Layer, timing: &TimingConfig) -> Result<bool> {
    host.equip(item.serial, layer)?;
    host.sleep(timing.equip_delay());
    let equipped = host.equipped(layer).is_some_and(|i| i.serial == item.serial);
    if !equipped {
        log::warn!("{} did not end up on the {} layer", item.serial, layer);
    }
    Ok(equipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Response, Scenario, Serial, SimulatedHost, Vitals};

    const POLE: u16 = 0x0DC0;

    fn host(items: Vec<Item>) -> SimulatedHost {
        SimulatedHost::new(Scenario {
            items,
            ..Default::default()
        })
    }

    #[test]
    fn test_locate_tool_in_hand() {
        let host = host(vec![Item::new(1, POLE, "pole").equipped_on(Layer::TwoHanded)]);
        assert!(matches!(locate_tool(&host, POLE, Layer::TwoHanded), ToolLocation::InHand(_)));
    }

    #[test]
    fn test_locate_tool_ignores_other_equipped_items() {
        let host = host(vec![
            Item::new(1, 0x0F52, "dagger").equipped_on(Layer::TwoHanded),
            Item::new(2, POLE, "pole"),
        ]);
        match locate_tool(&host, POLE, Layer::TwoHanded) {
            ToolLocation::InBackpack(item) => assert_eq!(item.serial, Serial(2)),
            other => panic!("Expected backpack pole, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_everywhere_is_distinct_from_backpack() {
        let in_pack = require_equipped_tool(&host(vec![Item::new(2, POLE, "pole")]), "fishing pole", POLE, Layer::TwoHanded);
        let missing = require_equipped_tool(&host(vec![]), "fishing pole", POLE, Layer::TwoHanded);

        match in_pack {
            Readiness::NotReady(s) => assert!(matches!(s.remediation, Remediation::Equip { .. })),
            other => panic!("Expected equip, got {:?}", other),
        }
        match missing {
            Readiness::NotReady(s) => assert!(matches!(s.remediation, Remediation::Acquire { .. })),
            other => panic!("Expected acquire, got {:?}", other),
        }
    }

    #[test]
    fn test_check_does_not_mutate_host() {
        let host = host(vec![Item::new(2, POLE, "pole")]);
        let _ = require_equipped_tool(&host, "fishing pole", POLE, Layer::TwoHanded);
        assert!(host.calls().is_empty());
        assert!(host.equipped(Layer::TwoHanded).is_none());
    }

    #[test]
    fn test_check_vital() {
        let timing = TimingConfig::default();
        let host = SimulatedHost::new(Scenario {
            vitals: Vitals {
                mana: 4,
                ..Default::default()
            },
            ..Default::default()
        });
        let shortfall = check_vital(&host, Vital::Mana, 10, &timing).unwrap();
        assert!(shortfall.is_wait());
        assert!(shortfall.reason.contains("4/10"));
        assert!(check_vital(&host, Vital::Mana, 4, &timing).is_none());
    }

    #[test]
    fn test_equip_remediation_succeeds() {
        let timing = TimingConfig::default();
        let item = Item::new(2, POLE, "pole");
        let mut host = host(vec![item.clone()]);
        let remediation = Remediation::Equip {
            item,
            layer: Layer::TwoHanded,
        };
        assert!(perform_remediation(&mut host, &remediation, &timing).unwrap());
        assert_eq!(host.equipped(Layer::TwoHanded).unwrap().serial, Serial(2));
    }

    #[test]
    fn test_acquire_remediation_fails_when_nothing_found() {
        let timing = TimingConfig::default();
        let mut host = host(vec![]);
        let remediation = Remediation::acquire("fishing pole", ItemQuery::graphic(POLE), Some(Layer::TwoHanded));
        assert!(!perform_remediation(&mut host, &remediation, &timing).unwrap());
        assert_eq!(host.elapsed(), timing.acquire_delay());
    }

    #[test]
    fn test_acquire_remediation_checks_amount() {
        let timing = TimingConfig::default();
        let mut host = host(vec![Item::new(9, 0x1BF2, "iron ingots").with_amount(1)]);
        let remediation = Remediation::Acquire {
            what: "ingots".to_string(),
            query: ItemQuery::graphic(0x1BF2),
            min_amount: 2,
            equip: None,
        };
        assert!(!perform_remediation(&mut host, &remediation, &timing).unwrap());
    }

    #[test]
    fn test_acquire_remediation_equips_found_item() {
        let timing = TimingConfig::default();
        let mut host = host(vec![Item::new(3, POLE, "pole")]);
        let remediation = Remediation::acquire("fishing pole", ItemQuery::graphic(POLE).in_backpack(), Some(Layer::TwoHanded));
        assert!(perform_remediation(&mut host, &remediation, &timing).unwrap());
        assert!(host.equipped(Layer::TwoHanded).is_some());
    }

    fn hiding() -> Remediation {
        Remediation::UseSkill {
            skill: "Hiding".to_string(),
            settle: Duration::from_millis(1_500),
            expect_hidden: true,
        }
    }

    #[test]
    fn test_use_skill_remediation_verifies_hidden() {
        let timing = TimingConfig::default();
        let mut host = SimulatedHost::new(Scenario {
            responses: vec![Response::journal(&["You have hidden yourself well."]).with_hidden(true)],
            ..Default::default()
        });
        assert!(perform_remediation(&mut host, &hiding(), &timing).unwrap());
        assert!(host.is_hidden());
    }

    #[test]
    fn test_use_skill_remediation_fails_when_still_visible() {
        let timing = TimingConfig::default();
        let mut host = SimulatedHost::new(Scenario {
            responses: vec![Response::journal(&["You can't seem to hide here."])],
            ..Default::default()
        });
        assert!(!perform_remediation(&mut host, &hiding(), &timing).unwrap());
        assert_eq!(hiding().failure_reason(), "Hiding did not leave the player hidden");
    }

    #[test]
    fn test_failure_reason() {
        let remediation = Remediation::acquire("lockpick", ItemQuery::graphic(0x14FC), None);
        assert_eq!(remediation.failure_reason(), "required lockpick unavailable");
    }
}
