//! Scenario-driven host for dry runs and tests.
//!
//! A scenario describes the player's starting state plus a queue of responses,
//! one per dispatched action. Time is virtual: `sleep` advances a clock and
//! never blocks, so a loop that waits minutes in the real client finishes
//! instantly here.

use std::collections::{HashSet, VecDeque};
use std::fs;
use std::path::Path;
use std::time::Duration;

use colored::*;
use serde::{Deserialize, Serialize};

use crate::error::{MacroError, Result};

use super::traits::Host;
use super::types::{Completion, GumpId, Item, ItemLocation, ItemQuery, JournalEntry, Layer, Serial, Tone, Vitals};

/// Starting state and scripted reactions for a [`SimulatedHost`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Scenario {
    pub vitals: Vitals,
    pub hidden: bool,
    pub items: Vec<Item>,
    /// Operator picks for manual target prompts, in order; `null` cancels
    pub targets: Vec<Option<Serial>>,
    /// One response per dispatched action, in order
    pub responses: Vec<Response>,
    /// Whether the host reports action completion
    pub completion_signal: bool,
    pub mana_regen_per_sec: u32,
}

impl Scenario {
    /// Load a scenario from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let scenario: Self = serde_yaml::from_str(&content)?;
        scenario.validate()?;
        log::info!("Loaded scenario from: {}", path.as_ref().display());
        Ok(scenario)
    }

    /// Reject scenarios the host could not represent
    pub fn validate(&self) -> Result<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.serial) {
                return Err(MacroError::Scenario(format!("duplicate item serial {}", item.serial)));
            }
        }
        let mut layers = HashSet::new();
        for item in &self.items {
            if let ItemLocation::Equipped(layer) = item.location {
                if !layers.insert(layer) {
                    return Err(MacroError::Scenario(format!("more than one item equipped on {}", layer)));
                }
            }
        }
        Ok(())
    }
}

/// What the simulated client does after one action.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Response {
    /// Journal lines appended once the action lands
    pub journal: Vec<String>,
    /// Whether a target cursor opens for this action
    pub cursor: bool,
    /// Gump that opens; the effects wait for a button press
    pub gump: Option<GumpId>,
    /// Item destroyed or used up by the action
    pub consume: Option<Serial>,
    /// How much of `consume` goes; the whole item when unset
    pub consume_amount: Option<u32>,
    pub hidden: Option<bool>,
    pub mana_cost: u32,
    /// Items that appear in the backpack
    pub add_items: Vec<Item>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            journal: Vec::new(),
            cursor: true,
            gump: None,
            consume: None,
            consume_amount: None,
            hidden: None,
            mana_cost: 0,
            add_items: Vec::new(),
        }
    }
}

impl Response {
    /// Response that only writes journal lines
    pub fn journal(lines: &[&str]) -> Self {
        Self {
            journal: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    /// Mark an item as destroyed by this action
    pub fn consuming(mut self, serial: u32) -> Self {
        self.consume = Some(Serial(serial));
        self
    }

    /// Response for an action that opens no target cursor
    pub fn without_cursor(mut self) -> Self {
        self.cursor = false;
        self
    }

    /// Open a gump and defer effects until a button is pressed
    pub fn with_gump(mut self, gump: GumpId) -> Self {
        self.gump = Some(gump);
        self
    }

    pub fn with_hidden(mut self, hidden: bool) -> Self {
        self.hidden = Some(hidden);
        self
    }

    pub fn with_mana_cost(mut self, cost: u32) -> Self {
        self.mana_cost = cost;
        self
    }
}

/// A host call, recorded for later inspection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    Equip(Serial, Layer),
    UseObject(Serial),
    UseSkill(String),
    WaitForTarget,
    PromptTarget,
    TargetLast,
    Target(Serial),
    TargetSelf,
    WaitForGump(GumpId),
    PressGumpButton(GumpId, u32),
    ClearJournal,
    Sleep(Duration),
    AwaitCompletion,
}

/// In-memory host replaying a [`Scenario`].
#[derive(Debug)]
pub struct SimulatedHost {
    vitals: Vitals,
    hidden: bool,
    items: Vec<Item>,
    targets: VecDeque<Option<Serial>>,
    responses: VecDeque<Response>,
    completion_signal: bool,
    mana_regen_per_sec: u32,
    clock_ms: u64,
    regen_carry_ms: u64,
    journal: Vec<JournalEntry>,
    pending: Option<Response>,
    cursor_open: bool,
    open_gump: Option<GumpId>,
    last_target: Option<Serial>,
    calls: Vec<HostCall>,
    messages: Vec<(Tone, String)>,
    echo: bool,
}

impl SimulatedHost {
    pub fn new(scenario: Scenario) -> Self {
        Self {
            vitals: scenario.vitals,
            hidden: scenario.hidden,
            items: scenario.items,
            targets: scenario.targets.into(),
            responses: scenario.responses.into(),
            completion_signal: scenario.completion_signal,
            mana_regen_per_sec: scenario.mana_regen_per_sec,
            clock_ms: 0,
            regen_carry_ms: 0,
            journal: Vec::new(),
            pending: None,
            cursor_open: false,
            open_gump: None,
            last_target: None,
            calls: Vec::new(),
            messages: Vec::new(),
            echo: false,
        }
    }

    /// Print operator messages to stdout as they are emitted
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    /// Every host call made so far
    pub fn calls(&self) -> &[HostCall] {
        &self.calls
    }

    /// Count recorded calls matching a predicate
    pub fn count_calls(&self, predicate: impl Fn(&HostCall) -> bool) -> usize {
        self.calls.iter().filter(|c| predicate(c)).count()
    }

    /// Operator messages emitted so far
    pub fn messages(&self) -> &[(Tone, String)] {
        &self.messages
    }

    /// Virtual time elapsed
    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.clock_ms)
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    /// Responses not yet consumed by an action
    pub fn remaining_responses(&self) -> usize {
        self.responses.len()
    }

    fn item_index(&self, serial: Serial) -> Result<usize> {
        self.items
            .iter()
            .position(|i| i.serial == serial)
            .ok_or_else(|| MacroError::Host(format!("no such item {}", serial)))
    }

    fn start_action(&mut self) {
        // An unanswered cursor or gump from a previous action is abandoned.
        self.pending = None;
        self.cursor_open = false;
        self.open_gump = None;

        match self.responses.pop_front() {
            Some(response) => {
                self.cursor_open = response.cursor;
                self.open_gump = response.gump;
                self.pending = Some(response);
            }
            None => log::debug!("Scenario exhausted; action has no effect"),
        }
    }

    fn land_pending(&mut self) {
        let Some(response) = self.pending.take() else {
            return;
        };
        self.cursor_open = false;

        for line in response.journal {
            self.journal.push(JournalEntry::new(line, self.clock_ms));
        }
        if let Some(serial) = response.consume {
            if let Some(index) = self.items.iter().position(|i| i.serial == serial) {
                match response.consume_amount {
                    Some(amount) if amount < self.items[index].amount => {
                        self.items[index].amount -= amount;
                    }
                    _ => {
                        self.items.remove(index);
                    }
                }
            }
        }
        if let Some(hidden) = response.hidden {
            self.hidden = hidden;
        }
        self.vitals.mana = self.vitals.mana.saturating_sub(response.mana_cost);
        self.items.extend(response.add_items);
    }

    fn answer_cursor(&mut self, target: Serial) -> Result<()> {
        if !self.cursor_open {
            return Err(MacroError::Host("no target cursor is open".to_string()));
        }
        self.last_target = Some(target);
        self.land_pending();
        Ok(())
    }

    fn advance_clock(&mut self, duration: Duration) {
        let ms = duration.as_millis() as u64;
        self.clock_ms += ms;

        if self.mana_regen_per_sec > 0 {
            self.regen_carry_ms += ms;
            let whole_secs = self.regen_carry_ms / 1000;
            self.regen_carry_ms %= 1000;
            let regen = (whole_secs as u32).saturating_mul(self.mana_regen_per_sec);
            self.vitals.mana = (self.vitals.mana.saturating_add(regen)).min(self.vitals.max_mana);
        }
    }
}

impl Host for SimulatedHost {
    fn find_items(&self, query: &ItemQuery) -> Vec<Item> {
        self.items.iter().filter(|i| query.matches(i)).cloned().collect()
    }

    fn equipped(&self, layer: Layer) -> Option<Item> {
        self.items
            .iter()
            .find(|i| i.location == ItemLocation::Equipped(layer))
            .cloned()
    }

    fn equip(&mut self, item: Serial, layer: Layer) -> Result<()> {
        self.calls.push(HostCall::Equip(item, layer));
        let index = self.item_index(item)?;
        for other in self.items.iter_mut() {
            if other.location == ItemLocation::Equipped(layer) {
                other.location = ItemLocation::Backpack;
            }
        }
        self.items[index].location = ItemLocation::Equipped(layer);
        Ok(())
    }

    fn use_object(&mut self, item: Serial) -> Result<()> {
        self.calls.push(HostCall::UseObject(item));
        self.item_index(item)?;
        self.start_action();
        Ok(())
    }

    fn use_skill(&mut self, skill: &str) -> Result<()> {
        self.calls.push(HostCall::UseSkill(skill.to_string()));
        self.start_action();
        Ok(())
    }

    fn wait_for_target(&mut self, timeout: Duration) -> bool {
        self.calls.push(HostCall::WaitForTarget);
        if !self.cursor_open {
            self.advance_clock(timeout);
            self.pending = None;
        }
        self.cursor_open
    }

    fn prompt_target(&mut self, timeout: Duration) -> Option<Serial> {
        self.calls.push(HostCall::PromptTarget);
        match self.targets.pop_front().flatten() {
            Some(serial) if self.cursor_open => {
                self.last_target = Some(serial);
                self.land_pending();
                Some(serial)
            }
            _ => {
                self.advance_clock(timeout);
                self.cursor_open = false;
                self.pending = None;
                None
            }
        }
    }

    fn target_last(&mut self) -> Result<()> {
        self.calls.push(HostCall::TargetLast);
        let last = self
            .last_target
            .ok_or_else(|| MacroError::Host("no previous target".to_string()))?;
        self.answer_cursor(last)
    }

    fn target(&mut self, serial: Serial) -> Result<()> {
        self.calls.push(HostCall::Target(serial));
        self.answer_cursor(serial)
    }

    fn target_self(&mut self) -> Result<()> {
        self.calls.push(HostCall::TargetSelf);
        if !self.cursor_open {
            return Err(MacroError::Host("no target cursor is open".to_string()));
        }
        self.land_pending();
        Ok(())
    }

    fn wait_for_gump(&mut self, gump: GumpId, timeout: Duration) -> bool {
        self.calls.push(HostCall::WaitForGump(gump));
        if self.open_gump == Some(gump) {
            true
        } else {
            self.advance_clock(timeout);
            self.pending = None;
            false
        }
    }

    fn press_gump_button(&mut self, gump: GumpId, button: u32) -> Result<()> {
        self.calls.push(HostCall::PressGumpButton(gump, button));
        if self.open_gump != Some(gump) {
            return Err(MacroError::Host(format!("gump {} is not open", gump)));
        }
        self.open_gump = None;
        self.land_pending();
        Ok(())
    }

    fn journal(&self) -> Vec<JournalEntry> {
        self.journal.clone()
    }

    fn clear_journal(&mut self) {
        self.calls.push(HostCall::ClearJournal);
        self.journal.clear();
    }

    fn vitals(&self) -> Vitals {
        self.vitals
    }

    fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// A scenario session ends once every scripted response is used up.
    fn is_connected(&self) -> bool {
        !self.responses.is_empty()
    }

    fn overhead_message(&mut self, text: &str, tone: Tone) {
        if self.echo {
            let stamp = format!("[{:>8.1}s]", self.clock_ms as f64 / 1000.0);
            let line = match tone {
                Tone::Info => text.cyan(),
                Tone::Success => text.green(),
                Tone::Warning => text.yellow(),
                Tone::Fatal => text.red().bold(),
            };
            println!("{} {}", stamp.dimmed(), line);
        }
        self.messages.push((tone, text.to_string()));
    }

    fn sleep(&mut self, duration: Duration) {
        self.calls.push(HostCall::Sleep(duration));
        // Effects of a gump action only land once its button is pressed.
        if self.open_gump.is_none() {
            self.land_pending();
        }
        self.advance_clock(duration);
    }

    fn await_action_complete(&mut self, timeout: Duration) -> Completion {
        if !self.completion_signal {
            return Completion::Unsupported;
        }
        self.calls.push(HostCall::AwaitCompletion);
        if self.pending.is_some() && self.open_gump.is_none() {
            self.land_pending();
            self.advance_clock(Duration::from_millis(250).min(timeout));
            Completion::Signaled
        } else {
            self.advance_clock(timeout);
            Completion::TimedOut
        }
    }
}
