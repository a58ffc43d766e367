//! Value types exchanged with the host client.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Host-assigned identifier of a world object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(pub u32);

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Identifier of a host-rendered dialog (gump).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GumpId(pub u32);

impl fmt::Display for GumpId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Equipment slot on the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layer {
    OneHanded,
    TwoHanded,
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Layer::OneHanded => write!(f, "one-handed"),
            Layer::TwoHanded => write!(f, "two-handed"),
        }
    }
}

/// Where an item currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemLocation {
    Equipped(Layer),
    Backpack,
}

/// An item handle as reported by an inventory query.
///
/// Handles are snapshots: they are looked up fresh whenever needed and go
/// stale as soon as the item is consumed or broken.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub serial: Serial,
    pub graphic: u16,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_amount")]
    pub amount: u32,
    #[serde(default = "default_location")]
    pub location: ItemLocation,
}

fn default_amount() -> u32 {
    1
}

fn default_location() -> ItemLocation {
    ItemLocation::Backpack
}

impl Item {
    /// Create a single item sitting in the backpack.
    pub fn new(serial: u32, graphic: u16, name: impl Into<String>) -> Self {
        Self {
            serial: Serial(serial),
            graphic,
            name: name.into(),
            amount: 1,
            location: ItemLocation::Backpack,
        }
    }

    /// Set the stack amount
    pub fn with_amount(mut self, amount: u32) -> Self {
        self.amount = amount;
        self
    }

    /// Place the item on an equipment layer
    pub fn equipped_on(mut self, layer: Layer) -> Self {
        self.location = ItemLocation::Equipped(layer);
        self
    }

    pub fn is_equipped(&self) -> bool {
        matches!(self.location, ItemLocation::Equipped(_))
    }
}

/// Which containers an inventory query looks in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    Backpack,
    Equipped,
    #[default]
    Anywhere,
}

/// Inventory query filter. Unset fields match anything.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemQuery {
    pub serial: Option<Serial>,
    pub graphic: Option<u16>,
    pub name: Option<String>,
    pub scope: SearchScope,
}

impl ItemQuery {
    /// Query by item graphic (type id)
    pub fn graphic(graphic: u16) -> Self {
        Self {
            graphic: Some(graphic),
            ..Default::default()
        }
    }

    /// Query for one specific object
    pub fn serial(serial: Serial) -> Self {
        Self {
            serial: Some(serial),
            ..Default::default()
        }
    }

    /// Restrict the query to the backpack
    pub fn in_backpack(mut self) -> Self {
        self.scope = SearchScope::Backpack;
        self
    }

    /// Restrict the query to equipped items
    pub fn equipped(mut self) -> Self {
        self.scope = SearchScope::Equipped;
        self
    }

    /// Check whether an item satisfies this query.
    pub fn matches(&self, item: &Item) -> bool {
        if self.serial.is_some_and(|s| s != item.serial) {
            return false;
        }
        if self.graphic.is_some_and(|g| g != item.graphic) {
            return false;
        }
        if let Some(name) = &self.name {
            if !item.name.to_lowercase().contains(&name.to_lowercase()) {
                return false;
            }
        }
        match self.scope {
            SearchScope::Anywhere => true,
            SearchScope::Backpack => item.location == ItemLocation::Backpack,
            SearchScope::Equipped => item.is_equipped(),
        }
    }
}

/// A vital statistic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Vital {
    Hits,
    Mana,
    Stamina,
}

impl fmt::Display for Vital {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Vital::Hits => write!(f, "hits"),
            Vital::Mana => write!(f, "mana"),
            Vital::Stamina => write!(f, "stamina"),
        }
    }
}

/// Current and maximum vital statistics of the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vitals {
    pub hits: u32,
    pub max_hits: u32,
    pub mana: u32,
    pub max_mana: u32,
    pub stamina: u32,
    pub max_stamina: u32,
}

impl Default for Vitals {
    fn default() -> Self {
        Self {
            hits: 100,
            max_hits: 100,
            mana: 100,
            max_mana: 100,
            stamina: 100,
            max_stamina: 100,
        }
    }
}

impl Vitals {
    pub fn get(&self, vital: Vital) -> u32 {
        match vital {
            Vital::Hits => self.hits,
            Vital::Mana => self.mana,
            Vital::Stamina => self.stamina,
        }
    }
}

/// One line of the host's journal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub text: String,
    /// Host clock when the line was appended (ms)
    pub at_ms: u64,
}

impl JournalEntry {
    pub fn new(text: impl Into<String>, at_ms: u64) -> Self {
        Self {
            text: text.into(),
            at_ms,
        }
    }
}

/// Severity of an operator-facing message; hosts map it to a text hue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Info,
    Success,
    Warning,
    Fatal,
}

/// Result of waiting on the host's action-completion signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The host reported that the last action finished
    Signaled,
    /// The host supports the signal but it did not arrive in time
    TimedOut,
    /// The host has no completion signal; callers fall back to a fixed sleep
    Unsupported,
}
