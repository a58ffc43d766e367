//! The host scripting surface consumed by activity loops.

use std::time::Duration;

use crate::error::Result;

use super::types::{Completion, GumpId, Item, ItemQuery, JournalEntry, Layer, Serial, Tone, Vitals};

/// Capabilities the game client exposes to macros.
///
/// Implementations translate these calls into the client's own scripting API.
/// Every call is synchronous; the loop never has more than one call in flight.
pub trait Host {
    /// Find items matching a query
    fn find_items(&self, query: &ItemQuery) -> Vec<Item>;

    /// Item currently equipped on a layer, if any
    fn equipped(&self, layer: Layer) -> Option<Item>;

    /// Equip an item from the backpack onto a layer
    fn equip(&mut self, item: Serial, layer: Layer) -> Result<()>;

    /// Double-click (use) an object
    fn use_object(&mut self, item: Serial) -> Result<()>;

    /// Invoke a skill by name
    fn use_skill(&mut self, skill: &str) -> Result<()>;

    /// Wait until the client shows a target cursor
    fn wait_for_target(&mut self, timeout: Duration) -> bool;

    /// Hand the target cursor to the operator and wait for a pick
    ///
    /// Returns `None` when the operator cancels or the timeout expires.
    fn prompt_target(&mut self, timeout: Duration) -> Option<Serial>;

    /// Answer the open cursor with the most recent target
    fn target_last(&mut self) -> Result<()>;

    /// Answer the open cursor with a specific object
    fn target(&mut self, serial: Serial) -> Result<()>;

    /// Answer the open cursor with the player
    fn target_self(&mut self) -> Result<()>;

    /// Wait for a gump to open
    fn wait_for_gump(&mut self, gump: GumpId, timeout: Duration) -> bool;

    /// Press a numbered control on an open gump
    fn press_gump_button(&mut self, gump: GumpId, button: u32) -> Result<()>;

    /// Snapshot of the journal since it was last cleared
    fn journal(&self) -> Vec<JournalEntry>;

    /// Drop all journal lines
    fn clear_journal(&mut self);

    fn vitals(&self) -> Vitals;

    fn is_hidden(&self) -> bool;

    /// Whether the session is still live; a run stops once it is not
    fn is_connected(&self) -> bool {
        true
    }

    /// Show a message only the operator can see
    fn overhead_message(&mut self, text: &str, tone: Tone);

    /// Block the calling thread
    fn sleep(&mut self, duration: Duration);

    /// Wait for the client to report that the last action finished.
    ///
    /// Hosts without such a signal keep the default.
    fn await_action_complete(&mut self, _timeout: Duration) -> Completion {
        Completion::Unsupported
    }
}
