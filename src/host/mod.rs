//! Host boundary - the game client's scripting API as seen by activity loops.
//!
//! This module provides:
//! - The `Host` trait: inventory, equip/use, targeting, gumps, journal, vitals,
//!   operator messages and sleeping
//! - Value types passed across the boundary
//! - `SimulatedHost`, a scenario-driven implementation for dry runs and tests

mod simulated;
mod traits;
mod types;

pub use simulated::{HostCall, Response, Scenario, SimulatedHost};
pub use traits::Host;
pub use types::{
    Completion, GumpId, Item, ItemLocation, ItemQuery, JournalEntry, Layer, SearchScope, Serial, Tone, Vital, Vitals,
};
