//! Per-activity settings.
//!
//! Graphics, delays and gump ids default to the values of the standard
//! client; `extra-rules` entries are evaluated before an activity's built-in
//! rules, so shard-specific messages can be added without code changes.

use serde::{Deserialize, Serialize};

use crate::classify::Rule;
use crate::host::{GumpId, Layer, Serial};

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct FishingConfig {
    #[serde(rename = "pole-graphic")]
    pub pole_graphic: u16,

    /// Layer the pole is worn on.
    #[serde(rename = "pole-layer")]
    pub pole_layer: Layer,

    /// Time between casting and reading the result.
    #[serde(rename = "cast-delay-ms")]
    pub cast_delay_ms: u64,

    #[serde(rename = "extra-rules")]
    pub extra_rules: Vec<Rule>,
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            pole_graphic: 0x0DC0,
            pole_layer: Layer::TwoHanded,
            cast_delay_ms: 9_000,
            extra_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LockpickingConfig {
    #[serde(rename = "lockpick-graphic")]
    pub lockpick_graphic: u16,

    /// Container to practice on; the operator picks one when unset.
    pub chest: Option<Serial>,

    #[serde(rename = "attempt-delay-ms")]
    pub attempt_delay_ms: u64,

    #[serde(rename = "extra-rules")]
    pub extra_rules: Vec<Rule>,
}

impl Default for LockpickingConfig {
    fn default() -> Self {
        Self {
            lockpick_graphic: 0x14FC,
            chest: None,
            attempt_delay_ms: 3_500,
            extra_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentificationConfig {
    /// Item to identify repeatedly; the operator picks one when unset.
    pub item: Option<Serial>,

    #[serde(rename = "skill-delay-ms")]
    pub skill_delay_ms: u64,

    #[serde(rename = "extra-rules")]
    pub extra_rules: Vec<Rule>,
}

impl Default for IdentificationConfig {
    fn default() -> Self {
        Self {
            item: None,
            skill_delay_ms: 1_500,
            extra_rules: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CraftingConfig {
    #[serde(rename = "tool-graphic")]
    pub tool_graphic: u16,

    #[serde(rename = "material-graphic")]
    pub material_graphic: u16,

    /// Fewest materials needed for one attempt.
    #[serde(rename = "min-materials")]
    pub min_materials: u32,

    /// Crafting menu opened by the tool.
    pub gump: GumpId,

    /// "Make last" control on the crafting menu.
    #[serde(rename = "make-button")]
    pub make_button: u32,

    #[serde(rename = "craft-delay-ms")]
    pub craft_delay_ms: u64,

    #[serde(rename = "extra-rules")]
    pub extra_rules: Vec<Rule>,
}

impl Default for CraftingConfig {
    fn default() -> Self {
        Self {
            tool_graphic: 0x1EB8,
            material_graphic: 0x1BF2,
            min_materials: 2,
            gump: GumpId(0x38920ABD),
            make_button: 21,
            craft_delay_ms: 2_500,
            extra_rules: Vec::new(),
        }
    }
}
