//! Skill trainer definitions.
//!
//! A trainer repeatedly invokes one skill and reads the journal for its
//! success and failure messages. Built-in trainers cover Hiding, Stealth and
//! Spirit Speak; more can be added as YAML files in
//! ~/.config/macroloop/trainers/ or .macroloop/trainers/.

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::classify::Rule;
use crate::dispatch::TargetChoice;

/// Definition of a skill trainer.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TrainerDefinition {
    /// Trainer name used on the command line (e.g. "hiding").
    pub name: String,

    /// Skill name as the client knows it.
    pub skill: String,

    /// Skill cooldown; the settle delay after each attempt.
    #[serde(rename = "skill-delay-ms", default = "default_skill_delay_ms")]
    pub skill_delay_ms: u64,

    /// Wait for mana to regenerate below this level.
    #[serde(rename = "min-mana", default)]
    pub min_mana: Option<u32>,

    /// The skill only works while hidden.
    #[serde(rename = "requires-hidden", default)]
    pub requires_hidden: bool,

    /// Target for skills that open a cursor.
    #[serde(default)]
    pub target: Option<TargetChoice>,

    /// Journal text meaning the attempt worked.
    #[serde(default)]
    pub success: Vec<String>,

    /// Journal text meaning the attempt failed.
    #[serde(default)]
    pub failure: Vec<String>,

    #[serde(rename = "extra-rules", default)]
    pub extra_rules: Vec<Rule>,
}

fn default_skill_delay_ms() -> u64 {
    10_000
}

impl TrainerDefinition {
    /// Load a trainer definition from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read trainer file")?;
        let trainer: Self = serde_yaml::from_str(&content).context("Failed to parse trainer file")?;
        trainer.validate()?;
        Ok(trainer)
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            eyre::bail!("trainer name must not be empty");
        }
        if self.skill.trim().is_empty() {
            eyre::bail!("trainer '{}' has no skill", self.name);
        }
        if self.skill_delay_ms == 0 {
            eyre::bail!("trainer '{}': skill-delay-ms must be > 0", self.name);
        }
        Ok(())
    }

    /// Built-in trainers.
    pub fn builtins() -> Vec<Self> {
        vec![Self::builtin_hiding(), Self::builtin_stealth(), Self::builtin_spirit_speak()]
    }

    fn builtin_hiding() -> Self {
        Self {
            name: "hiding".to_string(),
            skill: "Hiding".to_string(),
            skill_delay_ms: 10_500,
            min_mana: None,
            requires_hidden: false,
            target: None,
            success: vec!["You have hidden yourself well".to_string()],
            failure: vec!["You can't seem to hide here".to_string()],
            extra_rules: Vec::new(),
        }
    }

    fn builtin_stealth() -> Self {
        Self {
            name: "stealth".to_string(),
            skill: "Stealth".to_string(),
            skill_delay_ms: 10_500,
            min_mana: None,
            requires_hidden: true,
            target: None,
            success: vec!["You begin to move quietly".to_string()],
            failure: vec![
                "You fail in your attempt to move unnoticed".to_string(),
                "You must hide first".to_string(),
            ],
            extra_rules: Vec::new(),
        }
    }

    fn builtin_spirit_speak() -> Self {
        Self {
            name: "spirit_speak".to_string(),
            skill: "Spirit Speak".to_string(),
            skill_delay_ms: 5_500,
            min_mana: Some(10),
            requires_hidden: false,
            target: None,
            success: vec![
                "You establish a connection to the netherworld".to_string(),
                "You channel energy from a nearby corpse".to_string(),
            ],
            failure: vec!["You fail to communicate with the dead".to_string()],
            extra_rules: Vec::new(),
        }
    }
}
