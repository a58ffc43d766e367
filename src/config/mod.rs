//! Configuration system for macroloop.
//!
//! Two sources:
//! 1. Global config (~/.config/macroloop/macroloop.yml or .macroloop.yml):
//!    timing plus per-activity settings
//! 2. Skill trainer definitions (built-ins, ~/.config/macroloop/trainers/*.yml,
//!    .macroloop/trainers/*.yml)

use eyre::{Context, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

pub use self::activity::{CraftingConfig, FishingConfig, IdentificationConfig, LockpickingConfig};
pub use self::global::{GlobalConfig, TimingConfig};
pub use self::trainer::TrainerDefinition;

mod activity;
mod global;
mod trainer;

/// Load configuration from the standard search paths.
///
/// Search order:
/// 1. Explicit path if provided
/// 2. .macroloop.yml in current directory (project config)
/// 3. ~/.config/macroloop/macroloop.yml (user config)
/// 4. Default values
pub fn load_config(explicit_path: Option<&PathBuf>) -> Result<GlobalConfig> {
    GlobalConfig::load(explicit_path)
}

/// Load trainer definitions from standard paths.
///
/// Search order (later overrides earlier):
/// 1. Built-in trainers
/// 2. ~/.config/macroloop/trainers/ (user trainers)
/// 3. .macroloop/trainers/ (project trainers)
pub fn load_trainers() -> Result<BTreeMap<String, TrainerDefinition>> {
    let mut trainers = BTreeMap::new();

    for trainer in TrainerDefinition::builtins() {
        trainers.insert(trainer.name.clone(), trainer);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let user_dir = config_dir.join("macroloop").join("trainers");
        if user_dir.exists() {
            load_trainers_from_dir(&user_dir, &mut trainers)?;
        }
    }

    let project_dir = PathBuf::from(".macroloop/trainers");
    if project_dir.exists() {
        load_trainers_from_dir(&project_dir, &mut trainers)?;
    }

    Ok(trainers)
}

/// Load trainer definitions from a directory.
pub fn load_trainers_from_dir(dir: &Path, trainers: &mut BTreeMap<String, TrainerDefinition>) -> Result<()> {
    for entry in fs::read_dir(dir).with_context(|| format!("Failed to read dir: {}", dir.display()))? {
        let entry = entry?;
        let path = entry.path();

        if path.extension().is_some_and(|ext| ext == "yml" || ext == "yaml") {
            match TrainerDefinition::load_from_file(&path) {
                Ok(trainer) => {
                    log::debug!("Loaded trainer '{}' from {}", trainer.name, path.display());
                    trainers.insert(trainer.name.clone(), trainer);
                }
                Err(e) => {
                    log::warn!("Failed to load trainer from {}: {}", path.display(), e);
                }
            }
        }
    }
    Ok(())
}
