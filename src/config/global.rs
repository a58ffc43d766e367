//! Global configuration.
//!
//! Loaded from .macroloop.yml or ~/.config/macroloop/macroloop.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::activity::{CraftingConfig, FishingConfig, IdentificationConfig, LockpickingConfig};

/// Global configuration for macroloop.
///
/// Built once at startup and passed by reference to every component.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct GlobalConfig {
    /// Log level used when RUST_LOG is unset.
    #[serde(rename = "log-level")]
    pub log_level: Option<String>,

    /// Stop after this many iterations (runs forever when unset).
    #[serde(rename = "max-iterations")]
    pub max_iterations: Option<u64>,

    /// Shared waits and timeouts.
    pub timing: TimingConfig,

    pub fishing: FishingConfig,

    pub lockpicking: LockpickingConfig,

    pub identification: IdentificationConfig,

    pub crafting: CraftingConfig,
}

impl GlobalConfig {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .macroloop.yml in current directory
    /// 3. ~/.config/macroloop/macroloop.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".macroloop.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .macroloop.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .macroloop.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("macroloop").join("macroloop.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    pub(crate) fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == Some(0) {
            eyre::bail!("max-iterations must be > 0 when set");
        }
        self.timing.validate()?;
        if self.fishing.cast_delay_ms == 0 {
            eyre::bail!("fishing.cast-delay-ms must be > 0");
        }
        if self.lockpicking.attempt_delay_ms == 0 {
            eyre::bail!("lockpicking.attempt-delay-ms must be > 0");
        }
        if self.identification.skill_delay_ms == 0 {
            eyre::bail!("identification.skill-delay-ms must be > 0");
        }
        if self.crafting.craft_delay_ms == 0 {
            eyre::bail!("crafting.craft-delay-ms must be > 0");
        }
        if self.crafting.min_materials == 0 {
            eyre::bail!("crafting.min-materials must be > 0");
        }
        Ok(())
    }
}

/// Waits and timeouts shared by every activity.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Await the host's completion signal instead of sleeping, when available.
    #[serde(rename = "prefer-completion-signal")]
    pub prefer_completion_signal: bool,

    /// How long to wait for a target cursor after an action.
    #[serde(rename = "cursor-timeout-ms")]
    pub cursor_timeout_ms: u64,

    /// How long the operator has to pick a target.
    #[serde(rename = "manual-target-timeout-ms")]
    pub manual_target_timeout_ms: u64,

    #[serde(rename = "gump-timeout-ms")]
    pub gump_timeout_ms: u64,

    /// Settle time after equipping an item.
    #[serde(rename = "equip-delay-ms")]
    pub equip_delay_ms: u64,

    /// Grace period before re-scanning the inventory for a missing item.
    #[serde(rename = "acquire-delay-ms")]
    pub acquire_delay_ms: u64,

    /// Wait while a vital statistic regenerates.
    #[serde(rename = "recovery-delay-ms")]
    pub recovery_delay_ms: u64,

    /// Extra wait after the client reports it is busy.
    #[serde(rename = "cooldown-delay-ms")]
    pub cooldown_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            prefer_completion_signal: true,
            cursor_timeout_ms: 2_000,
            manual_target_timeout_ms: 15_000,
            gump_timeout_ms: 3_000,
            equip_delay_ms: 1_000,
            acquire_delay_ms: 1_500,
            recovery_delay_ms: 10_000,
            cooldown_delay_ms: 1_000,
        }
    }
}

impl TimingConfig {
    pub fn cursor_timeout(&self) -> Duration {
        Duration::from_millis(self.cursor_timeout_ms)
    }

    pub fn manual_target_timeout(&self) -> Duration {
        Duration::from_millis(self.manual_target_timeout_ms)
    }

    pub fn gump_timeout(&self) -> Duration {
        Duration::from_millis(self.gump_timeout_ms)
    }

    pub fn equip_delay(&self) -> Duration {
        Duration::from_millis(self.equip_delay_ms)
    }

    pub fn acquire_delay(&self) -> Duration {
        Duration::from_millis(self.acquire_delay_ms)
    }

    pub fn recovery_delay(&self) -> Duration {
        Duration::from_millis(self.recovery_delay_ms)
    }

    pub fn cooldown_delay(&self) -> Duration {
        Duration::from_millis(self.cooldown_delay_ms)
    }

    fn validate(&self) -> Result<()> {
        if self.cursor_timeout_ms == 0 {
            eyre::bail!("timing.cursor-timeout-ms must be > 0");
        }
        if self.manual_target_timeout_ms == 0 {
            eyre::bail!("timing.manual-target-timeout-ms must be > 0");
        }
        if self.recovery_delay_ms == 0 {
            eyre::bail!("timing.recovery-delay-ms must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{Outcome, Signature};
    use crate::host::Serial;

    #[test]
    fn test_default_config() {
        let config = GlobalConfig::default();
        assert!(config.max_iterations.is_none());
        assert!(config.timing.prefer_completion_signal);
        assert_eq!(config.timing.recovery_delay_ms, 10_000);
        assert_eq!(config.fishing.pole_graphic, 0x0DC0);
    }

    #[test]
    fn test_config_validation() {
        let config = GlobalConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_config() {
        let config = GlobalConfig {
            timing: TimingConfig {
                recovery_delay_ms: 0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = GlobalConfig {
            max_iterations: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
max-iterations: 500
timing:
  recovery-delay-ms: 4000
fishing:
  cast-delay-ms: 8000
  extra-rules:
    - signature: !contains the fish are too small
      outcome: nothing_found
lockpicking:
  chest: 1073741937
"#;
        let config: GlobalConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.max_iterations, Some(500));
        assert_eq!(config.timing.recovery_delay_ms, 4000);
        assert_eq!(config.fishing.cast_delay_ms, 8000);
        assert_eq!(config.fishing.extra_rules.len(), 1);
        assert_eq!(
            config.fishing.extra_rules[0].signature,
            Signature::Contains("the fish are too small".into())
        );
        assert_eq!(config.fishing.extra_rules[0].outcome, Outcome::NothingFound);
        assert_eq!(config.lockpicking.chest, Some(Serial(0x4000_0071)));
        // Other fields should have defaults
        assert_eq!(config.timing.cursor_timeout_ms, 2_000);
        assert_eq!(config.crafting.make_button, 21);
    }

    #[test]
    fn test_timing_durations() {
        let timing = TimingConfig::default();
        assert_eq!(timing.cursor_timeout(), Duration::from_secs(2));
        assert_eq!(timing.recovery_delay(), Duration::from_secs(10));
    }

    #[test]
    fn test_load_from_file_validates() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("macroloop.yml");
        fs::write(&path, "crafting:\n  min-materials: 0\n").unwrap();
        assert!(GlobalConfig::load_from_file(&path).is_err());

        fs::write(&path, "fishing:\n  cast-delay-ms: 7000\n").unwrap();
        let config = GlobalConfig::load_from_file(&path).unwrap();
        assert_eq!(config.fishing.cast_delay_ms, 7000);
    }
}
