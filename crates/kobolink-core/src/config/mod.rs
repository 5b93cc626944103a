//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// KoboLink configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub ui: UiConfig,
    pub flow: FlowConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiConfig {
    /// Event poll cadence in milliseconds
    pub tick_rate_ms: u64,
    /// ASCII-only glyphs for terminals without Unicode box drawing
    pub ascii: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowConfig {
    /// Seconds before the verification code can be resent
    pub otp_resend_secs: u32,
    /// Simulated dispatch delay before landing on the verification screen
    pub otp_send_delay_ms: u64,
    /// Dialing code shown ahead of the phone input
    pub dialing_code: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ui: UiConfig {
                tick_rate_ms: 100,
                ascii: false,
            },
            flow: FlowConfig::default(),
        }
    }
}

impl Default for FlowConfig {
    fn default() -> Self {
        Self {
            otp_resend_secs: 45,
            otp_send_delay_ms: 1500,
            dialing_code: "+234".to_string(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("KOBOLINK_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("kobolink")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Save configuration to an explicit path
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        self.validate()?;

        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.ui.tick_rate_ms == 0 {
            return Err(anyhow!("ui.tick_rate_ms must be greater than zero"));
        }
        if !(1..=600).contains(&self.flow.otp_resend_secs) {
            return Err(anyhow!(
                "flow.otp_resend_secs must be between 1 and 600, got {}",
                self.flow.otp_resend_secs
            ));
        }
        if !self.flow.dialing_code.starts_with('+') {
            return Err(anyhow!(
                "flow.dialing_code must start with '+', got '{}'",
                self.flow.dialing_code
            ));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "ui.tick_rate_ms" => Ok(self.ui.tick_rate_ms.to_string()),
            "ui.ascii" => Ok(self.ui.ascii.to_string()),
            "flow.otp_resend_secs" => Ok(self.flow.otp_resend_secs.to_string()),
            "flow.otp_send_delay_ms" => Ok(self.flow.otp_send_delay_ms.to_string()),
            "flow.dialing_code" => Ok(self.flow.dialing_code.clone()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Valid keys: ui.tick_rate_ms, ui.ascii, \
                 flow.otp_resend_secs, flow.otp_send_delay_ms, flow.dialing_code",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "ui.tick_rate_ms" => {
                self.ui.tick_rate_ms = value
                    .parse()
                    .with_context(|| format!("Invalid tick_rate_ms value: {}", value))?;
            }
            "ui.ascii" => {
                self.ui.ascii = value
                    .parse()
                    .with_context(|| format!("Invalid ascii value: {}", value))?;
            }
            "flow.otp_resend_secs" => {
                self.flow.otp_resend_secs = value
                    .parse()
                    .with_context(|| format!("Invalid otp_resend_secs value: {}", value))?;
            }
            "flow.otp_send_delay_ms" => {
                self.flow.otp_send_delay_ms = value
                    .parse()
                    .with_context(|| format!("Invalid otp_send_delay_ms value: {}", value))?;
            }
            "flow.dialing_code" => {
                self.flow.dialing_code = value.to_string();
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Valid keys: ui.tick_rate_ms, ui.ascii, \
                     flow.otp_resend_secs, flow.otp_send_delay_ms, flow.dialing_code",
                    key
                ));
            }
        }
        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "ui.tick_rate_ms",
            "ui.ascii",
            "flow.otp_resend_secs",
            "flow.otp_send_delay_ms",
            "flow.dialing_code",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }

    /// Reset configuration to defaults
    pub fn reset() -> anyhow::Result<()> {
        let path = Self::config_path()?;
        if path.exists() {
            fs::remove_file(&path)
                .with_context(|| format!("Failed to remove config file: {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();

        assert_eq!(config.ui.tick_rate_ms, 100);
        assert!(!config.ui.ascii);
        assert_eq!(config.flow.otp_resend_secs, 45);
        assert_eq!(config.flow.otp_send_delay_ms, 1500);
        assert_eq!(config.flow.dialing_code, "+234");

        config.validate().expect("defaults must validate");
    }

    #[test]
    fn test_config_get_set_roundtrip() {
        let mut config = Config::default();

        config.set("flow.otp_resend_secs", "30").unwrap();
        assert_eq!(config.get("flow.otp_resend_secs").unwrap(), "30");

        config.set("ui.ascii", "true").unwrap();
        assert_eq!(config.get("ui.ascii").unwrap(), "true");

        config.set("flow.dialing_code", "+233").unwrap();
        assert_eq!(config.get("flow.dialing_code").unwrap(), "+233");
    }

    #[test]
    fn test_config_unknown_key() {
        let mut config = Config::default();
        assert!(config.get("flow.bogus").is_err());
        assert!(config.set("flow.bogus", "1").is_err());
    }

    #[test]
    fn test_config_set_rejects_invalid_values() {
        let mut config = Config::default();

        assert!(config.set("ui.tick_rate_ms", "0").is_err());
        assert!(config.set("flow.otp_resend_secs", "0").is_err());
        assert!(config.set("flow.otp_resend_secs", "601").is_err());
        assert!(config.set("flow.dialing_code", "234").is_err());
        assert!(config.set("ui.tick_rate_ms", "not-a-number").is_err());
    }

    #[test]
    fn test_config_toml_roundtrip() {
        let mut config = Config::default();
        config.ui.ascii = true;
        config.flow.otp_resend_secs = 60;

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();

        assert!(parsed.ui.ascii);
        assert_eq!(parsed.flow.otp_resend_secs, 60);
        assert_eq!(parsed.flow.dialing_code, "+234");
    }

    #[test]
    fn test_config_save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.flow.otp_send_delay_ms = 250;
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.flow.otp_send_delay_ms, 250);
    }

    #[test]
    fn test_config_load_from_missing_path_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("config.toml");

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.flow.otp_resend_secs, 45);
    }

    #[test]
    fn test_config_list_covers_all_keys() {
        let config = Config::default();
        let entries = config.list().unwrap();

        assert_eq!(entries.len(), 5);
        assert!(entries.iter().any(|(k, _)| k == "flow.dialing_code"));
    }
}
