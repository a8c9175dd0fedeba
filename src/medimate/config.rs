use crate::error::{MedimateError, Result};
use crate::reminder::notifier::Platform;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const CONFIG_FILENAME: &str = "config.json";
pub const DEFAULT_MESSAGE: &str = "This is your scheduled notification";

/// Configuration for medimate, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct MedimateConfig {
    /// Platform the notifications are delivered on
    #[serde(default)]
    pub platform: Platform,

    /// Whether the local notifier answers permission requests with "granted"
    #[serde(default = "default_true")]
    pub notifications_enabled: bool,

    /// Extra attempts when writing the medication snapshot fails
    #[serde(default = "default_flush_retries")]
    pub flush_retries: u32,

    /// Reminder text used when none was given or saved
    #[serde(default = "default_message")]
    pub default_message: String,
}

fn default_true() -> bool {
    true
}

fn default_flush_retries() -> u32 {
    1
}

fn default_message() -> String {
    DEFAULT_MESSAGE.to_string()
}

impl Default for MedimateConfig {
    fn default() -> Self {
        Self {
            platform: Platform::default(),
            notifications_enabled: true,
            flush_retries: default_flush_retries(),
            default_message: default_message(),
        }
    }
}

impl MedimateConfig {
    pub const KEYS: [&'static str; 4] = [
        "platform",
        "notifications_enabled",
        "flush_retries",
        "default_message",
    ];

    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        let config: MedimateConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        fs::create_dir_all(config_dir)?;

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "platform" => Some(self.platform.to_string()),
            "notifications_enabled" => Some(self.notifications_enabled.to_string()),
            "flush_retries" => Some(self.flush_retries.to_string()),
            "default_message" => Some(self.default_message.clone()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key {
            "platform" => {
                self.platform = value.parse::<Platform>().map_err(MedimateError::validation)?;
            }
            "notifications_enabled" => {
                self.notifications_enabled = parse_bool(value)
                    .ok_or_else(|| invalid(key, value, "expected true or false"))?;
            }
            "flush_retries" => {
                self.flush_retries = value
                    .parse()
                    .map_err(|_| invalid(key, value, "expected a non-negative number"))?;
            }
            "default_message" => {
                if value.is_empty() {
                    return Err(invalid(key, value, "message cannot be empty"));
                }
                self.default_message = value.to_string();
            }
            _ => {
                return Err(MedimateError::validation(format!(
                    "Unknown config key: {}",
                    key
                )))
            }
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(key: &str, value: &str, why: &str) -> MedimateError {
    MedimateError::validation(format!("Invalid value '{}' for {}: {}", value, key, why))
}
