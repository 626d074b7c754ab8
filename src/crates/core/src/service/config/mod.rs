//! Configuration service.
//!
//! Settings come from an optional `cadpilot.toml` in the per-user config
//! directory. The provider API key is resolved from the environment first
//! and the settings file second; a missing key stops startup.

use crate::util::errors::{CadPilotError, CadPilotResult};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

const CONFIG_DIR_NAME: &str = "cadpilot";
const CONFIG_FILE_NAME: &str = "cadpilot.toml";
const CACHE_FILE_NAME: &str = "docs_catalog.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", default)]
pub struct Settings {
    /// Model identifier sent to the provider.
    pub model: String,
    /// Token budget per model call.
    pub max_tokens: u32,
    /// Provider endpoint base URL.
    pub base_url: String,
    /// API key fallback when the environment variable is unset.
    pub api_key: Option<String>,
    /// Interpreter command used to run generated scripts.
    pub interpreter: String,
    /// Extra arguments passed to the interpreter before the script path.
    pub interpreter_args: Vec<String>,
    /// Structural validation before execution.
    pub validate_before_execute: bool,
    /// Capacity of the recent-code and recent-error buffers.
    pub history_capacity: usize,
    /// Documentation cache expiry in days.
    pub cache_expiry_days: i64,
    /// Override for the cache directory.
    pub cache_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model: "claude-3-7-sonnet-latest".to_string(),
            max_tokens: 4000,
            base_url: "https://api.anthropic.com".to_string(),
            api_key: None,
            interpreter: "python3".to_string(),
            interpreter_args: vec![],
            validate_before_execute: true,
            history_capacity: 5,
            cache_expiry_days: 14,
            cache_dir: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub settings: Settings,
    pub api_key: String,
}

impl Config {
    /// Load settings from the default per-user location and resolve
    /// credentials.
    pub fn load() -> CadPilotResult<Self> {
        Self::load_from(None)
    }

    /// Load settings from an explicit file, falling back to the per-user
    /// location and then to built-in defaults when no file exists.
    pub fn load_from(path: Option<&Path>) -> CadPilotResult<Self> {
        let settings = match path {
            Some(path) => read_settings(path)?,
            None => {
                let default_path = default_config_path();
                if default_path.exists() {
                    read_settings(&default_path)?
                } else {
                    debug!(
                        "No settings file at {}, using defaults",
                        default_path.display()
                    );
                    Settings::default()
                }
            }
        };

        let api_key = resolve_api_key(
            std::env::var(API_KEY_ENV).ok(),
            settings.api_key.as_deref(),
        )?;

        Ok(Self { settings, api_key })
    }

    /// Location of the documentation cache snapshot.
    pub fn cache_file(&self) -> PathBuf {
        self.cache_dir().join(CACHE_FILE_NAME)
    }

    fn cache_dir(&self) -> PathBuf {
        self.settings.cache_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(CONFIG_DIR_NAME)
        })
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join(CONFIG_DIR_NAME)
        .join(CONFIG_FILE_NAME)
}

fn read_settings(path: &Path) -> CadPilotResult<Settings> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        CadPilotError::Config(format!("Failed to read {}: {}", path.display(), e))
    })?;
    toml::from_str(&content).map_err(|e| {
        CadPilotError::Config(format!("Failed to parse {}: {}", path.display(), e))
    })
}

/// Environment wins over the settings file; whitespace-only values count
/// as unset.
fn resolve_api_key(
    env_value: Option<String>,
    settings_value: Option<&str>,
) -> CadPilotResult<String> {
    env_value
        .filter(|key| !key.trim().is_empty())
        .or_else(|| {
            settings_value
                .map(str::to_string)
                .filter(|key| !key.trim().is_empty())
        })
        .ok_or_else(|| {
            CadPilotError::Config(format!(
                "Provider API key not set; export {} or add api_key to the settings file",
                API_KEY_ENV
            ))
        })
}
