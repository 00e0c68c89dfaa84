//! CLI configuration.

use anyhow::{Context, Result};
use korting_sync::SyncConfig;
use serde::{Deserialize, Serialize};

use crate::logging::{LogFormat, LogLevel};

/// File names searched for, in order.
pub const CONFIG_NAMES: [&str; 3] = ["korting.toml", ".korting.toml", "korting.json"];

/// CLI configuration file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Where offers come from.
    #[serde(default)]
    pub source: SourceConfig,

    /// Controller tuning.
    #[serde(default)]
    pub sync: SyncConfig,

    /// Rendering options.
    #[serde(default)]
    pub display: DisplayConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl CliConfig {
    /// Load config from a file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;

        if path.ends_with(".json") {
            serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse JSON config: {}", path))
        } else {
            toml::from_str(&content)
                .with_context(|| format!("Failed to parse TOML config: {}", path))
        }
    }
}

/// Data source selection. `api_url` wins over `catalog`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Base URL of the discount API (e.g., "http://localhost:5000/api").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    /// JSON catalog file served from memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub catalog: Option<String>,

    /// HTTP request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            catalog: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Rendering options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Maximum offer rows printed.
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_max_rows() -> usize {
    25
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_rows: default_max_rows(),
        }
    }
}

/// Log settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default)]
    pub format: LogFormat,
}

/// Generate a default korting.toml config file.
pub fn generate_default_config() -> String {
    r#"# Korting dashboard configuration

[source]
# api_url = "http://localhost:5000/api"
catalog = "discounts.json"
timeout_secs = 10

[sync]
abort_superseded = false
stats_fallback = true

[display]
max_rows = 25

[logging]
level = "warn"
format = "pretty"
"#
    .to_string()
}
