//! Application configuration, stored as TOML under the user config directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use tracing_subscriber::filter::LevelFilter;

use crate::controller::event_collector::CollectorSettings;
use crate::controller::pad::MAX_SLOTS;
use crate::mapping::bindings::ButtonBindings;
use crate::mapping::edge_detector::EdgeSettings;
use crate::menu::configurator::EXIT_CATEGORY;
use crate::menu::list_view::ListSettings;
use crate::menu::scroll::DescriptionMetrics;

const CONFIG_DIR: &str = "arcadia";
const CONFIG_FILE: &str = "arcadia.toml";

// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to access config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Invalid button binding: {0}")]
    InvalidBinding(String),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    pub poll_interval_ms: u64,
    pub stick_threshold: f32,
    pub scroll_scale: f32,
    pub max_devices: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 150,
            stick_threshold: 0.7,
            scroll_scale: 20.0,
            max_devices: MAX_SLOTS,
        }
    }
}

impl ControllerConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn edge_settings(&self) -> EdgeSettings {
        EdgeSettings {
            stick_threshold: self.stick_threshold,
            scroll_scale: self.scroll_scale,
        }
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            max_slots: self.max_devices,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuConfig {
    pub page_size: usize,
    pub block_jump: usize,
    pub categories: Vec<String>,
    pub row_height: f32,
    pub viewport_height: f32,
    pub scroll_margin: f32,
    pub description: DescriptionMetrics,
}

impl Default for MenuConfig {
    fn default() -> Self {
        Self {
            page_size: 7,
            block_jump: 6,
            categories: ["Fighter", "Stage", "Effects", "UI", "Param", "Music", "Misc"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            row_height: 96.0,
            viewport_height: 520.0,
            scroll_margin: 50.0,
            description: DescriptionMetrics::default(),
        }
    }
}

impl MenuConfig {
    pub fn list_settings(&self) -> ListSettings {
        ListSettings {
            page_size: Some(self.page_size),
            block: self.block_jump,
            row_height: self.row_height,
            viewport_height: self.viewport_height,
            scroll_margin: self.scroll_margin,
        }
    }
}

/// One configurator entry and the values it offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfigSection {
    /// Sent back to the host as the `category` of a change
    pub category: String,
    pub label: String,
    pub values: Vec<String>,
}

impl ConfigSection {
    fn new(category: &str, label: &str, values: &[&str]) -> Self {
        Self {
            category: category.to_string(),
            label: label.to_string(),
            values: values.iter().map(|v| v.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfiguratorConfig {
    pub sections: Vec<ConfigSection>,
}

impl Default for ConfiguratorConfig {
    fn default() -> Self {
        Self {
            sections: vec![
                ConfigSection::new(
                    "lang",
                    "Language",
                    &[
                        "us_en", "jp_ja", "us_fr", "us_es", "eu_en", "eu_fr", "eu_es", "eu_de",
                        "eu_nl", "eu_it", "eu_ru", "kr_ko", "zh_cn", "zh_tw",
                    ],
                ),
                ConfigSection::new(
                    "log",
                    "Logging",
                    &["Off", "Error", "Warn", "Info", "Debug", "Trace"],
                ),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    pub mod_listing: PathBuf,
    pub workspace_listing: PathBuf,
    pub channel_capacity: usize,
}

impl Default for HostConfig {
    fn default() -> Self {
        Self {
            mod_listing: PathBuf::from("mods.json"),
            workspace_listing: PathBuf::from("workspaces.json"),
            channel_capacity: 64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::ERROR,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Trace => LevelFilter::TRACE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggerConfig {
    pub level: LogLevel,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub controller: ControllerConfig,
    pub bindings: ButtonBindings,
    pub menu: MenuConfig,
    pub host: HostConfig,
    pub configurator: ConfiguratorConfig,
    pub logger: LoggerConfig,
}

impl AppConfig {
    /// `<config dir>/arcadia/arcadia.toml`, or the working directory if there is none.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| {
            warn!("Could not determine config directory, using current directory");
            PathBuf::from(".")
        });
        path.push(CONFIG_DIR);
        path.push(CONFIG_FILE);
        path
    }

    /// Reads the config at `path`, writing the defaults there first if it is missing.
    pub async fn load_or_create(path: &Path) -> Result<Self, ConfigError> {
        let exists = tokio::fs::try_exists(path).await.map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        if !exists {
            info!("No config at {}, writing defaults", path.display());
            let config = Self::default();
            config.save(path).await?;
            return Ok(config);
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;
        let config: Self = toml::from_str(&content)?;
        config.validate()?;

        debug!("Loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }

        let content = toml::to_string_pretty(self)?;
        tokio::fs::write(path, content)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        info!("Config saved to {}", path.display());
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let controller = &self.controller;
        if !(100..=150).contains(&controller.poll_interval_ms) {
            return Err(ConfigError::InvalidValue(format!(
                "controller.poll_interval_ms must be between 100 and 150, got {}",
                controller.poll_interval_ms
            )));
        }
        if !(controller.stick_threshold > 0.0 && controller.stick_threshold < 1.0) {
            return Err(ConfigError::InvalidValue(format!(
                "controller.stick_threshold must be inside (0, 1), got {}",
                controller.stick_threshold
            )));
        }
        if controller.scroll_scale <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "controller.scroll_scale must be positive".to_string(),
            ));
        }
        if controller.max_devices == 0 || controller.max_devices > MAX_SLOTS {
            return Err(ConfigError::InvalidValue(format!(
                "controller.max_devices must be between 1 and {}",
                MAX_SLOTS
            )));
        }

        let menu = &self.menu;
        if menu.page_size == 0 || menu.block_jump == 0 {
            return Err(ConfigError::InvalidValue(
                "menu.page_size and menu.block_jump must be at least 1".to_string(),
            ));
        }
        if menu.row_height <= 0.0 || menu.viewport_height <= 0.0 {
            return Err(ConfigError::InvalidValue(
                "menu.row_height and menu.viewport_height must be positive".to_string(),
            ));
        }

        let mut categories = std::collections::BTreeSet::new();
        for section in &self.configurator.sections {
            if section.category == EXIT_CATEGORY || !categories.insert(section.category.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "configurator category {:?} is reserved or used twice",
                    section.category
                )));
            }
            if section.values.is_empty() {
                return Err(ConfigError::InvalidValue(format!(
                    "configurator section {:?} has no values",
                    section.category
                )));
            }
        }

        self.bindings.validate()
    }
}
