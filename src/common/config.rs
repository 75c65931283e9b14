use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::errors::AppSweepError;

pub const DEFAULT_COMMUNITY_URL: &str =
    "https://raw.githubusercontent.com/maylard/MacOS-App-UnInstall/main/Uninstaller/Resources/community_mappings.json";

/// Global AppSweep configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Merge community path mappings into the search patterns
    #[serde(default = "default_true")]
    pub use_community_mappings: bool,

    /// Where the latest community mappings are fetched from
    #[serde(default = "default_community_url")]
    pub community_mappings_url: String,

    /// Network timeout for the community fetch, in seconds
    #[serde(default = "default_community_timeout")]
    pub community_timeout_secs: u64,

    /// Also probe /Library and /var/db/receipts
    #[serde(default = "default_true")]
    pub include_system_locations: bool,

    /// Executable names treated as generic in addition to the built-in list
    #[serde(default)]
    pub extra_generic_names: Vec<String>,

    /// Paths to drop from scan results
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

fn default_true() -> bool {
    true
}
fn default_community_url() -> String {
    DEFAULT_COMMUNITY_URL.to_string()
}
fn default_community_timeout() -> u64 {
    5
}

impl Default for Config {
    fn default() -> Self {
        Self {
            use_community_mappings: true,
            community_mappings_url: default_community_url(),
            community_timeout_secs: default_community_timeout(),
            include_system_locations: true,
            extra_generic_names: Vec::new(),
            exclude_paths: Vec::new(),
        }
    }
}

impl Config {
    /// Get the AppSweep data directory (~/.appsweep)
    pub fn data_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".appsweep")
    }

    /// Get the config file path
    pub fn config_path() -> PathBuf {
        Self::data_dir().join("config.toml")
    }

    /// Get the logs directory
    pub fn logs_dir() -> PathBuf {
        Self::data_dir().join("logs")
    }

    /// Load config from file, or the defaults if there is none
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config: {}", path.display()))?;
        let config: Config = toml::from_str(&contents).map_err(|e| AppSweepError::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(config)
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| AppSweepError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write config: {}", path.display()))?;
        Ok(())
    }

    /// Initialize AppSweep directories
    pub fn init_dirs() -> Result<()> {
        for dir in &[Self::data_dir(), Self::logs_dir()] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }

    /// Update one field from its string form (`config set`)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "use_community_mappings" => self.use_community_mappings = parse_bool(key, value)?,
            "community_mappings_url" => self.community_mappings_url = value.to_string(),
            "community_timeout_secs" => {
                self.community_timeout_secs = value
                    .parse()
                    .with_context(|| format!("'{}' expects a number of seconds", key))?
            }
            "include_system_locations" => {
                self.include_system_locations = parse_bool(key, value)?
            }
            "extra_generic_names" => self.extra_generic_names = split_list(value),
            "exclude_paths" => self.exclude_paths = split_list(value),
            _ => anyhow::bail!("Unknown config key '{}'", key),
        }
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value
        .parse()
        .with_context(|| format!("'{}' expects true or false", key))
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
