//! Community-maintained mappings from bundle identifiers to extra locations.
//!
//! A snapshot is immutable once loaded. `load` prefers the published copy and
//! falls back to the table compiled into the binary; `refresh` builds a new
//! snapshot instead of mutating the old one. `shared` caches one snapshot for
//! the lifetime of the process.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration;

use crate::common::config::Config;

const BUNDLED_MAPPINGS: &str = include_str!("../data/community_mappings.json");

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingsFile {
    pub version: u32,
    pub mappings: HashMap<String, AppMapping>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppMapping {
    pub name: String,
    pub paths: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappingSource {
    Remote,
    Bundled,
    Empty,
}

/// Extra search input for one application
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommunityExtras {
    /// Bare names, merged into the primary patterns
    pub patterns: Vec<String>,
    /// `~/...` or absolute paths, checked for existence like discovered paths
    pub paths: Vec<String>,
}

impl CommunityExtras {
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty() && self.paths.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct CommunityMappings {
    source: MappingSource,
    version: u32,
    mappings: HashMap<String, AppMapping>,
}

impl CommunityMappings {
    pub fn empty() -> Self {
        Self {
            source: MappingSource::Empty,
            version: 0,
            mappings: HashMap::new(),
        }
    }

    fn from_file(file: MappingsFile, source: MappingSource) -> Self {
        Self {
            source,
            version: file.version,
            mappings: file.mappings,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let file: MappingsFile =
            serde_json::from_str(json).context("Failed to parse community mappings")?;
        Ok(Self::from_file(file, MappingSource::Bundled))
    }

    /// The table shipped inside the binary
    pub fn bundled() -> Self {
        Self::from_json(BUNDLED_MAPPINGS).unwrap_or_else(|e| {
            tracing::warn!("bundled community mappings unusable: {:#}", e);
            Self::empty()
        })
    }

    /// Fetch the published table, falling back to the bundled one on any failure
    pub fn load(config: &Config) -> Self {
        if !config.use_community_mappings {
            return Self::empty();
        }
        match fetch_remote(&config.community_mappings_url, config.community_timeout_secs) {
            Ok(file) => {
                tracing::debug!(
                    "loaded {} community mappings (v{})",
                    file.mappings.len(),
                    file.version
                );
                Self::from_file(file, MappingSource::Remote)
            }
            Err(e) => {
                tracing::warn!("community mappings fetch failed, using bundled copy: {:#}", e);
                Self::bundled()
            }
        }
    }

    /// A new snapshot from the remote table; keeps this one's data if the fetch fails
    pub fn refresh(&self, config: &Config) -> Self {
        match fetch_remote(&config.community_mappings_url, config.community_timeout_secs) {
            Ok(file) => Self::from_file(file, MappingSource::Remote),
            Err(e) => {
                tracing::warn!("community mappings refresh failed: {:#}", e);
                self.clone()
            }
        }
    }

    pub fn source(&self) -> MappingSource {
        self.source
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    pub fn paths(&self, bundle_identifier: &str) -> &[String] {
        self.mappings
            .get(bundle_identifier)
            .map(|m| m.paths.as_slice())
            .unwrap_or(&[])
    }

    /// Split an app's entries into name patterns and path candidates
    pub fn extras_for(&self, bundle_identifier: &str) -> CommunityExtras {
        let mut extras = CommunityExtras::default();
        for entry in self.paths(bundle_identifier) {
            let entry = entry.trim();
            if entry.is_empty() {
                continue;
            }
            if entry.starts_with("~/") || entry.starts_with('/') {
                if !extras.paths.iter().any(|p| p == entry) {
                    extras.paths.push(entry.to_string());
                }
            } else {
                extras.patterns.push(entry.to_string());
            }
        }
        extras
    }
}

fn fetch_remote(url: &str, timeout_secs: u64) -> Result<MappingsFile> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()?;

    let file: MappingsFile = client
        .get(url)
        .send()
        .with_context(|| format!("GET {}", url))?
        .error_for_status()?
        .json()
        .context("Malformed community mappings")?;
    Ok(file)
}

static SHARED: OnceLock<CommunityMappings> = OnceLock::new();

/// One snapshot per process; the first caller's config decides how it is loaded
pub fn shared(config: &Config) -> &'static CommunityMappings {
    SHARED.get_or_init(|| CommunityMappings::load(config))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_table_parses() {
        let mappings = CommunityMappings::bundled();
        assert_eq!(mappings.source(), MappingSource::Bundled);
        assert!(!mappings.is_empty());
        assert!(mappings.version() > 0);
    }

    #[test]
    fn test_extras_split_paths_from_names() {
        let mappings = CommunityMappings::from_json(
            r#"{"version":1,"mappings":{"com.example.widget":{"name":"Widget",
               "paths":["~/.widget-data","WidgetHelper","/opt/widget","~/.widget-data",""]}}}"#,
        )
        .unwrap();
        let extras = mappings.extras_for("com.example.widget");
        assert_eq!(extras.patterns, vec!["WidgetHelper"]);
        assert_eq!(extras.paths, vec!["~/.widget-data", "/opt/widget"]);
        assert!(mappings.extras_for("com.other.app").is_empty());
    }

    #[test]
    fn test_malformed_json_is_error() {
        assert!(CommunityMappings::from_json("{\"version\": 1}").is_err());
    }

    #[test]
    fn test_disabled_config_loads_nothing() {
        let config = Config {
            use_community_mappings: false,
            ..Config::default()
        };
        let mappings = CommunityMappings::load(&config);
        assert_eq!(mappings.source(), MappingSource::Empty);
        assert!(mappings.paths("com.google.antigravity").is_empty());
    }

    #[test]
    fn test_unreachable_remote_falls_back() {
        let config = Config {
            community_mappings_url: "http://127.0.0.1:9/mappings.json".to_string(),
            community_timeout_secs: 1,
            ..Config::default()
        };
        let mappings = CommunityMappings::load(&config);
        assert_eq!(mappings.source(), MappingSource::Bundled);

        let refreshed = mappings.refresh(&config);
        assert_eq!(refreshed.source(), MappingSource::Bundled);
        assert_eq!(refreshed.len(), mappings.len());
    }

    #[test]
    fn test_shared_snapshot_loaded_once() {
        let offline = Config {
            use_community_mappings: false,
            ..Config::default()
        };
        let first = shared(&offline);
        let second = shared(&Config::default());
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.source(), second.source());
    }
}
