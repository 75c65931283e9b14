pub mod artifact;
pub mod binary;
pub mod community;
pub mod probes;
pub mod walker;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::apps::patterns::{push_unique_ci, PatternGenerator};
use crate::apps::ApplicationDescriptor;
use crate::common::config::Config;

use artifact::{Category, FoundArtifact, ScanResult};
use community::{CommunityExtras, CommunityMappings};
use probes::{ProbeOutput, ScanRoots};

/// Everything a scan needs besides the descriptor
#[derive(Debug, Clone)]
pub struct ScanOptions {
    pub roots: ScanRoots,
    pub include_system_locations: bool,
    pub extra_generic_names: Vec<String>,
    pub exclude_paths: Vec<String>,
}

impl ScanOptions {
    pub fn new(roots: ScanRoots) -> Self {
        Self {
            roots,
            include_system_locations: true,
            extra_generic_names: Vec::new(),
            exclude_paths: Vec::new(),
        }
    }

    pub fn from_config(config: &Config, roots: ScanRoots) -> Self {
        Self {
            roots,
            include_system_locations: config.include_system_locations,
            extra_generic_names: config.extra_generic_names.clone(),
            exclude_paths: config.exclude_paths.clone(),
        }
    }

    /// Substring match against `exclude_paths`; blank entries match nothing
    pub fn is_excluded(&self, path: &Path) -> bool {
        let path = path.to_string_lossy();
        self.exclude_paths
            .iter()
            .map(|p| p.trim())
            .any(|p| !p.is_empty() && path.contains(p))
    }
}

/// Runs every discovery phase for one application
#[derive(Debug, Clone)]
pub struct Scanner {
    options: ScanOptions,
    generator: PatternGenerator,
    community: Option<CommunityMappings>,
}

impl Scanner {
    pub fn new(options: ScanOptions) -> Self {
        let generator = PatternGenerator::new().with_extra_generic_names(&options.extra_generic_names);
        Self {
            options,
            generator,
            community: None,
        }
    }

    /// Merge a community mappings snapshot into every scan
    pub fn with_community(mut self, mappings: CommunityMappings) -> Self {
        self.community = Some(mappings);
        self
    }

    pub fn generator(&self) -> &PatternGenerator {
        &self.generator
    }

    fn community_extras(&self, app: &ApplicationDescriptor) -> CommunityExtras {
        self.community
            .as_ref()
            .map(|c| c.extras_for(&app.bundle_identifier))
            .unwrap_or_default()
    }

    /// Primary patterns plus any community-supplied names
    pub fn search_patterns(&self, app: &ApplicationDescriptor) -> Vec<String> {
        let mut patterns = self.generator.primary_patterns(app);
        for extra in self.community_extras(app).patterns {
            push_unique_ci(&mut patterns, &extra);
        }
        patterns
    }

    /// Scan for everything `app` left behind.
    ///
    /// Phases run in a fixed order: executable strings, exact paths, name
    /// matches, home dot-folders, then discovered paths. The result is
    /// deduplicated by canonical path with the first occurrence kept.
    pub fn scan(&self, mut app: ApplicationDescriptor) -> ScanResult {
        let roots = &self.options.roots;

        app.discovered_paths = binary::scan_app_executable(&app);

        let patterns = self.search_patterns(&app);
        let home_patterns = self.generator.home_patterns(&app);
        let targets = probes::fuzzy_targets(
            roots,
            &app.bundle_identifier,
            &patterns,
            self.options.include_system_locations,
        );
        tracing::debug!(
            "scanning {} with {} patterns across {} directories",
            app.bundle_identifier,
            patterns.len(),
            targets.len()
        );

        // Independent phases; merged below in their fixed order
        let (exact, (fuzzy, home)) = rayon::join(
            || probes::probe_exact(roots, &app.bundle_identifier),
            || {
                rayon::join(
                    || probes::probe_fuzzy(&targets),
                    || probes::probe_home_dot_folders(&roots.home, &home_patterns),
                )
            },
        );

        let mut before_discovery = ProbeOutput::merge([exact, fuzzy, home]);
        let existing: HashSet<PathBuf> =
            walker::canonical_keys(before_discovery.artifacts.iter().map(|a| a.location.as_path()));

        let discovered = probes::resolve_discovered(
            &roots.home,
            &app.discovered_paths,
            Category::BinaryDiscovered,
            &existing,
        );
        let community_paths = self.community_extras(&app).paths;
        let from_community =
            probes::resolve_discovered(&roots.home, &community_paths, Category::Other, &existing);

        before_discovery.artifacts.extend(discovered.artifacts);
        before_discovery.artifacts.extend(from_community.artifacts);

        let artifacts: Vec<FoundArtifact> = dedup_by_canonical_path(before_discovery.artifacts)
            .into_iter()
            .filter(|a| !self.options.is_excluded(&a.location))
            .collect();

        tracing::debug!("{} artifacts for {}", artifacts.len(), app.bundle_identifier);

        ScanResult {
            app,
            artifacts,
            permission_denied: before_discovery.permission_denied,
        }
    }
}

/// Keep the first artifact for each canonical path
pub fn dedup_by_canonical_path(artifacts: Vec<FoundArtifact>) -> Vec<FoundArtifact> {
    let mut seen = HashSet::new();
    artifacts
        .into_iter()
        .filter(|a| seen.insert(walker::canonical_key(&a.location)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("thing");
        std::fs::write(&path, b"abc").unwrap();

        let first = FoundArtifact::inspect(&path, Category::Preferences).unwrap();
        let mut second = FoundArtifact::inspect(&dir.path().join("./thing"), Category::Caches).unwrap();
        second.location = dir.path().join(".").join("thing");

        let deduped = dedup_by_canonical_path(vec![first.clone(), second]);
        assert_eq!(deduped, vec![first]);
    }

    #[test]
    fn test_exclusions_from_config() {
        let config = Config {
            exclude_paths: vec!["Dropbox".to_string(), "  ".to_string()],
            ..Config::default()
        };
        let options = ScanOptions::from_config(&config, ScanRoots::with_home(Path::new("/h")));
        assert!(options.is_excluded(Path::new("/h/Library/Caches/com.getdropbox.Dropbox")));
        assert!(!options.is_excluded(Path::new("/h/Library/Caches/com.example.widget")));
    }

    #[test]
    fn test_community_names_join_patterns() {
        let mappings = CommunityMappings::from_json(
            r#"{"version":1,"mappings":{"com.example.widget":{"name":"Widget","paths":["WidgetHelper","widget"]}}}"#,
        )
        .unwrap();
        let scanner = Scanner::new(ScanOptions::new(ScanRoots::with_home(std::path::Path::new("/h"))))
            .with_community(mappings);
        let app = ApplicationDescriptor::new("com.example.widget", "Widget", "/A/Widget.app").unwrap();
        let patterns = scanner.search_patterns(&app);
        assert_eq!(patterns, vec!["com.example.widget", "Widget", "com.example", "WidgetHelper"]);
    }
}
