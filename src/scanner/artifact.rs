use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::walker;
use crate::apps::ApplicationDescriptor;

/// Where a leftover was found. Declaration order is the display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    ApplicationSupport,
    Caches,
    Preferences,
    SavedState,
    Logs,
    LaunchAgents,
    LaunchDaemons,
    HttpStorages,
    Webkit,
    Cookies,
    Containers,
    GroupContainers,
    Receipts,
    CrashReports,
    ApplicationScripts,
    HomeDirectory,
    BinaryDiscovered,
    Other,
}

impl Category {
    pub const ALL: [Category; 18] = [
        Category::ApplicationSupport,
        Category::Caches,
        Category::Preferences,
        Category::SavedState,
        Category::Logs,
        Category::LaunchAgents,
        Category::LaunchDaemons,
        Category::HttpStorages,
        Category::Webkit,
        Category::Cookies,
        Category::Containers,
        Category::GroupContainers,
        Category::Receipts,
        Category::CrashReports,
        Category::ApplicationScripts,
        Category::HomeDirectory,
        Category::BinaryDiscovered,
        Category::Other,
    ];

    /// Kebab-case name used on the command line and in JSON
    pub fn slug(&self) -> &'static str {
        match self {
            Category::ApplicationSupport => "application-support",
            Category::Caches => "caches",
            Category::Preferences => "preferences",
            Category::SavedState => "saved-state",
            Category::Logs => "logs",
            Category::LaunchAgents => "launch-agents",
            Category::LaunchDaemons => "launch-daemons",
            Category::HttpStorages => "http-storages",
            Category::Webkit => "webkit",
            Category::Cookies => "cookies",
            Category::Containers => "containers",
            Category::GroupContainers => "group-containers",
            Category::Receipts => "receipts",
            Category::CrashReports => "crash-reports",
            Category::ApplicationScripts => "application-scripts",
            Category::HomeDirectory => "home-directory",
            Category::BinaryDiscovered => "binary-discovered",
            Category::Other => "other",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.slug() == slug)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Category::ApplicationSupport => write!(f, "Application Support"),
            Category::Caches => write!(f, "Caches"),
            Category::Preferences => write!(f, "Preferences"),
            Category::SavedState => write!(f, "Saved Application State"),
            Category::Logs => write!(f, "Logs"),
            Category::LaunchAgents => write!(f, "Launch Agents"),
            Category::LaunchDaemons => write!(f, "Launch Daemons"),
            Category::HttpStorages => write!(f, "HTTP Storages"),
            Category::Webkit => write!(f, "WebKit"),
            Category::Cookies => write!(f, "Cookies"),
            Category::Containers => write!(f, "Containers"),
            Category::GroupContainers => write!(f, "Group Containers"),
            Category::Receipts => write!(f, "Receipts"),
            Category::CrashReports => write!(f, "Crash Reports"),
            Category::ApplicationScripts => write!(f, "Application Scripts"),
            Category::HomeDirectory => write!(f, "Home Directory"),
            Category::BinaryDiscovered => write!(f, "Found in Executable"),
            Category::Other => write!(f, "Other"),
        }
    }
}

/// One leftover file or directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundArtifact {
    pub location: PathBuf,
    /// Bytes; for directories the sum of regular files beneath
    pub size: u64,
    pub is_directory: bool,
    pub category: Category,
    /// Review flag, owned by whoever presents the result
    pub selected: bool,
}

impl FoundArtifact {
    /// Stat `path` and build an artifact, or `None` if nothing is there.
    /// A symlink is the artifact itself: not a directory, zero bytes.
    pub fn inspect(path: &Path, category: Category) -> Option<Self> {
        let metadata = std::fs::symlink_metadata(path).ok()?;
        let file_type = metadata.file_type();
        let is_directory = file_type.is_dir();
        let size = if file_type.is_symlink() {
            0
        } else if is_directory {
            walker::dir_size(path)
        } else {
            metadata.len()
        };

        Some(Self {
            location: path.to_path_buf(),
            size,
            is_directory,
            category,
            selected: true,
        })
    }
}

/// Everything one scan found for one application
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub app: ApplicationDescriptor,
    pub artifacts: Vec<FoundArtifact>,
    /// Some location could not be listed; elevated access may find more
    pub permission_denied: bool,
}

impl ScanResult {
    pub fn total_size(&self) -> u64 {
        self.artifacts.iter().map(|a| a.size).sum()
    }

    pub fn selected_size(&self) -> u64 {
        self.artifacts.iter().filter(|a| a.selected).map(|a| a.size).sum()
    }

    pub fn selected_count(&self) -> usize {
        self.artifacts.iter().filter(|a| a.selected).count()
    }

    /// Non-empty groups in category declaration order
    pub fn grouped_by_category(&self) -> Vec<(Category, Vec<&FoundArtifact>)> {
        let mut grouped: HashMap<Category, Vec<&FoundArtifact>> = HashMap::new();
        for artifact in &self.artifacts {
            grouped.entry(artifact.category).or_default().push(artifact);
        }

        Category::ALL
            .iter()
            .filter_map(|c| grouped.remove(c).map(|files| (*c, files)))
            .collect()
    }

    pub fn set_selected(&mut self, location: &Path, selected: bool) -> bool {
        match self.artifacts.iter_mut().find(|a| a.location == location) {
            Some(artifact) => {
                artifact.selected = selected;
                true
            }
            None => false,
        }
    }

    pub fn set_category_selected(&mut self, category: Category, selected: bool) {
        self.artifacts
            .iter_mut()
            .filter(|a| a.category == category)
            .for_each(|a| a.selected = selected);
    }

    pub fn select_all(&mut self, selected: bool) {
        self.artifacts.iter_mut().for_each(|a| a.selected = selected);
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.artifacts
            .iter()
            .filter(|a| a.selected)
            .map(|a| a.location.clone())
            .collect()
    }

    /// Drop artifacts the disposer already took care of
    pub fn forget(&mut self, removed: &[PathBuf]) {
        self.artifacts.retain(|a| !removed.contains(&a.location));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn artifact(path: &str, size: u64, category: Category) -> FoundArtifact {
        FoundArtifact {
            location: PathBuf::from(path),
            size,
            is_directory: false,
            category,
            selected: true,
        }
    }

    fn result(artifacts: Vec<FoundArtifact>) -> ScanResult {
        ScanResult {
            app: ApplicationDescriptor::new("com.example.widget", "Widget", "/A/Widget.app")
                .unwrap(),
            artifacts,
            permission_denied: false,
        }
    }

    #[test]
    fn test_slugs_roundtrip() {
        for c in Category::ALL {
            assert_eq!(Category::from_slug(c.slug()), Some(c));
        }
        assert_eq!(Category::from_slug("nope"), None);
    }

    #[test]
    fn test_serialized_slug_matches() {
        let json = serde_json::to_string(&Category::HttpStorages).unwrap();
        assert_eq!(json, "\"http-storages\"");
    }

    #[test]
    fn test_aggregates() {
        let mut r = result(vec![
            artifact("/a", 100, Category::Caches),
            artifact("/b", 20, Category::Preferences),
            artifact("/c", 3, Category::Caches),
        ]);
        assert_eq!(r.total_size(), 123);
        assert_eq!(r.selected_size(), 123);

        assert!(r.set_selected(Path::new("/a"), false));
        assert!(!r.set_selected(Path::new("/zzz"), false));
        assert_eq!(r.selected_size(), 23);
        assert_eq!(r.selected_count(), 2);
        assert_eq!(r.total_size(), 123);

        r.set_category_selected(Category::Caches, false);
        assert_eq!(r.selected_paths(), vec![PathBuf::from("/b")]);

        r.select_all(true);
        assert_eq!(r.selected_size(), 123);
        r.select_all(false);
        assert_eq!(r.selected_count(), 0);
        assert!(r.selected_paths().is_empty());
    }

    #[test]
    fn test_grouping_follows_category_order() {
        let r = result(vec![
            artifact("/logs", 1, Category::Logs),
            artifact("/support", 1, Category::ApplicationSupport),
            artifact("/logs2", 1, Category::Logs),
        ]);
        let groups = r.grouped_by_category();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Category::ApplicationSupport);
        assert_eq!(groups[1].0, Category::Logs);
        assert_eq!(groups[1].1.len(), 2);
        assert_eq!(groups[1].1[0].location, PathBuf::from("/logs"));
    }

    #[test]
    fn test_forget_removed() {
        let mut r = result(vec![
            artifact("/a", 1, Category::Caches),
            artifact("/b", 1, Category::Caches),
        ]);
        r.forget(&[PathBuf::from("/a")]);
        assert_eq!(r.artifacts.len(), 1);
        assert_eq!(r.artifacts[0].location, PathBuf::from("/b"));
    }

    #[cfg(unix)]
    #[test]
    fn test_inspect_symlink_is_not_sized_by_target() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("target");
        std::fs::create_dir_all(&target).unwrap();
        std::fs::write(target.join("blob"), vec![0u8; 5000]).unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        let artifact = FoundArtifact::inspect(&link, Category::Caches).unwrap();
        assert!(!artifact.is_directory);
        assert_eq!(artifact.size, 0);

        let real = FoundArtifact::inspect(&target, Category::Caches).unwrap();
        assert!(real.is_directory);
        assert_eq!(real.size, 5000);
    }

    #[test]
    fn test_inspect_missing_is_none() {
        assert!(FoundArtifact::inspect(Path::new("/definitely/not/here"), Category::Other).is_none());
    }
}
