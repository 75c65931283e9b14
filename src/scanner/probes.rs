use rayon::prelude::*;
use std::collections::{BTreeSet, HashSet};
use std::path::{Path, PathBuf};

use super::artifact::{Category, FoundArtifact};
use super::walker::{self, canonical_key, Listing};

/// Base directories every probe resolves against
#[derive(Debug, Clone)]
pub struct ScanRoots {
    pub home: PathBuf,
    /// Usually `/Library`
    pub system_library: PathBuf,
    /// Usually `/var/db/receipts`
    pub receipts: PathBuf,
}

impl ScanRoots {
    /// The real home directory and system locations
    pub fn detect() -> Option<Self> {
        dirs::home_dir().map(|home| Self::with_home(&home))
    }

    pub fn with_home(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            system_library: PathBuf::from("/Library"),
            receipts: PathBuf::from("/var/db/receipts"),
        }
    }

    pub fn user_library(&self) -> PathBuf {
        self.home.join("Library")
    }
}

/// What one probe saw
#[derive(Debug, Default)]
pub struct ProbeOutput {
    pub artifacts: Vec<FoundArtifact>,
    /// A location existed but could not be listed
    pub permission_denied: bool,
}

impl ProbeOutput {
    fn record(&mut self, path: &Path, category: Category) {
        if let Some(artifact) = FoundArtifact::inspect(path, category) {
            tracing::debug!("{} [{}]", path.display(), category.slug());
            self.artifacts.push(artifact);
        }
    }

    pub fn merge(outputs: impl IntoIterator<Item = ProbeOutput>) -> ProbeOutput {
        outputs
            .into_iter()
            .fold(ProbeOutput::default(), |mut acc, out| {
                acc.artifacts.extend(out.artifacts);
                acc.permission_denied |= out.permission_denied;
                acc
            })
    }
}

// ─── Exact paths ──────────────────────────────────────────────────────────────

/// A conventional per-app location under `~/Library`
struct ExactLocation {
    parent: &'static str,
    suffix: &'static str,
    category: Category,
}

const EXACT_LOCATIONS: &[ExactLocation] = &[
    ExactLocation { parent: "Containers", suffix: "", category: Category::Containers },
    ExactLocation { parent: "Saved Application State", suffix: ".savedState", category: Category::SavedState },
    ExactLocation { parent: "HTTPStorages", suffix: "", category: Category::HttpStorages },
    ExactLocation { parent: "WebKit", suffix: "", category: Category::Webkit },
    ExactLocation { parent: "Cookies", suffix: ".binarycookies", category: Category::Cookies },
    ExactLocation { parent: "Preferences", suffix: ".plist", category: Category::Preferences },
    ExactLocation { parent: "Preferences", suffix: ".helper.plist", category: Category::Preferences },
    ExactLocation { parent: "Application Scripts", suffix: "", category: Category::ApplicationScripts },
];

/// Every conventional location for a bundle identifier, existing or not
pub fn exact_paths(roots: &ScanRoots, bundle_identifier: &str) -> Vec<(PathBuf, Category)> {
    let library = roots.user_library();
    EXACT_LOCATIONS
        .iter()
        .map(|loc| {
            let path = library
                .join(loc.parent)
                .join(format!("{}{}", bundle_identifier, loc.suffix));
            (path, loc.category)
        })
        .collect()
}

/// Record the conventional locations that exist
pub fn probe_exact(roots: &ScanRoots, bundle_identifier: &str) -> ProbeOutput {
    let found: Vec<ProbeOutput> = exact_paths(roots, bundle_identifier)
        .par_iter()
        .map(|(path, category)| {
            let mut out = ProbeOutput::default();
            out.record(path, *category);
            out
        })
        .collect();
    ProbeOutput::merge(found)
}

// ─── Fuzzy directory scans ────────────────────────────────────────────────────

/// One directory to scan by name
#[derive(Debug, Clone)]
pub struct FuzzyTarget {
    pub dir: PathBuf,
    pub patterns: Vec<String>,
    pub category: Category,
    /// Entry names already claimed by the exact probe
    pub skip_exact: Vec<String>,
    pub include_hidden: bool,
}

impl FuzzyTarget {
    pub fn new(dir: PathBuf, patterns: &[String], category: Category) -> Self {
        Self {
            dir,
            patterns: patterns.to_vec(),
            category,
            skip_exact: Vec::new(),
            include_hidden: false,
        }
    }

    pub fn skipping(mut self, names: Vec<String>) -> Self {
        self.skip_exact = names;
        self
    }
}

/// Case-insensitive containment of any non-empty pattern
pub fn name_matches(name: &str, lowered_patterns: &[String]) -> bool {
    let name = name.to_lowercase();
    lowered_patterns
        .iter()
        .any(|p| !p.is_empty() && name.contains(p.as_str()))
}

/// Scan one directory's immediate children against its patterns
pub fn probe_directory(target: &FuzzyTarget) -> ProbeOutput {
    let mut out = ProbeOutput::default();
    let listing = walker::list_dir(&target.dir, target.include_hidden);
    if listing.is_denied() {
        out.permission_denied = true;
        return out;
    }

    let lowered: Vec<String> = target.patterns.iter().map(|p| p.to_lowercase()).collect();
    for entry in listing.into_entries() {
        if target.skip_exact.contains(&entry.name) {
            continue;
        }
        if name_matches(&entry.name, &lowered) {
            out.record(&entry.path, target.category);
        }
    }
    out
}

/// The directories searched by name, user locations first
pub fn fuzzy_targets(
    roots: &ScanRoots,
    bundle_identifier: &str,
    patterns: &[String],
    include_system: bool,
) -> Vec<FuzzyTarget> {
    let lib = roots.user_library();
    let id_only = vec![bundle_identifier.to_string()];

    let mut targets = vec![
        FuzzyTarget::new(lib.join("Application Support"), patterns, Category::ApplicationSupport),
        FuzzyTarget::new(lib.join("Caches"), patterns, Category::Caches),
        FuzzyTarget::new(lib.join("Logs"), patterns, Category::Logs),
        FuzzyTarget::new(lib.join("LaunchAgents"), patterns, Category::LaunchAgents),
        FuzzyTarget::new(lib.join("Group Containers"), patterns, Category::GroupContainers),
        FuzzyTarget::new(lib.join("Logs/DiagnosticReports"), patterns, Category::CrashReports),
        FuzzyTarget::new(lib.join("Preferences"), &id_only, Category::Preferences).skipping(vec![
            format!("{}.plist", bundle_identifier),
            format!("{}.helper.plist", bundle_identifier),
        ]),
        FuzzyTarget::new(lib.join("Application Scripts"), patterns, Category::ApplicationScripts)
            .skipping(vec![bundle_identifier.to_string()]),
    ];

    if include_system {
        let sys = &roots.system_library;
        targets.extend([
            FuzzyTarget::new(sys.join("Application Support"), patterns, Category::ApplicationSupport),
            FuzzyTarget::new(sys.join("LaunchAgents"), patterns, Category::LaunchAgents),
            FuzzyTarget::new(sys.join("LaunchDaemons"), patterns, Category::LaunchDaemons),
            FuzzyTarget::new(sys.join("Preferences"), patterns, Category::Preferences),
            FuzzyTarget::new(sys.join("Caches"), patterns, Category::Caches),
            FuzzyTarget::new(roots.receipts.clone(), &id_only, Category::Receipts),
        ]);
    }

    targets
}

/// Scan all targets in parallel; output keeps target order
pub fn probe_fuzzy(targets: &[FuzzyTarget]) -> ProbeOutput {
    let outputs: Vec<ProbeOutput> = targets.par_iter().map(probe_directory).collect();
    ProbeOutput::merge(outputs)
}

// ─── Home dot-folders ─────────────────────────────────────────────────────────

/// Hidden entries under home that belong to no single app
pub const IGNORED_HOME_DOT_FOLDERS: &[&str] = &[
    ".trash",
    ".cache",
    ".config",
    ".local",
    ".ssh",
    ".gnupg",
    ".zshrc",
    ".zprofile",
    ".zsh_history",
    ".zsh_sessions",
    ".bashrc",
    ".bash_profile",
    ".bash_history",
    ".profile",
    ".git",
    ".gitconfig",
    ".gitignore_global",
    ".npm",
    ".cargo",
    ".rustup",
    ".gradle",
    ".m2",
    ".ds_store",
    ".cfusertextencoding",
];

pub fn is_ignored_dot_folder(name: &str) -> bool {
    let lower = name.to_lowercase();
    IGNORED_HOME_DOT_FOLDERS.contains(&lower.as_str())
}

/// Hidden children of home whose name (minus the dot) equals or contains a pattern
pub fn probe_home_dot_folders(home: &Path, patterns: &BTreeSet<String>) -> ProbeOutput {
    let mut out = ProbeOutput::default();
    let listing = walker::list_dir(home, true);
    if let Listing::Denied = listing {
        out.permission_denied = true;
        return out;
    }

    for entry in listing.into_entries() {
        let Some(stripped) = entry.name.strip_prefix('.') else {
            continue;
        };
        let clean = stripped.to_lowercase();
        let matched = patterns
            .iter()
            .any(|p| !p.is_empty() && (clean == *p || clean.contains(p.as_str())));
        if matched && !is_ignored_dot_folder(&entry.name) {
            out.record(&entry.path, Category::HomeDirectory);
        }
    }
    out
}

// ─── Discovered paths ─────────────────────────────────────────────────────────

/// `~/x` against home; absolute paths as they are; anything else is not a candidate
pub fn resolve_candidate(home: &Path, candidate: &str) -> Option<PathBuf> {
    if let Some(rest) = candidate.strip_prefix("~/") {
        let rest = rest.trim_end_matches('/');
        if rest.is_empty() || rest.trim_start_matches('.').is_empty() {
            return None;
        }
        Some(home.join(rest))
    } else if candidate.starts_with('/') {
        Some(PathBuf::from(candidate))
    } else {
        None
    }
}

/// Check candidates on disk, skipping anything an earlier phase already found
pub fn resolve_discovered(
    home: &Path,
    candidates: &[String],
    category: Category,
    existing: &HashSet<PathBuf>,
) -> ProbeOutput {
    let mut out = ProbeOutput::default();
    let mut seen = existing.clone();

    for candidate in candidates {
        let Some(path) = resolve_candidate(home, candidate) else {
            continue;
        };
        if !seen.insert(canonical_key(&path)) {
            continue;
        }
        out.record(&path, category);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn roots(dir: &TempDir) -> ScanRoots {
        ScanRoots {
            home: dir.path().join("home"),
            system_library: dir.path().join("Library"),
            receipts: dir.path().join("receipts"),
        }
    }

    fn touch(path: &Path, len: usize) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_exact_paths_cover_all_conventions() {
        let r = ScanRoots::with_home(Path::new("/Users/t"));
        let paths = exact_paths(&r, "com.example.widget");
        assert_eq!(paths.len(), 8);
        assert!(paths.contains(&(
            PathBuf::from("/Users/t/Library/Saved Application State/com.example.widget.savedState"),
            Category::SavedState
        )));
        assert!(paths.contains(&(
            PathBuf::from("/Users/t/Library/Cookies/com.example.widget.binarycookies"),
            Category::Cookies
        )));
    }

    #[test]
    fn test_probe_exact_records_existing_only() {
        let dir = TempDir::new().unwrap();
        let r = roots(&dir);
        touch(&r.user_library().join("Preferences/com.example.widget.plist"), 120);
        std::fs::create_dir_all(r.user_library().join("Containers/com.example.widget/Data")).unwrap();

        let out = probe_exact(&r, "com.example.widget");
        assert_eq!(out.artifacts.len(), 2);
        assert_eq!(out.artifacts[0].category, Category::Containers);
        assert!(out.artifacts[0].is_directory);
        assert_eq!(out.artifacts[1].category, Category::Preferences);
        assert_eq!(out.artifacts[1].size, 120);
    }

    #[test]
    fn test_probe_directory_matches_case_insensitively() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("WIDGET Data/state"), 10);
        touch(&dir.path().join("Unrelated/state"), 10);
        touch(&dir.path().join(".widget-hidden"), 1);

        let target = FuzzyTarget::new(dir.path().to_path_buf(), &["widget".to_string()], Category::Caches);
        let out = probe_directory(&target);
        assert_eq!(out.artifacts.len(), 1);
        assert_eq!(out.artifacts[0].location, dir.path().join("WIDGET Data"));
        assert_eq!(out.artifacts[0].size, 10);
    }

    #[test]
    fn test_probe_directory_skips_claimed_names() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("com.example.widget.plist"), 1);
        touch(&dir.path().join("com.example.widget.LSSharedFileList.plist"), 1);

        let target = FuzzyTarget::new(
            dir.path().to_path_buf(),
            &["com.example.widget".to_string()],
            Category::Preferences,
        )
        .skipping(vec!["com.example.widget.plist".to_string()]);
        let out = probe_directory(&target);
        assert_eq!(out.artifacts.len(), 1);
        assert!(out.artifacts[0]
            .location
            .ends_with("com.example.widget.LSSharedFileList.plist"));
    }

    #[test]
    fn test_missing_directory_yields_nothing() {
        let target = FuzzyTarget::new(PathBuf::from("/no/such/dir"), &["x".to_string()], Category::Logs);
        let out = probe_directory(&target);
        assert!(out.artifacts.is_empty());
        assert!(!out.permission_denied);
    }

    #[test]
    fn test_empty_pattern_never_matches() {
        assert!(!name_matches("anything", &[String::new()]));
        assert!(name_matches("My Widget", &["widget".to_string()]));
    }

    #[test]
    fn test_fuzzy_targets_respect_system_flag() {
        let r = ScanRoots::with_home(Path::new("/Users/t"));
        let patterns = vec!["com.example.widget".to_string(), "Widget".to_string()];
        assert_eq!(fuzzy_targets(&r, "com.example.widget", &patterns, false).len(), 8);

        let all = fuzzy_targets(&r, "com.example.widget", &patterns, true);
        assert_eq!(all.len(), 14);
        let receipts = all.iter().find(|t| t.category == Category::Receipts).unwrap();
        assert_eq!(receipts.patterns, vec!["com.example.widget"]);
        let prefs = &all[6];
        assert_eq!(prefs.patterns, vec!["com.example.widget"]);
        assert_eq!(prefs.skip_exact.len(), 2);
    }

    #[test]
    fn test_home_dot_folders() {
        let dir = TempDir::new().unwrap();
        let home = dir.path();
        std::fs::create_dir(home.join(".widget")).unwrap();
        std::fs::create_dir(home.join(".widget-cli")).unwrap();
        std::fs::create_dir(home.join(".cache")).unwrap();
        std::fs::create_dir(home.join("widget")).unwrap();
        std::fs::create_dir(home.join(".other")).unwrap();

        let patterns: BTreeSet<String> = ["widget", "cache"].iter().map(|s| s.to_string()).collect();
        let out = probe_home_dot_folders(home, &patterns);
        let names: Vec<String> = out
            .artifacts
            .iter()
            .map(|a| a.location.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec![".widget", ".widget-cli"]);
        assert!(out.artifacts.iter().all(|a| a.category == Category::HomeDirectory));
    }

    #[test]
    fn test_resolve_candidate() {
        let home = Path::new("/Users/t");
        assert_eq!(
            resolve_candidate(home, "~/.widgetrc"),
            Some(PathBuf::from("/Users/t/.widgetrc"))
        );
        assert_eq!(resolve_candidate(home, "/opt/widget"), Some(PathBuf::from("/opt/widget")));
        assert_eq!(resolve_candidate(home, "~/."), None);
        assert_eq!(resolve_candidate(home, "~/"), None);
        assert_eq!(resolve_candidate(home, "relative"), None);
    }

    #[test]
    fn test_resolve_discovered_skips_existing() {
        let dir = TempDir::new().unwrap();
        let home = dir.path();
        std::fs::create_dir(home.join(".alpha")).unwrap();
        touch(&home.join(".beta/state"), 7);

        let candidates = vec![
            "~/.alpha".to_string(),
            "~/.beta".to_string(),
            "~/.missing".to_string(),
            "~/.beta".to_string(),
        ];
        let existing = walker::canonical_keys([home.join(".alpha").as_path()]);
        let out = resolve_discovered(home, &candidates, Category::BinaryDiscovered, &existing);
        assert_eq!(out.artifacts.len(), 1);
        assert_eq!(out.artifacts[0].location, home.join(".beta"));
        assert_eq!(out.artifacts[0].size, 7);
        assert_eq!(out.artifacts[0].category, Category::BinaryDiscovered);
    }
}
