use std::path::Path;

/// Paths that must NEVER be disposed of under any circumstances.
const PROTECTED_PATHS: &[&str] = &[
    "/",
    "/System",
    "/Applications",
    "/Users",
    "/Library",
    "/Library/Application Support",
    "/Library/Caches",
    "/Library/LaunchAgents",
    "/Library/LaunchDaemons",
    "/Library/Preferences",
    "/usr",
    "/bin",
    "/sbin",
    "/var",
    "/var/db/receipts",
    "/etc",
    "/opt",
    "/private",
    "/Volumes",
];

/// Paths under home that must never be disposed of entirely.
/// These are the parents the probes search, plus ubiquitous dot-folders.
const PROTECTED_HOME_DIRS: &[&str] = &[
    "", // home dir itself
    "Desktop",
    "Documents",
    "Downloads",
    "Applications",
    "Library",
    "Library/Application Support",
    "Library/Application Scripts",
    "Library/Caches",
    "Library/Containers",
    "Library/Cookies",
    "Library/Group Containers",
    "Library/HTTPStorages",
    "Library/LaunchAgents",
    "Library/Logs",
    "Library/Logs/DiagnosticReports",
    "Library/Preferences",
    "Library/Saved Application State",
    "Library/WebKit",
    ".Trash",
    ".ssh",
    ".gnupg",
    ".config",
    ".cache",
    ".local",
];

/// Check if a path is protected, relative to the given home directory
pub fn is_protected_under(path: &Path, home: &Path) -> bool {
    if PROTECTED_PATHS.iter().any(|p| path == Path::new(p)) {
        return true;
    }

    PROTECTED_HOME_DIRS.iter().any(|dir| {
        let protected = if dir.is_empty() {
            home.to_path_buf()
        } else {
            home.join(dir)
        };
        path == protected
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_is_protected() {
        let home = Path::new("/Users/test");
        assert!(is_protected_under(Path::new("/"), home));
        assert!(is_protected_under(Path::new("/Library/LaunchDaemons"), home));
        assert!(is_protected_under(Path::new("/var/db/receipts"), home));
    }

    #[test]
    fn test_search_parents_protected() {
        let home = Path::new("/Users/test");
        assert!(is_protected_under(home, home));
        assert!(is_protected_under(&home.join("Library/Caches"), home));
        assert!(is_protected_under(&home.join("Library/Preferences"), home));
        assert!(is_protected_under(&home.join(".config"), home));
    }

    #[test]
    fn test_artifacts_not_protected() {
        let home = Path::new("/Users/test");
        assert!(!is_protected_under(
            &home.join("Library/Caches/com.example.widget"),
            home
        ));
        assert!(!is_protected_under(&home.join(".widgetrc"), home));
        assert!(!is_protected_under(Path::new("/tmp/somefile"), home));
    }
}
