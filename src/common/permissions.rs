use std::path::Path;

/// Known SIP-protected paths that cannot be modified
const SIP_PATHS: &[&str] = &[
    "/System",
    "/usr",
    "/bin",
    "/sbin",
    "/var/db/receipts",
    "/Applications/Utilities",
];

/// Paths requiring Full Disk Access
const FDA_PATHS: &[&str] = &[
    "Library/Containers",
    "Library/Group Containers",
    "Library/Safari",
    "Library/Cookies",
    "Library/HTTPStorages",
    "Library/Application Scripts",
    "Library/Mail",
    "Library/Messages",
];

/// Check if a path is SIP-protected
pub fn is_sip_protected(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    SIP_PATHS.iter().any(|p| path_str.starts_with(p))
}

/// Check if a path likely requires Full Disk Access
pub fn requires_full_disk_access(path: &Path) -> bool {
    let path_str = path.to_string_lossy();
    FDA_PATHS.iter().any(|p| path_str.contains(p))
}

/// Get a helpful message for permission issues
pub fn permission_hint(path: &Path) -> String {
    if is_sip_protected(path) {
        "This path is protected by System Integrity Protection (SIP) and cannot be modified."
            .to_string()
    } else if requires_full_disk_access(path) {
        "This path requires Full Disk Access. Grant it in System Settings > Privacy & Security > Full Disk Access."
            .to_string()
    } else {
        format!(
            "Check file permissions for '{}'. You may need admin privileges to remove it.",
            path.display()
        )
    }
}

/// Heuristic Full Disk Access check: Safari's bookmarks are only readable with FDA
pub fn has_full_disk_access() -> bool {
    if let Some(home) = dirs::home_dir() {
        let test_path = home.join("Library/Safari/Bookmarks.plist");
        if test_path.exists() {
            return std::fs::File::open(&test_path).is_ok();
        }
    }
    // Nothing to test against
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sip_paths() {
        assert!(is_sip_protected(Path::new("/System/Library")));
        assert!(is_sip_protected(Path::new("/var/db/receipts/com.x.bom")));
        assert!(!is_sip_protected(Path::new("/Library/Caches/com.x")));
    }

    #[test]
    fn test_fda_paths() {
        assert!(requires_full_disk_access(Path::new(
            "/Users/test/Library/Containers/com.example.widget"
        )));
        assert!(!requires_full_disk_access(Path::new(
            "/Users/test/Library/Caches/com.example.widget"
        )));
    }

    #[test]
    fn test_hint_prefers_sip_message() {
        let hint = permission_hint(Path::new("/System/Library/Foo"));
        assert!(hint.contains("SIP"));
        let hint = permission_hint(Path::new("/Users/x/Library/Containers/com.a.b"));
        assert!(hint.contains("Full Disk Access"));
    }
}
