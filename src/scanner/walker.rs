use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// One immediate child of a listed directory
#[derive(Debug, Clone)]
pub struct ListedEntry {
    pub name: String,
    pub path: PathBuf,
}

/// Outcome of listing a directory. Failures are never errors, only absence.
#[derive(Debug)]
pub enum Listing {
    Entries(Vec<ListedEntry>),
    Missing,
    Denied,
}

impl Listing {
    pub fn is_denied(&self) -> bool {
        matches!(self, Listing::Denied)
    }

    pub fn into_entries(self) -> Vec<ListedEntry> {
        match self {
            Listing::Entries(entries) => entries,
            Listing::Missing | Listing::Denied => Vec::new(),
        }
    }
}

/// List immediate children, sorted by name so repeated scans agree
pub fn list_dir(dir: &Path, include_hidden: bool) -> Listing {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => {
            tracing::debug!("permission denied listing {}", dir.display());
            return Listing::Denied;
        }
        Err(_) => return Listing::Missing,
    };

    let mut listed: Vec<ListedEntry> = entries
        .filter_map(|e| e.ok())
        .map(|e| ListedEntry {
            name: e.file_name().to_string_lossy().to_string(),
            path: e.path(),
        })
        .filter(|e| include_hidden || !e.name.starts_with('.'))
        .collect();
    listed.sort_by(|a, b| a.name.cmp(&b.name));
    Listing::Entries(listed)
}

/// Total size of regular files beneath a directory.
/// Symlinks, including `path` itself, and special files are skipped;
/// unreadable subtrees count as zero.
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .follow_root_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.metadata().map(|m| m.len()).unwrap_or(0))
        .sum()
}

/// Key used for deduplication: the resolved path when it can be resolved
pub fn canonical_key(path: &Path) -> PathBuf {
    std::fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Canonical keys of a batch of paths
pub fn canonical_keys<'a>(paths: impl IntoIterator<Item = &'a Path>) -> HashSet<PathBuf> {
    paths.into_iter().map(canonical_key).collect()
}
