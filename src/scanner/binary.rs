//! Hidden-directory candidates recovered from an app's compiled executable.
//!
//! Works like `strings(1)`: printable ASCII runs are pulled out of the raw
//! bytes, then anything that looks like a `~/.name` or `/Users/x/.name` path
//! is normalized to `~/.name`. Nothing here touches the filesystem except
//! reading the executable; existence is checked later by the resolver.

use std::path::Path;

use crate::apps::ApplicationDescriptor;

pub const MIN_RUN_LENGTH: usize = 5;
pub const MAX_CANDIDATE_LENGTH: usize = 100;

const WILDCARD_CHARS: &[char] = &['*', '?', '[', ']', '{', '}'];

/// Maximal runs of printable ASCII (space through tilde) at least `min_len` long
pub fn printable_runs(bytes: &[u8], min_len: usize) -> Vec<String> {
    bytes
        .split(|b| !(0x20..=0x7E).contains(b))
        .filter(|run| run.len() >= min_len)
        .map(|run| run.iter().map(|&b| b as char).collect())
        .collect()
}

/// Keep only runs that could be a path
pub fn path_like(runs: Vec<String>) -> Vec<String> {
    runs.into_iter()
        .filter(|s| s.contains('/') || s.contains('~'))
        .collect()
}

/// `~/.<segment>`, or `None` when the segment is empty after dropping leading dots
fn dot_path(segment: &str) -> Option<String> {
    let name = segment.trim_start_matches('.');
    if name.is_empty() {
        None
    } else {
        Some(format!("~/.{}", name))
    }
}

/// Candidate from a `~/.` string: the first segment after `~/`
fn home_relative_candidate(normalized: &str) -> Option<String> {
    if !normalized.starts_with("~/.")
        || normalized.contains(WILDCARD_CHARS)
        || normalized.len() >= MAX_CANDIDATE_LENGTH
    {
        return None;
    }
    let after_home = &normalized[2..];
    let segment = after_home.split('/').next().unwrap_or(after_home);
    dot_path(segment)
}

/// Candidate from an absolute `/Users/<name>/.../.<segment>/...` string
fn absolute_user_candidate(s: &str) -> Option<String> {
    if !s.starts_with("/Users/") {
        return None;
    }
    let idx = s.rfind("/.")?;
    let after_dot = &s[idx + 2..];
    // A trailing `.name` with no following slash is a file, not a directory
    let slash = after_dot.find('/')?;
    dot_path(&after_dot[..slash])
}

/// Turn path-like strings into ordered, duplicate-free `~/.name` candidates
pub fn normalize_candidates<S: AsRef<str>>(strings: &[S]) -> Vec<String> {
    let mut paths: Vec<String> = Vec::new();
    let mut push = |candidate: Option<String>| {
        if let Some(c) = candidate {
            if !paths.contains(&c) {
                paths.push(c);
            }
        }
    };

    for raw in strings {
        let raw = raw.as_ref();
        let normalized = raw.replace("$HOME", "~");
        push(home_relative_candidate(normalized.trim()));
        push(absolute_user_candidate(raw));
    }

    paths
}

/// Both stages over raw executable bytes
pub fn candidates_from_bytes(bytes: &[u8]) -> Vec<String> {
    normalize_candidates(&path_like(printable_runs(bytes, MIN_RUN_LENGTH)))
}

/// Read an executable and extract candidates; unreadable or missing files yield nothing
pub fn scan_executable(path: &Path) -> Vec<String> {
    if !path.is_file() {
        tracing::debug!("no executable at {}", path.display());
        return Vec::new();
    }

    match std::fs::read(path) {
        Ok(bytes) => {
            let found = candidates_from_bytes(&bytes);
            tracing::debug!(
                "{} hidden-path candidates in {}",
                found.len(),
                path.display()
            );
            found
        }
        Err(e) => {
            tracing::debug!("could not read {}: {}", path.display(), e);
            Vec::new()
        }
    }
}

/// Scan the descriptor's executable
pub fn scan_app_executable(app: &ApplicationDescriptor) -> Vec<String> {
    scan_executable(&app.executable_path())
}
