use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::common::safety;

/// Outcome of disposing a batch of paths. Failures are reported, never retried.
#[derive(Debug, Default)]
pub struct DisposalReport {
    pub succeeded: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, String)>,
}

impl DisposalReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Something that takes paths off the user's hands
pub trait Disposer {
    fn dispose(&self, paths: &[PathBuf]) -> DisposalReport;
}

/// Moves paths into the user's Trash so they can still be recovered
#[derive(Debug, Clone)]
pub struct TrashDisposer {
    home: PathBuf,
    trash_dir: PathBuf,
}

impl TrashDisposer {
    pub fn new(home: &Path) -> Self {
        Self {
            home: home.to_path_buf(),
            trash_dir: home.join(".Trash"),
        }
    }

    pub fn for_current_user() -> Option<Self> {
        dirs::home_dir().map(|home| Self::new(&home))
    }

    pub fn trash_dir(&self) -> &Path {
        &self.trash_dir
    }

    fn move_to_trash(&self, path: &Path) -> Result<PathBuf> {
        if safety::is_protected_under(path, &self.home) {
            anyhow::bail!("refusing to move protected path");
        }
        if std::fs::symlink_metadata(path).is_err() {
            anyhow::bail!("no longer exists");
        }

        std::fs::create_dir_all(&self.trash_dir)
            .with_context(|| format!("Failed to create {}", self.trash_dir.display()))?;
        let dest = self.unused_destination(path);
        std::fs::rename(path, &dest)
            .with_context(|| format!("Failed to move to {}", dest.display()))?;
        Ok(dest)
    }

    /// Finder-style naming: `name`, then `name 14.03.22`, then `name 14.03.22 2`, ...
    fn unused_destination(&self, path: &Path) -> PathBuf {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "item".to_string());

        let plain = self.trash_dir.join(&name);
        if std::fs::symlink_metadata(&plain).is_err() {
            return plain;
        }

        let (stem, ext) = match path.extension() {
            Some(ext) if path.is_file() => (
                path.file_stem().map(|s| s.to_string_lossy().to_string()).unwrap_or_default(),
                format!(".{}", ext.to_string_lossy()),
            ),
            _ => (name.clone(), String::new()),
        };
        let stamp = chrono::Local::now().format("%H.%M.%S");

        let mut counter = 1;
        loop {
            let candidate = if counter == 1 {
                format!("{} {}{}", stem, stamp, ext)
            } else {
                format!("{} {} {}{}", stem, stamp, counter, ext)
            };
            let dest = self.trash_dir.join(candidate);
            if std::fs::symlink_metadata(&dest).is_err() {
                return dest;
            }
            counter += 1;
        }
    }
}

impl Disposer for TrashDisposer {
    fn dispose(&self, paths: &[PathBuf]) -> DisposalReport {
        let mut report = DisposalReport::default();
        for path in paths {
            match self.move_to_trash(path) {
                Ok(dest) => {
                    tracing::debug!("trashed {} -> {}", path.display(), dest.display());
                    report.succeeded.push(path.clone());
                }
                Err(e) => {
                    tracing::debug!("could not trash {}: {:#}", path.display(), e);
                    report.failed.push((path.clone(), format!("{:#}", e)));
                }
            }
        }
        report
    }
}

/// Reports every path as disposed without touching the disk
#[derive(Debug, Clone, Default)]
pub struct DryRunDisposer;

impl Disposer for DryRunDisposer {
    fn dispose(&self, paths: &[PathBuf]) -> DisposalReport {
        DisposalReport {
            succeeded: paths.to_vec(),
            failed: Vec::new(),
        }
    }
}

/// Check whether a process with exactly this name is running
pub fn is_app_running(process_name: &str) -> bool {
    std::process::Command::new("pgrep")
        .arg("-x")
        .arg(process_name)
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_trash_moves_files_and_dirs() {
        let dir = TempDir::new().unwrap();
        let home = dir.path();
        let file = home.join("Library/Preferences/com.example.widget.plist");
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(&file, b"prefs").unwrap();
        let folder = home.join(".widget");
        std::fs::create_dir_all(folder.join("sub")).unwrap();

        let disposer = TrashDisposer::new(home);
        let report = disposer.dispose(&[file.clone(), folder.clone()]);
        assert!(report.is_clean());
        assert_eq!(report.succeeded.len(), 2);
        assert!(!file.exists());
        assert!(!folder.exists());
        assert!(home.join(".Trash/com.example.widget.plist").is_file());
        assert!(home.join(".Trash/.widget/sub").is_dir());
    }

    #[test]
    fn test_name_collision_gets_new_name() {
        let dir = TempDir::new().unwrap();
        let home = dir.path();
        std::fs::create_dir_all(home.join(".Trash/notes.txt")).unwrap();
        let file = home.join("notes.txt");
        std::fs::write(&file, b"hi").unwrap();

        let report = TrashDisposer::new(home).dispose(&[file]);
        assert!(report.is_clean());
        assert_eq!(std::fs::read_dir(home.join(".Trash")).unwrap().count(), 2);
    }

    #[test]
    fn test_protected_and_missing_paths_fail() {
        let dir = TempDir::new().unwrap();
        let home = dir.path();
        std::fs::create_dir_all(home.join("Library/Caches")).unwrap();

        let report = TrashDisposer::new(home).dispose(&[
            home.join("Library/Caches"),
            home.join("Library/Caches/gone"),
        ]);
        assert!(report.succeeded.is_empty());
        assert_eq!(report.failed.len(), 2);
        assert!(report.failed[0].1.contains("protected"));
        assert!(home.join("Library/Caches").is_dir());
    }

    #[test]
    fn test_dry_run_touches_nothing() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("keep");
        std::fs::write(&file, b"x").unwrap();
        let report = DryRunDisposer.dispose(&[file.clone()]);
        assert_eq!(report.succeeded, vec![file.clone()]);
        assert!(file.exists());
    }
}
