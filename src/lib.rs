//! # AppSweep
//!
//! Finds what an application leaves behind on macOS once its bundle is gone:
//! caches, preferences, saved state, containers, logs, receipts and hidden
//! configuration folders.
//!
//! - **Exact paths**: the conventional `~/Library` locations keyed by bundle identifier
//! - **Name matching**: fuzzy search of `Library` folders, with generic runtime names filtered out
//! - **Home dot-folders**: conservative matching of hidden folders in `~`
//! - **Executable strings**: `~/.name` paths embedded in the app's binary
//! - **Safe disposal**: results go to the Trash, never straight to deletion

pub mod apps;
pub mod cli;
pub mod common;
pub mod scanner;

pub use apps::{ApplicationDescriptor, PatternGenerator};
pub use scanner::artifact::{Category, FoundArtifact, ScanResult};
pub use scanner::probes::ScanRoots;
pub use scanner::{ScanOptions, Scanner};
