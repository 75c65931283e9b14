use std::path::PathBuf;

use thiserror::Error;

/// Failures while turning a bundle location into an `ApplicationDescriptor`.
/// Each one aborts the request before any scanning starts.
#[derive(Debug, Error)]
pub enum BundleError {
    /// The path does not name an `.app` bundle
    #[error("'{}' is not an application bundle (.app)", path.display())]
    NotABundle { path: PathBuf },

    /// Info.plist is missing, unreadable, or not a dictionary
    #[error("could not read the application's Info.plist at '{}': {message}", path.display())]
    MetadataUnreadable { path: PathBuf, message: String },

    /// CFBundleIdentifier is absent or empty
    #[error("the application at '{}' does not have a bundle identifier", path.display())]
    MissingIdentifier { path: PathBuf },
}

/// Errors surfaced at the command-line edge.
/// Scan phases never produce these; they swallow filesystem failures.
#[derive(Debug, Error)]
pub enum AppSweepError {
    #[error(transparent)]
    Bundle(#[from] BundleError),

    /// File system operation failed
    #[error("I/O error at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration file is invalid
    #[error("config error in '{}': {message}", path.display())]
    Config { path: PathBuf, message: String },

    /// Refusing to dispose files of an app that is still running
    #[error("'{name}' appears to be running. Please quit it first.")]
    AppRunning { name: String },
}
