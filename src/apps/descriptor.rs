use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::common::errors::BundleError;

/// Identifying facts about one installed application.
///
/// Built once per scan request, either from an `.app` bundle on disk
/// (`from_bundle`) or directly by a caller that already has the metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationDescriptor {
    pub bundle_identifier: String,
    pub bundle_name: String,
    pub display_name: Option<String>,
    pub executable_name: Option<String>,
    /// First two segments of the identifier, e.g. `com.example`
    pub developer_name: Option<String>,
    pub bundle_location: PathBuf,
    /// Hidden-directory candidates found in the executable (`~/.name`)
    pub discovered_paths: Vec<String>,
}

impl ApplicationDescriptor {
    /// Create a descriptor; the developer name is derived from the identifier.
    pub fn new(
        bundle_identifier: &str,
        bundle_name: &str,
        bundle_location: impl Into<PathBuf>,
    ) -> Result<Self, BundleError> {
        let bundle_location = bundle_location.into();
        let bundle_identifier = bundle_identifier.trim();
        if bundle_identifier.is_empty() {
            return Err(BundleError::MissingIdentifier {
                path: bundle_location,
            });
        }

        Ok(Self {
            bundle_identifier: bundle_identifier.to_string(),
            bundle_name: bundle_name.to_string(),
            display_name: None,
            executable_name: None,
            developer_name: developer_name_for(bundle_identifier),
            bundle_location,
            discovered_paths: Vec::new(),
        })
    }

    pub fn with_display_name(mut self, name: impl Into<String>) -> Self {
        self.display_name = Some(name.into());
        self
    }

    pub fn with_executable_name(mut self, name: impl Into<String>) -> Self {
        self.executable_name = Some(name.into());
        self
    }

    /// Read `Contents/Info.plist` of an `.app` bundle
    pub fn from_bundle(app_path: &Path) -> Result<Self, BundleError> {
        if app_path.extension().and_then(|e| e.to_str()) != Some("app") {
            return Err(BundleError::NotABundle {
                path: app_path.to_path_buf(),
            });
        }

        let info_plist = app_path.join("Contents/Info.plist");
        let plist_val =
            plist::Value::from_file(&info_plist).map_err(|e| BundleError::MetadataUnreadable {
                path: info_plist.clone(),
                message: e.to_string(),
            })?;

        let dict = plist_val
            .as_dictionary()
            .ok_or_else(|| BundleError::MetadataUnreadable {
                path: info_plist.clone(),
                message: "top-level value is not a dictionary".to_string(),
            })?;

        let string_key = |key: &str| {
            dict.get(key)
                .and_then(|v| v.as_string())
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(|s| s.to_string())
        };

        let bundle_id = string_key("CFBundleIdentifier").ok_or_else(|| {
            BundleError::MissingIdentifier {
                path: app_path.to_path_buf(),
            }
        })?;

        let bundle_name = string_key("CFBundleName").unwrap_or_else(|| {
            app_path
                .file_stem()
                .map(|s| s.to_string_lossy().to_string())
                .unwrap_or_default()
        });

        let mut descriptor = Self::new(&bundle_id, &bundle_name, app_path)?;
        descriptor.display_name = string_key("CFBundleDisplayName");
        descriptor.executable_name = string_key("CFBundleExecutable");
        Ok(descriptor)
    }

    /// Display name, falling back to the bundle name
    pub fn effective_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.bundle_name)
    }

    /// `Contents/MacOS/<executable>`, using the bundle name when no executable is declared
    pub fn executable_path(&self) -> PathBuf {
        let exec = self.executable_name.as_deref().unwrap_or(&self.bundle_name);
        self.bundle_location.join("Contents/MacOS").join(exec)
    }
}

/// First two dot-segments of an identifier, only when they are a strict prefix
pub fn developer_name_for(bundle_identifier: &str) -> Option<String> {
    let segments: Vec<&str> = bundle_identifier.split('.').collect();
    if segments.len() < 3 || segments[..2].iter().any(|s| s.is_empty()) {
        return None;
    }
    Some(segments[..2].join("."))
}
