//! Search strings derived from an `ApplicationDescriptor`.
//!
//! Two sets come out of one descriptor. The primary patterns drive substring
//! matching inside `Library` subdirectories, where entry names are already
//! scoped to app data. The home patterns are narrower and lower-cased; they are
//! only matched against hidden folders directly under the home directory.

use std::collections::BTreeSet;

use super::descriptor::ApplicationDescriptor;

/// Runtime, toolkit and helper names shared by many unrelated apps.
/// Matching on these would tie every Electron app to every other one.
pub const GENERIC_EXECUTABLE_NAMES: &[&str] = &[
    "electron", "node", "python", "python3", "ruby", "java", "php", "perl", "bash", "sh",
    "zsh", "nwjs", "cefclient", "helper", "chromium", "webkit", "qt", "gtk",
];

/// Identifier namespace reserved by the platform vendor
pub const PLATFORM_VENDOR_PREFIX: &str = "com.apple";

pub fn is_generic_name(name: &str, extra: &[String]) -> bool {
    let lower = name.to_lowercase();
    GENERIC_EXECUTABLE_NAMES.contains(&lower.as_str())
        || extra.iter().any(|e| e.to_lowercase() == lower)
}

pub fn is_platform_vendor(developer_name: &str) -> bool {
    developer_name.starts_with(PLATFORM_VENDOR_PREFIX)
}

/// `antigravity` for `com.google.antigravity`
pub fn last_identifier_segment(bundle_identifier: &str) -> Option<&str> {
    bundle_identifier.rsplit('.').next().filter(|s| !s.is_empty())
}

/// Append unless an entry equal under case-insensitive comparison is present
pub fn push_unique_ci(patterns: &mut Vec<String>, candidate: &str) -> bool {
    let candidate = candidate.trim();
    if candidate.is_empty() || patterns.iter().any(|p| p.eq_ignore_ascii_case(candidate)) {
        return false;
    }
    patterns.push(candidate.to_string());
    true
}

#[derive(Debug, Clone, Default)]
pub struct PatternGenerator {
    extra_generic_names: Vec<String>,
}

impl PatternGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extend the generic-name blocklist (from `Config::extra_generic_names`)
    pub fn with_extra_generic_names(mut self, names: &[String]) -> Self {
        self.extra_generic_names.extend(names.iter().cloned());
        self
    }

    fn is_generic(&self, name: &str) -> bool {
        is_generic_name(name, &self.extra_generic_names)
    }

    /// Patterns for fuzzy `Library` scans, in priority order.
    pub fn primary_patterns(&self, app: &ApplicationDescriptor) -> Vec<String> {
        let mut patterns = Vec::new();
        push_unique_ci(&mut patterns, &app.bundle_identifier);

        push_unique_ci(&mut patterns, &app.bundle_name);

        if let Some(display) = app.display_name.as_deref() {
            if display != app.bundle_name {
                push_unique_ci(&mut patterns, display);
            }
        }

        if let Some(exec) = app.executable_name.as_deref() {
            if exec != app.bundle_name && !self.is_generic(exec) {
                push_unique_ci(&mut patterns, exec);
            }
        }

        if let Some(dev) = app.developer_name.as_deref() {
            if !is_platform_vendor(dev) {
                push_unique_ci(&mut patterns, dev);
            }
        }

        if let Some(last) = last_identifier_segment(&app.bundle_identifier) {
            push_unique_ci(&mut patterns, last);
        }

        patterns
    }

    /// Lower-cased names for hidden-folder matching under the home directory.
    /// Only the executable name is checked against the generic blocklist; the
    /// app's own names always count, even when they collide with a runtime.
    pub fn home_patterns(&self, app: &ApplicationDescriptor) -> BTreeSet<String> {
        let mut names: Vec<&str> = vec![&app.bundle_name];
        names.extend(app.display_name.as_deref());
        names.extend(
            app.executable_name
                .as_deref()
                .filter(|exec| !self.is_generic(exec)),
        );
        names.extend(last_identifier_segment(&app.bundle_identifier));

        names
            .into_iter()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_lowercase)
            .collect()
    }
}
