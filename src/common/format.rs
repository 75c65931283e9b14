use colored::*;
use std::path::Path;

/// Decimal units, matching what Finder reports for the same files
const UNITS: &[&str] = &["KB", "MB", "GB", "TB"];

/// Format bytes the way Finder does (1 KB = 1000 B)
pub fn format_size(bytes: u64) -> String {
    if bytes < 1000 {
        return format!("{} B", bytes);
    }
    let mut value = bytes as f64 / 1000.0;
    let mut unit = 0;
    while value >= 1000.0 && unit < UNITS.len() - 1 {
        value /= 1000.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{:.1} {}", value, UNITS[unit])
    } else {
        format!("{:.2} {}", value, UNITS[unit])
    }
}

/// Leftovers over 1 GB are red, over 100 MB yellow
pub fn format_size_colored(bytes: u64) -> ColoredString {
    let s = format_size(bytes);
    match bytes {
        b if b >= 1_000_000_000 => s.red().bold(),
        b if b >= 100_000_000 => s.yellow(),
        _ => s.normal(),
    }
}

pub fn format_count(count: usize) -> String {
    match count {
        1 => "1 item".to_string(),
        n => format!("{} items", n),
    }
}

/// Replace a leading `home` with `~`
pub fn format_path_under(path: &Path, home: &Path) -> String {
    match path.strip_prefix(home) {
        Ok(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Ok(rest) => format!("~/{}", rest.display()),
        Err(_) => path.display().to_string(),
    }
}

/// Format a path for display relative to the current user's home
pub fn format_path(path: &Path) -> String {
    match dirs::home_dir() {
        Some(home) => format_path_under(path, &home),
        None => path.display().to_string(),
    }
}

pub fn format_duration(secs: f64) -> String {
    if secs < 1.0 {
        format!("{:.0}ms", secs * 1000.0)
    } else if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        let mins = (secs / 60.0).floor() as u64;
        format!("{}m {:.0}s", mins, secs - mins as f64 * 60.0)
    }
}

/// Shorten a display path to `max_len` chars by eliding its middle,
/// so both the search root and the matched name stay visible.
pub fn truncate_middle(s: &str, max_len: usize) -> String {
    let len = s.chars().count();
    if len <= max_len {
        return s.to_string();
    }
    if max_len <= 1 {
        return "…".repeat(max_len);
    }
    let keep = max_len - 1;
    let head = keep / 2;
    let tail = keep - head;
    let start: String = s.chars().take(head).collect();
    let end: String = s.chars().skip(len - tail).collect();
    format!("{}…{}", start, end)
}
