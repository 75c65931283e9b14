use colored::*;
use std::collections::BTreeSet;

use crate::apps::{ApplicationDescriptor, DisposalReport};
use crate::common::format::{self, format_path, format_size, format_size_colored};
use crate::common::permissions;
use crate::scanner::artifact::{Category, FoundArtifact, ScanResult};

/// Print scan results in human-readable format
pub fn print_scan_result(result: &ScanResult, elapsed_secs: f64, detailed: bool) {
    print_app_header(&result.app);
    println!(
        "  Scanned in {}  •  {} found  •  {}",
        format::format_duration(elapsed_secs).cyan(),
        format_size_colored(result.total_size()),
        format::format_count(result.artifacts.len()).dimmed()
    );
    println!("{}", "─".repeat(60).dimmed());
    println!();

    if result.artifacts.is_empty() {
        println!("  {} No leftovers found.", "✨");
        print_permission_hint(result);
        return;
    }

    for (category, artifacts) in result.grouped_by_category() {
        let group_size: u64 = artifacts.iter().map(|a| a.size).sum();
        println!(
            "  {} {} ({}, {})",
            category_icon(category),
            category.to_string().bold(),
            format::format_count(artifacts.len()),
            format_size_colored(group_size)
        );

        let shown = if detailed { artifacts.len() } else { artifacts.len().min(5) };
        for artifact in &artifacts[..shown] {
            print_artifact(artifact, detailed);
        }
        if shown < artifacts.len() {
            println!(
                "    {} {} more (use --detailed)",
                "…".dimmed(),
                artifacts.len() - shown
            );
        }
        println!();
    }

    print_permission_hint(result);

    println!("{}", "─".repeat(60).dimmed());
    println!("  {} Total: {}", "💾", format_size_colored(result.total_size()));
    println!(
        "  {} Run {} to move them to the Trash",
        "💡",
        format!("appsweep remove {}", format_path(&result.app.bundle_location)).cyan()
    );
    println!();
}

fn print_app_header(app: &ApplicationDescriptor) {
    println!();
    println!("  {} {}", "📱", app.effective_name().bold());
    println!("{}", "─".repeat(60).dimmed());
    println!("  Bundle ID:  {}", app.bundle_identifier);
    println!("  Location:   {}", format_path(&app.bundle_location));
}

fn print_artifact(artifact: &FoundArtifact, detailed: bool) {
    let path = format_path(&artifact.location);
    let path = if detailed { path } else { format::truncate_middle(&path, 70) };
    let marker = if artifact.is_directory { "▸" } else { "·" };
    println!(
        "    {} {} ({})",
        marker.dimmed(),
        path,
        format_size(artifact.size).dimmed()
    );
}

fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Caches | Category::HttpStorages | Category::Webkit => "📁",
        Category::Preferences | Category::SavedState => "⚙️",
        Category::Logs | Category::CrashReports => "📋",
        Category::LaunchAgents | Category::LaunchDaemons => "🚀",
        Category::Cookies => "🍪",
        Category::Containers | Category::GroupContainers => "📦",
        Category::Receipts => "🧾",
        Category::HomeDirectory | Category::BinaryDiscovered => "🔎",
        Category::ApplicationSupport | Category::ApplicationScripts | Category::Other => "📂",
    }
}

fn print_permission_hint(result: &ScanResult) {
    if result.permission_denied || !permissions::has_full_disk_access() {
        println!(
            "  {} {}",
            "⚠".yellow(),
            "Some locations could not be read. Grant Full Disk Access in System Settings > \
             Privacy & Security to find everything."
                .yellow()
        );
        println!();
    }
}

/// Print scan results as JSON
pub fn print_scan_json(result: &ScanResult) {
    let categories: Vec<_> = result
        .grouped_by_category()
        .into_iter()
        .map(|(category, artifacts)| {
            serde_json::json!({
                "category": category.slug(),
                "label": category.to_string(),
                "size": artifacts.iter().map(|a| a.size).sum::<u64>(),
                "artifacts": artifacts,
            })
        })
        .collect();

    let json = serde_json::json!({
        "app": result.app,
        "total_size": result.total_size(),
        "selected_size": result.selected_size(),
        "selected_count": result.selected_count(),
        "permission_denied": result.permission_denied,
        "categories": categories,
    });

    match serde_json::to_string_pretty(&json) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("Error serializing results: {}", e),
    }
}

/// One line per artifact: size, category, path
pub fn print_scan_quiet(result: &ScanResult) {
    for artifact in &result.artifacts {
        println!(
            "{}\t{}\t{}",
            artifact.size,
            artifact.category.slug(),
            artifact.location.display()
        );
    }
}

/// Print both pattern sets and the executable's embedded paths
pub fn print_patterns(
    app: &ApplicationDescriptor,
    primary: &[String],
    home: &BTreeSet<String>,
    discovered: &[String],
) {
    print_app_header(app);
    println!();
    println!("  {}", "Library patterns".bold());
    for p in primary {
        println!("    {} {}", "•".dimmed(), p);
    }
    println!();
    println!("  {}", "Home dot-folder patterns".bold());
    for p in home {
        println!("    {} {}", "•".dimmed(), p);
    }
    println!();
    println!("  {}", "Paths found in executable".bold());
    if discovered.is_empty() {
        println!("    {}", "none".dimmed());
    }
    for p in discovered {
        println!("    {} {}", "•".dimmed(), p);
    }
    println!();
}

/// Print the outcome of moving artifacts to the Trash
pub fn print_disposal_report(report: &DisposalReport, dry_run: bool, bytes: u64) {
    println!();
    let (icon, label) = if dry_run {
        ("ℹ️", "Dry run")
    } else {
        ("✓", "Moved to Trash")
    };
    println!(
        "  {} {} — {}, {}",
        icon,
        label.bold(),
        format::format_count(report.succeeded.len()),
        format_size_colored(bytes),
    );

    for path in &report.succeeded {
        println!("    {} {}", "✗".red(), format_path(path).dimmed());
    }

    if !report.failed.is_empty() {
        println!();
        for (path, reason) in &report.failed {
            println!(
                "    {} {}: {}",
                "⚠".yellow(),
                format_path(path),
                reason.dimmed()
            );
        }
        if let Some((path, _)) = report.failed.first() {
            println!();
            println!("  {} {}", "💡", permissions::permission_hint(path));
        }
    }
    println!();
}
