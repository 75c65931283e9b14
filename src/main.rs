use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::{Duration, Instant};

use appsweep::apps::{self, ApplicationDescriptor, Disposer, DryRunDisposer, TrashDisposer};
use appsweep::cli::args::{Cli, Commands, ConfigAction, OutputFormat, ScanArgs};
use appsweep::cli::output;
use appsweep::common::config::Config;
use appsweep::common::errors::AppSweepError;
use appsweep::common::format;
use appsweep::scanner::binary;
use appsweep::scanner::community::{self, CommunityMappings};
use appsweep::{Category, ScanOptions, ScanResult, ScanRoots, Scanner};

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }

    let _log_guard = init_logging(&cli)?;

    match cli.command {
        Commands::Scan { ref scan, detailed } => cmd_scan(&cli, scan, detailed),

        Commands::Remove {
            ref scan,
            dry_run,
            yes,
            include_app,
            ref exclude_category,
        } => cmd_remove(&cli, scan, dry_run, yes, include_app, exclude_category),

        Commands::Patterns { ref scan } => cmd_patterns(scan),

        Commands::Config { action } => cmd_config(action),

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            let mut cmd = Cli::command();
            let shell = match shell {
                appsweep::cli::args::CompletionShell::Bash => clap_complete::Shell::Bash,
                appsweep::cli::args::CompletionShell::Zsh => clap_complete::Shell::Zsh,
                appsweep::cli::args::CompletionShell::Fish => clap_complete::Shell::Fish,
            };
            clap_complete::generate(shell, &mut cmd, "appsweep", &mut std::io::stdout());
            Ok(())
        }
    }
}

fn init_logging(cli: &Cli) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let filter = if cli.verbose {
        EnvFilter::new("appsweep=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off"))
    };

    let stderr_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    if cli.log_file {
        Config::init_dirs()?;
        let appender = tracing_appender::rolling::daily(Config::logs_dir(), "appsweep.log");
        let (writer, guard) = tracing_appender::non_blocking(appender);
        let file_layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(writer);
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();
        Ok(Some(guard))
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .init();
        Ok(None)
    }
}

// ─── Scan ─────────────────────────────────────────────────────────────────────

fn build_scanner(args: &ScanArgs) -> Result<Scanner> {
    let mut config = Config::load()?;
    if args.user_only {
        config.include_system_locations = false;
    }
    let roots = ScanRoots::detect().context("Could not determine the home directory")?;
    let scanner = Scanner::new(ScanOptions::from_config(&config, roots));

    if args.offline || !config.use_community_mappings {
        Ok(scanner)
    } else {
        Ok(scanner.with_community(community::shared(&config).clone()))
    }
}

fn run_scan(cli: &Cli, args: &ScanArgs) -> Result<(ScanResult, f64)> {
    let app = ApplicationDescriptor::from_bundle(&args.bundle).map_err(AppSweepError::from)?;
    let scanner = build_scanner(args)?;

    let show_progress = !cli.quiet && matches!(cli.format, OutputFormat::Human);
    let pb = if show_progress {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Looking for {} leftovers...", app.effective_name()));
        pb.enable_steady_tick(Duration::from_millis(80));
        Some(pb)
    } else {
        None
    };

    let start = Instant::now();
    let result = scanner.scan(app);
    let elapsed = start.elapsed().as_secs_f64();

    if let Some(pb) = pb {
        pb.finish_and_clear();
    }
    Ok((result, elapsed))
}

fn cmd_scan(cli: &Cli, args: &ScanArgs, detailed: bool) -> Result<()> {
    let (result, elapsed) = run_scan(cli, args)?;

    match cli.format {
        OutputFormat::Human => output::print_scan_result(&result, elapsed, detailed),
        OutputFormat::Json => output::print_scan_json(&result),
        OutputFormat::Quiet => output::print_scan_quiet(&result),
    }
    Ok(())
}

// ─── Remove ───────────────────────────────────────────────────────────────────

fn cmd_remove(
    cli: &Cli,
    args: &ScanArgs,
    dry_run: bool,
    yes: bool,
    include_app: bool,
    exclude_category: &[String],
) -> Result<()> {
    let (mut result, elapsed) = run_scan(cli, args)?;

    for slug in exclude_category {
        let category = Category::from_slug(slug)
            .with_context(|| format!("Unknown category '{}'", slug))?;
        result.set_category_selected(category, false);
    }

    let mut paths = result.selected_paths();
    let mut bytes = result.selected_size();
    if include_app {
        paths.push(result.app.bundle_location.clone());
        bytes += appsweep::scanner::walker::dir_size(&result.app.bundle_location);
    }

    if paths.is_empty() {
        if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
            println!("  Nothing to remove for '{}'", result.app.effective_name());
        }
        return Ok(());
    }

    if !cli.quiet && matches!(cli.format, OutputFormat::Human) {
        output::print_scan_result(&result, elapsed, true);
    }

    if !dry_run {
        let process = result
            .app
            .executable_name
            .clone()
            .unwrap_or_else(|| result.app.bundle_name.clone());
        if apps::is_app_running(&process) {
            return Err(AppSweepError::AppRunning {
                name: result.app.effective_name().to_string(),
            }
            .into());
        }

        if !yes {
            print!(
                "  {} Move {} ({}) to the Trash? [y/N] ",
                "❓",
                format::format_count(paths.len()),
                format::format_size(bytes)
            );
            use std::io::Write;
            std::io::stdout().flush()?;
            let mut input = String::new();
            std::io::stdin().read_line(&mut input)?;
            if !input.trim().eq_ignore_ascii_case("y") {
                println!("  {} Cancelled", "✗".red());
                return Ok(());
            }
        }
    }

    let report = if dry_run {
        DryRunDisposer.dispose(&paths)
    } else {
        TrashDisposer::for_current_user()
            .context("Could not determine the home directory")?
            .dispose(&paths)
    };
    result.forget(&report.succeeded);

    match cli.format {
        OutputFormat::Json => {
            let failed: Vec<_> = report
                .failed
                .iter()
                .map(|(p, reason)| serde_json::json!({ "path": p, "reason": reason }))
                .collect();
            println!(
                "{}",
                serde_json::to_string_pretty(&serde_json::json!({
                    "dry_run": dry_run,
                    "succeeded": report.succeeded,
                    "failed": failed,
                    "remaining": result.artifacts.len(),
                }))?
            );
        }
        OutputFormat::Quiet => {
            for p in &report.succeeded {
                println!("{}", p.display());
            }
        }
        OutputFormat::Human => output::print_disposal_report(&report, dry_run, bytes),
    }

    if !report.is_clean() {
        anyhow::bail!("{} item(s) could not be moved to the Trash", report.failed.len());
    }
    Ok(())
}

// ─── Patterns ─────────────────────────────────────────────────────────────────

fn cmd_patterns(args: &ScanArgs) -> Result<()> {
    let mut app = ApplicationDescriptor::from_bundle(&args.bundle).map_err(AppSweepError::from)?;
    let scanner = build_scanner(args)?;

    app.discovered_paths = binary::scan_app_executable(&app);
    let primary = scanner.search_patterns(&app);
    let home = scanner.generator().home_patterns(&app);
    output::print_patterns(&app, &primary, &home, &app.discovered_paths);
    Ok(())
}

// ─── Config ───────────────────────────────────────────────────────────────────

fn cmd_config(action: ConfigAction) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = Config::load()?;
            println!("{}", toml::to_string_pretty(&config)?);
            println!("  {} {}", "Config file:".dimmed(), Config::config_path().display());
        }
        ConfigAction::Reset => {
            Config::default().save()?;
            println!("  {} Configuration reset to defaults", "✓".green());
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            config.save()?;
            println!("  {} {} = {}", "✓".green(), key, value);
        }
        ConfigAction::Init => {
            Config::init_dirs()?;
            if !Config::config_path().exists() {
                Config::default().save()?;
            }
            let mappings = CommunityMappings::bundled();
            println!(
                "  {} Initialized {} ({} bundled community mappings)",
                "✓".green(),
                Config::data_dir().display(),
                mappings.len()
            );
        }
    }
    Ok(())
}
