use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// AppSweep: find everything an app leaves behind
#[derive(Parser, Debug)]
#[command(
    name = "appsweep",
    version,
    about = "Find the leftover files of a macOS application",
    long_about = "AppSweep finds the caches, preferences, containers, logs, receipts\n\
                  and hidden folders an application created outside its bundle.",
    after_help = "EXAMPLES:\n  \
        appsweep scan /Applications/Slack.app             List leftovers by category\n  \
        appsweep scan /Applications/Slack.app --format json\n  \
        appsweep remove /Applications/Slack.app --dry-run  Preview what would be trashed\n  \
        appsweep remove /Applications/Slack.app --include-app -y\n  \
        appsweep patterns /Applications/Slack.app         Show the search strings used\n  \
        appsweep config show                              Show configuration"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format
    #[arg(long, global = true, default_value = "human")]
    pub format: OutputFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Quiet mode, minimal output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Also write logs to ~/.appsweep/logs
    #[arg(long, global = true)]
    pub log_file: bool,
}

/// Options shared by every command that scans
#[derive(clap::Args, Debug, Clone)]
pub struct ScanArgs {
    /// Path to the .app bundle
    pub bundle: PathBuf,

    /// Skip the community mappings download and bundled table
    #[arg(long)]
    pub offline: bool,

    /// Only search the user's home, not /Library or /var/db/receipts
    #[arg(long)]
    pub user_only: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find leftover files for an application
    Scan {
        #[command(flatten)]
        scan: ScanArgs,

        /// Show every artifact instead of a per-category summary
        #[arg(long)]
        detailed: bool,
    },

    /// Move an application's leftovers to the Trash
    Remove {
        #[command(flatten)]
        scan: ScanArgs,

        /// Preview what would be moved
        #[arg(long)]
        dry_run: bool,

        /// Skip confirmation
        #[arg(long, short = 'y')]
        yes: bool,

        /// Also trash the .app bundle itself
        #[arg(long)]
        include_app: bool,

        /// Leave these categories alone
        #[arg(long, value_delimiter = ',', value_name = "CATEGORY")]
        exclude_category: Vec<String>,
    },

    /// Show the search patterns and embedded paths for an application
    Patterns {
        #[command(flatten)]
        scan: ScanArgs,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: CompletionShell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Reset to default configuration
    Reset,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Configuration value
        value: String,
    },

    /// Initialize AppSweep directories and default config
    Init,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Human,
    Json,
    Quiet,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_remove_parses_categories() {
        let cli = Cli::parse_from([
            "appsweep",
            "remove",
            "/Applications/Widget.app",
            "--exclude-category",
            "caches,logs",
            "--dry-run",
        ]);
        match cli.command {
            Commands::Remove {
                scan,
                dry_run,
                exclude_category,
                ..
            } => {
                assert!(dry_run);
                assert_eq!(scan.bundle, PathBuf::from("/Applications/Widget.app"));
                assert_eq!(exclude_category, vec!["caches", "logs"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
