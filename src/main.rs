use anyhow::Result;
use clap::{Parser, Subcommand};

use refdash::cli;

#[derive(Debug, Parser)]
#[command(name = "refdash")]
#[command(about = "Terminal dashboard for refactor-analysis findings")]
struct App {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Load the dashboard once and render it
    Show {
        /// Output format: table (default), json
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Render the dashboard continuously with timed reloads
    Watch {
        /// Seconds between reloads (default: config poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,
    },
    /// Trigger a fresh analysis server-side, then reload the dashboard
    Refresh,
    /// Show load-history trends
    History {
        /// Number of days to include (default: 7)
        #[arg(long, default_value = "7")]
        days: u32,
        /// Output format: table (default), json, csv
        #[arg(long, default_value = "table")]
        format: String,
    },
    /// Check config, analysis service reachability, and history log
    Health,
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Debug, Subcommand)]
enum ConfigAction {
    /// Show the effective merged configuration
    Show,
    /// Write the default config to ~/.refdash/config.toml
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// Set a single config value (dotted key, e.g. server.timeout_ms)
    Set { key: String, value: String },
    /// Reset the global config to defaults
    Reset,
}

fn main() -> Result<()> {
    let app = App::parse();

    match app.command {
        Commands::Show { format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_show(fmt)
        }
        Commands::Watch { interval } => cli::run_watch(interval),
        Commands::Refresh => cli::run_refresh(),
        Commands::History { days, format } => {
            let fmt = cli::OutputFormat::from_str_opt(Some(&format));
            cli::run_history(days, fmt)
        }
        Commands::Health => cli::run_health(),
        Commands::Config { action } => match action {
            ConfigAction::Show => cli::run_config_show(),
            ConfigAction::Init { force } => cli::run_config_init(force),
            ConfigAction::Set { key, value } => cli::run_config_set(&key, &value),
            ConfigAction::Reset => cli::run_config_reset(),
        },
    }
}
