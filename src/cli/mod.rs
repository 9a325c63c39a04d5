//! CLI command implementations for refdash.
//!
//! Provides subcommand handlers for:
//! - `refdash show` — one full dashboard load and render
//! - `refdash watch` — continuous dashboard with timed reloads
//! - `refdash refresh` — trigger server-side re-analysis, then reload
//! - `refdash history --days N` — load-history trend report
//! - `refdash health` — check config, service reachability, history log
//! - `refdash config show|init|set|reset` — configuration management

use std::thread;
use std::time::Duration;

use anyhow::Result;
use colored::Colorize;

use crate::api::AnalysisApi;
use crate::api::HttpAnalysisClient;
use crate::api::models::OverviewStatistics;
use crate::config::{self, RefdashConfig};
use crate::dashboard::{DashboardController, LoadOutcome, LoadReport};
use crate::history::report::DailyTrend;
use crate::history::{self, LoadTrigger, report};
use crate::render::{SnapshotView, TerminalView, format_number};

/// Output format for data-producing commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl OutputFormat {
    pub fn from_str_opt(s: Option<&str>) -> Self {
        match s {
            Some("json") => Self::Json,
            Some("csv") => Self::Csv,
            _ => Self::Table,
        }
    }
}

// ---------------------------------------------------------------------------
// refdash show
// ---------------------------------------------------------------------------

/// Load the dashboard once and render it.
pub fn run_show(format: OutputFormat) -> Result<()> {
    let cfg = config::load();
    let client = HttpAnalysisClient::from_config(&cfg.server);

    match format {
        OutputFormat::Json | OutputFormat::Csv => {
            // The snapshot is a JSON export; csv has no sensible mapping
            // for a multi-section dashboard and falls through to JSON.
            let mut controller = DashboardController::new(client, SnapshotView::new());
            let report = controller.load_dashboard();
            record_history(&cfg, LoadTrigger::Manual, report, controller.last_statistics());

            println!("{}", controller.view().to_json()?);
            ensure_completed(report)
        }
        OutputFormat::Table => {
            let mut controller = DashboardController::new(client, TerminalView::new());
            let report = controller.load_dashboard();
            record_history(&cfg, LoadTrigger::Manual, report, controller.last_statistics());
            ensure_completed(report)
        }
    }
}

// ---------------------------------------------------------------------------
// refdash watch
// ---------------------------------------------------------------------------

/// Continuous dashboard: one immediate load, then timed reloads.
///
/// The controller's busy guard decides whether a tick runs; a tick that
/// would overlap an in-flight cycle is skipped, not queued. Runs until
/// interrupted.
pub fn run_watch(interval_secs: Option<u64>) -> Result<()> {
    let cfg = config::load();
    let interval = Duration::from_secs(
        interval_secs
            .unwrap_or(cfg.dashboard.poll_interval_secs)
            .max(1),
    );

    let client = HttpAnalysisClient::from_config(&cfg.server);
    println!(
        "{}",
        format!(
            "Watching {} (reload every {}s)",
            client.base_url(),
            interval.as_secs()
        )
        .dimmed()
    );

    let mut controller = DashboardController::new(client, TerminalView::new());

    let report = controller.load_dashboard();
    record_history(&cfg, LoadTrigger::Initial, report, controller.last_statistics());

    loop {
        println!();
        println!(
            "{}",
            format!("Next reload in {}s — Ctrl+C to quit.", interval.as_secs()).dimmed()
        );
        thread::sleep(interval);

        let report = controller.tick();
        if report.outcome != LoadOutcome::Skipped {
            record_history(&cfg, LoadTrigger::Scheduled, report, controller.last_statistics());
        }
    }
}

// ---------------------------------------------------------------------------
// refdash refresh
// ---------------------------------------------------------------------------

/// Trigger server-side re-analysis, then reload and render everything.
pub fn run_refresh() -> Result<()> {
    let cfg = config::load();
    let client = HttpAnalysisClient::from_config(&cfg.server);

    let mut controller = DashboardController::new(client, TerminalView::new());
    let report = controller.refresh_analysis();
    record_history(&cfg, LoadTrigger::Refresh, report, controller.last_statistics());
    ensure_completed(report)
}

// ---------------------------------------------------------------------------
// refdash history
// ---------------------------------------------------------------------------

/// Show the load-history trend report.
pub fn run_history(days: u32, format: OutputFormat) -> Result<()> {
    let trends = report::compute_trends(days);

    if trends.is_empty() {
        println!(
            "{}",
            format!("No load history in the last {days} days.").yellow()
        );
        return Ok(());
    }

    match format {
        OutputFormat::Json => print_history_json(&trends)?,
        OutputFormat::Csv => print_history_csv(&trends),
        OutputFormat::Table => print_history_table(&trends, days),
    }

    Ok(())
}

fn print_history_table(trends: &[DailyTrend], days: u32) {
    println!(
        "{}",
        format!("refdash Load History — Last {days} Days").bold().cyan()
    );
    println!("{}", "=".repeat(58));
    println!(
        "  {:<12} {:>6} {:>6} {:>8} {:>9} {:>7}",
        "Date", "Cycles", "Failed", "Avg ms", "Findings", "Delta"
    );
    println!("  {}", "-".repeat(56));

    for trend in trends {
        let findings = trend
            .total_findings
            .map(format_number)
            .unwrap_or_else(|| "-".to_string());

        println!(
            "  {:<12} {:>6} {} {:>8} {:>9} {}",
            trend.date,
            trend.cycles,
            failed_cell(trend.failures),
            trend.avg_duration_ms,
            findings,
            delta_cell(trend.findings_delta),
        );
    }
}

fn print_history_json(trends: &[DailyTrend]) -> Result<()> {
    let values: Vec<_> = trends
        .iter()
        .map(|t| {
            serde_json::json!({
                "date": t.date,
                "cycles": t.cycles,
                "failures": t.failures,
                "avg_duration_ms": t.avg_duration_ms,
                "total_findings": t.total_findings,
                "findings_delta": t.findings_delta,
            })
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn print_history_csv(trends: &[DailyTrend]) {
    println!("date,cycles,failures,avg_duration_ms,total_findings,findings_delta");
    for t in trends {
        println!(
            "{},{},{},{},{},{}",
            t.date,
            t.cycles,
            t.failures,
            t.avg_duration_ms,
            t.total_findings.map(|n| n.to_string()).unwrap_or_default(),
            t.findings_delta.map(|n| n.to_string()).unwrap_or_default(),
        );
    }
}

/// Failure-count cell: red when any cycle failed.
fn failed_cell(failures: usize) -> colored::ColoredString {
    let padded = format!("{failures:>6}");
    if failures > 0 {
        padded.red()
    } else {
        padded.normal()
    }
}

/// Delta cell: fewer findings is progress (green), more is regression (red).
fn delta_cell(delta: Option<i64>) -> colored::ColoredString {
    match delta {
        None => format!("{:>7}", "-").normal(),
        Some(0) => format!("{:>7}", "0").normal(),
        Some(d) if d < 0 => format!("{d:>7}").green(),
        Some(d) => format!("{:>7}", format!("+{d}")).red(),
    }
}

// ---------------------------------------------------------------------------
// refdash health
// ---------------------------------------------------------------------------

/// Check system health: config files, analysis service, history log.
pub fn run_health() -> Result<()> {
    println!("{}", "refdash Health Check".bold().cyan());
    println!("{}", "=".repeat(40));

    // 0. Config file status
    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let cfg = config::load();

    print_health_item(
        "Global config",
        global_exists,
        if global_exists {
            "~/.refdash/config.toml found"
        } else {
            "not found (run `refdash config init` to create)"
        },
    );
    print_health_item(
        "Project config",
        project_exists,
        if project_exists {
            ".refdash.toml found"
        } else {
            "none (optional)"
        },
    );
    print_health_item(
        "Poll interval",
        true,
        &format!("{}s", cfg.dashboard.poll_interval_secs),
    );

    // 1. Analysis service reachability
    let client = HttpAnalysisClient::from_config(&cfg.server);
    match client.fetch_overview() {
        Ok(overview) => {
            print_health_item(
                "Analysis service",
                true,
                &format!(
                    "reachable at {} — {} findings",
                    cfg.server.base_url,
                    format_number(overview.statistics.total_findings)
                ),
            );
        }
        Err(err) => {
            print_health_item(
                "Analysis service",
                false,
                &format!("{} — {err:#}", cfg.server.base_url),
            );
        }
    }

    // 2. History log
    let log_exists = history::history_log_path()
        .map(|p| p.exists())
        .unwrap_or(false);
    let log_entries = if log_exists {
        history::read_all_entries().len()
    } else {
        0
    };
    print_health_item(
        "Load history",
        cfg.history.enabled,
        &if !cfg.history.enabled {
            "disabled".to_string()
        } else if log_exists {
            format!("{log_entries} entries")
        } else {
            "no log file yet".to_string()
        },
    );

    Ok(())
}

fn print_health_item(name: &str, ok: bool, detail: &str) {
    let status = if ok {
        "✓".green().bold()
    } else {
        "✗".red().bold()
    };
    println!("  {} {:<20} {}", status, name, detail.dimmed());
}

// ---------------------------------------------------------------------------
// refdash config show | init | set | reset
// ---------------------------------------------------------------------------

/// Show the effective (merged) configuration as TOML.
pub fn run_config_show() -> Result<()> {
    let toml_str = config::show_effective_config()?;
    println!("{}", "Effective refdash Configuration".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();
    println!("{toml_str}");

    let global_exists = config::global_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    let project_exists = config::project_config_file()
        .map(|p| p.exists())
        .unwrap_or(false);
    println!("{}", "Sources (highest priority last):".dimmed());
    println!("  {} built-in defaults", "·".dimmed());
    if global_exists {
        println!("  {} {}", "✓".green(), "~/.refdash/config.toml".dimmed());
    } else {
        println!(
            "  {} {}",
            "·".dimmed(),
            "~/.refdash/config.toml (not found)".dimmed()
        );
    }
    if project_exists {
        println!("  {} {}", "✓".green(), ".refdash.toml".dimmed());
    } else {
        println!("  {} {}", "·".dimmed(), ".refdash.toml (not found)".dimmed());
    }
    println!(
        "  {} {}",
        "·".dimmed(),
        "REFDASH_* environment variables".dimmed()
    );

    Ok(())
}

/// Initialize a default config file at `~/.refdash/config.toml`.
pub fn run_config_init(force: bool) -> Result<()> {
    let path = config::init_config(force)?;
    println!(
        "{} Config written to {}",
        "✓".green().bold(),
        path.display()
    );
    println!(
        "  {}",
        "Edit the file to point refdash at your analysis service.".dimmed()
    );
    Ok(())
}

/// Set a single configuration value in the global config file.
pub fn run_config_set(key: &str, value: &str) -> Result<()> {
    config::set_config_value(key, value)?;
    println!("{} Set {} = {}", "✓".green().bold(), key.bold(), value);
    Ok(())
}

/// Reset configuration to defaults.
pub fn run_config_reset() -> Result<()> {
    let path = config::reset_config()?;
    println!(
        "{} Config reset to defaults at {}",
        "✓".green().bold(),
        path.display()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Append a cycle to the load history when enabled.
///
/// Counters are recorded only for completed cycles — a failed cycle may
/// hold counters from an earlier load, and those would misdate the trend.
fn record_history(
    cfg: &RefdashConfig,
    trigger: LoadTrigger,
    load: LoadReport,
    statistics: Option<OverviewStatistics>,
) {
    if !cfg.history.enabled {
        return;
    }

    let success = load.outcome == LoadOutcome::Completed;
    history::log_load_result(
        trigger,
        success,
        load.duration_ms,
        if success { statistics } else { None },
    );
}

/// Map a load outcome to the process exit status.
fn ensure_completed(load: LoadReport) -> Result<()> {
    match load.outcome {
        LoadOutcome::Completed => Ok(()),
        LoadOutcome::Failed => anyhow::bail!("dashboard load did not complete"),
        LoadOutcome::Skipped => anyhow::bail!("a load cycle was already in progress"),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
