//! Terminal rendering of the dashboard.
//!
//! [`TerminalView`] implements the controller's render surface with
//! `colored` output: counter lines for the overview, glyph charts, and
//! fixed-width tables. All padding happens before colorization so ANSI
//! escapes never skew column widths, and every cell goes through `format!`
//! interpolation — field values are data, never markup.

pub mod charts;
pub mod snapshot;

use colored::Colorize;

use crate::api::models::{MagicNumberRecord, RawPointerRecord};
use crate::dashboard::charts::{AMBER, BarChart, ChartColor, DonutChart, ORANGE, RED, severity_color};
use crate::dashboard::transform::{FileStatRow, FindingRow};
use crate::dashboard::{DashboardView, OverviewSnapshot};

pub use snapshot::{DashboardSnapshot, SnapshotView};

// ---------------------------------------------------------------------------
// Terminal view
// ---------------------------------------------------------------------------

/// Renders dashboard regions to stdout as they arrive, in load order.
#[derive(Debug, Default)]
pub struct TerminalView;

impl TerminalView {
    pub fn new() -> Self {
        Self
    }

    fn section(&self, title: &str) {
        println!();
        println!("{}", title.bold().cyan());
    }
}

impl DashboardView for TerminalView {
    fn set_loading(&mut self, loading: bool) {
        if loading {
            println!("{}", "Loading dashboard data…".dimmed());
        }
    }

    fn show_overview(&mut self, overview: &OverviewSnapshot) {
        println!();
        println!("{}", "Refactor Analysis Dashboard".bold().cyan());
        println!("{}", "=".repeat(60));

        if let Some(ref name) = overview.project_name {
            println!("  {} {}", "Project:     ".bold(), name);
        }
        if let Some(ref when) = overview.last_updated {
            println!("  {} {}", "Last updated:".bold(), when.as_str().dimmed());
        }
        println!();

        let stats = &overview.statistics;
        println!("  {} {:>7}", "Total files:     ".bold(), format_number(stats.total_files));
        println!("  {} {:>7}", "Total functions: ".bold(), format_number(stats.total_functions));
        println!("  {} {:>7}", "Unused functions:".bold(), format_number(stats.unused_functions));
        println!("  {} {:>7}", "Magic numbers:   ".bold(), format_number(stats.magic_numbers));
        println!("  {} {:>7}", "Commented blocks:".bold(), format_number(stats.commented_blocks));
        println!("  {} {:>7}", "Raw pointers:    ".bold(), format_number(stats.raw_pointers));
        println!("  {} {:>7}", "Total findings:  ".bold(), format_number(stats.total_findings));
    }

    fn render_severity_chart(&mut self, chart: &DonutChart) {
        self.section("Findings by Severity");
        for line in charts::donut_lines(chart) {
            println!("{line}");
        }
    }

    fn render_function_chart(&mut self, chart: &BarChart) {
        self.section("Function Status");
        for line in charts::bar_lines(chart) {
            println!("{line}");
        }
    }

    fn render_findings_table(&mut self, rows: &[FindingRow]) {
        self.section("Top Findings");
        if rows.is_empty() {
            println!("  {}", "No findings — the codebase is clean.".green());
            return;
        }

        println!(
            "  {:<18} {:<9} {:<34} {:<22} {:>5}",
            "Type", "Severity", "Title", "File", "Line"
        );
        println!("  {}", "-".repeat(92));

        for row in rows {
            println!(
                "  {:<18} {} {:<34} {:<22} {:>5}",
                truncate(&row.finding_type, 18),
                severity_cell(&row.severity),
                truncate(&row.title, 34),
                truncate(&row.file, 22),
                row.line,
            );
        }
    }

    fn render_magic_table(&mut self, rows: &[MagicNumberRecord]) {
        self.section("Magic Numbers");
        if rows.is_empty() {
            println!("  {}", "No magic numbers found.".green());
            return;
        }

        println!(
            "  {:>8}  {:<24} {:>5}  {:<24} {:<12}",
            "Value", "File", "Line", "Suggested Constant", "Category"
        );
        println!("  {}", "-".repeat(80));

        for row in rows {
            println!(
                "  {}  {:<24} {:>5}  {:<24} {:<12}",
                format!("{:>8}", row.value).bold(),
                truncate(&row.file, 24),
                row.line,
                row.suggested_constant.as_deref().unwrap_or("-"),
                row.category.as_deref().unwrap_or("-"),
            );
        }
    }

    fn render_file_stats_table(&mut self, rows: &[FileStatRow]) {
        self.section("File Statistics");

        println!(
            "  {:<26} {:>6} {:>7} {:>6} {:>9} {:>9}",
            "File", "Funcs", "Unused", "Magic", "Comments", "Findings"
        );
        println!("  {}", "-".repeat(70));

        for row in rows {
            let stats = &row.stats;
            println!(
                "  {} {:>6} {} {} {} {}",
                format!("{:<26}", truncate(&row.filename, 26)).bold(),
                stats.functions,
                tinted_count(stats.unused_functions, 7, RED),
                tinted_count(stats.magic_numbers, 6, ORANGE),
                tinted_count(stats.commented_blocks, 9, AMBER),
                tinted_count(stats.findings, 9, RED),
            );
        }
    }

    fn render_pointer_severity_chart(&mut self, chart: &DonutChart) {
        self.section("Raw Pointer Risk Levels");
        for line in charts::donut_lines(chart) {
            println!("{line}");
        }
    }

    fn render_pointer_pattern_chart(&mut self, chart: &BarChart) {
        self.section("Raw Pointer Usage Patterns");
        for line in charts::bar_lines(chart) {
            println!("{line}");
        }
    }

    fn render_pointer_table(&mut self, rows: &[RawPointerRecord]) {
        self.section("Dangerous Raw Pointers");
        if rows.is_empty() {
            println!("  {}", "No dangerous raw pointers flagged.".green());
            return;
        }

        println!(
            "  {:<16} {:<18} {:<14} {:<9} {:<20} {:>5}  Suggested Fix",
            "Variable", "Type", "Pattern", "Risk", "File", "Line"
        );
        println!("  {}", "-".repeat(100));

        for row in rows {
            println!(
                "  {:<16} {:<18} {} {} {:<20} {:>5}  {}",
                truncate(&row.variable_name, 16),
                truncate(&row.type_name, 18),
                format!("{:<14}", truncate(&row.pattern_type, 14)).blue(),
                severity_cell(&row.danger_level.to_lowercase()),
                truncate(&row.file, 20),
                row.line,
                truncate(&row.suggested_fix, 40).dimmed(),
            );
            // The surrounding-code context rides along under the row.
            if !row.context.is_empty() {
                println!("      {}", truncate(&row.context, 94).dimmed());
            }
        }
    }

    fn show_error(&mut self, message: &str) {
        eprintln!();
        eprintln!("{} {}", "✗ Error:".red().bold(), message.red());
    }

    fn show_success(&mut self, message: &str) {
        println!();
        println!("{} {}", "✓".green().bold(), message.green());
    }
}

// ---------------------------------------------------------------------------
// Cell formatting
// ---------------------------------------------------------------------------

/// Severity table cell: padded, upper-cased, tinted by severity.
fn severity_cell(severity: &str) -> colored::ColoredString {
    let color = severity_color(severity);
    let padded = format!("{:<9}", truncate(&severity.to_uppercase(), 9));
    padded.truecolor(color.r, color.g, color.b)
}

/// Issue-count cell: tinted when nonzero, plain "0" otherwise.
fn tinted_count(count: u64, width: usize, color: ChartColor) -> colored::ColoredString {
    let padded = format!("{count:>width$}");
    if count > 0 {
        padded.truecolor(color.r, color.g, color.b)
    } else {
        padded.normal()
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

/// Format a number with comma separators for readability.
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

/// Truncate a string to `max_len` characters, appending "…" if truncated.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
