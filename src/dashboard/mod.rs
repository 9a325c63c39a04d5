//! Dashboard orchestration: fetch, shape, render.
//!
//! [`DashboardController`] owns the load cycle. It is deliberately dumb
//! about both ends: data comes in through an [`AnalysisApi`](crate::api::AnalysisApi)
//! and rendered output goes out through a [`DashboardView`], so the whole
//! orchestration runs under test with a scripted API and a recording view.
//!
//! A load cycle has four stages in a fixed order — overview, charts,
//! tables, file stats — each completing (including nested fetches) before
//! the next starts. The first failing stage aborts the rest of the cycle
//! and surfaces one generic error; sections already rendered stay on
//! screen until the next cycle. The raw-pointer section is the exception:
//! it fails quietly on its own, without taking the cycle down.

pub mod charts;
pub mod transform;

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;

use crate::api::AnalysisApi;
use crate::api::models::{MagicNumberRecord, OverviewStatistics, RawPointerRecord};

use charts::{BarChart, ChartSlot, DonutChart};
use transform::{FileStatRow, FindingRow, MAX_MAGIC_ROWS};

/// User-facing message for a failed load cycle.
pub const LOAD_ERROR_MESSAGE: &str = "Failed to load dashboard data";
/// User-facing message for a failed refresh action.
pub const REFRESH_ERROR_MESSAGE: &str = "Failed to refresh analysis";

// ---------------------------------------------------------------------------
// View abstraction
// ---------------------------------------------------------------------------

/// Overview header data, ready for display.
#[derive(Debug, Clone, Serialize)]
pub struct OverviewSnapshot {
    pub project_name: Option<String>,
    pub statistics: OverviewStatistics,
    /// Already formatted for the viewer's locale.
    pub last_updated: Option<String>,
}

/// The render surface the controller writes into.
///
/// One method per dashboard region, plus loading indication and the two
/// notification channels. Implementations decide what a donut looks like
/// in their medium; the terminal view draws glyph bars, the snapshot view
/// just records the values.
pub trait DashboardView {
    /// Loading indication; `true` when a cycle starts, `false` when it ends.
    fn set_loading(&mut self, loading: bool);

    fn show_overview(&mut self, overview: &OverviewSnapshot);
    fn render_severity_chart(&mut self, chart: &DonutChart);
    fn render_function_chart(&mut self, chart: &BarChart);
    fn render_findings_table(&mut self, rows: &[FindingRow]);
    fn render_magic_table(&mut self, rows: &[MagicNumberRecord]);
    fn render_file_stats_table(&mut self, rows: &[FileStatRow]);
    fn render_pointer_severity_chart(&mut self, chart: &DonutChart);
    fn render_pointer_pattern_chart(&mut self, chart: &BarChart);
    fn render_pointer_table(&mut self, rows: &[RawPointerRecord]);

    /// Blocking-style error notification with a user-facing message.
    fn show_error(&mut self, message: &str);
    /// Transient success notification.
    fn show_success(&mut self, message: &str);
}

// ---------------------------------------------------------------------------
// Load reporting
// ---------------------------------------------------------------------------

/// What happened to a triggered load cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    Completed,
    Failed,
    /// Another cycle was in flight; this trigger was dropped, not queued.
    Skipped,
}

/// Outcome plus timing of one load or refresh cycle.
#[derive(Debug, Clone, Copy)]
pub struct LoadReport {
    pub outcome: LoadOutcome,
    pub duration_ms: u64,
}

impl LoadReport {
    fn skipped() -> Self {
        Self {
            outcome: LoadOutcome::Skipped,
            duration_ms: 0,
        }
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Drives the dashboard: one instance per CLI invocation, owned by the
/// entry point.
pub struct DashboardController<A, V> {
    api: A,
    view: V,
    /// Reentrancy guard. Consulted by every trigger path — a trigger that
    /// arrives while a cycle is in flight is skipped, never queued.
    busy: bool,
    severity_chart: ChartSlot<DonutChart>,
    function_chart: ChartSlot<BarChart>,
    pointer_severity_chart: ChartSlot<DonutChart>,
    pointer_pattern_chart: ChartSlot<BarChart>,
    last_statistics: Option<OverviewStatistics>,
}

impl<A: AnalysisApi, V: DashboardView> DashboardController<A, V> {
    pub fn new(api: A, view: V) -> Self {
        Self {
            api,
            view,
            busy: false,
            severity_chart: ChartSlot::new(),
            function_chart: ChartSlot::new(),
            pointer_severity_chart: ChartSlot::new(),
            pointer_pattern_chart: ChartSlot::new(),
            last_statistics: None,
        }
    }

    /// Run one full load cycle.
    ///
    /// Busy-guarded; the guard and the loading indication are cleared on
    /// every exit path, success or failure.
    pub fn load_dashboard(&mut self) -> LoadReport {
        let Some(guard_started) = self.begin_cycle() else {
            return LoadReport::skipped();
        };

        let result = self.run_load_stages();
        let report = self.end_cycle(guard_started, result.is_ok());

        if let Err(err) = result {
            eprintln!("[refdash] dashboard load failed: {err:#}");
            self.view.show_error(LOAD_ERROR_MESSAGE);
        }

        report
    }

    /// Scheduled trigger: identical to [`load_dashboard`], named for the
    /// watch loop. Skips when a cycle is already in flight.
    ///
    /// [`load_dashboard`]: Self::load_dashboard
    pub fn tick(&mut self) -> LoadReport {
        self.load_dashboard()
    }

    /// The refresh action: trigger re-analysis server-side, then reload
    /// everything and announce success.
    ///
    /// Guarded and cleaned up exactly like [`load_dashboard`] — the guard
    /// is authoritative for every trigger path.
    ///
    /// [`load_dashboard`]: Self::load_dashboard
    pub fn refresh_analysis(&mut self) -> LoadReport {
        let Some(guard_started) = self.begin_cycle() else {
            return LoadReport::skipped();
        };

        let result = self.run_refresh();
        let report = self.end_cycle(guard_started, result.is_ok());

        match result {
            Ok(message) => self.view.show_success(&message),
            Err(err) => {
                eprintln!("[refdash] refresh failed: {err:#}");
                self.view.show_error(REFRESH_ERROR_MESSAGE);
            }
        }

        report
    }

    /// Claim the busy guard. Returns the cycle start time, or `None` when a
    /// cycle is already in flight.
    fn begin_cycle(&mut self) -> Option<Instant> {
        if self.busy {
            return None;
        }
        self.busy = true;
        self.view.set_loading(true);
        Some(Instant::now())
    }

    /// Release the guard and loading indication; runs on all exit paths.
    fn end_cycle(&mut self, started: Instant, completed: bool) -> LoadReport {
        self.view.set_loading(false);
        self.busy = false;
        LoadReport {
            outcome: if completed {
                LoadOutcome::Completed
            } else {
                LoadOutcome::Failed
            },
            duration_ms: started.elapsed().as_millis() as u64,
        }
    }

    fn run_load_stages(&mut self) -> Result<()> {
        self.load_overview()?;
        self.load_charts()?;
        self.load_tables()?;
        self.load_file_stats()?;
        Ok(())
    }

    fn run_refresh(&mut self) -> Result<String> {
        let outcome = self.api.trigger_refresh()?;
        self.run_load_stages()?;

        Ok(match outcome.functions_analyzed {
            Some(count) => format!("Analysis refreshed — {count} functions analyzed"),
            None => "Analysis refreshed".to_string(),
        })
    }

    fn load_overview(&mut self) -> Result<()> {
        let overview = self.api.fetch_overview()?;

        let snapshot = OverviewSnapshot {
            project_name: overview.project_name,
            statistics: overview.statistics,
            last_updated: overview
                .last_updated
                .as_deref()
                .map(|raw| format_last_updated(raw).unwrap_or_else(|| raw.to_string())),
        };

        self.last_statistics = Some(overview.statistics);
        self.view.show_overview(&snapshot);
        Ok(())
    }

    fn load_charts(&mut self) -> Result<()> {
        // Sequential, findings first: total latency is the sum, but a
        // findings failure is reported before the functions request fires.
        let findings = self.api.fetch_findings()?;
        let functions = self.api.fetch_functions()?;

        let donut = charts::severity_donut(&findings.by_severity);
        let chart = self.severity_chart.replace(donut);
        self.view.render_severity_chart(chart);

        let counts = transform::count_statuses(&functions);
        let bars = charts::function_status_bars(&counts);
        let chart = self.function_chart.replace(bars);
        self.view.render_function_chart(chart);

        self.load_raw_pointers();
        Ok(())
    }

    fn load_tables(&mut self) -> Result<()> {
        // The findings endpoint is fetched again rather than reusing the
        // charts-stage response: each stage owns its requests, and a reload
        // between stages is reflected rather than hidden.
        let findings = self.api.fetch_findings()?;
        let magic = self.api.fetch_magic_numbers()?;

        let rows = transform::flatten_findings(&findings.by_type);
        self.view.render_findings_table(&rows);

        let shown = &magic[..magic.len().min(MAX_MAGIC_ROWS)];
        self.view.render_magic_table(shown);
        Ok(())
    }

    fn load_file_stats(&mut self) -> Result<()> {
        let report = self.api.fetch_file_stats()?;
        let rows = transform::order_file_stats(report);
        self.view.render_file_stats_table(&rows);
        Ok(())
    }

    /// The raw-pointer section loads inside the charts stage but is
    /// isolated: any failure is logged and swallowed, leaving the section
    /// unrendered while the rest of the dashboard proceeds.
    fn load_raw_pointers(&mut self) {
        let report = match self.api.fetch_raw_pointers() {
            Ok(report) => report,
            Err(err) => {
                eprintln!("[refdash] raw pointer data unavailable: {err:#}");
                return;
            }
        };

        let donut = charts::severity_donut(&report.severity_breakdown);
        let chart = self.pointer_severity_chart.replace(donut);
        self.view.render_pointer_severity_chart(chart);

        let bars = charts::pattern_bars(&report.pattern_breakdown);
        let chart = self.pointer_pattern_chart.replace(bars);
        self.view.render_pointer_pattern_chart(chart);

        self.view.render_pointer_table(&report.dangerous_pointers);
    }

    /// Whether a load cycle is currently in flight.
    pub fn is_busy(&self) -> bool {
        self.busy
    }

    /// Counters from the most recent successful overview fetch.
    pub fn last_statistics(&self) -> Option<OverviewStatistics> {
        self.last_statistics
    }

    /// The severity chart currently installed, if any.
    pub fn severity_chart(&self) -> Option<&DonutChart> {
        self.severity_chart.current()
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}

// ---------------------------------------------------------------------------
// Timestamp formatting
// ---------------------------------------------------------------------------

const LAST_UPDATED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format a service timestamp for local display.
///
/// The service emits ISO timestamps; offset-carrying ones are converted to
/// the viewer's timezone, naive ones are shown as-is (the service writes
/// them in its own wall clock, which is the best available reading).
fn format_last_updated(raw: &str) -> Option<String> {
    use chrono::{DateTime, Local, NaiveDateTime};

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(
            dt.with_timezone(&Local)
                .format(LAST_UPDATED_FORMAT)
                .to_string(),
        );
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|dt| dt.format(LAST_UPDATED_FORMAT).to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn naive_timestamp_formats_as_is() {
        assert_eq!(
            format_last_updated("2026-08-07T14:30:05").as_deref(),
            Some("2026-08-07 14:30:05")
        );
        assert_eq!(
            format_last_updated("2026-08-07T14:30:05.123456").as_deref(),
            Some("2026-08-07 14:30:05")
        );
    }

    #[test]
    fn garbage_timestamp_yields_none() {
        assert!(format_last_updated("five minutes ago").is_none());
        assert!(format_last_updated("").is_none());
    }

    #[test]
    fn offset_timestamp_parses() {
        // The exact rendering depends on the local timezone; parsing must
        // succeed either way.
        assert!(format_last_updated("2026-08-07T14:30:05+02:00").is_some());
    }
}
