//! Integration tests for the dashboard controller.
//!
//! Unit tests for the pure transforms live in each module's `#[cfg(test)]`
//! block. These tests exercise the orchestration itself — stage order,
//! abort-on-failure, raw-pointer isolation, guard cleanup — with a
//! scripted API and a recording view, no network or terminal involved.

use std::cell::RefCell;

use anyhow::Result;

use refdash::api::AnalysisApi;
use refdash::api::models::{
    FileStats, FileStatsReport, Finding, FindingsReport, FunctionRecord, MagicNumberRecord,
    Overview, OverviewStatistics, RawPointerRecord, RawPointerReport, RefreshOutcome,
};
use refdash::dashboard::charts::{BarChart, DonutChart};
use refdash::dashboard::transform::{FileStatRow, FindingRow};
use refdash::dashboard::{
    DashboardController, DashboardView, LOAD_ERROR_MESSAGE, LoadOutcome, OverviewSnapshot,
    REFRESH_ERROR_MESSAGE,
};

// ---------------------------------------------------------------------------
// Scripted API
// ---------------------------------------------------------------------------

/// Analysis API double: serves canned data, records the call sequence, and
/// fails on demand per endpoint.
#[derive(Default)]
struct ScriptedApi {
    calls: RefCell<Vec<&'static str>>,
    overview_fails: bool,
    functions_fail: bool,
    raw_pointers_fail: bool,
    refresh_fails: bool,
    statistics: OverviewStatistics,
    findings: Vec<(String, Vec<Finding>)>,
    by_severity: Vec<(String, u64)>,
    functions: Vec<FunctionRecord>,
    magic: Vec<MagicNumberRecord>,
    file_stats: Vec<(String, FileStats)>,
    pointers: Vec<RawPointerRecord>,
}

impl ScriptedApi {
    fn calls(&self) -> Vec<&'static str> {
        self.calls.borrow().clone()
    }
}

fn finding(severity: &str, title: &str) -> Finding {
    Finding {
        title: title.to_string(),
        severity: severity.to_string(),
        file: "Game.cpp".to_string(),
        line: 7,
        ..Default::default()
    }
}

impl AnalysisApi for ScriptedApi {
    fn fetch_overview(&self) -> Result<Overview> {
        self.calls.borrow_mut().push("overview");
        if self.overview_fails {
            anyhow::bail!("connection refused");
        }
        Ok(Overview {
            project_name: Some("clanbomber".to_string()),
            last_updated: Some("2026-08-07T10:00:00".to_string()),
            statistics: self.statistics,
        })
    }

    fn fetch_findings(&self) -> Result<FindingsReport> {
        self.calls.borrow_mut().push("findings");
        Ok(FindingsReport {
            by_severity: self.by_severity.clone(),
            by_type: self.findings.clone(),
        })
    }

    fn fetch_functions(&self) -> Result<Vec<FunctionRecord>> {
        self.calls.borrow_mut().push("functions");
        if self.functions_fail {
            anyhow::bail!("connection reset");
        }
        Ok(self.functions.clone())
    }

    fn fetch_magic_numbers(&self) -> Result<Vec<MagicNumberRecord>> {
        self.calls.borrow_mut().push("magic-numbers");
        Ok(self.magic.clone())
    }

    fn fetch_file_stats(&self) -> Result<FileStatsReport> {
        self.calls.borrow_mut().push("file-stats");
        Ok(FileStatsReport(self.file_stats.clone()))
    }

    fn fetch_raw_pointers(&self) -> Result<RawPointerReport> {
        self.calls.borrow_mut().push("raw-pointers");
        if self.raw_pointers_fail {
            anyhow::bail!("analysis service error: raw pointer pass crashed");
        }
        Ok(RawPointerReport {
            severity_breakdown: vec![("high".to_string(), 2)],
            pattern_breakdown: vec![("owning".to_string(), 2)],
            dangerous_pointers: self.pointers.clone(),
        })
    }

    fn trigger_refresh(&self) -> Result<RefreshOutcome> {
        self.calls.borrow_mut().push("refresh");
        if self.refresh_fails {
            anyhow::bail!("analysis service error: Failed to run analysis");
        }
        Ok(RefreshOutcome {
            status: Some("success".to_string()),
            timestamp: Some("2026-08-07T10:05:00".to_string()),
            functions_analyzed: Some(812),
        })
    }
}

// ---------------------------------------------------------------------------
// Recording view
// ---------------------------------------------------------------------------

/// View double: remembers everything it was asked to render.
#[derive(Default)]
struct RecordingView {
    loading: Vec<bool>,
    overview: Option<OverviewSnapshot>,
    severity_chart_renders: usize,
    function_chart: Option<BarChart>,
    findings_rows: Vec<FindingRow>,
    magic_rows: usize,
    file_stat_rows: Vec<FileStatRow>,
    pointer_chart_renders: usize,
    pointer_rows: usize,
    errors: Vec<String>,
    successes: Vec<String>,
}

impl DashboardView for RecordingView {
    fn set_loading(&mut self, loading: bool) {
        self.loading.push(loading);
    }

    fn show_overview(&mut self, overview: &OverviewSnapshot) {
        self.overview = Some(overview.clone());
    }

    fn render_severity_chart(&mut self, _chart: &DonutChart) {
        self.severity_chart_renders += 1;
    }

    fn render_function_chart(&mut self, chart: &BarChart) {
        self.function_chart = Some(chart.clone());
    }

    fn render_findings_table(&mut self, rows: &[FindingRow]) {
        self.findings_rows = rows.to_vec();
    }

    fn render_magic_table(&mut self, rows: &[MagicNumberRecord]) {
        self.magic_rows = rows.len();
    }

    fn render_file_stats_table(&mut self, rows: &[FileStatRow]) {
        self.file_stat_rows = rows.to_vec();
    }

    fn render_pointer_severity_chart(&mut self, _chart: &DonutChart) {
        self.pointer_chart_renders += 1;
    }

    fn render_pointer_pattern_chart(&mut self, _chart: &BarChart) {
        self.pointer_chart_renders += 1;
    }

    fn render_pointer_table(&mut self, rows: &[RawPointerRecord]) {
        self.pointer_rows = rows.len();
    }

    fn show_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn show_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }
}

fn controller(api: ScriptedApi) -> DashboardController<ScriptedApi, RecordingView> {
    DashboardController::new(api, RecordingView::default())
}

// ---------------------------------------------------------------------------
// Load sequencing
// ---------------------------------------------------------------------------

#[test]
fn stages_run_in_fixed_order() {
    let mut ctl = controller(ScriptedApi::default());
    let report = ctl.load_dashboard();

    assert_eq!(report.outcome, LoadOutcome::Completed);
    // Overview → charts (findings, functions, nested raw pointers) →
    // tables (findings again, magic numbers) → file stats.
    assert_eq!(
        ctl.api().calls(),
        vec![
            "overview",
            "findings",
            "functions",
            "raw-pointers",
            "findings",
            "magic-numbers",
            "file-stats",
        ]
    );
}

#[test]
fn overview_failure_aborts_remaining_stages() {
    let api = ScriptedApi {
        overview_fails: true,
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    let report = ctl.load_dashboard();

    assert_eq!(report.outcome, LoadOutcome::Failed);
    assert_eq!(ctl.api().calls(), vec!["overview"]);

    let view = ctl.view();
    // Counters stay untouched and exactly one generic error is raised.
    assert!(view.overview.is_none());
    assert_eq!(view.severity_chart_renders, 0);
    assert!(view.file_stat_rows.is_empty());
    assert_eq!(view.errors, vec![LOAD_ERROR_MESSAGE.to_string()]);

    // Guard and loading indication are released on the failure path too.
    assert!(!ctl.is_busy());
    assert_eq!(view.loading, vec![true, false]);
}

#[test]
fn mid_cycle_failure_keeps_earlier_sections() {
    let api = ScriptedApi {
        functions_fail: true,
        statistics: OverviewStatistics {
            total_findings: 3,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    let report = ctl.load_dashboard();

    assert_eq!(report.outcome, LoadOutcome::Failed);
    let view = ctl.view();
    // The overview rendered before the failing stage and stays rendered.
    assert!(view.overview.is_some());
    // Nothing after the failure point ran.
    assert!(view.findings_rows.is_empty());
    assert!(view.file_stat_rows.is_empty());
    assert_eq!(view.errors, vec![LOAD_ERROR_MESSAGE.to_string()]);
    assert!(!ctl.is_busy());
}

// ---------------------------------------------------------------------------
// Raw-pointer isolation
// ---------------------------------------------------------------------------

#[test]
fn raw_pointer_failure_does_not_fail_the_cycle() {
    let api = ScriptedApi {
        raw_pointers_fail: true,
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    let report = ctl.load_dashboard();

    assert_eq!(report.outcome, LoadOutcome::Completed);

    let view = ctl.view();
    assert!(view.errors.is_empty());
    // The raw-pointer section is simply absent...
    assert_eq!(view.pointer_chart_renders, 0);
    assert_eq!(view.pointer_rows, 0);
    // ...while the stages after it still ran.
    assert_eq!(view.severity_chart_renders, 1);
    let calls = ctl.api().calls();
    assert!(calls.contains(&"magic-numbers"));
    assert!(calls.contains(&"file-stats"));
}

#[test]
fn raw_pointer_success_renders_both_charts_and_table() {
    let api = ScriptedApi {
        pointers: vec![RawPointerRecord {
            variable_name: "bomber".to_string(),
            danger_level: "CRITICAL".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();

    let view = ctl.view();
    assert_eq!(view.pointer_chart_renders, 2);
    assert_eq!(view.pointer_rows, 1);
}

// ---------------------------------------------------------------------------
// Table shaping through the full pipeline
// ---------------------------------------------------------------------------

#[test]
fn findings_render_in_severity_order() {
    let api = ScriptedApi {
        findings: vec![(
            "functions".to_string(),
            vec![
                finding("low", "a"),
                finding("critical", "b"),
                finding("high", "c"),
            ],
        )],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();

    let severities: Vec<&str> = ctl
        .view()
        .findings_rows
        .iter()
        .map(|r| r.severity.as_str())
        .collect();
    assert_eq!(severities, vec!["critical", "high", "low"]);
}

#[test]
fn function_chart_counts_recognized_statuses_only() {
    let status = |s: &str| FunctionRecord {
        status: s.to_string(),
        ..Default::default()
    };
    let api = ScriptedApi {
        functions: vec![
            status("used"),
            status("used"),
            status("unused"),
            status("needs_manual_check"),
        ],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();

    let chart = ctl.view().function_chart.as_ref().expect("chart rendered");
    let values: Vec<u64> = chart.bars.iter().map(|b| b.value).collect();
    assert_eq!(values, vec![2, 1, 0]);
    // The unrecognized record lands in no bucket.
    assert_eq!(values.iter().sum::<u64>(), 3);
}

#[test]
fn findings_table_caps_at_twenty() {
    let many: Vec<Finding> = (0..25).map(|i| finding("medium", &format!("f{i}"))).collect();
    let api = ScriptedApi {
        findings: vec![("functions".to_string(), many)],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();
    assert_eq!(ctl.view().findings_rows.len(), 20);
}

#[test]
fn magic_table_caps_at_fifteen() {
    let api = ScriptedApi {
        magic: (0..40)
            .map(|i| MagicNumberRecord {
                value: i,
                ..Default::default()
            })
            .collect(),
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();
    assert_eq!(ctl.view().magic_rows, 15);
}

#[test]
fn file_stats_render_worst_first() {
    let api = ScriptedApi {
        file_stats: vec![
            (
                "a.cpp".to_string(),
                FileStats {
                    unused_functions: 2,
                    magic_numbers: 3,
                    ..Default::default()
                },
            ),
            (
                "b.cpp".to_string(),
                FileStats {
                    unused_functions: 4,
                    findings: 5,
                    ..Default::default()
                },
            ),
        ],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();

    let names: Vec<&str> = ctl
        .view()
        .file_stat_rows
        .iter()
        .map(|r| r.filename.as_str())
        .collect();
    assert_eq!(names, vec!["b.cpp", "a.cpp"]);
}

// ---------------------------------------------------------------------------
// Chart slots across reloads
// ---------------------------------------------------------------------------

#[test]
fn reload_replaces_chart_instances() {
    let api = ScriptedApi {
        by_severity: vec![("critical".to_string(), 1)],
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());

    ctl.load_dashboard();
    ctl.load_dashboard();

    // Two render passes happened, but the slot holds exactly one chart.
    assert_eq!(ctl.view().severity_chart_renders, 2);
    let chart = ctl.severity_chart().expect("chart installed");
    assert_eq!(chart.slices.len(), 1);
}

// ---------------------------------------------------------------------------
// Refresh action
// ---------------------------------------------------------------------------

#[test]
fn refresh_triggers_then_reloads_then_announces() {
    let api = ScriptedApi::default();
    let mut ctl = DashboardController::new(api, RecordingView::default());
    let report = ctl.refresh_analysis();

    assert_eq!(report.outcome, LoadOutcome::Completed);
    let calls = ctl.api().calls();
    assert_eq!(calls[0], "refresh");
    assert!(calls.contains(&"overview"));
    assert!(calls.contains(&"file-stats"));

    assert_eq!(
        ctl.view().successes,
        vec!["Analysis refreshed — 812 functions analyzed".to_string()]
    );
    assert!(!ctl.is_busy());
}

#[test]
fn refresh_failure_is_generic_and_releases_guard() {
    let api = ScriptedApi {
        refresh_fails: true,
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    let report = ctl.refresh_analysis();

    assert_eq!(report.outcome, LoadOutcome::Failed);
    // The refresh endpoint failed before any reload stage ran.
    assert_eq!(ctl.api().calls(), vec!["refresh"]);
    assert_eq!(ctl.view().errors, vec![REFRESH_ERROR_MESSAGE.to_string()]);
    assert!(ctl.view().successes.is_empty());
    assert!(!ctl.is_busy());
}

// ---------------------------------------------------------------------------
// Overview snapshot details
// ---------------------------------------------------------------------------

#[test]
fn overview_carries_project_and_local_timestamp() {
    let api = ScriptedApi {
        statistics: OverviewStatistics {
            total_files: 104,
            total_findings: 292,
            ..Default::default()
        },
        ..Default::default()
    };
    let mut ctl = DashboardController::new(api, RecordingView::default());
    ctl.load_dashboard();

    let overview = ctl.view().overview.as_ref().expect("overview rendered");
    assert_eq!(overview.project_name.as_deref(), Some("clanbomber"));
    assert_eq!(overview.statistics.total_files, 104);
    assert_eq!(overview.last_updated.as_deref(), Some("2026-08-07 10:00:00"));

    assert_eq!(
        ctl.last_statistics().map(|s| s.total_findings),
        Some(292)
    );
}
