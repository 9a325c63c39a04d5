//! Snapshot view: accumulates one load cycle into a serializable value.
//!
//! Backs `refdash show --format json`, where the dashboard is a data export
//! for scripting rather than a screen. The same controller drives it —
//! the snapshot is whatever the view methods received, nothing more.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::api::models::{MagicNumberRecord, RawPointerRecord};
use crate::dashboard::charts::{BarChart, DonutChart};
use crate::dashboard::transform::{FileStatRow, FindingRow};
use crate::dashboard::{DashboardView, OverviewSnapshot};

/// Everything one load cycle rendered, as plain data.
#[derive(Debug, Default, Serialize)]
pub struct DashboardSnapshot {
    pub overview: Option<OverviewSnapshot>,
    pub severity_chart: Option<DonutChart>,
    pub function_status_chart: Option<BarChart>,
    pub findings: Vec<FindingRow>,
    pub magic_numbers: Vec<MagicNumberRecord>,
    pub file_stats: Vec<FileStatRow>,
    pub raw_pointer_severity_chart: Option<DonutChart>,
    pub raw_pointer_pattern_chart: Option<BarChart>,
    pub dangerous_pointers: Vec<RawPointerRecord>,
    /// Error notifications raised during the cycle.
    pub errors: Vec<String>,
}

/// [`DashboardView`] that records instead of printing.
#[derive(Debug, Default)]
pub struct SnapshotView {
    snapshot: DashboardSnapshot,
}

impl SnapshotView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> &DashboardSnapshot {
        &self.snapshot
    }

    /// Serialize the accumulated snapshot as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.snapshot).context("failed to serialize snapshot")
    }
}

impl DashboardView for SnapshotView {
    fn set_loading(&mut self, _loading: bool) {}

    fn show_overview(&mut self, overview: &OverviewSnapshot) {
        self.snapshot.overview = Some(overview.clone());
    }

    fn render_severity_chart(&mut self, chart: &DonutChart) {
        self.snapshot.severity_chart = Some(chart.clone());
    }

    fn render_function_chart(&mut self, chart: &BarChart) {
        self.snapshot.function_status_chart = Some(chart.clone());
    }

    fn render_findings_table(&mut self, rows: &[FindingRow]) {
        self.snapshot.findings = rows.to_vec();
    }

    fn render_magic_table(&mut self, rows: &[MagicNumberRecord]) {
        self.snapshot.magic_numbers = rows.to_vec();
    }

    fn render_file_stats_table(&mut self, rows: &[FileStatRow]) {
        self.snapshot.file_stats = rows.to_vec();
    }

    fn render_pointer_severity_chart(&mut self, chart: &DonutChart) {
        self.snapshot.raw_pointer_severity_chart = Some(chart.clone());
    }

    fn render_pointer_pattern_chart(&mut self, chart: &BarChart) {
        self.snapshot.raw_pointer_pattern_chart = Some(chart.clone());
    }

    fn render_pointer_table(&mut self, rows: &[RawPointerRecord]) {
        self.snapshot.dangerous_pointers = rows.to_vec();
    }

    fn show_error(&mut self, message: &str) {
        self.snapshot.errors.push(message.to_string());
    }

    fn show_success(&mut self, _message: &str) {}
}
