//! Pure data shaping between API responses and the render surface.
//!
//! Everything here is I/O-free and deterministic: flatten, count, sort,
//! cap. The controller calls these; the tests hit them directly.

use serde::Serialize;

use crate::api::models::{FileStats, FileStatsReport, Finding, FunctionRecord, severity_rank};

/// Row cap for the findings table.
pub const MAX_FINDING_ROWS: usize = 20;
/// Row cap for the magic-numbers table.
pub const MAX_MAGIC_ROWS: usize = 15;

// ---------------------------------------------------------------------------
// Findings table
// ---------------------------------------------------------------------------

/// One row of the findings table: a finding with its grouping type attached.
#[derive(Debug, Clone, Serialize)]
pub struct FindingRow {
    pub finding_type: String,
    pub severity: String,
    pub title: String,
    pub file: String,
    pub line: u64,
}

/// Flatten the type→findings mapping into table rows.
///
/// Each finding gets its group's type key attached, the combined list is
/// stable-sorted ascending by severity rank (ties keep their relative
/// order), and the result is capped at [`MAX_FINDING_ROWS`].
pub fn flatten_findings(by_type: &[(String, Vec<Finding>)]) -> Vec<FindingRow> {
    let mut rows: Vec<FindingRow> = Vec::new();
    for (finding_type, findings) in by_type {
        for finding in findings {
            rows.push(FindingRow {
                finding_type: finding_type.clone(),
                severity: finding.severity.clone(),
                title: finding.title.clone(),
                file: finding.file.clone(),
                line: finding.line,
            });
        }
    }

    // Vec::sort_by_key is stable, which the tie-order guarantee relies on.
    rows.sort_by_key(|row| severity_rank(&row.severity));
    rows.truncate(MAX_FINDING_ROWS);
    rows
}

// ---------------------------------------------------------------------------
// Function status buckets
// ---------------------------------------------------------------------------

/// Counts of function records per recognized status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub used: u64,
    pub unused: u64,
    pub uncertain: u64,
}

impl StatusCounts {
    /// Total across the three buckets.
    pub fn total(&self) -> u64 {
        self.used + self.unused + self.uncertain
    }
}

/// Bucket function records by status.
///
/// Only the three recognized literals count; records with any other status
/// (`needs_manual_check`, typos, future values) are silently dropped from
/// all buckets.
pub fn count_statuses(records: &[FunctionRecord]) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for record in records {
        match record.status.as_str() {
            "used" => counts.used += 1,
            "unused" => counts.unused += 1,
            "uncertain" => counts.uncertain += 1,
            _ => {}
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// File statistics table
// ---------------------------------------------------------------------------

/// One row of the per-file statistics table.
#[derive(Debug, Clone, Serialize)]
pub struct FileStatRow {
    pub filename: String,
    #[serde(flatten)]
    pub stats: FileStats,
    pub issue_total: u64,
}

/// Order file statistics for display: descending by issue total.
///
/// The sort is stable, so files with equal totals keep the order the
/// service sent them in.
pub fn order_file_stats(report: FileStatsReport) -> Vec<FileStatRow> {
    let mut rows: Vec<FileStatRow> = report
        .0
        .into_iter()
        .map(|(filename, stats)| FileStatRow {
            issue_total: stats.issue_total(),
            filename,
            stats,
        })
        .collect();

    rows.sort_by(|a, b| b.issue_total.cmp(&a.issue_total));
    rows
}

// ---------------------------------------------------------------------------
// Label helpers
// ---------------------------------------------------------------------------

/// Upper-case the first character, leave the rest unchanged.
///
/// Chart labels arrive as lowercase keys (`critical`, `used`); display wants
/// `Critical`, `Used`. Multi-byte first characters are handled per char, not
/// per byte.
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
