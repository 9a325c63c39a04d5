//! Trend aggregation over the load history.
//!
//! Groups history entries by day and tracks how the finding counters move,
//! so `refdash history` can answer "is the cleanup actually converging?"

use std::collections::HashMap;

use crate::history::{self, LoadLogEntry};

// ---------------------------------------------------------------------------
// Daily trend
// ---------------------------------------------------------------------------

/// Aggregated load activity for one calendar day.
#[derive(Debug, Clone)]
pub struct DailyTrend {
    /// Day in `YYYY-MM-DD` form.
    pub date: String,
    /// Load cycles recorded that day.
    pub cycles: usize,
    /// Cycles that failed.
    pub failures: usize,
    /// Mean duration across the day's cycles.
    pub avg_duration_ms: u64,
    /// Total findings reported by the day's last successful cycle.
    pub total_findings: Option<u64>,
    /// Change in total findings versus the previous day with data.
    pub findings_delta: Option<i64>,
}

// ---------------------------------------------------------------------------
// Trend computation
// ---------------------------------------------------------------------------

/// Compute daily trend data over the last `days` days.
pub fn compute_trends(days: u32) -> Vec<DailyTrend> {
    let entries = history::read_entries_since_days(Some(days));
    build_trends(&entries)
}

/// Group entries by date and derive per-day aggregates plus day-over-day
/// finding deltas.
fn build_trends(entries: &[LoadLogEntry]) -> Vec<DailyTrend> {
    let mut daily: HashMap<String, Vec<&LoadLogEntry>> = HashMap::new();
    for entry in entries {
        // Date from the RFC 3339 timestamp — first 10 chars (YYYY-MM-DD).
        let date = entry.timestamp.get(..10).unwrap_or("unknown").to_string();
        daily.entry(date).or_default().push(entry);
    }

    let mut trends: Vec<DailyTrend> = daily
        .into_iter()
        .map(|(date, group)| {
            let cycles = group.len();
            let failures = group.iter().filter(|e| !e.success).count();
            let avg_duration_ms = if cycles == 0 {
                0
            } else {
                group.iter().map(|e| e.duration_ms).sum::<u64>() / cycles as u64
            };

            // The day's last cycle that actually fetched counters.
            let total_findings = group
                .iter()
                .rev()
                .find_map(|e| e.statistics.map(|s| s.total_findings));

            DailyTrend {
                date,
                cycles,
                failures,
                avg_duration_ms,
                total_findings,
                findings_delta: None,
            }
        })
        .collect();

    // Sort by date ascending, then fill deltas against the previous day
    // that had counter data.
    trends.sort_by(|a, b| a.date.cmp(&b.date));

    let mut previous: Option<u64> = None;
    for trend in &mut trends {
        if let Some(current) = trend.total_findings {
            trend.findings_delta = previous.map(|prev| current as i64 - prev as i64);
            previous = Some(current);
        }
    }

    trends
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
