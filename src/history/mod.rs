//! Load-cycle history (JSONL).
//!
//! Every completed load or refresh cycle appends one line to
//! `~/.refdash/load-history.jsonl`: when it ran, what triggered it, whether
//! it succeeded, how long it took, and the overview counters it fetched.
//! The report module aggregates these into per-day trends for
//! `refdash history`.

pub mod report;

use std::fmt;
use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::api::models::OverviewStatistics;

// ---------------------------------------------------------------------------
// Load log entry
// ---------------------------------------------------------------------------

/// What set a load cycle in motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadTrigger {
    /// First load of an invocation.
    Initial,
    /// Watch-mode timer tick.
    Scheduled,
    /// `refdash show` run by hand.
    Manual,
    /// The mutating refresh action.
    Refresh,
}

impl fmt::Display for LoadTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Initial => write!(f, "initial"),
            Self::Scheduled => write!(f, "scheduled"),
            Self::Manual => write!(f, "manual"),
            Self::Refresh => write!(f, "refresh"),
        }
    }
}

/// A single entry in the load history log.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadLogEntry {
    pub timestamp: String,
    /// Trigger name: `initial`, `scheduled`, `manual`, or `refresh`.
    pub trigger: String,
    pub success: bool,
    pub duration_ms: u64,
    /// Overview counters fetched by this cycle; absent for failed cycles
    /// (a partial cycle may hold counters from an earlier load, which would
    /// misdate the trend).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub statistics: Option<OverviewStatistics>,
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Record the result of one load cycle.
///
/// Best-effort: a history write failure never disturbs the dashboard.
pub fn log_load_result(
    trigger: LoadTrigger,
    success: bool,
    duration_ms: u64,
    statistics: Option<OverviewStatistics>,
) {
    let entry = LoadLogEntry {
        timestamp: Utc::now().to_rfc3339(),
        trigger: trigger.to_string(),
        success,
        duration_ms,
        statistics,
    };

    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all history entries from `~/.refdash/load-history.jsonl`.
///
/// Silently skips malformed lines. Returns an empty vec if the file does
/// not exist or cannot be read.
pub fn read_all_entries() -> Vec<LoadLogEntry> {
    let Some(path) = history_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    let reader = BufReader::new(file);
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<LoadLogEntry>(&line).ok())
        .collect()
}

/// Read history entries filtered to a time window (last N days).
///
/// If `days` is `None`, returns all entries.
pub fn read_entries_since_days(days: Option<u32>) -> Vec<LoadLogEntry> {
    let entries = read_all_entries();

    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &LoadLogEntry) -> Result<()> {
    let Some(path) = history_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the history log file.
pub fn history_log_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".refdash").join("load-history.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
