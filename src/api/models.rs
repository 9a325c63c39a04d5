//! Wire types for the analysis service JSON API.
//!
//! Every type maps one-to-one onto a response body documented in the
//! service's endpoint table. Mappings whose key order matters downstream
//! (severity breakdowns, findings-by-type, per-file statistics) are
//! deserialized into `Vec<(String, _)>` so the service's key order survives
//! the trip — a plain `HashMap` would shuffle it and `BTreeMap` would
//! re-sort it.

use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Severity ordering
// ---------------------------------------------------------------------------

/// Ordinal rank of a severity string: critical=0, high=1, medium=2, low=3.
///
/// Anything unrecognized ranks last (99) so that malformed or future
/// severities sink to the bottom of sorted views instead of breaking them.
pub fn severity_rank(severity: &str) -> u8 {
    match severity {
        "critical" => 0,
        "high" => 1,
        "medium" => 2,
        "low" => 3,
        _ => 99,
    }
}

// ---------------------------------------------------------------------------
// /api/analysis/overview
// ---------------------------------------------------------------------------

/// Response body of `GET /api/analysis/overview`.
#[derive(Debug, Clone, Deserialize)]
pub struct Overview {
    #[serde(default)]
    pub project_name: Option<String>,
    /// RFC 3339 (or naive ISO) timestamp of the last completed analysis.
    #[serde(default)]
    pub last_updated: Option<String>,
    pub statistics: OverviewStatistics,
}

/// The counters block inside the overview response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverviewStatistics {
    pub total_files: u64,
    pub total_functions: u64,
    pub unused_functions: u64,
    pub magic_numbers: u64,
    pub commented_blocks: u64,
    /// Absent from services that predate the raw-pointer analyzer.
    pub raw_pointers: u64,
    pub total_findings: u64,
}

// ---------------------------------------------------------------------------
// /api/analysis/findings
// ---------------------------------------------------------------------------

/// Response body of `GET /api/analysis/findings`.
///
/// `by_severity` feeds the severity donut; `by_type` feeds the findings
/// table after flattening.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FindingsReport {
    #[serde(deserialize_with = "ordered_entries")]
    pub by_severity: Vec<(String, u64)>,
    #[serde(deserialize_with = "ordered_entries")]
    pub by_type: Vec<(String, Vec<Finding>)>,
}

/// A single static-analysis finding.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Finding {
    pub title: String,
    pub description: Option<String>,
    pub severity: String,
    pub file: String,
    pub line: u64,
    pub suggestions: Vec<String>,
}

// ---------------------------------------------------------------------------
// /api/analysis/functions
// ---------------------------------------------------------------------------

/// One entry of the `GET /api/analysis/functions` array.
///
/// The dashboard buckets these by `status`; the remaining fields document
/// the record as the service reports it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FunctionRecord {
    pub name: String,
    pub file: String,
    pub line: u64,
    pub class_name: Option<String>,
    /// `used`, `unused`, `uncertain`, or an analyzer-specific value such as
    /// `needs_manual_check` (dropped from the status buckets).
    pub status: String,
    pub confidence: f64,
    pub calls_to_count: u64,
    pub called_from_count: u64,
    pub is_static: bool,
    pub is_virtual: bool,
}

// ---------------------------------------------------------------------------
// /api/analysis/magic-numbers
// ---------------------------------------------------------------------------

/// One entry of the `GET /api/analysis/magic-numbers` array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MagicNumberRecord {
    pub value: i64,
    pub file: String,
    pub line: u64,
    /// Source line the literal was found on, truncated server-side.
    pub context: Option<String>,
    pub suggested_constant: Option<String>,
    /// Rough domain bucket assigned by the analyzer (`ui`, `game_logic`, ...).
    pub category: Option<String>,
    pub usage_count: Option<u64>,
}

// ---------------------------------------------------------------------------
// /api/analysis/file-stats
// ---------------------------------------------------------------------------

/// Response body of `GET /api/analysis/file-stats`: a filename-keyed map in
/// service order.
#[derive(Debug, Clone, Default)]
pub struct FileStatsReport(pub Vec<(String, FileStats)>);

impl<'de> Deserialize<'de> for FileStatsReport {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        ordered_entries(deserializer).map(FileStatsReport)
    }
}

/// Issue counters for a single source file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStats {
    pub functions: u64,
    pub unused_functions: u64,
    pub magic_numbers: u64,
    pub commented_blocks: u64,
    pub findings: u64,
}

impl FileStats {
    /// Sum of the four issue counters — the file-stats table sort key.
    /// The plain function count is informational and not an issue.
    pub fn issue_total(&self) -> u64 {
        self.unused_functions + self.magic_numbers + self.commented_blocks + self.findings
    }
}

// ---------------------------------------------------------------------------
// /api/analysis/raw-pointers
// ---------------------------------------------------------------------------

/// Response body of `GET /api/analysis/raw-pointers`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawPointerReport {
    #[serde(deserialize_with = "ordered_entries")]
    pub severity_breakdown: Vec<(String, u64)>,
    #[serde(deserialize_with = "ordered_entries")]
    pub pattern_breakdown: Vec<(String, u64)>,
    pub dangerous_pointers: Vec<RawPointerRecord>,
}

/// A flagged raw-pointer usage site.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawPointerRecord {
    pub variable_name: String,
    pub type_name: String,
    pub pattern_type: String,
    /// Severity-like risk rank; case varies between analyzer versions, so
    /// style lookups lowercase it first.
    pub danger_level: String,
    pub file: String,
    pub line: u64,
    pub suggested_fix: String,
    pub context: String,
}

// ---------------------------------------------------------------------------
// /api/analysis/refresh
// ---------------------------------------------------------------------------

/// Response body of `GET /api/analysis/refresh`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RefreshOutcome {
    pub status: Option<String>,
    pub timestamp: Option<String>,
    pub functions_analyzed: Option<u64>,
}

// ---------------------------------------------------------------------------
// Order-preserving map deserialization
// ---------------------------------------------------------------------------

/// Deserialize a JSON object into a `Vec<(String, T)>`, keeping the key
/// order exactly as it appears on the wire.
fn ordered_entries<'de, D, T>(deserializer: D) -> Result<Vec<(String, T)>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    struct EntriesVisitor<T>(PhantomData<T>);

    impl<'de, T: Deserialize<'de>> Visitor<'de> for EntriesVisitor<T> {
        type Value = Vec<(String, T)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a JSON object")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, T>()? {
                entries.push((key, value));
            }
            Ok(entries)
        }
    }

    deserializer.deserialize_map(EntriesVisitor(PhantomData))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
