//! Chart view-models and the fixed dashboard palette.
//!
//! Charts are plain values: the controller builds them from API data, parks
//! them in a [`ChartSlot`], and hands a reference to the view. How a donut
//! or bar chart actually looks is entirely the view's business.

use serde::Serialize;

use super::transform::{StatusCounts, capitalize_first};

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

/// An RGB chart color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ChartColor {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `#rrggbb` form, for JSON snapshots and debugging.
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Severity critical.
pub const RED: ChartColor = ChartColor::new(0xdc, 0x35, 0x45);
/// Severity high.
pub const ORANGE: ChartColor = ChartColor::new(0xfd, 0x7e, 0x14);
/// Severity medium / status uncertain.
pub const AMBER: ChartColor = ChartColor::new(0xff, 0xc1, 0x07);
/// Severity low / status used.
pub const GREEN: ChartColor = ChartColor::new(0x28, 0xa7, 0x45);
/// Fallback for unrecognized severity keys.
pub const GRAY: ChartColor = ChartColor::new(0x6c, 0x75, 0x7d);
/// Single-series bars (raw-pointer patterns).
pub const BLUE: ChartColor = ChartColor::new(0x00, 0x7b, 0xff);

/// Fixed color for a severity key; unrecognized keys get the neutral gray.
pub fn severity_color(severity: &str) -> ChartColor {
    match severity {
        "critical" => RED,
        "high" => ORANGE,
        "medium" => AMBER,
        "low" => GREEN,
        _ => GRAY,
    }
}

/// Fixed color for a function status bucket.
pub fn status_color(status: &str) -> ChartColor {
    match status {
        "used" => GREEN,
        "unused" => RED,
        _ => AMBER,
    }
}

// ---------------------------------------------------------------------------
// Chart view-models
// ---------------------------------------------------------------------------

/// One slice of a donut chart.
#[derive(Debug, Clone, Serialize)]
pub struct Slice {
    pub label: String,
    pub value: u64,
    pub color: ChartColor,
}

/// A donut chart: one slice per category.
#[derive(Debug, Clone, Serialize)]
pub struct DonutChart {
    pub slices: Vec<Slice>,
}

impl DonutChart {
    /// Sum of all slice values.
    pub fn total(&self) -> u64 {
        self.slices.iter().map(|s| s.value).sum()
    }
}

/// One bar of a bar chart.
#[derive(Debug, Clone, Serialize)]
pub struct Bar {
    pub label: String,
    pub value: u64,
    pub color: ChartColor,
}

/// A bar chart. Views render it against a zero-based axis with integer
/// steps — a bar's visual length is proportional to its value, never to an
/// offset-from-minimum.
#[derive(Debug, Clone, Serialize)]
pub struct BarChart {
    pub bars: Vec<Bar>,
}

impl BarChart {
    /// Largest bar value, or 0 for an empty chart.
    pub fn max_value(&self) -> u64 {
        self.bars.iter().map(|b| b.value).max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Builders
// ---------------------------------------------------------------------------

/// Donut over a severity→count mapping, in mapping order, with capitalized
/// labels and the fixed severity palette.
pub fn severity_donut(by_severity: &[(String, u64)]) -> DonutChart {
    DonutChart {
        slices: by_severity
            .iter()
            .map(|(severity, count)| Slice {
                label: capitalize_first(severity),
                value: *count,
                color: severity_color(severity),
            })
            .collect(),
    }
}

/// Bar chart of the three function-status buckets, fixed order and colors.
pub fn function_status_bars(counts: &StatusCounts) -> BarChart {
    let buckets = [
        ("used", counts.used),
        ("unused", counts.unused),
        ("uncertain", counts.uncertain),
    ];

    BarChart {
        bars: buckets
            .into_iter()
            .map(|(status, value)| Bar {
                label: capitalize_first(status),
                value,
                color: status_color(status),
            })
            .collect(),
    }
}

/// Single-color bar chart over a pattern→count mapping, in mapping order.
pub fn pattern_bars(pattern_breakdown: &[(String, u64)]) -> BarChart {
    BarChart {
        bars: pattern_breakdown
            .iter()
            .map(|(pattern, count)| Bar {
                label: capitalize_first(pattern),
                value: *count,
                color: BLUE,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Chart slots
// ---------------------------------------------------------------------------

/// Holder for the live chart of one dashboard slot.
///
/// A slot owns at most one chart. Storing a new chart drops the previous
/// one first, so two live instances can never coexist for the same slot.
#[derive(Debug, Default)]
pub struct ChartSlot<T> {
    current: Option<T>,
}

impl<T> ChartSlot<T> {
    pub fn new() -> Self {
        Self { current: None }
    }

    /// Replace the slot's chart, dropping any previous instance, and return
    /// a reference to the newly installed one.
    pub fn replace(&mut self, chart: T) -> &T {
        &*self.current.insert(chart)
    }

    /// The currently installed chart, if any.
    pub fn current(&self) -> Option<&T> {
        self.current.as_ref()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
