//! Terminal chart drawing.
//!
//! Turns the dashboard's chart view-models into colored text lines. Donuts
//! become a legend with proportional glyph bars; bar charts become
//! horizontal bars scaled against a zero baseline (a bar twice the value is
//! twice the length, and zero is zero glyphs — never an offset axis).

use colored::Colorize;

use crate::dashboard::charts::{BarChart, ChartColor, DonutChart};

/// Glyph-bar width for a full-scale value.
const BAR_WIDTH: usize = 28;

/// Render a donut chart as legend lines: swatch, label, value, share, bar.
pub fn donut_lines(chart: &DonutChart) -> Vec<String> {
    let total = chart.total();

    chart
        .slices
        .iter()
        .map(|slice| {
            let pct = if total == 0 {
                0.0
            } else {
                (slice.value as f64 / total as f64) * 100.0
            };
            let bar = glyph_bar(pct / 100.0, slice.value > 0);

            format!(
                "  {} {} {:>6}  ({:>4.1}%)  {}",
                paint("■", slice.color),
                pad_label(&slice.label, 12),
                slice.value,
                pct,
                paint(&bar, slice.color),
            )
        })
        .collect()
}

/// Render a bar chart as horizontal bars scaled to the largest value.
pub fn bar_lines(chart: &BarChart) -> Vec<String> {
    let max = chart.max_value();

    chart
        .bars
        .iter()
        .map(|bar| {
            let fraction = if max == 0 {
                0.0
            } else {
                bar.value as f64 / max as f64
            };
            let glyphs = glyph_bar(fraction, bar.value > 0);

            format!(
                "  {} {} {}",
                pad_label(&bar.label, 12),
                paint(&glyphs, bar.color),
                bar.value,
            )
        })
        .collect()
}

/// A run of block glyphs covering `fraction` of the full width.
///
/// Any nonzero value gets at least one glyph so small slices stay visible;
/// zero stays empty.
fn glyph_bar(fraction: f64, nonzero: bool) -> String {
    let mut len = (fraction * BAR_WIDTH as f64).round() as usize;
    if nonzero && len == 0 {
        len = 1;
    }
    "█".repeat(len.min(BAR_WIDTH))
}

/// Pad a label to a fixed width before any color is applied — ANSI escapes
/// would throw off `format!` width counting otherwise.
fn pad_label(label: &str, width: usize) -> String {
    format!("{label:<width$}")
}

/// Apply a chart color to text via truecolor.
fn paint(text: &str, color: ChartColor) -> colored::ColoredString {
    text.truecolor(color.r, color.g, color.b)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::charts::{Bar, GREEN, RED, Slice};

    fn chart_with(values: &[u64]) -> BarChart {
        BarChart {
            bars: values
                .iter()
                .map(|&value| Bar {
                    label: "x".to_string(),
                    value,
                    color: GREEN,
                })
                .collect(),
        }
    }

    #[test]
    fn one_line_per_slice() {
        let chart = DonutChart {
            slices: vec![
                Slice {
                    label: "Critical".to_string(),
                    value: 1,
                    color: RED,
                },
                Slice {
                    label: "Low".to_string(),
                    value: 3,
                    color: GREEN,
                },
            ],
        };
        assert_eq!(donut_lines(&chart).len(), 2);
    }

    #[test]
    fn bars_scale_from_zero() {
        let lines = bar_lines(&chart_with(&[28, 14, 0]));

        let count = |s: &str| s.matches('█').count();
        assert_eq!(count(&lines[0]), 28);
        assert_eq!(count(&lines[1]), 14);
        // Zero value means zero glyphs, not a one-glyph floor.
        assert_eq!(count(&lines[2]), 0);
    }

    #[test]
    fn small_nonzero_values_stay_visible() {
        let lines = bar_lines(&chart_with(&[1000, 1]));
        assert_eq!(lines[1].matches('█').count(), 1);
    }

    #[test]
    fn empty_chart_renders_nothing() {
        assert!(bar_lines(&chart_with(&[])).is_empty());
        assert!(donut_lines(&DonutChart { slices: vec![] }).is_empty());
    }

    #[test]
    fn donut_with_zero_total_does_not_divide_by_zero() {
        let chart = DonutChart {
            slices: vec![Slice {
                label: "Low".to_string(),
                value: 0,
                color: GREEN,
            }],
        };
        let lines = donut_lines(&chart);
        assert!(lines[0].contains("0.0%"));
    }
}
