//! Terminal presenter
//!
//! Renders widget snapshots, notifications and the static panels as plain
//! text. Pure functions of their inputs; the binary decides when to print.

use bmi_calculator_shared::bmi::{
    gauge_angle, reference_chart, ReferenceChart, GAUGE_SCALE_LABELS, GAUGE_SCALE_POINTS,
};
use bmi_calculator_shared::faq::{DISCLAIMER, FAQ};
use bmi_calculator_shared::{Gauge, HistoryLog, Notification, Theme, UnitSystem, WidgetSnapshot};
use std::fmt::Write;

/// Width of the gauge track in characters
const GAUGE_WIDTH: usize = 37;

/// Width of the longest bar on the reference chart
const CHART_WIDTH: f64 = 40.0;

fn rule(theme: Theme) -> &'static str {
    match theme {
        Theme::Light => "----------------------------------------",
        Theme::Dark => "========================================",
    }
}

/// Render the whole widget
pub fn render_snapshot(snapshot: &WidgetSnapshot, recent_entries: usize) -> String {
    let mut out = String::new();
    let rule = rule(snapshot.theme);

    let _ = writeln!(out, "{}", rule);
    let _ = writeln!(
        out,
        "BMI CALC  [{}]  theme: {}",
        render_unit_toggle(snapshot.unit_system),
        snapshot.theme
    );

    if snapshot.calculating {
        let _ = writeln!(out, "Calculating...");
    }

    if let Some(result) = &snapshot.result {
        let _ = writeln!(out, "{}", rule);
        let _ = writeln!(out, "Your BMI Result: {} ({})", result.value, result.category);
        if let Some(gauge) = &snapshot.gauge {
            out.push_str(&render_gauge(gauge));
        }
        let _ = writeln!(out, "Health Recommendations");
        for tip in &result.tips {
            let _ = writeln!(out, "  • {}", tip);
        }
    }

    if !snapshot.history.is_empty() {
        let _ = writeln!(out, "{}", rule);
        let log = HistoryLog::from_entries(snapshot.history.clone());
        out.push_str(&render_history(&log, recent_entries));
    }

    let _ = writeln!(out, "{}", rule);
    out
}

fn render_unit_toggle(unit_system: UnitSystem) -> String {
    match unit_system {
        UnitSystem::Metric => "*Metric* / Imperial".to_string(),
        UnitSystem::Imperial => "Metric / *Imperial*".to_string(),
    }
}

/// Semicircle gauge flattened into a track with a needle marker
pub fn render_gauge(gauge: &Gauge) -> String {
    let position = gauge_column(gauge.angle);
    let track: String = (0..GAUGE_WIDTH)
        .map(|i| if i == position { '▲' } else { '─' })
        .collect();

    let mut out = String::new();
    let _ = writeln!(out, "  {}", track);
    let _ = writeln!(out, "  {}", render_scale_labels());
    let _ = writeln!(out, "  needle {:.1}° · BMI {}", gauge.angle, gauge.value);
    out
}

/// Track column for a needle angle
fn gauge_column(angle: f64) -> usize {
    (((angle / 180.0) * (GAUGE_WIDTH - 1) as f64).round() as usize).min(GAUGE_WIDTH - 1)
}

/// Scale labels, each starting at the column its BMI value maps to
///
/// A label that would overlap its neighbour is pushed right by one space.
fn render_scale_labels() -> String {
    let mut line = String::new();
    let mut width = 0;
    for (label, bmi) in GAUGE_SCALE_LABELS.iter().zip(GAUGE_SCALE_POINTS) {
        let column = gauge_column(gauge_angle(bmi));
        let start = if width == 0 { column } else { column.max(width + 1) };
        line.extend(std::iter::repeat(' ').take(start - width));
        line.push_str(label);
        width = start + label.chars().count();
    }
    line
}

/// History panel: recent entries and statistics
pub fn render_history(log: &HistoryLog, recent_entries: usize) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "BMI History");

    let series: Vec<String> = log.chronological().iter().map(|e| e.value.to_string()).collect();
    let _ = writeln!(out, "  Trend chart (oldest → newest): {}", series.join(" → "));
    if let Some((min, max)) = log.chart_bounds() {
        let _ = writeln!(out, "  Chart range: {:.1} – {:.1}", min, max);
    }

    let _ = writeln!(out, "Recent Calculations");
    for entry in log.recent(recent_entries) {
        let category = bmi_calculator_shared::classify_bmi(entry.value);
        let _ = writeln!(
            out,
            "  {:>5}  {:<11}  {}",
            entry.value,
            category.label(),
            entry.recorded_at.format("%b %d, %H:%M")
        );
    }

    if let Some(trend) = log.trend() {
        let _ = writeln!(out, "Trend: {}   Entries: {}", trend, log.len());
    }
    out
}

/// Category reference chart
pub fn render_reference_chart(chart: &ReferenceChart) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "BMI Reference Chart (WHO Standard BMI Categories)");
    for band in &chart.bands {
        let width = ((band.height / chart.y_max) * CHART_WIDTH).round() as usize;
        let _ = writeln!(
            out,
            "  {:<11} {:<40} {}",
            band.label,
            "█".repeat(width),
            band.range_label
        );
    }
    if let Some(current) = chart.current_bmi {
        let _ = writeln!(out, "  Your BMI: {}", current);
    }
    out
}

/// Reference chart for the snapshot's current result
pub fn render_chart_for(snapshot: &WidgetSnapshot) -> String {
    render_reference_chart(&reference_chart(snapshot.result.as_ref().map(|r| r.value)))
}

pub fn render_faq() -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Frequently Asked Questions");
    for (i, entry) in FAQ.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, entry.question);
        let _ = writeln!(out, "   {}", entry.answer);
    }
    let _ = writeln!(out, "Disclaimer: {}", DISCLAIMER);
    out
}

pub fn render_notification(notification: &Notification) -> String {
    let marker = if notification.is_error() { "!" } else { "*" };
    format!("[{}] {}: {}", marker, notification.title(), notification.description())
}

pub fn render_help(unit_system: UnitSystem) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Commands:");
    let _ = writeln!(out, "  metric <cm> <kg>           calculate from metric values");
    let _ = writeln!(out, "  imperial <ft> [in] <lbs>   calculate from imperial values");
    let _ = writeln!(out, "  units [metric|imperial]    switch unit system");
    let _ = writeln!(out, "  theme                      toggle dark mode");
    let _ = writeln!(out, "  history | clear            show or clear history");
    let _ = writeln!(out, "  chart | faq                reference chart, FAQ");
    let _ = writeln!(out, "  cancel | help | quit");
    let _ = writeln!(
        out,
        "Current units: {} / {}",
        unit_system.height_label(),
        unit_system.weight_label()
    );
    out
}
