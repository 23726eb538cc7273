//! Chart rendering: comparative grouped bar charts as standalone SVG.
//!
//! One chart per metric: a group of bars per circuit (sorted by the
//! first transpiler's average), one bar per transpiler, best-trial tick
//! markers, an optional legend row, and a value axis with a few nice
//! ticks. The corpus this harness descends from rendered with a
//! plotting library; here the charts are written directly as SVG text
//! and viewable in any browser.

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use crate::error::{BenchError, BenchResult};
use crate::metric::metric_by_name;
use crate::results::ResultSet;

/// Categorical palette, one color per transpiler (cycled past ten).
const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f",
    "#bcbd22", "#17becf",
];

const PLOT_HEIGHT: f64 = 220.0;
const MARGIN_LEFT: f64 = 56.0;
const MARGIN_RIGHT: f64 = 16.0;
const MARGIN_BOTTOM: f64 = 72.0;

/// Chart appearance knobs.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    /// Width of one bar in pixels.
    pub bar_width: f64,
    /// Whether to draw the legend row.
    pub show_legend: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            bar_width: 14.0,
            show_legend: true,
        }
    }
}

/// Render one metric of a result set as an SVG grouped bar chart.
pub fn bar_chart(
    results: &ResultSet,
    metric: &str,
    axis_label: &str,
    style: &ChartStyle,
) -> BenchResult<String> {
    let transpilers = results.transpilers(metric);
    if transpilers.is_empty() {
        return Err(BenchError::Config(format!(
            "no results recorded for metric '{metric}'"
        )));
    }

    // Sort circuit groups by the first transpiler's average.
    let mut circuits: Vec<&str> = results.circuits(metric);
    circuits.sort_by(|a, b| {
        let avg = |c: &str| {
            results
                .get(metric, c, transpilers[0])
                .map_or(0.0, |agg| agg.average())
        };
        avg(a).total_cmp(&avg(b))
    });
    if circuits.is_empty() {
        return Err(BenchError::Config(format!(
            "no complete circuit rows for metric '{metric}'"
        )));
    }

    let max_value = results
        .iter()
        .filter(|(m, _, _, _)| *m == metric)
        .map(|(_, _, _, agg)| agg.average().max(agg.worst().unwrap_or(0.0)))
        .fold(0.0f64, f64::max)
        .max(f64::MIN_POSITIVE);

    let (tick_step, tick_count) = nice_ticks(max_value);
    let axis_max = tick_step * f64::from(tick_count);

    let margin_top = if style.show_legend { 36.0 } else { 14.0 };
    let group_width = style.bar_width * transpilers.len() as f64 + style.bar_width;
    let width = MARGIN_LEFT + MARGIN_RIGHT + group_width * circuits.len() as f64;
    let height = margin_top + PLOT_HEIGHT + MARGIN_BOTTOM;

    let y_of = |value: f64| margin_top + PLOT_HEIGHT - (value / axis_max) * PLOT_HEIGHT;

    let mut svg = String::new();
    let _ = writeln!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width:.0}" height="{height:.0}" viewBox="0 0 {width:.0} {height:.0}" font-family="Helvetica, Arial, sans-serif">"#
    );
    let _ = writeln!(
        svg,
        r#"<rect width="{width:.0}" height="{height:.0}" fill="white"/>"#
    );

    // Legend row.
    if style.show_legend {
        let mut x = MARGIN_LEFT;
        for (j, name) in transpilers.iter().enumerate() {
            let color = PALETTE[j % PALETTE.len()];
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="10" width="10" height="10" fill="{color}"/>"#
            );
            let _ = writeln!(
                svg,
                r#"<text x="{:.1}" y="19" font-size="10">{}</text>"#,
                x + 14.0,
                escape(name)
            );
            x += 14.0 + 7.0 * name.len() as f64 + 16.0;
        }
    }

    // Value axis: gridlines, tick labels, axis label.
    for i in 0..=tick_count {
        let value = tick_step * f64::from(i);
        let y = y_of(value);
        let _ = writeln!(
            svg,
            r##"<line x1="{MARGIN_LEFT:.1}" y1="{y:.1}" x2="{:.1}" y2="{y:.1}" stroke="#dddddd" stroke-width="1"/>"##,
            width - MARGIN_RIGHT
        );
        let _ = writeln!(
            svg,
            r#"<text x="{:.1}" y="{:.1}" font-size="9" text-anchor="end">{}</text>"#,
            MARGIN_LEFT - 6.0,
            y + 3.0,
            format_tick(value, tick_step)
        );
    }
    let _ = writeln!(
        svg,
        r#"<text x="14" y="{:.1}" font-size="10" text-anchor="middle" transform="rotate(-90 14 {:.1})">{}</text>"#,
        margin_top + PLOT_HEIGHT / 2.0,
        margin_top + PLOT_HEIGHT / 2.0,
        escape(axis_label)
    );

    // Bars with best-trial tick markers.
    let label_font = (800 / circuits.len().max(1)).clamp(8, 10);
    for (i, circuit) in circuits.iter().enumerate() {
        let group_x = MARGIN_LEFT + group_width * i as f64 + style.bar_width / 2.0;

        for (j, transpiler) in transpilers.iter().enumerate() {
            let Some(aggregate) = results.get(metric, circuit, transpiler) else {
                continue;
            };
            let color = PALETTE[j % PALETTE.len()];
            let x = group_x + style.bar_width * j as f64;
            let average = aggregate.average();
            let y = y_of(average);
            let _ = writeln!(
                svg,
                r#"<rect x="{x:.1}" y="{y:.1}" width="{:.1}" height="{:.1}" fill="{color}"/>"#,
                style.bar_width - 1.0,
                (margin_top + PLOT_HEIGHT - y).max(0.0)
            );

            if let Some(best) = aggregate.best() {
                let by = y_of(best);
                let _ = writeln!(
                    svg,
                    r#"<line x1="{x:.1}" y1="{by:.1}" x2="{:.1}" y2="{by:.1}" stroke="black" stroke-width="1.5"/>"#,
                    x + style.bar_width - 1.0
                );
            }
        }

        // Rotated circuit label under the group.
        let label_x = group_x + style.bar_width * transpilers.len() as f64 / 2.0;
        let label_y = margin_top + PLOT_HEIGHT + 14.0;
        let _ = writeln!(
            svg,
            r#"<text x="{label_x:.1}" y="{label_y:.1}" font-size="{label_font}" text-anchor="end" transform="rotate(-30 {label_x:.1} {label_y:.1})">{}</text>"#,
            escape(circuit)
        );
    }

    // Baseline.
    let _ = writeln!(
        svg,
        r#"<line x1="{MARGIN_LEFT:.1}" y1="{:.1}" x2="{:.1}" y2="{:.1}" stroke="black" stroke-width="1"/>"#,
        margin_top + PLOT_HEIGHT,
        width - MARGIN_RIGHT,
        margin_top + PLOT_HEIGHT
    );

    svg.push_str("</svg>\n");
    Ok(svg)
}

/// Render every metric in the result set into `dir`, one SVG per
/// metric, returning the written paths.
pub fn render_all(
    results: &ResultSet,
    dir: impl AsRef<Path>,
    style: &ChartStyle,
) -> BenchResult<Vec<std::path::PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir).map_err(|source| BenchError::Io {
        path: dir.to_path_buf(),
        source,
    })?;
    let mut written = vec![];

    let metrics: Vec<String> = results.metrics().map(String::from).collect();
    for metric in metrics {
        let axis_label = metric_by_name(&metric)
            .map(|m| m.pretty_name().to_string())
            .unwrap_or_else(|| metric.clone());
        let svg = bar_chart(results, &metric, &axis_label, style)?;

        let path = dir.join(format!("{metric}.svg"));
        fs::write(&path, svg).map_err(|source| BenchError::Io {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }

    Ok(written)
}

/// Pick a tick step giving roughly three ticks up to `max`.
fn nice_ticks(max: f64) -> (f64, u32) {
    let raw = max / 3.0;
    let magnitude = 10f64.powf(raw.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|&s| raw <= s)
        .unwrap_or(10.0 * magnitude);

    let count = (max / step).ceil().max(1.0) as u32;
    (step, count)
}

fn format_tick(value: f64, step: f64) -> String {
    if step >= 1.0 {
        format!("{value:.0}")
    } else if step >= 0.1 {
        format!("{value:.1}")
    } else {
        format!("{value:.3}")
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}
