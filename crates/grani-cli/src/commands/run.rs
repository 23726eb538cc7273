//! Run command: execute a configured benchmark sweep.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use grani_bench::render::{self, ChartStyle};
use grani_bench::{BenchReport, RunConfig};

/// Execute the run command.
pub fn execute(
    config_path: &str,
    report_override: Option<&str>,
    charts_dir_override: Option<&str>,
    no_charts: bool,
) -> Result<()> {
    let config = RunConfig::from_yaml_file(config_path)
        .with_context(|| format!("loading config {config_path}"))?;
    let benchmark = config.build().context("building benchmark")?;

    println!(
        "{} Benchmarking {} circuits × {} transpilers × {} trials",
        style("→").cyan().bold(),
        style(benchmark.circuit_count()).green(),
        style(benchmark.transpiler_names().len()).green(),
        style(config.trials).green(),
    );

    let progress = ProgressBar::new(benchmark.circuit_count() as u64);
    progress.set_style(
        ProgressStyle::with_template("{spinner:.cyan} [{bar:30.cyan/dim}] {pos}/{len} {msg}")
            .expect("static progress template is valid")
            .progress_chars("=> "),
    );

    let results = benchmark.run_with_observer(|circuit| {
        progress.set_message(circuit.to_string());
        progress.inc(1);
    });
    progress.finish_and_clear();

    if results.is_empty() {
        println!(
            "{} No results recorded (all circuits filtered or failed)",
            style("!").yellow().bold()
        );
        return Ok(());
    }

    // Report.
    let report_path = report_override
        .map(Path::new)
        .unwrap_or_else(|| config.output.report.as_path());
    let transpilers = benchmark
        .transpiler_names()
        .into_iter()
        .map(String::from)
        .collect();
    let report = BenchReport::from_results(&results, config.trials, transpilers);
    report.to_file(report_path, config.output.pretty)?;
    println!(
        "{} Report: {}",
        style("✓").green().bold(),
        style(report_path.display()).green()
    );

    // Charts.
    if !no_charts {
        let charts_dir = charts_dir_override
            .map(Path::new)
            .unwrap_or_else(|| config.output.charts_dir.as_path());
        let written = render::render_all(&results, charts_dir, &ChartStyle::default())?;
        for path in written {
            println!(
                "{} Chart:  {}",
                style("✓").green().bold(),
                style(path.display()).green()
            );
        }
    }

    // Per-metric summary: best transpiler by average of averages.
    for metric in results.metrics() {
        let transpilers = results.transpilers(metric);
        let circuits = results.circuits(metric);
        if circuits.is_empty() {
            continue;
        }
        let mut summary: Vec<(f64, &str)> = transpilers
            .iter()
            .map(|t| {
                let total: f64 = circuits
                    .iter()
                    .filter_map(|c| results.get(metric, c, t))
                    .map(|agg| agg.average())
                    .sum();
                (total / circuits.len() as f64, *t)
            })
            .collect();
        summary.sort_by(|a, b| a.0.total_cmp(&b.0));

        println!("  {}:", style(metric).bold());
        for (average, transpiler) in summary {
            println!("    {transpiler:<20} {average:>10.2}");
        }
    }

    Ok(())
}
