//! `ripen report`: bucketed maturity chart for a collection.

use std::io::Write;

use chrono::Local;
use clap::Args;
use ripen_core::chart::{ChartSpec, TooltipRow, tick_label};
use ripen_core::config::ChartConfig;
use ripen_core::{Report, build_report};

use super::{WindowArgs, fail};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ripen report`.
#[derive(Args, Debug)]
pub struct ReportArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

/// Execute `ripen report`.
pub fn run_report(args: &ReportArgs, config: &ChartConfig, output: OutputMode) -> anyhow::Result<()> {
    let log = args.window.open(output)?;
    let request = args.window.request(config);

    let report = match build_report(&log, &request, config) {
        Ok(report) => report,
        Err(err) => return fail(output, &err),
    };

    render_mode(output, &report, render_report_text, render_report_pretty)
}

fn bucket_label(spec: &ChartSpec, row: &TooltipRow) -> String {
    #[allow(clippy::cast_precision_loss)]
    let value = row.chunk as f64;
    tick_label(value, spec.options.tick_rule, &Local).to_key_string()
}

fn percent(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |p| format!("{p:.1}"))
}

fn render_report_text(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    let spec = match report {
        Report::NoData { label, .. } => return writeln!(w, "{label}"),
        Report::Chart(spec) => spec,
    };

    writeln!(
        w,
        "bucket\tlearning\tyoung\tmature\tretained\ttotal\tretention_pct\ttotal_knowledge\tavg_stability"
    )?;
    for row in &spec.rows {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
            bucket_label(spec, row),
            row.learning,
            row.young,
            row.mature,
            row.retained,
            row.total,
            percent(row.retention_percent),
            row.total_knowledge,
            row.average_stability,
        )?;
    }
    Ok(())
}

fn render_report_pretty(report: &Report, w: &mut dyn Write) -> std::io::Result<()> {
    let spec = match report {
        Report::NoData { label, width } => {
            pretty_section(w, "Card maturity")?;
            pretty_kv(w, "bucket width", width.to_string())?;
            return writeln!(w, "\n{label}");
        }
        Report::Chart(spec) => spec,
    };

    pretty_section(w, "Card maturity")?;
    pretty_kv(w, "bucket width", spec.options.bucket_width.to_string())?;
    pretty_kv(
        w,
        "series",
        spec.series
            .iter()
            .map(|series| series.metric.as_str())
            .collect::<Vec<_>>()
            .join(", "),
    )?;
    if let Some(axis) = spec.options.secondary_axis {
        let max = axis
            .max
            .map_or_else(|| "dynamic".to_string(), |max| format!("{max}"));
        pretty_kv(w, "secondary axis", format!("{} (max {max})", axis.label))?;
    }

    writeln!(w)?;
    writeln!(
        w,
        "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7} {:>9} {:>9}",
        "bucket", "learning", "young", "mature", "retained", "total", "ret %", "knowledge", "stability"
    )?;
    for row in &spec.rows {
        writeln!(
            w,
            "{:<16} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7} {:>9.2} {:>9.2}",
            bucket_label(spec, row),
            row.learning,
            row.young,
            row.mature,
            row.retained,
            row.total,
            percent(row.retention_percent),
            row.total_knowledge,
            row.average_stability,
        )?;
    }
    Ok(())
}
