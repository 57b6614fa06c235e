//! `ripen daily`: raw per-day replay snapshots.

use std::io::Write;

use clap::Args;
use ripen_core::chart::NO_DATA_LABEL;
use ripen_core::config::ChartConfig;
use ripen_core::daily_report;
use ripen_core::report::DailyReport;
use serde::Serialize;

use super::{WindowArgs, fail};
use crate::output::{OutputMode, pretty_kv, pretty_section, render_mode};

/// Arguments for `ripen daily`.
#[derive(Args, Debug)]
pub struct DailyArgs {
    #[command(flatten)]
    pub window: WindowArgs,
}

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
enum DailyOutput {
    NoData { label: &'static str },
    Days(DailyReport),
}

/// Execute `ripen daily`.
pub fn run_daily(args: &DailyArgs, config: &ChartConfig, output: OutputMode) -> anyhow::Result<()> {
    let log = args.window.open(output)?;
    let request = args.window.request(config);

    let payload = match daily_report(&log, &request, config) {
        Ok(Some(daily)) => DailyOutput::Days(daily),
        Ok(None) => DailyOutput::NoData {
            label: NO_DATA_LABEL,
        },
        Err(err) => return fail(output, &err),
    };

    render_mode(output, &payload, render_daily_text, render_daily_pretty)
}

fn render_daily_text(payload: &DailyOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let daily = match payload {
        DailyOutput::NoData { label } => return writeln!(w, "{label}"),
        DailyOutput::Days(daily) => daily,
    };

    writeln!(
        w,
        "day\tlearning\tyoung\tmature\tretained\tactive\tretention_pct\tavg_stability"
    )?;
    for day in &daily.days {
        writeln!(
            w,
            "{}\t{}\t{}\t{}\t{}\t{}\t{:.2}\t{:.2}",
            day.day_offset,
            day.counts.learning,
            day.counts.young,
            day.counts.mature,
            day.counts.retained,
            day.active_cards,
            day.retention_percent(),
            day.average_stability(),
        )?;
    }
    Ok(())
}

fn render_daily_pretty(payload: &DailyOutput, w: &mut dyn Write) -> std::io::Result<()> {
    let daily = match payload {
        DailyOutput::NoData { label } => return writeln!(w, "{label}"),
        DailyOutput::Days(daily) => daily,
    };

    pretty_section(w, "Daily replay")?;
    pretty_kv(w, "events", daily.event_count.to_string())?;
    pretty_kv(w, "first day", daily.start_day_offset.to_string())?;

    writeln!(w)?;
    writeln!(
        w,
        "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7} {:>9}",
        "day", "learning", "young", "mature", "retained", "active", "ret %", "stability"
    )?;
    for day in &daily.days {
        writeln!(
            w,
            "{:>6} {:>8} {:>8} {:>8} {:>8} {:>8} {:>7.1} {:>9.2}",
            day.day_offset,
            day.counts.learning,
            day.counts.young,
            day.counts.mature,
            day.counts.retained,
            day.active_cards,
            day.retention_percent(),
            day.average_stability(),
        )?;
    }
    Ok(())
}
