pub mod completions;
pub mod config;
pub mod daily;
pub mod report;

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Args;
use ripen_core::config::ChartConfig;
use ripen_core::source::{DeckScope, SqliteLog};
use ripen_core::window::{DEFAULT_ROLLOVER_HOUR, Period, ScreenContext, next_day_cutoff};
use ripen_core::{ReportError, ReportRequest};

use crate::output::{CliError, OutputMode, render_error};

/// Collection and window options shared by `report` and `daily`.
#[derive(Args, Debug, Clone)]
pub struct WindowArgs {
    /// Path to the collection database.
    #[arg(long, value_name = "PATH")]
    pub db: PathBuf,

    /// Reporting period: 1m, 3m, 1y, <n>m, <n>y, or deck_life.
    #[arg(long, default_value = "3m")]
    pub period: Period,

    /// Limit to a deck and its children (`Parent::Child` paths accepted).
    #[arg(long)]
    pub deck: Option<String>,

    /// Use the main-screen bucket width from config instead of the stats-screen width.
    #[arg(long, conflicts_with = "width")]
    pub main: bool,

    /// Bucket width in days. Defaults to a width derived from the period.
    #[arg(long)]
    pub width: Option<u32>,

    /// Day cutoff as Unix seconds. Defaults to the next rollover after now.
    #[arg(long, value_name = "UNIX_SECONDS")]
    pub cutoff: Option<i64>,
}

impl WindowArgs {
    /// Build the core request, resolving the cutoff from the local clock if needed.
    pub fn request(&self, config: &ChartConfig) -> ReportRequest {
        let day_cutoff_s = self.cutoff.unwrap_or_else(|| {
            let hour = if config.rollover_hour > 23 {
                DEFAULT_ROLLOVER_HOUR
            } else {
                config.rollover_hour
            };
            next_day_cutoff(&Local::now(), hour).timestamp()
        });

        let context = if self.main {
            ScreenContext::Main
        } else {
            ScreenContext::Stats {
                suggested_width: self.width,
            }
        };

        let request = ReportRequest::new(self.period, day_cutoff_s).with_context(context);
        match &self.deck {
            Some(path) => request.with_deck(DeckScope::from_path(path)),
            None => request,
        }
    }

    /// Open the collection, reporting failures in the requested output mode.
    pub fn open(&self, output: OutputMode) -> Result<SqliteLog> {
        SqliteLog::open(&self.db).or_else(|err| fail(output, &ReportError::from(err)))
    }
}

/// Render a report error and turn it into a command failure.
pub fn fail<T>(output: OutputMode, err: &ReportError) -> Result<T> {
    render_error(output, &CliError::from(err))?;
    anyhow::bail!("{} {}", err.code(), err.code().message())
}
