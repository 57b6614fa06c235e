//! One-call report pipeline.
//!
//! [`build_report`] wires the stages together: fetch filtered events from a
//! [`ReviewLog`], resolve the window, replay day by day, aggregate into
//! buckets, assemble series, and build the [`ChartSpec`]. An empty event
//! stream is [`Report::NoData`], never an error.

use serde::Serialize;
use tracing::{debug, instrument};

use crate::aggregate::aggregate;
use crate::chart::{ChartSpec, NO_DATA_LABEL, build_chart};
use crate::config::ChartConfig;
use crate::error::ErrorCode;
use crate::event::ReviewEvent;
use crate::replay::{DailySnapshot, ReplayError, earliest_day_offset, replay};
use crate::series::assemble;
use crate::source::{DeckScope, EventFilter, ReviewLog, SourceError};
use crate::window::{BucketWidth, Period, ReportWindow, ScreenContext, WindowError};

/// Any failure while building a report.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error(transparent)]
    Window(#[from] WindowError),
}

impl ReportError {
    /// Stable code for this failure class.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Source(SourceError::Unavailable(_)) => ErrorCode::SourceUnavailable,
            Self::Source(SourceError::MissingTable(_)) => ErrorCode::SourceSchemaMismatch,
            Self::Source(SourceError::Query(_)) => ErrorCode::SourceQueryFailed,
            Self::Replay(ReplayError::UnsortedEvents { .. }) => ErrorCode::UnsortedEvents,
            Self::Replay(ReplayError::PositiveStartOffset(_)) => ErrorCode::InvalidStartOffset,
            Self::Replay(ReplayError::TooManyDays { .. }) => ErrorCode::ReplayTooLong,
            Self::Window(WindowError::UnknownPeriod(_) | WindowError::ZeroLength(_)) => {
                ErrorCode::UnknownPeriod
            }
            Self::Window(WindowError::TooLong(_)) => ErrorCode::PeriodTooLong,
            Self::Window(WindowError::ZeroWidth) => ErrorCode::InvalidBucketWidth,
        }
    }
}

/// What the host is asking to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
    pub period: Period,
    pub context: ScreenContext,
    pub deck: Option<DeckScope>,
    /// Unix seconds of the next day rollover. Events at or after
    /// `day_cutoff_s * 1000` are ignored.
    pub day_cutoff_s: i64,
}

impl ReportRequest {
    /// A stats-screen request with no suggested width and no deck scope.
    #[must_use]
    pub const fn new(period: Period, day_cutoff_s: i64) -> Self {
        Self {
            period,
            context: ScreenContext::Stats {
                suggested_width: None,
            },
            deck: None,
            day_cutoff_s,
        }
    }

    #[must_use]
    pub const fn with_context(mut self, context: ScreenContext) -> Self {
        self.context = context;
        self
    }

    #[must_use]
    pub fn with_deck(mut self, deck: DeckScope) -> Self {
        self.deck = Some(deck);
        self
    }

    /// Resolve the reporting window under `config`.
    #[must_use]
    pub fn window(&self, config: &ChartConfig) -> ReportWindow {
        let width = self
            .context
            .bucket_width(self.period, config.main_screen_aggregation);
        ReportWindow::resolve(self.period, self.day_cutoff_s, width)
    }

    /// The event filter for this request under `config`.
    #[must_use]
    pub fn filter(&self, config: &ChartConfig) -> EventFilter {
        EventFilter::from_config(self.day_cutoff_s * 1_000, self.deck.clone(), config)
    }
}

/// The per-day replay behind a report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyReport {
    pub window: ReportWindow,
    pub start_day_offset: i64,
    pub event_count: usize,
    pub days: Vec<DailySnapshot>,
}

/// Result of [`build_report`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Report {
    /// The filtered log was empty.
    NoData {
        width: BucketWidth,
        label: &'static str,
    },
    Chart(ChartSpec),
}

impl Report {
    const fn no_data(width: BucketWidth) -> Self {
        Self::NoData {
            width,
            label: NO_DATA_LABEL,
        }
    }

    #[must_use]
    pub const fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }

    #[must_use]
    pub const fn chart(&self) -> Option<&ChartSpec> {
        match self {
            Self::Chart(spec) => Some(spec),
            Self::NoData { .. } => None,
        }
    }
}

#[instrument(skip(log, filter), fields(before_ms = filter.before_ms))]
fn fetch_events<L: ReviewLog + ?Sized>(
    log: &L,
    filter: &EventFilter,
) -> Result<Vec<ReviewEvent>, SourceError> {
    let events = log.review_events(filter)?;
    debug!(events = events.len(), "fetched review events");
    Ok(events)
}

/// Fetch and replay the events behind a report.
///
/// Returns `Ok(None)` when the filtered log is empty.
///
/// # Errors
///
/// Returns [`ReportError`] if the log cannot be read or its events are not
/// ordered by id.
#[instrument(skip_all, fields(period = %request.period, cutoff = request.day_cutoff_s))]
pub fn daily_report<L: ReviewLog + ?Sized>(
    log: &L,
    request: &ReportRequest,
    config: &ChartConfig,
) -> Result<Option<DailyReport>, ReportError> {
    let window = request.window(config);
    let events = fetch_events(log, &request.filter(config))?;
    if events.is_empty() {
        return Ok(None);
    }

    let start_day_offset = window
        .start_day_offset()
        .or_else(|| earliest_day_offset(&events, request.day_cutoff_s))
        .unwrap_or(0);

    let days = replay(&events, request.day_cutoff_s, start_day_offset)?;
    Ok(Some(DailyReport {
        window,
        start_day_offset,
        event_count: events.len(),
        days,
    }))
}

/// Build the full chart report for `request`.
///
/// # Errors
///
/// Returns [`ReportError`] if the log cannot be read or its events are not
/// ordered by id.
#[instrument(skip_all, fields(period = %request.period, cutoff = request.day_cutoff_s))]
pub fn build_report<L: ReviewLog + ?Sized>(
    log: &L,
    request: &ReportRequest,
    config: &ChartConfig,
) -> Result<Report, ReportError> {
    let Some(daily) = daily_report(log, request, config)? else {
        let width = request.window(config).width;
        debug!(%width, "no review events in scope");
        return Ok(Report::no_data(width));
    };

    let width = daily.window.width;
    let aggregated = aggregate(&daily.days, width);
    let assembled = assemble(&aggregated, daily.start_day_offset);
    debug!(
        days = daily.days.len(),
        buckets = assembled.chunks.len(),
        %width,
        "assembled chart series"
    );

    Ok(Report::Chart(build_chart(
        &assembled,
        config,
        request.day_cutoff_s,
    )))
}
