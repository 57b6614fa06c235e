//! Reporting windows: how far back to look and how wide each bucket is.
//!
//! A [`Period`] names the span the user asked for ("3m", "1y", deck life).
//! A [`ScreenContext`] decides the bucket width: the stats screen takes the
//! host's suggestion (or a fallback derived from the period), the main screen
//! follows the `main_screen_aggregation` setting. [`ReportWindow`] is the
//! resolved result handed to the report pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, TimeZone, Timelike};
use serde::{Deserialize, Serialize};

use crate::config::Aggregation;
use crate::event::SECS_PER_DAY;

/// Errors from window and bucket-width resolution.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("unknown period '{0}': expected 1m, 3m, 1y, <n>m, <n>y or deck_life")]
    UnknownPeriod(String),

    #[error("period length must be at least one month or year, got '{0}'")]
    ZeroLength(String),

    #[error("period '{0}' is longer than 100 years")]
    TooLong(String),

    #[error("bucket width must be at least one day")]
    ZeroWidth,
}

/// Longest `<n>m` or `<n>y` period accepted, 100 years. Replay refuses to
/// walk windows longer than this too.
pub const MAX_PERIOD_DAYS: i64 = 100 * 365;

/// A requested reporting span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Period {
    OneMonth,
    ThreeMonths,
    OneYear,
    Months(u32),
    Years(u32),
    /// Everything since the first review.
    DeckLife,
}

impl Period {
    /// Length in days, or `None` for an unbounded window.
    #[must_use]
    pub fn days(self) -> Option<i64> {
        match self {
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::OneYear => Some(365),
            Self::Months(n) => Some(i64::from(n) * 30),
            Self::Years(n) => Some(i64::from(n) * 365),
            Self::DeckLife => None,
        }
    }

    /// The stats-screen scope a period of this length corresponds to.
    #[must_use]
    pub fn scope(self) -> StatsScope {
        match self.days() {
            Some(days) if days <= 30 => StatsScope::Month,
            Some(days) if days <= 90 => StatsScope::Quarter,
            Some(days) if days <= 365 => StatsScope::Year,
            _ => StatsScope::Life,
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OneMonth => f.write_str("1m"),
            Self::ThreeMonths => f.write_str("3m"),
            Self::OneYear => f.write_str("1y"),
            Self::Months(n) => write!(f, "{n}m"),
            Self::Years(n) => write!(f, "{n}y"),
            Self::DeckLife => f.write_str("deck_life"),
        }
    }
}

impl FromStr for Period {
    type Err = WindowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let raw = s.trim().to_ascii_lowercase();
        match raw.as_str() {
            "1m" => return Ok(Self::OneMonth),
            "3m" => return Ok(Self::ThreeMonths),
            "1y" => return Ok(Self::OneYear),
            "deck_life" | "all" => return Ok(Self::DeckLife),
            _ => {}
        }

        let unknown = || WindowError::UnknownPeriod(s.to_string());
        let unit = raw.chars().last().ok_or_else(unknown)?;
        let digits = &raw[..raw.len() - unit.len_utf8()];
        if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(unknown());
        }
        let n: u32 = digits.parse().map_err(|_| unknown())?;
        if n == 0 {
            return Err(WindowError::ZeroLength(s.to_string()));
        }

        let period = match unit {
            'm' => Self::Months(n),
            'y' => Self::Years(n),
            _ => return Err(unknown()),
        };
        if period.days().is_some_and(|days| days > MAX_PERIOD_DAYS) {
            return Err(WindowError::TooLong(s.to_string()));
        }
        Ok(period)
    }
}

/// Coarse period class used by the stats screen when the host does not
/// suggest a bucket width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsScope {
    Month,
    Quarter,
    Year,
    Life,
}

impl StatsScope {
    /// Fallback bucket width for this scope.
    #[must_use]
    pub const fn fallback_width(self) -> BucketWidth {
        match self {
            Self::Month => BucketWidth::DAY,
            Self::Quarter => BucketWidth::WEEK,
            Self::Year | Self::Life => BucketWidth::MONTH,
        }
    }
}

/// Which presentation surface is asking for the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenContext {
    /// The statistics screen; the host may suggest a width.
    Stats { suggested_width: Option<u32> },
    /// The deck overview / main screen; width comes from configuration.
    Main,
}

impl ScreenContext {
    /// Resolve the bucket width for `period` in this context.
    ///
    /// A suggested width of `0` is ignored in favour of the scope fallback.
    #[must_use]
    pub fn bucket_width(self, period: Period, aggregation: Aggregation) -> BucketWidth {
        match self {
            Self::Main => match aggregation {
                Aggregation::Day => BucketWidth::DAY,
                Aggregation::Week => BucketWidth::WEEK,
            },
            Self::Stats { suggested_width } => suggested_width
                .and_then(|days| BucketWidth::new(days).ok())
                .unwrap_or_else(|| period.scope().fallback_width()),
        }
    }
}

/// Unit shown next to relative bucket indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BucketUnit {
    Day,
    Week,
    Month,
}

impl BucketUnit {
    /// Tick suffix: `d`, `w` or `m`.
    #[must_use]
    pub const fn suffix(self) -> &'static str {
        match self {
            Self::Day => "d",
            Self::Week => "w",
            Self::Month => "m",
        }
    }
}

/// Number of days collapsed into one chart bucket. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct BucketWidth(u32);

impl BucketWidth {
    pub const DAY: Self = Self(1);
    pub const WEEK: Self = Self(7);
    pub const MONTH: Self = Self(30);

    /// # Errors
    ///
    /// Returns [`WindowError::ZeroWidth`] for `0`.
    pub const fn new(days: u32) -> Result<Self, WindowError> {
        if days == 0 {
            Err(WindowError::ZeroWidth)
        } else {
            Ok(Self(days))
        }
    }

    #[must_use]
    pub const fn days(self) -> u32 {
        self.0
    }

    /// Label unit. Widths of 28 days or more read as months.
    #[must_use]
    pub const fn unit(self) -> BucketUnit {
        match self.0 {
            7 => BucketUnit::Week,
            w if w >= 28 => BucketUnit::Month,
            _ => BucketUnit::Day,
        }
    }
}

impl TryFrom<u32> for BucketWidth {
    type Error = WindowError;

    fn try_from(days: u32) -> Result<Self, Self::Error> {
        Self::new(days)
    }
}

impl From<BucketWidth> for u32 {
    fn from(width: BucketWidth) -> Self {
        width.0
    }
}

impl fmt::Display for BucketWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d", self.0)
    }
}

/// A fully resolved reporting window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportWindow {
    /// Window start in Unix seconds, or `None` for "since the first review".
    pub start_s: Option<i64>,
    /// Window end in Unix seconds: the host's day cutoff.
    pub end_s: i64,
    pub width: BucketWidth,
}

impl ReportWindow {
    /// Resolve `period` against `day_cutoff_s` with the given bucket width.
    #[must_use]
    pub fn resolve(period: Period, day_cutoff_s: i64, width: BucketWidth) -> Self {
        Self {
            start_s: period
                .days()
                .map(|days| day_cutoff_s - days * SECS_PER_DAY),
            end_s: day_cutoff_s,
            width,
        }
    }

    /// First day offset of a bounded window, `None` when unbounded.
    ///
    /// An N-day window covers offsets `-(N - 1)..=0`.
    #[must_use]
    pub fn start_day_offset(&self) -> Option<i64> {
        let start_s = self.start_s?;
        let days = (self.end_s - start_s).div_euclid(SECS_PER_DAY);
        Some(-(days - 1).max(0))
    }
}

/// Host rollover hour used when none is configured.
pub const DEFAULT_ROLLOVER_HOUR: u32 = 4;

/// The next day boundary strictly after `now`.
///
/// The scheduling day rolls over at `rollover_hour` local time (clamped to
/// 0..=23). Repeated or skipped wall-clock hours around DST transitions
/// resolve to the earliest valid instant.
#[must_use]
pub fn next_day_cutoff<Tz: TimeZone>(now: &DateTime<Tz>, rollover_hour: u32) -> DateTime<Tz> {
    let hour = rollover_hour.min(23);
    let tz = now.timezone();
    let mut date = now.date_naive();

    if now.hour() >= hour {
        date = date.succ_opt().unwrap_or(date);
    }

    for _ in 0..3 {
        let candidate = date
            .and_hms_opt(hour, 0, 0)
            .and_then(|naive| tz.from_local_datetime(&naive).earliest());
        match candidate {
            Some(candidate) if candidate > *now => return candidate,
            _ => date = date.succ_opt().unwrap_or(date),
        }
    }

    now.clone() + Duration::days(1)
}
