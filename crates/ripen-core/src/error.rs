use std::fmt;

/// Machine-readable error codes for callers that branch on failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    ConfigLoadError,
    UnknownPeriod,
    InvalidBucketWidth,
    PeriodTooLong,
    UnsortedEvents,
    InvalidStartOffset,
    ReplayTooLong,
    SourceUnavailable,
    SourceSchemaMismatch,
    SourceQueryFailed,
}

impl ErrorCode {
    /// Stable code identifier (`E####`) for machine parsing.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::ConfigLoadError => "E1001",
            Self::UnknownPeriod => "E1002",
            Self::InvalidBucketWidth => "E1003",
            Self::PeriodTooLong => "E1004",
            Self::UnsortedEvents => "E2001",
            Self::InvalidStartOffset => "E2002",
            Self::ReplayTooLong => "E2003",
            Self::SourceUnavailable => "E3001",
            Self::SourceSchemaMismatch => "E3002",
            Self::SourceQueryFailed => "E3003",
        }
    }

    /// Short human-facing summary for logs and terminal output.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::ConfigLoadError => "Config file could not be loaded",
            Self::UnknownPeriod => "Unknown reporting period",
            Self::InvalidBucketWidth => "Invalid bucket width",
            Self::PeriodTooLong => "Reporting period is too long",
            Self::UnsortedEvents => "Review events are not in ascending order",
            Self::InvalidStartOffset => "Window starts after today",
            Self::ReplayTooLong => "Replay window spans too many days",
            Self::SourceUnavailable => "Review log unavailable",
            Self::SourceSchemaMismatch => "Review log schema mismatch",
            Self::SourceQueryFailed => "Review log query failed",
        }
    }

    /// Optional remediation hint that can be surfaced to operators.
    #[must_use]
    pub const fn hint(self) -> Option<&'static str> {
        match self {
            Self::ConfigLoadError => {
                Some("Check the --config path and the TOML syntax of the file, then retry.")
            }
            Self::UnknownPeriod => {
                Some("Use 1m, 3m, 1y, <n>m, <n>y, or deck_life as the period.")
            }
            Self::InvalidBucketWidth => Some("Use a bucket width of at least one day."),
            Self::PeriodTooLong => Some("Use deck_life to chart the whole history."),
            Self::UnsortedEvents => {
                Some("Order review events by id ascending before replaying them.")
            }
            Self::InvalidStartOffset => Some("Pass a start offset of zero or less."),
            Self::ReplayTooLong => {
                Some("Check the revlog for ids that are not millisecond timestamps.")
            }
            Self::SourceUnavailable => Some("Check the collection path and file permissions."),
            Self::SourceSchemaMismatch => {
                Some("Point ripen at a collection with revlog and cards tables.")
            }
            Self::SourceQueryFailed => {
                Some("Close other programs holding the collection lock and retry.")
            }
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
