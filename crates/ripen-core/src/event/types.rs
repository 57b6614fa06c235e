//! Review kind enum covering the host's revlog type codes.
//!
//! The host log stores the kind as a small integer. Known codes map to the
//! four kinds the classifier cares about; anything else is preserved as
//! [`ReviewKind::Other`] so it can still be replayed (and classified as
//! learning) instead of being rejected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What happened when a card was shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReviewKind {
    /// First-time study through the learning steps.
    Learn,
    /// Graduated review.
    Review,
    /// Lapse: the card failed a review and re-entered learning steps.
    Relearn,
    /// Filtered-deck or cram study outside the normal schedule.
    Cram,
    /// A host code this crate does not know about (e.g. manual reschedule).
    Other(i64),
}

/// Error returned when parsing an unknown review kind string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownReviewKind {
    /// The unrecognised input string.
    pub raw: String,
}

impl fmt::Display for UnknownReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown review kind '{}': expected one of learn, review, relearn, cram \
             or a numeric revlog type",
            self.raw
        )
    }
}

impl std::error::Error for UnknownReviewKind {}

impl ReviewKind {
    /// The four named kinds in host code order.
    pub const KNOWN: [Self; 4] = [Self::Learn, Self::Review, Self::Relearn, Self::Cram];

    /// Map a numeric revlog `type` column to a kind.
    #[must_use]
    pub const fn from_code(code: i64) -> Self {
        match code {
            0 => Self::Learn,
            1 => Self::Review,
            2 => Self::Relearn,
            3 => Self::Cram,
            other => Self::Other(other),
        }
    }

    /// The numeric revlog `type` code for this kind.
    #[must_use]
    pub const fn code(self) -> i64 {
        match self {
            Self::Learn => 0,
            Self::Review => 1,
            Self::Relearn => 2,
            Self::Cram => 3,
            Self::Other(code) => code,
        }
    }

    /// Canonical lowercase name. `Other` kinds have no name.
    #[must_use]
    pub const fn name(self) -> Option<&'static str> {
        match self {
            Self::Learn => Some("learn"),
            Self::Review => Some("review"),
            Self::Relearn => Some("relearn"),
            Self::Cram => Some("cram"),
            Self::Other(_) => None,
        }
    }
}

impl fmt::Display for ReviewKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(f, "{}", self.code()),
        }
    }
}

impl FromStr for ReviewKind {
    type Err = UnknownReviewKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "learn" => Ok(Self::Learn),
            "review" => Ok(Self::Review),
            "relearn" => Ok(Self::Relearn),
            "cram" => Ok(Self::Cram),
            other => other
                .parse::<i64>()
                .map(Self::from_code)
                .map_err(|_| UnknownReviewKind { raw: s.to_string() }),
        }
    }
}

// Named kinds serialize as their string, unknown codes as the bare number.
impl Serialize for ReviewKind {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.name() {
            Some(name) => serializer.serialize_str(name),
            None => serializer.serialize_i64(self.code()),
        }
    }
}

impl<'de> Deserialize<'de> for ReviewKind {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Code(i64),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Code(code) => Ok(Self::from_code(code)),
            Raw::Name(name) => Self::from_str(&name).map_err(serde::de::Error::custom),
        }
    }
}
