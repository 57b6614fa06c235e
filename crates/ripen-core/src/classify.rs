//! Card maturity classification.
//!
//! Maps the most recent review of a card to one of four maturity buckets.
//! Anything still in (re)learning, or cramming, is [`Category::Learning`]
//! regardless of interval; graduated reviews are bucketed by the interval
//! the scheduler handed out.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::event::ReviewKind;

/// Largest review interval (days) still counted as learning.
pub const LEARNING_MAX_INTERVAL: i64 = 7;

/// Largest review interval (days) counted as young.
pub const YOUNG_MAX_INTERVAL: i64 = 21;

/// Largest review interval (days) counted as mature. Longer is retained.
pub const MATURE_MAX_INTERVAL: i64 = 84;

/// Maturity category of a card, ordered from least to most mature.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Learning,
    Young,
    Mature,
    Retained,
}

impl Category {
    /// All categories in maturity order.
    pub const ALL: [Self; 4] = [Self::Learning, Self::Young, Self::Mature, Self::Retained];

    /// Dense index for array-backed counters.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::Learning => 0,
            Self::Young => 1,
            Self::Mature => 2,
            Self::Retained => 3,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Young => "young",
            Self::Mature => "mature",
            Self::Retained => "retained",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a card from the kind and resulting interval of its latest review.
#[must_use]
pub const fn classify(kind: ReviewKind, interval_days: i64) -> Category {
    match kind {
        ReviewKind::Review => {
            if interval_days <= LEARNING_MAX_INTERVAL {
                Category::Learning
            } else if interval_days <= YOUNG_MAX_INTERVAL {
                Category::Young
            } else if interval_days <= MATURE_MAX_INTERVAL {
                Category::Mature
            } else {
                Category::Retained
            }
        }
        ReviewKind::Learn | ReviewKind::Relearn | ReviewKind::Cram | ReviewKind::Other(_) => {
            Category::Learning
        }
    }
}
