//! Review event model for the host's append-only review log.
//!
//! A [`ReviewEvent`] is one row of the host revlog: the moment a card was
//! shown, which card it was, what kind of study it was, and the interval the
//! scheduler assigned afterwards. Events are never mutated here; the replay
//! engine only reads them in ascending `event_id` order.
//!
//! # Time units
//!
//! `event_id` is a millisecond Unix timestamp (it doubles as the row identity
//! in the host log). The host's day cutoff is expressed in whole seconds.
//! [`MS_PER_DAY`] and [`SECS_PER_DAY`] bridge the two.

pub mod types;

pub use types::{ReviewKind, UnknownReviewKind};

use serde::{Deserialize, Serialize};

/// Seconds in one scheduling day.
pub const SECS_PER_DAY: i64 = 86_400;

/// Milliseconds in one scheduling day.
pub const MS_PER_DAY: i64 = SECS_PER_DAY * 1_000;

/// A single entry in the host review log.
///
/// # Fields (revlog column order)
///
/// 1. `event_id`: millisecond timestamp, unique and monotonically increasing
/// 2. `card_id`: the card that was shown
/// 3. `kind`: learn / review / relearn / cram / other
/// 4. `interval_days`: the interval assigned by this review; negative values
///    are learning steps expressed in seconds by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewEvent {
    /// Millisecond timestamp and ordering key.
    pub event_id: i64,

    /// Card the event belongs to.
    pub card_id: i64,

    /// What kind of study produced the event.
    pub kind: ReviewKind,

    /// Interval assigned by the review, in days.
    pub interval_days: i64,
}

impl ReviewEvent {
    /// Convenience constructor.
    #[must_use]
    pub const fn new(event_id: i64, card_id: i64, kind: ReviewKind, interval_days: i64) -> Self {
        Self {
            event_id,
            card_id,
            kind,
            interval_days,
        }
    }

    /// Day offset of this event relative to `day_cutoff_s` (0 = today).
    ///
    /// See [`day_offset_of`].
    #[must_use]
    pub const fn day_offset(&self, day_cutoff_s: i64) -> i64 {
        day_offset_of(self.event_id, day_cutoff_s)
    }
}

/// Day offset implied by a millisecond timestamp relative to a cutoff.
///
/// The distance to the cutoff is truncated toward zero, so anything in the
/// final 24 hours before the cutoff is day `0`, the 24 hours before that are
/// day `-1`, and so on.
#[must_use]
pub const fn day_offset_of(timestamp_ms: i64, day_cutoff_s: i64) -> i64 {
    (timestamp_ms - day_cutoff_s * 1_000) / MS_PER_DAY
}

/// Millisecond instant at which day `day_offset` ends.
///
/// Past days end exactly `day_offset` whole days from the cutoff. Today
/// (offset `0`) ends at the cutoff itself.
#[must_use]
pub const fn day_end_ms(day_cutoff_s: i64, day_offset: i64) -> i64 {
    (day_cutoff_s + day_offset * SECS_PER_DAY) * 1_000
}
