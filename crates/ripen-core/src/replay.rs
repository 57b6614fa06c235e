//! Day-by-day replay of the review log into daily maturity snapshots.
//!
//! Replay walks the reporting window one calendar day at a time, from the
//! start offset up to today (offset `0`). For each day it folds every event
//! that happened before the day's end into a per-card state table, then
//! re-scans the whole table to produce that day's [`DailySnapshot`].
//!
//! # Algorithm
//!
//! 1. Validate that events are ordered by `event_id` ascending. A misordered
//!    log would make the single-cursor scan silently undercount, so it is
//!    rejected with [`ReplayError::UnsortedEvents`].
//! 2. For each day offset `d` in `start..=0`, the day ends at
//!    `day_cutoff + d * 86400` seconds. Today ends at the cutoff itself.
//! 3. Advance one shared cursor, folding each event with
//!    `event_id < day_end` into the table. The latest event for a card
//!    replaces its state. Events past the boundary wait for a later day.
//! 4. Scan the table: count cards per category and accumulate interval-based
//!    stability and retrievability for every card seen before the day end.
//!
//! Step 4 is a full re-scan rather than an incremental counter because a
//! later event can move an already-counted card to another category.
//!
//! # Performance
//!
//! O(E + D × C) for E events, D days and C distinct cards.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{Category, classify};
use crate::event::{MS_PER_DAY, ReviewEvent, day_end_ms, day_offset_of};
use crate::retention::{retrievability, stability_from_interval};
use crate::window::MAX_PERIOD_DAYS;

/// Errors from review-log replay.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReplayError {
    /// An event's id is smaller than the one before it.
    #[error(
        "review events out of order at index {index}: id {current} follows id {previous}"
    )]
    UnsortedEvents {
        index: usize,
        previous: i64,
        current: i64,
    },

    /// The window would start after today.
    #[error("start day offset must be zero or negative, got {0}")]
    PositiveStartOffset(i64),

    /// The window starts more than [`MAX_PERIOD_DAYS`] days ago.
    #[error("replay would cover {days} days, more than the limit of {max}")]
    TooManyDays { days: i64, max: i64 },
}

/// The latest known state of one card during replay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardState {
    pub category: Category,
    pub interval_days: i64,
    pub last_event_ms: i64,
}

impl CardState {
    fn from_event(event: &ReviewEvent) -> Self {
        Self {
            category: classify(event.kind, event.interval_days),
            interval_days: event.interval_days,
            last_event_ms: event.event_id,
        }
    }
}

/// Card counts per maturity category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryCounts {
    pub learning: usize,
    pub young: usize,
    pub mature: usize,
    pub retained: usize,
}

impl CategoryCounts {
    #[must_use]
    pub const fn get(&self, category: Category) -> usize {
        match category {
            Category::Learning => self.learning,
            Category::Young => self.young,
            Category::Mature => self.mature,
            Category::Retained => self.retained,
        }
    }

    pub const fn increment(&mut self, category: Category) {
        match category {
            Category::Learning => self.learning += 1,
            Category::Young => self.young += 1,
            Category::Mature => self.mature += 1,
            Category::Retained => self.retained += 1,
        }
    }

    #[must_use]
    pub const fn total(&self) -> usize {
        self.learning + self.young + self.mature + self.retained
    }
}

/// Derived state of the whole collection at the end of one day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DailySnapshot {
    /// Day offset relative to the cutoff (0 = today, negative = past).
    pub day_offset: i64,
    /// Cards per category. Always sums to `active_cards`.
    pub counts: CategoryCounts,
    /// Sum of estimated retrievability over active cards ("total knowledge").
    pub total_retrievability: f64,
    /// Sum of interval-derived stability over active cards.
    pub total_stability: f64,
    /// Cards with at least one event before the day end.
    pub active_cards: usize,
}

impl DailySnapshot {
    fn empty(day_offset: i64) -> Self {
        Self {
            day_offset,
            counts: CategoryCounts::default(),
            total_retrievability: 0.0,
            total_stability: 0.0,
            active_cards: 0,
        }
    }

    /// Mean retrievability across active cards, as a percentage.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn retention_percent(&self) -> f64 {
        if self.active_cards == 0 {
            return 0.0;
        }
        self.total_retrievability / self.active_cards as f64 * 100.0
    }

    /// Mean interval-derived stability across active cards, in days.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn average_stability(&self) -> f64 {
        if self.active_cards == 0 {
            return 0.0;
        }
        self.total_stability / self.active_cards as f64
    }
}

/// Per-card state table plus the replay cursor.
///
/// Exposed so hosts can inspect the table at an arbitrary day boundary; most
/// callers want [`replay`].
#[derive(Debug, Clone)]
pub struct ReplayState<'a> {
    events: &'a [ReviewEvent],
    cursor: usize,
    cards: BTreeMap<i64, CardState>,
    day_cutoff_s: i64,
}

impl<'a> ReplayState<'a> {
    /// Start a replay over an already-validated event slice.
    #[must_use]
    pub const fn new(events: &'a [ReviewEvent], day_cutoff_s: i64) -> Self {
        Self {
            events,
            cursor: 0,
            cards: BTreeMap::new(),
            day_cutoff_s,
        }
    }

    /// Fold every pending event with `event_id < day_end_ms`.
    ///
    /// Returns how many events were folded.
    pub fn advance_to(&mut self, day_end_ms: i64) -> usize {
        let start = self.cursor;
        while let Some(event) = self.events.get(self.cursor) {
            if event.event_id >= day_end_ms {
                break;
            }
            self.cards.insert(event.card_id, CardState::from_event(event));
            self.cursor += 1;
        }
        self.cursor - start
    }

    /// Current state of one card, if it has been seen.
    #[must_use]
    pub fn card(&self, card_id: i64) -> Option<&CardState> {
        self.cards.get(&card_id)
    }

    /// Number of distinct cards folded so far.
    #[must_use]
    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    /// Scan the table and summarize it as of the end of `day_offset`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn snapshot(&self, day_offset: i64, day_end_ms: i64) -> DailySnapshot {
        let mut snapshot = DailySnapshot::empty(day_offset);

        for state in self.cards.values() {
            if state.last_event_ms >= day_end_ms {
                continue;
            }
            snapshot.active_cards += 1;
            snapshot.counts.increment(state.category);

            let elapsed_days = day_offset - day_offset_of(state.last_event_ms, self.day_cutoff_s);
            if elapsed_days < 0 {
                continue;
            }

            let stability = stability_from_interval(state.interval_days);
            snapshot.total_stability += stability;
            snapshot.total_retrievability += retrievability(elapsed_days as f64, stability);
        }

        snapshot
    }
}

/// Check that events are ordered by `event_id` ascending.
///
/// Equal ids are tolerated and folded in slice order.
///
/// # Errors
///
/// Returns [`ReplayError::UnsortedEvents`] at the first descent.
pub fn ensure_sorted(events: &[ReviewEvent]) -> Result<(), ReplayError> {
    for (index, pair) in events.windows(2).enumerate() {
        if pair[1].event_id < pair[0].event_id {
            return Err(ReplayError::UnsortedEvents {
                index: index + 1,
                previous: pair[0].event_id,
                current: pair[1].event_id,
            });
        }
    }
    Ok(())
}

/// Day offset of the earliest event, used as the start of an unbounded window.
///
/// Returns `None` for an empty log. Events at or after the cutoff clamp to
/// today.
#[must_use]
pub fn earliest_day_offset(events: &[ReviewEvent], day_cutoff_s: i64) -> Option<i64> {
    let first = events.iter().map(|event| event.event_id).min()?;
    let days_ago = day_cutoff_s
        .saturating_mul(1_000)
        .saturating_sub(first)
        .div_euclid(MS_PER_DAY);
    Some((-days_ago).min(0))
}

/// Replay `events` into one snapshot per day from `start_day_offset` to today.
///
/// An empty event slice yields an empty vector, the "no data" result; it is
/// never padded with zero-valued days.
///
/// # Errors
///
/// Returns [`ReplayError::PositiveStartOffset`] if `start_day_offset > 0`,
/// [`ReplayError::TooManyDays`] if it lies more than [`MAX_PERIOD_DAYS`] days
/// back, or [`ReplayError::UnsortedEvents`] if the events are not ordered by id.
pub fn replay(
    events: &[ReviewEvent],
    day_cutoff_s: i64,
    start_day_offset: i64,
) -> Result<Vec<DailySnapshot>, ReplayError> {
    if start_day_offset > 0 {
        return Err(ReplayError::PositiveStartOffset(start_day_offset));
    }
    if start_day_offset < -MAX_PERIOD_DAYS {
        return Err(ReplayError::TooManyDays {
            days: 1_i64.saturating_sub(start_day_offset),
            max: MAX_PERIOD_DAYS,
        });
    }
    ensure_sorted(events)?;

    if events.is_empty() {
        return Ok(Vec::new());
    }

    let mut state = ReplayState::new(events, day_cutoff_s);
    let days = usize::try_from(1 - start_day_offset).unwrap_or(0);
    let mut snapshots = Vec::with_capacity(days);

    for day_offset in start_day_offset..=0 {
        let day_end = day_end_ms(day_cutoff_s, day_offset);
        state.advance_to(day_end);
        snapshots.push(state.snapshot(day_offset, day_end));
    }

    debug!(
        events = events.len(),
        folded = state.cursor,
        cards = state.card_count(),
        days = snapshots.len(),
        "replayed review log"
    );

    Ok(snapshots)
}
