//! Retrievability estimate on a power-law forgetting curve.
//!
//! The replay engine does not have a fitted memory model for each card, only
//! the last interval the scheduler assigned. That interval stands in for
//! stability, and retrievability follows the FSRS-4.5 curve
//! `R(t) = (1 + t / (9 * S))^-1`, which stays well-behaved when `S` is only
//! approximate. This is an estimate for charting, not a scheduler input.

/// Floor applied to interval-derived stability.
pub const MIN_STABILITY: f64 = 0.1;

/// Curve factor: retrievability reaches 90% when `t == S`.
const DECAY_FACTOR: f64 = 9.0;

/// Probability that a card is still recallable after `elapsed_days`.
///
/// Returns exactly `0.0` when `stability <= 0`.
#[must_use]
pub fn retrievability(elapsed_days: f64, stability: f64) -> f64 {
    if stability <= 0.0 {
        return 0.0;
    }
    (1.0 + elapsed_days / (DECAY_FACTOR * stability)).powi(-1)
}

/// Stability approximated from a card's last scheduled interval.
///
/// Learning steps (zero or negative intervals) clamp to [`MIN_STABILITY`].
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn stability_from_interval(interval_days: i64) -> f64 {
    (interval_days as f64).max(MIN_STABILITY)
}
