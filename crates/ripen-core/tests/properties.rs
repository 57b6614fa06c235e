use proptest::prelude::*;
use ripen_core::aggregate::{Metric, aggregate, chunk_index};
use ripen_core::classify::{Category, classify};
use ripen_core::event::ReviewKind;
use ripen_core::replay::replay;
use ripen_core::retention::retrievability;
use ripen_core::series::assemble;
use ripen_core::window::BucketWidth;

use generators::*;

proptest! {
    #![proptest_config(proptest::test_runner::Config::with_cases(512))]

    // Classifier
    #[test]
    fn review_maturity_is_monotonic(a in -1000i64..1000, b in -1000i64..1000) {
        let (low, high) = if a <= b { (a, b) } else { (b, a) };
        prop_assert!(classify(ReviewKind::Review, low) <= classify(ReviewKind::Review, high));
    }

    #[test]
    fn non_review_kinds_are_learning(interval in any::<i64>(), code in prop_oneof![Just(0i64), Just(2), Just(3), 4i64..100]) {
        prop_assert_eq!(classify(ReviewKind::from_code(code), interval), Category::Learning);
    }

    // Retrievability
    #[test]
    fn fresh_memory_is_certain(stability in 0.001f64..10_000.0) {
        prop_assert!((retrievability(0.0, stability) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn retrievability_decays(stability in 0.1f64..1_000.0, t in 0.0f64..1_000.0, dt in 0.5f64..100.0) {
        prop_assert!(retrievability(t + dt, stability) < retrievability(t, stability));
    }

    #[test]
    fn zero_stability_is_forgotten(t in 0.0f64..10_000.0) {
        prop_assert_eq!(retrievability(t, 0.0), 0.0);
    }

    // Replay
    #[test]
    fn counts_sum_to_active_cards(events in arb_event_log()) {
        let days = replay(&events, CUTOFF, 1 - MAX_DAYS_BACK).expect("sorted log");
        for day in &days {
            prop_assert_eq!(day.counts.total(), day.active_cards);
        }
    }

    #[test]
    fn active_cards_never_decrease(events in arb_event_log()) {
        let days = replay(&events, CUTOFF, 1 - MAX_DAYS_BACK).expect("sorted log");
        for pair in days.windows(2) {
            prop_assert!(pair[1].active_cards >= pair[0].active_cards);
        }
        let distinct: std::collections::BTreeSet<i64> = events.iter().map(|e| e.card_id).collect();
        prop_assert_eq!(days.last().map(|d| d.active_cards), Some(distinct.len()));
    }

    #[test]
    fn retention_stays_a_percentage(events in arb_event_log()) {
        let days = replay(&events, CUTOFF, 1 - MAX_DAYS_BACK).expect("sorted log");
        for day in &days {
            let percent = day.retention_percent();
            prop_assert!((0.0..=100.0 + 1e-9).contains(&percent), "{}", percent);
        }
    }

    #[test]
    fn replay_is_deterministic(events in arb_event_log()) {
        let first = replay(&events, CUTOFF, -30).expect("sorted log");
        let second = replay(&events, CUTOFF, -30).expect("sorted log");
        prop_assert_eq!(first, second);
    }

    // Aggregation
    #[test]
    fn daily_width_is_identity(days in arb_daily_series()) {
        let aggregated = aggregate(&days, BucketWidth::DAY);
        for day in &days {
            for metric in Metric::ALL {
                let expected = metric.daily_value(day);
                let actual = aggregated.value(metric, day.day_offset);
                prop_assert!((expected - actual).abs() < 1e-9, "{} on day {}", metric, day.day_offset);
            }
        }
    }

    #[test]
    fn today_is_bucket_zero(width in 1u32..400) {
        let width = BucketWidth::new(width).expect("non-zero");
        prop_assert_eq!(chunk_index(0, width), 0);
    }

    #[test]
    fn buckets_hold_exactly_width_days(width in 1u32..60, chunk in -20i64..=0) {
        let w = BucketWidth::new(width).expect("non-zero");
        let days = (-2_000i64..=0).filter(|&d| chunk_index(d, w) == chunk).count();
        prop_assert_eq!(days, width as usize);
    }

    #[test]
    fn assembled_bounds_cover_today(days in arb_daily_series(), width in 1u32..40) {
        let w = BucketWidth::new(width).expect("non-zero");
        let start = days.first().map_or(0, |d| d.day_offset);
        let assembled = assemble(&aggregate(&days, w), start);
        prop_assert!(assembled.bounds.max >= 0.5);
        prop_assert!(assembled.bounds.min <= assembled.bounds.max - 1.0);
        for metric in Metric::ALL {
            prop_assert_eq!(assembled.points(metric).len(), assembled.chunks.len());
        }
    }
}
