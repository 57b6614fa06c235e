//! End-to-end scenarios: review events → daily replay → buckets → chart.
//!
//! Covers:
//!   - Empty or fully filtered logs resolving to the no-data result
//!   - A single review landing in the right category and bucket
//!   - Last event wins for a card
//!   - Fourteen days at weekly width folding into exactly two buckets
//!   - Deck scoping and card exclusions through `build_report`

use ripen_core::aggregate::{Metric, aggregate};
use ripen_core::classify::Category;
use ripen_core::config::{ChartConfig, SecondaryGraph};
use ripen_core::event::{MS_PER_DAY, ReviewEvent, ReviewKind};
use ripen_core::replay::replay;
use ripen_core::series::{SeriesPoint, assemble};
use ripen_core::source::{CardRecord, DeckScope, MemoryLog};
use ripen_core::window::{BucketWidth, Period, ScreenContext};
use ripen_core::{Report, ReportRequest, build_report};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const CUTOFF: i64 = 1_718_258_400;

/// Last millisecond of the day `days_before` days before today.
fn end_of_day(days_before: i64) -> i64 {
    CUTOFF * 1_000 - days_before * MS_PER_DAY - 1
}

fn review(id: i64, card: i64, interval: i64) -> ReviewEvent {
    ReviewEvent::new(id, card, ReviewKind::Review, interval)
}

// ---------------------------------------------------------------------------
// Scenarios
// ---------------------------------------------------------------------------

#[test]
fn empty_log_is_no_data_not_zero_series() {
    let days = replay(&[], CUTOFF, -13).expect("replay");
    assert!(days.is_empty());

    let report = build_report(
        &MemoryLog::new(),
        &ReportRequest::new(Period::OneMonth, CUTOFF),
        &ChartConfig::default(),
    )
    .expect("report");
    assert!(matches!(
        report,
        Report::NoData {
            width: BucketWidth::DAY,
            label: "graph_no_data"
        }
    ));
}

#[test]
fn deck_life_over_filtered_out_log_is_no_data() {
    let config = ChartConfig {
        exclude_suspended_cards: true,
        ..ChartConfig::default()
    };
    let request = ReportRequest::new(Period::DeckLife, CUTOFF);

    let report = build_report(&MemoryLog::new(), &request, &config).expect("empty report");
    assert!(report.is_no_data());

    let mut log: MemoryLog = [
        review(end_of_day(400), 1, 3),
        review(end_of_day(2), 2, 90),
    ]
    .into_iter()
    .collect();
    log.add_card(1, CardRecord::suspended(1))
        .add_card(2, CardRecord::suspended(1));

    let report = build_report(&log, &request, &config).expect("filtered report");
    assert!(matches!(
        report,
        Report::NoData {
            width: BucketWidth::MONTH,
            ..
        }
    ));
}

#[test]
fn single_review_is_young_today() {
    let events = [review(end_of_day(0), 1, 10)];
    let days = replay(&events, CUTOFF, 0).expect("replay");

    assert_eq!(days.len(), 1);
    let today = &days[0];
    assert_eq!(today.counts.get(Category::Young), 1);
    assert_eq!(today.counts.get(Category::Learning), 0);
    assert_eq!(today.counts.get(Category::Mature), 0);
    assert_eq!(today.counts.get(Category::Retained), 0);

    let assembled = assemble(&aggregate(&days, BucketWidth::DAY), 0);
    assert_eq!(assembled.points(Metric::Young), &[SeriesPoint(0, 1.0)]);
}

#[test]
fn event_at_the_cutoff_belongs_to_tomorrow() {
    let events = [review(CUTOFF * 1_000, 1, 10)];
    let days = replay(&events, CUTOFF, 0).expect("replay");
    assert_eq!(days[0].active_cards, 0);
}

#[test]
fn last_event_wins() {
    let events = [
        review(end_of_day(5), 1, 100),
        ReviewEvent::new(end_of_day(2), 1, ReviewKind::Learn, 0),
    ];
    let days = replay(&events, CUTOFF, -6).expect("replay");

    let retained_day = days.iter().find(|d| d.day_offset == -4).expect("day -4");
    assert_eq!(retained_day.counts.get(Category::Retained), 1);

    let today = days.last().expect("today");
    assert_eq!(today.counts.get(Category::Learning), 1);
    assert_eq!(today.counts.get(Category::Retained), 0);
}

#[test]
fn fourteen_days_weekly_is_two_buckets() {
    let events: Vec<ReviewEvent> = (0..14)
        .rev()
        .map(|days_before| review(end_of_day(days_before), days_before, 10))
        .collect();
    let days = replay(&events, CUTOFF, -13).expect("replay");
    assert_eq!(days.len(), 14);

    let assembled = assemble(&aggregate(&days, BucketWidth::WEEK), -13);
    assert_eq!(assembled.chunks, vec![-1, 0]);
    // Day -7 closes bucket -1 with seven cards seen; today has all fourteen.
    assert_eq!(
        assembled.points(Metric::Young),
        &[SeriesPoint(-1, 7.0), SeriesPoint(0, 14.0)]
    );
}

#[test]
fn deck_scope_and_suspension_flow_through_report() {
    let mut log: MemoryLog = [
        review(end_of_day(3), 1, 10),
        review(end_of_day(3), 2, 30),
        review(end_of_day(2), 3, 100),
    ]
    .into_iter()
    .collect();
    log.add_deck(1, "Lang")
        .add_deck(2, "Lang\x1fFrench")
        .add_deck(3, "Maths")
        .add_card(1, CardRecord::active(1))
        .add_card(2, CardRecord::suspended(2))
        .add_card(3, CardRecord::active(3));

    let config = ChartConfig {
        exclude_suspended_cards: true,
        secondary_graph: SecondaryGraph::RetentionRelative,
        ..ChartConfig::default()
    };
    let request = ReportRequest::new(Period::OneMonth, CUTOFF)
        .with_context(ScreenContext::Main)
        .with_deck(DeckScope::new("Lang"));

    let report = build_report(&log, &request, &config).expect("report");
    let spec = report.chart().expect("chart");
    let today = spec.rows.last().expect("today");
    assert_eq!(today.young, 1.0);
    assert_eq!(today.mature, 0.0);
    assert_eq!(today.retained, 0.0);

    let percent = spec
        .series_for(Metric::RetentionPercent)
        .expect("secondary series");
    assert!(percent.data.iter().all(|point| point.value() <= 100.0));
}
