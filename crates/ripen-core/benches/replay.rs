mod support;

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use ripen_core::aggregate::aggregate;
use ripen_core::config::ChartConfig;
use ripen_core::replay::replay;
use ripen_core::window::{BucketWidth, Period};
use ripen_core::{ReportRequest, build_report};
use support::{DAY_CUTOFF_S, TIERS, generate_events, generate_log};

fn bench_replay(c: &mut Criterion) {
    let mut group = c.benchmark_group("replay");
    group.sample_size(20);

    for tier in TIERS {
        let events = generate_events(tier, 0x5EED_u64 + tier.event_count as u64);
        let start = 1 - tier.days_back;

        group.bench_with_input(BenchmarkId::new("daily", tier.name), &events, |b, events| {
            b.iter(|| black_box(replay(events, DAY_CUTOFF_S, start)));
        });

        let days = replay(&events, DAY_CUTOFF_S, start).unwrap_or_default();
        group.bench_with_input(BenchmarkId::new("aggregate_weekly", tier.name), &days, |b, days| {
            b.iter(|| black_box(aggregate(days, BucketWidth::WEEK)));
        });
    }

    group.finish();
}

fn bench_report(c: &mut Criterion) {
    let mut group = c.benchmark_group("report");
    group.sample_size(10);

    let config = ChartConfig {
        exclude_suspended_cards: true,
        ..ChartConfig::default()
    };

    for tier in TIERS {
        let log = generate_log(tier, 0xC0FFEE_u64 + tier.event_count as u64);
        let request = ReportRequest::new(Period::OneYear, DAY_CUTOFF_S);

        group.bench_with_input(BenchmarkId::new("one_year", tier.name), &log, |b, log| {
            b.iter(|| black_box(build_report(log, &request, &config)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_replay, bench_report);
criterion_main!(benches);
