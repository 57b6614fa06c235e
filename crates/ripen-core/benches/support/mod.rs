#![allow(dead_code)]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ripen_core::event::{MS_PER_DAY, ReviewEvent, ReviewKind};
use ripen_core::source::{CardRecord, MemoryLog};

pub const DAY_CUTOFF_S: i64 = 1_718_258_400;

#[derive(Clone, Copy, Debug)]
pub struct BenchmarkTier {
    pub name: &'static str,
    pub card_count: i64,
    pub event_count: usize,
    pub days_back: i64,
}

pub const TIER_S: BenchmarkTier = BenchmarkTier {
    name: "S",
    card_count: 500,
    event_count: 5_000,
    days_back: 90,
};

pub const TIER_M: BenchmarkTier = BenchmarkTier {
    name: "M",
    card_count: 5_000,
    event_count: 50_000,
    days_back: 365,
};

pub const TIER_L: BenchmarkTier = BenchmarkTier {
    name: "L",
    card_count: 20_000,
    event_count: 250_000,
    days_back: 730,
};

pub const TIERS: [BenchmarkTier; 3] = [TIER_S, TIER_M, TIER_L];

/// A sorted synthetic review log shaped like a real collection: mostly
/// reviews with growing intervals, plus learning and relearning steps.
pub fn generate_events(tier: BenchmarkTier, seed: u64) -> Vec<ReviewEvent> {
    let mut rng = StdRng::seed_from_u64(seed);
    let span_ms = tier.days_back * MS_PER_DAY;

    let mut events: Vec<ReviewEvent> = (0..tier.event_count)
        .map(|_| {
            let event_id = DAY_CUTOFF_S * 1_000 - rng.gen_range(1..=span_ms);
            let card_id = rng.gen_range(0..tier.card_count);
            let (kind, interval) = match rng.gen_range(0..10) {
                0 => (ReviewKind::Learn, -rng.gen_range(60..1_200)),
                1 => (ReviewKind::Relearn, rng.gen_range(0..2)),
                _ => (ReviewKind::Review, rng.gen_range(1..400)),
            };
            ReviewEvent::new(event_id, card_id, kind, interval)
        })
        .collect();

    events.sort_by_key(|event| event.event_id);
    events
}

/// The same log behind a [`MemoryLog`], with every tenth card suspended.
pub fn generate_log(tier: BenchmarkTier, seed: u64) -> MemoryLog {
    let mut log: MemoryLog = generate_events(tier, seed).into_iter().collect();
    for card_id in 0..tier.card_count {
        let record = if card_id % 10 == 0 {
            CardRecord::suspended(1)
        } else {
            CardRecord::active(1)
        };
        log.add_card(card_id, record);
    }
    log
}
