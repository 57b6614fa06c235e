//! Collapse the daily snapshot series into fixed-width chart buckets.
//!
//! Day offsets map to bucket indices with [`chunk_index`], so bucket `0`
//! always holds today and earlier buckets count down into the past. Each
//! metric has a [`BucketRule`]:
//!
//! - stocks (category counts, total knowledge) take the value of the last
//!   day that falls in the bucket, i.e. the state at the end of the bucket;
//! - rates (retention percent, average stability) take the mean over every
//!   day in the bucket.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::classify::Category;
use crate::replay::DailySnapshot;
use crate::window::BucketWidth;

/// A charted quantity derived from daily snapshots.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Learning,
    Young,
    Mature,
    Retained,
    /// Sum of retrievability over active cards.
    TotalKnowledge,
    /// Mean retrievability over active cards, in percent.
    RetentionPercent,
    /// Mean interval-derived stability, in days.
    AverageStability,
}

/// How the days of one bucket combine into a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BucketRule {
    /// Value of the last day in the bucket.
    EndOfBucket,
    /// Arithmetic mean over all days in the bucket.
    Mean,
}

impl Metric {
    pub const ALL: [Self; 7] = [
        Self::Learning,
        Self::Young,
        Self::Mature,
        Self::Retained,
        Self::TotalKnowledge,
        Self::RetentionPercent,
        Self::AverageStability,
    ];

    /// The count metric for a maturity category.
    #[must_use]
    pub const fn for_category(category: Category) -> Self {
        match category {
            Category::Learning => Self::Learning,
            Category::Young => Self::Young,
            Category::Mature => Self::Mature,
            Category::Retained => Self::Retained,
        }
    }

    #[must_use]
    pub const fn rule(self) -> BucketRule {
        match self {
            Self::Learning
            | Self::Young
            | Self::Mature
            | Self::Retained
            | Self::TotalKnowledge => BucketRule::EndOfBucket,
            Self::RetentionPercent | Self::AverageStability => BucketRule::Mean,
        }
    }

    /// This metric's value for one day.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn daily_value(self, snapshot: &DailySnapshot) -> f64 {
        match self {
            Self::Learning => snapshot.counts.learning as f64,
            Self::Young => snapshot.counts.young as f64,
            Self::Mature => snapshot.counts.mature as f64,
            Self::Retained => snapshot.counts.retained as f64,
            Self::TotalKnowledge => snapshot.total_retrievability,
            Self::RetentionPercent => snapshot.retention_percent(),
            Self::AverageStability => snapshot.average_stability(),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Learning => "learning",
            Self::Young => "young",
            Self::Mature => "mature",
            Self::Retained => "retained",
            Self::TotalKnowledge => "total_knowledge",
            Self::RetentionPercent => "retention_percent",
            Self::AverageStability => "average_stability",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket index of a day offset: `-floor(-day_offset / width)`.
///
/// Today is always bucket `0`, which also holds the `width - 1` days before
/// it. The next `width` days back form bucket `-1`, and so on.
#[must_use]
pub fn chunk_index(day_offset: i64, width: BucketWidth) -> i64 {
    -(-day_offset).div_euclid(i64::from(width.days()))
}

/// Per-metric bucket values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedSeries {
    pub width: BucketWidth,
    pub values: BTreeMap<Metric, BTreeMap<i64, f64>>,
}

impl AggregatedSeries {
    /// Value of `metric` in bucket `chunk`. Missing buckets read as `0`.
    #[must_use]
    pub fn value(&self, metric: Metric, chunk: i64) -> f64 {
        self.values
            .get(&metric)
            .and_then(|by_chunk| by_chunk.get(&chunk))
            .copied()
            .unwrap_or(0.0)
    }

    /// Every bucket index present in any metric, ascending.
    #[must_use]
    pub fn chunks(&self) -> BTreeSet<i64> {
        self.values
            .values()
            .flat_map(|by_chunk| by_chunk.keys().copied())
            .collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.values().all(BTreeMap::is_empty)
    }
}

/// Aggregate daily snapshots into `width`-day buckets for every metric.
///
/// Snapshots may arrive in any order; they are folded by ascending day
/// offset so "last day of the bucket" is well defined.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn aggregate(snapshots: &[DailySnapshot], width: BucketWidth) -> AggregatedSeries {
    let mut ordered: Vec<&DailySnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|snapshot| snapshot.day_offset);

    let mut values = BTreeMap::new();
    for metric in Metric::ALL {
        let by_chunk = match metric.rule() {
            BucketRule::EndOfBucket => {
                let mut last = BTreeMap::new();
                for snapshot in &ordered {
                    last.insert(
                        chunk_index(snapshot.day_offset, width),
                        metric.daily_value(snapshot),
                    );
                }
                last
            }
            BucketRule::Mean => {
                let mut sums: BTreeMap<i64, (f64, usize)> = BTreeMap::new();
                for snapshot in &ordered {
                    let entry = sums
                        .entry(chunk_index(snapshot.day_offset, width))
                        .or_insert((0.0, 0));
                    entry.0 += metric.daily_value(snapshot);
                    entry.1 += 1;
                }
                sums.into_iter()
                    .map(|(chunk, (sum, days))| (chunk, sum / days as f64))
                    .collect()
            }
        };
        values.insert(metric, by_chunk);
    }

    AggregatedSeries { width, values }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::replay::CategoryCounts;

    fn snapshot(day_offset: i64, young: usize, total_retrievability: f64) -> DailySnapshot {
        DailySnapshot {
            day_offset,
            counts: CategoryCounts {
                young,
                ..CategoryCounts::default()
            },
            total_retrievability,
            total_stability: 10.0 * young as f64,
            active_cards: young,
        }
    }

    fn width(days: u32) -> BucketWidth {
        BucketWidth::new(days).expect("non-zero width")
    }

    #[test]
    fn today_is_always_bucket_zero() {
        for days in [1, 7, 30, 365] {
            assert_eq!(chunk_index(0, width(days)), 0);
        }
    }

    #[test]
    fn weekly_buckets_include_today_and_six_prior_days() {
        let w = width(7);
        for d in -6..=0 {
            assert_eq!(chunk_index(d, w), 0, "day {d}");
        }
        for d in -13..=-7 {
            assert_eq!(chunk_index(d, w), -1, "day {d}");
        }
        assert_eq!(chunk_index(-14, w), -2);
    }

    #[test]
    fn daily_buckets_are_identity() {
        for d in -40..=0 {
            assert_eq!(chunk_index(d, BucketWidth::DAY), d);
        }
    }

    #[test]
    fn counts_take_last_day_of_bucket() {
        let days: Vec<DailySnapshot> = (-13..=0)
            .map(|d| snapshot(d, usize::try_from(d + 14).expect("positive"), 0.0))
            .collect();
        let agg = aggregate(&days, width(7));

        assert_eq!(agg.chunks().into_iter().collect::<Vec<_>>(), vec![-1, 0]);
        // Day -7 closes bucket -1, day 0 closes bucket 0.
        assert_eq!(agg.value(Metric::Young, -1), 7.0);
        assert_eq!(agg.value(Metric::Young, 0), 14.0);
    }

    #[test]
    fn total_knowledge_takes_last_day_of_bucket() {
        let days = [snapshot(-2, 1, 0.5), snapshot(-1, 1, 0.7), snapshot(0, 1, 0.9)];
        let agg = aggregate(&days, width(7));
        assert!((agg.value(Metric::TotalKnowledge, 0) - 0.9).abs() < 1e-12);
    }

    #[test]
    fn rates_take_mean_of_bucket() {
        let days = [snapshot(-2, 1, 0.5), snapshot(-1, 1, 0.7), snapshot(0, 1, 0.9)];
        let agg = aggregate(&days, width(7));
        let expected = (50.0 + 70.0 + 90.0) / 3.0;
        assert!((agg.value(Metric::RetentionPercent, 0) - expected).abs() < 1e-9);
        assert!((agg.value(Metric::AverageStability, 0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn input_order_does_not_matter() {
        let days = [snapshot(0, 3, 0.9), snapshot(-1, 2, 0.7), snapshot(-2, 1, 0.5)];
        let agg = aggregate(&days, width(7));
        assert_eq!(agg.value(Metric::Young, 0), 3.0);
    }

    #[test]
    fn missing_bucket_reads_zero() {
        let agg = aggregate(&[snapshot(0, 2, 1.0)], BucketWidth::DAY);
        assert_eq!(agg.value(Metric::Young, -5), 0.0);
        assert!(!agg.is_empty());
        assert!(aggregate(&[], BucketWidth::DAY).is_empty());
    }

    #[test]
    fn category_metrics_line_up() {
        for category in Category::ALL {
            assert_eq!(Metric::for_category(category).as_str(), category.as_str());
        }
    }
}
