//! Turn aggregated bucket maps into ordered point lists and axis bounds.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::aggregate::{AggregatedSeries, Metric};
use crate::window::{BucketUnit, BucketWidth};

/// One `[chunk_index, value]` pair. Serializes as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint(pub i64, pub f64);

impl SeriesPoint {
    #[must_use]
    pub const fn chunk(self) -> i64 {
        self.0
    }

    #[must_use]
    pub const fn value(self) -> f64 {
        self.1
    }
}

/// Horizontal axis range, padded half a bucket on each side.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisBounds {
    pub min: f64,
    pub max: f64,
}

impl AxisBounds {
    /// Bounds for an ascending chunk list. The upper bound always reaches
    /// today so the chart stays anchored to the present.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn for_chunks(chunks: &[i64]) -> Self {
        let first = chunks.first().copied().unwrap_or(0);
        let last = chunks.last().copied().unwrap_or(0);
        Self {
            min: first as f64 - 0.5,
            max: last.max(0) as f64 + 0.5,
        }
    }
}

/// Ordered per-metric series ready for a charting layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssembledSeries {
    /// Every bucket index, ascending. Each metric has one point per entry.
    pub chunks: Vec<i64>,
    pub points: BTreeMap<Metric, Vec<SeriesPoint>>,
    pub bounds: AxisBounds,
    pub width: BucketWidth,
    pub unit: BucketUnit,
}

impl AssembledSeries {
    /// Points for `metric`, empty if the metric was not assembled.
    #[must_use]
    pub fn points(&self, metric: Metric) -> &[SeriesPoint] {
        self.points.get(&metric).map(Vec::as_slice).unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// Assemble `aggregated` into ordered series.
///
/// When there are no buckets at all but the window is only today
/// (`start_day_offset == 0`), a single zero point at bucket `0` is emitted so
/// the charting layer never receives a completely empty series.
#[must_use]
pub fn assemble(aggregated: &AggregatedSeries, start_day_offset: i64) -> AssembledSeries {
    let mut chunks: Vec<i64> = aggregated.chunks().into_iter().collect();
    if chunks.is_empty() && start_day_offset == 0 {
        chunks.push(0);
    }

    let points = Metric::ALL
        .into_iter()
        .map(|metric| {
            let series = chunks
                .iter()
                .map(|&chunk| SeriesPoint(chunk, aggregated.value(metric, chunk)))
                .collect();
            (metric, series)
        })
        .collect();

    AssembledSeries {
        bounds: AxisBounds::for_chunks(&chunks),
        chunks,
        points,
        width: aggregated.width,
        unit: aggregated.width.unit(),
    }
}
