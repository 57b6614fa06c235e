//! Presentation-neutral chart specification.
//!
//! [`build_chart`] picks which series to show, how each is drawn, and what
//! the axes look like, based on a [`ChartConfig`]. The result is plain data:
//! labels are translation keys, colors are hints, and tick text is described
//! by a [`TickRule`] instead of generated code. Drawing is left entirely to
//! the consumer.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::aggregate::Metric;
use crate::classify::Category;
use crate::config::{ChartConfig, SecondaryGraph};
use crate::event::SECS_PER_DAY;
use crate::series::{AssembledSeries, SeriesPoint};
use crate::window::{BucketUnit, BucketWidth};

/// Translation key shown instead of a chart when there is nothing to plot.
pub const NO_DATA_LABEL: &str = "graph_no_data";

/// Translation key for the bucket containing today.
pub const TODAY_LABEL: &str = "label_today";

/// Translation keys for month names, January first.
pub const MONTH_LABELS: [&str; 12] = [
    "month_jan", "month_feb", "month_mar", "month_apr", "month_may", "month_jun", "month_jul",
    "month_aug", "month_sep", "month_oct", "month_nov", "month_dec",
];

/// Value axis a series is plotted against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAxis {
    Primary,
    Secondary,
}

/// How a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "style", rename_all = "snake_case")]
pub enum SeriesStyle {
    /// Stacked bar; lower `order` is drawn first (bottom of the stack).
    Bar { order: u8 },
    /// Unstacked line.
    Line { line_width: u8 },
}

/// One drawable series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSeries {
    pub metric: Metric,
    pub label: String,
    pub color: String,
    #[serde(flatten)]
    pub style: SeriesStyle,
    pub axis: ValueAxis,
    pub data: Vec<SeriesPoint>,
}

/// How horizontal tick values become text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickRule {
    /// `-3w`, `-1m`, ... relative to today.
    Relative { suffix: BucketUnit },
    /// Calendar date of the bucket, counted back from the cutoff.
    Absolute { day_cutoff_s: i64, width: BucketWidth },
}

/// A rendered tick label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TickLabel {
    Today,
    Relative { value: i64, suffix: BucketUnit },
    Date { month: u32, day: u32 },
}

impl TickLabel {
    /// Label text with translation keys left as keys.
    #[must_use]
    pub fn to_key_string(&self) -> String {
        match self {
            Self::Today => TODAY_LABEL.to_string(),
            Self::Relative { value, suffix } => format!("{value}{}", suffix.suffix()),
            Self::Date { month, day } => {
                let index = usize::try_from(month.saturating_sub(1)).unwrap_or(0);
                format!("{} {day}", MONTH_LABELS[index.min(11)])
            }
        }
    }
}

/// Label for tick `value` under `rule`, with dates resolved in `tz`.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn tick_label<Tz: TimeZone>(value: f64, rule: TickRule, tz: &Tz) -> TickLabel {
    if value.abs() < 1e-4 {
        return TickLabel::Today;
    }
    let bucket = value.round() as i64;

    match rule {
        TickRule::Relative { suffix } => TickLabel::Relative {
            value: bucket,
            suffix,
        },
        TickRule::Absolute {
            day_cutoff_s,
            width,
        } => {
            let secs = day_cutoff_s + bucket * i64::from(width.days()) * SECS_PER_DAY;
            let utc = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();
            let local = utc.with_timezone(tz);
            TickLabel::Date {
                month: local.month(),
                day: local.day(),
            }
        }
    }
}

/// Horizontal axis options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChartOptions {
    pub x_min: f64,
    pub x_max: f64,
    pub bucket_width: BucketWidth,
    pub unit: BucketUnit,
    pub tick_rule: TickRule,
    /// Present only when a secondary metric is plotted.
    pub secondary_axis: Option<SecondaryAxis>,
}

/// The right-hand value axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SecondaryAxis {
    pub label: &'static str,
    /// Fixed maximum, or `None` to scale with the data.
    pub max: Option<f64>,
}

/// Translation keys for the hover tooltip and legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TooltipLabels {
    pub period: &'static str,
    pub learning: &'static str,
    pub young: &'static str,
    pub mature: &'static str,
    pub retained: &'static str,
    pub total: &'static str,
    pub retention_percent: &'static str,
    pub total_knowledge: &'static str,
    pub average_stability: &'static str,
    pub today: &'static str,
}

impl Default for TooltipLabels {
    fn default() -> Self {
        Self {
            period: "tooltip_period",
            learning: category_label(Category::Learning),
            young: category_label(Category::Young),
            mature: category_label(Category::Mature),
            retained: category_label(Category::Retained),
            total: "tooltip_total",
            retention_percent: "label_avg_retention_percent",
            total_knowledge: "label_total_knowledge",
            average_stability: "label_avg_stability",
            today: TODAY_LABEL,
        }
    }
}

/// Everything the tooltip shows for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipRow {
    pub chunk: i64,
    pub learning: f64,
    pub young: f64,
    pub mature: f64,
    pub retained: f64,
    pub total: f64,
    /// `100 * total_knowledge / total`; `None` for an empty bucket.
    pub retention_percent: Option<f64>,
    pub total_knowledge: f64,
    pub average_stability: f64,
}

/// The full specification handed to a charting layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub y_label: &'static str,
    pub series: Vec<ChartSeries>,
    pub options: ChartOptions,
    pub tooltip: TooltipLabels,
    pub rows: Vec<TooltipRow>,
}

impl ChartSpec {
    /// Series for `metric`, if it is shown.
    #[must_use]
    pub fn series_for(&self, metric: Metric) -> Option<&ChartSeries> {
        self.series.iter().find(|series| series.metric == metric)
    }
}

/// Translation key for a category's legend entry.
#[must_use]
pub const fn category_label(category: Category) -> &'static str {
    match category {
        Category::Learning => "label_learning",
        Category::Young => "label_young",
        Category::Mature => "label_mature",
        Category::Retained => "label_retained",
    }
}

/// Color hint for a metric.
#[must_use]
pub const fn metric_color(metric: Metric) -> &'static str {
    match metric {
        Metric::Learning => "#00F",
        Metric::Young => "#7c7",
        Metric::Mature => "#070",
        Metric::Retained => "#004080",
        Metric::TotalKnowledge => "#FF8C00",
        Metric::RetentionPercent => "#C71585",
        Metric::AverageStability => "#8B4513",
    }
}

const fn is_hidden(config: &ChartConfig, category: Category) -> bool {
    match category {
        Category::Learning => config.hide_learning,
        Category::Young => config.hide_young,
        Category::Mature => config.hide_mature,
        Category::Retained => config.hide_retained,
    }
}

fn line(
    assembled: &AssembledSeries,
    metric: Metric,
    label: &str,
    axis: ValueAxis,
) -> ChartSeries {
    ChartSeries {
        metric,
        label: label.to_string(),
        color: metric_color(metric).to_string(),
        style: SeriesStyle::Line { line_width: 2 },
        axis,
        data: assembled.points(metric).to_vec(),
    }
}

/// Build the chart specification for `assembled` under `config`.
#[must_use]
pub fn build_chart(
    assembled: &AssembledSeries,
    config: &ChartConfig,
    day_cutoff_s: i64,
) -> ChartSpec {
    let labels = TooltipLabels::default();
    let mut series = Vec::new();

    // Stack order: retained at the bottom, learning on top.
    let stacked = [
        (Category::Retained, 1),
        (Category::Mature, 2),
        (Category::Young, 3),
        (Category::Learning, 4),
    ];
    for (category, order) in stacked {
        if is_hidden(config, category) {
            continue;
        }
        let metric = Metric::for_category(category);
        series.push(ChartSeries {
            metric,
            label: category_label(category).to_string(),
            color: metric_color(metric).to_string(),
            style: SeriesStyle::Bar { order },
            axis: ValueAxis::Primary,
            data: assembled.points(metric).to_vec(),
        });
    }

    if !config.hide_total_knowledge_graph {
        series.push(line(
            assembled,
            Metric::TotalKnowledge,
            labels.total_knowledge,
            ValueAxis::Primary,
        ));
    }

    let secondary_axis = match config.secondary_graph {
        SecondaryGraph::None => None,
        SecondaryGraph::RetentionRelative => {
            series.push(line(
                assembled,
                Metric::RetentionPercent,
                labels.retention_percent,
                ValueAxis::Secondary,
            ));
            Some(SecondaryAxis {
                label: "graph_y_label_percent",
                max: config.secondary_axis_max(),
            })
        }
        SecondaryGraph::StabilityAverage => {
            series.push(line(
                assembled,
                Metric::AverageStability,
                labels.average_stability,
                ValueAxis::Secondary,
            ));
            Some(SecondaryAxis {
                label: "graph_y_label_stability_days",
                max: config.secondary_axis_max(),
            })
        }
    };

    let tick_rule = if config.use_absolute_dates {
        TickRule::Absolute {
            day_cutoff_s,
            width: assembled.width,
        }
    } else {
        TickRule::Relative {
            suffix: assembled.unit,
        }
    };

    ChartSpec {
        title: "graph_title",
        subtitle: "graph_subtitle",
        y_label: "graph_y_label",
        series,
        options: ChartOptions {
            x_min: assembled.bounds.min,
            x_max: assembled.bounds.max,
            bucket_width: assembled.width,
            unit: assembled.unit,
            tick_rule,
            secondary_axis,
        },
        tooltip: labels,
        rows: tooltip_rows(assembled),
    }
}

/// Per-bucket tooltip values, independent of which series are visible.
#[must_use]
pub fn tooltip_rows(assembled: &AssembledSeries) -> Vec<TooltipRow> {
    let value_at = |metric: Metric, index: usize| {
        assembled
            .points(metric)
            .get(index)
            .map_or(0.0, |point| point.value())
    };

    assembled
        .chunks
        .iter()
        .enumerate()
        .map(|(index, &chunk)| {
            let learning = value_at(Metric::Learning, index);
            let young = value_at(Metric::Young, index);
            let mature = value_at(Metric::Mature, index);
            let retained = value_at(Metric::Retained, index);
            let total = learning + young + mature + retained;
            let total_knowledge = value_at(Metric::TotalKnowledge, index);

            TooltipRow {
                chunk,
                learning,
                young,
                mature,
                retained,
                total,
                retention_percent: (total > 0.0).then(|| 100.0 * total_knowledge / total),
                total_knowledge,
                average_stability: value_at(Metric::AverageStability, index),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::aggregate;
    use crate::replay::{CategoryCounts, DailySnapshot};
    use crate::series::assemble;
    use chrono::FixedOffset;

    const CUTOFF: i64 = 1_718_258_400; // 2024-06-13T06:00:00Z

    fn assembled() -> AssembledSeries {
        let days: Vec<DailySnapshot> = (-9..=0)
            .map(|d| DailySnapshot {
                day_offset: d,
                counts: CategoryCounts {
                    learning: 1,
                    young: 2,
                    mature: 3,
                    retained: 4,
                },
                total_retrievability: 8.0,
                total_stability: 200.0,
                active_cards: 10,
            })
            .collect();
        assemble(&aggregate(&days, BucketWidth::WEEK), -9)
    }

    #[test]
    fn default_config_stacks_categories_and_total_line() {
        let spec = build_chart(&assembled(), &ChartConfig::default(), CUTOFF);
        let metrics: Vec<Metric> = spec.series.iter().map(|s| s.metric).collect();
        assert_eq!(
            metrics,
            vec![
                Metric::Retained,
                Metric::Mature,
                Metric::Young,
                Metric::Learning,
                Metric::TotalKnowledge,
            ]
        );
        assert_eq!(spec.options.secondary_axis, None);
        assert_eq!(
            spec.series_for(Metric::Retained).map(|s| s.style),
            Some(SeriesStyle::Bar { order: 1 })
        );
        assert_eq!(spec.options.x_min, -1.5);
        assert_eq!(spec.options.x_max, 0.5);
    }

    #[test]
    fn hidden_categories_are_dropped() {
        let config = ChartConfig {
            hide_young: true,
            hide_retained: true,
            hide_total_knowledge_graph: true,
            ..ChartConfig::default()
        };
        let spec = build_chart(&assembled(), &config, CUTOFF);
        assert!(spec.series_for(Metric::Young).is_none());
        assert!(spec.series_for(Metric::Retained).is_none());
        assert!(spec.series_for(Metric::TotalKnowledge).is_none());
        assert!(spec.series_for(Metric::Learning).is_some());
    }

    #[test]
    fn retention_secondary_uses_percent_axis() {
        let config = ChartConfig {
            secondary_graph: SecondaryGraph::RetentionRelative,
            secondary_axis_dynamic_max: false,
            secondary_axis_maximum_value: 100.0,
            ..ChartConfig::default()
        };
        let spec = build_chart(&assembled(), &config, CUTOFF);
        let series = spec.series_for(Metric::RetentionPercent).expect("shown");
        assert_eq!(series.axis, ValueAxis::Secondary);
        assert!((series.data[0].value() - 80.0).abs() < 1e-9);
        assert_eq!(
            spec.options.secondary_axis,
            Some(SecondaryAxis {
                label: "graph_y_label_percent",
                max: Some(100.0),
            })
        );
    }

    #[test]
    fn stability_secondary_uses_days_axis() {
        let config = ChartConfig {
            secondary_graph: SecondaryGraph::StabilityAverage,
            ..ChartConfig::default()
        };
        let spec = build_chart(&assembled(), &config, CUTOFF);
        let series = spec.series_for(Metric::AverageStability).expect("shown");
        assert!((series.data[0].value() - 20.0).abs() < 1e-9);
        let axis = spec.options.secondary_axis.expect("secondary axis");
        assert_eq!(axis.label, "graph_y_label_stability_days");
        assert_eq!(axis.max, None);
    }

    #[test]
    fn tooltip_rows_cover_every_chunk() {
        let rows = tooltip_rows(&assembled());
        assert_eq!(rows.len(), 2);
        let today = rows.last().expect("today row");
        assert_eq!(today.chunk, 0);
        assert_eq!(today.total, 10.0);
        assert_eq!(today.retention_percent, Some(80.0));
        assert_eq!(today.average_stability, 20.0);
    }

    #[test]
    fn empty_bucket_has_no_retention_percent() {
        let empty = assemble(&aggregate(&[], BucketWidth::DAY), 0);
        let rows = tooltip_rows(&empty);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].retention_percent, None);
    }

    #[test]
    fn relative_tick_labels() {
        let rule = TickRule::Relative {
            suffix: BucketUnit::Week,
        };
        assert_eq!(tick_label(0.0, rule, &Utc), TickLabel::Today);
        assert_eq!(tick_label(0.00001, rule, &Utc), TickLabel::Today);
        let label = tick_label(-3.0, rule, &Utc);
        assert_eq!(label.to_key_string(), "-3w");
    }

    #[test]
    fn absolute_tick_labels_count_back_from_cutoff() {
        let rule = TickRule::Absolute {
            day_cutoff_s: CUTOFF,
            width: BucketWidth::WEEK,
        };
        assert_eq!(
            tick_label(-2.0, rule, &Utc),
            TickLabel::Date { month: 5, day: 30 }
        );
        assert_eq!(
            tick_label(-2.0, rule, &Utc).to_key_string(),
            "month_may 30"
        );

        let far_west = FixedOffset::west_opt(10 * 3600).expect("offset");
        assert_eq!(
            tick_label(-2.0, rule, &far_west),
            TickLabel::Date { month: 5, day: 29 }
        );
    }

    #[test]
    fn spec_serializes_series_with_flattened_style() {
        let spec = build_chart(&assembled(), &ChartConfig::default(), CUTOFF);
        let json = serde_json::to_value(&spec).expect("serialize");
        assert_eq!(json["series"][0]["metric"], "retained");
        assert_eq!(json["series"][0]["style"], "bar");
        assert_eq!(json["series"][0]["order"], 1);
        assert_eq!(json["series"][4]["style"], "line");
        assert_eq!(json["options"]["tick_rule"]["kind"], "relative");
        assert_eq!(json["series"][0]["data"][1][0], 0);
    }
}
