//! Aggregation of cleaned price buckets into a renderable candle series.
//!
//! Buckets are independent averages, not true OHLC records, so candles are
//! chained: each open is the previous bucket's average. The aggregator also
//! computes the chart layout metadata (day-boundary ticks, y-axis bounds);
//! rendering itself is a separate collaborator consuming `ChartModel`.

use chrono::NaiveDate;

use crate::config::{ANALYSIS, CHART};
use crate::domain::{Candle, PriceSample};
use crate::utils::maths_utils::{get_max, get_min};
use crate::utils::time_utils::day_label;

/// Global y-axis bounds. For a single sample the span is zero and both
/// bounds collapse to the same finite value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBounds {
    pub low: f64,
    pub high: f64,
}

/// Vertical gridline position: the first bucket of each new UTC calendar day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayTick {
    pub index: usize,
    pub label: String,
}

/// The full contract boundary handed to the chart renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartModel {
    pub title: String,
    pub candles: Vec<Candle>,
    pub day_ticks: Vec<DayTick>,
    pub y_axis: AxisBounds,
}

/// Build the candle series and chart metadata from filtered samples.
///
/// Out-of-order input means the fetch merge misbehaved; it is re-sorted here
/// (on a copy) rather than charted as-is.
pub fn aggregate(samples: &[PriceSample], label: Option<&str>) -> ChartModel {
    let title = match label {
        Some(name) => format!("{name} 2 Week Candle Chart"),
        None => "2 Week Candle Chart".to_string(),
    };

    if samples.is_empty() {
        return ChartModel {
            title,
            candles: Vec::new(),
            day_ticks: Vec::new(),
            y_axis: AxisBounds { low: 0.0, high: 0.0 },
        };
    }

    let sorted = ensure_sorted(samples);

    let mut candles = Vec::with_capacity(sorted.len());
    for (i, sample) in sorted.iter().enumerate() {
        let open = if i == 0 { sample.avg } else { sorted[i - 1].avg };
        candles.push(Candle {
            timestamp: sample.timestamp,
            open,
            high: sample.max,
            low: sample.min,
            close: sample.avg,
            volume: sample.volume,
        });
    }

    ChartModel {
        title,
        day_ticks: day_ticks(&sorted),
        y_axis: axis_bounds(&sorted),
        candles,
    }
}

fn ensure_sorted(samples: &[PriceSample]) -> Vec<PriceSample> {
    let mut sorted = samples.to_vec();
    if !sorted.is_sorted_by_key(|s| s.timestamp) {
        log::warn!("Aggregator received out-of-order buckets, re-sorting");
        sorted.sort_by_key(|s| s.timestamp);
    }
    sorted
}

fn day_ticks(samples: &[PriceSample]) -> Vec<DayTick> {
    let mut ticks = Vec::new();
    let mut current_date: Option<NaiveDate> = None;

    for (i, sample) in samples.iter().enumerate() {
        let date = sample.timestamp.date_naive();
        if current_date != Some(date) {
            current_date = Some(date);
            ticks.push(DayTick {
                index: i,
                label: day_label(sample.timestamp, CHART.day_label_format),
            });
        }
    }
    ticks
}

fn axis_bounds(samples: &[PriceSample]) -> AxisBounds {
    let mins: Vec<f64> = samples.iter().map(|s| s.min).collect();
    let maxs: Vec<f64> = samples.iter().map(|s| s.max).collect();

    let global_min = get_min(&mins);
    let global_max = get_max(&maxs);
    let buffer = (global_max - global_min) * ANALYSIS.axis_buffer_pct;

    AxisBounds {
        low: global_min - buffer,
        high: global_max + buffer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::filter_outliers;
    use crate::domain::price_sample::test_support::sample;

    #[test]
    fn candles_chain_open_to_previous_close() {
        let samples = vec![
            sample(0, 10.0, 20.0, 15.0, 5.0),
            sample(1, 11.0, 21.0, 16.0, 3.0),
            sample(2, 9.0, 22.0, 14.0, 7.0),
            sample(3, 9.5, 19.0, 13.5, 2.0),
        ];

        let model = aggregate(&samples, None);

        assert_eq!(model.candles[0].open, model.candles[0].close);
        for i in 1..model.candles.len() {
            assert_eq!(
                model.candles[i].open,
                model.candles[i - 1].close,
                "candle {i} must open at the previous close"
            );
        }
    }

    #[test]
    fn single_sample_has_finite_collapsed_axis() {
        let samples = vec![sample(0, 12.0, 12.0, 12.0, 1.0)];
        let model = aggregate(&samples, None);

        assert!(model.y_axis.low.is_finite());
        assert!(model.y_axis.high.is_finite());
        assert!(model.y_axis.low <= model.y_axis.high);
        assert_eq!(model.y_axis.low, model.y_axis.high);
        assert_eq!(model.candles.len(), 1);
    }

    #[test]
    fn axis_bounds_carry_ten_percent_buffer() {
        let samples = vec![
            sample(0, 10.0, 20.0, 15.0, 1.0),
            sample(1, 12.0, 18.0, 15.0, 1.0),
        ];
        let model = aggregate(&samples, None);

        // span 10.0, buffer 1.0
        assert_eq!(model.y_axis.low, 9.0);
        assert_eq!(model.y_axis.high, 21.0);
    }

    #[test]
    fn day_ticks_mark_calendar_changes() {
        // Fixture epoch starts at midnight, so hour 0 opens day one and
        // hours 24/48 open the following days.
        let samples = vec![
            sample(0, 10.0, 20.0, 15.0, 1.0),
            sample(12, 10.0, 20.0, 15.0, 1.0),
            sample(24, 10.0, 20.0, 15.0, 1.0),
            sample(36, 10.0, 20.0, 15.0, 1.0),
            sample(48, 10.0, 20.0, 15.0, 1.0),
        ];
        let model = aggregate(&samples, None);

        let indices: Vec<usize> = model.day_ticks.iter().map(|t| t.index).collect();
        assert_eq!(indices, vec![0, 2, 4]);
        assert_eq!(model.day_ticks[0].label, "03/01 Sat");
    }

    #[test]
    fn out_of_order_input_is_resorted() {
        let samples = vec![
            sample(2, 9.0, 22.0, 14.0, 7.0),
            sample(0, 10.0, 20.0, 15.0, 5.0),
            sample(1, 11.0, 21.0, 16.0, 3.0),
        ];
        let model = aggregate(&samples, None);

        let timestamps: Vec<_> = model.candles.iter().map(|c| c.timestamp).collect();
        let mut expected = timestamps.clone();
        expected.sort();
        assert_eq!(timestamps, expected);
        // Chaining is computed on the sorted order
        assert_eq!(model.candles[1].open, model.candles[0].close);
    }

    #[test]
    fn titles_include_the_item_name() {
        assert_eq!(
            aggregate(&[], Some("Falchion")).title,
            "Falchion 2 Week Candle Chart"
        );
        assert_eq!(aggregate(&[], None).title, "2 Week Candle Chart");
    }

    #[test]
    fn filtered_spike_fixture_yields_two_chained_candles() {
        // End-to-end: outlier filter feeding aggregation.
        let raw = vec![
            sample(0, 10.0, 20.0, 15.0, 5.0),
            sample(1, 11.0, 1000.0, 16.0, 3.0),
            sample(2, 9.0, 22.0, 14.0, 7.0),
        ];

        let filtered = filter_outliers(&raw);
        let model = aggregate(&filtered, Some("Falchion"));

        assert_eq!(model.candles.len(), 2);
        assert_eq!(model.candles[0].close, 15.0);
        assert_eq!(model.candles[1].open, 15.0);
    }
}
