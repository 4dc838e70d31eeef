//! Statistical cleaning of raw price buckets.
//!
//! Marketplace history is noisy: fat-finger listings and single-bucket spikes
//! would otherwise dominate the chart's y-axis. Two independent passes:
//! an interquartile-range bound over the distribution of bucket extremes,
//! then a per-bucket spike rule relative to the bucket's own average.

use crate::config::ANALYSIS;
use crate::domain::PriceSample;
use crate::utils::maths_utils::compute_thresholds;

/// Remove implausible buckets, preserving input order.
///
/// Pure and deterministic: identical input always yields identical output,
/// and the output is always a subsequence of the input.
pub fn filter_outliers(data: &[PriceSample]) -> Vec<PriceSample> {
    if data.is_empty() {
        return Vec::new();
    }

    let cfg = &ANALYSIS.outlier;
    let max_values: Vec<f64> = data.iter().map(|d| d.max).collect();
    let min_values: Vec<f64> = data.iter().map(|d| d.min).collect();

    let max_bounds = compute_thresholds(
        &max_values,
        cfg.strictness_multiplier,
        cfg.lower_percentile,
        cfg.upper_percentile,
    );
    let min_bounds = compute_thresholds(
        &min_values,
        cfg.strictness_multiplier,
        cfg.lower_percentile,
        cfg.upper_percentile,
    );

    data.iter()
        .filter(|d| d.max <= max_bounds.upper && d.min >= min_bounds.lower)
        .filter(|d| d.avg != 0.0 && d.max <= cfg.spike_ratio * d.avg)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price_sample::test_support::sample;

    fn is_subsequence(subset: &[PriceSample], superset: &[PriceSample]) -> bool {
        let mut iter = superset.iter();
        subset.iter().all(|s| iter.any(|sup| sup == s))
    }

    /// A plausible trading day: tight cluster around 15 with mild variation.
    fn steady_market() -> Vec<PriceSample> {
        (0..20)
            .map(|i| {
                let drift = (i % 5) as f64 * 0.3;
                sample(i, 13.0 + drift, 17.0 + drift, 15.0 + drift, 4.0)
            })
            .collect()
    }

    #[test]
    fn empty_input_is_empty_output() {
        assert!(filter_outliers(&[]).is_empty());
    }

    #[test]
    fn output_is_an_ordered_subsequence() {
        let mut data = steady_market();
        data.push(sample(20, 14.0, 900.0, 15.5, 1.0));
        data.push(sample(21, 13.5, 16.5, 15.0, 3.0));

        let filtered = filter_outliers(&data);

        assert!(filtered.len() <= data.len());
        assert!(is_subsequence(&filtered, &data), "order must be preserved");
    }

    #[test]
    fn single_bucket_spike_is_removed() {
        // The 1000 max must go, the neighbours must stay.
        let data = vec![
            sample(0, 10.0, 20.0, 15.0, 5.0),
            sample(1, 11.0, 1000.0, 16.0, 3.0),
            sample(2, 9.0, 22.0, 14.0, 7.0),
        ];

        let filtered = filter_outliers(&data);

        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].avg, 15.0);
        assert_eq!(filtered[1].avg, 14.0);
    }

    #[test]
    fn zero_average_buckets_are_dropped() {
        let mut data = steady_market();
        data.insert(10, sample(100, 0.0, 0.0, 0.0, 0.0));

        let filtered = filter_outliers(&data);
        assert!(filtered.iter().all(|d| d.avg != 0.0));
    }

    #[test]
    fn steady_market_survives_intact() {
        let data = steady_market();
        let filtered = filter_outliers(&data);
        assert_eq!(filtered, data, "a clean distribution should not be trimmed");
    }

    #[test]
    fn refiltering_a_clean_fixture_is_stable() {
        // Not a universal law (tiny survivor sets can shift percentiles), but
        // it must hold for a representative healthy fixture.
        let mut data = steady_market();
        data.push(sample(30, 14.0, 400.0, 15.0, 1.0));

        let once = filter_outliers(&data);
        let twice = filter_outliers(&once);
        assert_eq!(once, twice);
    }
}
