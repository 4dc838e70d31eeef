use argminmax::ArgMinMax;
use statrs::statistics::{Data, OrderStatistics};

/// Inclusive lower/upper bounds derived from a percentile spread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    pub lower: f64,
    pub upper: f64,
}

/// Interquartile-range bounds over `values`.
///
/// `lower_percentile`/`upper_percentile` are in [0, 100]. The bounds are
/// `[Qlo - multiplier * IQR, Qhi + multiplier * IQR]` where
/// `IQR = Qhi - Qlo`.
pub fn compute_thresholds(
    values: &[f64],
    multiplier: f64,
    lower_percentile: f64,
    upper_percentile: f64,
) -> Thresholds {
    debug_assert!(!values.is_empty());
    let mut data = Data::new(values.to_vec());
    let q_lo = data.quantile(lower_percentile / 100.0);
    let q_hi = data.quantile(upper_percentile / 100.0);
    let iqr = q_hi - q_lo;
    Thresholds {
        lower: q_lo - multiplier * iqr,
        upper: q_hi + multiplier * iqr,
    }
}

pub fn get_max(vec: &[f64]) -> f64 {
    let max_index: usize = vec.argmax();
    vec[max_index]
}

pub fn get_min(vec: &[f64]) -> f64 {
    let min_index: usize = vec.argmin();
    vec[min_index]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds_bracket_the_bulk() {
        // A tight cluster: bounds must contain every clustered value
        let values = vec![10.0, 11.0, 10.5, 9.8, 10.2, 10.9, 10.1, 9.9];
        let t = compute_thresholds(&values, 0.7, 35.0, 75.0);
        assert!(t.lower < 9.8, "lower bound {} should sit below the cluster", t.lower);
        assert!(t.upper > 11.0, "upper bound {} should sit above the cluster", t.upper);
    }

    #[test]
    fn wider_multiplier_widens_bounds() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0];
        let narrow = compute_thresholds(&values, 0.7, 35.0, 75.0);
        let wide = compute_thresholds(&values, 1.5, 35.0, 75.0);
        assert!(wide.lower <= narrow.lower);
        assert!(wide.upper >= narrow.upper);
    }

    #[test]
    fn min_max_scan() {
        let values = vec![3.0, 1.0, 4.0, 1.5, 9.0, 2.6];
        assert_eq!(get_min(&values), 1.0);
        assert_eq!(get_max(&values), 9.0);
    }
}
