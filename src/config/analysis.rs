//! Statistical analysis configuration.

/// Parameters of the interquartile-range outlier filter.
pub struct OutlierConfig {
    /// IQR dampening multiplier. Stricter than the classic 1.5 because
    /// marketplace data is noisier at the tails.
    pub strictness_multiplier: f64,
    /// Lower percentile cutoff (non-standard, pulled up from 25)
    pub lower_percentile: f64,
    /// Upper percentile cutoff
    pub upper_percentile: f64,
    /// A bucket whose max exceeds this multiple of its own average is a spike
    pub spike_ratio: f64,
}

pub struct AnalysisConfig {
    pub outlier: OutlierConfig,
    /// Fraction of the global price span added above and below the y-axis
    pub axis_buffer_pct: f64,
}

pub const ANALYSIS: AnalysisConfig = AnalysisConfig {
    outlier: OutlierConfig {
        strictness_multiplier: 0.7,
        lower_percentile: 35.0,
        upper_percentile: 75.0,
        spike_ratio: 3.0,
    },
    axis_buffer_pct: 0.1,
};
