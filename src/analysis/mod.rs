pub mod candle_agg;
pub mod outlier_filter;

pub use candle_agg::{AxisBounds, ChartModel, DayTick, aggregate};
pub use outlier_filter::filter_outliers;
