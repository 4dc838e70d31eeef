//! Chart artifact configuration.

pub struct ChartColors {
    /// RGB for candles closing at or above their open
    pub bullish: (u8, u8, u8),
    /// RGB for candles closing below their open
    pub bearish: (u8, u8, u8),
    pub background: (u8, u8, u8),
    pub grid: (u8, u8, u8),
    pub text: (u8, u8, u8),
}

pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    /// Half-width of a candle body in x-axis units
    pub body_half_width: f64,
    /// strftime format for day-boundary tick labels
    pub day_label_format: &'static str,
    /// Default output path for the rendered artifact
    pub output_path: &'static str,
    pub colors: ChartColors,
}

pub const CHART: ChartConfig = ChartConfig {
    width: 3000,
    height: 1600,
    body_half_width: 0.25,
    day_label_format: "%m/%d %a",
    output_path: "chart.png",
    colors: ChartColors {
        bullish: (0, 170, 70),
        bearish: (210, 50, 50),
        background: (18, 18, 18),
        grid: (128, 128, 128),
        text: (220, 220, 220),
    },
};
