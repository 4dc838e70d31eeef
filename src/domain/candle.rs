// Define the CandleType enum
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CandleType {
    Bullish,
    Bearish,
}

// One charted candle derived from a price bucket.
//
// Buckets are independent averages, so candles are chained: each open is the
// previous bucket's average, which keeps the series visually continuous.
#[derive(Debug, Clone, PartialEq)]
pub struct Candle {
    pub timestamp: chrono::DateTime<chrono::Utc>,

    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,

    pub volume: f64,
}

impl Candle {
    // A method to determine the type of candle
    pub fn get_type(&self) -> CandleType {
        if self.close >= self.open {
            CandleType::Bullish
        } else {
            CandleType::Bearish
        }
    }

    // Returns the low and high of the candle body as a tuple
    pub fn body_range(&self) -> (f64, f64) {
        match self.get_type() {
            CandleType::Bullish => (self.open, self.close),
            CandleType::Bearish => (self.close, self.open),
        }
    }
}
